//! Widget ids and id spaces.

use crate::error::WidgetError;
use crate::page::registry::{compose_id, validate_local_id};
use crate::page::Page;
use crate::widget::WidgetId;
use std::collections::HashSet;

/// A pending id move computed by [`Page::plan_reregistration`].
struct IdMove {
    widget: WidgetId,
    old_id: String,
    new_id: String,
    id_space: String,
}

impl Page {
    /// Full page id of the widget.
    pub fn id(&self, widget: WidgetId) -> Result<&str, WidgetError> {
        Ok(self.node(widget)?.core.id())
    }

    /// Effective id space: the widget's own, else the nearest ancestor's, else the root space `""`.
    pub fn id_space(&self, widget: WidgetId) -> Result<String, WidgetError> {
        let mut current = Some(widget);
        while let Some(w) = current {
            let core = &self.node(w)?.core;
            if let Some(space) = &core.id_space {
                return Ok(space.clone());
            }
            current = core.parent;
        }
        Ok(String::new())
    }

    /// Sets an explicit local id. The full id is composed with the effective id space.
    ///
    /// The new id is registered before the old one is released, so on [`WidgetError::IdConflict`]
    /// the widget keeps its previous id.
    pub fn set_id(&mut self, widget: WidgetId, local_id: &str) -> Result<(), WidgetError> {
        validate_local_id(local_id)?;
        let id_space = self.id_space(widget)?;
        let full = compose_id(&id_space, self.id_space_separator(), local_id);
        let old = self.node(widget)?.core.id.clone();
        if full != old {
            self.registry.register(&full, &id_space, widget)?;
            if !old.is_empty() && self.registry.get(&old) == Some(widget) {
                self.registry.deregister(&old);
            }
            tracing::debug!(old = %old, new = %full, "widget id changed");
        }
        let core = &mut self.node_mut(widget)?.core;
        core.id = full;
        core.id_specified = Some(local_id.to_string());
        Ok(())
    }

    /// Declares an id space on the widget. Explicit ids in its subtree that live in that space are moved;
    /// if any of them would collide, nothing changes.
    pub fn set_id_space(&mut self, widget: WidgetId, id_space: &str) -> Result<(), WidgetError> {
        let previous = self.node(widget)?.core.id_space.clone();
        if previous.as_deref() == Some(id_space) {
            return Ok(());
        }
        self.node_mut(widget)?.core.id_space = Some(id_space.to_string());
        if let Err(e) = self.reregister_subtree(widget) {
            self.node_mut(widget)?.core.id_space = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Gives the widget a fresh page-unique id: prefix, widget type and a counter.
    pub(crate) fn assign_auto_id(&mut self, widget: WidgetId) -> Result<(), WidgetError> {
        let widget_type = self.node(widget)?.kind.widget_type();
        let id = loop {
            let counter = self.auto_id_counters.entry(widget_type).or_insert(0);
            *counter += 1;
            let candidate = format!("{}{}{:02}", self.settings.auto_id_prefix, widget_type, counter);
            if !self.registry.contains(&candidate) {
                break candidate;
            }
        };
        self.registry.register(&id, "", widget)?;
        let core = &mut self.node_mut(widget)?.core;
        core.id = id;
        core.id_specified = None;
        Ok(())
    }

    /// Moves explicit ids of the subtree to their currently effective id spaces, all or nothing.
    pub(crate) fn reregister_subtree(&mut self, widget: WidgetId) -> Result<(), WidgetError> {
        let moves = self.plan_reregistration(widget)?;
        if moves.is_empty() {
            return Ok(());
        }
        for m in &moves {
            if self.registry.get(&m.old_id) == Some(m.widget) {
                self.registry.deregister(&m.old_id);
            }
        }
        for m in moves {
            self.registry.register(&m.new_id, &m.id_space, m.widget)?;
            tracing::debug!(old = %m.old_id, new = %m.new_id, "widget id moved to id space");
            self.node_mut(m.widget)?.core.id = m.new_id;
        }
        Ok(())
    }

    fn plan_reregistration(&self, widget: WidgetId) -> Result<Vec<IdMove>, WidgetError> {
        let mut subtree = vec![widget];
        subtree.extend(self.children_recursive(widget)?);
        let mut moves = Vec::new();
        for w in subtree {
            let core = &self.node(w)?.core;
            let Some(local) = core.id_specified.as_deref() else {
                continue;
            };
            let id_space = self.id_space(w)?;
            let new_id = compose_id(&id_space, self.id_space_separator(), local);
            if new_id != core.id {
                moves.push(IdMove {
                    widget: w,
                    old_id: core.id.clone(),
                    new_id,
                    id_space,
                });
            }
        }
        let mut claimed: HashSet<String> = HashSet::new();
        for m in &moves {
            let released_by_move = |holder: WidgetId| moves.iter().any(|o| o.widget == holder && o.old_id == m.new_id);
            let taken = match self.registry.get(&m.new_id) {
                Some(holder) => holder != m.widget && !released_by_move(holder),
                None => false,
            };
            if taken || !claimed.insert(m.new_id.clone()) {
                return Err(WidgetError::IdConflict {
                    id: m.new_id.clone(),
                    id_space: m.id_space.clone(),
                });
            }
        }
        Ok(moves)
    }
}
