//! Parent/child structure: enumeration, ancestor search, reparenting and copies.

use crate::error::WidgetError;
use crate::page::Page;
use crate::uxon::UxonObject;
use crate::widget::{WidgetId, WidgetPredicate};
use std::any::TypeId;

impl Page {
    pub fn parent(&self, widget: WidgetId) -> Result<Option<WidgetId>, WidgetError> {
        Ok(self.node(widget)?.core.parent)
    }

    /// Direct children. Leaf widgets have none.
    pub fn children(&self, widget: WidgetId) -> Result<Vec<WidgetId>, WidgetError> {
        Ok(self.node(widget)?.kind.children())
    }

    /// The whole subtree below `widget`, depth first, parents before their children.
    pub fn children_recursive(&self, widget: WidgetId) -> Result<Vec<WidgetId>, WidgetError> {
        let mut out = Vec::new();
        let mut stack: Vec<WidgetId> = self.children(widget)?.into_iter().rev().collect();
        while let Some(w) = stack.pop() {
            out.push(w);
            stack.extend(self.children(w)?.into_iter().rev());
        }
        Ok(out)
    }

    /// Nearest ancestor matching `P`, e.g. `page.ancestor_of_type::<IsContainer>(w)`. Cached per widget and predicate.
    pub fn ancestor_of_type<P: WidgetPredicate>(&self, widget: WidgetId) -> Result<Option<WidgetId>, WidgetError> {
        let node = self.node(widget)?;
        let key = TypeId::of::<P>();
        if let Some(hit) = node.core.ancestor_cache.borrow().get(&key) {
            return Ok(*hit);
        }
        let mut found = None;
        let mut current = node.core.parent;
        while let Some(w) = current {
            let ancestor = self.node(w)?;
            if P::matches(ancestor.kind.as_ref()) {
                found = Some(w);
                break;
            }
            current = ancestor.core.parent;
        }
        node.core.ancestor_cache.borrow_mut().insert(key, found);
        Ok(found)
    }

    /// Moves `widget` into the child slot of `new_parent`. Explicit ids are moved to the new effective id
    /// space (all or nothing), inherited bindings and ancestor caches are dropped, and cached relation paths
    /// are re-validated on next use.
    pub fn set_parent(&mut self, widget: WidgetId, new_parent: WidgetId) -> Result<(), WidgetError> {
        if widget == new_parent || self.children_recursive(widget)?.contains(&new_parent) {
            return Err(WidgetError::Configuration {
                widget: self.node(widget)?.describe(),
                message: "cannot become a child of itself or of its own descendant".into(),
            });
        }
        let slot = self.container_slot(new_parent)?;
        let old_parent = self.node(widget)?.core.parent;
        if old_parent == Some(new_parent) {
            return Ok(());
        }

        self.node_mut(widget)?.core.parent = Some(new_parent);
        if let Err(e) = self.reregister_subtree(widget) {
            self.node_mut(widget)?.core.parent = old_parent;
            return Err(e);
        }
        if !self.node_mut(new_parent)?.kind.attach_child(slot, widget) {
            self.node_mut(widget)?.core.parent = old_parent;
            self.reregister_subtree(widget)?;
            return Err(WidgetError::Configuration {
                widget: self.node(new_parent)?.describe(),
                message: format!("cannot hold children in '{}'", slot),
            });
        }
        if let Some(old) = old_parent {
            self.node_mut(old)?.kind.detach_child(widget);
        }
        if self.root == Some(widget) {
            self.root = None;
        }

        let core = &self.node(widget)?.core;
        if core.inherits_object() {
            core.object_cache.borrow_mut().invalidate();
            self.invalidate_inherited_bindings(widget)?;
        }
        self.node(widget)?.core.ancestor_cache.borrow_mut().clear();
        for w in self.children_recursive(widget)? {
            self.node(w)?.core.ancestor_cache.borrow_mut().clear();
        }
        self.bump_epoch();
        tracing::debug!(widget = %self.node(widget)?.describe(), "widget reparented");
        Ok(())
    }

    /// Same as [`Page::set_parent`].
    pub fn add_child(&mut self, container: WidgetId, child: WidgetId) -> Result<(), WidgetError> {
        self.set_parent(child, container)
    }

    /// The `index`-th child of a container.
    pub fn child_widget(&self, container: WidgetId, index: usize) -> Result<WidgetId, WidgetError> {
        let node = self.node(container)?;
        node.kind
            .as_container()
            .and_then(|c| c.widgets().get(index).copied())
            .ok_or_else(|| WidgetError::ChildNotFound {
                container: node.describe(),
                requested: format!("#{}", index),
            })
    }

    /// A direct child of a container by full or local id.
    pub fn find_child_by_id(&self, container: WidgetId, id: &str) -> Result<WidgetId, WidgetError> {
        let node = self.node(container)?;
        let candidates = node.kind.as_container().map(|c| c.widgets()).unwrap_or_default();
        for child in candidates {
            let core = &self.node(child)?.core;
            if core.id == id || core.id_specified.as_deref() == Some(id) {
                return Ok(child);
            }
        }
        Err(WidgetError::ChildNotFound {
            container: node.describe(),
            requested: id.to_string(),
        })
    }

    /// An independent copy of the widget next to it (same parent), built from its exported config.
    /// Explicit ids are dropped so the copy gets fresh autogenerated ones.
    pub fn copy_widget(&mut self, widget: WidgetId) -> Result<WidgetId, WidgetError> {
        let mut uxon = self.export_uxon(widget)?;
        uxon.unset_property_recursive("id");
        self.recreate(widget, uxon)
    }

    /// Like [`Page::copy_widget`], but keeps explicit ids and places the copy in `id_space`.
    pub fn copy_widget_into_id_space(&mut self, widget: WidgetId, id_space: &str) -> Result<WidgetId, WidgetError> {
        let mut uxon = self.export_uxon(widget)?;
        uxon.set_property("id_space", id_space);
        self.recreate(widget, uxon)
    }

    fn recreate(&mut self, widget: WidgetId, uxon: UxonObject) -> Result<WidgetId, WidgetError> {
        let node = self.node(widget)?;
        let widget_type = node.kind.widget_type();
        match node.core.parent {
            Some(parent) => {
                let slot = self.slot_of(parent, widget)?;
                self.create_in_slot(Some(parent), Some(slot), &uxon, widget_type)
            }
            None => self.create_in_slot(None, None, &uxon, widget_type),
        }
    }

    /// Slot of `parent` holding `child`.
    fn slot_of(&self, parent: WidgetId, child: WidgetId) -> Result<&'static str, WidgetError> {
        let node = self.node(parent)?;
        if let Some(data) = node.kind.as_data() {
            if data.filters().contains(&child) {
                return Ok("filters");
            }
            if data.column_groups().contains(&child) {
                return Ok("column_groups");
            }
        }
        self.container_slot(parent)
    }
}
