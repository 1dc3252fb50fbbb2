//! Relation paths between a widget's object and its parent's object.
//!
//! Paths are computed lazily and stamped with the parent, both object uids and the page epoch. A stamp from
//! an older epoch is checked against the current objects; if they moved, the path is recomputed once.

use crate::error::{ModelError, WidgetError};
use crate::model::{MetaObject, RelationPath, RELATION_SEPARATOR};
use crate::page::Page;
use crate::widget::{PathCache, StampedPath, WidgetCore, WidgetId};
use std::cell::RefCell;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    FromParent,
    ToParent,
}

impl Direction {
    fn cache(self, core: &WidgetCore) -> &RefCell<PathCache> {
        match self {
            Direction::FromParent => &core.path_from_parent_cache,
            Direction::ToParent => &core.path_to_parent_cache,
        }
    }

    /// Path text set in config for this direction.
    fn configured(self, core: &WidgetCore) -> Option<&str> {
        match self {
            Direction::FromParent => core.relation_path_from_parent.as_deref(),
            Direction::ToParent => core.relation_path_to_parent.as_deref(),
        }
    }

    fn opposite(self) -> Direction {
        match self {
            Direction::FromParent => Direction::ToParent,
            Direction::ToParent => Direction::FromParent,
        }
    }
}

impl Page {
    /// Path from the parent's object to this widget's object. `None` without a parent, or if the objects
    /// differ and no direct relation connects them. Chains of several relations are never inferred.
    pub fn relation_path_from_parent(&self, widget: WidgetId) -> Result<Option<RelationPath>, WidgetError> {
        self.resolve_path(widget, Direction::FromParent, false)
    }

    /// Path from this widget's object to the parent's object.
    pub fn relation_path_to_parent(&self, widget: WidgetId) -> Result<Option<RelationPath>, WidgetError> {
        self.resolve_path(widget, Direction::ToParent, false)
    }

    /// Sets the path from the parent explicitly, e.g. `CUSTOMER__ADDRESS`. If the widget inherits its
    /// object, it is rebound to the object at the end of the path.
    pub fn set_relation_path_from_parent(&mut self, widget: WidgetId, path: &str) -> Result<(), WidgetError> {
        let core = &mut self.node_mut(widget)?.core;
        core.relation_path_from_parent = Some(path.to_string());
        *core.path_from_parent_cache.borrow_mut() = PathCache::Textual(path.to_string());
        reset_unless_configured(&core.path_to_parent_cache, core.relation_path_to_parent.as_deref());
        let (inherits, parent) = (core.inherits_object(), core.parent);
        if let (true, Some(parent)) = (inherits, parent) {
            let parsed = RelationPath::parse(self.model(), self.meta_object(parent)?, path)?;
            let end = parsed.end_object().alias_with_namespace();
            self.set_object_alias(widget, &end)?;
        }
        Ok(())
    }

    /// Sets the path to the parent explicitly. If the widget inherits its object, it is rebound to the object
    /// the path starts from.
    pub fn set_relation_path_to_parent(&mut self, widget: WidgetId, path: &str) -> Result<(), WidgetError> {
        let core = &mut self.node_mut(widget)?.core;
        core.relation_path_to_parent = Some(path.to_string());
        *core.path_to_parent_cache.borrow_mut() = PathCache::Textual(path.to_string());
        reset_unless_configured(&core.path_from_parent_cache, core.relation_path_from_parent.as_deref());
        let (inherits, parent) = (core.inherits_object(), core.parent);
        if let (true, Some(parent)) = (inherits, parent) {
            let start = self.walk_back(self.meta_object(parent)?, path)?;
            let alias = start.alias_with_namespace();
            self.set_object_alias(widget, &alias)?;
        }
        Ok(())
    }

    /// Path from `object` to the widget's object: empty for the same object, through the parent chain if an
    /// ancestor is bound to `object`, else a single direct relation. `None` if there is no such path.
    pub fn relation_path_from_object(
        &self,
        widget: WidgetId,
        object: &Arc<MetaObject>,
    ) -> Result<Option<RelationPath>, WidgetError> {
        let own = self.meta_object(widget)?;
        if own.is(object) {
            return Ok(Some(RelationPath::new(own)));
        }
        if let Some(parent) = self.node(widget)?.core.parent {
            if let Some(mut via_parent) = self.relation_path_from_object(parent, object)? {
                if let Some(step) = self.relation_path_from_parent(widget)? {
                    for rel in step.relations() {
                        via_parent.append(self.model(), rel.clone())?;
                    }
                    return Ok(Some(via_parent));
                }
            }
        }
        match self.model().find_relation(object, &own) {
            Some(rel) => {
                let mut path = RelationPath::new(object.clone());
                path.append(self.model(), rel)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    fn resolve_path(&self, widget: WidgetId, dir: Direction, retried: bool) -> Result<Option<RelationPath>, WidgetError> {
        let node = self.node(widget)?;
        let Some(parent) = node.core.parent else {
            return Ok(None);
        };
        let cell = dir.cache(&node.core);
        let state = cell.borrow().clone();
        match state {
            PathCache::Resolved(stamped) => {
                if stamped.parent == parent && stamped.epoch == self.epoch {
                    return Ok(stamped.path);
                }
                let parent_object = self.meta_object(parent)?;
                let own_object = self.meta_object(widget)?;
                if stamped.parent == parent
                    && stamped.parent_object_id == parent_object.id
                    && stamped.own_object_id == own_object.id
                {
                    let path = stamped.path.clone();
                    *cell.borrow_mut() = PathCache::Resolved(StampedPath {
                        epoch: self.epoch,
                        ..stamped
                    });
                    return Ok(path);
                }
                if retried {
                    return self.compute_path(widget, parent, dir);
                }
                tracing::debug!(widget = %node.describe(), direction = ?dir, "relation path is stale");
                *cell.borrow_mut() = match dir.configured(&node.core) {
                    Some(text) => PathCache::Textual(text.to_string()),
                    None => PathCache::Stale,
                };
                self.resolve_path(widget, dir, true)
            }
            PathCache::Textual(text) => {
                let parent_object = self.meta_object(parent)?;
                let own_object = self.meta_object(widget)?;
                let start = match dir {
                    Direction::FromParent => parent_object.clone(),
                    Direction::ToParent => own_object.clone(),
                };
                let path = RelationPath::parse(self.model(), start, &text)?;
                *cell.borrow_mut() = PathCache::Resolved(StampedPath {
                    path: Some(path.clone()),
                    parent,
                    parent_object_id: parent_object.id.clone(),
                    own_object_id: own_object.id.clone(),
                    epoch: self.epoch,
                });
                Ok(Some(path))
            }
            PathCache::Unresolved | PathCache::Stale => self.compute_path(widget, parent, dir),
        }
    }

    fn compute_path(&self, widget: WidgetId, parent: WidgetId, dir: Direction) -> Result<Option<RelationPath>, WidgetError> {
        let node = self.node(widget)?;
        let parent_object = self.meta_object(parent)?;
        let own_object = self.meta_object(widget)?;
        let (start, end) = match dir {
            Direction::FromParent => (parent_object.clone(), own_object.clone()),
            Direction::ToParent => (own_object.clone(), parent_object.clone()),
        };
        let path = if start.is(&end) {
            Some(RelationPath::new(start))
        } else if let Some(reversed) = self.reusable_opposite(&node.core, dir, parent, &parent_object, &own_object) {
            Some(reversed)
        } else if let Some(rel) = self.model().find_relation(&start, &end) {
            let mut path = RelationPath::new(start);
            path.append(self.model(), rel)?;
            Some(path)
        } else {
            tracing::warn!(
                widget = %node.describe(),
                from = %start.alias_with_namespace(),
                to = %end.alias_with_namespace(),
                "no direct relation between widget and parent objects"
            );
            None
        };
        *dir.cache(&node.core).borrow_mut() = PathCache::Resolved(StampedPath {
            path: path.clone(),
            parent,
            parent_object_id: parent_object.id.clone(),
            own_object_id: own_object.id.clone(),
            epoch: self.epoch,
        });
        Ok(path)
    }

    /// The opposite path reversed, if it is cached for the same parent and objects.
    fn reusable_opposite(
        &self,
        core: &WidgetCore,
        dir: Direction,
        parent: WidgetId,
        parent_object: &MetaObject,
        own_object: &MetaObject,
    ) -> Option<RelationPath> {
        match &*dir.opposite().cache(core).borrow() {
            PathCache::Resolved(s)
                if s.parent == parent && s.parent_object_id == parent_object.id && s.own_object_id == own_object.id =>
            {
                s.path.as_ref().map(RelationPath::reversed)
            }
            _ => None,
        }
    }

    /// Object a path-to-parent text starts from, found by walking its reverse aliases back from the parent.
    fn walk_back(&self, parent_object: Arc<MetaObject>, path: &str) -> Result<Arc<MetaObject>, WidgetError> {
        let mut current = parent_object;
        let aliases: Vec<&str> = path.split(RELATION_SEPARATOR).filter(|s| !s.is_empty()).collect();
        for alias in aliases.into_iter().rev() {
            let rel = current
                .relations
                .iter()
                .find(|r| r.reverse_alias == alias)
                .ok_or_else(|| ModelError::RelationNotFound {
                    object: current.alias_with_namespace(),
                    alias: alias.to_string(),
                })?;
            let next = self.model().object_by_id(&rel.right_object_id)?;
            current = next;
        }
        Ok(current)
    }
}

/// Drops a computed path so it is re-derived, keeping paths that came from config.
fn reset_unless_configured(cache: &RefCell<PathCache>, configured: Option<&str>) {
    *cache.borrow_mut() = match configured {
        Some(text) => PathCache::Textual(text.to_string()),
        None => PathCache::Unresolved,
    };
}
