//! Explicit state machines for lazily resolved, invalidatable widget caches.

use crate::model::{MetaObject, RelationPath};
use crate::widget::WidgetId;
use std::sync::Arc;

/// A lazily computed value. `Stale` marks a value that was resolved once and then invalidated.
#[derive(Clone, Debug, Default)]
pub enum Cached<T> {
    #[default]
    Unresolved,
    Resolved(T),
    Stale,
}

impl<T> Cached<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            Cached::Resolved(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Cached::Resolved(_))
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Cached::Stale)
    }

    /// Resolved values become stale; unresolved ones stay unresolved.
    pub fn invalidate(&mut self) {
        if self.is_resolved() {
            *self = Cached::Stale;
        }
    }
}

/// The meta object a widget resolved to, and whether it came from the parent.
#[derive(Clone, Debug)]
pub struct ResolvedObject {
    pub object: Arc<MetaObject>,
    pub inherited: bool,
}

/// A relation path computed against a specific parent, stamped with what it was computed from.
#[derive(Clone, Debug)]
pub struct StampedPath {
    /// `None` when the objects differ and no direct relation exists.
    pub path: Option<RelationPath>,
    pub parent: WidgetId,
    pub parent_object_id: String,
    pub own_object_id: String,
    /// Page binding epoch at the time of the last successful validation.
    pub epoch: u64,
}

#[derive(Clone, Debug, Default)]
pub enum PathCache {
    #[default]
    Unresolved,
    /// Path text from config, not yet materialized against the current objects.
    Textual(String),
    Resolved(StampedPath),
    Stale,
}

impl PathCache {
    pub fn is_stale(&self) -> bool {
        matches!(self, PathCache::Stale)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, PathCache::Resolved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidation_only_affects_resolved_values() {
        let mut c: Cached<u8> = Cached::Unresolved;
        c.invalidate();
        assert!(matches!(c, Cached::Unresolved));
        c = Cached::Resolved(3);
        assert_eq!(c.get(), Some(&3));
        c.invalidate();
        assert!(c.is_stale());
        assert_eq!(c.get(), None);
    }
}
