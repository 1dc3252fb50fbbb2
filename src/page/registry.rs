//! Page-wide widget id registry, scoped by id space.

use crate::error::WidgetError;
use crate::widget::WidgetId;
use regex::Regex;
use std::collections::HashMap;

/// Local widget ids: a letter or `_`, then letters, digits, `_` or `-`.
const LOCAL_ID_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_\-]*$";

#[derive(Clone, Debug)]
struct Entry {
    widget: WidgetId,
    id_space: String,
}

#[derive(Clone, Debug, Default)]
pub struct IdRegistry {
    by_id: HashMap<String, Entry>,
}

impl IdRegistry {
    pub fn new() -> Self {
        IdRegistry { by_id: HashMap::new() }
    }

    /// Registers `id` for `widget`. Fails if another widget already holds it.
    pub fn register(&mut self, id: &str, id_space: &str, widget: WidgetId) -> Result<(), WidgetError> {
        if let Some(existing) = self.by_id.get(id) {
            if existing.widget != widget {
                return Err(WidgetError::IdConflict {
                    id: id.to_string(),
                    id_space: id_space.to_string(),
                });
            }
        }
        tracing::trace!(id, id_space, "widget id registered");
        self.by_id.insert(
            id.to_string(),
            Entry {
                widget,
                id_space: id_space.to_string(),
            },
        );
        Ok(())
    }

    pub fn deregister(&mut self, id: &str) -> Option<WidgetId> {
        self.by_id.remove(id).map(|e| e.widget)
    }

    pub fn get(&self, id: &str) -> Option<WidgetId> {
        self.by_id.get(id).map(|e| e.widget)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn ids_in_space(&self, id_space: &str) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .by_id
            .iter()
            .filter(|(_, e)| e.id_space == id_space)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

pub fn validate_local_id(id: &str) -> Result<(), WidgetError> {
    let re = Regex::new(LOCAL_ID_PATTERN).map_err(|e| WidgetError::InvalidId(e.to_string()))?;
    if !re.is_match(id) {
        return Err(WidgetError::InvalidId(format!(
            "'{}' must start with a letter or '_' and contain only letters, digits, '_' or '-'",
            id
        )));
    }
    Ok(())
}

/// Full page id for a local id inside an id space.
pub fn compose_id(id_space: &str, separator: &str, local_id: &str) -> String {
    if id_space.is_empty() {
        local_id.to_string()
    } else {
        format!("{}{}{}", id_space, separator, local_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn conflicts_only_between_different_widgets() {
        let mut keys: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let (a, b) = (keys.insert(()), keys.insert(()));
        let mut reg = IdRegistry::new();
        reg.register("btn1", "", a).unwrap();
        reg.register("btn1", "", a).unwrap();
        assert!(matches!(reg.register("btn1", "", b), Err(WidgetError::IdConflict { .. })));
        assert_eq!(reg.get("btn1"), Some(a));
        reg.register("dlg.btn1", "dlg", b).unwrap();
        assert_eq!(reg.ids_in_space("dlg"), vec!["dlg.btn1"]);
        assert_eq!(reg.deregister("btn1"), Some(a));
        assert!(!reg.contains("btn1"));
    }

    #[test]
    fn local_ids_are_validated() {
        assert!(validate_local_id("btn_1-a").is_ok());
        assert!(validate_local_id("1btn").is_err());
        assert!(validate_local_id("a.b").is_err());
        assert_eq!(compose_id("", ".", "x"), "x");
        assert_eq!(compose_id("dlg", ".", "x"), "dlg.x");
    }
}
