//! Concrete widget kinds.

mod columns;
mod combo_table;
mod container;
mod data;
mod filter;
mod map;
mod value;

pub use columns::{DataColumn, DataColumnGroup};
pub use combo_table::InputComboTable;
pub use container::Panel;
pub use data::Data;
pub use filter::Filter;
pub use map::Map;
pub use value::{Input, Value, ValueBinding};

use crate::model::RelationPath;
use crate::sheet::{AggregateFunction, AGGREGATOR_SEPARATOR};
use crate::uxon::UxonObject;
use serde_json::Value as JsonValue;

/// Child widget configs: an array of objects or a single object.
pub(crate) fn child_configs(value: &JsonValue) -> Result<Vec<UxonObject>, String> {
    match value {
        JsonValue::Array(items) => items
            .iter()
            .map(|v| UxonObject::from_value(v.clone()).ok_or_else(|| format!("expected a widget object, got {}", v)))
            .collect(),
        JsonValue::Object(_) => Ok(UxonObject::from_value(value.clone()).into_iter().collect()),
        other => Err(format!("expected widget objects, got {}", other)),
    }
}

/// Sheet column expression for an attribute of the path's end object, seen from its start object.
pub(crate) fn column_expression(path: &RelationPath, alias: &str, aggregator: Option<AggregateFunction>) -> String {
    let prefixed = path.prefix_alias(alias);
    match aggregator {
        Some(f) => format!("{}{}{}", prefixed, AGGREGATOR_SEPARATOR, f),
        None => prefixed,
    }
}
