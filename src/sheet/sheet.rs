//! DataSheet: the tabular read request / result widgets write requirements into and read prefill data from.

use crate::model::MetaObject;
use crate::sheet::aggregator::{split_aggregator, AggregateFunction};
use crate::sheet::condition::{Condition, ConditionGroup};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub struct SheetColumn {
    pub name: String,
    /// Attribute alias (with relation path and aggregator suffix), or a formula.
    pub expression: String,
    pub hidden: bool,
    pub totals: Vec<AggregateFunction>,
}

impl SheetColumn {
    pub fn attribute_alias(&self) -> &str {
        split_aggregator(&self.expression).0
    }

    pub fn aggregator(&self) -> Option<AggregateFunction> {
        split_aggregator(&self.expression).1
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sorter {
    pub attribute_alias: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Clone, Debug)]
pub struct DataSheet {
    object: Arc<MetaObject>,
    columns: Vec<SheetColumn>,
    filters: ConditionGroup,
    sorters: Vec<Sorter>,
    aggregate_by: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

/// Column name for an expression: anything but ASCII alphanumerics and `_` becomes `_`.
pub fn column_name_for(expression: &str) -> String {
    expression
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

impl DataSheet {
    pub fn new(object: Arc<MetaObject>) -> Self {
        DataSheet {
            object,
            columns: Vec::new(),
            filters: ConditionGroup::default(),
            sorters: Vec::new(),
            aggregate_by: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn meta_object(&self) -> &Arc<MetaObject> {
        &self.object
    }

    pub fn columns(&self) -> &[SheetColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&SheetColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_by_expression(&self, expression: &str) -> Option<&SheetColumn> {
        self.columns.iter().find(|c| c.expression == expression)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Adds a visible column for `expression` and returns its name. Existing columns are reused.
    pub fn add_column(&mut self, expression: &str) -> String {
        self.add_column_inner(expression, false)
    }

    /// Adds a hidden column (e.g. keys needed for relations). A visible column with the same expression wins.
    pub fn add_hidden_column(&mut self, expression: &str) -> String {
        self.add_column_inner(expression, true)
    }

    fn add_column_inner(&mut self, expression: &str, hidden: bool) -> String {
        if let Some(existing) = self.columns.iter_mut().find(|c| c.expression == expression) {
            existing.hidden &= hidden;
            return existing.name.clone();
        }
        let name = column_name_for(expression);
        self.columns.push(SheetColumn {
            name: name.clone(),
            expression: expression.to_string(),
            hidden,
            totals: Vec::new(),
        });
        name
    }

    /// Requests a total (footer) for a column. Returns false if the column does not exist.
    pub fn add_column_total(&mut self, column_name: &str, function: AggregateFunction) -> bool {
        match self.columns.iter_mut().find(|c| c.name == column_name) {
            Some(col) => {
                if !col.totals.contains(&function) {
                    col.totals.push(function);
                }
                true
            }
            None => false,
        }
    }

    pub fn filters(&self) -> &ConditionGroup {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut ConditionGroup {
        &mut self.filters
    }

    pub fn add_filter(&mut self, condition: Condition) -> bool {
        self.filters.add_condition(condition)
    }

    pub fn sorters(&self) -> &[Sorter] {
        &self.sorters
    }

    pub fn add_sorter(&mut self, sorter: Sorter) {
        if !self.sorters.iter().any(|s| s.attribute_alias == sorter.attribute_alias) {
            self.sorters.push(sorter);
        }
    }

    pub fn aggregate_by(&self) -> &[String] {
        &self.aggregate_by
    }

    pub fn add_aggregation(&mut self, attribute_alias: &str) {
        if !self.aggregate_by.iter().any(|a| a == attribute_alias) {
            self.aggregate_by.push(attribute_alias.to_string());
        }
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn add_row(&mut self, row: Map<String, Value>) {
        self.rows.push(row);
    }

    /// Adds rows from a JSON array of objects; non-object entries are skipped.
    pub fn add_rows_from_json(&mut self, rows: &Value) {
        if let Value::Array(items) = rows {
            for item in items {
                if let Value::Object(map) = item {
                    self.rows.push(map.clone());
                }
            }
        }
    }

    pub fn remove_rows(&mut self) {
        self.rows.clear();
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell_value(&self, column_name: &str, row: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column_name))
    }

    /// All values of a column, with `Null` for rows lacking it.
    pub fn column_values(&self, column_name: &str) -> Vec<Value> {
        self.rows
            .iter()
            .map(|r| r.get(column_name).cloned().unwrap_or(Value::Null))
            .collect()
    }

    /// Name of the column holding the object's uid, if the sheet has one.
    pub fn uid_column_name(&self) -> Option<String> {
        let uid = self.object.uid_attribute.as_deref()?;
        self.column_by_expression(uid).map(|c| c.name.clone())
    }

    /// Plain JSON description, for logging and inspection.
    pub fn to_json(&self) -> Value {
        json!({
            "object_alias": self.object.alias_with_namespace(),
            "columns": self.columns.iter().map(|c| {
                let mut col = json!({"name": c.name, "expression": c.expression});
                if c.hidden {
                    col["hidden"] = Value::Bool(true);
                }
                if !c.totals.is_empty() {
                    col["totals"] = json!(c.totals);
                }
                col
            }).collect::<Vec<_>>(),
            "filters": self.filters,
            "sorters": self.sorters,
            "aggregate_by": self.aggregate_by,
            "rows": self.rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetaObject;
    use crate::sheet::Comparator;

    fn customer() -> Arc<MetaObject> {
        Arc::new(MetaObject {
            id: "c".into(),
            namespace: "shop".into(),
            alias: "CUSTOMER".into(),
            name: "Customer".into(),
            uid_attribute: Some("ID".into()),
            label_attribute: Some("NAME".into()),
            attributes: vec![],
            relations: vec![],
        })
    }

    #[test]
    fn columns_are_deduplicated_and_visible_wins() {
        let mut sheet = DataSheet::new(customer());
        assert_eq!(sheet.add_hidden_column("ID"), "ID");
        assert_eq!(sheet.add_column("ID"), "ID");
        assert_eq!(sheet.columns().len(), 1);
        assert!(!sheet.columns()[0].hidden);
        assert_eq!(sheet.add_column("ORDER__AMOUNT:SUM"), "ORDER__AMOUNT_SUM");
        assert_eq!(sheet.columns()[1].aggregator(), Some(AggregateFunction::Sum));
        assert_eq!(sheet.columns()[1].attribute_alias(), "ORDER__AMOUNT");
    }

    #[test]
    fn reads_cells_and_uid_column() {
        let mut sheet = DataSheet::new(customer());
        assert_eq!(sheet.uid_column_name(), None);
        sheet.add_column("ID");
        sheet.add_rows_from_json(&json!([{"ID": 7}, {"NAME": "x"}]));
        assert_eq!(sheet.uid_column_name().as_deref(), Some("ID"));
        assert_eq!(sheet.cell_value("ID", 0), Some(&json!(7)));
        assert_eq!(sheet.column_values("ID"), vec![json!(7), Value::Null]);
    }

    #[test]
    fn totals_need_an_existing_column() {
        let mut sheet = DataSheet::new(customer());
        assert!(!sheet.add_column_total("ID", AggregateFunction::Count));
        sheet.add_column("ID");
        assert!(sheet.add_column_total("ID", AggregateFunction::Count));
        sheet.add_filter(Condition::new("ID", Comparator::Equals, json!(1)));
        assert_eq!(sheet.to_json()["columns"][0]["totals"], json!(["COUNT"]));
    }
}
