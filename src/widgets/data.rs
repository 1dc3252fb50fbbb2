//! Data widget: a table-like view of many rows of one object.

use crate::error::WidgetError;
use crate::model::MetaObject;
use crate::page::Page;
use crate::sheet::{is_empty_value, Comparator, DataSheet, Sorter};
use crate::uxon::UxonObject;
use crate::widget::base::expect_bool;
use crate::widget::{DataWidget, Imported, PrefillAction, Widget, WidgetId};
use crate::widgets::child_configs;
use serde_json::Value as JsonValue;
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
pub struct Data {
    column_groups: Vec<WidgetId>,
    filters: Vec<WidgetId>,
    sorters: Vec<Sorter>,
    aggregate_by: Vec<String>,
    paginate: bool,
}

impl Default for Data {
    fn default() -> Self {
        Data {
            column_groups: Vec::new(),
            filters: Vec::new(),
            sorters: Vec::new(),
            aggregate_by: Vec::new(),
            paginate: true,
        }
    }
}

/// How rows of a foreign object restrict this widget's object.
#[derive(Debug)]
struct ForeignKey {
    /// Attribute of this widget's object to filter on.
    filter_alias: String,
    /// Attribute of the foreign object holding the matching key.
    key_alias: String,
    /// A filter already scoped to the foreign object.
    existing_filter: Option<WidgetId>,
}

impl Data {
    pub fn sorters(&self) -> &[Sorter] {
        &self.sorters
    }

    pub fn aggregate_by(&self) -> &[String] {
        &self.aggregate_by
    }

    pub fn paginate(&self) -> bool {
        self.paginate
    }

    fn find_filter(&self, page: &Page, alias: &str, comparator: Comparator) -> Result<Option<WidgetId>, WidgetError> {
        for f in &self.filters {
            let Some(filter) = page.node(*f)?.kind.as_filter() else {
                continue;
            };
            if filter.attribute_alias() == Some(alias) && filter.comparator() == comparator {
                return Ok(Some(*f));
            }
        }
        Ok(None)
    }

    /// Relates a foreign object to ours: a filter over a relation to it, else a direct relation.
    fn foreign_key(&self, page: &Page, own: &MetaObject, foreign: &Arc<MetaObject>) -> Result<Option<ForeignKey>, WidgetError> {
        for f in &self.filters {
            let Some(alias) = page.node(*f)?.kind.as_filter().and_then(|x| x.attribute_alias()) else {
                continue;
            };
            if let Some(rel) = own.relation_for_attribute(alias) {
                if rel.right_object_id == foreign.id {
                    return Ok(Some(ForeignKey {
                        filter_alias: alias.to_string(),
                        key_alias: rel.right_key_attribute.clone(),
                        existing_filter: Some(*f),
                    }));
                }
            }
        }
        Ok(page.model().find_relation(own, foreign).map(|rel| ForeignKey {
            filter_alias: rel.left_key_attribute,
            key_alias: rel.right_key_attribute,
            existing_filter: None,
        }))
    }

    fn reconcile_conditions(&self, page: &Page, id: WidgetId, sheet: &DataSheet) -> Result<Vec<PrefillAction>, WidgetError> {
        let mut actions = Vec::new();
        for cond in sheet.filters().conjunctive_conditions() {
            match self.find_filter(page, &cond.expression, cond.comparator)? {
                Some(filter) => actions.push(PrefillAction::SetValue {
                    widget: filter,
                    value: cond.value.clone(),
                }),
                None => actions.push(PrefillAction::AddFilter {
                    data: id,
                    attribute_alias: cond.expression.clone(),
                    comparator: cond.comparator,
                    value: cond.value.clone(),
                }),
            }
        }
        Ok(actions)
    }

    fn filter_by_foreign_rows(&self, page: &Page, id: WidgetId, own: &MetaObject, sheet: &DataSheet) -> Result<Vec<PrefillAction>, WidgetError> {
        let Some(key) = self.foreign_key(page, own, sheet.meta_object())? else {
            tracing::warn!(
                widget = %page.node(id)?.describe(),
                sheet_object = %sheet.meta_object().alias_with_namespace(),
                "no direct relation to prefill object, data left unfiltered"
            );
            return Ok(Vec::new());
        };
        let Some(column) = sheet.column_by_expression(&key.key_alias) else {
            return Ok(Vec::new());
        };
        let mut keys: Vec<JsonValue> = Vec::new();
        for v in sheet.column_values(&column.name) {
            if !is_empty_value(&v) && !keys.contains(&v) {
                keys.push(v);
            }
        }
        let (comparator, value) = match keys.len() {
            0 => return Ok(Vec::new()),
            1 => (Comparator::Equals, keys.remove(0)),
            _ => (Comparator::In, JsonValue::Array(keys)),
        };
        let action = match key.existing_filter {
            Some(filter) => PrefillAction::SetFilter {
                filter,
                comparator,
                value,
            },
            None => PrefillAction::AddFilter {
                data: id,
                attribute_alias: key.filter_alias,
                comparator,
                value,
            },
        };
        Ok(vec![action])
    }
}

impl DataWidget for Data {
    fn column_groups(&self) -> &[WidgetId] {
        &self.column_groups
    }

    fn filters(&self) -> &[WidgetId] {
        &self.filters
    }

    fn add_filter(&mut self, filter: WidgetId) {
        if !self.filters.contains(&filter) {
            self.filters.push(filter);
        }
    }
}

impl Widget for Data {
    fn widget_type(&self) -> &'static str {
        "Data"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn children(&self) -> Vec<WidgetId> {
        self.column_groups.iter().chain(&self.filters).copied().collect()
    }

    fn attach_child(&mut self, slot: &str, child: WidgetId) -> bool {
        match slot {
            "column_groups" => self.column_groups.push(child),
            "filters" => self.add_filter(child),
            _ => return false,
        }
        true
    }

    fn detach_child(&mut self, child: WidgetId) -> bool {
        let before = self.column_groups.len() + self.filters.len();
        self.column_groups.retain(|w| *w != child);
        self.filters.retain(|w| *w != child);
        before != self.column_groups.len() + self.filters.len()
    }

    fn import_property(&mut self, key: &str, value: &JsonValue) -> Result<Imported, String> {
        match key {
            "columns" => {
                let mut group = UxonObject::new();
                group.set_property("columns", value.clone());
                Ok(Imported::Children {
                    slot: "column_groups",
                    configs: vec![group],
                    default_type: "DataColumnGroup",
                })
            }
            "column_groups" => Ok(Imported::Children {
                slot: "column_groups",
                configs: child_configs(value)?,
                default_type: "DataColumnGroup",
            }),
            "filters" => Ok(Imported::Children {
                slot: "filters",
                configs: child_configs(value)?,
                default_type: "Filter",
            }),
            "sorters" => {
                self.sorters = serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
                Ok(Imported::Done)
            }
            "aggregate_by_attribute_alias" => {
                self.aggregate_by = match value {
                    JsonValue::String(s) => s.split(',').map(|a| a.trim().to_string()).filter(|a| !a.is_empty()).collect(),
                    other => serde_json::from_value(other.clone()).map_err(|e| e.to_string())?,
                };
                Ok(Imported::Done)
            }
            "paginate" => {
                self.paginate = expect_bool(value)?;
                Ok(Imported::Done)
            }
            _ => Ok(Imported::Unknown),
        }
    }

    /// A single group without settings of its own is written back as plain `columns`.
    fn export_properties(&self, page: &Page, uxon: &mut UxonObject) -> Result<(), WidgetError> {
        let mut groups = self
            .column_groups
            .iter()
            .map(|g| page.export_uxon(*g))
            .collect::<Result<Vec<_>, _>>()?;
        let plain_group = groups.len() == 1
            && groups[0]
                .property_names()
                .iter()
                .all(|k| k == "widget_type" || k == "columns");
        if plain_group {
            if let Some(columns) = groups[0].unset_property("columns") {
                uxon.set_property("columns", columns);
            }
        } else if !groups.is_empty() {
            for g in groups.iter_mut() {
                if g.property_str("widget_type") == Some("DataColumnGroup") {
                    g.unset_property("widget_type");
                }
            }
            uxon.set_objects("column_groups", groups);
        }
        if !self.filters.is_empty() {
            let filters = self
                .filters
                .iter()
                .map(|f| page.export_uxon(*f))
                .collect::<Result<Vec<_>, _>>()?;
            uxon.set_objects("filters", filters);
        }
        if !self.sorters.is_empty() {
            uxon.set_property("sorters", serde_json::to_value(&self.sorters)?);
        }
        if !self.aggregate_by.is_empty() {
            uxon.set_property("aggregate_by_attribute_alias", self.aggregate_by.clone());
        }
        if !self.paginate {
            uxon.set_property("paginate", false);
        }
        Ok(())
    }

    fn as_data(&self) -> Option<&dyn DataWidget> {
        Some(self)
    }

    fn as_data_mut(&mut self) -> Option<&mut dyn DataWidget> {
        Some(self)
    }

    /// Only sheets of the widget's own object are extended: uid, columns, active filters, sorters and
    /// aggregation.
    fn prepare_data_sheet_to_read(&self, page: &Page, id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        let own = page.meta_object(id)?;
        if !sheet.meta_object().is(&own) {
            return Ok(sheet);
        }
        let mut sheet = self
            .column_groups
            .iter()
            .try_fold(sheet, |sheet, g| page.prepare_data_sheet_to_read(*g, Some(sheet)))?;
        if self.aggregate_by.is_empty() {
            if let Some(uid) = &own.uid_attribute {
                sheet.add_hidden_column(uid);
            }
        }
        for f in &self.filters {
            if let Some(condition) = page.filter_condition(*f)? {
                sheet.add_filter(condition);
            }
        }
        for s in &self.sorters {
            sheet.add_sorter(s.clone());
        }
        for a in &self.aggregate_by {
            sheet.add_aggregation(a);
        }
        Ok(sheet)
    }

    /// A sheet of another object gets the key column needed to filter this widget by its rows.
    fn prepare_data_sheet_to_prefill(&self, page: &Page, id: WidgetId, mut sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        let own = page.meta_object(id)?;
        if sheet.meta_object().is(&own) {
            return Ok(sheet);
        }
        match self.foreign_key(page, &own, sheet.meta_object())? {
            Some(key) => {
                sheet.add_hidden_column(&key.key_alias);
            }
            None => tracing::warn!(
                widget = %page.node(id)?.describe(),
                sheet_object = %sheet.meta_object().alias_with_namespace(),
                "no direct relation to prefill object"
            ),
        }
        Ok(sheet)
    }

    fn do_prefill(&self, page: &Page, id: WidgetId, sheet: &DataSheet) -> Result<Vec<PrefillAction>, WidgetError> {
        let own = page.meta_object(id)?;
        if sheet.meta_object().is(&own) {
            self.reconcile_conditions(page, id, sheet)
        } else {
            self.filter_by_foreign_rows(page, id, &own, sheet)
        }
    }
}
