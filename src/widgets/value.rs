//! Single-value widgets: read-only `Value` and editable `Input`.

use crate::error::WidgetError;
use crate::expression::Expression;
use crate::page::Page;
use crate::sheet::{is_empty_value, split_aggregator, AggregateFunction, DataSheet};
use crate::uxon::UxonObject;
use crate::widget::base::{expect_bool, expect_str};
use crate::widget::{Imported, PrefillAction, ValueWidget, Widget, WidgetId};
use crate::widgets::column_expression;
use serde_json::Value as JsonValue;
use std::any::Any;

/// The attribute a value widget shows and the value it currently holds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueBinding {
    pub attribute_alias: Option<String>,
    pub aggregate_function: Option<AggregateFunction>,
    pub value: Expression,
    pub empty_text: Option<String>,
}

impl ValueBinding {
    /// `attribute_alias` may carry an aggregator suffix, e.g. `POSITION__AMOUNT:SUM`.
    pub(crate) fn import_property(&mut self, key: &str, value: &JsonValue) -> Result<bool, String> {
        match key {
            "attribute_alias" => {
                let (alias, aggregator) = split_aggregator(expect_str(value)?);
                self.attribute_alias = Some(alias.to_string());
                if aggregator.is_some() {
                    self.aggregate_function = aggregator;
                }
            }
            "aggregate_function" => self.aggregate_function = Some(expect_str(value)?.parse()?),
            "value" => self.value = Expression::parse_value(value),
            "empty_text" => self.empty_text = Some(expect_str(value)?.to_string()),
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(crate) fn export_properties(&self, uxon: &mut UxonObject) {
        if let Some(alias) = &self.attribute_alias {
            uxon.set_property("attribute_alias", alias.as_str());
        }
        if let Some(f) = self.aggregate_function {
            uxon.set_property("aggregate_function", f.as_str());
        }
        if !self.value.is_empty() {
            uxon.set_property("value", self.value.to_value());
        }
        if let Some(t) = &self.empty_text {
            uxon.set_property("empty_text", t.as_str());
        }
    }

    /// Sheet column for the bound attribute, if the widget's object is reachable from the sheet's object.
    /// Paths over 1:n relations are only usable with an aggregator.
    pub(crate) fn column_for(&self, page: &Page, id: WidgetId, sheet: &DataSheet) -> Result<Option<String>, WidgetError> {
        let Some(alias) = &self.attribute_alias else {
            return Ok(None);
        };
        let Some(path) = page.relation_path_from_object(id, sheet.meta_object())? else {
            tracing::warn!(
                widget = %page.node(id)?.describe(),
                sheet_object = %sheet.meta_object().alias_with_namespace(),
                "attribute not reachable from sheet object"
            );
            return Ok(None);
        };
        if self.aggregate_function.is_none() && path.relations().iter().any(|r| r.is_reverse()) {
            return Ok(None);
        }
        Ok(Some(column_expression(&path, alias, self.aggregate_function)))
    }

    pub(crate) fn prepare(&self, page: &Page, id: WidgetId, mut sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        if let Some(expr) = self.column_for(page, id, &sheet)? {
            sheet.add_column(&expr);
        }
        Ok(sheet)
    }

    /// Value for this widget from the sheet: the single row's cell, or the aggregate over several rows.
    /// Several rows without an aggregator give nothing.
    pub(crate) fn value_from(&self, page: &Page, id: WidgetId, sheet: &DataSheet, expression: &str) -> Result<Option<JsonValue>, WidgetError> {
        let Some(column) = sheet.column_by_expression(expression) else {
            return Ok(None);
        };
        let value = match (sheet.row_count(), self.aggregate_function) {
            (0, _) => None,
            (1, _) => sheet.cell_value(&column.name, 0).cloned(),
            (_, Some(f)) => Some(f.apply(&sheet.column_values(&column.name))),
            (rows, None) => {
                tracing::warn!(
                    widget = %page.node(id)?.describe(),
                    rows,
                    "several prefill rows and no aggregator, value left unchanged"
                );
                None
            }
        };
        Ok(value)
    }

    pub(crate) fn prefill(&self, page: &Page, id: WidgetId, sheet: &DataSheet) -> Result<Vec<PrefillAction>, WidgetError> {
        let Some(expr) = self.column_for(page, id, sheet)? else {
            return Ok(Vec::new());
        };
        match self.value_from(page, id, sheet, &expr)? {
            Some(value) if !(self.value.is_reference() && is_empty_value(&value)) => {
                Ok(vec![PrefillAction::SetValue { widget: id, value }])
            }
            _ => Ok(Vec::new()),
        }
    }
}

/// Read-only display of one value.
#[derive(Debug, Default)]
pub struct Value {
    binding: ValueBinding,
}

impl Value {
    pub fn binding(&self) -> &ValueBinding {
        &self.binding
    }
}

impl ValueWidget for Value {
    fn attribute_alias(&self) -> Option<&str> {
        self.binding.attribute_alias.as_deref()
    }

    fn aggregate_function(&self) -> Option<AggregateFunction> {
        self.binding.aggregate_function
    }

    fn value(&self) -> &Expression {
        &self.binding.value
    }

    fn set_value(&mut self, value: Expression) {
        self.binding.value = value;
    }
}

impl Widget for Value {
    fn widget_type(&self) -> &'static str {
        "Value"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn import_property(&mut self, key: &str, value: &JsonValue) -> Result<Imported, String> {
        if self.binding.import_property(key, value)? {
            return Ok(Imported::Done);
        }
        Ok(Imported::Unknown)
    }

    fn export_properties(&self, _page: &Page, uxon: &mut UxonObject) -> Result<(), WidgetError> {
        self.binding.export_properties(uxon);
        Ok(())
    }

    fn as_value(&self) -> Option<&dyn ValueWidget> {
        Some(self)
    }

    fn as_value_mut(&mut self) -> Option<&mut dyn ValueWidget> {
        Some(self)
    }

    fn prepare_data_sheet_to_read(&self, page: &Page, id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        self.binding.prepare(page, id, sheet)
    }

    fn prepare_data_sheet_to_prefill(&self, page: &Page, id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        self.binding.prepare(page, id, sheet)
    }

    fn do_prefill(&self, page: &Page, id: WidgetId, sheet: &DataSheet) -> Result<Vec<PrefillAction>, WidgetError> {
        self.binding.prefill(page, id, sheet)
    }
}

/// Editable single value.
#[derive(Debug, Default)]
pub struct Input {
    binding: ValueBinding,
    required: bool,
    readonly: bool,
}

impl Input {
    pub fn binding(&self) -> &ValueBinding {
        &self.binding
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }
}

impl ValueWidget for Input {
    fn attribute_alias(&self) -> Option<&str> {
        self.binding.attribute_alias.as_deref()
    }

    fn aggregate_function(&self) -> Option<AggregateFunction> {
        self.binding.aggregate_function
    }

    fn value(&self) -> &Expression {
        &self.binding.value
    }

    fn set_value(&mut self, value: Expression) {
        self.binding.value = value;
    }
}

impl Widget for Input {
    fn widget_type(&self) -> &'static str {
        "Input"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn import_property(&mut self, key: &str, value: &JsonValue) -> Result<Imported, String> {
        match key {
            "required" => self.required = expect_bool(value)?,
            "readonly" => self.readonly = expect_bool(value)?,
            _ if self.binding.import_property(key, value)? => {}
            _ => return Ok(Imported::Unknown),
        }
        Ok(Imported::Done)
    }

    fn export_properties(&self, _page: &Page, uxon: &mut UxonObject) -> Result<(), WidgetError> {
        self.binding.export_properties(uxon);
        if self.required {
            uxon.set_property("required", true);
        }
        if self.readonly {
            uxon.set_property("readonly", true);
        }
        Ok(())
    }

    fn as_value(&self) -> Option<&dyn ValueWidget> {
        Some(self)
    }

    fn as_value_mut(&mut self) -> Option<&mut dyn ValueWidget> {
        Some(self)
    }

    fn prepare_data_sheet_to_read(&self, page: &Page, id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        self.binding.prepare(page, id, sheet)
    }

    fn prepare_data_sheet_to_prefill(&self, page: &Page, id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        self.binding.prepare(page, id, sheet)
    }

    fn do_prefill(&self, page: &Page, id: WidgetId, sheet: &DataSheet) -> Result<Vec<PrefillAction>, WidgetError> {
        self.binding.prefill(page, id, sheet)
    }
}
