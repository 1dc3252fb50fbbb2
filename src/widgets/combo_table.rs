//! Relation input: holds the key of a related object and shows that object's label.

use crate::error::WidgetError;
use crate::expression::Expression;
use crate::model::{Relation, RELATION_SEPARATOR};
use crate::page::Page;
use crate::sheet::{is_empty_value, AggregateFunction, DataSheet};
use crate::uxon::UxonObject;
use crate::widget::base::{expect_bool, expect_str};
use crate::widget::{ChildRequest, Imported, PrefillAction, ValueWidget, Widget, WidgetId};
use crate::widgets::{column_expression, ValueBinding};
use serde_json::Value as JsonValue;
use std::any::Any;

/// `attribute_alias` must be a relation attribute (e.g. `CUSTOMER` on an order). The text shown is
/// `text_attribute_alias`, by default the label of the related object seen through the relation.
#[derive(Debug, Default)]
pub struct InputComboTable {
    binding: ValueBinding,
    required: bool,
    readonly: bool,
    text_attribute_alias: Option<String>,
    value_text: Option<JsonValue>,
    /// Table config, created once the relation attribute is known.
    table_uxon: Option<UxonObject>,
    table: Option<WidgetId>,
}

impl InputComboTable {
    pub fn binding(&self) -> &ValueBinding {
        &self.binding
    }

    pub fn table(&self) -> Option<WidgetId> {
        self.table
    }

    fn relation(&self, page: &Page, id: WidgetId) -> Result<Option<Relation>, WidgetError> {
        let Some(alias) = self.binding.attribute_alias.as_deref() else {
            return Ok(None);
        };
        Ok(page.meta_object(id)?.relation_for_attribute(alias).cloned())
    }

    /// Qualified alias of the object the relation points to.
    fn related_object_alias(&self, page: &Page, id: WidgetId) -> Result<Option<String>, WidgetError> {
        let Some(rel) = self.relation(page, id)? else {
            return Ok(None);
        };
        Ok(Some(page.model().object_by_id(&rel.right_object_id)?.alias_with_namespace()))
    }

    /// Text attribute relative to the widget's object.
    pub fn text_attribute_alias(&self, page: &Page, id: WidgetId) -> Result<Option<String>, WidgetError> {
        if let Some(t) = &self.text_attribute_alias {
            return Ok(Some(t.clone()));
        }
        let Some(rel) = self.relation(page, id)? else {
            return Ok(None);
        };
        let related = page.model().object_by_id(&rel.right_object_id)?;
        Ok(related
            .label_attribute
            .as_ref()
            .map(|label| format!("{}{}{}", rel.alias, RELATION_SEPARATOR, label)))
    }

    fn text_column(&self, page: &Page, id: WidgetId, sheet: &DataSheet) -> Result<Option<String>, WidgetError> {
        let Some(text_alias) = self.text_attribute_alias(page, id)? else {
            return Ok(None);
        };
        Ok(page
            .relation_path_from_object(id, sheet.meta_object())?
            .map(|path| column_expression(&path, &text_alias, None)))
    }

    /// The related object's key and label, when the sheet is based on the related object itself.
    fn related_columns(&self, page: &Page, id: WidgetId, sheet: &DataSheet) -> Result<Option<(String, Option<String>)>, WidgetError> {
        let Some(rel) = self.relation(page, id)? else {
            return Ok(None);
        };
        if sheet.meta_object().id != rel.right_object_id {
            return Ok(None);
        }
        Ok(Some((rel.right_key_attribute, sheet.meta_object().label_attribute.clone())))
    }

    fn prepare(&self, page: &Page, id: WidgetId, mut sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        if let Some(expr) = self.binding.column_for(page, id, &sheet)? {
            sheet.add_column(&expr);
            if let Some(text) = self.text_column(page, id, &sheet)? {
                sheet.add_column(&text);
            }
        }
        Ok(sheet)
    }
}

impl ValueWidget for InputComboTable {
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

    fn value_text(&self) -> Option<&JsonValue> {
        self.value_text.as_ref()
    }

    fn set_value_text(&mut self, text: JsonValue) {
        self.value_text = if is_empty_value(&text) { None } else { Some(text) };
    }
}

impl Widget for InputComboTable {
    fn widget_type(&self) -> &'static str {
        "InputComboTable"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn children(&self) -> Vec<WidgetId> {
        self.table.into_iter().collect()
    }

    fn attach_child(&mut self, slot: &str, child: WidgetId) -> bool {
        if slot != "table" || self.table.is_some() {
            return false;
        }
        self.table = Some(child);
        true
    }

    fn detach_child(&mut self, child: WidgetId) -> bool {
        if self.table == Some(child) {
            self.table = None;
            return true;
        }
        false
    }

    fn default_children(&self) -> Vec<ChildRequest> {
        match (&self.table_uxon, self.table) {
            (Some(uxon), None) => vec![ChildRequest {
                slot: "table",
                uxon: uxon.clone(),
                default_type: "Data",
            }],
            _ => Vec::new(),
        }
    }

    /// A table without a binding of its own lists the related objects.
    fn complete_child_config(&self, page: &Page, id: WidgetId, slot: &str, uxon: &mut UxonObject) -> Result<(), WidgetError> {
        if slot != "table" || uxon.has_property("object_alias") || uxon.has_property("object_id") {
            return Ok(());
        }
        if let Some(alias) = self.related_object_alias(page, id)? {
            uxon.set_property("object_alias", alias);
        }
        Ok(())
    }

    fn import_property(&mut self, key: &str, value: &JsonValue) -> Result<Imported, String> {
        match key {
            "required" => self.required = expect_bool(value)?,
            "readonly" => self.readonly = expect_bool(value)?,
            "text_attribute_alias" => self.text_attribute_alias = Some(expect_str(value)?.to_string()),
            "value_text" => self.value_text = Some(value.clone()),
            "table" => {
                let uxon = UxonObject::from_value(value.clone())
                    .ok_or_else(|| format!("expected a widget object, got {}", value))?;
                self.table_uxon = Some(uxon);
            }
            _ if self.binding.import_property(key, value)? => {}
            _ => return Ok(Imported::Unknown),
        }
        Ok(Imported::Done)
    }

    fn export_properties(&self, page: &Page, uxon: &mut UxonObject) -> Result<(), WidgetError> {
        self.binding.export_properties(uxon);
        if self.required {
            uxon.set_property("required", true);
        }
        if self.readonly {
            uxon.set_property("readonly", true);
        }
        if let Some(t) = &self.text_attribute_alias {
            uxon.set_property("text_attribute_alias", t.as_str());
        }
        if let Some(t) = &self.value_text {
            uxon.set_property("value_text", t.clone());
        }
        if let Some(table) = self.table {
            let mut table_uxon = page.export_uxon(table)?;
            if let Some(combo) = page.parent(table)? {
                let related = self.related_object_alias(page, combo)?;
                if related.is_some() && table_uxon.property_str("object_alias") == related.as_deref() {
                    table_uxon.unset_property("object_alias");
                }
            }
            uxon.set_object("table", table_uxon);
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
        self.prepare(page, id, sheet)
    }

    fn prepare_data_sheet_to_prefill(&self, page: &Page, id: WidgetId, mut sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        if let Some((key, label)) = self.related_columns(page, id, &sheet)? {
            sheet.add_hidden_column(&key);
            if let Some(label) = label {
                sheet.add_hidden_column(&label);
            }
            return Ok(sheet);
        }
        self.prepare(page, id, sheet)
    }

    /// Prefills from a sheet of the widget's object (key and text columns) or of the related object
    /// (its key and label). Only a single row selects a value.
    fn do_prefill(&self, page: &Page, id: WidgetId, sheet: &DataSheet) -> Result<Vec<PrefillAction>, WidgetError> {
        let (value, text) = if let Some((key, label)) = self.related_columns(page, id, sheet)? {
            if sheet.row_count() != 1 {
                return Ok(Vec::new());
            }
            let cell = |expr: &str| {
                sheet
                    .column_by_expression(expr)
                    .and_then(|c| sheet.cell_value(&c.name, 0))
                    .cloned()
            };
            (cell(&key), label.as_deref().and_then(cell))
        } else {
            let Some(expr) = self.binding.column_for(page, id, sheet)? else {
                return Ok(Vec::new());
            };
            let value = self.binding.value_from(page, id, sheet, &expr)?;
            let text = match self.text_column(page, id, sheet)? {
                Some(text_expr) if sheet.row_count() == 1 => sheet
                    .column_by_expression(&text_expr)
                    .and_then(|c| sheet.cell_value(&c.name, 0))
                    .cloned(),
                _ => None,
            };
            (value, text)
        };

        let Some(value) = value else {
            return Ok(Vec::new());
        };
        if self.binding.value.is_reference() && is_empty_value(&value) {
            return Ok(Vec::new());
        }
        let mut actions = vec![PrefillAction::SetValue { widget: id, value }];
        if let Some(text) = text {
            actions.push(PrefillAction::SetValueText { widget: id, text });
        }
        Ok(actions)
    }
}
