//! Data columns and column groups.

use crate::error::WidgetError;
use crate::expression::Expression;
use crate::page::Page;
use crate::sheet::{split_aggregator, AggregateFunction, DataSheet, AGGREGATOR_SEPARATOR};
use crate::uxon::UxonObject;
use crate::widget::base::expect_str;
use crate::widget::{Container, Imported, Widget, WidgetId};
use crate::widgets::{child_configs, column_expression};
use serde_json::Value as JsonValue;
use std::any::Any;

/// A group of columns. Bound to a related object (via `object_relation_path_from_parent`) its columns
/// read attributes of that object through the relation.
#[derive(Debug, Default)]
pub struct DataColumnGroup {
    columns: Vec<WidgetId>,
}

impl DataColumnGroup {
    pub fn columns(&self) -> &[WidgetId] {
        &self.columns
    }
}

impl Container for DataColumnGroup {
    fn widgets(&self) -> Vec<WidgetId> {
        self.columns.clone()
    }

    fn child_slot(&self) -> &'static str {
        "columns"
    }
}

impl Widget for DataColumnGroup {
    fn widget_type(&self) -> &'static str {
        "DataColumnGroup"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn children(&self) -> Vec<WidgetId> {
        self.columns.clone()
    }

    fn attach_child(&mut self, slot: &str, child: WidgetId) -> bool {
        if slot != "columns" {
            return false;
        }
        self.columns.push(child);
        true
    }

    fn detach_child(&mut self, child: WidgetId) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| *c != child);
        before != self.columns.len()
    }

    fn import_property(&mut self, key: &str, value: &JsonValue) -> Result<Imported, String> {
        match key {
            "columns" => Ok(Imported::Children {
                slot: "columns",
                configs: child_configs(value)?,
                default_type: "DataColumn",
            }),
            _ => Ok(Imported::Unknown),
        }
    }

    fn export_properties(&self, page: &Page, uxon: &mut UxonObject) -> Result<(), WidgetError> {
        let columns = self
            .columns
            .iter()
            .map(|c| page.export_uxon(*c))
            .collect::<Result<Vec<_>, _>>()?;
        uxon.set_objects("columns", columns);
        Ok(())
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    fn prepare_data_sheet_to_read(&self, page: &Page, _id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        self.columns
            .iter()
            .try_fold(sheet, |sheet, c| page.prepare_data_sheet_to_read(*c, Some(sheet)))
    }
}

/// One column: an attribute (optionally aggregated) or a calculated expression.
#[derive(Debug, Default)]
pub struct DataColumn {
    attribute_alias: Option<String>,
    aggregate_function: Option<AggregateFunction>,
    calculation: Option<Expression>,
    footer: Option<AggregateFunction>,
}

impl DataColumn {
    pub fn attribute_alias(&self) -> Option<&str> {
        self.attribute_alias.as_deref()
    }

    pub fn footer(&self) -> Option<AggregateFunction> {
        self.footer
    }
}

impl Widget for DataColumn {
    fn widget_type(&self) -> &'static str {
        "DataColumn"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn import_property(&mut self, key: &str, value: &JsonValue) -> Result<Imported, String> {
        match key {
            "attribute_alias" => {
                let (alias, aggregator) = split_aggregator(expect_str(value)?);
                self.attribute_alias = Some(alias.to_string());
                self.aggregate_function = aggregator;
            }
            "calculation" => self.calculation = Some(Expression::parse_value(value)),
            "footer" => self.footer = Some(expect_str(value)?.parse()?),
            _ => return Ok(Imported::Unknown),
        }
        Ok(Imported::Done)
    }

    fn export_properties(&self, _page: &Page, uxon: &mut UxonObject) -> Result<(), WidgetError> {
        if let Some(alias) = &self.attribute_alias {
            let expr = match self.aggregate_function {
                Some(f) => format!("{}{}{}", alias, AGGREGATOR_SEPARATOR, f),
                None => alias.clone(),
            };
            uxon.set_property("attribute_alias", expr);
        }
        if let Some(calc) = &self.calculation {
            uxon.set_property("calculation", calc.to_value());
        }
        if let Some(f) = self.footer {
            uxon.set_property("footer", f.as_str());
        }
        Ok(())
    }

    fn prepare_data_sheet_to_read(&self, page: &Page, id: WidgetId, mut sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        let hidden = page.node(id)?.core.is_hidden();
        let expression = match (&self.attribute_alias, &self.calculation) {
            (Some(alias), _) => match page.relation_path_from_object(id, sheet.meta_object())? {
                Some(path) => column_expression(&path, alias, self.aggregate_function),
                None => {
                    tracing::warn!(
                        widget = %page.node(id)?.describe(),
                        sheet_object = %sheet.meta_object().alias_with_namespace(),
                        "column attribute not reachable from sheet object"
                    );
                    return Ok(sheet);
                }
            },
            (None, Some(Expression::Formula(formula))) => format!("={}", formula),
            _ => return Ok(sheet),
        };
        let name = if hidden {
            sheet.add_hidden_column(&expression)
        } else {
            sheet.add_column(&expression)
        };
        if let Some(f) = self.footer {
            sheet.add_column_total(&name, f);
        }
        Ok(sheet)
    }
}
