//! Layout containers.

use crate::error::WidgetError;
use crate::page::Page;
use crate::sheet::DataSheet;
use crate::uxon::UxonObject;
use crate::widget::base::expect_str;
use crate::widget::{Container, Imported, PrefillAction, Widget, WidgetId};
use crate::widgets::child_configs;
use serde_json::Value as JsonValue;
use std::any::Any;

/// Groups widgets. Contributes nothing itself; negotiation is delegated to the children in order.
#[derive(Debug, Default)]
pub struct Panel {
    widgets: Vec<WidgetId>,
    layout: Option<String>,
}

impl Container for Panel {
    fn widgets(&self) -> Vec<WidgetId> {
        self.widgets.clone()
    }

    fn child_slot(&self) -> &'static str {
        "widgets"
    }
}

impl Widget for Panel {
    fn widget_type(&self) -> &'static str {
        "Panel"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn children(&self) -> Vec<WidgetId> {
        self.widgets.clone()
    }

    fn attach_child(&mut self, slot: &str, child: WidgetId) -> bool {
        if slot != "widgets" {
            return false;
        }
        self.widgets.push(child);
        true
    }

    fn detach_child(&mut self, child: WidgetId) -> bool {
        let before = self.widgets.len();
        self.widgets.retain(|w| *w != child);
        before != self.widgets.len()
    }

    fn import_property(&mut self, key: &str, value: &JsonValue) -> Result<Imported, String> {
        match key {
            "widgets" => Ok(Imported::Children {
                slot: "widgets",
                configs: child_configs(value)?,
                default_type: "Input",
            }),
            "layout" => {
                self.layout = Some(expect_str(value)?.to_string());
                Ok(Imported::Done)
            }
            _ => Ok(Imported::Unknown),
        }
    }

    fn export_properties(&self, page: &Page, uxon: &mut UxonObject) -> Result<(), WidgetError> {
        if let Some(l) = &self.layout {
            uxon.set_property("layout", l.as_str());
        }
        if !self.widgets.is_empty() {
            let children = self
                .widgets
                .iter()
                .map(|w| page.export_uxon(*w))
                .collect::<Result<Vec<_>, _>>()?;
            uxon.set_objects("widgets", children);
        }
        Ok(())
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    fn prepare_data_sheet_to_read(&self, page: &Page, _id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        self.widgets
            .iter()
            .try_fold(sheet, |sheet, w| page.prepare_data_sheet_to_read(*w, Some(sheet)))
    }

    fn prepare_data_sheet_to_prefill(&self, page: &Page, _id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        self.widgets
            .iter()
            .try_fold(sheet, |sheet, w| page.prepare_data_sheet_to_prefill(*w, Some(sheet)))
    }

    fn do_prefill(&self, _page: &Page, _id: WidgetId, _sheet: &DataSheet) -> Result<Vec<PrefillAction>, WidgetError> {
        Ok(self.widgets.iter().map(|w| PrefillAction::Prefill { widget: *w }).collect())
    }
}
