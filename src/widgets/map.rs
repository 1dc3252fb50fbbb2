//! Map: a container of data layers.

use crate::error::WidgetError;
use crate::page::Page;
use crate::sheet::DataSheet;
use crate::uxon::UxonObject;
use crate::widget::{Container, Imported, PrefillAction, Widget, WidgetId};
use crate::widgets::child_configs;
use serde_json::Value as JsonValue;
use std::any::Any;

#[derive(Debug, Default)]
pub struct Map {
    layers: Vec<WidgetId>,
    zoom: Option<u64>,
}

impl Map {
    pub fn layers(&self) -> &[WidgetId] {
        &self.layers
    }

    pub fn zoom(&self) -> Option<u64> {
        self.zoom
    }
}

impl Container for Map {
    fn widgets(&self) -> Vec<WidgetId> {
        self.layers.clone()
    }

    fn child_slot(&self) -> &'static str {
        "layers"
    }
}

impl Widget for Map {
    fn widget_type(&self) -> &'static str {
        "Map"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn children(&self) -> Vec<WidgetId> {
        self.layers.clone()
    }

    fn attach_child(&mut self, slot: &str, child: WidgetId) -> bool {
        if slot != "layers" {
            return false;
        }
        self.layers.push(child);
        true
    }

    fn detach_child(&mut self, child: WidgetId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|l| *l != child);
        before != self.layers.len()
    }

    fn import_property(&mut self, key: &str, value: &JsonValue) -> Result<Imported, String> {
        match key {
            "layers" => Ok(Imported::Children {
                slot: "layers",
                configs: child_configs(value)?,
                default_type: "Data",
            }),
            "zoom" => {
                self.zoom = Some(value.as_u64().ok_or_else(|| format!("expected a zoom level, got {}", value))?);
                Ok(Imported::Done)
            }
            _ => Ok(Imported::Unknown),
        }
    }

    fn export_properties(&self, page: &Page, uxon: &mut UxonObject) -> Result<(), WidgetError> {
        if let Some(z) = self.zoom {
            uxon.set_property("zoom", z);
        }
        if !self.layers.is_empty() {
            let layers = self
                .layers
                .iter()
                .map(|l| page.export_uxon(*l))
                .collect::<Result<Vec<_>, _>>()?;
            uxon.set_objects("layers", layers);
        }
        Ok(())
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    /// Only layers showing the sheet's object contribute to it.
    fn prepare_data_sheet_to_read(&self, page: &Page, _id: WidgetId, mut sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        for layer in &self.layers {
            if page.meta_object(*layer)?.is(sheet.meta_object()) {
                sheet = page.prepare_data_sheet_to_read(*layer, Some(sheet))?;
            }
        }
        Ok(sheet)
    }

    fn prepare_data_sheet_to_prefill(&self, page: &Page, _id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        self.layers
            .iter()
            .try_fold(sheet, |sheet, l| page.prepare_data_sheet_to_prefill(*l, Some(sheet)))
    }

    fn do_prefill(&self, _page: &Page, _id: WidgetId, _sheet: &DataSheet) -> Result<Vec<PrefillAction>, WidgetError> {
        Ok(self.layers.iter().map(|l| PrefillAction::Prefill { widget: *l }).collect())
    }
}
