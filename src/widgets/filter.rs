//! Filter: an input widget plus the attribute and comparator its value is applied with.

use crate::error::WidgetError;
use crate::page::Page;
use crate::sheet::Comparator;
use crate::uxon::UxonObject;
use crate::widget::base::expect_str;
use crate::widget::{ChildRequest, FilterWidget, Imported, Widget, WidgetId};
use serde_json::Value as JsonValue;
use std::any::Any;

/// Wraps exactly one input widget. Not a layout container.
///
/// `attribute_alias` and `value` given on the filter are passed on to the input when it is created;
/// without an `input_widget` config a plain `Input` is created.
#[derive(Debug, Default)]
pub struct Filter {
    attribute_alias: Option<String>,
    comparator: Comparator,
    value: Option<JsonValue>,
    input_uxon: Option<UxonObject>,
    input_widget: Option<WidgetId>,
}

impl Filter {
    fn input_config(&self) -> UxonObject {
        let mut uxon = self.input_uxon.clone().unwrap_or_default();
        if let Some(alias) = &self.attribute_alias {
            if !uxon.has_property("attribute_alias") {
                uxon.set_property("attribute_alias", alias.as_str());
            }
        }
        if let Some(v) = &self.value {
            if !uxon.has_property("value") {
                uxon.set_property("value", v.clone());
            }
        }
        uxon
    }
}

impl FilterWidget for Filter {
    fn attribute_alias(&self) -> Option<&str> {
        self.attribute_alias.as_deref()
    }

    fn comparator(&self) -> Comparator {
        self.comparator
    }

    fn set_comparator(&mut self, comparator: Comparator) {
        self.comparator = comparator;
    }

    fn input_widget(&self) -> Option<WidgetId> {
        self.input_widget
    }
}

impl Widget for Filter {
    fn widget_type(&self) -> &'static str {
        "Filter"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn children(&self) -> Vec<WidgetId> {
        self.input_widget.into_iter().collect()
    }

    fn attach_child(&mut self, slot: &str, child: WidgetId) -> bool {
        if slot != "input_widget" || self.input_widget.is_some() {
            return false;
        }
        self.input_widget = Some(child);
        true
    }

    fn detach_child(&mut self, child: WidgetId) -> bool {
        if self.input_widget == Some(child) {
            self.input_widget = None;
            return true;
        }
        false
    }

    fn default_children(&self) -> Vec<ChildRequest> {
        if self.input_widget.is_some() {
            return Vec::new();
        }
        vec![ChildRequest {
            slot: "input_widget",
            uxon: self.input_config(),
            default_type: "Input",
        }]
    }

    fn import_property(&mut self, key: &str, value: &JsonValue) -> Result<Imported, String> {
        match key {
            "attribute_alias" => self.attribute_alias = Some(expect_str(value)?.to_string()),
            "comparator" => self.comparator = expect_str(value)?.parse()?,
            "value" => self.value = Some(value.clone()),
            "input_widget" => {
                let uxon = UxonObject::from_value(value.clone())
                    .ok_or_else(|| format!("expected a widget object, got {}", value))?;
                self.input_uxon = Some(uxon);
            }
            _ => return Ok(Imported::Unknown),
        }
        Ok(Imported::Done)
    }

    /// The input's config is exported without what the filter itself carries.
    fn export_properties(&self, page: &Page, uxon: &mut UxonObject) -> Result<(), WidgetError> {
        if let Some(alias) = &self.attribute_alias {
            uxon.set_property("attribute_alias", alias.as_str());
        }
        if self.comparator != Comparator::default() {
            uxon.set_property("comparator", self.comparator.as_str());
        }
        let Some(input) = self.input_widget else {
            return Ok(());
        };
        let mut input_uxon = page.export_uxon(input)?;
        if input_uxon.property_str("attribute_alias") == self.attribute_alias.as_deref() {
            input_uxon.unset_property("attribute_alias");
        }
        if let Some(v) = input_uxon.unset_property("value") {
            uxon.set_property("value", v);
        }
        if input_uxon.property_str("widget_type") == Some("Input") {
            input_uxon.unset_property("widget_type");
        }
        if !input_uxon.is_empty() {
            uxon.set_object("input_widget", input_uxon);
        }
        Ok(())
    }

    fn as_filter(&self) -> Option<&dyn FilterWidget> {
        Some(self)
    }

    fn as_filter_mut(&mut self) -> Option<&mut dyn FilterWidget> {
        Some(self)
    }
}
