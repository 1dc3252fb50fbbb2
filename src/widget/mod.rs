//! Widget nodes, the [`Widget`] trait every kind implements, and the capability traits kinds opt into.

pub mod cache;
pub mod base;
pub mod factory;
pub mod predicate;

pub use base::{NegotiationPhase, Visibility, WidgetCore};
pub use cache::{Cached, PathCache, ResolvedObject, StampedPath};
pub use factory::WidgetFactory;
pub use predicate::{IsContainer, IsDataWidget, IsFilter, IsValueWidget, OfType, WidgetPredicate};

use crate::error::WidgetError;
use crate::expression::Expression;
use crate::page::Page;
use crate::sheet::{AggregateFunction, Comparator, DataSheet};
use crate::uxon::UxonObject;
use serde_json::Value;
use slotmap::new_key_type;
use std::any::Any;
use std::fmt;

new_key_type! {
    /// Arena handle of a widget on its page. Stable across id changes.
    pub struct WidgetId;
}

/// Outcome of handing a config property to a widget kind.
#[derive(Debug)]
pub enum Imported {
    Done,
    Unknown,
    /// The property describes child widgets; the page creates them and attaches them to `slot`.
    Children {
        slot: &'static str,
        configs: Vec<UxonObject>,
        default_type: &'static str,
    },
}

/// A child the kind wants created once all of its own properties are imported.
#[derive(Debug)]
pub struct ChildRequest {
    pub slot: &'static str,
    pub uxon: UxonObject,
    pub default_type: &'static str,
}

/// A change computed by [`Widget::do_prefill`] and applied by the page.
#[derive(Clone, Debug, PartialEq)]
pub enum PrefillAction {
    SetValue { widget: WidgetId, value: Value },
    SetValueText { widget: WidgetId, text: Value },
    AddFilter {
        data: WidgetId,
        attribute_alias: String,
        comparator: Comparator,
        value: Value,
    },
    /// Points an existing filter at new values, comparator included.
    SetFilter {
        filter: WidgetId,
        comparator: Comparator,
        value: Value,
    },
    /// Run the full prefill sequence on another widget with the same sheet.
    Prefill { widget: WidgetId },
}

/// Behaviour of a widget kind. Shared state lives in [`WidgetCore`]; the engine operations live on [`Page`].
pub trait Widget: Any + fmt::Debug {
    fn widget_type(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Direct children, in order.
    fn children(&self) -> Vec<WidgetId> {
        Vec::new()
    }

    fn attach_child(&mut self, _slot: &str, _child: WidgetId) -> bool {
        false
    }

    fn detach_child(&mut self, _child: WidgetId) -> bool {
        false
    }

    fn default_children(&self) -> Vec<ChildRequest> {
        Vec::new()
    }

    /// Last look at a child config before the page creates the child in `slot`.
    fn complete_child_config(&self, _page: &Page, _id: WidgetId, _slot: &str, _uxon: &mut UxonObject) -> Result<(), WidgetError> {
        Ok(())
    }

    fn import_property(&mut self, _key: &str, _value: &Value) -> Result<Imported, String> {
        Ok(Imported::Unknown)
    }

    /// Writes kind-specific properties (and exported children) that differ from their defaults.
    fn export_properties(&self, _page: &Page, _uxon: &mut UxonObject) -> Result<(), WidgetError> {
        Ok(())
    }

    fn as_container(&self) -> Option<&dyn Container> {
        None
    }

    fn as_value(&self) -> Option<&dyn ValueWidget> {
        None
    }

    fn as_value_mut(&mut self) -> Option<&mut dyn ValueWidget> {
        None
    }

    fn as_filter(&self) -> Option<&dyn FilterWidget> {
        None
    }

    fn as_filter_mut(&mut self) -> Option<&mut dyn FilterWidget> {
        None
    }

    fn as_data(&self) -> Option<&dyn DataWidget> {
        None
    }

    fn as_data_mut(&mut self) -> Option<&mut dyn DataWidget> {
        None
    }

    fn prepare_data_sheet_to_read(&self, _page: &Page, _id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        Ok(sheet)
    }

    fn prepare_data_sheet_to_prefill(&self, _page: &Page, _id: WidgetId, sheet: DataSheet) -> Result<DataSheet, WidgetError> {
        Ok(sheet)
    }

    fn do_prefill(&self, _page: &Page, _id: WidgetId, _sheet: &DataSheet) -> Result<Vec<PrefillAction>, WidgetError> {
        Ok(Vec::new())
    }
}

/// Widgets that lay out other widgets.
pub trait Container {
    fn widgets(&self) -> Vec<WidgetId>;

    /// Slot new children are attached to.
    fn child_slot(&self) -> &'static str;
}

/// Widgets showing a single value, usually bound to one attribute.
pub trait ValueWidget {
    fn attribute_alias(&self) -> Option<&str>;

    fn aggregate_function(&self) -> Option<AggregateFunction>;

    fn value(&self) -> &Expression;

    fn set_value(&mut self, value: Expression);

    fn value_text(&self) -> Option<&Value> {
        None
    }

    fn set_value_text(&mut self, _text: Value) {}
}

pub trait FilterWidget {
    fn attribute_alias(&self) -> Option<&str>;

    fn comparator(&self) -> Comparator;

    fn set_comparator(&mut self, comparator: Comparator);

    fn input_widget(&self) -> Option<WidgetId>;
}

pub trait DataWidget {
    fn column_groups(&self) -> &[WidgetId];

    fn filters(&self) -> &[WidgetId];

    fn add_filter(&mut self, filter: WidgetId);
}

/// A widget on a page: shared core plus its kind.
#[derive(Debug)]
pub struct WidgetNode {
    pub core: WidgetCore,
    pub kind: Box<dyn Widget>,
}

impl WidgetNode {
    pub fn new(kind: Box<dyn Widget>, parent: Option<WidgetId>) -> Self {
        WidgetNode {
            core: WidgetCore::new(parent),
            kind,
        }
    }

    /// Type and id, for error messages.
    pub fn describe(&self) -> String {
        format!("{} '{}'", self.kind.widget_type(), self.core.id)
    }
}
