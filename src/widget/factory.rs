//! Widget type registry: maps `widget_type` names from config to constructors.

use crate::error::WidgetError;
use crate::widget::Widget;
use crate::widgets::{Data, DataColumn, DataColumnGroup, Filter, Input, InputComboTable, Map, Panel, Value};
use std::collections::HashMap;

pub type WidgetConstructor = fn() -> Box<dyn Widget>;

#[derive(Clone, Debug)]
pub struct WidgetFactory {
    constructors: HashMap<String, WidgetConstructor>,
}

impl WidgetFactory {
    pub fn empty() -> Self {
        WidgetFactory {
            constructors: HashMap::new(),
        }
    }

    /// Registers (or replaces) a widget type.
    pub fn register(&mut self, widget_type: impl Into<String>, constructor: WidgetConstructor) {
        self.constructors.insert(widget_type.into(), constructor);
    }

    pub fn is_registered(&self, widget_type: &str) -> bool {
        self.constructors.contains_key(widget_type)
    }

    pub fn create(&self, widget_type: &str) -> Result<Box<dyn Widget>, WidgetError> {
        self.constructors
            .get(widget_type)
            .map(|ctor| ctor())
            .ok_or_else(|| WidgetError::UnknownWidgetType(widget_type.to_string()))
    }
}

impl Default for WidgetFactory {
    fn default() -> Self {
        let mut f = WidgetFactory::empty();
        f.register("Panel", || Box::new(Panel::default()));
        f.register("Value", || Box::new(Value::default()));
        f.register("Input", || Box::new(Input::default()));
        f.register("InputComboTable", || Box::new(InputComboTable::default()));
        f.register("Filter", || Box::new(Filter::default()));
        f.register("Data", || Box::new(Data::default()));
        f.register("DataColumnGroup", || Box::new(DataColumnGroup::default()));
        f.register("DataColumn", || Box::new(DataColumn::default()));
        f.register("Map", || Box::new(Map::default()));
        f
    }
}
