//! Widget SDK: widget-tree binding and data negotiation engine for config-driven UIs.

pub mod error;
pub mod expression;
pub mod model;
pub mod page;
pub mod settings;
pub mod sheet;
pub mod uxon;
pub mod widget;
pub mod widgets;

pub use error::{ModelError, WidgetError};
pub use expression::{Expression, WidgetLink};
pub use model::{MetaModel, MetaModelProvider, MetaObject, Relation, RelationPath};
pub use page::{Page, WidgetEvent, WidgetEventKind};
pub use settings::EngineSettings;
pub use sheet::{AggregateFunction, Comparator, Condition, DataSheet};
pub use uxon::UxonObject;
pub use widget::{
    IsContainer, IsDataWidget, IsFilter, IsValueWidget, NegotiationPhase, OfType, Visibility, Widget, WidgetId,
};
