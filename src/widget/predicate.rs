//! Typed predicates for ancestor searches.

use crate::widget::Widget;
use std::marker::PhantomData;

pub trait WidgetPredicate: 'static {
    fn matches(widget: &dyn Widget) -> bool;
}

/// Layout containers. A `Filter` wraps one input but is not a container.
pub struct IsContainer;

impl WidgetPredicate for IsContainer {
    fn matches(widget: &dyn Widget) -> bool {
        widget.as_container().is_some()
    }
}

pub struct IsDataWidget;

impl WidgetPredicate for IsDataWidget {
    fn matches(widget: &dyn Widget) -> bool {
        widget.as_data().is_some()
    }
}

pub struct IsFilter;

impl WidgetPredicate for IsFilter {
    fn matches(widget: &dyn Widget) -> bool {
        widget.as_filter().is_some()
    }
}

pub struct IsValueWidget;

impl WidgetPredicate for IsValueWidget {
    fn matches(widget: &dyn Widget) -> bool {
        widget.as_value().is_some()
    }
}

/// Matches one concrete widget kind.
pub struct OfType<T>(PhantomData<T>);

impl<T: Widget> WidgetPredicate for OfType<T> {
    fn matches(widget: &dyn Widget) -> bool {
        widget.as_any().is::<T>()
    }
}
