//! Widget lifecycle events raised by the page.

use crate::widget::WidgetId;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetEventKind {
    BeforePrefill,
    Prefill,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WidgetEvent {
    pub kind: WidgetEventKind,
    pub widget: WidgetId,
    /// Page id of the widget at the time of the event.
    pub widget_id: String,
    /// Qualified alias of the sheet's object.
    pub object_alias: String,
}

pub type EventListener = Box<dyn FnMut(&WidgetEvent)>;

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<EventListener>,
}

impl EventBus {
    pub fn subscribe(&mut self, listener: impl FnMut(&WidgetEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn dispatch(&mut self, event: &WidgetEvent) {
        tracing::trace!(kind = ?event.kind, widget = %event.widget_id, "widget event");
        for l in self.listeners.iter_mut() {
            l(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
