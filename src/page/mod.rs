//! The owning page: widget arena, id registry, lifecycle events and the engine operations on widgets.
//!
//! Resolution only needs `&Page` (caches use interior mutability). Anything that changes bindings, ids or
//! structure takes `&mut Page`.

mod binding;
pub mod events;
mod ids;
mod paths;
mod prefill;
pub mod registry;
mod tree;
mod uxon_io;

pub use events::{EventBus, WidgetEvent, WidgetEventKind};
pub use registry::IdRegistry;

use crate::error::WidgetError;
use crate::model::MetaModelProvider;
use crate::settings::EngineSettings;
use crate::widget::{Widget, WidgetFactory, WidgetId, WidgetNode};
use slotmap::SlotMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub struct Page {
    name: String,
    model: Arc<dyn MetaModelProvider>,
    settings: EngineSettings,
    factory: WidgetFactory,
    widgets: SlotMap<WidgetId, WidgetNode>,
    registry: IdRegistry,
    root: Option<WidgetId>,
    /// Bumped whenever a binding or a parent link changes. Cached relation paths stamped with an older
    /// epoch are re-validated before use.
    epoch: u64,
    events: EventBus,
    auto_id_counters: HashMap<&'static str, usize>,
}

impl Page {
    /// A page with settings from the environment and the default widget types.
    pub fn new(name: impl Into<String>, model: Arc<dyn MetaModelProvider>) -> Self {
        Page::with_settings(name, model, EngineSettings::from_env())
    }

    pub fn with_settings(name: impl Into<String>, model: Arc<dyn MetaModelProvider>, settings: EngineSettings) -> Self {
        Page {
            name: name.into(),
            model,
            settings: settings.sanitized(),
            factory: WidgetFactory::default(),
            widgets: SlotMap::with_key(),
            registry: IdRegistry::new(),
            root: None,
            epoch: 0,
            events: EventBus::default(),
            auto_id_counters: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &dyn MetaModelProvider {
        self.model.as_ref()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn id_space_separator(&self) -> &str {
        &self.settings.id_space_separator
    }

    /// Register custom widget types before building widgets from config.
    pub fn factory_mut(&mut self) -> &mut WidgetFactory {
        &mut self.factory
    }

    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn bump_epoch(&mut self) {
        self.epoch += 1;
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&WidgetEvent) + 'static) {
        self.events.subscribe(listener);
    }

    pub fn registry(&self) -> &IdRegistry {
        &self.registry
    }

    pub fn contains(&self, widget: WidgetId) -> bool {
        self.widgets.contains_key(widget)
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    pub fn node(&self, widget: WidgetId) -> Result<&WidgetNode, WidgetError> {
        self.widgets
            .get(widget)
            .ok_or_else(|| WidgetError::WidgetNotFound(format!("{:?}", widget)))
    }

    pub fn node_mut(&mut self, widget: WidgetId) -> Result<&mut WidgetNode, WidgetError> {
        self.widgets
            .get_mut(widget)
            .ok_or_else(|| WidgetError::WidgetNotFound(format!("{:?}", widget)))
    }

    /// The widget's kind, if it is a `T`.
    pub fn widget_as<T: Widget>(&self, widget: WidgetId) -> Option<&T> {
        self.widgets.get(widget)?.kind.as_any().downcast_ref::<T>()
    }

    pub fn widget_as_mut<T: Widget>(&mut self, widget: WidgetId) -> Option<&mut T> {
        self.widgets.get_mut(widget)?.kind.as_any_mut().downcast_mut::<T>()
    }

    /// Looks a widget up by its full page id.
    pub fn widget_by_id(&self, id: &str) -> Result<WidgetId, WidgetError> {
        self.registry
            .get(id)
            .ok_or_else(|| WidgetError::WidgetNotFound(id.to_string()))
    }

    /// Adds a programmatically built widget. With a parent, the widget goes into the parent's child slot.
    /// The widget gets an autogenerated id; use [`Page::set_id`] for an explicit one.
    pub fn add_widget(&mut self, kind: Box<dyn Widget>, parent: Option<WidgetId>) -> Result<WidgetId, WidgetError> {
        let slot = match parent {
            Some(p) => Some(self.container_slot(p)?),
            None => None,
        };
        let widget = self.insert_node(kind, parent, slot)?;
        if let Err(e) = self.assign_auto_id(widget) {
            self.remove_widget(widget)?;
            return Err(e);
        }
        Ok(widget)
    }

    /// Creates a widget of a registered type, see [`Page::add_widget`].
    pub fn create_widget(&mut self, widget_type: &str, parent: Option<WidgetId>) -> Result<WidgetId, WidgetError> {
        let kind = self.factory.create(widget_type)?;
        self.add_widget(kind, parent)
    }

    /// Inserts the node and attaches it to `slot` of its parent. Ids are assigned by the caller.
    pub(crate) fn insert_node(
        &mut self,
        kind: Box<dyn Widget>,
        parent: Option<WidgetId>,
        slot: Option<&str>,
    ) -> Result<WidgetId, WidgetError> {
        if let Some(p) = parent {
            self.node(p)?;
        }
        let widget = self.widgets.insert(WidgetNode::new(kind, parent));
        if let (Some(p), Some(slot)) = (parent, slot) {
            let parent_node = self.node_mut(p)?;
            if !parent_node.kind.attach_child(slot, widget) {
                let container = parent_node.describe();
                self.widgets.remove(widget);
                return Err(WidgetError::Configuration {
                    widget: container,
                    message: format!("cannot hold children in '{}'", slot),
                });
            }
        }
        if parent.is_none() && self.root.is_none() {
            self.root = Some(widget);
        }
        Ok(widget)
    }

    /// Child slot of a container widget.
    pub(crate) fn container_slot(&self, container: WidgetId) -> Result<&'static str, WidgetError> {
        let node = self.node(container)?;
        node.kind
            .as_container()
            .map(|c| c.child_slot())
            .ok_or_else(|| WidgetError::Configuration {
                widget: node.describe(),
                message: "is not a container".into(),
            })
    }

    /// Removes a widget and its whole subtree, deregistering their ids and detaching it from its parent.
    pub fn remove_widget(&mut self, widget: WidgetId) -> Result<(), WidgetError> {
        let mut doomed = vec![widget];
        doomed.extend(self.children_recursive(widget)?);
        if let Some(parent) = self.node(widget)?.core.parent {
            if let Some(p) = self.widgets.get_mut(parent) {
                p.kind.detach_child(widget);
            }
        }
        for w in doomed {
            if let Some(node) = self.widgets.remove(w) {
                if self.registry.get(&node.core.id) == Some(w) {
                    self.registry.deregister(&node.core.id);
                }
                tracing::trace!(widget = %node.describe(), "widget removed");
            }
        }
        if self.root == Some(widget) {
            self.root = None;
        }
        Ok(())
    }

    pub fn remove_widget_by_id(&mut self, id: &str) -> Result<(), WidgetError> {
        let widget = self.widget_by_id(id)?;
        self.remove_widget(widget)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("name", &self.name)
            .field("widgets", &self.widgets.len())
            .field("root", &self.root)
            .field("epoch", &self.epoch)
            .field("events", &self.events)
            .finish()
    }
}
