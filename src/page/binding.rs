//! Resolving which meta object a widget operates on.

use crate::error::WidgetError;
use crate::model::{split_qualified_alias, MetaObject};
use crate::page::Page;
use crate::widget::{Cached, ResolvedObject, WidgetId};
use std::sync::Arc;

impl Page {
    /// The widget's meta object: explicit object id, then qualified alias, then the parent's object.
    /// The first resolution is cached until the binding changes.
    pub fn meta_object(&self, widget: WidgetId) -> Result<Arc<MetaObject>, WidgetError> {
        let node = self.node(widget)?;
        if let Some(resolved) = node.core.object_cache.borrow().get() {
            return Ok(resolved.object.clone());
        }
        if node.core.object_cache.borrow().is_stale() {
            tracing::debug!(widget = %node.describe(), "re-resolving stale object binding");
        }
        let resolved = if let Some(id) = &node.core.object_id {
            ResolvedObject {
                object: self.model.object_by_id(id)?,
                inherited: false,
            }
        } else if let Some(alias) = &node.core.object_alias {
            ResolvedObject {
                object: self.model.object_by_alias(alias)?,
                inherited: false,
            }
        } else if let Some(parent) = node.core.parent {
            ResolvedObject {
                object: self.meta_object(parent)?,
                inherited: true,
            }
        } else {
            return Err(WidgetError::NoMetaObjectBound {
                widget: node.describe(),
            });
        };
        let object = resolved.object.clone();
        *node.core.object_cache.borrow_mut() = Cached::Resolved(resolved);
        Ok(object)
    }

    /// True if the widget resolved (or would resolve) its object from its parent.
    pub fn is_object_inherited(&self, widget: WidgetId) -> Result<bool, WidgetError> {
        let core = &self.node(widget)?.core;
        if let Some(r) = core.object_cache.borrow().get() {
            return Ok(r.inherited);
        }
        Ok(core.inherits_object())
    }

    /// Binds the widget to an object by alias. A local alias takes the namespace of the parent's object.
    pub fn set_object_alias(&mut self, widget: WidgetId, alias: &str) -> Result<(), WidgetError> {
        let qualified = if split_qualified_alias(alias).is_some() {
            alias.to_string()
        } else {
            let node = self.node(widget)?;
            let parent = node.core.parent.ok_or_else(|| WidgetError::Configuration {
                widget: node.describe(),
                message: format!("cannot determine the namespace of object alias '{}' without a parent", alias),
            })?;
            format!("{}.{}", self.meta_object(parent)?.namespace, alias)
        };
        let core = &mut self.node_mut(widget)?.core;
        core.object_alias = Some(qualified);
        core.object_id = None;
        self.rebind(widget)
    }

    /// Binds the widget to an object by uid.
    pub fn set_object_id(&mut self, widget: WidgetId, object_id: &str) -> Result<(), WidgetError> {
        self.node_mut(widget)?.core.object_id = Some(object_id.to_string());
        self.rebind(widget)
    }

    fn rebind(&mut self, widget: WidgetId) -> Result<(), WidgetError> {
        self.node(widget)?.core.object_cache.borrow_mut().invalidate();
        self.invalidate_inherited_bindings(widget)?;
        self.bump_epoch();
        Ok(())
    }

    /// Marks the cached object of every descendant that inherited it from `widget` as stale.
    pub(crate) fn invalidate_inherited_bindings(&self, widget: WidgetId) -> Result<(), WidgetError> {
        for child in self.children(widget)? {
            let core = &self.node(child)?.core;
            if !core.inherits_object() {
                continue;
            }
            core.object_cache.borrow_mut().invalidate();
            self.invalidate_inherited_bindings(child)?;
        }
        Ok(())
    }
}
