//! Building widgets from UXON and exporting them back.

use crate::error::WidgetError;
use crate::page::Page;
use crate::uxon::UxonObject;
use crate::widget::base::expect_str;
use crate::widget::{Imported, WidgetId, WidgetNode};
use serde_json::Value;

/// Keys applied before all others, in this order.
const PRIORITY_KEYS: [&str; 4] = ["object_alias", "object_id", "id_space", "id"];

impl Page {
    /// Creates a widget (and its children) from config. `default_type` applies when `widget_type` is
    /// missing. With a parent, the widget goes into the parent's child slot. On any import error the
    /// partially built widget is removed again.
    pub fn create_widget_from_uxon(
        &mut self,
        parent: Option<WidgetId>,
        uxon: &UxonObject,
        default_type: &str,
    ) -> Result<WidgetId, WidgetError> {
        let slot = match parent {
            Some(p) => Some(self.container_slot(p)?),
            None => None,
        };
        self.create_in_slot(parent, slot, uxon, default_type)
    }

    pub(crate) fn create_in_slot(
        &mut self,
        parent: Option<WidgetId>,
        slot: Option<&str>,
        uxon: &UxonObject,
        default_type: &str,
    ) -> Result<WidgetId, WidgetError> {
        let widget_type = uxon.property_str("widget_type").unwrap_or(default_type);
        let kind = self.factory.create(widget_type)?;
        let widget = self.insert_node(kind, parent, slot)?;
        match self.import_uxon(widget, uxon) {
            Ok(()) => Ok(widget),
            Err(e) => {
                self.remove_widget(widget)?;
                Err(e)
            }
        }
    }

    /// Applies a config to an existing widget: object binding first, then id space and id, then every
    /// other key in document order. Unknown keys fail with [`WidgetError::UnknownProperty`].
    pub fn import_uxon(&mut self, widget: WidgetId, uxon: &UxonObject) -> Result<(), WidgetError> {
        self.node_mut(widget)?.core.uxon_original = Some(uxon.clone());

        if let Some(v) = uxon.property("object_alias") {
            let alias = self.str_property(widget, "object_alias", v)?;
            self.set_object_alias(widget, &alias)?;
        }
        if let Some(v) = uxon.property("object_id") {
            let id = self.str_property(widget, "object_id", v)?;
            self.set_object_id(widget, &id)?;
        }
        if let Some(v) = uxon.property("id_space") {
            let space = self.str_property(widget, "id_space", v)?;
            self.set_id_space(widget, &space)?;
        }
        match uxon.property("id") {
            Some(v) => {
                let id = self.str_property(widget, "id", v)?;
                self.set_id(widget, &id)?;
            }
            None => {
                if self.node(widget)?.core.id.is_empty() {
                    self.assign_auto_id(widget)?;
                }
            }
        }

        for (key, value) in uxon.iter() {
            if key == "widget_type" || PRIORITY_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.import_property(widget, key, value)?;
        }

        let requests = self.node(widget)?.kind.default_children();
        for mut req in requests {
            self.node(widget)?
                .kind
                .complete_child_config(self, widget, req.slot, &mut req.uxon)?;
            self.create_in_slot(Some(widget), Some(req.slot), &req.uxon, req.default_type)?;
        }
        Ok(())
    }

    fn import_property(&mut self, widget: WidgetId, key: &str, value: &Value) -> Result<(), WidgetError> {
        match key {
            "object_relation_path_from_parent" => {
                let path = self.str_property(widget, key, value)?;
                return self.set_relation_path_from_parent(widget, &path);
            }
            "object_relation_path_to_parent" => {
                let path = self.str_property(widget, key, value)?;
                return self.set_relation_path_to_parent(widget, &path);
            }
            _ => {}
        }
        let node = self.node_mut(widget)?;
        let invalid = |node: &WidgetNode, message: String| WidgetError::InvalidPropertyValue {
            widget: node.describe(),
            key: key.to_string(),
            message,
        };
        match node.core.import_property(key, value) {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(message) => return Err(invalid(&*node, message)),
        }
        match node.kind.import_property(key, value) {
            Ok(Imported::Done) => Ok(()),
            Ok(Imported::Unknown) => Err(WidgetError::UnknownProperty {
                widget: node.describe(),
                key: key.to_string(),
            }),
            Ok(Imported::Children {
                slot,
                configs,
                default_type,
            }) => {
                for mut config in configs {
                    self.node(widget)?
                        .kind
                        .complete_child_config(self, widget, slot, &mut config)?;
                    self.create_in_slot(Some(widget), Some(slot), &config, default_type)?;
                }
                Ok(())
            }
            Err(message) => Err(invalid(&*node, message)),
        }
    }

    fn str_property(&self, widget: WidgetId, key: &str, value: &Value) -> Result<String, WidgetError> {
        expect_str(value)
            .map(str::to_string)
            .map_err(|message| WidgetError::InvalidPropertyValue {
                widget: self.node(widget).map(|n| n.describe()).unwrap_or_default(),
                key: key.to_string(),
                message,
            })
    }

    /// The widget's current state as config. Properties at their default value are left out, so
    /// importing the result reproduces an equivalent widget.
    pub fn export_uxon(&self, widget: WidgetId) -> Result<UxonObject, WidgetError> {
        let node = self.node(widget)?;
        let core = &node.core;
        let mut uxon = UxonObject::new();
        uxon.set_property("widget_type", node.kind.widget_type());
        if let Some(alias) = &core.object_alias {
            uxon.set_property("object_alias", alias.as_str());
        }
        if let Some(id) = &core.object_id {
            uxon.set_property("object_id", id.as_str());
        }
        if let Some(space) = &core.id_space {
            uxon.set_property("id_space", space.as_str());
        }
        if let Some(id) = &core.id_specified {
            uxon.set_property("id", id.as_str());
        }
        if let Some(path) = &core.relation_path_from_parent {
            uxon.set_property("object_relation_path_from_parent", path.as_str());
        }
        if let Some(path) = &core.relation_path_to_parent {
            uxon.set_property("object_relation_path_to_parent", path.as_str());
        }
        core.export_properties(&mut uxon);
        node.kind.export_properties(self, &mut uxon)?;
        Ok(uxon)
    }

    /// The config the widget was built from, exactly as supplied.
    pub fn export_uxon_original(&self, widget: WidgetId) -> Result<Option<UxonObject>, WidgetError> {
        Ok(self.node(widget)?.core.uxon_original.clone())
    }
}
