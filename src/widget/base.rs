//! State shared by every widget kind: identity, binding, presentation flags and negotiation caches.

use crate::sheet::DataSheet;
use crate::uxon::UxonObject;
use crate::widget::cache::{Cached, PathCache, ResolvedObject};
use crate::widget::WidgetId;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Normal,
    Hidden,
    Optional,
    Promoted,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Normal => "normal",
            Visibility::Hidden => "hidden",
            Visibility::Optional => "optional",
            Visibility::Promoted => "promoted",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Visibility::Normal),
            "hidden" => Ok(Visibility::Hidden),
            "optional" => Ok(Visibility::Optional),
            "promoted" => Ok(Visibility::Promoted),
            other => Err(format!("invalid visibility: {} (expected normal, hidden, optional or promoted)", other)),
        }
    }
}

/// Where a widget stands in the current data negotiation round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NegotiationPhase {
    #[default]
    Idle,
    Preparing,
    Prefilling,
    Filled,
}

#[derive(Debug)]
pub struct WidgetCore {
    pub(crate) parent: Option<WidgetId>,
    /// Registered page id: id space and local id, or an autogenerated id.
    pub(crate) id: String,
    pub(crate) id_specified: Option<String>,
    pub(crate) id_space: Option<String>,
    pub(crate) caption: Option<String>,
    pub(crate) hide_caption: bool,
    pub(crate) visibility: Visibility,
    pub(crate) disabled: bool,
    pub(crate) width: Option<String>,
    pub(crate) height: Option<String>,
    pub(crate) hint: Option<String>,
    pub(crate) do_not_prefill: bool,
    pub(crate) object_id: Option<String>,
    pub(crate) object_alias: Option<String>,
    pub(crate) object_cache: RefCell<Cached<ResolvedObject>>,
    pub(crate) relation_path_from_parent: Option<String>,
    pub(crate) relation_path_to_parent: Option<String>,
    pub(crate) path_from_parent_cache: RefCell<PathCache>,
    pub(crate) path_to_parent_cache: RefCell<PathCache>,
    pub(crate) ancestor_cache: RefCell<HashMap<TypeId, Option<WidgetId>>>,
    pub(crate) phase: Cell<NegotiationPhase>,
    pub(crate) prefill_source: Option<DataSheet>,
    pub(crate) uxon_original: Option<UxonObject>,
}

impl WidgetCore {
    pub fn new(parent: Option<WidgetId>) -> Self {
        WidgetCore {
            parent,
            id: String::new(),
            id_specified: None,
            id_space: None,
            caption: None,
            hide_caption: false,
            visibility: Visibility::Normal,
            disabled: false,
            width: None,
            height: None,
            hint: None,
            do_not_prefill: false,
            object_id: None,
            object_alias: None,
            object_cache: RefCell::new(Cached::Unresolved),
            relation_path_from_parent: None,
            relation_path_to_parent: None,
            path_from_parent_cache: RefCell::new(PathCache::Unresolved),
            path_to_parent_cache: RefCell::new(PathCache::Unresolved),
            ancestor_cache: RefCell::new(HashMap::new()),
            phase: Cell::new(NegotiationPhase::Idle),
            prefill_source: None,
            uxon_original: None,
        }
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn id_specified(&self) -> Option<&str> {
        self.id_specified.as_deref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = Some(caption.into());
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn is_hidden(&self) -> bool {
        self.visibility == Visibility::Hidden
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn height(&self) -> Option<&str> {
        self.height.as_deref()
    }

    pub fn is_prefill_disabled(&self) -> bool {
        self.do_not_prefill
    }

    pub fn set_do_not_prefill(&mut self, value: bool) {
        self.do_not_prefill = value;
    }

    pub fn negotiation_phase(&self) -> NegotiationPhase {
        self.phase.get()
    }

    /// The sheet this widget was last prefilled from.
    pub fn prefill_source(&self) -> Option<&DataSheet> {
        self.prefill_source.as_ref()
    }

    /// True if neither an object id nor an alias was set explicitly.
    pub fn inherits_object(&self) -> bool {
        self.object_id.is_none() && self.object_alias.is_none()
    }

    /// Applies a shared (non kind-specific) config property. Returns `Ok(false)` for keys it does not know.
    pub(crate) fn import_property(&mut self, key: &str, value: &serde_json::Value) -> Result<bool, String> {
        match key {
            "caption" => self.caption = Some(expect_str(value)?.to_string()),
            "hide_caption" => self.hide_caption = expect_bool(value)?,
            "hidden" => {
                if expect_bool(value)? {
                    self.visibility = Visibility::Hidden;
                } else if self.visibility == Visibility::Hidden {
                    self.visibility = Visibility::Normal;
                }
            }
            "visibility" => self.visibility = expect_str(value)?.parse()?,
            "disabled" => self.disabled = expect_bool(value)?,
            "width" => self.width = Some(dimension(value)?),
            "height" => self.height = Some(dimension(value)?),
            "hint" => self.hint = Some(expect_str(value)?.to_string()),
            "do_not_prefill" => self.do_not_prefill = expect_bool(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(crate) fn export_properties(&self, uxon: &mut UxonObject) {
        if let Some(c) = &self.caption {
            uxon.set_property("caption", c.as_str());
        }
        if self.hide_caption {
            uxon.set_property("hide_caption", true);
        }
        if self.visibility != Visibility::Normal {
            uxon.set_property("visibility", self.visibility.as_str());
        }
        if self.disabled {
            uxon.set_property("disabled", true);
        }
        if let Some(w) = &self.width {
            uxon.set_property("width", w.as_str());
        }
        if let Some(h) = &self.height {
            uxon.set_property("height", h.as_str());
        }
        if let Some(h) = &self.hint {
            uxon.set_property("hint", h.as_str());
        }
        if self.do_not_prefill {
            uxon.set_property("do_not_prefill", true);
        }
    }
}

pub(crate) fn expect_str(value: &serde_json::Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| format!("expected a string, got {}", value))
}

pub(crate) fn expect_bool(value: &serde_json::Value) -> Result<bool, String> {
    value.as_bool().ok_or_else(|| format!("expected a boolean, got {}", value))
}

/// Dimensions accept numbers (relative units) or strings such as `100%` or `300px`.
fn dimension(value: &serde_json::Value) -> Result<String, String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected a dimension, got {}", other)),
    }
}

