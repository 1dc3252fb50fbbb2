//! Typed errors for the meta-model and the widget engine.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("missing reference: {kind} id '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("duplicate object alias: {0}")]
    DuplicateAlias(String),
    #[error("meta object not found: {0}")]
    ObjectNotFound(String),
    #[error("attribute '{alias}' not found on object {object}")]
    AttributeNotFound { object: String, alias: String },
    #[error("relation '{alias}' not found on object {object}")]
    RelationNotFound { object: String, alias: String },
    #[error("model load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("widget id '{id}' is already used in id space '{id_space}'")]
    IdConflict { id: String, id_space: String },
    #[error("invalid widget id: {0}")]
    InvalidId(String),
    #[error("no meta object bound to widget {widget} and no parent to inherit one from")]
    NoMetaObjectBound { widget: String },
    #[error("configuration of widget {widget}: {message}")]
    Configuration { widget: String, message: String },
    #[error("unknown property '{key}' for widget {widget}")]
    UnknownProperty { widget: String, key: String },
    #[error("invalid value for property '{key}' of widget {widget}: {message}")]
    InvalidPropertyValue {
        widget: String,
        key: String,
        message: String,
    },
    #[error("widget '{requested}' not found in container {container}")]
    ChildNotFound { container: String, requested: String },
    #[error("widget not found: {0}")]
    WidgetNotFound(String),
    #[error("unknown widget type: {0}")]
    UnknownWidgetType(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("uxon: {0}")]
    Json(#[from] serde_json::Error),
}
