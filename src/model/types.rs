//! Raw meta-model config types matching the JSON model schema (objects, attributes, relations).

use serde::{Deserialize, Serialize};

use crate::sheet::AggregateFunction;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub id: String,
    pub namespace: String,
    pub alias: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uid_attribute: Option<String>,
    #[serde(default)]
    pub label_attribute: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
    Relation,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttributeConfig {
    pub object_id: String,
    pub alias: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub default_aggregate_function: Option<AggregateFunction>,
}

/// A regular (n:1) relation from `left_object_id` to `right_object_id`. The reverse (1:n) side is derived.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelationConfig {
    pub id: String,
    pub alias: String,
    /// Alias of the reverse relation on the right object; defaults to the left object's alias.
    #[serde(default)]
    pub reverse_alias: Option<String>,
    pub left_object_id: String,
    /// Foreign key attribute on the left object; defaults to the relation alias.
    #[serde(default)]
    pub left_key_attribute: Option<String>,
    pub right_object_id: String,
    /// Key attribute on the right object; defaults to its uid attribute.
    #[serde(default)]
    pub right_key_attribute: Option<String>,
}

/// All model config in one struct for in-memory loading.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
    #[serde(default)]
    pub attributes: Vec<AttributeConfig>,
    #[serde(default)]
    pub relations: Vec<RelationConfig>,
}
