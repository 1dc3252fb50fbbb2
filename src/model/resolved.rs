//! Resolved meta-model: config validated and linked for runtime use.

use crate::error::ModelError;
use crate::model::DataType;
use crate::sheet::AggregateFunction;
use std::collections::HashMap;
use std::sync::Arc;

/// Separator between the segments of a relation path in attribute aliases (e.g. `CUSTOMER__NAME`).
pub const RELATION_SEPARATOR: &str = "__";

/// Direction of a relation: regular (n:1, we hold the key) or reverse (1:n, they hold the key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationCardinality {
    Regular,
    Reverse,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    pub alias: String,
    /// Alias of the same relation seen from the right object.
    pub reverse_alias: String,
    pub cardinality: RelationCardinality,
    pub left_object_id: String,
    pub left_key_attribute: String,
    pub right_object_id: String,
    pub right_key_attribute: String,
}

impl Relation {
    /// The same relation walked in the opposite direction.
    pub fn reversed(&self) -> Relation {
        Relation {
            alias: self.reverse_alias.clone(),
            reverse_alias: self.alias.clone(),
            cardinality: match self.cardinality {
                RelationCardinality::Regular => RelationCardinality::Reverse,
                RelationCardinality::Reverse => RelationCardinality::Regular,
            },
            left_object_id: self.right_object_id.clone(),
            left_key_attribute: self.right_key_attribute.clone(),
            right_object_id: self.left_object_id.clone(),
            right_key_attribute: self.left_key_attribute.clone(),
        }
    }

    pub fn is_reverse(&self) -> bool {
        self.cardinality == RelationCardinality::Reverse
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub alias: String,
    pub name: String,
    pub data_type: DataType,
    pub default_aggregate_function: Option<AggregateFunction>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetaObject {
    pub id: String,
    pub namespace: String,
    pub alias: String,
    pub name: String,
    pub uid_attribute: Option<String>,
    pub label_attribute: Option<String>,
    pub attributes: Vec<Attribute>,
    /// Regular relations first (in declaration order), then reverse ones.
    pub relations: Vec<Relation>,
}

impl MetaObject {
    pub fn alias_with_namespace(&self) -> String {
        format!("{}.{}", self.namespace, self.alias)
    }

    /// Two objects are the same if their uids match.
    pub fn is(&self, other: &MetaObject) -> bool {
        self.id == other.id
    }

    pub fn attribute(&self, alias: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.alias == alias)
    }

    pub fn has_attribute(&self, alias: &str) -> bool {
        self.attribute(alias).is_some()
    }

    pub fn relation(&self, alias: &str) -> Result<&Relation, ModelError> {
        self.relations
            .iter()
            .find(|r| r.alias == alias)
            .ok_or_else(|| ModelError::RelationNotFound {
                object: self.alias_with_namespace(),
                alias: alias.to_string(),
            })
    }

    /// The regular relation whose foreign key is `attribute_alias`, if that attribute is a relation.
    pub fn relation_for_attribute(&self, attribute_alias: &str) -> Option<&Relation> {
        self.relations
            .iter()
            .find(|r| !r.is_reverse() && r.left_key_attribute == attribute_alias)
    }
}

/// Read access to the meta-model, as needed by widgets.
pub trait MetaModelProvider: std::fmt::Debug {
    fn object_by_id(&self, id: &str) -> Result<Arc<MetaObject>, ModelError>;

    fn object_by_alias(&self, qualified_alias: &str) -> Result<Arc<MetaObject>, ModelError>;

    /// Lookup by uid, falling back to the qualified alias.
    fn object(&self, id_or_alias: &str) -> Result<Arc<MetaObject>, ModelError> {
        self.object_by_id(id_or_alias)
            .or_else(|_| self.object_by_alias(id_or_alias))
    }

    /// A direct relation leading from `from` to `to`. Multi-hop chains are never searched.
    fn find_relation(&self, from: &MetaObject, to: &MetaObject) -> Option<Relation> {
        let candidates = || from.relations.iter().filter(|r| r.right_object_id == to.id);
        candidates()
            .find(|r| !r.is_reverse())
            .or_else(|| candidates().next())
            .cloned()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MetaModel {
    pub objects: Vec<Arc<MetaObject>>,
    pub object_by_id: HashMap<String, Arc<MetaObject>>,
    pub object_by_alias: HashMap<String, Arc<MetaObject>>,
}

impl MetaModelProvider for MetaModel {
    fn object_by_id(&self, id: &str) -> Result<Arc<MetaObject>, ModelError> {
        self.object_by_id
            .get(id)
            .cloned()
            .ok_or_else(|| ModelError::ObjectNotFound(id.to_string()))
    }

    fn object_by_alias(&self, qualified_alias: &str) -> Result<Arc<MetaObject>, ModelError> {
        self.object_by_alias
            .get(qualified_alias)
            .cloned()
            .ok_or_else(|| ModelError::ObjectNotFound(qualified_alias.to_string()))
    }
}

/// Splits `ns.sub.ALIAS` into (`ns.sub`, `ALIAS`). Returns `None` without a namespace.
pub fn split_qualified_alias(alias: &str) -> Option<(&str, &str)> {
    let pos = alias.rfind('.')?;
    let (ns, local) = (&alias[..pos], &alias[pos + 1..]);
    if ns.is_empty() || local.is_empty() {
        return None;
    }
    Some((ns, local))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_last_dot() {
        assert_eq!(split_qualified_alias("exface.Core.USER"), Some(("exface.Core", "USER")));
        assert_eq!(split_qualified_alias("USER"), None);
        assert_eq!(split_qualified_alias(".USER"), None);
    }

    #[test]
    fn reversing_twice_is_identity() {
        let rel = Relation {
            alias: "CUSTOMER".into(),
            reverse_alias: "ORDER".into(),
            cardinality: RelationCardinality::Regular,
            left_object_id: "o".into(),
            left_key_attribute: "CUSTOMER".into(),
            right_object_id: "c".into(),
            right_key_attribute: "ID".into(),
        };
        let rev = rel.reversed();
        assert_eq!(rev.alias, "ORDER");
        assert_eq!(rev.left_object_id, "c");
        assert!(rev.is_reverse());
        assert_eq!(rev.reversed(), rel);
    }
}
