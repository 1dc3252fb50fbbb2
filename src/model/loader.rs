//! Build the runtime meta-model from in-memory config or JSON.

use crate::error::ModelError;
use crate::model::resolved::{Attribute, MetaModel, MetaObject, Relation, RelationCardinality};
use crate::model::types::*;
use crate::model::validate;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Build resolved model from model config. Validates first.
pub fn resolve(config: &ModelConfig) -> Result<MetaModel, ModelError> {
    validate(config)?;

    let objects_by_id: HashMap<&str, &ObjectConfig> = config.objects.iter().map(|o| (o.id.as_str(), o)).collect();
    let attributes_by_object: HashMap<&str, Vec<&AttributeConfig>> =
        config.attributes.iter().fold(HashMap::new(), |mut m, a| {
            m.entry(a.object_id.as_str()).or_default().push(a);
            m
        });

    let mut regular: HashMap<&str, Vec<Relation>> = HashMap::new();
    let mut reverse: HashMap<&str, Vec<Relation>> = HashMap::new();
    for r in &config.relations {
        let left = objects_by_id
            .get(r.left_object_id.as_str())
            .ok_or_else(|| ModelError::MissingReference {
                kind: "object",
                id: r.left_object_id.clone(),
            })?;
        let right = objects_by_id
            .get(r.right_object_id.as_str())
            .ok_or_else(|| ModelError::MissingReference {
                kind: "object",
                id: r.right_object_id.clone(),
            })?;
        let right_key = r
            .right_key_attribute
            .clone()
            .or_else(|| right.uid_attribute.clone())
            .ok_or_else(|| ModelError::Validation(format!("relation {} has no right key", r.id)))?;
        let relation = Relation {
            alias: r.alias.clone(),
            reverse_alias: r.reverse_alias.clone().unwrap_or_else(|| left.alias.clone()),
            cardinality: RelationCardinality::Regular,
            left_object_id: left.id.clone(),
            left_key_attribute: r.left_key_attribute.clone().unwrap_or_else(|| r.alias.clone()),
            right_object_id: right.id.clone(),
            right_key_attribute: right_key,
        };
        reverse.entry(right.id.as_str()).or_default().push(relation.reversed());
        regular.entry(left.id.as_str()).or_default().push(relation);
    }

    let mut model = MetaModel::default();
    for o in &config.objects {
        let attributes = attributes_by_object
            .get(o.id.as_str())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|a| Attribute {
                alias: a.alias.clone(),
                name: a.name.clone().unwrap_or_else(|| a.alias.clone()),
                data_type: a.data_type,
                default_aggregate_function: a.default_aggregate_function,
            })
            .collect();
        let relations = regular
            .remove(o.id.as_str())
            .unwrap_or_default()
            .into_iter()
            .chain(reverse.remove(o.id.as_str()).unwrap_or_default())
            .collect();
        let object = Arc::new(MetaObject {
            id: o.id.clone(),
            namespace: o.namespace.clone(),
            alias: o.alias.clone(),
            name: o.name.clone().unwrap_or_else(|| o.alias.clone()),
            uid_attribute: o.uid_attribute.clone(),
            label_attribute: o.label_attribute.clone(),
            attributes,
            relations,
        });
        model.object_by_id.insert(object.id.clone(), object.clone());
        model.object_by_alias.insert(object.alias_with_namespace(), object.clone());
        model.objects.push(object);
    }
    tracing::debug!(objects = model.objects.len(), relations = config.relations.len(), "meta model resolved");
    Ok(model)
}

impl MetaModel {
    pub fn from_json_str(json: &str) -> Result<MetaModel, ModelError> {
        let config: ModelConfig = serde_json::from_str(json).map_err(|e| ModelError::Load(e.to_string()))?;
        resolve(&config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<MetaModel, ModelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ModelError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetaModelProvider;

    const MODEL: &str = r#"{
        "objects": [
            {"id": "o", "namespace": "shop", "alias": "ORDER", "uid_attribute": "ID"},
            {"id": "c", "namespace": "shop", "alias": "CUSTOMER", "uid_attribute": "ID", "label_attribute": "NAME"}
        ],
        "attributes": [
            {"object_id": "o", "alias": "ID", "data_type": "number"},
            {"object_id": "o", "alias": "CUSTOMER", "data_type": "relation"},
            {"object_id": "c", "alias": "ID", "data_type": "number"},
            {"object_id": "c", "alias": "NAME"}
        ],
        "relations": [
            {"id": "r1", "alias": "CUSTOMER", "left_object_id": "o", "right_object_id": "c"}
        ]
    }"#;

    #[test]
    fn derives_reverse_relations() {
        let model = MetaModel::from_json_str(MODEL).unwrap();
        let customer = model.object_by_alias("shop.CUSTOMER").unwrap();
        let rev = customer.relation("ORDER").unwrap();
        assert!(rev.is_reverse());
        assert_eq!(rev.right_object_id, "o");
        assert_eq!(rev.right_key_attribute, "CUSTOMER");
        assert_eq!(rev.left_key_attribute, "ID");
    }

    #[test]
    fn finds_forward_relation_first() {
        let model = MetaModel::from_json_str(MODEL).unwrap();
        let order = model.object("shop.ORDER").unwrap();
        let customer = model.object("c").unwrap();
        let rel = model.find_relation(&order, &customer).unwrap();
        assert_eq!(rel.alias, "CUSTOMER");
        assert!(!rel.is_reverse());
        assert!(model.find_relation(&order, &order).is_none());
    }

    #[test]
    fn bad_json_is_a_load_error() {
        assert!(matches!(MetaModel::from_json_str("{"), Err(ModelError::Load(_))));
    }
}
