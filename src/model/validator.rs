//! Model validation: referential integrity between objects, attributes and relations.

use crate::error::ModelError;
use crate::model::ModelConfig;
use std::collections::{HashMap, HashSet};

pub fn validate(config: &ModelConfig) -> Result<(), ModelError> {
    if config.objects.is_empty() {
        return Err(ModelError::Validation("at least one object required".into()));
    }
    let mut object_ids = HashSet::new();
    let mut qualified_aliases = HashSet::new();
    for o in &config.objects {
        if o.alias.is_empty() || o.namespace.is_empty() {
            return Err(ModelError::Validation(format!(
                "object {} needs both a namespace and an alias",
                o.id
            )));
        }
        if !object_ids.insert(o.id.as_str()) {
            return Err(ModelError::Validation(format!("duplicate object id: {}", o.id)));
        }
        let qualified = format!("{}.{}", o.namespace, o.alias);
        if !qualified_aliases.insert(qualified.clone()) {
            return Err(ModelError::DuplicateAlias(qualified));
        }
    }

    let mut attributes_by_object: HashMap<&str, HashSet<&str>> = HashMap::new();
    for a in &config.attributes {
        if !object_ids.contains(a.object_id.as_str()) {
            return Err(ModelError::MissingReference {
                kind: "object",
                id: a.object_id.clone(),
            });
        }
        if a.alias.contains("__") || a.alias.contains(':') {
            return Err(ModelError::Validation(format!(
                "attribute alias '{}' must not contain '__' or ':'",
                a.alias
            )));
        }
        if !attributes_by_object
            .entry(a.object_id.as_str())
            .or_default()
            .insert(a.alias.as_str())
        {
            return Err(ModelError::Validation(format!(
                "duplicate attribute {} on object {}",
                a.alias, a.object_id
            )));
        }
    }

    for o in &config.objects {
        let attrs = attributes_by_object.get(o.id.as_str());
        for alias in [&o.uid_attribute, &o.label_attribute].into_iter().flatten() {
            if !attrs.map(|s| s.contains(alias.as_str())).unwrap_or(false) {
                return Err(ModelError::MissingReference {
                    kind: "attribute",
                    id: format!("{}.{}", o.alias, alias),
                });
            }
        }
    }

    let mut relation_ids = HashSet::new();
    for r in &config.relations {
        if !relation_ids.insert(r.id.as_str()) {
            return Err(ModelError::Validation(format!("duplicate relation id: {}", r.id)));
        }
        if !object_ids.contains(r.left_object_id.as_str()) || !object_ids.contains(r.right_object_id.as_str()) {
            return Err(ModelError::MissingReference {
                kind: "relation",
                id: r.id.clone(),
            });
        }
        let right_has_key = r.right_key_attribute.is_some()
            || config
                .objects
                .iter()
                .any(|o| o.id == r.right_object_id && o.uid_attribute.is_some());
        if !right_has_key {
            return Err(ModelError::Validation(format!(
                "relation {} needs a right key attribute or a uid attribute on its right object",
                r.id
            )));
        }
    }

    Ok(())
}
