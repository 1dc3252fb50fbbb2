//! Relation paths: ordered relation steps leading from one meta object to another.

use crate::error::ModelError;
use crate::model::resolved::{MetaModelProvider, MetaObject, Relation, RELATION_SEPARATOR};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct RelationPath {
    /// Start object followed by the object reached after each relation.
    objects: Vec<Arc<MetaObject>>,
    relations: Vec<Relation>,
}

impl RelationPath {
    pub fn new(start: Arc<MetaObject>) -> Self {
        RelationPath {
            objects: vec![start],
            relations: Vec::new(),
        }
    }

    /// Parses `REL1__REL2` starting at `start`. An empty string yields an empty path.
    pub fn parse(model: &dyn MetaModelProvider, start: Arc<MetaObject>, text: &str) -> Result<Self, ModelError> {
        let mut path = RelationPath::new(start);
        for alias in text.split(RELATION_SEPARATOR).filter(|s| !s.is_empty()) {
            let relation = path.end_object().relation(alias)?.clone();
            path.append(model, relation)?;
        }
        Ok(path)
    }

    pub fn start_object(&self) -> &Arc<MetaObject> {
        &self.objects[0]
    }

    pub fn end_object(&self) -> &Arc<MetaObject> {
        &self.objects[self.objects.len() - 1]
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Appends a relation leaving the current end object.
    pub fn append(&mut self, model: &dyn MetaModelProvider, relation: Relation) -> Result<(), ModelError> {
        if relation.left_object_id != self.end_object().id {
            return Err(ModelError::Validation(format!(
                "relation {} does not start at {}",
                relation.alias,
                self.end_object().alias_with_namespace()
            )));
        }
        let next = model.object_by_id(&relation.right_object_id)?;
        self.relations.push(relation);
        self.objects.push(next);
        Ok(())
    }

    /// The same path walked from its end back to its start.
    pub fn reversed(&self) -> RelationPath {
        RelationPath {
            objects: self.objects.iter().rev().cloned().collect(),
            relations: self.relations.iter().rev().map(Relation::reversed).collect(),
        }
    }

    /// Attribute alias of `alias` on the end object, seen from the start object.
    pub fn prefix_alias(&self, alias: &str) -> String {
        if self.is_empty() {
            alias.to_string()
        } else {
            format!("{}{}{}", self, RELATION_SEPARATOR, alias)
        }
    }
}

impl fmt::Display for RelationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aliases: Vec<&str> = self.relations.iter().map(|r| r.alias.as_str()).collect();
        write!(f, "{}", aliases.join(RELATION_SEPARATOR))
    }
}

impl PartialEq for RelationPath {
    fn eq(&self, other: &Self) -> bool {
        self.objects.len() == other.objects.len()
            && self.objects.iter().zip(&other.objects).all(|(a, b)| a.is(b))
            && self.relations.iter().map(|r| &r.alias).eq(other.relations.iter().map(|r| &r.alias))
    }
}
