//! Filter conditions and condition groups of a data sheet.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// Contains / is like.
    #[default]
    #[serde(rename = "=")]
    Is,
    #[serde(rename = "!=")]
    IsNot,
    #[serde(rename = "==")]
    Equals,
    #[serde(rename = "!==")]
    EqualsNot,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEquals,
    #[serde(rename = "[")]
    In,
    #[serde(rename = "![")]
    NotIn,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Is => "=",
            Comparator::IsNot => "!=",
            Comparator::Equals => "==",
            Comparator::EqualsNot => "!==",
            Comparator::LessThan => "<",
            Comparator::LessThanOrEquals => "<=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterThanOrEquals => ">=",
            Comparator::In => "[",
            Comparator::NotIn => "![",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "=" => Comparator::Is,
            "!=" => Comparator::IsNot,
            "==" => Comparator::Equals,
            "!==" => Comparator::EqualsNot,
            "<" => Comparator::LessThan,
            "<=" => Comparator::LessThanOrEquals,
            ">" => Comparator::GreaterThan,
            ">=" => Comparator::GreaterThanOrEquals,
            "[" => Comparator::In,
            "![" => Comparator::NotIn,
            other => return Err(format!("unknown comparator: {}", other)),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Attribute alias (possibly with a relation path) the condition applies to.
    pub expression: String,
    #[serde(default)]
    pub comparator: Comparator,
    pub value: Value,
}

impl Condition {
    pub fn new(expression: impl Into<String>, comparator: Comparator, value: Value) -> Self {
        Condition {
            expression: expression.into(),
            comparator,
            value,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default)]
    pub operator: LogicalOperator,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub nested_groups: Vec<ConditionGroup>,
}

impl ConditionGroup {
    pub fn new(operator: LogicalOperator) -> Self {
        ConditionGroup {
            operator,
            conditions: Vec::new(),
            nested_groups: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.nested_groups.iter().all(ConditionGroup::is_empty)
    }

    /// Adds `condition` unless an identical one is already present.
    pub fn add_condition(&mut self, condition: Condition) -> bool {
        if self.conditions.contains(&condition) {
            return false;
        }
        self.conditions.push(condition);
        true
    }

    pub fn add_nested_group(&mut self, group: ConditionGroup) {
        self.nested_groups.push(group);
    }

    /// Conditions of this group and all nested groups, depth first.
    pub fn conditions_recursive(&self) -> Vec<&Condition> {
        let mut out: Vec<&Condition> = self.conditions.iter().collect();
        for g in &self.nested_groups {
            out.extend(g.conditions_recursive());
        }
        out
    }

    /// Conditions that must all hold: top-level AND conditions and those of nested AND groups.
    pub fn conjunctive_conditions(&self) -> Vec<&Condition> {
        if self.operator != LogicalOperator::And {
            return Vec::new();
        }
        let mut out: Vec<&Condition> = self.conditions.iter().collect();
        for g in &self.nested_groups {
            out.extend(g.conjunctive_conditions());
        }
        out
    }

    pub fn find(&self, expression: &str, comparator: Comparator) -> Option<&Condition> {
        self.conditions_recursive()
            .into_iter()
            .find(|c| c.expression == expression && c.comparator == comparator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comparator_text_round_trip() {
        for c in ["=", "!=", "==", "!==", "<", "<=", ">", ">=", "[", "!["] {
            assert_eq!(c.parse::<Comparator>().unwrap().to_string(), c);
        }
        assert!("~".parse::<Comparator>().is_err());
    }

    #[test]
    fn or_groups_are_not_conjunctive() {
        let mut root = ConditionGroup::new(LogicalOperator::And);
        root.add_condition(Condition::new("STATUS", Comparator::Equals, json!(10)));
        let mut or = ConditionGroup::new(LogicalOperator::Or);
        or.add_condition(Condition::new("NAME", Comparator::Is, json!("a")));
        root.add_nested_group(or);
        assert_eq!(root.conjunctive_conditions().len(), 1);
        assert_eq!(root.conditions_recursive().len(), 2);
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut g = ConditionGroup::default();
        assert!(g.add_condition(Condition::new("ID", Comparator::Equals, json!(1))));
        assert!(!g.add_condition(Condition::new("ID", Comparator::Equals, json!(1))));
        assert_eq!(g.conditions.len(), 1);
    }
}
