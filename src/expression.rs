//! Widget value expressions: attribute bindings, formulas, literals and links to other widgets.

use serde_json::Value;
use std::fmt;

/// Link to the value of another widget on the same page, written as `=widget_id` or `=widget_id!COLUMN`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetLink {
    pub widget_id: String,
    pub column: Option<String>,
}

impl fmt::Display for WidgetLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(col) => write!(f, "={}!{}", self.widget_id, col),
            None => write!(f, "={}", self.widget_id),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Expression {
    #[default]
    Empty,
    Attribute(String),
    /// Formula text without the leading `=`.
    Formula(String),
    Literal(Value),
    Reference(WidgetLink),
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn parse_link(body: &str) -> Option<WidgetLink> {
    let (id, column) = match body.split_once('!') {
        Some((id, col)) => (id, Some(col)),
        None => (body, None),
    };
    let starts_ok = id.chars().next().map(|c| c.is_ascii_alphabetic() || c == '_').unwrap_or(false);
    if !starts_ok || !id.chars().all(is_id_char) {
        return None;
    }
    if let Some(col) = column {
        if col.is_empty() || !col.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':') {
            return None;
        }
    }
    Some(WidgetLink {
        widget_id: id.to_string(),
        column: column.map(str::to_string),
    })
}

impl Expression {
    /// Parses a config value: `=id!COL` links, other `=...` strings are formulas, the rest are literals.
    pub fn parse_value(value: &Value) -> Expression {
        match value {
            Value::Null => Expression::Empty,
            Value::String(s) if s.is_empty() => Expression::Empty,
            Value::String(s) => match s.strip_prefix('=') {
                Some(body) => match parse_link(body) {
                    Some(link) => Expression::Reference(link),
                    None => Expression::Formula(body.to_string()),
                },
                None => Expression::Literal(value.clone()),
            },
            other => Expression::Literal(other.clone()),
        }
    }

    pub fn attribute(alias: impl Into<String>) -> Expression {
        Expression::Attribute(alias.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Expression::Empty)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Expression::Reference(_))
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, Expression::Attribute(_))
    }

    pub fn attribute_alias(&self) -> Option<&str> {
        match self {
            Expression::Attribute(alias) => Some(alias),
            _ => None,
        }
    }

    /// Config representation, inverse of [`Expression::parse_value`] for non-attribute expressions.
    pub fn to_value(&self) -> Value {
        match self {
            Expression::Empty => Value::Null,
            Expression::Attribute(alias) => Value::String(alias.clone()),
            Expression::Formula(f) => Value::String(format!("={}", f)),
            Expression::Literal(v) => v.clone(),
            Expression::Reference(link) => Value::String(link.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn distinguishes_links_formulas_and_literals() {
        assert_eq!(
            Expression::parse_value(&json!("=customer_combo!ID")),
            Expression::Reference(WidgetLink {
                widget_id: "customer_combo".into(),
                column: Some("ID".into())
            })
        );
        assert!(Expression::parse_value(&json!("=panel.input1")).is_reference());
        assert_eq!(
            Expression::parse_value(&json!("=NOW()")),
            Expression::Formula("NOW()".into())
        );
        assert_eq!(Expression::parse_value(&json!("Acme")), Expression::Literal(json!("Acme")));
        assert_eq!(Expression::parse_value(&json!(5)), Expression::Literal(json!(5)));
        assert!(Expression::parse_value(&json!("")).is_empty());
    }

    #[test]
    fn value_round_trip() {
        for v in [json!("=w1!NAME"), json!("=CONCAT(A, B)"), json!(false), json!("text")] {
            assert_eq!(Expression::parse_value(&v).to_value(), v);
        }
    }
}
