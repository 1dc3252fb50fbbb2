//! Aggregate functions applied across data sheet rows.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Separator between an attribute alias and its aggregate function (e.g. `AMOUNT:SUM`).
pub const AGGREGATOR_SEPARATOR: char = ':';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateFunction {
    Sum,
    Avg,
    Min,
    Max,
    Count,
    CountDistinct,
    List,
    ListDistinct,
}

impl AggregateFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Count => "COUNT",
            AggregateFunction::CountDistinct => "COUNT_DISTINCT",
            AggregateFunction::List => "LIST",
            AggregateFunction::ListDistinct => "LIST_DISTINCT",
        }
    }

    /// Aggregates `values`. Nulls are ignored; no non-null input yields null (or 0 for counts).
    pub fn apply(&self, values: &[Value]) -> Value {
        let present: Vec<&Value> = values.iter().filter(|v| !is_empty_value(v)).collect();
        match self {
            AggregateFunction::Count => Value::from(present.len() as u64),
            AggregateFunction::CountDistinct => Value::from(distinct(&present).len() as u64),
            AggregateFunction::List => join(&present),
            AggregateFunction::ListDistinct => join(&distinct(&present)),
            AggregateFunction::Sum | AggregateFunction::Avg => {
                if present.is_empty() {
                    return Value::Null;
                }
                let Some(numbers) = numbers(&present) else {
                    return Value::Null;
                };
                let sum: f64 = numbers.iter().sum();
                if *self == AggregateFunction::Sum {
                    number(sum)
                } else {
                    number(sum / numbers.len() as f64)
                }
            }
            AggregateFunction::Min | AggregateFunction::Max => {
                let want_max = *self == AggregateFunction::Max;
                if let Some(numbers) = numbers(&present) {
                    let picked = numbers.into_iter().reduce(|a, b| {
                        if (b > a) == want_max {
                            b
                        } else {
                            a
                        }
                    });
                    return picked.map(number).unwrap_or(Value::Null);
                }
                let picked = present.into_iter().map(display).reduce(|a, b| {
                    if (b > a) == want_max {
                        b
                    } else {
                        a
                    }
                });
                picked.map(Value::String).unwrap_or(Value::Null)
            }
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SUM" => Ok(AggregateFunction::Sum),
            "AVG" => Ok(AggregateFunction::Avg),
            "MIN" => Ok(AggregateFunction::Min),
            "MAX" => Ok(AggregateFunction::Max),
            "COUNT" => Ok(AggregateFunction::Count),
            "COUNT_DISTINCT" => Ok(AggregateFunction::CountDistinct),
            "LIST" => Ok(AggregateFunction::List),
            "LIST_DISTINCT" => Ok(AggregateFunction::ListDistinct),
            other => Err(format!("unknown aggregate function: {}", other)),
        }
    }
}

/// Splits `ALIAS:SUM` into the alias and its aggregator. Unknown suffixes are kept in the alias.
pub fn split_aggregator(expression: &str) -> (&str, Option<AggregateFunction>) {
    if let Some((alias, func)) = expression.rsplit_once(AGGREGATOR_SEPARATOR) {
        if let Ok(f) = func.parse() {
            return (alias, Some(f));
        }
    }
    (expression, None)
}

/// Null, empty strings and empty arrays carry no value for prefill purposes.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn numbers(values: &[&Value]) -> Option<Vec<f64>> {
    values
        .iter()
        .map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        })
        .collect()
}

fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn distinct<'a>(values: &[&'a Value]) -> Vec<&'a Value> {
    let mut out: Vec<&Value> = Vec::new();
    for v in values {
        if !out.contains(v) {
            out.push(v);
        }
    }
    out
}

fn join(values: &[&Value]) -> Value {
    if values.is_empty() {
        return Value::Null;
    }
    Value::String(values.iter().map(|v| display(v)).collect::<Vec<_>>().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sums_numbers_and_numeric_strings() {
        let values = vec![json!(1), json!("2.5"), Value::Null];
        assert_eq!(AggregateFunction::Sum.apply(&values), json!(3.5));
        assert_eq!(AggregateFunction::Sum.apply(&[json!(2), json!(3)]), json!(5));
    }

    #[test]
    fn counts_skip_empty_values() {
        let values = vec![json!("a"), json!(""), json!("a"), json!("b")];
        assert_eq!(AggregateFunction::Count.apply(&values), json!(3));
        assert_eq!(AggregateFunction::CountDistinct.apply(&values), json!(2));
    }

    #[test]
    fn lists_and_extremes() {
        let values = vec![json!("x"), json!("y"), json!("x")];
        assert_eq!(AggregateFunction::ListDistinct.apply(&values), json!("x, y"));
        assert_eq!(AggregateFunction::Max.apply(&values), json!("y"));
        assert_eq!(AggregateFunction::Min.apply(&[json!(4), json!(-1)]), json!(-1));
        assert_eq!(AggregateFunction::Avg.apply(&[]), Value::Null);
    }

    #[test]
    fn splits_known_suffixes_only() {
        assert_eq!(
            split_aggregator("POSITION__AMOUNT:SUM"),
            ("POSITION__AMOUNT", Some(AggregateFunction::Sum))
        );
        assert_eq!(split_aggregator("TIME:12"), ("TIME:12", None));
        assert_eq!(split_aggregator("NAME"), ("NAME", None));
    }
}
