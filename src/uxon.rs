//! UXON: the ordered, JSON-like config tree widgets are built from and exported to.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UxonObject(Map<String, Value>);

impl UxonObject {
    pub fn new() -> Self {
        UxonObject(Map::new())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Wraps a JSON value; anything but an object yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(UxonObject(map)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.0)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Child objects under `key`: an array of objects, or a single object.
    pub fn property_as_objects(&self, key: &str) -> Vec<UxonObject> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| UxonObject::from_value(v.clone()))
                .collect(),
            Some(Value::Object(map)) => vec![UxonObject(map.clone())],
            _ => Vec::new(),
        }
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn set_object(&mut self, key: impl Into<String>, value: UxonObject) -> &mut Self {
        self.0.insert(key.into(), value.into_value());
        self
    }

    pub fn set_objects(&mut self, key: impl Into<String>, values: Vec<UxonObject>) -> &mut Self {
        let arr = values.into_iter().map(UxonObject::into_value).collect();
        self.0.insert(key.into(), Value::Array(arr));
        self
    }

    pub fn unset_property(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn property_names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Removes `key` from this object and from every nested object and array.
    pub fn unset_property_recursive(&mut self, key: &str) {
        self.0.shift_remove(key);
        for (_, v) in self.0.iter_mut() {
            strip_key(v, key);
        }
    }
}

fn strip_key(value: &mut Value, key: &str) {
    match value {
        Value::Object(map) => {
            map.shift_remove(key);
            for (_, v) in map.iter_mut() {
                strip_key(v, key);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                strip_key(v, key);
            }
        }
        _ => {}
    }
}

impl From<Map<String, Value>> for UxonObject {
    fn from(map: Map<String, Value>) -> Self {
        UxonObject(map)
    }
}
