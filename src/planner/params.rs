use std::collections::HashMap;

use serde_json::Value;

use crate::error::{PlanError, PlanResult};

pub const RELATION_NAME: &str = "Relation-Name";
pub const CTE_NAME: &str = "CTE-Name";
pub const ALIAS: &str = "Alias";
pub const FILTER: &str = "Filter";
pub const SCHEMA: &str = "Schema";
pub const JOIN_FILTER: &str = "Join-Filter";
pub const GROUP_KEY: &str = "Group-Key";
pub const SORT_KEY: &str = "Sort-Key";

/// String parameters handed over by the explain front end for one operator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorParams {
    values: HashMap<String, String>,
}

impl OperatorParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Value for `key`; blank values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Comma separated list under `key`, trimmed, blanks dropped.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| {
                v.split(',')
                    .map(|item| item.trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reads a JSON object whose values are all strings.
    pub fn from_json(node: &str, value: &Value) -> PlanResult<Self> {
        let Value::Object(map) = value else {
            return Err(PlanError::construction(node, "malformed parameter map: expected an object"));
        };

        let mut params = Self::new();
        for (key, value) in map {
            match value {
                Value::String(s) => params.insert(key, s),
                Value::Null => {},
                other => {
                    return Err(PlanError::construction(
                        node,
                        format!("malformed parameter map: '{}' holds {} instead of a string", key, other),
                    ))
                },
            }
        }
        Ok(params)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for OperatorParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key.as_ref(), value.as_ref());
        }
        params
    }
}
