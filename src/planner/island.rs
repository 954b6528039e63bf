use std::fmt;

use serde::{Deserialize, Serialize};

/// Family of engines sharing one data model and query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Island {
    /// SQL engines.
    Relational,
    /// Array engines speaking AFL.
    Array,
}

impl fmt::Display for Island {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Island::Relational => write!(f, "relational"),
            Island::Array => write!(f, "array"),
        }
    }
}
