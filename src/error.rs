use thiserror::Error;

use crate::parser::ParseError;

pub type PlanResult<T> = Result<T, PlanError>;

/// Failures raised while building, copying or fingerprinting operator trees.
/// Each one aborts the planning pass that raised it.
#[derive(Debug, Clone, Error)]
pub enum PlanError {
    /// Required parameter missing, malformed parameter map or illegal tree edit.
    #[error("cannot construct {node}: {message}")]
    Construction { node: String, message: String },

    /// Filter text that the expression parser rejects, kept verbatim.
    #[error("cannot parse expression '{text}': {source}")]
    ExpressionParse {
        text: String,
        #[source]
        source: ParseError,
    },

    /// Column qualifier with no matching scan at its materialization boundary.
    #[error("alias '{alias}' used by {node} in '{filter}' does not resolve to any data object")]
    UnresolvedAlias { alias: String, node: String, filter: String },
}

impl PlanError {
    pub fn construction(node: impl Into<String>, message: impl Into<String>) -> Self {
        PlanError::Construction { node: node.into(), message: message.into() }
    }

    pub fn expression_parse(text: impl Into<String>, source: ParseError) -> Self {
        PlanError::ExpressionParse { text: text.into(), source }
    }
}

/// Failures reading a JSON document (configuration or catalog snapshot) from disk or text.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}
