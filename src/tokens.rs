//! Token node types.

use serde::{Deserialize, Serialize};

/// Opaque, stable token identifier.
///
/// In production data this is a chain address; demo data uses small integers.
/// Identity never changes once a token is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TokenId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tradeable asset, represented as a graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenNode {
    pub id: TokenId,
    /// Display symbol, e.g. "WETH".
    pub label: String,
    /// Optional visual size hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl TokenNode {
    pub fn new(id: impl Into<TokenId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            size: None,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }
}
