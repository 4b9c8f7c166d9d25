//! Pool edge types.
//!
//! A pool is a liquidity venue for a token pair under one protocol. The pool
//! id (contract address) is the sole identity key; `(from, to, protocol)` is
//! deliberately not unique, since parallel pools across protocols are legal.

use serde::{Deserialize, Serialize};

use crate::tokens::TokenId;

/// Globally unique pool identifier (pool/contract address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(String);

impl PoolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PoolId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PoolId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// AMM protocol tag hosting a pool.
///
/// Kept as an open string-like type rather than a closed enum: protocol tags
/// arrive over the wire, and an unmapped tag must flow through ingestion and
/// hit the documented style-fallback path instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Protocol(String);

impl Protocol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Protocol {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A liquidity pool, represented as a graph edge.
///
/// Direction is canonical but swaps are bidirectional: `spot_price` is quoted
/// in the `from → to` direction (amount of `to` received per unit of `from`)
/// and is inverted when a route traverses the edge backwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEdge {
    pub id: PoolId,
    pub from: TokenId,
    pub to: TokenId,
    pub protocol: Protocol,
    /// Strictly positive spot exchange rate in the `from → to` direction.
    pub spot_price: f64,
    /// Visual weight derived from a magnitude such as TVL. Purely cosmetic.
    pub width: f64,
    /// Canonical protocol color. Derived at insert time, never authoritative.
    pub color: String,
}

impl PoolEdge {
    pub fn new(
        id: impl Into<PoolId>,
        from: impl Into<TokenId>,
        to: impl Into<TokenId>,
        protocol: impl Into<Protocol>,
        spot_price: f64,
        width: f64,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            protocol: protocol.into(),
            spot_price,
            width,
            color: String::new(),
        }
    }

    /// Whether this pool connects `a` and `b`, in either direction.
    pub fn connects(&self, a: &TokenId, b: &TokenId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    /// Whether either endpoint is `token`.
    pub fn touches(&self, token: &TokenId) -> bool {
        &self.from == token || &self.to == token
    }

    /// The endpoint opposite to `token`, if `token` is an endpoint.
    pub fn other_endpoint(&self, token: &TokenId) -> Option<&TokenId> {
        if &self.from == token {
            Some(&self.to)
        } else if &self.to == token {
            Some(&self.from)
        } else {
            None
        }
    }

    /// Direction-corrected spot price when entering the pool at `token_in`.
    ///
    /// Returns `spot_price` for a forward traversal and `1 / spot_price` for
    /// a reverse traversal; `None` when `token_in` is not an endpoint.
    pub fn price_from(&self, token_in: &TokenId) -> Option<f64> {
        if &self.from == token_in {
            Some(self.spot_price)
        } else if &self.to == token_in {
            Some(1.0 / self.spot_price)
        } else {
            None
        }
    }
}

/// Partial update applied to an existing pool.
///
/// Only present fields are patched; the derived color is recomputed when the
/// protocol changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
}

impl PoolPatch {
    pub fn spot_price(price: f64) -> Self {
        Self {
            spot_price: Some(price),
            ..Default::default()
        }
    }
}
