//! Typed error taxonomy for graph mutations, routing and streaming.
//!
//! Every failure in this crate is a value the caller must check; nothing here
//! aborts the process. Graph mutations fail fast and leave state untouched,
//! the ingestion layer degrades per entry, and the solver reports "no route"
//! as data rather than as a panic.

use thiserror::Error;

use crate::pools::{PoolId, Protocol};
use crate::tokens::TokenId;

/// Errors raised by canonical graph mutations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A token with this id already exists; the original is retained.
    #[error("duplicate token id {0}")]
    DuplicateToken(TokenId),

    /// A pool with this id already exists; the original is retained.
    #[error("duplicate pool id {0}")]
    DuplicatePool(PoolId),

    /// A pool references a token id that is not registered.
    #[error("pool {pool} references unknown token {token}")]
    UnknownToken { pool: PoolId, token: TokenId },

    /// Update targeted a pool id that is not present. Removal of a missing
    /// pool is idempotent and does not produce this error.
    #[error("pool {0} not found")]
    PoolNotFound(PoolId),

    /// No color mapping exists for this protocol. Styling degrades to the
    /// configured fallback color instead of aborting ingestion.
    #[error("no style mapping for protocol {0}")]
    UnknownProtocol(Protocol),

    /// Spot prices are quoted per unit and must be strictly positive.
    #[error("invalid spot price {price} for pool {pool}")]
    InvalidSpotPrice { pool: PoolId, price: f64 },
}

/// Errors raised by best-route queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The start token id is absent from the graph.
    #[error("start token {0} not present in graph")]
    UnknownStart(TokenId),

    /// The end token id is absent from the graph.
    #[error("end token {0} not present in graph")]
    UnknownEnd(TokenId),

    /// No 1- or 2-hop path connects the two tokens. Carries both display
    /// labels for diagnostics.
    #[error("no route between {start_label} and {end_label}")]
    NoRoute {
        start_label: String,
        end_label: String,
    },
}

/// Errors surfaced by the streaming feed.
///
/// A transport failure never leaves the graph half-updated: message handling
/// is atomic, so state stays at the last consistent point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("stream disconnected: {0}")]
    Disconnected(String),
}
