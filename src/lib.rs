//! # Pool Graph SDK
//!
//! A Rust library for keeping a live, user-filterable multigraph of
//! tradeable tokens and liquidity pools continuously in sync with a
//! streaming data source, and for answering best-route queries over it.
//!
//! ## Overview
//!
//! The SDK separates canonical graph data from its materialized, rendered
//! projection. It focuses on:
//!
//! - **Ingestion**: translating streamed pool observations into
//!   deduplicated graph mutations
//! - **Synchronization**: deciding between full structural rebuilds and
//!   incremental patches of the rendered view
//! - **Styling**: pure appearance resolution under selection filters and a
//!   pausable highlight overlay
//! - **Routing**: best 1–2 hop route selection by multiplicative spot price
//!
//! ## Architecture
//!
//! ### Canonical Layer
//! [`GraphStore`] owns token and pool entities — pure data plus lookup,
//! mutated only by the ingestion adapter or explicit user operations.
//!
//! ### Selection & Emphasis Layer
//! [`VisibilityFilter`] holds the selected token and protocol sets;
//! [`HighlightOverlay`] tracks emphasized nodes/edges and whether the
//! overlay is pinned against rebuilds.
//!
//! ### View Layer
//! [`Synchronizer`] exclusively owns the materialized [`RenderedView`] and
//! keeps it derivable from (store, filter, overlay) at all times, using
//! [`StyleResolver`] for appearance. The view is handed to an external
//! renderer; this crate never draws pixels.
//!
//! ### Query Layer
//! [`solver::find_best_route`] answers best-route queries; the
//! [`simulation`] module ships the request/response shapes plus a thin HTTP
//! client for the external route-simulation service.
//!
//! ## Example
//!
//! ```rust
//! use pool_graph_sdk::{GraphSession, Settings, UserEvent};
//!
//! let mut session = GraphSession::new(Settings::default());
//! session.handle_event(UserEvent::SelectAllTokens);
//! assert!(session.view().is_empty());
//! ```

// Core Types
/// Token node types
pub mod tokens;
/// Pool edge types and protocol tags
pub mod pools;
/// Typed error taxonomy
pub mod errors;

// Canonical State
/// Canonical token/pool ownership and lookup
pub mod graph_store;
/// User-controlled visibility filter
pub mod filter;
/// Pausable highlight overlay
pub mod highlight;

// View Layer
/// Appearance resolution (protocol colors, muting, highlight emphasis)
pub mod style;
/// Materialized view synchronization
pub mod synchronizer;

// Ingestion & Queries
/// Streaming ingestion adapter
pub mod ingestion;
/// Best-route solver
pub mod solver;
/// Route simulation client
pub mod simulation;

// Session & Configuration
/// Per-session aggregate and user-control surface
pub mod session;
/// Configuration management
pub mod settings;

// Re-exports for convenience
pub use errors::{GraphError, RouteError, TransportError};
pub use filter::VisibilityFilter;
pub use graph_store::GraphStore;
pub use highlight::HighlightOverlay;
pub use ingestion::{IngestionAdapter, IngestionReport, ObservedBatch, StreamMessage};
pub use pools::{PoolEdge, PoolId, PoolPatch, Protocol};
pub use session::{EventOutcome, GraphSession, UserEvent};
pub use settings::Settings;
pub use solver::RouteResult;
pub use style::{Appearance, ProtocolStyle, StyleResolver};
pub use synchronizer::{RenderedView, Synchronizer};
pub use tokens::{TokenId, TokenNode};
