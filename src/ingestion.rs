//! # Ingestion Adapter
//!
//! Translates external streaming messages into canonical graph mutations.
//!
//! ## Overview
//!
//! The feed delivers batches of newly observed pools keyed by pool
//! identifier, each carrying its two token descriptors and a protocol tag,
//! plus a side map from pool id to spot price. The adapter:
//!
//! - registers any token not already known, deduplicating by address both
//!   across batches and within one batch;
//! - maps the zero-address sentinel to the configured native-asset symbol;
//! - constructs pool edges with the spot price from the side map (defaulting
//!   to the configured value when absent) and canonical protocol color;
//! - skips malformed entries with a recorded warning instead of failing the
//!   whole batch.
//!
//! The returned [`IngestionReport`] lists what was actually added so the
//! caller can patch the materialized view incrementally and refresh any
//! auxiliary UI.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::graph_store::GraphStore;
use crate::pools::{PoolEdge, PoolId, Protocol};
use crate::settings::IngestionSettings;
use crate::style::ProtocolStyle;
use crate::tokens::{TokenId, TokenNode};

/// Token descriptor as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub address: String,
    pub symbol: String,
}

/// One observed pool inside a batch.
///
/// Fields are optional on the wire; entries missing their token pair or
/// protocol tag are skipped per entry, never aborting the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolObservation {
    #[serde(default)]
    pub token0: Option<TokenDescriptor>,
    #[serde(default)]
    pub token1: Option<TokenDescriptor>,
    #[serde(default)]
    pub protocol: Option<Protocol>,
    /// Pool TVL in USD, used only to derive the cosmetic edge width.
    #[serde(default)]
    pub tvl_usd: Option<f64>,
}

/// A batch of newly observed pools plus a side map of spot prices.
///
/// The price map may be empty or absent; missing prices default to the
/// configured value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedBatch {
    #[serde(default)]
    pub pools: IndexMap<PoolId, PoolObservation>,
    #[serde(default)]
    pub spot_prices: HashMap<PoolId, f64>,
}

/// Messages delivered by the streaming feed, one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Newly observed pools (and their tokens).
    Observed(ObservedBatch),
    /// Spot price ticks for already-known pools.
    PriceUpdate { updates: HashMap<PoolId, f64> },
    /// Pools that disappeared from the venue.
    Removed { pool_ids: Vec<PoolId> },
}

/// What one batch actually changed, post-dedupe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionReport {
    pub tokens_added: Vec<TokenId>,
    pub pools_added: Vec<PoolId>,
    /// Malformed or rejected entries, skipped with a warning.
    pub skipped: usize,
}

impl IngestionReport {
    pub fn token_count(&self) -> usize {
        self.tokens_added.len()
    }

    pub fn pool_count(&self) -> usize {
        self.pools_added.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens_added.is_empty() && self.pools_added.is_empty()
    }
}

/// Translates observed-pool batches into graph mutations.
#[derive(Debug, Clone)]
pub struct IngestionAdapter {
    settings: IngestionSettings,
}

impl IngestionAdapter {
    pub fn new(settings: IngestionSettings) -> Self {
        Self { settings }
    }

    /// Applies one batch to the store.
    ///
    /// Degrades per entry: a malformed pool is skipped and counted, and the
    /// rest of the batch still lands.
    pub fn ingest_batch(
        &self,
        store: &mut GraphStore,
        style: &ProtocolStyle,
        batch: &ObservedBatch,
    ) -> IngestionReport {
        let mut report = IngestionReport::default();

        for (pool_id, observation) in &batch.pools {
            if store.has_pool(pool_id) {
                // Re-observation of a known pool is normal in a stream.
                debug!("Pool {} already known, skipping", pool_id);
                continue;
            }

            let (token0, token1) = match (&observation.token0, &observation.token1) {
                (Some(t0), Some(t1)) => (t0, t1),
                _ => {
                    warn!("Pool {} is missing its token pair, skipping entry", pool_id);
                    report.skipped += 1;
                    continue;
                }
            };
            let protocol = match &observation.protocol {
                Some(protocol) => protocol.clone(),
                None => {
                    warn!("Pool {} has no protocol tag, skipping entry", pool_id);
                    report.skipped += 1;
                    continue;
                }
            };

            let from = self.register_token(store, token0, &mut report);
            let to = self.register_token(store, token1, &mut report);

            let spot_price = batch
                .spot_prices
                .get(pool_id)
                .copied()
                .unwrap_or(self.settings.default_spot_price);
            let width = observation
                .tvl_usd
                .map(width_from_tvl)
                .unwrap_or(1.0);

            let edge = PoolEdge::new(pool_id.clone(), from, to, protocol, spot_price, width);
            match store.add_pool(edge, style) {
                Ok(()) => report.pools_added.push(pool_id.clone()),
                Err(e) => {
                    warn!("Pool {} rejected: {}, skipping entry", pool_id, e);
                    report.skipped += 1;
                }
            }
        }

        debug!(
            "Ingested batch: {} tokens, {} pools added, {} skipped",
            report.token_count(),
            report.pool_count(),
            report.skipped
        );
        report
    }

    /// Registers a token if unknown, returning its id.
    ///
    /// The zero-address sentinel is mapped to the native-asset symbol; the
    /// address itself stays the identity key, so dedupe still holds.
    fn register_token(
        &self,
        store: &mut GraphStore,
        descriptor: &TokenDescriptor,
        report: &mut IngestionReport,
    ) -> TokenId {
        let id = TokenId::from(descriptor.address.clone());
        if store.has_token(&id) {
            return id;
        }

        let symbol = if descriptor.address == self.settings.zero_address {
            self.settings.native_asset_symbol.clone()
        } else {
            descriptor.symbol.clone()
        };
        if store.add_token(TokenNode::new(id.clone(), symbol)).is_ok() {
            report.tokens_added.push(id.clone());
        }
        id
    }
}

/// Cosmetic edge width from a TVL magnitude.
fn width_from_tvl(tvl_usd: f64) -> f64 {
    if tvl_usd <= 1_000.0 {
        return 1.0;
    }
    (tvl_usd.log10() - 2.0).clamp(1.0, 8.0)
}
