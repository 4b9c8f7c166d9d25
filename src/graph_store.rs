//! # Graph Store
//!
//! Canonical ownership of token and pool entities — pure data plus lookup,
//! no rendering policy.
//!
//! ## Invariants
//!
//! - Token ids are unique; a token is created once and its identity never
//!   changes.
//! - Every pool endpoint references a registered token.
//! - Spot prices are strictly positive.
//! - Iteration follows insertion order, so snapshots are deterministic.
//!
//! Mutations fail fast: a rejected operation leaves the store exactly as it
//! was, with no partially applied state.

use indexmap::IndexMap;
use tracing::debug;

use crate::errors::GraphError;
use crate::pools::{PoolEdge, PoolId, PoolPatch};
use crate::style::ProtocolStyle;
use crate::tokens::{TokenId, TokenNode};

#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    tokens: IndexMap<TokenId, TokenNode>,
    pools: IndexMap<PoolId, PoolEdge>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new token.
    pub fn add_token(&mut self, token: TokenNode) -> Result<(), GraphError> {
        if self.tokens.contains_key(&token.id) {
            return Err(GraphError::DuplicateToken(token.id));
        }
        debug!("Registered token {} ({})", token.id, token.label);
        self.tokens.insert(token.id.clone(), token);
        Ok(())
    }

    /// Inserts a new pool, resolving its canonical color from `style`.
    ///
    /// Unmapped protocols degrade to the fallback color; they never abort
    /// ingestion of an otherwise valid pool.
    pub fn add_pool(&mut self, mut edge: PoolEdge, style: &ProtocolStyle) -> Result<(), GraphError> {
        if self.pools.contains_key(&edge.id) {
            return Err(GraphError::DuplicatePool(edge.id));
        }
        for endpoint in [&edge.from, &edge.to] {
            if !self.tokens.contains_key(endpoint) {
                return Err(GraphError::UnknownToken {
                    pool: edge.id.clone(),
                    token: endpoint.clone(),
                });
            }
        }
        if !(edge.spot_price > 0.0) {
            return Err(GraphError::InvalidSpotPrice {
                pool: edge.id,
                price: edge.spot_price,
            });
        }

        edge.color = style.color_or_fallback(&edge.protocol).to_string();
        self.pools.insert(edge.id.clone(), edge);
        Ok(())
    }

    /// Applies a partial patch to an existing pool.
    ///
    /// The whole patch is validated before anything is applied; the derived
    /// color is recomputed when the protocol changes.
    pub fn update_pool(
        &mut self,
        id: &PoolId,
        patch: PoolPatch,
        style: &ProtocolStyle,
    ) -> Result<(), GraphError> {
        if let Some(price) = patch.spot_price {
            if !(price > 0.0) {
                return Err(GraphError::InvalidSpotPrice {
                    pool: id.clone(),
                    price,
                });
            }
        }
        let edge = self
            .pools
            .get_mut(id)
            .ok_or_else(|| GraphError::PoolNotFound(id.clone()))?;

        if let Some(price) = patch.spot_price {
            edge.spot_price = price;
        }
        if let Some(width) = patch.width {
            edge.width = width;
        }
        if let Some(protocol) = patch.protocol {
            if protocol != edge.protocol {
                edge.color = style.color_or_fallback(&protocol).to_string();
            }
            edge.protocol = protocol;
        }
        Ok(())
    }

    /// Removes a pool. Idempotent: removing an absent id is a successful
    /// no-op, and returns whether anything was actually deleted.
    pub fn remove_pool(&mut self, id: &PoolId) -> bool {
        self.pools.shift_remove(id).is_some()
    }

    pub fn token(&self, id: &TokenId) -> Option<&TokenNode> {
        self.tokens.get(id)
    }

    pub fn pool(&self, id: &PoolId) -> Option<&PoolEdge> {
        self.pools.get(id)
    }

    pub fn has_token(&self, id: &TokenId) -> bool {
        self.tokens.contains_key(id)
    }

    pub fn has_pool(&self, id: &PoolId) -> bool {
        self.pools.contains_key(id)
    }

    /// Tokens in insertion order.
    pub fn tokens(&self) -> impl Iterator<Item = &TokenNode> {
        self.tokens.values()
    }

    /// Pools in insertion order.
    pub fn pools(&self) -> impl Iterator<Item = &PoolEdge> {
        self.pools.values()
    }

    pub fn token_ids(&self) -> impl Iterator<Item = &TokenId> {
        self.tokens.keys()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Display label for a token id, or a placeholder for unknown ids.
    pub fn label_of(&self, id: &TokenId) -> String {
        self.tokens
            .get(id)
            .map(|t| t.label.clone())
            .unwrap_or_else(|| format!("Unknown({})", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_pair() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_token(TokenNode::new("a", "AAA")).unwrap();
        store.add_token(TokenNode::new("b", "BBB")).unwrap();
        store
    }

    #[test]
    fn test_duplicate_token_rejected_original_retained() {
        let mut store = GraphStore::new();
        store.add_token(TokenNode::new("a", "AAA")).unwrap();

        let err = store.add_token(TokenNode::new("a", "OTHER")).unwrap_err();

        assert_eq!(err, GraphError::DuplicateToken(TokenId::from("a")));
        assert_eq!(store.token(&TokenId::from("a")).unwrap().label, "AAA");
    }

    #[test]
    fn test_add_pool_requires_known_endpoints() {
        let mut store = store_with_pair();
        let style = ProtocolStyle::default();

        let err = store
            .add_pool(PoolEdge::new("p1", "a", "zzz", "uniswap_v2", 1.0, 1.0), &style)
            .unwrap_err();

        assert!(matches!(err, GraphError::UnknownToken { .. }));
        assert_eq!(store.pool_count(), 0);
    }

    #[test]
    fn test_add_pool_resolves_canonical_color() {
        let mut store = store_with_pair();
        let style = ProtocolStyle::default();

        store
            .add_pool(PoolEdge::new("p1", "a", "b", "uniswap_v2", 2.0, 1.0), &style)
            .unwrap();

        assert_eq!(store.pool(&PoolId::from("p1")).unwrap().color, "#ff007a");
    }

    #[test]
    fn test_duplicate_pool_rejected() {
        let mut store = store_with_pair();
        let style = ProtocolStyle::default();
        store
            .add_pool(PoolEdge::new("p1", "a", "b", "uniswap_v2", 2.0, 1.0), &style)
            .unwrap();

        let err = store
            .add_pool(PoolEdge::new("p1", "b", "a", "curve", 9.0, 1.0), &style)
            .unwrap_err();

        assert_eq!(err, GraphError::DuplicatePool(PoolId::from("p1")));
        assert_eq!(store.pool(&PoolId::from("p1")).unwrap().spot_price, 2.0);
    }

    #[test]
    fn test_non_positive_spot_price_rejected() {
        let mut store = store_with_pair();
        let style = ProtocolStyle::default();

        for bad in [0.0, -1.5, f64::NAN] {
            let result =
                store.add_pool(PoolEdge::new("p1", "a", "b", "uniswap_v2", bad, 1.0), &style);
            assert!(matches!(result, Err(GraphError::InvalidSpotPrice { .. })));
        }
        assert_eq!(store.pool_count(), 0);
    }

    #[test]
    fn test_update_patches_and_recomputes_color_on_protocol_change() {
        let mut store = store_with_pair();
        let style = ProtocolStyle::default();
        store
            .add_pool(PoolEdge::new("p1", "a", "b", "uniswap_v2", 2.0, 1.0), &style)
            .unwrap();

        store
            .update_pool(
                &PoolId::from("p1"),
                PoolPatch {
                    spot_price: Some(3.5),
                    width: Some(4.0),
                    protocol: Some("curve".into()),
                },
                &style,
            )
            .unwrap();

        let pool = store.pool(&PoolId::from("p1")).unwrap();
        assert_eq!(pool.spot_price, 3.5);
        assert_eq!(pool.width, 4.0);
        assert_eq!(pool.protocol.as_str(), "curve");
        assert_eq!(pool.color, "#a5a4ce");
    }

    #[test]
    fn test_update_unknown_pool_fails_loudly() {
        let mut store = store_with_pair();
        let style = ProtocolStyle::default();

        let err = store
            .update_pool(&PoolId::from("nope"), PoolPatch::spot_price(1.0), &style)
            .unwrap_err();

        assert_eq!(err, GraphError::PoolNotFound(PoolId::from("nope")));
    }

    #[test]
    fn test_invalid_patch_leaves_pool_untouched() {
        let mut store = store_with_pair();
        let style = ProtocolStyle::default();
        store
            .add_pool(PoolEdge::new("p1", "a", "b", "uniswap_v2", 2.0, 1.0), &style)
            .unwrap();

        let result = store.update_pool(
            &PoolId::from("p1"),
            PoolPatch {
                spot_price: Some(-2.0),
                width: Some(9.0),
                protocol: None,
            },
            &style,
        );

        assert!(matches!(result, Err(GraphError::InvalidSpotPrice { .. })));
        let pool = store.pool(&PoolId::from("p1")).unwrap();
        assert_eq!(pool.spot_price, 2.0);
        assert_eq!(pool.width, 1.0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = store_with_pair();
        let style = ProtocolStyle::default();
        store
            .add_pool(PoolEdge::new("p1", "a", "b", "uniswap_v2", 2.0, 1.0), &style)
            .unwrap();

        assert!(store.remove_pool(&PoolId::from("p1")));
        let after_first = store.clone();
        assert!(!store.remove_pool(&PoolId::from("p1")));

        assert_eq!(store.pool_count(), after_first.pool_count());
        assert_eq!(store.token_count(), after_first.token_count());
    }

    #[test]
    fn test_snapshots_follow_insertion_order() {
        let mut store = GraphStore::new();
        for id in ["z", "m", "a"] {
            store.add_token(TokenNode::new(id, id.to_uppercase())).unwrap();
        }

        let ids: Vec<&str> = store.token_ids().map(|t| t.as_str()).collect();
        assert_eq!(ids, vec!["z", "m", "a"]);
    }
}
