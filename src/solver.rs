//! # Route Solver
//!
//! Stateless best-route queries over the canonical graph.
//!
//! ## Overview
//!
//! Finds the economically best path between two tokens, limited to one or
//! two hops, by comparing the multiplicative spot-price product of every
//! candidate. Edge direction is canonical but traversal is bidirectional:
//! a hop taken against the canonical direction contributes the inverted
//! spot price.
//!
//! Candidates are enumerated in insertion order and only a strictly greater
//! product displaces the current winner, so ties keep the first candidate
//! found. That tie-breaking rule is documented, tested behavior.
//!
//! By default the solver sees the whole graph; restriction to currently
//! visible pools is a caller-supplied option, never hardcoded.

use serde::Serialize;
use tracing::debug;

use crate::errors::RouteError;
use crate::filter::VisibilityFilter;
use crate::graph_store::GraphStore;
use crate::pools::{PoolEdge, PoolId};
use crate::tokens::TokenId;

/// A solved best route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// Human-readable token label sequence, start to end.
    pub route: Vec<String>,
    /// Token ids along the route, start to end.
    pub token_ids: Vec<TokenId>,
    /// Winning pool ids in hop order.
    pub pool_ids: Vec<PoolId>,
    /// Product of the direction-corrected spot prices along the route.
    pub price_product: f64,
    /// 1 or 2.
    pub hops: u8,
}

struct Candidate<'a> {
    edges: Vec<&'a PoolEdge>,
    intermediary: Option<TokenId>,
    price_product: f64,
}

/// Finds the best 1–2 hop route from `start` to `end`.
///
/// When `visibility` is given, only pools whose protocol is selected and
/// whose endpoints are both selected participate.
pub fn find_best_route(
    store: &GraphStore,
    start: &TokenId,
    end: &TokenId,
    visibility: Option<&VisibilityFilter>,
) -> Result<RouteResult, RouteError> {
    if !store.has_token(start) {
        return Err(RouteError::UnknownStart(start.clone()));
    }
    if !store.has_token(end) {
        return Err(RouteError::UnknownEnd(end.clone()));
    }

    let edges: Vec<&PoolEdge> = store
        .pools()
        .filter(|pool| match visibility {
            Some(filter) => {
                filter.is_protocol_selected(&pool.protocol)
                    && filter.is_token_selected(&pool.from)
                    && filter.is_token_selected(&pool.to)
            }
            None => true,
        })
        .collect();

    let mut candidates: Vec<Candidate> = Vec::new();

    // Depth 1: every pool directly connecting start and end.
    for &pool in &edges {
        if pool.connects(start, end) {
            if let Some(price) = pool.price_from(start) {
                candidates.push(Candidate {
                    edges: vec![pool],
                    intermediary: None,
                    price_product: price,
                });
            }
        }
    }

    // Depth 2: every intermediary adjacent to start, in first-encounter order.
    let mut intermediaries: Vec<TokenId> = Vec::new();
    for pool in &edges {
        if let Some(other) = pool.other_endpoint(start) {
            if other != end && other != start && !intermediaries.contains(other) {
                intermediaries.push(other.clone());
            }
        }
    }

    for mid in &intermediaries {
        let first_hops: Vec<&PoolEdge> = edges
            .iter()
            .copied()
            .filter(|pool| pool.connects(start, mid))
            .collect();
        let second_hops: Vec<&PoolEdge> = edges
            .iter()
            .copied()
            .filter(|pool| pool.connects(mid, end))
            .collect();

        for &first in &first_hops {
            for &second in &second_hops {
                let (Some(first_price), Some(second_price)) =
                    (first.price_from(start), second.price_from(mid))
                else {
                    continue;
                };
                candidates.push(Candidate {
                    edges: vec![first, second],
                    intermediary: Some(mid.clone()),
                    price_product: first_price * second_price,
                });
            }
        }
    }

    let Some(best) = candidates.iter().fold(None::<&Candidate>, |best, current| {
        match best {
            // Strictly greater wins; ties keep the first found.
            Some(b) if current.price_product > b.price_product => Some(current),
            Some(b) => Some(b),
            None => Some(current),
        }
    }) else {
        return Err(RouteError::NoRoute {
            start_label: store.label_of(start),
            end_label: store.label_of(end),
        });
    };

    let token_ids: Vec<TokenId> = match &best.intermediary {
        Some(mid) => vec![start.clone(), mid.clone(), end.clone()],
        None => vec![start.clone(), end.clone()],
    };
    let result = RouteResult {
        route: token_ids.iter().map(|id| store.label_of(id)).collect(),
        token_ids,
        pool_ids: best.edges.iter().map(|pool| pool.id.clone()).collect(),
        price_product: best.price_product,
        hops: best.edges.len() as u8,
    };
    debug!(
        "Best route {} → {}: {:?} (product {:.6}, {} hops)",
        start, end, result.route, result.price_product, result.hops
    );
    Ok(result)
}
