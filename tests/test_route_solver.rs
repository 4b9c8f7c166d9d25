//! Integration tests for the best-route solver.
//!
//! Tests cover:
//! - 1-hop vs 2-hop comparison (the winner is decided by price product, not
//!   by candidate recency)
//! - Direction inversion of spot prices
//! - Parallel pools across protocols
//! - Tie-breaking and no-route reporting
//! - Visibility-restricted solving

use pool_graph_sdk::solver::find_best_route;
use pool_graph_sdk::{
    GraphStore, PoolEdge, PoolId, Protocol, RouteError, StyleResolver, TokenId, TokenNode,
    VisibilityFilter,
};

fn store_abc() -> (GraphStore, StyleResolver) {
    let mut store = GraphStore::new();
    let resolver = StyleResolver::default();
    for (id, label) in [("a", "A"), ("b", "B"), ("c", "C")] {
        store.add_token(TokenNode::new(id, label)).unwrap();
    }
    (store, resolver)
}

fn add(store: &mut GraphStore, resolver: &StyleResolver, id: &str, from: &str, to: &str, price: f64) {
    store
        .add_pool(
            PoolEdge::new(id, from, to, "uniswap_v2", price, 1.0),
            resolver.protocol_style(),
        )
        .unwrap();
}

#[test]
fn test_two_hop_route_multiplies_prices() {
    let (mut store, resolver) = store_abc();
    add(&mut store, &resolver, "ab", "a", "b", 2.0);
    add(&mut store, &resolver, "bc", "b", "c", 3.0);

    let route = find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), None).unwrap();

    assert_eq!(route.route, vec!["A", "B", "C"]);
    assert_eq!(route.price_product, 6.0);
    assert_eq!(route.hops, 2);
    assert_eq!(route.pool_ids, vec![PoolId::from("ab"), PoolId::from("bc")]);
}

#[test]
fn test_comparison_not_recency_decides_the_winner() {
    let (mut store, resolver) = store_abc();
    add(&mut store, &resolver, "ab", "a", "b", 2.0);
    add(&mut store, &resolver, "bc", "b", "c", 3.0);
    // A weaker direct edge added last must not displace the indirect route.
    add(&mut store, &resolver, "ac", "a", "c", 5.0);

    let route = find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), None).unwrap();

    assert_eq!(route.hops, 2);
    assert_eq!(route.price_product, 6.0);
}

#[test]
fn test_direct_route_wins_when_its_price_is_better() {
    let (mut store, resolver) = store_abc();
    add(&mut store, &resolver, "ab", "a", "b", 2.0);
    add(&mut store, &resolver, "bc", "b", "c", 3.0);
    add(&mut store, &resolver, "ac", "a", "c", 7.0);

    let route = find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), None).unwrap();

    assert_eq!(route.hops, 1);
    assert_eq!(route.route, vec!["A", "C"]);
    assert_eq!(route.price_product, 7.0);
    assert_eq!(route.pool_ids, vec![PoolId::from("ac")]);
}

#[test]
fn test_reverse_traversal_inverts_spot_price() {
    let (mut store, resolver) = store_abc();
    // Canonical direction c → a; querying a → c must use 1/price.
    add(&mut store, &resolver, "ca", "c", "a", 4.0);

    let route = find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), None).unwrap();

    assert_eq!(route.price_product, 0.25);
    assert_eq!(route.hops, 1);
}

#[test]
fn test_inversion_composes_across_hops() {
    let (mut store, resolver) = store_abc();
    add(&mut store, &resolver, "ba", "b", "a", 2.0); // a → b is 0.5
    add(&mut store, &resolver, "bc", "b", "c", 8.0);

    let route = find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), None).unwrap();

    assert_eq!(route.price_product, 4.0);
    assert_eq!(route.route, vec!["A", "B", "C"]);
}

#[test]
fn test_parallel_pools_all_enumerated() {
    let (mut store, resolver) = store_abc();
    store
        .add_pool(
            PoolEdge::new("ac_uni", "a", "c", "uniswap_v2", 3.0, 1.0),
            resolver.protocol_style(),
        )
        .unwrap();
    store
        .add_pool(
            PoolEdge::new("ac_curve", "a", "c", "curve", 5.0, 1.0),
            resolver.protocol_style(),
        )
        .unwrap();

    let route = find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), None).unwrap();

    assert_eq!(route.pool_ids, vec![PoolId::from("ac_curve")]);
    assert_eq!(route.price_product, 5.0);
}

#[test]
fn test_ties_keep_the_first_candidate_found() {
    let (mut store, resolver) = store_abc();
    add(&mut store, &resolver, "ac_first", "a", "c", 5.0);
    add(&mut store, &resolver, "ac_second", "a", "c", 5.0);

    let route = find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), None).unwrap();

    assert_eq!(route.pool_ids, vec![PoolId::from("ac_first")]);
}

#[test]
fn test_unknown_endpoints_are_invalid_input() {
    let (store, _) = store_abc();

    let start_err =
        find_best_route(&store, &TokenId::from("zzz"), &TokenId::from("c"), None).unwrap_err();
    let end_err =
        find_best_route(&store, &TokenId::from("a"), &TokenId::from("zzz"), None).unwrap_err();

    assert_eq!(start_err, RouteError::UnknownStart(TokenId::from("zzz")));
    assert_eq!(end_err, RouteError::UnknownEnd(TokenId::from("zzz")));
}

#[test]
fn test_disjoint_graph_reports_both_labels() {
    let (mut store, resolver) = store_abc();
    store.add_token(TokenNode::new("d", "D")).unwrap();
    add(&mut store, &resolver, "ab", "a", "b", 2.0);
    // c–d island, unreachable from a.
    store
        .add_pool(
            PoolEdge::new("cd", "c", "d", "uniswap_v2", 2.0, 1.0),
            resolver.protocol_style(),
        )
        .unwrap();

    let err = find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), None).unwrap_err();

    assert_eq!(
        err,
        RouteError::NoRoute {
            start_label: "A".to_string(),
            end_label: "C".to_string(),
        }
    );
}

#[test]
fn test_intermediary_must_not_be_the_end_token() {
    let (mut store, resolver) = store_abc();
    add(&mut store, &resolver, "ac", "a", "c", 2.0);
    add(&mut store, &resolver, "cc2", "c", "b", 10.0);

    let route = find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), None).unwrap();

    // No a → c → … → c loop is ever considered.
    assert_eq!(route.hops, 1);
    assert_eq!(route.price_product, 2.0);
}

#[test]
fn test_visibility_restriction_is_opt_in() {
    let (mut store, resolver) = store_abc();
    store
        .add_pool(
            PoolEdge::new("ac_uni", "a", "c", "uniswap_v2", 3.0, 1.0),
            resolver.protocol_style(),
        )
        .unwrap();
    store
        .add_pool(
            PoolEdge::new("ac_curve", "a", "c", "curve", 5.0, 1.0),
            resolver.protocol_style(),
        )
        .unwrap();

    let mut filter = VisibilityFilter::new();
    filter.select_all_tokens(store.token_ids().cloned().collect::<Vec<_>>());
    filter.select_protocol(Protocol::from("uniswap_v2"));

    // Unrestricted: the better curve pool wins.
    let unrestricted =
        find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), None).unwrap();
    assert_eq!(unrestricted.pool_ids, vec![PoolId::from("ac_curve")]);

    // Restricted to visible pools: only the uniswap pool participates.
    let restricted =
        find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), Some(&filter)).unwrap();
    assert_eq!(restricted.pool_ids, vec![PoolId::from("ac_uni")]);
    assert_eq!(restricted.price_product, 3.0);
}

#[test]
fn test_restriction_can_leave_no_route() {
    let (mut store, resolver) = store_abc();
    add(&mut store, &resolver, "ac", "a", "c", 3.0);

    let filter = VisibilityFilter::new();

    let err = find_best_route(&store, &TokenId::from("a"), &TokenId::from("c"), Some(&filter))
        .unwrap_err();

    assert!(matches!(err, RouteError::NoRoute { .. }));
}
