//! Highlight overlay.
//!
//! A stackable emphasis layer over nodes and edges, independent of the
//! selection filters. The overlay holds weak references by id: a highlighted
//! id whose entity has been removed simply resolves to "not currently
//! renderable" and is never an error.
//!
//! A paused overlay is pinned — the next structural rebuild triggered by an
//! unrelated selection change must not clear it until it is un-paused.

use std::collections::HashSet;

use crate::pools::PoolId;
use crate::tokens::TokenId;

#[derive(Debug, Clone, Default)]
pub struct HighlightOverlay {
    highlighted_nodes: HashSet<TokenId>,
    highlighted_edges: HashSet<PoolId>,
    paused: bool,
}

impl HighlightOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlight_node(&mut self, id: TokenId) -> bool {
        self.highlighted_nodes.insert(id)
    }

    pub fn highlight_edge(&mut self, id: PoolId) -> bool {
        self.highlighted_edges.insert(id)
    }

    /// Replaces the current emphasis with a route's nodes and edges.
    pub fn set_route<N, E>(&mut self, nodes: N, edges: E)
    where
        N: IntoIterator<Item = TokenId>,
        E: IntoIterator<Item = PoolId>,
    {
        self.highlighted_nodes = nodes.into_iter().collect();
        self.highlighted_edges = edges.into_iter().collect();
    }

    pub fn contains_node(&self, id: &TokenId) -> bool {
        self.highlighted_nodes.contains(id)
    }

    pub fn contains_edge(&self, id: &PoolId) -> bool {
        self.highlighted_edges.contains(id)
    }

    pub fn highlighted_nodes(&self) -> &HashSet<TokenId> {
        &self.highlighted_nodes
    }

    pub fn highlighted_edges(&self) -> &HashSet<PoolId> {
        &self.highlighted_edges
    }

    pub fn is_empty(&self) -> bool {
        self.highlighted_nodes.is_empty() && self.highlighted_edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.highlighted_nodes.clear();
        self.highlighted_edges.clear();
    }

    /// Pins the overlay against structural rebuilds.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
