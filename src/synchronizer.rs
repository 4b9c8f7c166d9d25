//! # View Synchronizer
//!
//! The synchronizer is the single owner of the materialized (rendered) view.
//! It consumes change notifications from the store, the visibility filter and
//! the highlight overlay, and decides between a full structural rebuild and a
//! cheaper in-place patch.
//!
//! ## Transition classes
//!
//! - **Structural update** — any token-selection change, any pool
//!   add/remove, or the very first render. Recomputes node and edge
//!   membership from scratch and resolves every appearance. A full replace,
//!   not a diff: selection changes are infrequent relative to price ticks,
//!   so correctness wins over efficiency here.
//! - **Appearance-only update** — protocol-selection change with no
//!   structural change pending. Restyles the edges already materialized and
//!   leaves membership untouched.
//!
//! If the view is empty or a structural change is pending, a structural pass
//! runs regardless of which toggle fired — the view self-heals from any
//! inconsistent intermediate state.
//!
//! ## Incremental ingestion
//!
//! Pools and tokens arriving mid-session do not force a rebuild: only the
//! newly relevant entries are patched in, preserving the render identity
//! (and hence position/animation stability) of everything already shown.
//! The very first batch after a cold start is the exception and performs one
//! full bootstrap rebuild.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::filter::VisibilityFilter;
use crate::graph_store::GraphStore;
use crate::highlight::HighlightOverlay;
use crate::ingestion::IngestionReport;
use crate::pools::{PoolEdge, PoolId, Protocol};
use crate::style::{Appearance, StyleResolver};
use crate::tokens::{TokenId, TokenNode};

/// A token currently materialized for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedNode {
    pub id: TokenId,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl From<&TokenNode> for RenderedNode {
    fn from(token: &TokenNode) -> Self {
        Self {
            id: token.id.clone(),
            label: token.label.clone(),
            size: token.size,
        }
    }
}

/// A pool currently materialized for rendering, with resolved appearance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEdge {
    pub id: PoolId,
    pub from: TokenId,
    pub to: TokenId,
    pub protocol: Protocol,
    pub appearance: Appearance,
}

impl RenderedEdge {
    fn materialize(pool: &PoolEdge, appearance: Appearance) -> Self {
        Self {
            id: pool.id.clone(),
            from: pool.from.clone(),
            to: pool.to.clone(),
            protocol: pool.protocol.clone(),
            appearance,
        }
    }
}

/// The materialized subset of the graph handed to an external renderer.
///
/// Always derivable from (store, filter, overlay) — a cache, never a source
/// of truth. Owned exclusively by the [`Synchronizer`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedView {
    pub nodes: IndexMap<TokenId, RenderedNode>,
    pub edges: IndexMap<PoolId, RenderedEdge>,
}

impl RenderedView {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    /// No structural view has been materialized yet.
    Empty,
    /// The view reflects the current token/pool selection.
    Structural,
}

#[derive(Debug)]
pub struct Synchronizer {
    view: RenderedView,
    state: SyncState,
    structural_dirty: bool,
    appearance_dirty: bool,
    bootstrapped: bool,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self {
            view: RenderedView::default(),
            state: SyncState::Empty,
            structural_dirty: false,
            appearance_dirty: false,
            bootstrapped: false,
        }
    }

    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    /// A token-selection mutation happened; the next refresh is structural.
    pub fn note_token_selection_changed(&mut self) {
        self.structural_dirty = true;
    }

    /// Pool membership changed (add/remove); the next refresh is structural.
    pub fn note_pools_changed(&mut self) {
        self.structural_dirty = true;
    }

    /// Styling inputs changed (protocol selection, highlight, width); the
    /// next refresh restyles in place unless a structural pass is pending.
    pub fn note_appearance_changed(&mut self) {
        self.appearance_dirty = true;
    }

    /// Brings the materialized view in sync with its inputs.
    ///
    /// The overlay is mutable because a structural pass clears an unpaused
    /// overlay; a paused overlay survives and is restored into the rebuilt
    /// view.
    pub fn refresh(
        &mut self,
        store: &GraphStore,
        filter: &VisibilityFilter,
        overlay: &mut HighlightOverlay,
        resolver: &StyleResolver,
    ) {
        if self.structural_dirty || self.state == SyncState::Empty || self.view.edges.is_empty() {
            self.rebuild(store, filter, overlay, resolver);
        } else if self.appearance_dirty {
            self.restyle(store, filter, overlay, resolver);
        }
    }

    /// Patches newly ingested entities into the view without a rebuild.
    ///
    /// The first batch after a cold start instead performs one full
    /// structural rebuild.
    pub fn apply_ingestion(
        &mut self,
        store: &GraphStore,
        filter: &VisibilityFilter,
        overlay: &mut HighlightOverlay,
        resolver: &StyleResolver,
        report: &IngestionReport,
    ) {
        if !self.bootstrapped {
            self.bootstrapped = true;
            self.rebuild(store, filter, overlay, resolver);
            return;
        }

        let mut patched = 0usize;
        for id in &report.tokens_added {
            if !filter.is_token_selected(id) {
                continue;
            }
            if let Some(token) = store.token(id) {
                self.view.nodes.insert(id.clone(), RenderedNode::from(token));
                patched += 1;
            }
        }
        for id in &report.pools_added {
            let pool = match store.pool(id) {
                Some(pool) => pool,
                None => continue,
            };
            if !filter.is_token_selected(&pool.from) || !filter.is_token_selected(&pool.to) {
                continue;
            }
            for endpoint in [&pool.from, &pool.to] {
                if !self.view.nodes.contains_key(endpoint) {
                    if let Some(token) = store.token(endpoint) {
                        self.view.nodes.insert(endpoint.clone(), RenderedNode::from(token));
                    }
                }
            }
            let appearance = resolver.resolve(pool, filter, overlay);
            self.view
                .edges
                .insert(id.clone(), RenderedEdge::materialize(pool, appearance));
            patched += 1;
        }

        if patched > 0 {
            self.state = SyncState::Structural;
            debug!("Patched {} entities into the rendered view", patched);
        }
    }

    fn rebuild(
        &mut self,
        store: &GraphStore,
        filter: &VisibilityFilter,
        overlay: &mut HighlightOverlay,
        resolver: &StyleResolver,
    ) {
        if !overlay.is_paused() {
            overlay.clear();
        }

        let mut nodes = IndexMap::new();
        for token in store.tokens() {
            if filter.is_token_selected(&token.id) {
                nodes.insert(token.id.clone(), RenderedNode::from(token));
            }
        }

        let mut edges = IndexMap::new();
        for pool in store.pools() {
            if filter.is_token_selected(&pool.from) && filter.is_token_selected(&pool.to) {
                let appearance = resolver.resolve(pool, filter, overlay);
                edges.insert(pool.id.clone(), RenderedEdge::materialize(pool, appearance));
            }
        }

        debug!(
            "Structural update materialized {} nodes / {} edges",
            nodes.len(),
            edges.len()
        );
        self.view = RenderedView { nodes, edges };
        self.state = SyncState::Structural;
        self.structural_dirty = false;
        self.appearance_dirty = false;
    }

    fn restyle(
        &mut self,
        store: &GraphStore,
        filter: &VisibilityFilter,
        overlay: &HighlightOverlay,
        resolver: &StyleResolver,
    ) {
        for (id, rendered) in self.view.edges.iter_mut() {
            if let Some(pool) = store.pool(id) {
                rendered.appearance = resolver.resolve(pool, filter, overlay);
            }
        }
        self.appearance_dirty = false;
        debug!("Appearance update restyled {} edges", self.view.edges.len());
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new()
    }
}
