//! # Graph Session
//!
//! Per-session aggregate tying the store, filter, overlay, synchronizer,
//! ingestion adapter and solver together behind a single logical writer.
//!
//! ## Overview
//!
//! A session owns all mutable state for one live graph, including the
//! bootstrap flag for the first ingestion batch — there is no module-level
//! state, so independent sessions coexist in one process and are testable
//! in isolation.
//!
//! Stream messages are applied one at a time, each to completion, so no
//! message is ever half-applied. User-control events mutate the filter or
//! overlay and then explicitly refresh the synchronizer; batched toggles
//! (select-all) therefore rebuild the view once.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::errors::{RouteError, TransportError};
use crate::filter::VisibilityFilter;
use crate::graph_store::GraphStore;
use crate::highlight::HighlightOverlay;
use crate::ingestion::{IngestionAdapter, IngestionReport, StreamMessage};
use crate::pools::{PoolPatch, Protocol};
use crate::settings::Settings;
use crate::simulation::SimulationRequest;
use crate::solver::{self, RouteResult};
use crate::style::StyleResolver;
use crate::synchronizer::{RenderedView, Synchronizer};
use crate::tokens::TokenId;

/// Discrete events from the user-control surface.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    ToggleToken { id: TokenId, selected: bool },
    ToggleProtocol { protocol: Protocol, selected: bool },
    SelectAllTokens,
    DeselectAllTokens,
    SelectAllProtocols,
    DeselectAllProtocols,
    Reset,
    RequestBestRoute { start: TokenId, end: TokenId },
    /// Confirm a swap over the last solved route.
    RequestSwap { amount: f64 },
    PauseHighlight,
    UnpauseHighlight,
}

/// Outcome of handling one user event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The event mutated session state; the view is up to date.
    Applied,
    /// A best route was found and highlighted.
    Route(RouteResult),
    /// The solver found nothing; not fatal, state unchanged.
    NoRoute(RouteError),
    /// A swap was confirmed; the caller owns the actual simulation call.
    Swap(SimulationRequest),
}

pub struct GraphSession {
    store: GraphStore,
    filter: VisibilityFilter,
    overlay: HighlightOverlay,
    synchronizer: Synchronizer,
    adapter: IngestionAdapter,
    resolver: StyleResolver,
    settings: Settings,
    last_route: Option<RouteResult>,
}

impl GraphSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            store: GraphStore::new(),
            filter: VisibilityFilter::new(),
            overlay: HighlightOverlay::new(),
            synchronizer: Synchronizer::new(),
            adapter: IngestionAdapter::new(settings.ingestion.clone()),
            resolver: StyleResolver::from_settings(&settings.style),
            settings,
            last_route: None,
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn filter(&self) -> &VisibilityFilter {
        &self.filter
    }

    pub fn overlay(&self) -> &HighlightOverlay {
        &self.overlay
    }

    pub fn view(&self) -> &RenderedView {
        self.synchronizer.view()
    }

    pub fn last_route(&self) -> Option<&RouteResult> {
        self.last_route.as_ref()
    }

    /// Applies one stream message atomically.
    pub fn handle_message(&mut self, message: StreamMessage) -> IngestionReport {
        match message {
            StreamMessage::Observed(batch) => {
                let report = self.adapter.ingest_batch(
                    &mut self.store,
                    self.resolver.protocol_style(),
                    &batch,
                );
                self.synchronizer.apply_ingestion(
                    &self.store,
                    &self.filter,
                    &mut self.overlay,
                    &self.resolver,
                    &report,
                );
                report
            }
            StreamMessage::PriceUpdate { updates } => {
                for (id, price) in updates {
                    let patch = PoolPatch::spot_price(price);
                    if let Err(e) =
                        self.store
                            .update_pool(&id, patch, self.resolver.protocol_style())
                    {
                        warn!("Dropping price tick for {}: {}", id, e);
                    }
                }
                // Price ticks touch neither membership nor appearance.
                IngestionReport::default()
            }
            StreamMessage::Removed { pool_ids } => {
                let mut removed = 0usize;
                for id in &pool_ids {
                    if self.store.remove_pool(id) {
                        removed += 1;
                    }
                }
                if removed > 0 {
                    self.synchronizer.note_pools_changed();
                    self.refresh();
                }
                IngestionReport::default()
            }
        }
    }

    /// Handles one user-control event and brings the view up to date.
    pub fn handle_event(&mut self, event: UserEvent) -> EventOutcome {
        match event {
            UserEvent::ToggleToken { id, selected } => {
                if selected {
                    self.filter.select_token(id);
                } else {
                    self.filter.deselect_token(&id);
                }
                self.synchronizer.note_token_selection_changed();
                self.refresh();
            }
            UserEvent::ToggleProtocol { protocol, selected } => {
                if selected {
                    self.filter.select_protocol(protocol);
                } else {
                    self.filter.deselect_protocol(&protocol);
                }
                self.synchronizer.note_appearance_changed();
                self.refresh();
            }
            UserEvent::SelectAllTokens => {
                let ids: Vec<TokenId> = self.store.token_ids().cloned().collect();
                self.filter.select_all_tokens(ids);
                self.synchronizer.note_token_selection_changed();
                self.refresh();
            }
            UserEvent::DeselectAllTokens => {
                self.filter.clear_tokens();
                self.synchronizer.note_token_selection_changed();
                self.refresh();
            }
            UserEvent::SelectAllProtocols => {
                let protocols: Vec<Protocol> =
                    self.store.pools().map(|p| p.protocol.clone()).collect();
                self.filter.select_all_protocols(protocols);
                self.synchronizer.note_appearance_changed();
                self.refresh();
            }
            UserEvent::DeselectAllProtocols => {
                self.filter.clear_protocols();
                self.synchronizer.note_appearance_changed();
                self.refresh();
            }
            UserEvent::Reset => {
                self.filter.clear_tokens();
                self.filter.clear_protocols();
                self.overlay.unpause();
                self.overlay.clear();
                self.last_route = None;
                self.synchronizer.note_token_selection_changed();
                self.refresh();
            }
            UserEvent::RequestBestRoute { start, end } => {
                return self.request_best_route(&start, &end);
            }
            UserEvent::RequestSwap { amount } => {
                return match self.prepare_swap(amount) {
                    Some(request) => EventOutcome::Swap(request),
                    None => {
                        warn!("Swap requested with no solved route");
                        EventOutcome::Applied
                    }
                };
            }
            UserEvent::PauseHighlight => self.overlay.pause(),
            UserEvent::UnpauseHighlight => self.overlay.unpause(),
        }
        EventOutcome::Applied
    }

    /// Solves and highlights the best route between two tokens.
    pub fn request_best_route(&mut self, start: &TokenId, end: &TokenId) -> EventOutcome {
        let visibility = self
            .settings
            .solver
            .restrict_to_visible
            .then_some(&self.filter);
        match solver::find_best_route(&self.store, start, end, visibility) {
            Ok(route) => {
                info!(
                    "Route {} → {}: {} hops, product {:.6}",
                    start, end, route.hops, route.price_product
                );
                self.overlay
                    .set_route(route.token_ids.clone(), route.pool_ids.clone());
                self.synchronizer.note_appearance_changed();
                self.refresh();
                self.last_route = Some(route.clone());
                EventOutcome::Route(route)
            }
            Err(e) => {
                info!("No route: {}", e);
                EventOutcome::NoRoute(e)
            }
        }
    }

    /// Builds a simulation request for the last solved route.
    ///
    /// Returns `None` when no route has been solved yet. The caller owns the
    /// actual network call.
    pub fn prepare_swap(&self, amount: f64) -> Option<SimulationRequest> {
        let route = self.last_route.as_ref()?;
        Some(SimulationRequest {
            sell_token: route.token_ids.first()?.clone(),
            pools: route.pool_ids.clone(),
            amount,
        })
    }

    /// Consumes the streaming feed, applying each message to completion
    /// before taking the next.
    ///
    /// A transport error is surfaced to the caller with session state left
    /// exactly as of the last fully applied message. Channel closure is a
    /// normal end of stream.
    pub async fn drive(
        &mut self,
        mut feed: mpsc::Receiver<Result<StreamMessage, TransportError>>,
    ) -> Result<(), TransportError> {
        while let Some(item) = feed.recv().await {
            match item {
                Ok(message) => {
                    self.handle_message(message);
                }
                Err(e) => {
                    warn!("Ingestion stream failed: {}", e);
                    return Err(e);
                }
            }
        }
        info!("Ingestion stream ended");
        Ok(())
    }

    fn refresh(&mut self) {
        self.synchronizer.refresh(
            &self.store,
            &self.filter,
            &mut self.overlay,
            &self.resolver,
        );
    }
}
