//! Route simulation client.
//!
//! The core never quotes a route itself; it prepares a request naming the
//! sell token, the ordered pool ids and the sell amount, and an external
//! service simulates the swap. Awaiting the call is the caller's job, never
//! the solver's or the synchronizer's.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::pools::PoolId;
use crate::settings::SimulationSettings;
use crate::tokens::TokenId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub sell_token: TokenId,
    pub pools: Vec<PoolId>,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub success: bool,
    pub input_amount: f64,
    pub output_amount: f64,
    pub gas_estimate: u64,
}

#[async_trait]
pub trait SimulationClient: Send + Sync {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResponse>;
}

/// Default client POSTing to the configured simulation endpoint.
pub struct HttpSimulationClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpSimulationClient {
    pub fn new(settings: &SimulationSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self {
            endpoint: settings.endpoint.clone(),
            client,
        })
    }
}

#[async_trait]
impl SimulationClient for HttpSimulationClient {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResponse> {
        debug!(
            "Simulating {} through {} pools",
            request.sell_token,
            request.pools.len()
        );
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "simulation call failed with status {}",
                response.status()
            ));
        }
        Ok(response.json().await?)
    }
}
