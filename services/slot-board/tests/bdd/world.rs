//! BDD test world for slot board service

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cucumber::World;
use slot_board::fetcher::FetchStatus;
use slot_board::io::{HttpClient, HttpResponse};
use slot_board::refresh::{RefreshController, RefreshDecision};
use slot_board::widget::AvailabilityWidget;

/// Canned HTTP responses keyed by booking page id
#[derive(Debug, Default, Clone)]
pub struct StubHttpClient {
    pub responses: HashMap<u64, HttpResponse>,
}

#[async_trait]
impl HttpClient for StubHttpClient {
    async fn get_json(&self, url: &str) -> slot_board::Result<HttpResponse> {
        self.responses
            .iter()
            .find(|(id, _)| url.ends_with(&format!("booking_page={}", id)))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| slot_board::SlotBoardError::Http(format!("no stub for {}", url)))
    }
}

#[derive(Debug, Default, World)]
pub struct SlotBoardWorld {
    // Refresh gate testing
    pub controller: Option<RefreshController>,
    pub decision: Option<RefreshDecision>,

    // Fetch cycle testing
    pub http: StubHttpClient,
    pub widget: Option<Arc<AvailabilityWidget>>,
    pub cycle_status: Option<FetchStatus>,
}
