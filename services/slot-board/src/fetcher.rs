//! Concurrent availability fetch across booking pages

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::config::{BookingPage, FetchConfig, FetchStrategy};
use crate::dates::{to_api_date, window_end};
use crate::io::HttpClient;
use crate::slot::SlotPayload;

/// Result of fetching one booking page
#[derive(Debug)]
pub struct PageOutcome {
    pub page: BookingPage,
    pub result: crate::Result<SlotPayload>,
}

/// Aggregate result of one fetch round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    AllSucceeded,
    Partial,
    AllFailed,
}

impl FetchStatus {
    pub fn from_outcomes(outcomes: &[PageOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();
        if succeeded == 0 {
            FetchStatus::AllFailed
        } else if succeeded < outcomes.len() {
            FetchStatus::Partial
        } else {
            FetchStatus::AllSucceeded
        }
    }

    pub fn any_success(&self) -> bool {
        !matches!(self, FetchStatus::AllFailed)
    }
}

/// Issues one GET per booking page according to the configured strategy
pub struct Fetcher {
    strategy: FetchStrategy,
    days: u32,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("strategy", &self.strategy)
            .field("days", &self.days)
            .finish()
    }
}

impl Fetcher {
    pub fn new(config: &FetchConfig, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!(
            "Created {} fetcher for a {} day window",
            config.strategy.type_name(),
            config.days
        );
        Self {
            strategy: config.strategy.clone(),
            days: config.days,
            http,
        }
    }

    /// Request URL for one page. `today` only matters for the direct strategy.
    pub fn page_url(&self, page_id: u64, today: NaiveDate) -> crate::Result<String> {
        let mut url = match &self.strategy {
            FetchStrategy::Proxy { base_url } => parse_url(base_url)?,
            FetchStrategy::Direct { api_base, merchant } => parse_url(&format!(
                "{}/merchants/{}/booking_pages/{}/time_slots",
                api_base.trim_end_matches('/'),
                merchant,
                page_id
            ))?,
        };

        match &self.strategy {
            FetchStrategy::Proxy { .. } => {
                url.query_pairs_mut()
                    .append_pair("days", &self.days.to_string())
                    .append_pair("booking_page", &page_id.to_string());
            }
            FetchStrategy::Direct { .. } => {
                url.query_pairs_mut()
                    .append_pair("start", &to_api_date(today, false))
                    .append_pair("end", &to_api_date(window_end(today, self.days), true));
            }
        }
        Ok(url.to_string())
    }

    /// Fetch and decode a single page
    pub async fn fetch_page(&self, page_id: u64, today: NaiveDate) -> crate::Result<SlotPayload> {
        let url = self.page_url(page_id, today)?;
        let response = self.http.get_json(&url).await?;
        if !response.is_success() {
            return Err(crate::SlotBoardError::Status {
                url,
                status: response.status,
            });
        }
        let payload: SlotPayload = serde_json::from_str(&response.body)?;
        Ok(payload)
    }

    /// Fetch every page concurrently and wait for all of them to settle.
    /// Outcomes are returned in the order of `pages`.
    pub async fn fetch_all(&self, pages: &[BookingPage], today: NaiveDate) -> Vec<PageOutcome> {
        let requests = pages.iter().map(|page| async move {
            let result = self.fetch_page(page.id, today).await;
            match &result {
                Ok(payload) => tracing::debug!(
                    "Page {} ({}) returned {} records",
                    page.id,
                    page.label,
                    payload.data.as_ref().map_or(0, Vec::len)
                ),
                Err(e) => tracing::warn!("Page {} ({}) failed: {}", page.id, page.label, e),
            }
            PageOutcome {
                page: page.clone(),
                result,
            }
        });
        join_all(requests).await
    }
}

fn parse_url(raw: &str) -> crate::Result<Url> {
    Url::parse(raw).map_err(|e| crate::SlotBoardError::Config(format!("invalid URL '{}': {}", raw, e)))
}
