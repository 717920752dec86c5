//! Widget: one fetch → group → render cycle and the gated manual refresh

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::{BookingPage, Config, RenderConfig};
use crate::dates::{
    self, epoch_ms, fallback_range_label, format_api_date, parse_timestamp, range_label,
    today_jst, FETCHED_LABEL_EMPTY,
};
use crate::fetcher::{FetchStatus, Fetcher, PageOutcome};
use crate::grouper::group_slots;
use crate::io::HttpClient;
use crate::refresh::{cooldown_message, RefreshDecision};
use crate::render::{placeholder, render_table, TableRow, MSG_PAGE_FAILED};
use crate::state::{StateHandle, StatusLine, STATUS_FAILED, STATUS_PARTIAL, STATUS_UPDATED};

/// Outcome of a manual refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Fetched { status: FetchStatus },
    Rejected { remaining_minutes: u64 },
}

/// Ties the fetcher, renderer and refresh gate to the shared board state
pub struct AvailabilityWidget {
    fetcher: Fetcher,
    pages: Vec<BookingPage>,
    render: RenderConfig,
    days: u32,
    state: StateHandle,
    cycle: Mutex<()>,
}

impl std::fmt::Debug for AvailabilityWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityWidget")
            .field("fetcher", &self.fetcher)
            .field("pages", &self.pages)
            .finish()
    }
}

impl AvailabilityWidget {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>, state: StateHandle) -> Self {
        Self {
            fetcher: Fetcher::new(&config.fetch, http),
            pages: config.booking_pages.clone(),
            render: config.render.clone(),
            days: config.fetch.days,
            state,
            cycle: Mutex::new(()),
        }
    }

    pub fn state(&self) -> StateHandle {
        Arc::clone(&self.state)
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    /// Run one cycle unconditionally, as on page load
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> FetchStatus {
        let _cycle = self.cycle.lock().await;
        self.cycle_locked(now).await
    }

    /// Run a cycle unless the cool-down is still active.
    ///
    /// A request that arrives while a cycle is running waits for it and is
    /// then judged against the timestamp that cycle recorded. The gate and
    /// the cycle run on a spawned task, so dropping the returned future does
    /// not abandon a cycle halfway.
    pub async fn request_refresh(self: &Arc<Self>, now: DateTime<Utc>) -> RefreshOutcome {
        let widget = Arc::clone(self);
        let task = tokio::spawn(async move { widget.gated_refresh(now).await });
        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Refresh task failed: {}", e);
                RefreshOutcome::Fetched {
                    status: FetchStatus::AllFailed,
                }
            }
        }
    }

    async fn gated_refresh(&self, now: DateTime<Utc>) -> RefreshOutcome {
        let _cycle = self.cycle.lock().await;

        let decision = self.state.read().await.refresh.request(epoch_ms(now));
        match decision {
            RefreshDecision::Allowed => {
                let status = self.cycle_locked(now).await;
                RefreshOutcome::Fetched { status }
            }
            RefreshDecision::CoolingDown { remaining_minutes } => {
                let mut state = self.state.write().await;
                let message = cooldown_message(state.refresh.cooldown_minutes(), remaining_minutes);
                tracing::info!("Refresh rejected, {} minute(s) of cool-down left", remaining_minutes);
                state.status = StatusLine::info(message);
                RefreshOutcome::Rejected { remaining_minutes }
            }
        }
    }

    async fn cycle_locked(&self, now: DateTime<Utc>) -> FetchStatus {
        self.state.write().await.begin_cycle();

        let today = today_jst(now);
        let outcomes = self.fetcher.fetch_all(&self.pages, today).await;
        let summary = summarize(&outcomes, self.render_config());

        let mut state = self.state.write().await;
        for (page_id, rows) in summary.rows {
            if !state.set_rows(page_id, rows) {
                tracing::warn!("No table for booking page {}, rows dropped", page_id);
            }
        }
        state.last_fetch_status = Some(summary.status);

        if summary.status.any_success() {
            state.range_label = summary
                .range_label
                .unwrap_or_else(|| fallback_range_label(today, self.days));
            let fetched_at = summary.latest_fetched_at.unwrap_or(now);
            state.fetched_label = dates::fetched_label(fetched_at);
            state.refresh.record_success(epoch_ms(fetched_at));
            state.status = match summary.status {
                FetchStatus::Partial => StatusLine::error(STATUS_PARTIAL),
                _ => StatusLine::info(STATUS_UPDATED),
            };
        } else {
            state.status = StatusLine::error(STATUS_FAILED);
            state.fetched_label = FETCHED_LABEL_EMPTY.to_string();
        }

        tracing::info!(
            "Fetch cycle finished: {:?} ({} page(s))",
            summary.status,
            outcomes.len()
        );
        summary.status
    }
}

/// What a fetch round contributes to the board
#[derive(Debug)]
struct CycleSummary {
    status: FetchStatus,
    rows: Vec<(u64, Vec<TableRow>)>,
    range_label: Option<String>,
    latest_fetched_at: Option<DateTime<Utc>>,
}

fn summarize(outcomes: &[PageOutcome], render: &RenderConfig) -> CycleSummary {
    let mut rows = Vec::with_capacity(outcomes.len());
    let mut range = None;
    let mut latest: Option<DateTime<Utc>> = None;

    for outcome in outcomes {
        match &outcome.result {
            Ok(payload) => {
                let grouped = group_slots(payload.valid_slots());
                rows.push((outcome.page.id, render_table(outcome.page.id, &grouped, render)));

                if range.is_none() {
                    range = payload.range_bounds().map(|(start, end)| {
                        range_label(&format_api_date(start), &format_api_date(end))
                    });
                }
                if let Some(ts) = payload.fetched_at.as_deref().and_then(parse_timestamp) {
                    latest = Some(latest.map_or(ts, |current| current.max(ts)));
                }
            }
            Err(_) => rows.push((outcome.page.id, placeholder(MSG_PAGE_FAILED))),
        }
    }

    CycleSummary {
        status: FetchStatus::from_outcomes(outcomes),
        rows,
        range_label: range,
        latest_fetched_at: latest,
    }
}
