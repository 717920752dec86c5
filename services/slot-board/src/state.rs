//! Shared board state read by the dashboard and written by fetch cycles

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::BookingPage;
use crate::dates::FETCHED_LABEL_EMPTY;
use crate::fetcher::FetchStatus;
use crate::refresh::RefreshController;
use crate::render::{placeholder, TableRow, MSG_LOADING};

pub const STATUS_LOADING: &str = "取得中...";
pub const STATUS_UPDATED: &str = "更新しました";
pub const STATUS_PARTIAL: &str = "一部の取得に失敗しました";
pub const STATUS_FAILED: &str = "取得に失敗しました";

/// Rendered table of one booking page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub page: BookingPage,
    pub rows: Vec<TableRow>,
}

/// The status line and whether it is styled as an error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Everything the board shows
#[derive(Debug, Clone, Serialize)]
pub struct BoardState {
    pub pages: Vec<PageView>,
    pub status: StatusLine,
    pub range_label: String,
    pub fetched_label: String,
    pub last_fetch_status: Option<FetchStatus>,
    #[serde(skip)]
    pub refresh: RefreshController,
}

impl BoardState {
    pub fn new(pages: Vec<BookingPage>, cooldown: Duration) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| PageView {
                page,
                rows: placeholder(MSG_LOADING),
            })
            .collect();

        Self {
            pages,
            status: StatusLine::default(),
            range_label: String::new(),
            fetched_label: FETCHED_LABEL_EMPTY.to_string(),
            last_fetch_status: None,
            refresh: RefreshController::new(cooldown),
        }
    }

    /// Replace one page's rows, returning false for an unknown page
    pub fn set_rows(&mut self, page_id: u64, rows: Vec<TableRow>) -> bool {
        match self.pages.iter_mut().find(|p| p.page.id == page_id) {
            Some(view) => {
                view.rows = rows;
                true
            }
            None => false,
        }
    }

    pub fn rows(&self, page_id: u64) -> Option<&[TableRow]> {
        self.pages
            .iter()
            .find(|p| p.page.id == page_id)
            .map(|p| p.rows.as_slice())
    }

    /// Show the loading placeholder everywhere and clear the fetched label
    pub fn begin_cycle(&mut self) {
        self.fetched_label = FETCHED_LABEL_EMPTY.to_string();
        self.status = StatusLine::info(STATUS_LOADING);
        for view in &mut self.pages {
            view.rows = placeholder(MSG_LOADING);
        }
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<BoardState>>;

pub fn new_state_handle(pages: Vec<BookingPage>, cooldown: Duration) -> StateHandle {
    Arc::new(RwLock::new(BoardState::new(pages, cooldown)))
}
