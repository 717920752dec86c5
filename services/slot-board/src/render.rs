//! Turns grouped slots into table rows
//!
//! [`render_table`] produces plain render instructions; [`rows_to_html`]
//! is the only place that knows about markup.

use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::dates::display_date;
use crate::grouper::GroupedSlots;

pub const MSG_NO_SLOTS: &str = "取得できる枠がありませんでした。";
pub const MSG_LOADING: &str = "取得中...";
pub const MSG_PAGE_FAILED: &str = "取得に失敗しました。時間をおいて再度お試しください。";

const LABEL_NO_SLOT: &str = "枠なし";
const LABEL_FULL: &str = "満席";

/// Visual tier of an available slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Default,
    Danger,
}

impl Tier {
    fn for_vacancy(vacancy: u32, low_stock_threshold: u32) -> Self {
        if vacancy <= low_stock_threshold {
            Tier::Danger
        } else {
            Tier::Default
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Tier::Default => "",
            Tier::Danger => "danger",
        }
    }
}

/// One tracked hour of one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    NoSlot,
    Full,
    Available {
        vacancy: u32,
        tier: Tier,
        booking_url: String,
    },
}

/// A row of a booking page table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableRow {
    Slots { date_label: String, cells: Vec<Cell> },
    Placeholder { message: String },
}

/// A single informational row in place of the table body
pub fn placeholder(message: &str) -> Vec<TableRow> {
    vec![TableRow::Placeholder {
        message: message.to_string(),
    }]
}

/// Booking site link for one slot of one page
pub fn booking_url(base_url: &str, page_id: u64, date: &str, start_time: &str) -> String {
    format!(
        "{}/{}/book?selected_date={}&selected_slot={}",
        base_url.trim_end_matches('/'),
        page_id,
        date,
        start_time
    )
}

/// One row per date, ascending, with one cell per tracked hour
pub fn render_table(page_id: u64, grouped: &GroupedSlots, config: &RenderConfig) -> Vec<TableRow> {
    if grouped.is_empty() {
        return placeholder(MSG_NO_SLOTS);
    }

    grouped
        .iter()
        .map(|(date, slots)| {
            let cells = config
                .hours
                .iter()
                .map(|hour| match slots.get(hour) {
                    None => Cell::NoSlot,
                    Some(slot) if slot.vacancy == 0 => Cell::Full,
                    Some(slot) => Cell::Available {
                        vacancy: slot.vacancy,
                        tier: Tier::for_vacancy(slot.vacancy, config.low_stock_threshold),
                        booking_url: booking_url(
                            &config.booking_base_url,
                            page_id,
                            &slot.date,
                            &slot.start_time,
                        ),
                    },
                })
                .collect();
            TableRow::Slots {
                date_label: display_date(date),
                cells,
            }
        })
        .collect()
}

/// Markup for a table body; `column_count` is the number of hour columns
pub fn rows_to_html(rows: &[TableRow], column_count: usize) -> String {
    rows.iter()
        .map(|row| match row {
            TableRow::Placeholder { message } => format!(
                r#"<tr><td class="date">-</td><td colspan="{}" class="muted">{}</td></tr>"#,
                column_count,
                html_escape(message)
            ),
            TableRow::Slots { date_label, cells } => {
                let cells: String = cells.iter().map(cell_to_html).collect();
                format!(
                    r#"<tr><td class="date">{}</td>{}</tr>"#,
                    html_escape(date_label),
                    cells
                )
            }
        })
        .collect()
}

fn cell_to_html(cell: &Cell) -> String {
    match cell {
        Cell::NoSlot => format!(r#"<td><span class="tag none">{}</span></td>"#, LABEL_NO_SLOT),
        Cell::Full => format!(r#"<td><span class="tag full">{}</span></td>"#, LABEL_FULL),
        Cell::Available {
            vacancy,
            tier,
            booking_url,
        } => format!(
            r#"<td><a class="slot-link" href="{}" target="_blank" rel="noopener"><span class="tag {}">残{}</span></a></td>"#,
            html_escape(booking_url),
            tier.css_class(),
            vacancy
        ),
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
