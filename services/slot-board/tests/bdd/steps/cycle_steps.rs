//! BDD step definitions for fetch cycle feature

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use cucumber::{given, then, when};
use slot_board::config::Config;
use slot_board::dates::epoch_ms;
use slot_board::io::HttpResponse;
use slot_board::render::TableRow;
use slot_board::state::new_state_handle;
use slot_board::widget::AvailabilityWidget;

use crate::world::SlotBoardWorld;

fn cycle_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 17, 1, 0, 0).unwrap()
}

#[given(
    expr = "booking page {int} returns a slot on {string} at {string} with vacancy {int} fetched at {string}"
)]
fn page_returns_slot(
    world: &mut SlotBoardWorld,
    page_id: u64,
    date: String,
    start_time: String,
    vacancy: u32,
    fetched_at: String,
) {
    let body = serde_json::json!({
        "data": [{ "date": date, "start_time": start_time, "vacancy": vacancy }],
        "fetched_at": fetched_at,
    });
    world.http.responses.insert(
        page_id,
        HttpResponse {
            status: 200,
            body: body.to_string(),
        },
    );
}

#[given(expr = "booking page {int} returns no slots")]
fn page_returns_nothing(world: &mut SlotBoardWorld, page_id: u64) {
    world.http.responses.insert(
        page_id,
        HttpResponse {
            status: 200,
            body: r#"{"data": []}"#.to_string(),
        },
    );
}

#[given(expr = "booking page {int} fails with HTTP {int}")]
fn page_fails(world: &mut SlotBoardWorld, page_id: u64, status: u16) {
    world.http.responses.insert(
        page_id,
        HttpResponse {
            status,
            body: String::new(),
        },
    );
}

#[when("the board runs a fetch cycle")]
async fn board_runs_cycle(world: &mut SlotBoardWorld) {
    let config = Config::default();
    let state = new_state_handle(config.booking_pages.clone(), config.refresh.cooldown);
    let widget = Arc::new(AvailabilityWidget::new(
        &config,
        Arc::new(world.http.clone()),
        state,
    ));
    world.cycle_status = Some(widget.run_cycle(cycle_time()).await);
    world.widget = Some(widget);
}

#[then(expr = "the fetch status is {string}")]
fn fetch_status_is(world: &mut SlotBoardWorld, expected: String) {
    let status = world.cycle_status.expect("no cycle has run");
    assert_eq!(serde_json::to_value(status).unwrap(), expected.as_str());
}

#[then(expr = "the status line is {string}")]
async fn status_line_is(world: &mut SlotBoardWorld, expected: String) {
    let widget = world.widget.as_ref().expect("no cycle has run");
    let state = widget.state();
    let state = state.read().await;
    assert_eq!(state.status.text, expected);
}

#[then(expr = "page {int} shows a row for {string}")]
async fn page_shows_row(world: &mut SlotBoardWorld, page_id: u64, label: String) {
    let widget = world.widget.as_ref().expect("no cycle has run");
    let state = widget.state();
    let state = state.read().await;
    let rows = state.rows(page_id).expect("unknown page");
    assert!(
        rows.iter().any(|row| matches!(
            row,
            TableRow::Slots { date_label, .. } if *date_label == label
        )),
        "no row labelled '{}' in {:?}",
        label,
        rows
    );
}

#[then(expr = "page {int} shows the placeholder {string}")]
async fn page_shows_placeholder(world: &mut SlotBoardWorld, page_id: u64, message: String) {
    let widget = world.widget.as_ref().expect("no cycle has run");
    let state = widget.state();
    let state = state.read().await;
    assert_eq!(
        state.rows(page_id).expect("unknown page"),
        [TableRow::Placeholder { message }].as_slice()
    );
}

#[then(expr = "the last fetch time is {string}")]
async fn last_fetch_time_is(world: &mut SlotBoardWorld, expected: String) {
    let expected = DateTime::parse_from_rfc3339(&expected)
        .expect("bad timestamp in feature")
        .with_timezone(&Utc);
    let widget = world.widget.as_ref().expect("no cycle has run");
    let state = widget.state();
    let state = state.read().await;
    assert_eq!(state.refresh.last_fetched_ms(), Some(epoch_ms(expected)));
}

#[then("no fetch time is recorded")]
async fn no_fetch_time(world: &mut SlotBoardWorld) {
    let widget = world.widget.as_ref().expect("no cycle has run");
    let state = widget.state();
    let state = state.read().await;
    assert_eq!(state.refresh.last_fetched_ms(), None);
    assert_eq!(state.fetched_label, slot_board::dates::FETCHED_LABEL_EMPTY);
}
