//! Web board with JSON API endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;

use crate::dates::epoch_ms;
use crate::render::{html_escape, rows_to_html};
use crate::widget::{AvailabilityWidget, RefreshOutcome};

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub widget: Arc<AvailabilityWidget>,
}

/// Build the dashboard axum router
pub fn build_router(widget: Arc<AvailabilityWidget>) -> Router {
    let dashboard_state = DashboardState { widget };

    Router::new()
        .route("/", get(index_handler))
        .route("/refresh", post(refresh_form_handler))
        .route("/api/board", get(board_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/health", get(health_handler))
        .with_state(dashboard_state)
}

async fn index_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let hours = &dashboard.widget.render_config().hours;
    let state = dashboard.widget.state();
    let state = state.read().await;

    let hour_headers: String = hours
        .iter()
        .map(|h| format!("<th>{}</th>", html_escape(h)))
        .collect();

    let tables: String = state
        .pages
        .iter()
        .map(|view| {
            format!(
                r#"<section>
        <h2>{label}</h2>
        <table>
            <thead><tr><th>日付</th>{hour_headers}</tr></thead>
            <tbody id="{table_id}">{rows}</tbody>
        </table>
    </section>"#,
                label = html_escape(&view.page.label),
                hour_headers = hour_headers,
                table_id = html_escape(&view.page.table_id),
                rows = rows_to_html(&view.rows, hours.len()),
            )
        })
        .collect();

    let status_class = if state.status.is_error {
        "muted error"
    } else {
        "muted"
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>キッズパーク 空き状況</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ padding: 0.4rem; border-bottom: 1px solid #dee2e6; text-align: center; }}
        .muted {{ color: #6c757d; }}
        .error {{ color: #721c24; }}
        .tag {{ display: inline-block; padding: 0.2em 0.6em; border-radius: 0.25rem; background: #d4edda; color: #155724; }}
        .tag.danger {{ background: #fff3cd; color: #856404; }}
        .tag.full {{ background: #f8d7da; color: #721c24; }}
        .tag.none {{ background: #e2e3e5; color: #383d41; }}
    </style>
</head>
<body>
    <p><span id="range">{range}</span> <span id="fetched-at" class="muted">{fetched}</span></p>
    <p id="status" class="{status_class}">{status}</p>
    <form method="post" action="/refresh"><button id="refresh" type="submit">再取得</button></form>
    {tables}
</body>
</html>"#,
        range = html_escape(&state.range_label),
        fetched = html_escape(&state.fetched_label),
        status_class = status_class,
        status = html_escape(&state.status.text),
        tables = tables,
    );

    Html(html)
}

async fn board_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.widget.state();
    let state = state.read().await;
    let now_ms = epoch_ms(Utc::now());

    axum::Json(serde_json::json!({
        "pages": state.pages,
        "status": state.status,
        "range_label": state.range_label,
        "fetched_label": state.fetched_label,
        "last_fetch_status": state.last_fetch_status,
        "refresh_state": state.refresh.state(now_ms),
        "cooldown_minutes": state.refresh.cooldown_minutes(),
        "last_fetched_ms": state.refresh.last_fetched_ms(),
    }))
}

async fn refresh_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let outcome = dashboard.widget.request_refresh(Utc::now()).await;
    let state = dashboard.widget.state();
    let status = state.read().await.status.clone();

    let (accepted, remaining_minutes) = match outcome {
        RefreshOutcome::Fetched { .. } => (true, None),
        RefreshOutcome::Rejected { remaining_minutes } => (false, Some(remaining_minutes)),
    };

    axum::Json(serde_json::json!({
        "accepted": accepted,
        "remaining_minutes": remaining_minutes,
        "outcome": outcome,
        "status": status,
    }))
}

async fn refresh_form_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    dashboard.widget.request_refresh(Utc::now()).await;
    Redirect::to("/")
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
