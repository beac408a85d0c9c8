use axum::{Json, extract::State};

use crate::lifecycle::{KeyOutcome, SubmitTicket};
use crate::models::SearchRequest;

use super::AppState;
use super::models::{InputRequest, KeyRequest, SnapshotView, StatusView, SubmitRequest};

pub async fn input_handler(
    State(state): State<AppState>,
    Json(request): Json<InputRequest>,
) -> Json<SnapshotView> {
    let mut lifecycle = state.lifecycle.lock().await;
    lifecycle.input(&request.query);
    Json(SnapshotView::capture(&lifecycle))
}

pub async fn key_handler(
    State(state): State<AppState>,
    Json(request): Json<KeyRequest>,
) -> Json<SnapshotView> {
    let mut lifecycle = state.lifecycle.lock().await;
    if let KeyOutcome::Submit(ticket) = lifecycle.handle_key(request.key) {
        spawn_search(state.clone(), ticket);
    }
    Json(SnapshotView::capture(&lifecycle))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Json<SnapshotView> {
    let mut lifecycle = state.lifecycle.lock().await;
    // blank query leaves the session untouched, snapshot comes back as-is
    if let Some(ticket) = lifecycle.submit_query(&request.query) {
        spawn_search(state.clone(), ticket);
    }
    Json(SnapshotView::capture(&lifecycle))
}

pub async fn state_handler(State(state): State<AppState>) -> Json<SnapshotView> {
    let lifecycle = state.lifecycle.lock().await;
    Json(SnapshotView::capture(&lifecycle))
}

pub async fn status_handler(State(state): State<AppState>) -> Json<StatusView> {
    let health = state.health.borrow().clone();
    Json(StatusView::from_health(&health))
}

/// Runs one accepted submission in the background. The lifecycle decides
/// at report-back time whether this outcome is still the current one.
fn spawn_search(state: AppState, ticket: SubmitTicket) {
    tokio::spawn(async move {
        let request = SearchRequest::new(ticket.query.as_str());
        let outcome = state.client.search(&request).await;
        let mut lifecycle = state.lifecycle.lock().await;
        if !lifecycle.complete(ticket.generation, outcome) {
            tracing::debug!(
                "dropped stale search outcome for generation {}",
                ticket.generation
            );
        }
    });
}
