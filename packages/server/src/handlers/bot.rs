//! API-key-guarded surface for the external bot actor.
//!
//! The bot reads events to announce them and flips their status once points
//! have been sent; it never authenticates as a user.

use axum::Json;
use axum::extract::{Path, State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{distribution, event};
use crate::error::{AppError, ErrorBody};
use crate::extractors::api_key::BotKey;
use crate::extractors::json::AppJson;
use crate::handlers::event::{find_event, find_event_for_update, load_distributions, stored_status};
use crate::models::bot::{BotEventListResponse, BotStatusUpdateRequest, BotStatusUpdateResponse};
use crate::models::event::{EventResponse, event_response, parse_status};
use crate::notify::StatusChange;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/events",
    tag = "Bot",
    operation_id = "botListEvents",
    summary = "List all events with distributions (bot)",
    responses(
        (status = 200, description = "All events", body = BotEventListResponse),
        (status = 401, description = "Missing or invalid API key (API_KEY_MISSING, API_KEY_INVALID)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(state, _key))]
pub async fn list_events(
    _key: BotKey,
    State(state): State<AppState>,
) -> Result<Json<BotEventListResponse>, AppError> {
    let rows = event::Entity::find()
        .find_with_related(distribution::Entity)
        .order_by_asc(event::Column::Id)
        .all(&state.db)
        .await?;

    let data: Vec<EventResponse> = rows
        .into_iter()
        .map(|(ev, dists)| event_response(ev, dists))
        .collect();

    Ok(Json(BotEventListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Bot",
    operation_id = "botGetEvent",
    summary = "Get one event with distributions (bot)",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 401, description = "Missing or invalid API key (API_KEY_MISSING, API_KEY_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(state, _key), fields(id))]
pub async fn get_event(
    _key: BotKey,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EventResponse>, AppError> {
    let model = find_event(&state.db, id).await?;
    let distributions = load_distributions(&state.db, id).await?;
    Ok(Json(event_response(model, distributions)))
}

#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "Bot",
    operation_id = "botUpdateEventStatus",
    summary = "Update an event's status (bot)",
    description = "Validates the status against the known lifecycle values and records the \
        bot-supplied editor and change note in the event's audit fields (defaulting to \"Bot\" \
        and \"Status updated to <status>\"). The change is forwarded to the notification sink.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = BotStatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = BotStatusUpdateResponse),
        (status = 400, description = "Unknown status value (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Missing or invalid API key (API_KEY_MISSING, API_KEY_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("api_key" = [])),
)]
#[instrument(skip(state, _key, payload), fields(id))]
pub async fn update_event_status(
    _key: BotKey,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<BotStatusUpdateRequest>,
) -> Result<Json<BotStatusUpdateResponse>, AppError> {
    let new_status = parse_status(&payload.status)?;
    let editor = payload.editor.unwrap_or_else(|| "Bot".to_string());
    let change_note = payload
        .changes
        .unwrap_or_else(|| format!("Status updated to {new_status}"));

    let txn = state.db.begin().await?;
    let existing = find_event_for_update(&txn, id).await?;
    let old_status = stored_status(&existing)?;
    let title = existing.title.clone();

    let mut active: event::ActiveModel = existing.into();
    active.status = Set(new_status.as_str().to_string());
    active.last_editor = Set(Some(editor.clone()));
    active.last_change = Set(Some(change_note.clone()));
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    state
        .notifier
        .status_changed(StatusChange {
            event_id: id,
            title,
            old_status,
            new_status,
            editor,
            change_note,
        })
        .await;

    Ok(Json(BotStatusUpdateResponse {
        id: model.id,
        status: model.status,
        last_editor: model.last_editor,
        last_change: model.last_change,
    }))
}
