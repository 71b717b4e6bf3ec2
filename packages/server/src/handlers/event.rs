use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use leaderboard::EventStatus;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{distribution, event};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::event::*;
use crate::models::shared::{Pagination, escape_like};
use crate::notify::StatusChange;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Events",
    operation_id = "createEvent",
    summary = "Create a new event with its point distributions",
    description = "Creates an event in `Pending` status. Requires `event:create` permission. \
        Distribution amounts and name lists are validated at this write boundary so that \
        aggregation never sees malformed rows.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:create")?;
    validate_create_event(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let new_event = event::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        event_date: Set(payload.event_date),
        requestor: Set(payload.requestor.trim().to_string()),
        region: Set(payload
            .region
            .as_deref()
            .map(str::trim)
            .unwrap_or("Global")
            .to_string()),
        status: Set(EventStatus::Pending.as_str().to_string()),
        last_editor: Set(None),
        last_change: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_event.insert(&txn).await?;
    let distributions = insert_distributions(&txn, model.id, &payload.distributions, now).await?;
    txn.commit().await?;

    tracing::info!(
        event_id = model.id,
        distributions = distributions.len(),
        user_id = auth_user.user_id,
        "Event created"
    );

    Ok((
        StatusCode::CREATED,
        Json(event_response(model, distributions)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Events",
    operation_id = "listEvents",
    summary = "List events with pagination and search",
    description = "Returns a paginated event list with optional title search. Supports sorting \
        by `event_date` (default, descending), `created_at`, `title`, or `status`.",
    params(EventListQuery),
    responses(
        (status = 200, description = "List of events", body = EventListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_events(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<EventListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = event::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(event::Column::Title)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    let sort_by = query.sort_by.as_deref().unwrap_or("event_date");
    let sort_order = if query.sort_order.as_deref() == Some("asc") {
        Order::Asc
    } else {
        Order::Desc
    };
    let sort_column = match sort_by {
        "event_date" => event::Column::EventDate,
        "created_at" => event::Column::CreatedAt,
        "title" => event::Column::Title,
        "status" => event::Column::Status,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: event_date, created_at, title, status".into(),
            ));
        }
    };

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    select = select.order_by(sort_column, sort_order);
    let total_pages = total.div_ceil(per_page);

    let data = select
        .select_only()
        .column(event::Column::Id)
        .column(event::Column::Title)
        .column(event::Column::EventDate)
        .column(event::Column::Requestor)
        .column(event::Column::Region)
        .column(event::Column::Status)
        .column(event::Column::CreatedAt)
        .column(event::Column::UpdatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<EventListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(EventListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    operation_id = "getEvent",
    summary = "Get an event with its distributions",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_event(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EventResponse>, AppError> {
    let model = find_event(&state.db, id).await?;
    let distributions = load_distributions(&state.db, id).await?;
    Ok(Json(event_response(model, distributions)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Events",
    operation_id = "updateEvent",
    summary = "Update an event",
    description = "Partially updates event fields. Requires `event:edit` permission. When a \
        `distributions` array is present it atomically replaces all existing distributions. \
        Records the caller in the event's audit fields.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    auth_user.require_permission("event:edit")?;
    validate_update_event(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;
    let existing = find_event_for_update(&txn, id).await?;

    let mut changed: Vec<&str> = Vec::new();
    let mut active: event::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
        changed.push("title");
    }
    if let Some(event_date) = payload.event_date {
        active.event_date = Set(event_date);
        changed.push("event_date");
    }
    if let Some(ref requestor) = payload.requestor {
        active.requestor = Set(requestor.trim().to_string());
        changed.push("requestor");
    }
    if let Some(ref region) = payload.region {
        active.region = Set(region.trim().to_string());
        changed.push("region");
    }

    if let Some(ref distributions) = payload.distributions {
        distribution::Entity::delete_many()
            .filter(distribution::Column::EventId.eq(id))
            .exec(&txn)
            .await?;
        insert_distributions(&txn, id, distributions, now).await?;
        changed.push("distributions");
    }

    if !changed.is_empty() {
        active.last_editor = Set(Some(auth_user.username.clone()));
        active.last_change = Set(Some(format!("Updated {}", changed.join(", "))));
    }
    active.updated_at = Set(now);

    let model = active.update(&txn).await?;
    txn.commit().await?;

    let distributions = load_distributions(&state.db, id).await?;
    Ok(Json(event_response(model, distributions)))
}

#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = "Events",
    operation_id = "updateEventStatus",
    summary = "Transition an event's status",
    description = "Moves the event between `Pending`, `Completed`, and `Rejected`. Requires \
        `event:status` permission. Only `Completed` events feed the leaderboard. The change is \
        forwarded to the notification sink.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = EventResponse),
        (status = 400, description = "Unknown status value (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_event_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateEventStatusRequest>,
) -> Result<Json<EventResponse>, AppError> {
    auth_user.require_permission("event:status")?;
    let new_status = parse_status(&payload.status)?;

    let txn = state.db.begin().await?;
    let existing = find_event_for_update(&txn, id).await?;
    let old_status = stored_status(&existing)?;
    let title = existing.title.clone();
    let change_note = format!("Status updated to {new_status}");

    let mut active: event::ActiveModel = existing.into();
    active.status = Set(new_status.as_str().to_string());
    active.last_editor = Set(Some(auth_user.username.clone()));
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
            editor: auth_user.username,
            change_note,
        })
        .await;

    let distributions = load_distributions(&state.db, id).await?;
    Ok(Json(event_response(model, distributions)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    operation_id = "deleteEvent",
    summary = "Delete an event and its distributions",
    description = "Permanently deletes an event and cascade-deletes its distributions in one \
        transaction. Requires `event:delete` permission.",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:delete")?;

    let txn = state.db.begin().await?;
    let _event = find_event_for_update(&txn, id).await?;

    distribution::Entity::delete_many()
        .filter(distribution::Column::EventId.eq(id))
        .exec(&txn)
        .await?;
    event::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(event_id = id, user_id = auth_user.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Parse the status column of a stored event. A bad stored value is a data
/// corruption, not a caller mistake.
pub(crate) fn stored_status(event: &event::Model) -> Result<EventStatus, AppError> {
    event
        .status
        .parse::<EventStatus>()
        .map_err(|e| AppError::Internal(format!("Stored event {}: {e}", event.id)))
}

pub(crate) async fn find_event<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<event::Model, AppError> {
    event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}

pub(crate) async fn find_event_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<event::Model, AppError> {
    use sea_orm::sea_query::LockType;
    event::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}

pub(crate) async fn load_distributions<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
) -> Result<Vec<distribution::Model>, AppError> {
    Ok(distribution::Entity::find()
        .filter(distribution::Column::EventId.eq(event_id))
        .order_by_asc(distribution::Column::Id)
        .all(db)
        .await?)
}

async fn insert_distributions(
    txn: &DatabaseTransaction,
    event_id: i32,
    payloads: &[DistributionPayload],
    now: chrono::DateTime<chrono::Utc>,
) -> Result<Vec<distribution::Model>, AppError> {
    let mut models = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let new_dist = distribution::ActiveModel {
            event_id: Set(event_id),
            amount: Set(payload.amount),
            name_list: Set(payload.name_list.clone()),
            remark: Set(payload.remark.clone()),
            created_at: Set(now),
            ..Default::default()
        };
        models.push(new_dist.insert(txn).await?);
    }
    Ok(models)
}
