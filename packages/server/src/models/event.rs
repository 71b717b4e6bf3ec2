use std::str::FromStr;

use chrono::{DateTime, Utc};
use leaderboard::EventStatus;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::error::AppError;

/// Upper bound on a single distribution's point amount.
pub const MAX_AMOUNT: i32 = 100_000;
/// Upper bound on distributions per event.
pub const MAX_DISTRIBUTIONS: usize = 100;
/// Upper bound on a distribution remark, in bytes.
pub const MAX_REMARK_LEN: usize = 10_000;

/// One point distribution as submitted by an organizer.
#[derive(Clone, Deserialize, utoipa::ToSchema)]
pub struct DistributionPayload {
    /// Points awarded to every name on the list (1..=100000).
    #[schema(example = 300)]
    pub amount: i32,
    /// Newline-separated recipient names; must contain at least one name.
    #[schema(example = "Alice\nBob")]
    pub name_list: String,
    /// Optional free-text note.
    pub remark: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Community AMA")]
    pub title: String,
    pub event_date: DateTime<Utc>,
    /// Display name of whoever requested the event.
    #[schema(example = "Sahara")]
    pub requestor: String,
    /// Defaults to "Global" when omitted.
    pub region: Option<String>,
    /// Point distributions owned by the event. May be empty.
    #[serde(default)]
    pub distributions: Vec<DistributionPayload>,
}

/// PATCH body for an event. Omitted fields are left unchanged; a present
/// `distributions` array replaces all existing distributions.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub requestor: Option<String>,
    pub region: Option<String>,
    pub distributions: Option<Vec<DistributionPayload>>,
}

/// Organizer-UI status transition.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateEventStatusRequest {
    /// One of: Pending, Completed, Rejected.
    #[schema(example = "Completed")]
    pub status: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct EventListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Case-insensitive substring match on title.
    pub search: Option<String>,
    /// One of: event_date, created_at, title, status. Default: event_date.
    pub sort_by: Option<String>,
    /// "asc" or "desc" (default).
    pub sort_order: Option<String>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct DistributionResponse {
    pub id: i32,
    pub amount: i32,
    pub name_list: String,
    pub remark: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    pub id: i32,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub requestor: String,
    pub region: String,
    pub status: String,
    pub last_editor: Option<String>,
    pub last_change: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub distributions: Vec<DistributionResponse>,
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct EventListItem {
    pub id: i32,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub requestor: String,
    pub region: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventListResponse {
    pub data: Vec<EventListItem>,
    pub pagination: Pagination,
}

impl From<crate::entity::distribution::Model> for DistributionResponse {
    fn from(m: crate::entity::distribution::Model) -> Self {
        Self {
            id: m.id,
            amount: m.amount,
            name_list: m.name_list,
            remark: m.remark,
        }
    }
}

pub fn event_response(
    event: crate::entity::event::Model,
    distributions: Vec<crate::entity::distribution::Model>,
) -> EventResponse {
    EventResponse {
        id: event.id,
        title: event.title,
        event_date: event.event_date,
        requestor: event.requestor,
        region: event.region,
        status: event.status,
        last_editor: event.last_editor,
        last_change: event.last_change,
        created_at: event.created_at,
        updated_at: event.updated_at,
        distributions: distributions
            .into_iter()
            .map(DistributionResponse::from)
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a trimmed event title (2-100 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    let len = title.chars().count();
    if len < 2 || len > 100 {
        return Err(AppError::Validation("Title must be 2-100 characters".into()));
    }
    Ok(())
}

/// Validate a trimmed requestor name (2-50 Unicode characters).
pub fn validate_requestor(requestor: &str) -> Result<(), AppError> {
    let requestor = requestor.trim();
    let len = requestor.chars().count();
    if len < 2 || len > 50 {
        return Err(AppError::Validation(
            "Requestor must be 2-50 characters".into(),
        ));
    }
    Ok(())
}

fn validate_region(region: &str) -> Result<(), AppError> {
    let region = region.trim();
    if region.is_empty() || region.chars().count() > 50 {
        return Err(AppError::Validation(
            "Region must be 1-50 characters".into(),
        ));
    }
    Ok(())
}

/// Validate the write boundary for distributions: positive bounded amounts
/// and at least one parseable name per list. Malformed values are rejected
/// here so the aggregation engine never sees them.
pub fn validate_distributions(distributions: &[DistributionPayload]) -> Result<(), AppError> {
    if distributions.len() > MAX_DISTRIBUTIONS {
        return Err(AppError::Validation(format!(
            "At most {MAX_DISTRIBUTIONS} distributions per event"
        )));
    }
    for (i, dist) in distributions.iter().enumerate() {
        if dist.amount < 1 || dist.amount > MAX_AMOUNT {
            return Err(AppError::Validation(format!(
                "Distribution {}: amount must be 1-{MAX_AMOUNT}",
                i + 1
            )));
        }
        if !leaderboard::roster::has_names(&dist.name_list) {
            return Err(AppError::Validation(format!(
                "Distribution {}: name list must contain at least one name",
                i + 1
            )));
        }
        if let Some(ref remark) = dist.remark
            && remark.len() > MAX_REMARK_LEN
        {
            return Err(AppError::Validation(format!(
                "Distribution {}: remark is too long",
                i + 1
            )));
        }
    }
    Ok(())
}

/// Parse and validate a status string against the known lifecycle values.
pub fn parse_status(status: &str) -> Result<EventStatus, AppError> {
    EventStatus::from_str(status).map_err(|e| AppError::Validation(e.to_string()))
}

pub fn validate_create_event(req: &CreateEventRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_requestor(&req.requestor)?;
    if let Some(ref region) = req.region {
        validate_region(region)?;
    }
    validate_distributions(&req.distributions)
}

pub fn validate_update_event(req: &UpdateEventRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(ref requestor) = req.requestor {
        validate_requestor(requestor)?;
    }
    if let Some(ref region) = req.region {
        validate_region(region)?;
    }
    if let Some(ref distributions) = req.distributions {
        validate_distributions(distributions)?;
    }
    Ok(())
}
