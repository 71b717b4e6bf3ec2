//! The public leaderboard read path.
//!
//! Each request performs one bulk fetch of (amount, name-list) pairs from
//! distributions whose owning event is `Completed`, then hands them to the
//! pure aggregation engine. Nothing is cached; the result is a pure function
//! of the rows at read time.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use leaderboard::{EventStatus, Leaderboard};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{distribution, event};
use crate::models::leaderboard::LeaderboardResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "Leaderboard",
    operation_id = "getLeaderboard",
    summary = "Compute the public leaderboard",
    description = "Aggregates every distribution of every `Completed` event into ranked \
        per-participant totals plus global statistics. Recomputed from the store on every \
        request. If the source rows cannot be fetched, responds 500 with `error` set and an \
        empty-but-well-formed leaderboard shape.",
    responses(
        (status = 200, description = "Ranked leaderboard", body = LeaderboardResponse),
        (status = 500, description = "Source fetch failed (AGGREGATION_UNAVAILABLE); body still \
            carries the empty leaderboard shape", body = LeaderboardResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn get_leaderboard(State(state): State<AppState>) -> impl IntoResponse {
    let awards = match fetch_completed_awards(&state.db).await {
        Ok(awards) => awards,
        Err(err) => {
            tracing::error!("Failed to fetch completed distributions: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LeaderboardResponse::unavailable()),
            );
        }
    };

    let board = Leaderboard::compute(
        awards
            .iter()
            .map(|(amount, name_list)| (*amount as u32, name_list.as_str())),
    );

    tracing::debug!(
        distributions = awards.len(),
        participants = board.entries.len(),
        "Leaderboard computed"
    );

    (StatusCode::OK, Json(LeaderboardResponse::from_board(board)))
}

/// Single bulk fetch of (amount, name-list blob) pairs whose owning event is
/// `Completed`. Amounts were validated positive at the write boundary.
async fn fetch_completed_awards(db: &DatabaseConnection) -> Result<Vec<(i32, String)>, DbErr> {
    let rows = distribution::Entity::find()
        .find_also_related(event::Entity)
        .filter(event::Column::Status.eq(EventStatus::Completed.as_str()))
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(dist, _)| (dist.amount, dist.name_list))
        .collect())
}
