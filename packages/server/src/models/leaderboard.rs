use leaderboard::{GlobalStats, Leaderboard, LeaderboardEntry};
use serde::Serialize;

/// Public leaderboard payload.
///
/// On a healthy read `error` is absent. When the source rows cannot be
/// fetched the same shape is returned with `error` set and an empty
/// leaderboard, so clients can always render it.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "AGGREGATION_UNAVAILABLE")]
    pub error: Option<&'static str>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub global_stats: GlobalStats,
}

impl LeaderboardResponse {
    pub fn from_board(board: Leaderboard) -> Self {
        Self {
            error: None,
            leaderboard: board.entries,
            global_stats: board.global_stats,
        }
    }

    /// The degraded-but-well-formed fallback returned on fetch failure.
    pub fn unavailable() -> Self {
        let empty = Leaderboard::empty();
        Self {
            error: Some("AGGREGATION_UNAVAILABLE"),
            leaderboard: empty.entries,
            global_stats: empty.global_stats,
        }
    }
}
