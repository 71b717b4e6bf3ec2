use serde::{Deserialize, Serialize};

use super::event::EventResponse;

/// Status update pushed by the external bot actor.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct BotStatusUpdateRequest {
    /// One of: Pending, Completed, Rejected.
    #[schema(example = "Completed")]
    pub status: String,
    /// Who triggered the change on the bot side. Defaults to "Bot".
    pub editor: Option<String>,
    /// Free-text change note. Defaults to "Status updated to <status>".
    pub changes: Option<String>,
}

/// Event list wrapper for bot commands.
#[derive(Serialize, utoipa::ToSchema)]
pub struct BotEventListResponse {
    pub data: Vec<EventResponse>,
}

/// Acknowledgement of a bot status update.
#[derive(Serialize, utoipa::ToSchema)]
pub struct BotStatusUpdateResponse {
    pub id: i32,
    pub status: String,
    pub last_editor: Option<String>,
    pub last_change: Option<String>,
}
