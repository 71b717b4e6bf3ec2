use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;

/// Marker extractor for the bot surface: requires an `X-Api-Key` header
/// matching the configured bot key. No user identity is attached.
pub struct BotKey;

impl FromRequestParts<AppState> for BotKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get("X-Api-Key")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::ApiKeyMissing)?;

        if key != state.config.bot.api_key {
            tracing::warn!("Bot request with invalid API key");
            return Err(AppError::ApiKeyInvalid);
        }

        Ok(BotKey)
    }
}
