use async_trait::async_trait;
use leaderboard::EventStatus;

/// An event status transition, as forwarded to the notification sink.
#[derive(Clone, Debug)]
pub struct StatusChange {
    pub event_id: i32,
    pub title: String,
    pub old_status: EventStatus,
    pub new_status: EventStatus,
    pub editor: String,
    pub change_note: String,
}

/// Sink for status-change notifications (e.g. a chat-bot relay).
///
/// Injected via `AppState` so handlers never touch process-wide relay state;
/// the aggregation core has no dependency on it at all. Implementations must
/// not fail the request path: delivery problems are theirs to log.
#[async_trait]
pub trait EventNotifier: Send + Sync {
    async fn status_changed(&self, change: StatusChange);
}

/// Default sink: records status changes on the structured log.
pub struct TracingNotifier;

#[async_trait]
impl EventNotifier for TracingNotifier {
    async fn status_changed(&self, change: StatusChange) {
        tracing::info!(
            event_id = change.event_id,
            title = %change.title,
            old_status = %change.old_status,
            new_status = %change.new_status,
            editor = %change.editor,
            note = %change.change_note,
            "Event status changed"
        );
    }
}
