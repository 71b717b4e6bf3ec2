use crate::common::{TEST_BOT_API_KEY, TestApp, routes};
use serde_json::json;

mod api_key_gate {
    use super::*;

    #[tokio::test]
    async fn rejects_missing_api_key() {
        let app = TestApp::spawn().await;

        let res = app
            .put_without_api_key(&routes::bot_event(1), &json!({"status": "Completed"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "API_KEY_MISSING");
    }

    #[tokio::test]
    async fn rejects_wrong_api_key() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_api_key(routes::BOT_EVENTS, "wrong-key")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "API_KEY_INVALID");
    }
}

mod bot_reads {
    use super::*;

    #[tokio::test]
    async fn lists_all_events_with_distributions() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        app.create_event(&token, "First Event", json!([{"amount": 100, "name_list": "Alice"}]))
            .await;
        app.create_event(&token, "Second Event", json!([])).await;

        let res = app.get_with_api_key(routes::BOT_EVENTS, TEST_BOT_API_KEY).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["title"], "First Event");
        assert_eq!(data[0]["distributions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn gets_one_event() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;
        let id = app
            .create_event(&token, "Bot Readable", json!([{"amount": 100, "name_list": "Alice"}]))
            .await;

        let res = app.get_with_api_key(&routes::bot_event(id), TEST_BOT_API_KEY).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Bot Readable");
        assert_eq!(res.body["distributions"][0]["name_list"], "Alice");
    }

    #[tokio::test]
    async fn returns_404_for_unknown_event() {
        let app = TestApp::spawn().await;

        let res = app.get_with_api_key(&routes::bot_event(9999), TEST_BOT_API_KEY).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod bot_status_updates {
    use super::*;

    #[tokio::test]
    async fn updates_status_with_default_audit_fields() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;
        let id = app.create_event(&token, "To Complete", json!([])).await;

        let res = app
            .put_with_api_key(
                &routes::bot_event(id),
                &json!({"status": "Completed"}),
                TEST_BOT_API_KEY,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "Completed");
        assert_eq!(res.body["last_editor"], "Bot");
        assert_eq!(res.body["last_change"], "Status updated to Completed");
    }

    #[tokio::test]
    async fn records_custom_editor_and_change_note() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;
        let id = app.create_event(&token, "Custom Audit", json!([])).await;

        let res = app
            .put_with_api_key(
                &routes::bot_event(id),
                &json!({
                    "status": "Rejected",
                    "editor": "moderator#42",
                    "changes": "Duplicate of another event"
                }),
                TEST_BOT_API_KEY,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["last_editor"], "moderator#42");
        assert_eq!(res.body["last_change"], "Duplicate of another event");
    }

    #[tokio::test]
    async fn rejects_unknown_status() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;
        let id = app.create_event(&token, "Bad Status", json!([])).await;

        let res = app
            .put_with_api_key(
                &routes::bot_event(id),
                &json!({"status": "Paused"}),
                TEST_BOT_API_KEY,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].as_str().unwrap().contains("Pending"));
    }

    #[tokio::test]
    async fn completed_status_feeds_the_leaderboard() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;
        let id = app
            .create_event(&token, "Pipeline", json!([{"amount": 250, "name_list": "Dana"}]))
            .await;

        app.set_event_status(id, "Completed").await;

        let res = app.get_without_token(routes::LEADERBOARD).await;
        let board = res.body["leaderboard"].as_array().unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0]["name"], "Dana");
        assert_eq!(board[0]["total"], 250);
    }
}
