use crate::common::{TestApp, routes};
use serde_json::json;

/// A minimal valid event payload with one distribution.
fn valid_event_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "event_date": "2026-06-01T18:00:00Z",
        "requestor": "Community Team",
        "distributions": [
            {"amount": 300, "name_list": "Alice\nBob", "remark": "AMA participation"}
        ],
    })
}

mod event_creation {
    use super::*;

    #[tokio::test]
    async fn organizer_can_create_an_event() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        let res = app
            .post_with_token(routes::EVENTS, &valid_event_body("Community AMA"), &token)
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["title"], "Community AMA");
        assert_eq!(res.body["status"], "Pending");
        assert_eq!(res.body["region"], "Global");
        assert_eq!(res.body["distributions"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["distributions"][0]["amount"], 300);
    }

    #[tokio::test]
    async fn create_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::EVENTS, &valid_event_body("No Auth"))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn rejects_short_title() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        let mut body = valid_event_body("X");
        body["title"] = json!("X");
        let res = app.post_with_token(routes::EVENTS, &body, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        let mut body = valid_event_body("Bad Amount");
        body["distributions"] = json!([{"amount": 0, "name_list": "Alice"}]);
        let res = app.post_with_token(routes::EVENTS, &body, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_amount_above_limit() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        let mut body = valid_event_body("Too Big");
        body["distributions"] = json!([{"amount": 100_001, "name_list": "Alice"}]);
        let res = app.post_with_token(routes::EVENTS, &body, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_blank_name_list() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        let mut body = valid_event_body("Blank Names");
        body["distributions"] = json!([{"amount": 100, "name_list": "   \n\n  "}]);
        let res = app.post_with_token(routes::EVENTS, &body, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn event_without_distributions_is_allowed() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        let res = app
            .post_with_token(
                routes::EVENTS,
                &json!({
                    "title": "Announcement Only",
                    "event_date": "2026-06-01T18:00:00Z",
                    "requestor": "Community Team",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["distributions"].as_array().unwrap().len(), 0);
    }
}

mod event_listing {
    use super::*;

    #[tokio::test]
    async fn lists_events_with_pagination() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        for i in 0..3 {
            app.create_event(&token, &format!("Event {i}"), json!([])).await;
        }

        let res = app
            .get_with_token(&format!("{}?per_page=2", routes::EVENTS), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn searches_by_title() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        app.create_event(&token, "Summer Gathering", json!([])).await;
        app.create_event(&token, "Winter Meetup", json!([])).await;

        let res = app
            .get_with_token(&format!("{}?search=summer", routes::EVENTS), &token)
            .await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["title"], "Summer Gathering");
    }

    #[tokio::test]
    async fn rejects_unknown_sort_column() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        let res = app
            .get_with_token(&format!("{}?sort_by=secret", routes::EVENTS), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod event_update {
    use super::*;

    #[tokio::test]
    async fn updates_fields_and_records_audit_trail() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;
        let id = app.create_event(&token, "Old Title", json!([])).await;

        let res = app
            .patch_with_token(
                &routes::event(id),
                &json!({"title": "New Title", "region": "EU"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "New Title");
        assert_eq!(res.body["region"], "EU");
        assert_eq!(res.body["last_editor"], "org1");
        assert_eq!(res.body["last_change"], "Updated title, region");
    }

    #[tokio::test]
    async fn replaces_distributions_wholesale() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;
        let id = app
            .create_event(
                &token,
                "Replace Test",
                json!([
                    {"amount": 100, "name_list": "Alice"},
                    {"amount": 200, "name_list": "Bob"}
                ]),
            )
            .await;

        let res = app
            .patch_with_token(
                &routes::event(id),
                &json!({"distributions": [{"amount": 500, "name_list": "Carol"}]}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        let dists = res.body["distributions"].as_array().unwrap();
        assert_eq!(dists.len(), 1);
        assert_eq!(dists[0]["amount"], 500);
        assert_eq!(dists[0]["name_list"], "Carol");
    }

    #[tokio::test]
    async fn update_validates_replacement_distributions() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;
        let id = app.create_event(&token, "Validation", json!([])).await;

        let res = app
            .patch_with_token(
                &routes::event(id),
                &json!({"distributions": [{"amount": -1, "name_list": "Alice"}]}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn returns_404_for_missing_event() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;

        let res = app
            .patch_with_token(&routes::event(9999), &json!({"title": "Ghost"}), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod event_status {
    use super::*;

    #[tokio::test]
    async fn admin_can_complete_an_event() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin1", "pass1234", "admin").await;
        let id = app.create_event(&admin, "Status Test", json!([])).await;

        let res = app
            .patch_with_token(&routes::event_status(id), &json!({"status": "Completed"}), &admin)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "Completed");
        assert_eq!(res.body["last_editor"], "admin1");
        assert_eq!(res.body["last_change"], "Status updated to Completed");
    }

    #[tokio::test]
    async fn organizer_cannot_transition_status() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;
        let id = app.create_event(&token, "No Perms", json!([])).await;

        let res = app
            .patch_with_token(&routes::event_status(id), &json!({"status": "Completed"}), &token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn rejects_unknown_status_value() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin1", "pass1234", "admin").await;
        let id = app.create_event(&admin, "Bad Status", json!([])).await;

        let res = app
            .patch_with_token(&routes::event_status(id), &json!({"status": "Paused"}), &admin)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod event_deletion {
    use super::*;
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
    use server::entity::distribution;

    #[tokio::test]
    async fn admin_deletes_event_and_distributions_cascade() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin1", "pass1234", "admin").await;
        let id = app
            .create_event(
                &admin,
                "Doomed Event",
                json!([{"amount": 100, "name_list": "Alice\nBob"}]),
            )
            .await;

        let res = app.delete_with_token(&routes::event(id), &admin).await;
        assert_eq!(res.status, 204);

        let get = app.get_with_token(&routes::event(id), &admin).await;
        assert_eq!(get.status, 404);

        let remaining = distribution::Entity::find()
            .filter(distribution::Column::EventId.eq(id))
            .count(&app.db)
            .await
            .expect("DB query failed");
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn organizer_cannot_delete_events() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("org1", "pass1234").await;
        let id = app.create_event(&token, "Protected", json!([])).await;

        let res = app.delete_with_token(&routes::event(id), &token).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}
