//! # Feedback Lifecycle Tests
//!
//! Creation, scoping, updates, acknowledgment, tags, feedback requests and
//! dashboard figures, exercised over HTTP against a seeded database.

mod common;

use common::{ALICE_EMAIL, BOB_EMAIL, MANAGER_EMAIL, TestApp};
use entity::sea_orm_active_enums::UserRole;
use http::StatusCode;
use serde_json::{Value, json};

fn feedback_body(employee_id: i32, sentiment: &str, tag_ids: &[i32]) -> Value {
    json!({
        "employee_id": employee_id,
        "strengths": "Clear written updates",
        "areas_to_improve": "Speak up earlier in planning",
        "sentiment": sentiment,
        "tag_ids": tag_ids,
    })
}

fn tag_ids(feedback: &Value) -> Vec<i64> {
    feedback["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tag| tag["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_feedback_embeds_people_and_tags() {
    let app = TestApp::new().await;
    let manager = app.user(MANAGER_EMAIL).await;
    let alice = app.user(ALICE_EMAIL).await;
    let token = app.token_for(MANAGER_EMAIL).await;

    let (status, body) = app
        .post("/feedback", &token, feedback_body(alice.id, "positive", &[4, 1, 999]))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["manager_id"], manager.id);
    assert_eq!(body["employee"]["email"], ALICE_EMAIL);
    assert_eq!(body["manager"]["role"], "manager");
    assert_eq!(body["sentiment"], "positive");
    assert_eq!(body["acknowledged"], false);
    assert!(body["acknowledged_at"].is_null());
    assert_eq!(body["created_at"], body["updated_at"]);
    // unknown tag 999 is dropped, the rest come back ordered by id
    assert_eq!(tag_ids(&body), vec![1, 4]);
}

#[tokio::test]
async fn test_feedback_only_for_own_team() {
    let app = TestApp::new().await;
    let manager = app.user(MANAGER_EMAIL).await;
    let other_manager = app
        .insert_user("lead@company.com", UserRole::Manager, None)
        .await;
    let outsider = app
        .insert_user("dana@company.com", UserRole::Employee, Some(other_manager.id))
        .await;
    let token = app.token_for(MANAGER_EMAIL).await;

    for employee_id in [outsider.id, manager.id, other_manager.id, 4242] {
        let (status, body) = app
            .post("/feedback", &token, feedback_body(employee_id, "neutral", &[]))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "employee {employee_id}");
        assert_eq!(body["message"], "Employee not found in your team");
    }

    let (_, listed) = app.get("/feedback", &token).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_is_scoped_by_role() {
    let app = TestApp::new().await;
    let alice = app.user(ALICE_EMAIL).await;
    let bob = app.user(BOB_EMAIL).await;
    let manager_token = app.token_for(MANAGER_EMAIL).await;

    let (_, first) = app
        .post("/feedback", &manager_token, feedback_body(alice.id, "positive", &[]))
        .await;
    let (_, second) = app
        .post("/feedback", &manager_token, feedback_body(bob.id, "negative", &[]))
        .await;
    let (_, third) = app
        .post("/feedback", &manager_token, feedback_body(alice.id, "neutral", &[]))
        .await;

    let (status, all) = app.get("/feedback", &manager_token).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&Value> = all.as_array().unwrap().iter().map(|f| &f["id"]).collect();
    assert_eq!(ids, vec![&third["id"], &second["id"], &first["id"]]);

    let (_, mine) = app.get("/feedback", &app.token_for(ALICE_EMAIL).await).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|f| f["employee_id"] == alice.id));

    let stranger = app
        .insert_user("lead@company.com", UserRole::Manager, None)
        .await;
    let (_, none) = app
        .get("/feedback", &app.token_for(&stranger.email).await)
        .await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_replaces_fields_and_tags() {
    let app = TestApp::new().await;
    let alice = app.user(ALICE_EMAIL).await;
    let token = app.token_for(MANAGER_EMAIL).await;

    let (_, created) = app
        .post("/feedback", &token, feedback_body(alice.id, "neutral", &[1, 2]))
        .await;
    let uri = format!("/feedback/{}", created["id"]);

    // omitted tag_ids leave the set alone
    let (status, updated) = app.put(&uri, &token, json!({ "sentiment": "positive" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["sentiment"], "positive");
    assert_eq!(updated["strengths"], created["strengths"]);
    assert_eq!(tag_ids(&updated), vec![1, 2]);

    let (_, retagged) = app.put(&uri, &token, json!({ "tag_ids": [3] })).await;
    assert_eq!(tag_ids(&retagged), vec![3]);

    // an empty list clears every tag
    let (_, cleared) = app.put(&uri, &token, json!({ "tag_ids": [] })).await;
    assert!(tag_ids(&cleared).is_empty());
    assert_eq!(cleared["sentiment"], "positive");
}

#[tokio::test]
async fn test_update_requires_authorship() {
    let app = TestApp::new().await;
    let alice = app.user(ALICE_EMAIL).await;
    let token = app.token_for(MANAGER_EMAIL).await;

    let (_, created) = app
        .post("/feedback", &token, feedback_body(alice.id, "neutral", &[]))
        .await;
    let uri = format!("/feedback/{}", created["id"]);

    let other = app
        .insert_user("lead@company.com", UserRole::Manager, None)
        .await;
    let (status, body) = app
        .put(&uri, &app.token_for(&other.email).await, json!({ "sentiment": "negative" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Feedback not found");

    let (status, _) = app
        .put(&uri, &app.token_for(ALICE_EMAIL).await, json!({ "sentiment": "negative" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.put("/feedback/4242", &token, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_acknowledge_is_idempotent() {
    let app = TestApp::new().await;
    let alice = app.user(ALICE_EMAIL).await;
    let manager_token = app.token_for(MANAGER_EMAIL).await;
    let alice_token = app.token_for(ALICE_EMAIL).await;

    let (_, created) = app
        .post("/feedback", &manager_token, feedback_body(alice.id, "positive", &[]))
        .await;
    let uri = format!("/feedback/{}/acknowledge", created["id"]);

    let (status, body) = app.post(&uri, &alice_token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Feedback acknowledged");

    let (_, listed) = app.get("/feedback", &alice_token).await;
    let first_ack = listed[0]["acknowledged_at"].clone();
    assert_eq!(listed[0]["acknowledged"], true);
    assert!(first_ack.is_string());

    let (status, _) = app.post(&uri, &alice_token, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = app.get("/feedback", &alice_token).await;
    assert_eq!(listed[0]["acknowledged_at"], first_ack);

    let (status, _) = app
        .post(&uri, &app.token_for(BOB_EMAIL).await, json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = TestApp::new().await;
    let alice = app.user(ALICE_EMAIL).await;
    let bob = app.user(BOB_EMAIL).await;
    let token = app.token_for(MANAGER_EMAIL).await;

    for (employee_id, sentiment) in [
        (alice.id, "positive"),
        (bob.id, "neutral"),
        (alice.id, "positive"),
        (bob.id, "negative"),
    ] {
        let (status, _) = app
            .post("/feedback", &token, feedback_body(employee_id, sentiment, &[]))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, stats) = app.get("/dashboard/stats", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_feedback"], 4);
    assert_eq!(stats["positive_feedback"], 2);
    assert_eq!(stats["neutral_feedback"], 1);
    assert_eq!(stats["negative_feedback"], 1);
    assert_eq!(stats["team_members_count"], 2);

    let recent = stats["recent_feedback"].as_array().unwrap();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0]["sentiment"], "negative");
}

#[tokio::test]
async fn test_dashboard_keeps_five_most_recent() {
    let app = TestApp::new().await;
    let alice = app.user(ALICE_EMAIL).await;
    let token = app.token_for(MANAGER_EMAIL).await;

    let mut created = Vec::new();
    for _ in 0 .. 7 {
        let (_, body) = app
            .post("/feedback", &token, feedback_body(alice.id, "neutral", &[]))
            .await;
        created.push(body["id"].clone());
    }

    let (_, stats) = app.get("/dashboard/stats", &token).await;
    let recent: Vec<Value> = stats["recent_feedback"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].clone())
        .collect();
    let expected: Vec<Value> = created.iter().rev().take(5).cloned().collect();

    assert_eq!(stats["total_feedback"], 7);
    assert_eq!(recent, expected);
}

#[tokio::test]
async fn test_tag_creation() {
    let app = TestApp::new().await;
    let token = app.token_for(MANAGER_EMAIL).await;

    let (status, tag) = app.post("/tags", &token, json!({ "name": "Mentoring" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tag["color"], "#3B82F6");

    let (status, tag) = app
        .post("/tags", &token, json!({ "name": "Ownership", "color": "#123abc" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tag["color"], "#123abc");

    let (status, body) = app.post("/tags", &token, json!({ "name": "Mentoring" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Tag already exists");

    let (status, _) = app.post("/tags", &token, json!({ "name": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_requests_reach_the_right_manager() {
    let app = TestApp::new().await;
    let alice = app.user(ALICE_EMAIL).await;
    let alice_token = app.token_for(ALICE_EMAIL).await;
    let bob_token = app.token_for(BOB_EMAIL).await;

    let (status, created) = app
        .post(
            "/feedback-requests",
            &alice_token,
            json!({ "message": "Could you review my last sprint?" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["employee_id"], alice.id);
    assert_eq!(created["employee"]["email"], ALICE_EMAIL);

    app.post(
        "/feedback-requests",
        &bob_token,
        json!({ "message": "Any thoughts on my demo?" }),
    )
    .await;

    let (status, team) = app
        .get("/feedback-requests", &app.token_for(MANAGER_EMAIL).await)
        .await;
    assert_eq!(status, StatusCode::OK);
    let team = team.as_array().unwrap();
    assert_eq!(team.len(), 2);
    assert_eq!(team[0]["employee"]["email"], BOB_EMAIL);

    let (_, own) = app.get("/feedback-requests", &alice_token).await;
    assert_eq!(own.as_array().unwrap().len(), 1);
    assert_eq!(own[0]["id"], created["id"]);

    let other = app
        .insert_user("lead@company.com", UserRole::Manager, None)
        .await;
    let (_, none) = app
        .get("/feedback-requests", &app.token_for(&other.email).await)
        .await;
    assert!(none.as_array().unwrap().is_empty());

    let (status, _) = app
        .post("/feedback-requests", &alice_token, json!({ "message": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
