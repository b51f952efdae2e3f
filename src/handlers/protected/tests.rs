// Router-level tests: real routes and handlers over the in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::testing::{bearer, TestContext};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn request(method: Method, uri: &str, auth: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = auth {
        builder = builder.header(header::AUTHORIZATION, bearer(email));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(ctx: &TestContext, req: Request<Body>) -> (StatusCode, Value) {
    let response = ctx.app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn stool_entries_are_listed_newest_first() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");
    let baby = ctx.store.seed_baby(user.user_id, "Ada");
    ctx.store.seed_stool(baby.baby_id, timestamp("2024-05-01 08:00:00"), "yellow");
    ctx.store.seed_stool(baby.baby_id, timestamp("2024-05-02 07:30:00"), "green");

    let uri = format!("/v1/baby/{}/stool", baby.baby_id);
    let (status, body) = send(&ctx, request(Method::GET, &uri, Some("parent@example.com"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["color"], "green");
    assert_eq!(rows[1]["color"], "yellow");
}

#[tokio::test]
async fn bulk_delete_reports_only_existing_reminders() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");
    let baby = ctx.store.seed_baby(user.user_id, "Ada");
    ctx.store.seed_reminder_with_id(10, baby.baby_id, "Vaccine", date("2024-06-01"));

    let uri = format!("/v1/baby/{}/reminders", baby.baby_id);
    let body = json!({ "reminderIds": ["10", "11"] });
    let (status, body) = send(&ctx, request(Method::DELETE, &uri, Some("parent@example.com"), Some(body))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedIds"], json!([10]));
    assert_eq!(body["data"]["deletedCount"], 1);
    assert_eq!(body["data"]["message"], "Reminder deleted successfully");
    assert!(ctx.store.reminder_ids(baby.baby_id).is_empty());

    // Nothing left to delete
    let body = json!({ "reminderIds": [10] });
    let (status, _) = send(&ctx, request(Method::DELETE, &uri, Some("parent@example.com"), Some(body))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_delete_uses_plural_message_and_dedups_ids() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");
    let baby = ctx.store.seed_baby(user.user_id, "Ada");
    let a = ctx.store.seed_reminder(baby.baby_id, "Bath", date("2024-06-01"));
    let b = ctx.store.seed_reminder(baby.baby_id, "Nap", date("2024-06-02"));

    let uri = format!("/v1/baby/{}/reminders", baby.baby_id);
    let body = json!({ "reminderIds": [b.reminder_id, a.reminder_id.to_string(), b.reminder_id] });
    let (status, body) = send(&ctx, request(Method::DELETE, &uri, Some("parent@example.com"), Some(body))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedIds"], json!([a.reminder_id, b.reminder_id]));
    assert_eq!(body["data"]["message"], "Reminders deleted successfully");
}

#[tokio::test]
async fn bulk_delete_rejects_bad_ids() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");
    let baby = ctx.store.seed_baby(user.user_id, "Ada");
    let uri = format!("/v1/baby/{}/reminders", baby.baby_id);

    let (status, body) = send(
        &ctx,
        request(Method::DELETE, &uri, Some("parent@example.com"), Some(json!({ "reminderIds": [] }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Missing required fields: reminderIds");

    let (status, _) = send(
        &ctx,
        request(Method::DELETE, &uri, Some("parent@example.com"), Some(json!({ "reminderIds": ["x1"] }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forum_post_without_category_stores_null() {
    let ctx = TestContext::new();
    ctx.store.seed_user("parent@example.com", "parent");

    let body = json!({ "title": "Sleep", "content": "Any tips?" });
    let (status, body) = send(
        &ctx,
        request(Method::POST, "/v1/forum/posts/add", Some("parent@example.com"), Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["category"], Value::Null);

    let uri = format!("/v1/forum/posts/{}", body["data"]["post_id"]);
    let (status, body) = send(&ctx, request(Method::GET, &uri, Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Sleep");
    assert_eq!(body["data"]["replies"], json!([]));
}

#[tokio::test]
async fn only_the_author_can_delete_a_post() {
    let ctx = TestContext::new();
    let author = ctx.store.seed_user("author@example.com", "parent");
    ctx.store.seed_user("other@example.com", "parent");
    let post = ctx.store.seed_post(author.user_id, "Teething");
    let uri = format!("/v1/forum/posts/{}", post.post_id);

    let (status, body) = send(&ctx, request(Method::DELETE, &uri, Some("other@example.com"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "error");
    assert!(ctx.store.post(post.post_id).is_some());

    let (status, _) = send(&ctx, request(Method::DELETE, &uri, Some("author@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctx.store.post(post.post_id).is_none());
}

#[tokio::test]
async fn reply_to_missing_post_is_not_found() {
    let ctx = TestContext::new();
    ctx.store.seed_user("parent@example.com", "parent");

    let body = json!({ "content": "hello" });
    let (status, body) = send(
        &ctx,
        request(Method::POST, "/v1/forum/posts/999/replies", Some("parent@example.com"), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Post not found");
}

#[tokio::test]
async fn malformed_ids_are_rejected_before_authentication() {
    let ctx = TestContext::new();

    for uri in ["/v1/baby/abc/stool", "/v1/baby/0", "/v1/baby/-3/growth", "/v1/forum/posts/1.5"] {
        let (status, body) = send(&ctx, request(Method::GET, uri, None, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"]["code"], 400);
    }
}

#[tokio::test]
async fn missing_body_fields_are_listed() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");
    let baby = ctx.store.seed_baby(user.user_id, "Ada");

    let uri = format!("/v1/baby/{}/growth", baby.baby_id);
    let body = json!({ "date": "2024-05-01" });
    let (status, body) = send(&ctx, request(Method::POST, &uri, Some("parent@example.com"), Some(body))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Missing required fields: height, weight");
}

#[tokio::test]
async fn non_owner_gets_forbidden_and_nothing_changes() {
    let ctx = TestContext::new();
    let owner = ctx.store.seed_user("owner@example.com", "parent");
    ctx.store.seed_user("stranger@example.com", "parent");
    let baby = ctx.store.seed_baby(owner.user_id, "Ada");
    let uri = format!("/v1/baby/{}", baby.baby_id);

    let (status, body) = send(&ctx, request(Method::DELETE, &uri, Some("stranger@example.com"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "You do not have access to this baby");
    assert!(ctx.store.baby(baby.baby_id).is_some());

    let update = json!({
        "first_name": "Eve",
        "last_name": "Tester",
        "gender": "female",
        "birthdate": "2024-01-01"
    });
    let (status, _) = send(&ctx, request(Method::PUT, &uri, Some("stranger@example.com"), Some(update))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(ctx.store.baby(baby.baby_id).unwrap().first_name, "Ada");
}

#[tokio::test]
async fn deleting_twice_yields_not_found() {
    let ctx = TestContext::new();
    let owner = ctx.store.seed_user("owner@example.com", "parent");
    let baby = ctx.store.seed_baby(owner.user_id, "Ada");
    let uri = format!("/v1/baby/{}", baby.baby_id);

    let (status, body) = send(&ctx, request(Method::DELETE, &uri, Some("owner@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Baby deleted successfully");

    let (status, body) = send(&ctx, request(Method::DELETE, &uri, Some("owner@example.com"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Baby not found");
}

#[tokio::test]
async fn feeding_schedule_round_trips_with_normalized_time() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");
    let baby = ctx.store.seed_baby(user.user_id, "Ada");
    let uri = format!("/v1/baby/{}/feeding-schedules", baby.baby_id);

    let body = json!({
        "date": "2024-05-01",
        "time": "08:30",
        "meal": "breakfast",
        "type": "bottle",
        "amount": "120ml"
    });
    let (status, created) = send(&ctx, request(Method::POST, &uri, Some("parent@example.com"), Some(body))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["time"], "08:30:00");

    let (status, listed) = send(&ctx, request(Method::GET, &uri, Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let row = &listed["data"][0];
    assert_eq!(row["date"], "2024-05-01");
    assert_eq!(row["time"], "08:30:00");
    assert_eq!(row["meal"], "breakfast");
    assert_eq!(row["type"], "bottle");
    assert_eq!(row["amount"], "120ml");
    assert_eq!(row["issues"], Value::Null);
}

#[tokio::test]
async fn growth_range_filter_is_inclusive() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");
    let baby = ctx.store.seed_baby(user.user_id, "Ada");
    for d in ["2024-01-01", "2024-02-01", "2024-03-01"] {
        ctx.store.seed_growth(baby.baby_id, date(d), 50.0, 4.0, None);
    }

    let uri = format!("/v1/baby/{}/growth?startDate=2024-02-01&endDate=2024-03-01", baby.baby_id);
    let (status, body) = send(&ctx, request(Method::GET, &uri, Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-02-01"]);

    let uri = format!("/v1/baby/{}/growth?startDate=2024-04-01&endDate=2024-03-01", baby.baby_id);
    let (status, _) = send(&ctx, request(Method::GET, &uri, Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn identity_failures() {
    let ctx = TestContext::new();

    let (status, body) = send(&ctx, request(Method::GET, "/v1/baby", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");

    let req = Request::builder()
        .uri("/v1/baby")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&ctx, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid token, but no matching users row
    let (status, body) = send(&ctx, request(Method::GET, "/v1/baby", Some("ghost@example.com"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "User not found");
}

#[tokio::test]
async fn bare_routes_use_bare_shapes() {
    let ctx = TestContext::new();
    ctx.store.seed_user("parent@example.com", "parent");
    ctx.store.seed_coupon("SAVE10", None);
    ctx.store.seed_coupon("OLD", Some(date("2000-01-01")));

    let (status, body) = send(&ctx, request(Method::GET, "/v1/coupons", Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let coupons = body.as_array().unwrap();
    assert_eq!(coupons.len(), 1);
    assert_eq!(coupons[0]["code"], "SAVE10");

    let (status, body) = send(&ctx, request(Method::GET, "/v1/quiz?limit=500", Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("status").is_none());
    assert!(body["error"]["message"].as_str().unwrap().starts_with("Invalid limit"));

    let (status, body) = send(&ctx, request(Method::GET, "/v1/tips", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"]["message"].is_string());
    assert!(body["error"].get("code").is_none());
}

#[tokio::test]
async fn tips_filter_by_category_and_search() {
    let ctx = TestContext::new();
    ctx.store.seed_user("parent@example.com", "parent");
    ctx.store.seed_tip("Swaddling", "Wrap snugly", "sleep");
    ctx.store.seed_tip("Burping", "Pat gently after feeds", "feeding");
    ctx.store.seed_tip("Night feeds", "Keep lights low", "feeding");

    let uri = "/v1/tips?category=feeding&q=LIGHTS";
    let (status, body) = send(&ctx, request(Method::GET, uri, Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let tips = body.as_array().unwrap();
    assert_eq!(tips.len(), 1);
    assert_eq!(tips[0]["title"], "Night feeds");
}

#[tokio::test]
async fn favorite_toggle_flips_state() {
    let ctx = TestContext::new();
    ctx.store.seed_user("parent@example.com", "parent");
    let provider = ctx.store.seed_provider("Little Steps", "Austin");
    let uri = format!("/v1/providers/{}/favorite", provider.provider_id);

    let (status, body) = send(&ctx, request(Method::POST, &uri, Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "providerId": provider.provider_id, "favorited": true }));

    let (_, favorites) = send(
        &ctx,
        request(Method::GET, "/v1/providers/favorites", Some("parent@example.com"), None),
    )
    .await;
    assert_eq!(favorites.as_array().unwrap().len(), 1);

    let (_, body) = send(&ctx, request(Method::POST, &uri, Some("parent@example.com"), None)).await;
    assert_eq!(body["favorited"], false);

    let (status, body) = send(
        &ctx,
        request(Method::POST, "/v1/providers/9999/favorite", Some("parent@example.com"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": { "message": "Provider not found" } }));
}

#[tokio::test]
async fn sharing_requires_a_doctor_and_links_the_baby() {
    let ctx = TestContext::new();
    let parent = ctx.store.seed_user("parent@example.com", "parent");
    let other_parent = ctx.store.seed_user("friend@example.com", "parent");
    let doctor = ctx.store.seed_user("doc@example.com", "doctor");
    let baby = ctx.store.seed_baby(parent.user_id, "Ada");
    let uri = format!("/v1/baby/{}/documents", baby.baby_id);

    let body = json!({
        "doctor_id": other_parent.user_id,
        "document_name": "Vaccines",
        "document_url": "https://files.example.com/v.pdf"
    });
    let (status, body) = send(&ctx, request(Method::POST, &uri, Some("parent@example.com"), Some(body))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Doctor not found");

    let body = json!({
        "doctor_id": doctor.user_id.to_string(),
        "document_name": "Vaccines",
        "document_url": "https://files.example.com/v.pdf"
    });
    let (status, _) = send(&ctx, request(Method::POST, &uri, Some("parent@example.com"), Some(body))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(ctx.store.is_doctor_linked(doctor.user_id, baby.baby_id));

    let (status, body) = send(&ctx, request(Method::GET, "/v1/doctor/documents", Some("doc@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["document_name"], "Vaccines");

    let (status, _) = send(
        &ctx,
        request(Method::GET, "/v1/doctor/documents", Some("parent@example.com"), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn journal_entry_defaults_to_today_and_keeps_date_on_update() {
    let ctx = TestContext::new();
    ctx.store.seed_user("parent@example.com", "parent");

    let body = json!({ "content": "First smile" });
    let (status, created) = send(&ctx, request(Method::POST, "/v1/journal", Some("parent@example.com"), Some(body))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "success");
    let today = Utc::now().date_naive().to_string();
    assert_eq!(created["data"]["date"], today.as_str());

    let uri = format!("/v1/journal/{}", created["data"]["entry_id"]);
    let body = json!({ "content": "First real smile", "title": "Smile" });
    let (status, updated) = send(&ctx, request(Method::PUT, &uri, Some("parent@example.com"), Some(body))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["content"], "First real smile");
    assert_eq!(updated["data"]["date"], today.as_str());
}

#[tokio::test]
async fn csv_export_marks_empty_sections() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");
    ctx.store.seed_baby(user.user_id, "Ada");

    let req = request(
        Method::POST,
        "/v1/export",
        Some("parent@example.com"),
        Some(json!({ "format": "csv", "growth": true })),
    );
    let response = ctx.app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"baby-records_growth_all-time.csv\""
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    let header_at = lines.iter().position(|l| *l == "Growth Records").unwrap();
    assert_eq!(lines[header_at + 1], "No growth records found");
    assert_eq!(ctx.store.export_count(user.user_id), 1);

    let (status, body) = send(&ctx, request(Method::GET, "/v1/export/history", Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["format"], "csv");
}

#[tokio::test]
async fn export_without_sections_is_rejected() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");

    let body = json!({ "format": "pdf" });
    let (status, body) = send(&ctx, request(Method::POST, "/v1/export", Some("parent@example.com"), Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Select at least one section to export");
    assert_eq!(ctx.store.export_count(user.user_id), 0);
}

#[tokio::test]
async fn health_reports_database_state() {
    let ctx = TestContext::new();

    let (status, body) = send(&ctx, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    ctx.store.fail_queries(true);
    let (status, body) = send(&ctx, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn database_failures_become_generic_500() {
    let ctx = TestContext::new();
    ctx.store.seed_user("parent@example.com", "parent");
    ctx.store.fail_queries(true);

    let (status, body) = send(&ctx, request(Method::GET, "/v1/baby", Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Internal server error");
}

#[tokio::test]
async fn deleting_a_co_parent_keeps_the_baby_and_drops_their_shared_documents() {
    let ctx = TestContext::new();
    let parent = ctx.store.seed_user("parent@example.com", "parent");
    let co_parent = ctx.store.seed_user("partner@example.com", "parent");
    let doctor = ctx.store.seed_user("doc@example.com", "doctor");
    let baby = ctx.store.seed_baby(parent.user_id, "Ada");
    ctx.store.link_parent(co_parent.user_id, baby.baby_id);

    let uri = format!("/v1/baby/{}/documents", baby.baby_id);
    let body = json!({
        "doctor_id": doctor.user_id,
        "document_name": "Vaccines",
        "document_url": "https://files.example.com/v.pdf"
    });
    let (status, _) = send(&ctx, request(Method::POST, &uri, Some("parent@example.com"), Some(body))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ctx.store.document_count(baby.baby_id), 1);

    let (status, body) = send(&ctx, request(Method::DELETE, "/v1/users/me", Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "User deleted successfully");
    assert!(ctx.store.baby(baby.baby_id).is_some());
    assert_eq!(ctx.store.document_count(baby.baby_id), 0);

    let uri = format!("/v1/baby/{}", baby.baby_id);
    let (status, _) = send(&ctx, request(Method::GET, &uri, Some("partner@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn account_deletion_clears_provider_favorites() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");
    let provider = ctx.store.seed_provider("Little Steps", "Austin");
    let uri = format!("/v1/providers/{}/favorite", provider.provider_id);

    let (_, body) = send(&ctx, request(Method::POST, &uri, Some("parent@example.com"), None)).await;
    assert_eq!(body["favorited"], true);
    assert_eq!(ctx.store.favorite_count(user.user_id), 1);

    let (status, _) = send(&ctx, request(Method::DELETE, "/v1/users/me", Some("parent@example.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.store.favorite_count(user.user_id), 0);
}

#[tokio::test]
async fn feeding_amount_accepts_a_number() {
    let ctx = TestContext::new();
    let user = ctx.store.seed_user("parent@example.com", "parent");
    let baby = ctx.store.seed_baby(user.user_id, "Ada");
    let uri = format!("/v1/baby/{}/feeding-schedules", baby.baby_id);

    let body = json!({
        "date": "2024-05-01",
        "time": "08:30",
        "meal": "breakfast",
        "type": "bottle",
        "amount": 120
    });
    let (status, created) = send(&ctx, request(Method::POST, &uri, Some("parent@example.com"), Some(body))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["amount"], "120");
}
