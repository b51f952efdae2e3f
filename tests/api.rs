mod common;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn health_is_public() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = reqwest::get(server.url("/health")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_then_read_profile() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let body = json!({
        "first_name": "Grace",
        "last_name": "Hopper",
        "email": "Grace@Example.com",
        "role": "parent"
    });
    let res = client.post(server.url("/v1/users")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client.post(server.url("/v1/users")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = server.get("/v1/users/me", "grace@example.com").send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await?;
    assert_eq!(me["data"]["first_name"], "Grace");
    assert_eq!(me["data"]["role"], "parent");
    Ok(())
}

#[tokio::test]
async fn stool_listing_over_http() -> Result<()> {
    let server = TestServer::spawn().await?;
    let user = server.store.seed_user("parent@example.com", "parent");
    let baby = server.store.seed_baby(user.user_id, "Ada");
    let early = NaiveDateTime::parse_from_str("2024-05-01 06:00:00", "%Y-%m-%d %H:%M:%S")?;
    let late = NaiveDateTime::parse_from_str("2024-05-01 18:00:00", "%Y-%m-%d %H:%M:%S")?;
    server.store.seed_stool(baby.baby_id, early, "yellow");
    server.store.seed_stool(baby.baby_id, late, "brown");

    let res = server
        .get(&format!("/v1/baby/{}/stool", baby.baby_id), "parent@example.com")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let rows = body["data"].as_array().context("data should be an array")?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["timestamp"], "2024-05-01T18:00:00");
    assert_eq!(rows[1]["timestamp"], "2024-05-01T06:00:00");
    Ok(())
}

#[tokio::test]
async fn reminder_bulk_delete_over_http() -> Result<()> {
    let server = TestServer::spawn().await?;
    let user = server.store.seed_user("parent@example.com", "parent");
    let baby = server.store.seed_baby(user.user_id, "Ada");
    server.store.seed_reminder_with_id(10, baby.baby_id, "Checkup", date("2024-07-01"));

    let res = server
        .delete(&format!("/v1/baby/{}/reminders", baby.baby_id), "parent@example.com")
        .json(&json!({ "reminderIds": ["10", "11"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["deletedIds"], json!([10]));
    assert_eq!(body["data"]["message"], "Reminder deleted successfully");
    Ok(())
}

#[tokio::test]
async fn forum_thread_over_http() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.store.seed_user("author@example.com", "parent");
    server.store.seed_user("reader@example.com", "parent");

    let res = server
        .post("/v1/forum/posts/add", "author@example.com")
        .json(&json!({ "title": "Colic", "content": "What helped you?" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let post: Value = res.json().await?;
    assert_eq!(post["data"]["category"], Value::Null);
    let post_id = post["data"]["post_id"].as_i64().context("post_id")?;

    let res = server
        .post(&format!("/v1/forum/posts/{}/replies", post_id), "reader@example.com")
        .json(&json!({ "content": "Gripe water" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = server.get("/v1/forum/posts", "reader@example.com").send().await?;
    let listing: Value = res.json().await?;
    assert_eq!(listing["status"], "success");
    assert_eq!(listing["data"][0]["reply_count"], 1);
    assert_eq!(listing["data"][0]["author_name"], "author Tester");
    Ok(())
}

#[tokio::test]
async fn csv_export_over_http() -> Result<()> {
    let server = TestServer::spawn().await?;
    let user = server.store.seed_user("parent@example.com", "parent");
    let baby = server.store.seed_baby(user.user_id, "Ada");
    server.store.seed_milestone(baby.baby_id, date("2024-03-10"), "Rolled over, finally");

    let res = server
        .post("/v1/export", "parent@example.com")
        .json(&json!({ "format": "csv", "growth": true, "milestones": true, "startDate": "2024-01-01" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let disposition = res
        .headers()
        .get("content-disposition")
        .context("missing content-disposition")?
        .to_str()?
        .to_string();
    assert_eq!(
        disposition,
        "attachment; filename=\"baby-records_growth-milestones_from_2024-01-01.csv\""
    );

    let csv = res.text().await?;
    assert!(csv.contains("Growth Records\nNo growth records found\n"));
    assert!(csv.contains("2024-03-10,\"Rolled over, finally\","));
    assert_eq!(server.store.export_count(user.user_id), 1);
    Ok(())
}
