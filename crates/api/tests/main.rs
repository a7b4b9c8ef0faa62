use serde_json::{json, Value};
use sqlx::SqlitePool;

use helpers::spawn_app;

mod helpers;

#[sqlx::test(migrations = "../../migrations")]
async fn health_reports_liveness(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn published_listing_paginates_with_exact_meta(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let body = app
        .get_json("/api/articles?status=published&page=1&perPage=2")
        .await;

    assert_eq!(body["success"], true);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2, "exactly one page of two articles");
    assert!(items.iter().all(|a| a["status"] == "published"));

    assert_eq!(body["meta"]["total"], 20);
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["perPage"], 2);
    assert_eq!(body["meta"]["totalPages"], 10);
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn combined_filters_apply_and_semantics(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let body = app
        .get_json("/api/articles?status=published&featured=true&network=net-global")
        .await;

    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "s01");

    let body = app
        .get_json("/api/articles?categories=cat-tech,cat-business&status=published")
        .await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["s04", "s03", "s02", "s01"]);
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn listing_expands_categories(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let body = app.get_json("/api/articles/s01").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["categories"][0]["id"], "cat-tech");
    assert_eq!(body["data"]["categories"][0]["name"], "Technology");
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn missing_article_is_a_404_envelope(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .get(app.url("/api/articles/unknown"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Article not found");
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn created_article_round_trips_its_category_set(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .post(app.url("/api/articles"))
        .json(&json!({
            "title": "Editorial calendar",
            "content": "Planning the next quarter",
            "excerpt": "Quarter planning",
            "author": "Desk",
            "network": "net-global",
            "status": "published",
            "featured": true,
            "categoryIds": ["cat-tech", "cat-business"],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    let id = body["data"]["id"].as_str().unwrap();
    // publishedAt is only ever set by an explicit update
    assert_eq!(body["data"]["publishedAt"], Value::Null);

    let fetched = app.get_json(&format!("/api/articles/{id}")).await;
    let mut category_ids: Vec<&str> = fetched["data"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    category_ids.sort_unstable();
    assert_eq!(category_ids, vec!["cat-business", "cat-tech"]);
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn create_validation_failures_are_itemized(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .post(app.url("/api/articles"))
        .json(&json!({
            "title": "",
            "content": "Body",
            "excerpt": "Excerpt",
            "author": "",
            "network": "net-global",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0], "author: Author is required");
    assert_eq!(errors[1], "title: Title is required");
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn update_sets_published_at_and_replaces_categories(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .patch(app.url("/api/articles/s21"))
        .json(&json!({
            "status": "published",
            "publishedAt": "2024-03-01T09:30:00Z",
            "categoryIds": ["cat-science"],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["status"], "published");
    assert!(body["data"]["publishedAt"]
        .as_str()
        .unwrap()
        .starts_with("2024-03-01T09:30:00"));
    assert_eq!(body["data"]["categories"][0]["id"], "cat-science");
    // untouched fields survive a partial update
    assert_eq!(body["data"]["title"], "Draft story 21");
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn deleted_article_is_gone(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .delete(app.url("/api/articles/s05"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Article deleted");

    let response = app
        .client
        .get(app.url("/api/articles/s05"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn bulk_status_change_archives_every_listed_article(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .patch(app.url("/api/articles/bulk-status"))
        .json(&json!({"ids": ["s01", "s02"], "status": "archived"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    for id in ["s01", "s02"] {
        let body = app.get_json(&format!("/api/articles/{id}")).await;
        assert_eq!(body["data"]["status"], "archived");
    }
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn referenced_category_cannot_be_deleted(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .delete(app.url("/api/categories/cat-tech"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);

    // still there
    let body = app.get_json("/api/categories/cat-tech").await;
    assert_eq!(body["data"]["slug"], "technology");

    // an unreferenced category deletes fine
    let response = app
        .client
        .delete(app.url("/api/categories/cat-health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn duplicate_category_slug_conflicts(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .post(app.url("/api/categories"))
        .json(&json!({
            "name": "Tech again",
            "slug": "technology",
            "description": "Twice",
            "color": "#ffffff",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "A record with this value already exists");
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn import_resolves_references_and_creates_a_draft(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .post(app.url("/api/articles/import"))
        .json(&json!({
            "articles": [{
                "title": "Imported Quarterly Digest",
                "content": "C",
                "excerpt": "E",
                "author": "A",
                "category": "technology",
                "network": "Global Network",
            }]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["success"], 1);
    assert_eq!(body["data"]["errors"].as_array().unwrap().len(), 0);

    let listing = app
        .get_json("/api/articles?status=draft&search=Imported Quarterly")
        .await;
    let items = listing["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["network"], "net-global");
    assert_eq!(items[0]["author"], "A");
    assert_eq!(items[0]["categories"][0]["id"], "cat-tech");
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn import_reports_partial_success(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .post(app.url("/api/articles/import"))
        .json(&json!({
            "articles": [
                {"title": "Fine", "content": "C", "excerpt": "E"},
                {},
            ]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["success"], 1);
    let errors = body["data"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().starts_with("article 2:"));
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn notification_send_records_a_sent_log_entry(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .post(app.url("/api/notifications"))
        .json(&json!({
            "articleId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "recipients": ["desk@example.com", "chief@example.com"],
            "subject": "Fresh digest",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["status"], "sent");
    assert_eq!(
        body["data"]["recipients"],
        json!(["desk@example.com", "chief@example.com"])
    );

    let listing = app.get_json("/api/notifications").await;
    let subjects: Vec<&str> = listing["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["subject"].as_str().unwrap())
        .collect();
    assert!(subjects.contains(&"Fresh digest"));
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn notification_recipients_must_be_emails(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .post(app.url("/api/notifications"))
        .json(&json!({
            "articleId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "recipients": ["not-an-email"],
            "subject": "Broken",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(
        errors[0],
        "recipients: Recipients must be valid email addresses"
    );
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn dashboard_stats_ships_full_sets_with_capped_notifications(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let body = app.get_json("/api/dashboard/stats").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["articles"].as_array().unwrap().len(), 23);
    assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 4);
    assert_eq!(body["data"]["networks"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["notifications"].as_array().unwrap().len(), 10);
}

#[sqlx::test(fixtures("seed"), migrations = "../../migrations")]
async fn dashboard_summary_counts_group_correctly(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let body = app.get_json("/api/dashboard/summary").await;
    let summary = &body["data"];

    assert_eq!(summary["totalArticles"], 23);
    assert_eq!(summary["byStatus"]["published"], 20);
    assert_eq!(summary["byStatus"]["draft"], 3);
    assert_eq!(summary["byStatus"]["archived"], 0);

    assert_eq!(summary["byNetwork"]["Global Network"], 8);
    assert_eq!(summary["byNetwork"]["Enterprise Network"], 8);
    assert_eq!(summary["byNetwork"]["Community Network"], 7);

    assert_eq!(summary["byCategory"]["Technology"], 3);
    assert_eq!(summary["byCategory"]["Business"], 1);
    assert_eq!(summary["byCategory"]["Science"], 0);
    assert_eq!(summary["byCategory"]["Health"], 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_api_route_is_an_envelope_404(pool: SqlitePool) {
    let app = spawn_app(pool).await;

    let response = app
        .client
        .get(app.url("/api/nope"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");
}
