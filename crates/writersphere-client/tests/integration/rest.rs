//! Table queries against a mock REST API.

use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, headers, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};
use writersphere_client::rest::ilike_any;
use writersphere_core::UserId;

use crate::common::{ANON_KEY, TestHarness};

#[derive(Debug, Deserialize, PartialEq)]
struct Row {
    id: String,
    name: String,
}

#[tokio::test]
async fn test_fetch_sends_filters_order_and_limit() {
    let user = UserId::new();
    let harness = TestHarness::signed_in(user).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/articles"))
        .and(header("apikey", ANON_KEY))
        .and(header("authorization", "Bearer user-token"))
        .and(query_param("select", "id,title"))
        .and(query_param("writer_id", format!("eq.{user}")))
        .and(query_param("status", "neq.deleted"))
        .and(query_param("id", r#"in.("a","b")"#))
        .and(query_param(
            "or",
            r#"(title.ilike."%dune%",body_md.ilike."%dune%")"#,
        ))
        .and(query_param("order", "updated_at.desc"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "a", "name": "first" }
        ])))
        .expect(1)
        .mount(&harness.server)
        .await;

    let rows: Vec<Row> = harness
        .client
        .table("articles")
        .select("id,title")
        .eq("writer_id", user)
        .neq("status", "deleted")
        .in_("id", ["a", "b"])
        .or(&ilike_any(&["title", "body_md"], "dune"))
        .order("updated_at", false)
        .limit(50)
        .fetch()
        .await
        .unwrap();

    assert_eq!(rows, vec![Row { id: "a".into(), name: "first".into() }]);
}

#[tokio::test]
async fn test_anonymous_requests_use_anon_key_as_bearer() {
    let harness = TestHarness::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/articles"))
        .and(header("authorization", format!("Bearer {ANON_KEY}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&harness.server)
        .await;

    let rows: Vec<Row> = harness.client.table("articles").fetch().await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_single_asks_for_object() {
    let harness = TestHarness::signed_in(UserId::new()).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/categories"))
        .and(header("accept", "application/vnd.pgrst.object+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "c1", "name": "Fiction" })))
        .mount(&harness.server)
        .await;

    let row: Row = harness
        .client
        .table("categories")
        .eq("id", "c1")
        .single()
        .await
        .unwrap();
    assert_eq!(row.name, "Fiction");
}

#[tokio::test]
async fn test_single_without_row_surfaces_backend_message() {
    let harness = TestHarness::signed_in(UserId::new()).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/categories"))
        .respond_with(ResponseTemplate::new(406).set_body_json(json!({
            "code": "PGRST116",
            "details": "The result contains 0 rows",
            "hint": null,
            "message": "JSON object requested, multiple (or no) rows returned"
        })))
        .mount(&harness.server)
        .await;

    let err = harness
        .client
        .table("categories")
        .single::<Row>()
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "JSON object requested, multiple (or no) rows returned"
    );
}

#[tokio::test]
async fn test_maybe_single() {
    let harness = TestHarness::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/articles"))
        .and(query_param("status", "eq.published"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&harness.server)
        .await;

    let row: Option<Row> = harness
        .client
        .table("articles")
        .eq("status", "published")
        .maybe_single()
        .await
        .unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn test_count_reads_content_range() {
    let harness = TestHarness::signed_in(UserId::new()).await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/categories"))
        .and(header("prefer", "count=exact"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-range", "0-2/3"))
        .mount(&harness.server)
        .await;

    let count = harness.client.table("categories").count().await.unwrap();
    assert_eq!(count, Some(3));
}

#[tokio::test]
async fn test_insert_returning() {
    let user = UserId::new();
    let harness = TestHarness::signed_in(user).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/categories"))
        .and(query_param("select", "id,name"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({ "writer_id": user.to_string(), "name": "Poetry" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": "c9", "name": "Poetry" }])))
        .mount(&harness.server)
        .await;

    let rows: Vec<Row> = harness
        .client
        .table("categories")
        .select("id,name")
        .insert_returning(&json!({ "writer_id": user, "name": "Poetry" }))
        .await
        .unwrap();
    assert_eq!(rows[0].id, "c9");
}

#[tokio::test]
async fn test_update_is_scoped_by_filters() {
    let user = UserId::new();
    let harness = TestHarness::signed_in(user).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/categories"))
        .and(query_param("id", "eq.c1"))
        .and(query_param("writer_id", format!("eq.{user}")))
        .and(body_json(json!({ "status": "inactive" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&harness.server)
        .await;

    harness
        .client
        .table("categories")
        .eq("id", "c1")
        .eq("writer_id", user)
        .update(&json!({ "status": "inactive" }))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upsert_merges_on_conflict() {
    let harness = TestHarness::signed_in(UserId::new()).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/tags"))
        .and(query_param("on_conflict", "writer_id,name"))
        .and(headers(
            "prefer",
            vec!["resolution=merge-duplicates", "return=representation"],
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "id": "t1", "name": "rust" },
            { "id": "t2", "name": "async" }
        ])))
        .mount(&harness.server)
        .await;

    let rows: Vec<Row> = harness
        .client
        .table("tags")
        .select("id,name")
        .upsert_returning(&json!([{ "name": "rust" }, { "name": "async" }]), "writer_id,name")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_delete_error_is_verbatim() {
    let harness = TestHarness::signed_in(UserId::new()).await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/subcategories"))
        .and(query_param("id", "eq.s1"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23503",
            "message": "update or delete on table \"subcategories\" violates foreign key constraint"
        })))
        .mount(&harness.server)
        .await;

    let err = harness
        .client
        .table("subcategories")
        .eq("id", "s1")
        .delete()
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "update or delete on table \"subcategories\" violates foreign key constraint"
    );
}
