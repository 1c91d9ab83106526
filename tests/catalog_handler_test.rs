mod common;

use axum::{body::to_bytes, body::Body, http::{Request, StatusCode}, Router};
use common::{setup_app, ADMIN_TOKEN};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", ADMIN_TOKEN))
        .header("content-type", "application/json");
    let req = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

#[tokio::test]
async fn test_customer_crud_and_search() {
    let app = setup_app(vec![]).router;

    for (name, email) in [("Dana Ortiz", "dana@example.com"), ("Sam Lee", "sam@lee.dev"), ("Ana Diaz", "")] {
        let (status, _) = call(&app, "POST", "/customers", Some(json!({ "name": name, "email": email }))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = call(&app, "GET", "/customers", None).await;
    let names: Vec<&str> = all.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Ana Diaz", "Dana Ortiz", "Sam Lee"]);
    // blank email stored as absent
    assert_eq!(all[0]["email"], Value::Null);

    let (_, found) = call(&app, "GET", "/customers?search=LEE", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (_, page) = call(&app, "GET", "/customers?page=2&limit=2", None).await;
    assert_eq!(page[0]["name"], "Sam Lee");

    let id = all[1]["_id"]["$oid"].as_str().unwrap().to_string();
    let (status, updated) = call(
        &app,
        "PUT",
        &format!("/customers/{}", id),
        Some(json!({ "name": "Dana Ortiz-Reyes", "phone": "555-0101" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Dana Ortiz-Reyes");
    assert_eq!(updated["created_at"], all[1]["created_at"]);

    let (status, _) = call(&app, "DELETE", &format!("/customers/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "GET", &format!("/customers/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_customer_requires_name() {
    let app = setup_app(vec![]).router;
    let (status, err) = call(&app, "POST", "/customers", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Validation");
}

#[tokio::test]
async fn test_material_catalog_by_category() {
    let app = setup_app(vec![]).router;

    let materials = [
        ("Tesla Wall Connector", "ev_chargers", 475.0, "each"),
        ("12/2 Romex", "wiring", 0.79, "ft"),
        ("14/2 Romex", "wiring", 0.59, "ft"),
    ];
    for (name, category, price, unit) in materials {
        let body = json!({ "name": name, "category": category, "unit_price": price, "unit_type": unit });
        let (status, _) = call(&app, "POST", "/materials", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, wiring) = call(&app, "GET", "/materials?category=wiring", None).await;
    let names: Vec<&str> = wiring.as_array().unwrap().iter().map(|m| m["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["12/2 Romex", "14/2 Romex"]);

    let (_, all) = call(&app, "GET", "/materials", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let body = json!({ "name": "Cable", "category": "wiring", "unit_price": -1.0, "unit_type": "ft" });
    let (status, _) = call(&app, "POST", "/materials", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_structured_data() {
    let app = setup_app(vec![]).router;

    let req = Request::builder().uri("/seo/structured-data/business").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(doc["@type"], "LocalBusiness");

    let req = Request::builder()
        .method("POST")
        .uri("/seo/structured-data/breadcrumbs")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "items": [{ "name": "Home", "path": "/" }] }).to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_index_now_without_config_reports_failure() {
    let app = setup_app(vec![]).router;
    let body = json!({ "urls": ["https://www.example.com/"] });
    let (status, resp) = call(&app, "POST", "/seo/index-now", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({ "submitted": 0, "success": false }));
}
