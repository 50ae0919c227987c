//! Account, order and product routes against the fake Shopify.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::{body::Body, http::StatusCode};
use serde_json::json;
use shelfmark_integration_tests::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let request = axum::http::Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let request = axum::http::Request::get("/health")
        .header("x-request-id", "edge-42")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "edge-42");
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_list_customers_verbatim() {
    let app = TestApp::spawn().await;
    app.shopify.add_customer(1, "a@example.com");

    let (status, body) = app.get("/accounts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"customers": [{"id": 1, "email": "a@example.com"}]}));
}

#[tokio::test]
async fn test_upstream_status_is_relayed() {
    let app = TestApp::spawn().await;
    app.shopify.fail_all(503);

    let (status, body) = app.get("/accounts").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"error": "Failed to fetch customers from Shopify"}));
}

#[tokio::test]
async fn test_create_customer_adds_profile_metafields() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/accounts/create",
            &json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "phone": "+441234567890",
                "addresses": [{"address1": "12 St James's Square"}],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Metafields added successfully.");
    let keys: Vec<&str> = body["created"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["name", "phone_no", "email", "address"]);
    assert_eq!(body["created"][0]["value"], "Ada Lovelace");
    assert_eq!(body["created"][3]["type"], "multi_line_text_field");
}

#[tokio::test]
async fn test_create_customer_flattens_validation_error() {
    let app = TestApp::spawn().await;
    app.shopify.add_customer(1, "ada@example.com");

    let (status, body) = app
        .post(
            "/accounts/create",
            &json!({"first_name": "Ada", "email": "ada@example.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"error": "email has already been taken"}));
}

#[tokio::test]
async fn test_create_customer_requires_profile_fields() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/accounts/create",
            &json!({"first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing required customer data."}));
}

#[tokio::test]
async fn test_create_customer_without_any_metafield() {
    let app = TestApp::spawn().await;
    app.shopify.fail_metafield_writes();

    let (status, body) = app
        .post(
            "/accounts/create",
            &json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "addresses": [{"address1": "1 Main St"}],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "No metafields were created."}));
}

// =============================================================================
// Orders
// =============================================================================

fn order(id: u64, email: &str, customer_id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("#{id}"),
        "email": email,
        "created_at": "2024-01-31T09:00:00Z",
        "financial_status": "paid",
        "total_price": "29.99",
        "currency": "USD",
        "payment_gateway_names": ["shopify_payments"],
        "customer": {"id": customer_id, "first_name": "Ada", "last_name": "Lovelace", "email": email},
        "line_items": [{"title": "Coffee Club", "variant_title": "6 Pack", "quantity": 1}],
        "order_status_url": format!("https://shop.example.com/orders/{id}"),
    })
}

#[tokio::test]
async fn test_orders_by_email_are_summarized() {
    let app = TestApp::spawn().await;
    app.shopify.add_order(order(1001, "ada@example.com", 7));
    app.shopify.add_order(order(1002, "bob@example.com", 8));

    let (status, body) = app.get("/order/ada@example.com").await;

    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["orderId"], 1001);
    assert_eq!(orders[0]["orderNumber"], "#1001");
    assert_eq!(orders[0]["date"], "2024-01-31");
    assert_eq!(orders[0]["nextMonthDate"], "2024-02-29");
    assert!(orders[0]["daysLeft"].is_i64());
    assert_eq!(orders[0]["customerName"], "Ada Lovelace");
    assert_eq!(orders[0]["paymentGateway"], "shopify_payments");
    assert_eq!(orders[0]["variantTitle"], "6 Pack");
}

#[tokio::test]
async fn test_all_orders_filtered_by_customer() {
    let app = TestApp::spawn().await;
    app.shopify.add_order(order(1001, "ada@example.com", 7));
    app.shopify.add_order(order(1002, "bob@example.com", 8));

    let (status, body) = app.get("/order/all?customer_id=8").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);
    assert_eq!(body["orders"][0]["id"], 1002);

    let (_, body) = app.get("/order/all").await;
    assert_eq!(body["orders"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Products
// =============================================================================

fn rich_list(items: &[&str]) -> String {
    json!({
        "type": "root",
        "children": [{
            "type": "list",
            "children": items
                .iter()
                .map(|text| json!({"type": "list-item", "children": [{"type": "text", "value": text}]}))
                .collect::<Vec<_>>()
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_product_variant_details() {
    let app = TestApp::spawn().await;
    app.shopify.add_product(
        json!({
            "id": 55,
            "title": "Coffee Club",
            "variants": [
                {"title": "3 Pack", "price": "9.99"},
                {"title": "6 Pack", "price": "17.99"}
            ]
        }),
        vec![
            json!({"id": 1, "namespace": "custom", "key": "quantity_6_details", "value": rich_list(&["Six bags", "Free shipping"])}),
            json!({"id": 2, "namespace": "custom", "key": "quantity_3_details", "value": "not rich text"}),
        ],
    );

    let (status, body) = app.get("/products/metafields/55").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "variantTitle": "3 Pack",
                "variantPrice": "9.99",
                "metafieldKey": "quantity_3_details",
                "metafieldItems": []
            },
            {
                "variantTitle": "6 Pack",
                "variantPrice": "17.99",
                "metafieldKey": "quantity_6_details",
                "metafieldItems": ["Six bags", "Free shipping"]
            }
        ])
    );
}

#[tokio::test]
async fn test_unknown_product() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/products/metafields/404").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Failed to fetch product details"}));
}

#[tokio::test]
async fn test_list_products_verbatim() {
    let app = TestApp::spawn().await;
    app.shopify.add_product(json!({"id": 55, "title": "Coffee Club", "variants": []}), vec![]);

    let (status, body) = app.get("/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"][0]["title"], "Coffee Club");
}
