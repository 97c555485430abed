//! Integration tests for the session cart and order placement.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use dendy_food_integration_tests::{SinkMode, TEST_CHAT_ID, TestContext};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn discounted_burger(ctx: &TestContext) -> String {
    let created = ctx
        .create_product(&json!({
            "nameUz": "Burger",
            "nameRu": "Бургер",
            "price": 25000,
            "category": "Burger",
            "discount": 10
        }))
        .await;
    created["id"].as_str().unwrap().to_string()
}

async fn cart(ctx: &TestContext) -> Value {
    ctx.client
        .get(ctx.url("/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn add(ctx: &TestContext, id: &str) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/cart/add"))
        .json(&json!({ "productId": id }))
        .send()
        .await
        .unwrap()
}

async fn order(ctx: &TestContext, body: &Value) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/orders"))
        .json(body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_add_twice_totals_discounted_price() {
    let ctx = TestContext::new(SinkMode::Accept).await;
    let id = discounted_burger(&ctx).await;

    assert_eq!(add(&ctx, &id).await.status(), StatusCode::OK);
    assert_eq!(add(&ctx, &id).await.status(), StatusCode::OK);

    let view = cart(&ctx).await;
    assert_eq!(view["total"], json!(45000.0));
    assert_eq!(view["itemCount"], 2);
    assert_eq!(view["lines"][0]["quantity"], 2);
    assert_eq!(view["orderPlaced"], false);

    let count: Value = ctx
        .client
        .get(ctx.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count, json!({ "itemCount": 2 }));
}

#[tokio::test]
async fn test_remove_decrements_then_drops_line() {
    let ctx = TestContext::new(SinkMode::Accept).await;
    let id = discounted_burger(&ctx).await;
    add(&ctx, &id).await;
    add(&ctx, &id).await;

    let remove = |ctx: &TestContext| {
        ctx.client
            .post(ctx.url("/cart/remove"))
            .json(&json!({ "productId": id }))
            .send()
    };
    let view: Value = remove(&ctx).await.unwrap().json().await.unwrap();
    assert_eq!(view["itemCount"], 1);
    let view: Value = remove(&ctx).await.unwrap().json().await.unwrap();
    assert_eq!(view["lines"], json!([]));
    assert_eq!(view["total"], json!(0.0));
}

#[tokio::test]
async fn test_cart_is_per_session() {
    let ctx = TestContext::new(SinkMode::Accept).await;
    let id = discounted_burger(&ctx).await;
    add(&ctx, &id).await;

    let stranger: Value = reqwest::get(ctx.url("/cart"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stranger["itemCount"], 0);
}

#[tokio::test]
async fn test_add_unknown_product_is_404() {
    let ctx = TestContext::new(SinkMode::Accept).await;
    assert_eq!(add(&ctx, "ghost").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_keeps_snapshot_after_catalog_edit() {
    let ctx = TestContext::new(SinkMode::Accept).await;
    let id = discounted_burger(&ctx).await;
    add(&ctx, &id).await;

    ctx.client
        .put(ctx.url(&format!("/products/{id}")))
        .json(&json!({
            "nameUz": "Burger",
            "nameRu": "Бургер",
            "price": 40000,
            "category": "Burger"
        }))
        .send()
        .await
        .unwrap();
    add(&ctx, &id).await;

    assert_eq!(cart(&ctx).await["total"], json!(45000.0));
}

#[tokio::test]
async fn test_empty_cart_order_makes_no_sink_call() {
    let ctx = TestContext::new(SinkMode::Accept).await;

    let resp = order(&ctx, &json!({ "paymentMethod": "cash" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json::<Value>().await.unwrap(),
        json!({ "error": "Cart is empty" })
    );
    assert!(ctx.sink.received().is_empty());
}

#[tokio::test]
async fn test_successful_order_notifies_and_clears_cart() {
    let ctx = TestContext::new(SinkMode::Accept).await;
    let id = discounted_burger(&ctx).await;
    add(&ctx, &id).await;
    add(&ctx, &id).await;

    let resp = order(
        &ctx,
        &json!({
            "deliveryAddress": "Urganch, Al-Xorazmiy 12",
            "paymentMethod": "card",
            "customerPhone": "+998901234567",
            "language": "ru"
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let confirmation: Value = resp.json().await.unwrap();
    assert_eq!(confirmation["total"], json!(45000.0));
    assert_eq!(confirmation["itemCount"], 2);

    let received = ctx.sink.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["chat_id"], TEST_CHAT_ID);
    let text = received[0]["text"].as_str().unwrap();
    assert!(text.starts_with("🍔 YANGI BUYURTMA!"));
    assert!(text.contains("📞 Telefon: +998901234567"));
    assert!(text.contains("💰 To'lov usuli: Картой"));
    assert!(text.contains("📊 Jami summa: 45 000 so'm"));
    assert!(text.contains("Бургер — 2 x 22 500 so'm = 45 000 so'm"));
    assert!(text.contains("📍 Manzil: Urganch, Al-Xorazmiy 12"));

    let view = cart(&ctx).await;
    assert_eq!(view["lines"], json!([]));
    assert_eq!(view["orderPlaced"], true);
}

#[tokio::test]
async fn test_blank_address_uses_default() {
    let ctx = TestContext::new(SinkMode::Accept).await;
    let id = discounted_burger(&ctx).await;
    add(&ctx, &id).await;

    let resp = order(&ctx, &json!({ "deliveryAddress": "   " })).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let text = ctx.sink.received()[0]["text"].as_str().unwrap().to_string();
    assert!(text.contains("📍 Manzil: Xorazm viloyati Xonqa Tumani Halq Banki yonida"));
    assert!(text.contains("📞 Telefon: Ko'rsatilmagan"));
    assert!(text.contains("💰 To'lov usuli: Naqd pul"));
}

#[tokio::test]
async fn test_rejected_order_keeps_cart() {
    let ctx = TestContext::new(SinkMode::Reject).await;
    let id = discounted_burger(&ctx).await;
    add(&ctx, &id).await;

    let resp = order(&ctx, &json!({ "paymentMethod": "cash" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(ctx.sink.received().len(), 1);

    let view = cart(&ctx).await;
    assert_eq!(view["itemCount"], 1);
    assert_eq!(view["orderPlaced"], false);
}

#[tokio::test]
async fn test_sink_timeout_keeps_cart() {
    let ctx = TestContext::new(SinkMode::Hang).await;
    let id = discounted_burger(&ctx).await;
    add(&ctx, &id).await;

    let resp = order(&ctx, &json!({ "paymentMethod": "cash" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    assert_eq!(cart(&ctx).await["itemCount"], 1);
}

#[tokio::test]
async fn test_double_submit_sends_one_order() {
    let ctx = TestContext::new(SinkMode::Slow).await;
    let id = discounted_burger(&ctx).await;
    add(&ctx, &id).await;

    let body = json!({ "paymentMethod": "cash" });
    let (first, second) = tokio::join!(order(&ctx, &body), order(&ctx, &body));
    let statuses = [first.status(), second.status()];

    assert!(statuses.contains(&StatusCode::OK), "{statuses:?}");
    assert!(statuses.contains(&StatusCode::CONFLICT), "{statuses:?}");
    assert_eq!(ctx.sink.received().len(), 1);

    let view = cart(&ctx).await;
    assert_eq!(view["lines"], json!([]));

    // Once the first order finished the cart is empty, not locked.
    let resp = order(&ctx, &body).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.sink.received().len(), 1);
}
