//! Cart to order submission against the stub backend.

#![allow(clippy::unwrap_used)]

use pizzeria_client::checkout::{CheckoutComposer, CheckoutError, CheckoutState};
use pizzeria_core::{Cart, Identity, OrderId, Price, Product, ProductId, UserId};
use pizzeria_integration_tests::{Method, StubResponse, TestContext};
use serde_json::{Value, json};

fn product(id: i32, price: i64) -> Product {
    Product {
        id: Some(ProductId::new(id)),
        name: Some(format!("Pizza {id}")),
        price: Some(Price::from_units(price)),
        stock: Some(10),
        ..Product::default()
    }
}

/// Two units of product 1 at 10, one unit of product 2 at 5.
fn cart() -> Cart {
    let mut cart = Cart::new();
    cart.add(&product(1, 10)).unwrap();
    cart.add(&product(1, 10)).unwrap();
    cart.add(&product(2, 5)).unwrap();
    cart
}

async fn logged_in() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.session.login(
        "abc",
        Some(Identity {
            id: Some(UserId::new(7)),
            name: Some("Ana".into()),
            ..Identity::default()
        }),
    );
    ctx
}

fn line_items_sorted(ctx: &TestContext) -> Vec<Value> {
    let mut bodies: Vec<Value> = ctx
        .backend
        .requests_to(&Method::POST, "detalles-pedido")
        .into_iter()
        .map(|r| r.body)
        .collect();
    bodies.sort_by_key(|b| b["fk_id_producto"].as_i64());
    bodies
}

#[tokio::test]
async fn test_checkout_creates_order_then_line_items() {
    let ctx = logged_in().await;
    ctx.backend.respond(
        Method::POST,
        "pedidos",
        201,
        json!({"success": true, "data": {"id_pedido": 42}}),
    );
    ctx.backend
        .respond(Method::POST, "detalles-pedido", 201, json!({"success": true}));

    let mut cart = cart();
    let mut composer = CheckoutComposer::new(&ctx.api, &ctx.session);
    let receipt = composer.checkout(&mut cart).await.unwrap();

    assert_eq!(receipt.order_id, OrderId::new(42));
    assert_eq!(receipt.total, Price::from_units(25));
    assert!(cart.is_empty());

    let order = &ctx.backend.requests_to(&Method::POST, "pedidos")[0];
    assert_eq!(order.authorization.as_deref(), Some("Bearer abc"));
    assert_eq!(
        order.body,
        json!({"fk_id_usuario": 7, "estado_pedido": "pendiente", "total": 25.0})
    );

    let items = line_items_sorted(&ctx);
    assert_eq!(
        items,
        vec![
            json!({"fk_id_pedido": 42, "fk_id_producto": 1, "cantidad": 2, "subtotal": 20.0}),
            json!({"fk_id_pedido": 42, "fk_id_producto": 2, "cantidad": 1, "subtotal": 5.0}),
        ]
    );

    // The order header goes out before any line item.
    let first = &ctx.backend.requests()[0];
    assert_eq!(first.path, "pedidos");
}

#[tokio::test]
async fn test_order_id_from_plain_id_field() {
    let ctx = logged_in().await;
    ctx.backend.respond(Method::POST, "pedidos", 201, json!({"id": "17"}));
    ctx.backend.respond(Method::POST, "detalles-pedido", 201, json!({}));

    let mut cart = cart();
    let receipt = CheckoutComposer::new(&ctx.api, &ctx.session)
        .checkout(&mut cart)
        .await
        .unwrap();
    assert_eq!(receipt.order_id, OrderId::new(17));
}

#[tokio::test]
async fn test_missing_order_id_sends_no_line_items() {
    let ctx = logged_in().await;
    ctx.backend
        .respond(Method::POST, "pedidos", 201, json!({"success": true}));

    let mut cart = cart();
    let mut composer = CheckoutComposer::new(&ctx.api, &ctx.session);
    let err = composer.checkout(&mut cart).await.unwrap_err();

    assert!(matches!(err, CheckoutError::MissingOrderId));
    assert_eq!(composer.state(), CheckoutState::Failed { order_id: None });
    assert!(ctx.backend.requests_to(&Method::POST, "detalles-pedido").is_empty());
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn test_partial_line_item_failure_is_reported() {
    let ctx = logged_in().await;
    ctx.backend
        .respond(Method::POST, "pedidos", 201, json!({"id_pedido": 5}));
    ctx.backend.respond_with(Method::POST, "detalles-pedido", |body| {
        if body["fk_id_producto"] == json!(2) {
            StubResponse::status(400, json!({"message": "Stock insuficiente"}))
        } else {
            StubResponse::status(201, json!({"success": true}))
        }
    });

    let mut cart = cart();
    let mut composer = CheckoutComposer::new(&ctx.api, &ctx.session);
    let err = composer.checkout(&mut cart).await.unwrap_err();

    let CheckoutError::LineItemsFailed {
        order_id,
        created,
        failed,
    } = err
    else {
        panic!("expected LineItemsFailed, got {err:?}");
    };
    assert_eq!(order_id, OrderId::new(5));
    assert_eq!(created, 1);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].product_id, ProductId::new(2));

    assert_eq!(
        composer.state(),
        CheckoutState::Failed {
            order_id: Some(OrderId::new(5))
        }
    );
    assert_eq!(cart.total(), Price::from_units(25));
    // No compensating deletes are issued.
    assert!(ctx
        .backend
        .requests()
        .iter()
        .all(|r| r.method != Method::DELETE));
}

#[tokio::test]
async fn test_expired_session_during_checkout() {
    let ctx = logged_in().await;
    ctx.backend
        .respond(Method::POST, "pedidos", 401, json!({"message": "Token inválido"}));

    let mut cart = cart();
    let mut composer = CheckoutComposer::new(&ctx.api, &ctx.session);
    let err = composer.checkout(&mut cart).await.unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::OrderRejected(pizzeria_client::ApiError::Unauthorized)
    ));
    assert!(!ctx.session.is_authenticated());
    assert!(!cart.is_empty());
}

#[tokio::test]
async fn test_anonymous_checkout_makes_no_request() {
    let ctx = TestContext::new().await;
    let composer = CheckoutComposer::new(&ctx.api, &ctx.session);

    assert!(matches!(
        composer.prepare(&cart()),
        Err(CheckoutError::NotAuthenticated)
    ));
    assert!(ctx.backend.requests().is_empty());
}
