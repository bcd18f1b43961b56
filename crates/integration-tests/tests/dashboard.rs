//! Admin dashboard loading.

use pizzeria_client::dashboard::{self, DashboardStats};
use pizzeria_integration_tests::{Method, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_dashboard_counts_every_collection() {
    let ctx = TestContext::new().await;
    ctx.backend
        .respond(Method::GET, "productos", 200, json!([{}, {}, {}]));
    ctx.backend
        .respond(Method::GET, "eventos", 200, json!({"data": [{}]}));
    ctx.backend
        .respond(Method::GET, "pedidos", 200, json!({"pedidos": [{}, {}]}));
    ctx.backend
        .respond(Method::GET, "reservas", 200, json!({"result": []}));
    ctx.backend
        .respond(Method::GET, "usuarios", 200, json!([{}, {}, {}, {}]));
    ctx.backend
        .respond(Method::GET, "locales", 500, json!({"message": "caído"}));

    let stats = dashboard::load(&ctx.api).await;

    assert_eq!(
        stats,
        DashboardStats {
            products: 3,
            events: 1,
            orders: 2,
            reservations: 0,
            users: 4,
            locations: 0,
        }
    );
    assert_eq!(ctx.backend.requests().len(), 6);
}
