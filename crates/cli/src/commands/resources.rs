//! Generic resource commands: list, get, delete, items.

use std::fmt::Display;
use std::str::FromStr;

use clap::ValueEnum;
use pizzeria_client::ApiClient;
use pizzeria_client::dashboard::OrderSummary;
use pizzeria_core::{
    Event, Location, Message, Order, OrderId, OrderLineItem, Product, Reservation, Resource, User,
};
use serde::Serialize;
use serde_json::json;

use super::{CliError, print_json};

/// Resource kinds reachable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Users,
    Products,
    Events,
    Locations,
    Reservations,
    Orders,
    OrderItems,
    Messages,
}

/// Run a generic resource function for the concrete type behind `$kind`.
macro_rules! dispatch {
    ($kind:expr, $func:ident ( $($arg:expr),* )) => {
        match $kind {
            ResourceKind::Users => $func::<User>($($arg),*).await,
            ResourceKind::Products => $func::<Product>($($arg),*).await,
            ResourceKind::Events => $func::<Event>($($arg),*).await,
            ResourceKind::Locations => $func::<Location>($($arg),*).await,
            ResourceKind::Reservations => $func::<Reservation>($($arg),*).await,
            ResourceKind::Orders => $func::<Order>($($arg),*).await,
            ResourceKind::OrderItems => $func::<OrderLineItem>($($arg),*).await,
            ResourceKind::Messages => $func::<Message>($($arg),*).await,
        }
    };
}

/// List a resource, optionally narrowed to the logged-in user.
pub async fn list(
    api: &ApiClient,
    kind: ResourceKind,
    mine: bool,
    filter: Option<&str>,
) -> Result<(), CliError> {
    if mine {
        return list_mine(api, kind).await;
    }

    if kind == ResourceKind::Products {
        let products: Vec<Product> = api
            .products()
            .list()
            .await?
            .into_iter()
            .filter(|p| filter.is_none_or(|f| p.matches(f)))
            .collect();
        return print_json(&products);
    }
    if filter.is_some() {
        return Err(CliError::InvalidArgument(
            "--filter only applies to products".into(),
        ));
    }

    dispatch!(kind, list_all(api))
}

async fn list_all<R: Resource + Serialize>(api: &ApiClient) -> Result<(), CliError> {
    let records = api.resource::<R>().list().await?;
    print_json(&records)
}

async fn list_mine(api: &ApiClient, kind: ResourceKind) -> Result<(), CliError> {
    let user_id = api.session().user_id().ok_or(CliError::NotLoggedIn)?;

    match kind {
        ResourceKind::Orders => {
            let orders = api.orders().by_user(user_id).await?;
            print_json(&json!({
                "summary": OrderSummary::from_orders(&orders),
                "orders": orders,
            }))
        }
        ResourceKind::Reservations => print_json(&api.reservations().by_user(user_id).await?),
        ResourceKind::Messages => print_json(&api.messages().by_user(user_id).await?),
        other => Err(CliError::InvalidArgument(format!(
            "--mine is not supported for {other:?}"
        ))),
    }
}

/// Print one record.
pub async fn get(api: &ApiClient, kind: ResourceKind, raw_id: &str) -> Result<(), CliError> {
    dispatch!(kind, get_one(api, raw_id))
}

async fn get_one<R>(api: &ApiClient, raw_id: &str) -> Result<(), CliError>
where
    R: Resource + Serialize,
    R::Id: FromStr,
    <R::Id as FromStr>::Err: Display,
{
    let id = parse_id::<R>(raw_id)?;
    let record = api.resource::<R>().get(id).await?;
    print_json(&record)
}

/// Delete one record.
pub async fn delete(api: &ApiClient, kind: ResourceKind, raw_id: &str) -> Result<(), CliError> {
    dispatch!(kind, delete_one(api, raw_id))
}

async fn delete_one<R>(api: &ApiClient, raw_id: &str) -> Result<(), CliError>
where
    R: Resource,
    R::Id: FromStr,
    <R::Id as FromStr>::Err: Display,
{
    let id = parse_id::<R>(raw_id)?;
    api.resource::<R>().delete(id).await?;
    tracing::info!(resource = R::PATH, %id, "Deleted");
    Ok(())
}

/// Print the line items of one order.
pub async fn items(api: &ApiClient, raw_order_id: &str) -> Result<(), CliError> {
    let order_id = raw_order_id
        .parse::<OrderId>()
        .map_err(|e| CliError::InvalidArgument(format!("order id '{raw_order_id}': {e}")))?;
    print_json(&api.order_items().by_order(order_id).await?)
}

fn parse_id<R>(raw: &str) -> Result<R::Id, CliError>
where
    R: Resource,
    R::Id: FromStr,
    <R::Id as FromStr>::Err: Display,
{
    raw.parse::<R::Id>()
        .map_err(|e| CliError::InvalidArgument(format!("{} id '{raw}': {e}", R::PATH)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pizzeria_core::{LineItemKey, ProductId, UserId};

    use super::*;

    #[test]
    fn test_parse_simple_id() {
        assert_eq!(parse_id::<User>(" 7 ").unwrap(), UserId::new(7));
        assert!(matches!(
            parse_id::<User>("seven"),
            Err(CliError::InvalidArgument(msg)) if msg.contains("usuarios")
        ));
    }

    #[test]
    fn test_parse_composite_id() {
        assert_eq!(
            parse_id::<OrderLineItem>("4/9").unwrap(),
            LineItemKey::new(OrderId::new(4), ProductId::new(9))
        );
        assert!(parse_id::<OrderLineItem>("4").is_err());
    }

    #[test]
    fn test_resource_kind_names() {
        assert_eq!(
            ResourceKind::from_str("order-items", true).unwrap(),
            ResourceKind::OrderItems
        );
        assert_eq!(
            ResourceKind::from_str("products", true).unwrap(),
            ResourceKind::Products
        );
    }
}
