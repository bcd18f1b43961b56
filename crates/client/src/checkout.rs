//! Turning a cart into an order.
//!
//! Checkout is two-phase: the order header is created first, and once its id
//! is known every cart line is submitted as a line item. The backend offers
//! no transaction spanning both phases, so a failure after the header exists
//! leaves a partial order behind; this is reported as
//! [`CheckoutError::LineItemsFailed`] and nothing is rolled back.
//!
//! ```text
//! Idle ──► SubmittingOrder ──► SubmittingLineItems{order_id} ──► Completed
//!                 │                          │
//!                 └──────────► Failed ◄──────┘
//! ```

use std::future::Future;

use futures::future::join_all;
use pizzeria_core::normalize::{ORDER_ID_KEYS, find_id};
use pizzeria_core::{
    Cart, CartEntry, OrderId, OrderInput, OrderLineItemInput, OrderStatus, Price, ProductId,
    UserId,
};
use thiserror::Error;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::SessionStore;

/// The two writes checkout needs from the backend.
pub trait OrderBackend: Sync {
    /// Create an order header and return its id, if the response carries one.
    fn create_order(
        &self,
        order: &OrderInput,
    ) -> impl Future<Output = Result<Option<OrderId>, ApiError>> + Send;

    /// Create one line item under an existing order.
    fn create_line_item(
        &self,
        item: &OrderLineItemInput,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl OrderBackend for ApiClient {
    async fn create_order(&self, order: &OrderInput) -> Result<Option<OrderId>, ApiError> {
        let body = self.orders().create_raw(order).await?;
        Ok(find_id(&body, &ORDER_ID_KEYS).map(OrderId::new))
    }

    async fn create_line_item(&self, item: &OrderLineItemInput) -> Result<(), ApiError> {
        self.order_items().create_raw(item).await.map(|_| ())
    }
}

/// Why checkout stopped.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("The cart is empty")]
    EmptyCart,

    #[error("You must be logged in to place an order")]
    NotAuthenticated,

    #[error("The order could not be created: {0}")]
    OrderRejected(#[source] ApiError),

    #[error("The order was accepted but no order id came back")]
    MissingOrderId,

    #[error("Order {order_id} was created but {failed_count} of its line items failed", failed_count = .failed.len())]
    LineItemsFailed {
        order_id: OrderId,
        created: usize,
        failed: Vec<LineItemFailure>,
    },
}

/// A line item the backend refused.
#[derive(Debug)]
pub struct LineItemFailure {
    pub product_id: ProductId,
    pub error: ApiError,
}

/// Where a checkout currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Idle,
    SubmittingOrder,
    SubmittingLineItems {
        order_id: OrderId,
    },
    Completed {
        order_id: OrderId,
    },
    /// `order_id` is set when the header was created before the failure.
    Failed {
        order_id: Option<OrderId>,
    },
}

/// One line of a draft order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftLine {
    pub product_id: ProductId,
    pub name: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
    pub subtotal: Price,
}

impl DraftLine {
    fn from_entry(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product_id(),
            name: entry.product().name.clone(),
            quantity: entry.quantity(),
            unit_price: entry.unit_price(),
            subtotal: entry.subtotal(),
        }
    }

    const fn to_input(&self, order_id: OrderId) -> OrderLineItemInput {
        OrderLineItemInput {
            order_id,
            product_id: self.product_id,
            quantity: self.quantity,
            subtotal: self.subtotal,
        }
    }
}

/// Snapshot of the cart awaiting the user's confirmation. Dropping it
/// cancels the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDraft {
    user_id: UserId,
    lines: Vec<DraftLine>,
    total: Price,
}

impl CheckoutDraft {
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Order header this draft submits.
    #[must_use]
    pub const fn order_input(&self) -> OrderInput {
        OrderInput {
            user_id: self.user_id,
            status: OrderStatus::Pending,
            total: self.total,
        }
    }
}

/// A completed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub total: Price,
    pub line_items: usize,
}

/// Drives a cart through checkout against an [`OrderBackend`].
pub struct CheckoutComposer<'a, B> {
    backend: &'a B,
    session: &'a SessionStore,
    state: CheckoutState,
}

impl<'a, B: OrderBackend> CheckoutComposer<'a, B> {
    #[must_use]
    pub const fn new(backend: &'a B, session: &'a SessionStore) -> Self {
        Self {
            backend,
            session,
            state: CheckoutState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    /// Check that `cart` can be ordered and snapshot it for confirmation.
    /// Makes no network call.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::EmptyCart` if the cart has no lines
    /// - `CheckoutError::NotAuthenticated` if there is no session or the
    ///   session does not know the user's id
    pub fn prepare(&self, cart: &Cart) -> Result<CheckoutDraft, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if !self.session.is_authenticated() {
            return Err(CheckoutError::NotAuthenticated);
        }
        let user_id = self.session.user_id().ok_or(CheckoutError::NotAuthenticated)?;

        Ok(CheckoutDraft {
            user_id,
            lines: cart.entries().iter().map(DraftLine::from_entry).collect(),
            total: cart.total(),
        })
    }

    /// Submit a confirmed draft. The cart is cleared only when every line
    /// item was accepted.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::OrderRejected` if the order header is refused
    /// - `CheckoutError::MissingOrderId` if the header response has no id;
    ///   no line items are sent
    /// - `CheckoutError::LineItemsFailed` if any line item is refused; the
    ///   order header and the accepted items stay on the backend
    #[instrument(skip_all, fields(user_id = %draft.user_id, total = %draft.total, lines = draft.lines.len()))]
    pub async fn submit(
        &mut self,
        draft: CheckoutDraft,
        cart: &mut Cart,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        self.state = CheckoutState::SubmittingOrder;

        let order_id = match self.backend.create_order(&draft.order_input()).await {
            Ok(Some(order_id)) => order_id,
            Ok(None) => {
                tracing::warn!("Order created without an id, line items not sent");
                self.state = CheckoutState::Failed { order_id: None };
                return Err(CheckoutError::MissingOrderId);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order rejected");
                self.state = CheckoutState::Failed { order_id: None };
                return Err(CheckoutError::OrderRejected(e));
            }
        };

        tracing::info!(%order_id, "Order created");
        self.state = CheckoutState::SubmittingLineItems { order_id };

        let backend = self.backend;
        let results = join_all(draft.lines.iter().map(|line| async move {
            let result = backend.create_line_item(&line.to_input(order_id)).await;
            (line.product_id, result)
        }))
        .await;

        let total_items = results.len();
        let failed: Vec<LineItemFailure> = results
            .into_iter()
            .filter_map(|(product_id, result)| {
                result
                    .err()
                    .map(|error| LineItemFailure { product_id, error })
            })
            .collect();

        if !failed.is_empty() {
            for failure in &failed {
                tracing::warn!(
                    %order_id,
                    product_id = %failure.product_id,
                    error = %failure.error,
                    "Line item rejected"
                );
            }
            self.state = CheckoutState::Failed {
                order_id: Some(order_id),
            };
            return Err(CheckoutError::LineItemsFailed {
                order_id,
                created: total_items - failed.len(),
                failed,
            });
        }

        cart.clear();
        self.state = CheckoutState::Completed { order_id };
        tracing::info!(%order_id, line_items = total_items, "Checkout completed");

        Ok(CheckoutReceipt {
            order_id,
            total: draft.total,
            line_items: total_items,
        })
    }

    /// Prepare and submit in one step, for callers that confirm up front.
    ///
    /// # Errors
    ///
    /// See [`Self::prepare`] and [`Self::submit`].
    pub async fn checkout(&mut self, cart: &mut Cart) -> Result<CheckoutReceipt, CheckoutError> {
        let draft = self.prepare(cart)?;
        self.submit(draft, cart).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use parking_lot::Mutex;
    use pizzeria_core::{Identity, Product};

    use super::*;

    #[derive(Default)]
    struct FakeBackend {
        order_id: Option<OrderId>,
        reject_order: bool,
        reject_products: HashSet<ProductId>,
        orders: Mutex<Vec<OrderInput>>,
        items: Mutex<Vec<OrderLineItemInput>>,
    }

    impl FakeBackend {
        fn returning(order_id: i32) -> Self {
            Self {
                order_id: Some(OrderId::new(order_id)),
                ..Self::default()
            }
        }
    }

    impl OrderBackend for FakeBackend {
        async fn create_order(&self, order: &OrderInput) -> Result<Option<OrderId>, ApiError> {
            self.orders.lock().push(order.clone());
            if self.reject_order {
                return Err(ApiError::Status {
                    status: 500,
                    message: "db down".into(),
                });
            }
            Ok(self.order_id)
        }

        async fn create_line_item(&self, item: &OrderLineItemInput) -> Result<(), ApiError> {
            self.items.lock().push(item.clone());
            if self.reject_products.contains(&item.product_id) {
                return Err(ApiError::Status {
                    status: 400,
                    message: "stock".into(),
                });
            }
            Ok(())
        }
    }

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: Some(ProductId::new(id)),
            name: Some(format!("Pizza {id}")),
            price: Some(Price::from_units(price)),
            stock: Some(10),
            ..Product::default()
        }
    }

    /// Cart with two units of product 1 at 10 and one of product 2 at 5.
    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&product(1, 10)).unwrap();
        cart.add(&product(1, 10)).unwrap();
        cart.add(&product(2, 5)).unwrap();
        cart
    }

    fn logged_in() -> SessionStore {
        let session = SessionStore::in_memory();
        session.login(
            "abc",
            Some(Identity {
                id: Some(UserId::new(7)),
                ..Identity::default()
            }),
        );
        session
    }

    #[tokio::test]
    async fn test_successful_checkout() {
        let backend = FakeBackend::returning(42);
        let session = logged_in();
        let mut cart = cart();
        let mut composer = CheckoutComposer::new(&backend, &session);

        let draft = composer.prepare(&cart).unwrap();
        assert_eq!(draft.total(), Price::from_units(25));
        assert_eq!(composer.state(), CheckoutState::Idle);

        let receipt = composer.submit(draft, &mut cart).await.unwrap();
        assert_eq!(receipt.order_id, OrderId::new(42));
        assert_eq!(receipt.line_items, 2);
        assert_eq!(
            composer.state(),
            CheckoutState::Completed {
                order_id: OrderId::new(42)
            }
        );
        assert!(cart.is_empty());

        let orders = backend.orders.lock();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].user_id, UserId::new(7));
        assert_eq!(orders[0].status, OrderStatus::Pending);
        assert_eq!(orders[0].total, Price::from_units(25));

        let mut items = backend.items.lock().clone();
        items.sort_by_key(|i| i.product_id);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.order_id == OrderId::new(42)));
        assert_eq!((items[0].quantity, items[0].subtotal), (2, Price::from_units(20)));
        assert_eq!((items[1].quantity, items[1].subtotal), (1, Price::from_units(5)));
    }

    #[test]
    fn test_prepare_rejects_empty_cart_and_anonymous_user() {
        let backend = FakeBackend::returning(1);

        let session = logged_in();
        let composer = CheckoutComposer::new(&backend, &session);
        assert!(matches!(
            composer.prepare(&Cart::new()),
            Err(CheckoutError::EmptyCart)
        ));

        let anonymous = SessionStore::in_memory();
        let composer = CheckoutComposer::new(&backend, &anonymous);
        assert!(matches!(
            composer.prepare(&cart()),
            Err(CheckoutError::NotAuthenticated)
        ));

        let no_identity = SessionStore::in_memory();
        no_identity.login("abc", None);
        let composer = CheckoutComposer::new(&backend, &no_identity);
        assert!(matches!(
            composer.prepare(&cart()),
            Err(CheckoutError::NotAuthenticated)
        ));

        assert!(backend.orders.lock().is_empty());
    }

    #[tokio::test]
    async fn test_missing_order_id_sends_no_line_items() {
        let backend = FakeBackend::default();
        let session = logged_in();
        let mut cart = cart();
        let mut composer = CheckoutComposer::new(&backend, &session);

        let err = composer.checkout(&mut cart).await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingOrderId));
        assert_eq!(composer.state(), CheckoutState::Failed { order_id: None });
        assert!(backend.items.lock().is_empty());
        assert_eq!(cart.len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_order() {
        let backend = FakeBackend {
            reject_order: true,
            ..FakeBackend::returning(1)
        };
        let session = logged_in();
        let mut cart = cart();
        let mut composer = CheckoutComposer::new(&backend, &session);

        let err = composer.checkout(&mut cart).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::OrderRejected(ApiError::Status { status: 500, .. })
        ));
        assert!(backend.items.lock().is_empty());
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_partial_line_item_failure_keeps_cart() {
        let backend = FakeBackend {
            reject_products: HashSet::from([ProductId::new(2)]),
            ..FakeBackend::returning(9)
        };
        let session = logged_in();
        let mut cart = cart();
        let mut composer = CheckoutComposer::new(&backend, &session);

        let err = composer.checkout(&mut cart).await.unwrap_err();
        let CheckoutError::LineItemsFailed {
            order_id,
            created,
            failed,
        } = err
        else {
            panic!("expected LineItemsFailed, got {err:?}");
        };
        assert_eq!(order_id, OrderId::new(9));
        assert_eq!(created, 1);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].product_id, ProductId::new(2));

        assert_eq!(
            composer.state(),
            CheckoutState::Failed {
                order_id: Some(OrderId::new(9))
            }
        );
        assert_eq!(backend.items.lock().len(), 2);
        assert_eq!(cart.total(), Price::from_units(25));
    }

    #[test]
    fn test_line_items_failed_display() {
        let err = CheckoutError::LineItemsFailed {
            order_id: OrderId::new(9),
            created: 1,
            failed: vec![LineItemFailure {
                product_id: ProductId::new(2),
                error: ApiError::MissingToken,
            }],
        };
        assert_eq!(
            err.to_string(),
            "Order 9 was created but 1 of its line items failed"
        );
    }
}
