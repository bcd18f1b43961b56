//! Typed access to the backend's REST resources.
//!
//! [`ApiClient`] hands out one [`Resources`] handle per resource kind. Every
//! handle speaks the same protocol:
//!
//! | operation | request                 |
//! |-----------|-------------------------|
//! | `list`    | `GET {path}`            |
//! | `get`     | `GET {path}/{id}`       |
//! | `create`  | `POST {path}`           |
//! | `update`  | `PUT {path}/{id}`       |
//! | `delete`  | `DELETE {path}/{id}`    |
//!
//! Response envelopes are stripped with [`pizzeria_core::normalize`], so a
//! list call yields a (possibly empty) list no matter how the backend wraps
//! it. Calls are single-fire; nothing is retried.

mod auth;

use std::marker::PhantomData;
use std::sync::Arc;

use pizzeria_core::normalize::{normalize_list, normalize_record};
use pizzeria_core::{
    Event, Location, Message, Order, OrderId, OrderLineItem, Product, Reservation, Resource, User,
    UserId,
};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;
use url::Url;

pub use auth::{AuthApi, Credentials, CredentialsError, LoginOutcome};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::AuthorizedClient;
use crate::navigation::Navigator;
use crate::session::SessionStore;

/// Client for the pizzeria REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: AuthorizedClient,
    base_url: Url,
}

impl ApiClient {
    /// Client for the configured API, bound to `session`.
    #[must_use]
    pub fn new(config: &ClientConfig, session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_http(
            config.api_url.clone(),
            AuthorizedClient::new(session, navigator),
        )
    }

    /// Client over an existing pipeline. `base_url` must end in `/`.
    #[must_use]
    pub const fn with_http(base_url: Url, http: AuthorizedClient) -> Self {
        Self { http, base_url }
    }

    /// Session shared with the pipeline.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.http.session()
    }

    /// Base URL all resource paths are joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Generic handle for any resource kind.
    #[must_use]
    pub const fn resource<R: Resource>(&self) -> Resources<'_, R> {
        Resources {
            api: self,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn users(&self) -> Resources<'_, User> {
        self.resource()
    }

    #[must_use]
    pub const fn products(&self) -> Resources<'_, Product> {
        self.resource()
    }

    #[must_use]
    pub const fn events(&self) -> Resources<'_, Event> {
        self.resource()
    }

    #[must_use]
    pub const fn locations(&self) -> Resources<'_, Location> {
        self.resource()
    }

    #[must_use]
    pub const fn reservations(&self) -> Resources<'_, Reservation> {
        self.resource()
    }

    #[must_use]
    pub const fn orders(&self) -> Resources<'_, Order> {
        self.resource()
    }

    #[must_use]
    pub const fn order_items(&self) -> Resources<'_, OrderLineItem> {
        self.resource()
    }

    #[must_use]
    pub const fn messages(&self) -> Resources<'_, Message> {
        self.resource()
    }

    /// Login and registration.
    #[must_use]
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Send a request and read the body as JSON. An empty body reads as
    /// `null`.
    async fn call<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Value, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.base_url.join(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let request = builder.build()?;

        let response = self.http.execute(request).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        self.call::<()>(Method::GET, path, None).await
    }
}

/// Operations on one resource kind.
pub struct Resources<'a, R> {
    api: &'a ApiClient,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource> Resources<'_, R> {
    /// Fetch the whole collection.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or an element does not decode.
    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn list(&self) -> Result<Vec<R>, ApiError> {
        self.list_at(R::PATH).await
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` on HTTP 404, or another `ApiError` if the
    /// request fails.
    #[instrument(skip(self, id), fields(resource = R::PATH, id = %id))]
    pub async fn get(&self, id: R::Id) -> Result<R, ApiError> {
        let path = format!("{}/{id}", R::PATH);
        match self.api.get_json(&path).await {
            Ok(body) => decode_record(&body),
            Err(ApiError::Status { status: 404, .. }) => Err(ApiError::NotFound(path)),
            Err(e) => Err(e),
        }
    }

    /// Create a record and decode what the backend echoes back.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the echo does not decode.
    pub async fn create(&self, payload: &R::Create) -> Result<R, ApiError> {
        let body = self.create_raw(payload).await?;
        decode_record(&body)
    }

    /// Create a record and return the raw response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, payload), fields(resource = R::PATH))]
    pub async fn create_raw(&self, payload: &R::Create) -> Result<Value, ApiError> {
        self.api.call(Method::POST, R::PATH, Some(payload)).await
    }

    /// Replace a record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails (including an unknown id) or
    /// the echo does not decode.
    #[instrument(skip(self, id, payload), fields(resource = R::PATH, id = %id))]
    pub async fn update(&self, id: R::Id, payload: &R::Update) -> Result<R, ApiError> {
        let path = format!("{}/{id}", R::PATH);
        let body = self.api.call(Method::PUT, &path, Some(payload)).await?;
        decode_record(&body)
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails (including an unknown id).
    #[instrument(skip(self, id), fields(resource = R::PATH, id = %id))]
    pub async fn delete(&self, id: R::Id) -> Result<(), ApiError> {
        let path = format!("{}/{id}", R::PATH);
        self.api.call::<()>(Method::DELETE, &path, None).await?;
        Ok(())
    }

    async fn list_at(&self, path: &str) -> Result<Vec<R>, ApiError> {
        let body = self.api.get_json(path).await?;
        let items = decode_list::<R>(&body, R::COLLECTION_KEY)?;
        tracing::debug!(path, count = items.len(), "Fetched collection");
        Ok(items)
    }
}

impl Resources<'_, Order> {
    /// Orders placed by one user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn by_user(&self, user_id: UserId) -> Result<Vec<Order>, ApiError> {
        self.list_at(&format!("{}/usuario/{user_id}", Order::PATH)).await
    }
}

impl Resources<'_, Reservation> {
    /// Reservations made by one user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn by_user(&self, user_id: UserId) -> Result<Vec<Reservation>, ApiError> {
        self.list_at(&format!("{}/usuario/{user_id}", Reservation::PATH))
            .await
    }
}

impl Resources<'_, Message> {
    /// Messages addressed to or sent by one user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn by_user(&self, user_id: UserId) -> Result<Vec<Message>, ApiError> {
        self.list_at(&format!("{}/usuario/{user_id}", Message::PATH)).await
    }
}

impl Resources<'_, OrderLineItem> {
    /// Line items of one order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn by_order(&self, order_id: OrderId) -> Result<Vec<OrderLineItem>, ApiError> {
        self.list_at(&format!("{}/pedido/{order_id}", OrderLineItem::PATH))
            .await
    }
}

fn decode_list<T: DeserializeOwned>(body: &Value, collection_key: &str) -> Result<Vec<T>, ApiError> {
    normalize_list(body, Some(collection_key))
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(ApiError::from)
}

fn decode_record<T: DeserializeOwned>(body: &Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(normalize_record(body))?)
}
