//! Authorized request pipeline.
//!
//! Every backend call goes through [`AuthorizedClient::execute`], which
//! attaches the session's bearer token and reacts to an HTTP 401 by ending
//! the session and sending the user to the login screen before the error
//! reaches the caller.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, Request, RequestBuilder, Response, StatusCode};
use tracing::instrument;
use url::Url;

use crate::error::ApiError;
use crate::navigation::{Navigator, Route};
use crate::session::SessionStore;

/// Longest error body kept in [`ApiError::Status`] messages.
const MAX_ERROR_MESSAGE_LEN: usize = 200;

/// HTTP client bound to a session and a navigator.
#[derive(Clone)]
pub struct AuthorizedClient {
    inner: Arc<AuthorizedClientInner>,
}

struct AuthorizedClientInner {
    client: reqwest::Client,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl AuthorizedClient {
    /// Pipeline with a default `reqwest` client.
    #[must_use]
    pub fn new(session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_client(reqwest::Client::new(), session, navigator)
    }

    /// Pipeline over a preconfigured `reqwest` client.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            inner: Arc::new(AuthorizedClientInner {
                client,
                session,
                navigator,
            }),
        }
    }

    /// Session the pipeline reads the token from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Start building a request. Send it with [`Self::execute`].
    #[must_use]
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner.client.request(method, url)
    }

    /// Attach `Authorization: Bearer <token>` when the session holds a token.
    /// Returns whether the header was attached.
    pub fn authorize(&self, request: &mut Request) -> bool {
        authorize(request, &self.inner.session)
    }

    /// Send a request through the pipeline.
    ///
    /// # Errors
    ///
    /// - `ApiError::Http` if the request could not be sent
    /// - `ApiError::Unauthorized` on HTTP 401, after the session has been
    ///   ended and the login route requested
    /// - `ApiError::Status` on any other non-success status
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, mut request: Request) -> Result<Response, ApiError> {
        let authorized = self.authorize(&mut request);
        tracing::debug!(authorized, "Sending request");

        let response = self.inner.client.execute(request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Request failed to send");
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Token rejected, ending session");
            self.inner.session.logout();
            self.inner.navigator.navigate(Route::Login);
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body, status);
            tracing::warn!(status = status.as_u16(), message = %message, "Request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

/// Attach the session's bearer token to `request`.
///
/// A request without a session token is left untouched, as is one whose
/// token cannot be carried in a header.
pub fn authorize(request: &mut Request, session: &SessionStore) -> bool {
    let Some(bearer) = session.bearer() else {
        return false;
    };

    match HeaderValue::from_str(&bearer) {
        Ok(mut value) => {
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
            true
        }
        Err(_) => {
            tracing::warn!("Session token is not a valid header value, sending without it");
            false
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend usually answers `{"message": "..."}` or `{"error": "..."}`;
/// anything else is passed through, truncated.
fn error_message(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error", "mensaje"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_owned))
        });

    let message = from_json.unwrap_or_else(|| body.trim().to_owned());
    if message.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }

    if message.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = message.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{truncated}...")
    } else {
        message
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::navigation::RecordingNavigator;

    fn client(session: &SessionStore) -> AuthorizedClient {
        AuthorizedClient::new(session.clone(), Arc::new(RecordingNavigator::new()))
    }

    fn request(client: &AuthorizedClient) -> Request {
        client
            .request(Method::GET, Url::parse("http://localhost/api/v1/productos").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_authorize_with_token() {
        let session = SessionStore::in_memory();
        session.login("abc", None);
        let client = client(&session);

        let mut req = request(&client);
        assert!(client.authorize(&mut req));

        let header = req.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer abc");
        assert!(header.is_sensitive());
    }

    #[test]
    fn test_authorize_without_token_leaves_request_alone() {
        let session = SessionStore::in_memory();
        let client = client(&session);

        let mut req = request(&client);
        assert!(!client.authorize(&mut req));
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_authorize_sees_later_login() {
        let session = SessionStore::in_memory();
        let client = client(&session);

        session.login("late", None);
        let mut req = request(&client);
        assert!(client.authorize(&mut req));
        assert_eq!(
            req.headers().get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer late"
        );
    }

    #[test]
    fn test_authorize_rejects_unencodable_token() {
        let session = SessionStore::in_memory();
        session.login("bad\ntoken", None);
        let client = client(&session);

        let mut req = request(&client);
        assert!(!client.authorize(&mut req));
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"Producto no encontrado"}"#, StatusCode::NOT_FOUND),
            "Producto no encontrado"
        );
        assert_eq!(
            error_message(r#"{"success":false,"error":"stock"}"#, StatusCode::BAD_REQUEST),
            "stock"
        );
        assert_eq!(error_message("  boom  ", StatusCode::INTERNAL_SERVER_ERROR), "boom");
        assert_eq!(
            error_message("", StatusCode::INTERNAL_SERVER_ERROR),
            "Internal Server Error"
        );
        let long = "x".repeat(500);
        assert_eq!(
            error_message(&long, StatusCode::BAD_GATEWAY).len(),
            MAX_ERROR_MESSAGE_LEN + 3
        );
    }
}
