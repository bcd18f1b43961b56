//! Login and registration.

use pizzeria_core::normalize::extract_login;
use pizzeria_core::{Email, EmailError, Identity, User, UserInput};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

/// Path of the login endpoint.
const LOGIN_PATH: &str = "auth/login";

/// Invalid login form input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("Password is required")]
    EmptyPassword,
}

/// Email and password for `POST auth/login`.
pub struct Credentials {
    email: Email,
    password: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Validate login form input.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError` if the email is malformed or the password
    /// is empty.
    pub fn new(email: &str, password: SecretString) -> Result<Self, CredentialsError> {
        let email = Email::parse(email)?;
        if password.expose_secret().is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self { email, password })
    }

    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Result of a successful login. The token itself stays in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// The user the backend returned alongside the token, if any.
    pub identity: Option<Identity>,
}

/// Login and registration operations.
pub struct AuthApi<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(super) const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Log in and start a session.
    ///
    /// The token is looked up wherever the backend puts it (see
    /// [`extract_login`]). A user record that does not decode is dropped;
    /// the session still starts with the token.
    ///
    /// # Errors
    ///
    /// - `ApiError::Unauthorized` if the backend rejects the credentials
    /// - `ApiError::MissingToken` if the response carries no token
    /// - another `ApiError` if the request fails
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, ApiError> {
        let request = LoginRequest {
            email: credentials.email.as_str(),
            password: credentials.password.expose_secret(),
        };
        let body = self
            .api
            .call(Method::POST, LOGIN_PATH, Some(&request))
            .await?;

        let payload = extract_login(&body).ok_or(ApiError::MissingToken)?;
        let identity = payload.user.and_then(|user| {
            serde_json::from_value::<Identity>(user)
                .inspect_err(|e| tracing::warn!(error = %e, "Ignoring undecodable user in login response"))
                .ok()
        });

        self.api.session().login(&payload.token, identity.clone());
        Ok(LoginOutcome { identity })
    }

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the registration.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: &UserInput) -> Result<User, ApiError> {
        self.api.users().create(input).await
    }

    /// End the session locally. The backend keeps no session state.
    pub fn logout(&self) {
        self.api.session().logout();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        let creds = Credentials::new(" ana@pizzeria.test ", SecretString::from("pw")).unwrap();
        assert_eq!(creds.email().as_str(), "ana@pizzeria.test");

        assert!(matches!(
            Credentials::new("not-an-email", SecretString::from("pw")),
            Err(CredentialsError::InvalidEmail(_))
        ));
        assert_eq!(
            Credentials::new("ana@pizzeria.test", SecretString::from("")).unwrap_err(),
            CredentialsError::EmptyPassword
        );
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("ana@pizzeria.test", SecretString::from("hunter2")).unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_login_request_wire_shape() {
        let body = serde_json::to_value(LoginRequest {
            email: "ana@pizzeria.test",
            password: "pw",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"email": "ana@pizzeria.test", "password": "pw"}));
    }
}
