//! Session commands: login, logout, whoami, register.

use pizzeria_client::ApiClient;
use pizzeria_client::api::Credentials;
use pizzeria_core::{Email, UserInput};
use secrecy::SecretString;
use serde_json::json;

use super::{CliError, print_json};

/// Log in and persist the session.
pub async fn login(api: &ApiClient, email: &str, password: String) -> Result<(), CliError> {
    let credentials = Credentials::new(email, SecretString::from(password))?;
    let outcome = api.auth().login(&credentials).await?;

    match &outcome.identity {
        Some(user) => tracing::info!(user = user.display_name(), "Logged in"),
        None => tracing::info!("Logged in (the backend sent no user profile)"),
    }
    if api.session().is_administrator() {
        tracing::info!("Administrator access granted");
    }
    Ok(())
}

/// Forget the session.
pub fn logout(api: &ApiClient) {
    api.auth().logout();
    tracing::info!("Logged out");
}

/// Print the logged-in identity.
pub fn whoami(api: &ApiClient) -> Result<(), CliError> {
    let session = api.session();
    if !session.is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    print_json(&json!({
        "authenticated": true,
        "administrator": session.is_administrator(),
        "user": session.identity(),
    }))
}

/// Account details for `register`.
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl RegisterForm {
    fn into_input(self) -> Result<UserInput, CliError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(CliError::InvalidArgument("name cannot be empty".into()));
        }
        let email = Email::parse(&self.email)
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
        if self.password.is_empty() {
            return Err(CliError::InvalidArgument("password cannot be empty".into()));
        }

        Ok(UserInput {
            name,
            email: email.into_inner(),
            password: Some(self.password),
            phone: self.phone.filter(|p| !p.trim().is_empty()),
            address: self.address.filter(|a| !a.trim().is_empty()),
        })
    }
}

/// Create an account. The new user still has to log in.
pub async fn register(api: &ApiClient, form: RegisterForm) -> Result<(), CliError> {
    let input = form.into_input()?;
    let user = api.auth().register(&input).await?;
    tracing::info!(email = %input.email, "Account created, run `pizza login` to sign in");
    print_json(&user)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            name: " Ana ".into(),
            email: "ana@pizzeria.test".into(),
            password: "pw".into(),
            phone: Some(String::new()),
            address: Some("Calle 1".into()),
        }
    }

    #[test]
    fn test_register_form_into_input() {
        let input = form().into_input().unwrap();
        assert_eq!(input.name, "Ana");
        assert_eq!(input.email, "ana@pizzeria.test");
        assert_eq!(input.password.as_deref(), Some("pw"));
        assert_eq!(input.phone, None);
        assert_eq!(input.address.as_deref(), Some("Calle 1"));
    }

    #[test]
    fn test_register_form_rejects_bad_input() {
        let blank_name = RegisterForm {
            name: "  ".into(),
            ..form()
        };
        assert!(matches!(blank_name.into_input(), Err(CliError::InvalidArgument(_))));

        let bad_email = RegisterForm {
            email: "ana".into(),
            ..form()
        };
        assert!(matches!(bad_email.into_input(), Err(CliError::InvalidArgument(_))));

        let no_password = RegisterForm {
            password: String::new(),
            ..form()
        };
        assert!(matches!(no_password.into_input(), Err(CliError::InvalidArgument(_))));
    }
}
