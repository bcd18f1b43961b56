//! CLI command implementations.

pub mod checkout;
pub mod navigation;
pub mod resources;
pub mod session;

use std::io::Write;

use pizzeria_client::api::CredentialsError;
use pizzeria_client::checkout::CheckoutError;
use pizzeria_client::config::ConfigError;
use pizzeria_client::ApiError;
use pizzeria_core::CartError;
use serde::Serialize;
use thiserror::Error;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not logged in, run `pizza login` first")]
    NotLoggedIn,

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write `value` to stdout as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
