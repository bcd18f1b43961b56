//! `checkout`: build a cart from product ids and place the order.

use std::io::{BufRead, Write};
use std::str::FromStr;

use pizzeria_client::ApiClient;
use pizzeria_client::checkout::{CheckoutComposer, CheckoutDraft};
use pizzeria_core::{Cart, ProductId};

use super::CliError;

/// One `--item <product_id>[:<quantity>]` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemArg {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl FromStr for CartItemArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = s.split_once(':').unwrap_or((s, "1"));
        let product_id = id
            .parse::<ProductId>()
            .map_err(|e| format!("invalid product id '{id}': {e}"))?;
        let quantity = quantity
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
        if quantity == 0 {
            return Err("quantity must be at least 1".into());
        }
        Ok(Self {
            product_id,
            quantity,
        })
    }
}

/// Fill a cart from the catalog and submit it.
#[allow(clippy::print_stdout)]
pub async fn run(api: &ApiClient, items: &[CartItemArg], confirmed: bool) -> Result<(), CliError> {
    let mut cart = Cart::new();
    for item in items {
        let product = api.products().get(item.product_id).await?;
        let quantity = cart.get(item.product_id).map_or(0, |e| e.quantity()) + item.quantity;
        cart.add(&product)?;
        cart.set_quantity(item.product_id, quantity)?;
    }

    let mut composer = CheckoutComposer::new(api, api.session());
    let draft = composer.prepare(&cart)?;
    print_draft(&draft)?;

    if !confirmed && !confirm("Place this order?")? {
        tracing::info!("Checkout cancelled");
        return Ok(());
    }

    let receipt = composer.submit(draft, &mut cart).await?;
    println!(
        "Order {} placed: {} line items, total {}",
        receipt.order_id, receipt.line_items, receipt.total
    );
    Ok(())
}

fn print_draft(draft: &CheckoutDraft) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    for line in draft.lines() {
        writeln!(
            stdout,
            "{:>3} x {:<30} {:>10} {:>10}",
            line.quantity,
            line.name.as_deref().unwrap_or("(unnamed product)"),
            line.unit_price,
            line.subtotal
        )?;
    }
    writeln!(stdout, "Total: {}", draft.total())?;
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, CliError> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{prompt} [y/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "s" | "si"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_with_quantity() {
        let item: CartItemArg = "3:2".parse().unwrap();
        assert_eq!(item.product_id, ProductId::new(3));
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_parse_item_defaults_to_one() {
        let item: CartItemArg = "5".parse().unwrap();
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_parse_item_rejects_garbage() {
        assert!("x:2".parse::<CartItemArg>().is_err());
        assert!("3:x".parse::<CartItemArg>().is_err());
        assert!("3:0".parse::<CartItemArg>().is_err());
    }
}
