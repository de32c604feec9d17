use clap::{Args, ValueEnum};
use jiff::Timestamp;
use storefront::{payments::PaymentOutcome, pricing::money};
use storefront_app::{
    context::AppContext,
    services::checkout::{CheckoutResult, DeliveryDetails},
};

use crate::cli::{cart::resolve_promo, tables};

/// How the payment popup ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum PopupOutcome {
    /// The provider confirms the payment
    #[default]
    Success,

    /// The shopper closes the popup
    Close,
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Contact phone number
    #[arg(long)]
    phone: String,

    /// Delivery address
    #[arg(long)]
    address: String,

    /// City or delivery zone
    #[arg(long)]
    location: Option<String>,

    /// Promo code
    #[arg(long)]
    promo: Option<String>,

    /// Payment popup result
    #[arg(long, value_enum, default_value_t = PopupOutcome::Success)]
    outcome: PopupOutcome,
}

pub(crate) async fn run(context: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let promo = match &args.promo {
        Some(code) => resolve_promo(context, code).await?,
        None => None,
    };

    let delivery = DeliveryDetails {
        phone: args.phone,
        address: args.address,
        location: args.location,
    };

    let pending = context
        .checkout
        .begin(delivery, promo, Timestamp::now())
        .await
        .map_err(|error| format!("checkout failed: {error}"))?;

    println!("{}", tables::cart(&pending.lines));
    println!("{}", tables::totals(&pending.totals));
    println!(
        "charging {} ({}) to {} with reference {}",
        money(pending.request.amount_minor),
        pending.request.currency_code,
        pending.request.email,
        pending.request.reference
    );

    let outcome = match args.outcome {
        PopupOutcome::Success => PaymentOutcome::Succeeded {
            reference: pending.request.reference.clone(),
        },
        PopupOutcome::Close => PaymentOutcome::Closed,
    };

    let result = context
        .checkout
        .complete(pending, outcome, Timestamp::now())
        .await
        .map_err(|error| format!("failed to record payment: {error}"))?;

    match result {
        CheckoutResult::Placed { order, payment } => {
            println!("payment successful! reference: {}", payment.reference);
            println!("order {} placed, status {}", order.id, order.status);
        }
        CheckoutResult::Cancelled => println!("payment cancelled, your cart was kept"),
    }

    Ok(())
}
