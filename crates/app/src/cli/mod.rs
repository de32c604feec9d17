use clap::{Parser, Subcommand};
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rust_decimal::Decimal;
use storefront::pricing::major_to_minor;
use storefront_app::{config::AppConfig, context::AppContext};

mod account;
mod admin;
mod cart;
mod checkout;
mod orders;
mod payments;
mod products;
mod tables;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Products(products::ProductsCommand),
    Cart(cart::CartCommand),
    Account(account::AccountCommand),
    Checkout(checkout::CheckoutArgs),
    Orders(orders::OrdersCommand),
    Payments(payments::PaymentsCommand),
    Admin(admin::AdminCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::Products(command) => products::run(&context, command).await,
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Account(command) => account::run(&context, command).await,
            Commands::Checkout(args) => checkout::run(&context, args).await,
            Commands::Orders(command) => orders::run(&context, command).await,
            Commands::Payments(command) => payments::run(&context, command).await,
            Commands::Admin(command) => admin::run(&context, command).await,
        }
    }
}

/// Today's date in UTC, the calendar used for order and registration dates.
fn today() -> Date {
    Timestamp::now().to_zoned(TimeZone::UTC).date()
}

/// Convert a naira amount typed on the command line to kobo.
fn to_minor(amount: Decimal) -> Result<i64, String> {
    major_to_minor(amount).map_err(|error| format!("invalid amount {amount}: {error}"))
}

/// Email of the signed-in user.
fn signed_in_email(context: &AppContext) -> Result<String, String> {
    context
        .accounts
        .current_user()
        .map_err(|error| format!("failed to read session: {error}"))?
        .map(|user| user.email)
        .ok_or_else(|| "please sign in first (storefront account login)".to_string())
}
