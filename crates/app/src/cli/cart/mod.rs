use clap::{Args, Subcommand};
use jiff::Timestamp;
use storefront::{
    cart::{Cart, ItemKey},
    products::ProductId,
    promotions::{PromoCode, PromoValidation},
    reconcile::RecordSource,
};
use storefront_app::context::AppContext;

use crate::cli::tables;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart and its totals
    Show {
        /// Promo code to price the cart with
        #[arg(long)]
        promo: Option<String>,
    },

    /// Add a product
    Add {
        /// Product id
        product: String,

        #[arg(long, default_value_t = 1)]
        quantity: u32,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        size: Option<String>,
    },

    /// Set a line's quantity, zero removes it
    Set { item_key: String, quantity: u32 },

    /// Change a line's quantity by a signed amount
    Adjust {
        item_key: String,

        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Remove a line
    Remove { item_key: String },

    /// Empty the cart
    Clear,
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    let now = Timestamp::now();

    let cart = match command.command {
        CartSubcommand::Show { promo } => {
            let loaded = context
                .cart
                .load(now)
                .await
                .map_err(|error| format!("failed to load cart: {error}"))?;

            if loaded.source == RecordSource::LocalFallback {
                println!("server unreachable, showing the cart saved on this device");
            }

            let promo = match promo {
                Some(code) => resolve_promo(context, &code).await?,
                None => None,
            };

            print_cart(&loaded, promo.as_ref());

            return Ok(());
        }
        CartSubcommand::Add {
            product,
            quantity,
            color,
            size,
        } => {
            let product = context
                .catalog
                .product(&ProductId::new(product))
                .await
                .map_err(|error| format!("failed to load product: {error}"))?;

            context
                .cart
                .add(&product, quantity, color, size, now)
                .await
                .map_err(|error| format!("failed to add to cart: {error}"))?
        }
        CartSubcommand::Set { item_key, quantity } => context
            .cart
            .set_quantity(&ItemKey::from_raw(item_key), quantity, now)
            .await
            .map_err(|error| format!("failed to update cart: {error}"))?,
        CartSubcommand::Adjust { item_key, delta } => context
            .cart
            .adjust(&ItemKey::from_raw(item_key), delta, now)
            .await
            .map_err(|error| format!("failed to update cart: {error}"))?,
        CartSubcommand::Remove { item_key } => context
            .cart
            .remove(&ItemKey::from_raw(item_key), now)
            .await
            .map_err(|error| format!("failed to remove from cart: {error}"))?,
        CartSubcommand::Clear => {
            context
                .cart
                .clear(now)
                .await
                .map_err(|error| format!("failed to clear cart: {error}"))?;

            println!("cart cleared");

            return Ok(());
        }
    };

    print_cart(&cart, None);

    Ok(())
}

/// Ask the backend about `code`. A rejected code is reported and ignored.
pub(crate) async fn resolve_promo(
    context: &AppContext,
    code: &str,
) -> Result<Option<PromoCode>, String> {
    let validation = context
        .cart
        .apply_promo(code)
        .await
        .map_err(|error| format!("failed to check promo code: {error}"))?;

    match validation {
        PromoValidation::Valid { promo, message } => {
            println!("{}", message.unwrap_or_else(|| format!("promo {} applied", promo.code())));
            Ok(Some(promo))
        }
        PromoValidation::Invalid { message } => {
            println!("promo {code} not applied: {message}");
            Ok(None)
        }
    }
}

fn print_cart(cart: &Cart, promo: Option<&PromoCode>) {
    if cart.is_empty() {
        println!("your cart is empty");
        return;
    }

    println!("{}", tables::cart(cart.lines()));
    println!("{}", tables::totals(&cart.totals(promo)));
    println!("{} items", cart.item_count());

    for line in cart.lines().iter().filter(|line| line.is_low_stock()) {
        println!("only {} left of {}", line.stock, line.name);
    }
}
