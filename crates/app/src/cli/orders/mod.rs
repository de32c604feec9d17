use clap::{Args, Subcommand};
use jiff::civil::Date;
use storefront::{
    orders::{DeliveryEstimate, OrderFilter, OrderId, OrderStatus},
    pricing::money,
    reconcile::RecordSource,
};
use storefront_app::context::AppContext;

use crate::cli::{signed_in_email, tables};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List your orders
    List(FilterArgs),

    /// Cancel one of your orders
    Cancel { id: String },

    /// Show an order's delivery timeline
    Track { id: String },
}

/// Status and date range filter shared by order listings.
#[derive(Debug, Args)]
pub(crate) struct FilterArgs {
    /// Only orders with this status
    #[arg(long)]
    status: Option<OrderStatus>,

    /// Placed on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<Date>,

    /// Placed on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<Date>,
}

impl From<FilterArgs> for OrderFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            status: args.status,
            from: args.from,
            to: args.to,
        }
    }
}

pub(crate) async fn run(context: &AppContext, command: OrdersCommand) -> Result<(), String> {
    let email = signed_in_email(context)?;

    match command.command {
        OrdersSubcommand::List(args) => {
            let filter = OrderFilter::from(args);
            let orders = context
                .orders
                .for_user(&email)
                .await
                .map_err(|error| format!("failed to load orders: {error}"))?;

            let shown: Vec<_> = orders.iter().filter(|order| filter.matches(order)).collect();

            if shown.is_empty() {
                println!("no orders found");
                return Ok(());
            }

            println!("{}", tables::orders(&shown));
        }
        OrdersSubcommand::Cancel { id } => {
            let source = context
                .orders
                .cancel(&OrderId::new(id.clone()))
                .await
                .map_err(|error| format!("failed to cancel order: {error}"))?;

            match source {
                RecordSource::Remote => println!("order {id} cancelled"),
                _ => println!("server unreachable, order {id} cancelled on this device only"),
            }
        }
        OrdersSubcommand::Track { id } => {
            let orders = context
                .orders
                .for_user(&email)
                .await
                .map_err(|error| format!("failed to load orders: {error}"))?;

            let order = orders
                .iter()
                .find(|order| order.id.as_str() == id)
                .ok_or_else(|| format!("order {id} not found"))?;

            println!("order: {}", order.id);
            println!("placed: {}", order.created_on());
            println!("total: {}", money(order.total));
            println!("status: {}", order.status);

            match order.expected_delivery() {
                DeliveryEstimate::On(date) => println!("expected delivery: {date}"),
                DeliveryEstimate::Delivered => println!("delivered"),
                DeliveryEstimate::Cancelled => println!("cancelled"),
            }

            for step in order.tracking_steps() {
                println!("[{}] {}", if step.completed { "x" } else { " " }, step.label);
            }
        }
    }

    Ok(())
}
