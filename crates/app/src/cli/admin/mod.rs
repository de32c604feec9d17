use clap::{Args, Subcommand};
use storefront::{
    orders::{OrderFilter, OrderId, OrderStatus},
    pricing::money,
    reconcile::RecordSource,
};
use storefront_app::context::AppContext;

use crate::cli::{orders::FilterArgs, tables, today};

mod export;
mod product;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Store figures for today
    Dashboard,

    /// List registered users
    Users,

    /// Delete a user account
    DeleteUser { email: String },

    /// List every order
    Orders(FilterArgs),

    /// Move an order to a new status
    SetStatus { id: String, status: OrderStatus },

    Product(product::ProductCommand),
    Export(export::ExportArgs),
}

pub(crate) async fn run(context: &AppContext, command: AdminCommand) -> Result<(), String> {
    let admin = &context.admin;

    match command.command {
        AdminSubcommand::Dashboard => {
            let dashboard = admin
                .dashboard(today())
                .await
                .map_err(|error| format!("failed to load dashboard: {error}"))?;
            let snapshot = &dashboard.snapshot;

            println!("users: {} ({} new today)", snapshot.total_users, snapshot.new_users_today);
            println!(
                "orders: {} ({} today)",
                snapshot.total_orders, snapshot.today_orders
            );
            println!(
                "revenue: {} ({} today)",
                money(snapshot.total_revenue),
                money(snapshot.today_revenue)
            );
            println!("payments: {}", snapshot.total_payments);

            if !snapshot.low_stock.is_empty() {
                let names: Vec<&str> = dashboard
                    .products
                    .iter()
                    .filter(|product| snapshot.low_stock.contains(&product.id))
                    .map(|product| product.name.as_str())
                    .collect();

                println!("low stock: {}", names.join(", "));
            }

            for (rank, sales) in snapshot.top_products.iter().enumerate() {
                println!(
                    "{}. {} ({}) sold {} for {}",
                    rank + 1,
                    sales.name,
                    sales.brand,
                    sales.sold,
                    money(sales.revenue)
                );
            }
        }
        AdminSubcommand::Users => {
            let users = admin
                .users()
                .await
                .map_err(|error| format!("failed to load users: {error}"))?;

            println!("{}", tables::users(&users));
        }
        AdminSubcommand::DeleteUser { email } => {
            let source = admin
                .delete_user(&email)
                .await
                .map_err(|error| format!("failed to delete user: {error}"))?;

            match source {
                RecordSource::Remote => println!("user {email} deleted"),
                _ => println!("server unreachable, user {email} removed from this device only"),
            }
        }
        AdminSubcommand::Orders(args) => {
            let filter = OrderFilter::from(args);
            let orders = context
                .orders
                .admin_list()
                .await
                .map_err(|error| format!("failed to load orders: {error}"))?;

            let shown: Vec<_> = orders.iter().filter(|order| filter.matches(order)).collect();

            println!("{}", tables::orders(&shown));
        }
        AdminSubcommand::SetStatus { id, status } => {
            let source = context
                .orders
                .update_status(&OrderId::new(id.clone()), status)
                .await
                .map_err(|error| format!("failed to update order: {error}"))?;

            match source {
                RecordSource::Remote => println!("order {id} is now {status}"),
                _ => println!("server unreachable, order {id} is now {status} on this device only"),
            }
        }
        AdminSubcommand::Product(command) => product::run(context, command).await?,
        AdminSubcommand::Export(args) => export::run(context, args).await?,
    }

    Ok(())
}
