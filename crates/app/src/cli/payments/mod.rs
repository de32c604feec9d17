use clap::{Args, Subcommand};
use storefront::payments::PaymentStatus;
use storefront_app::context::AppContext;

use crate::cli::{signed_in_email, tables};

#[derive(Debug, Args)]
pub(crate) struct PaymentsCommand {
    #[command(subcommand)]
    command: PaymentsSubcommand,
}

#[derive(Debug, Subcommand)]
enum PaymentsSubcommand {
    /// List your payments
    List {
        /// Only payments with this status
        #[arg(long)]
        status: Option<PaymentStatus>,
    },

    /// Print the receipt of a completed payment
    Receipt { reference: String },
}

pub(crate) async fn run(context: &AppContext, command: PaymentsCommand) -> Result<(), String> {
    let email = signed_in_email(context)?;
    let payments = context
        .payments
        .history(&email)
        .await
        .map_err(|error| format!("failed to load payments: {error}"))?;

    match command.command {
        PaymentsSubcommand::List { status } => {
            let shown: Vec<_> = payments
                .iter()
                .filter(|payment| status.is_none_or(|status| payment.status == status))
                .collect();

            if shown.is_empty() {
                println!("no payments found");
                return Ok(());
            }

            println!("{}", tables::payments(&shown));
        }
        PaymentsSubcommand::Receipt { reference } => {
            let payment = payments
                .iter()
                .find(|payment| payment.reference.as_str() == reference)
                .ok_or_else(|| format!("payment {reference} not found"))?;

            let receipt = payment
                .receipt()
                .ok_or_else(|| format!("payment {reference} is {}, no receipt yet", payment.status))?;

            println!("{receipt}");
        }
    }

    Ok(())
}
