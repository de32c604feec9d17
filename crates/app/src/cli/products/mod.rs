use clap::{Args, Subcommand};
use storefront_app::context::AppContext;

mod list;
mod show;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    List(list::ListProductsArgs),
    Show(show::ShowProductArgs),
}

pub(crate) async fn run(context: &AppContext, command: ProductsCommand) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List(args) => list::run(context, args).await,
        ProductsSubcommand::Show(args) => show::run(context, args).await,
    }
}
