use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use storefront::{
    pricing::money,
    products::{ProductDraft, ProductId, split_list},
};
use storefront_app::context::AppContext;

use crate::cli::to_minor;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    Create(DraftArgs),
    Update {
        id: String,

        #[command(flatten)]
        draft: DraftArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Args)]
pub(crate) struct DraftArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    brand: String,

    #[arg(long)]
    category: String,

    /// Price in naira
    #[arg(long)]
    price: Decimal,

    #[arg(long, default_value_t = 0)]
    stock: u32,

    /// Comma separated, e.g. "Black, White"
    #[arg(long, default_value = "")]
    colors: String,

    /// Comma separated, e.g. "S, M, L"
    #[arg(long, default_value = "")]
    sizes: String,

    #[arg(long)]
    image: Option<String>,
}

impl DraftArgs {
    fn into_draft(self) -> Result<ProductDraft, String> {
        Ok(ProductDraft {
            name: self.name,
            brand: self.brand,
            category: self.category,
            price: to_minor(self.price)?,
            stock: self.stock,
            colors: split_list(&self.colors),
            sizes: split_list(&self.sizes),
            image: self.image,
        })
    }
}

pub(crate) async fn run(context: &AppContext, command: ProductCommand) -> Result<(), String> {
    let admin = &context.admin;

    match command.command {
        ProductSubcommand::Create(args) => {
            let product = admin
                .create_product(&args.into_draft()?)
                .await
                .map_err(|error| format!("failed to create product: {error}"))?;

            println!("created {} ({}) at {}", product.name, product.id, money(product.price));
        }
        ProductSubcommand::Update { id, draft } => {
            let product = admin
                .update_product(&ProductId::new(id), &draft.into_draft()?)
                .await
                .map_err(|error| format!("failed to update product: {error}"))?;

            println!("updated {} ({})", product.name, product.id);
        }
        ProductSubcommand::Delete { id } => {
            admin
                .delete_product(&ProductId::new(id.clone()))
                .await
                .map_err(|error| format!("failed to delete product: {error}"))?;

            println!("deleted product {id}");
        }
    }

    Ok(())
}
