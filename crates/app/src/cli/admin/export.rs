use std::{fs, path::PathBuf};

use clap::{Args, ValueEnum};
use storefront_app::context::AppContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportKind {
    Users,
    Payments,
}

#[derive(Debug, Args)]
pub(crate) struct ExportArgs {
    /// What to export
    #[arg(value_enum)]
    kind: ExportKind,

    /// Write the CSV to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

pub(crate) async fn run(context: &AppContext, args: ExportArgs) -> Result<(), String> {
    let csv = match args.kind {
        ExportKind::Users => context.admin.export_users().await,
        ExportKind::Payments => context.admin.export_payments().await,
    }
    .map_err(|error| format!("failed to export: {error}"))?;

    match args.output {
        Some(path) => {
            fs::write(&path, csv)
                .map_err(|error| format!("failed to write {}: {error}", path.display()))?;

            println!("wrote {}", path.display());
        }
        None => print!("{csv}"),
    }

    Ok(())
}
