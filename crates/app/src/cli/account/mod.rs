use clap::{Args, Subcommand};
use storefront::customers::{Password, Registration};
use storefront_app::context::AppContext;

use crate::cli::today;

#[derive(Debug, Args)]
pub(crate) struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Debug, Subcommand)]
enum AccountSubcommand {
    Register(RegisterArgs),
    Login(LoginArgs),
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Subscribe an email to the newsletter
    Subscribe { email: String },
}

#[derive(Debug, Args)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    email: String,

    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, env = "STOREFRONT_CONFIRM_PASSWORD", hide_env_values = true)]
    confirm_password: String,

    /// Accept the terms and conditions
    #[arg(long)]
    agree_terms: bool,

    /// Receive the newsletter
    #[arg(long)]
    newsletter: bool,
}

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    email: String,

    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(context: &AppContext, command: AccountCommand) -> Result<(), String> {
    let accounts = &context.accounts;

    match command.command {
        AccountSubcommand::Register(args) => {
            let form = Registration {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email,
                password: Password::new(args.password),
                confirm_password: Password::new(args.confirm_password),
                agree_terms: args.agree_terms,
                subscribe_newsletter: args.newsletter,
            };

            let user = accounts
                .register(&form, today())
                .await
                .map_err(|error| format!("registration failed: {error}"))?;

            println!("welcome, {}! you are signed in as {}", user.name, user.email);
        }
        AccountSubcommand::Login(args) => {
            let user = accounts
                .login(&args.email, Password::new(args.password))
                .await
                .map_err(|error| format!("login failed: {error}"))?;

            println!("signed in as {} ({})", user.name, user.email);
        }
        AccountSubcommand::Logout => {
            accounts
                .logout()
                .map_err(|error| format!("failed to sign out: {error}"))?;

            println!("signed out");
        }
        AccountSubcommand::Whoami => {
            match accounts
                .current_user()
                .map_err(|error| format!("failed to read session: {error}"))?
            {
                Some(user) => println!("{} ({})", user.name, user.email),
                None => println!("not signed in"),
            }
        }
        AccountSubcommand::Subscribe { email } => {
            accounts
                .subscribe(&email)
                .await
                .map_err(|error| format!("subscription failed: {error}"))?;

            println!("subscribed {email} to the newsletter");
        }
    }

    Ok(())
}
