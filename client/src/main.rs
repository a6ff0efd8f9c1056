//! `community` command-line front end for the smart-community client.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use client::api::ProductQuery;
use client::domain::ports::ApiTransportError;
use client::domain::{CodeCredentials, CredentialsValidationError, PasswordCredentials};
use client::inbound::NavigationOutcome;
use client::stores::SessionError;
use client::{AppError, AppState, ClientSettings, ConfigError};

/// Smart-community client.
#[derive(Debug, Parser)]
#[command(name = "community", version, about)]
struct Cli {
    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in with mobile and password.
    Login {
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in with mobile and SMS code.
    LoginCode {
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        code: String,
    },
    /// Request an SMS verification code.
    SendCode {
        #[arg(long)]
        mobile: String,
    },
    /// Sign out and clear the local session.
    Logout,
    /// Refresh and print the signed-in profile.
    Whoami,
    /// List mall products.
    Products {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<i64>,
        /// Only products on promotion.
        #[arg(long)]
        promotion: bool,
    },
    /// Print the cart.
    Cart,
    /// Put a product into the cart.
    AddToCart {
        product_id: i64,
        #[arg(long, default_value_t = 1)]
        quantity: i32,
    },
    /// Pay an order from the wallet balance.
    PayOrder { order_id: i64 },
    /// Pay a property fee from the wallet balance.
    PayFee { fee_id: i64 },
    /// Check where navigating to `path` lands.
    Navigate { path: String },
    /// Ask the assistant a question.
    Chat { message: String },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Credentials(#[from] CredentialsValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiTransportError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(io::stderr().lock(), "error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn run(command: Command) -> Result<(), CliError> {
    let config = ClientSettings::load()?.resolve()?;
    let app = AppState::from_config(&config)?;

    match command {
        Command::Login { mobile, password } => {
            let credentials = PasswordCredentials::try_from_parts(&mobile, &password)?;
            let grant = app.session.login(&credentials).await?;
            print_json(&grant.user_info)
        }
        Command::LoginCode { mobile, code } => {
            let credentials = CodeCredentials::try_from_parts(&mobile, &code)?;
            let grant = app.session.login_by_code(&credentials).await?;
            print_json(&grant.user_info)
        }
        Command::SendCode { mobile } => {
            app.auth.send_code(mobile.trim()).await?;
            print_line("verification code sent")
        }
        Command::Logout => {
            app.session.logout().await;
            print_line("signed out")
        }
        Command::Whoami => {
            if !app.session.snapshot().is_logged_in() {
                return print_line("not signed in");
            }
            app.session.fetch_profile().await;
            match app.session.snapshot().profile() {
                Some(profile) => print_json(profile),
                None => print_line("signed in; profile unavailable"),
            }
        }
        Command::Products {
            page,
            size,
            name,
            category,
            promotion,
        } => {
            let query = ProductQuery {
                page: Some(page),
                size: Some(size),
                name,
                category_id: category,
                is_promotion: promotion.then_some(true),
                ..ProductQuery::default()
            };
            print_json(&app.products.list(&query).await?)
        }
        Command::Cart => {
            app.cart.fetch_cart().await;
            let cart = app.cart.snapshot();
            print_json(&CartView {
                count: cart.count(),
                items: cart.items(),
            })
        }
        Command::AddToCart {
            product_id,
            quantity,
        } => {
            app.orders.add_to_cart(product_id, quantity).await?;
            app.cart.fetch_cart().await;
            print_line(&format!("cart now holds {} item(s)", app.cart.snapshot().count()))
        }
        Command::PayOrder { order_id } => {
            print_json(&app.orders.pay(order_id).await?)
        }
        Command::PayFee { fee_id } => {
            print_json(&app.services.pay_property_fee(fee_id).await?)
        }
        Command::Navigate { path } => {
            let outcome = app.router.push(&path);
            let label = match &outcome {
                NavigationOutcome::Arrived(_) => "arrived",
                NavigationOutcome::RedirectedToLogin(_) => "redirected to login",
                NavigationOutcome::Denied(_) => "access denied",
                NavigationOutcome::NotFound { .. } => "not found",
            };
            let location = app.router.location();
            print_line(&format!("{label}: {} ({})", location.path, location.name))
        }
        Command::Chat { message } => print_json(&app.chat.send(&message).await?),
    }
}

#[derive(Serialize)]
struct CartView<'a> {
    count: usize,
    items: &'a [client::domain::CartItem],
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    print_line(&rendered)
}

fn print_line(line: &str) -> Result<(), CliError> {
    writeln!(io::stdout().lock(), "{line}")?;
    Ok(())
}
