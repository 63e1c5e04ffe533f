//! Stockbook CLI - inventory and account management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product and show the running total
//! sb-cli inventory add "Mouse" 19.99 3
//! sb-cli inventory total
//!
//! # Edit or remove by row (1-based, as listed) or by stable ID
//! sb-cli inventory edit 1 "Mouse" 21.50 2
//! sb-cli inventory remove --id 4b6f...
//!
//! # Accounts and the session slot
//! sb-cli account register -n "Jane Doe" -u jane -e jane@x.com -p abcdef
//! sb-cli account login -u jane -p abcdef
//! sb-cli account whoami
//! ```
//!
//! # Commands
//!
//! - `inventory` - List, add, edit, remove products and show totals
//! - `account` - Register, log in and out, list accounts
//! - `notice` - Read the one-shot notice left by a redirect
//!
//! Storage location, currency and redirect targets come from `STOCKBOOK_*`
//! environment variables (see `stockbook_store::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use stockbook_core::ProductId;
use stockbook_store::StoreConfig;

mod commands;

#[derive(Parser)]
#[command(name = "sb-cli")]
#[command(author, version, about = "Stockbook inventory and account tools")]
struct Cli {
    /// Data directory (overrides `STOCKBOOK_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage inventory records
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// Manage accounts and the session
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// One-shot notices
    Notice {
        #[command(subcommand)]
        action: NoticeAction,
    },
}

#[derive(Subcommand)]
enum InventoryAction {
    /// List every record with its line total
    List,
    /// Add a record
    Add {
        /// Product name
        name: String,
        /// Unit price (rounded to cents)
        price: String,
        /// Units in stock (truncated to a whole number)
        stock: String,
    },
    /// Replace a record in place
    Edit {
        #[command(flatten)]
        target: RecordTarget,
        /// Product name
        name: String,
        /// Unit price (rounded to cents)
        price: String,
        /// Units in stock (truncated to a whole number)
        stock: String,
    },
    /// Remove a record
    Remove {
        #[command(flatten)]
        target: RecordTarget,
    },
    /// Show the grand total
    Total,
}

/// Selects a record by listed row or by ID.
#[derive(Args)]
struct RecordTarget {
    /// Row number as shown by `inventory list` (1-based)
    #[arg(long, short, required_unless_present = "id", conflicts_with = "id")]
    row: Option<usize>,

    /// Stable record ID
    #[arg(long)]
    id: Option<ProductId>,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Register a new account
    Register {
        /// Full name
        #[arg(short, long)]
        name: String,

        /// Login name
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Password confirmation (defaults to the password)
        #[arg(short, long)]
        confirm: Option<String>,
    },
    /// Log in, replacing any current session
    Login {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List accounts (passwords omitted)
    List,
}

#[derive(Subcommand)]
enum NoticeAction {
    /// Print and clear the pending notice
    Pop,
}

fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockbook_cli=info,stockbook_store=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StoreConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    tracing::debug!(data_dir = %config.data_dir.display(), "Using data directory");

    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Inventory { action } => {
            let mut inventory = config.open_inventory();
            match action {
                InventoryAction::List => commands::inventory::list(&inventory, &mut out)?,
                InventoryAction::Add { name, price, stock } => {
                    commands::inventory::add(&mut inventory, &name, &price, &stock, &mut out)?;
                }
                InventoryAction::Edit {
                    target,
                    name,
                    price,
                    stock,
                } => {
                    let target = target.resolve()?;
                    commands::inventory::edit(
                        &mut inventory,
                        target,
                        &name,
                        &price,
                        &stock,
                        &mut out,
                    )?;
                }
                InventoryAction::Remove { target } => {
                    commands::inventory::remove(&mut inventory, target.resolve()?, &mut out)?;
                }
                InventoryAction::Total => commands::inventory::total(&inventory, &mut out)?,
            }
            commands::warn_if_unsaved(inventory.last_persistence_error(), &mut out)?;
        }
        Commands::Account { action } => {
            let mut credentials = config.open_credentials();
            match action {
                AccountAction::Register {
                    name,
                    username,
                    email,
                    password,
                    confirm,
                } => {
                    let registration =
                        stockbook_store::Registration::new(&name, &username, &email, &password)
                            .confirm(confirm.as_deref().unwrap_or(&password));
                    commands::account::register(&mut credentials, &registration, &mut out)?;
                }
                AccountAction::Login { username, password } => {
                    commands::account::login(&mut credentials, &username, &password, &mut out)?;
                }
                AccountAction::Logout => commands::account::logout(&mut credentials, &mut out)?,
                AccountAction::Whoami => commands::account::whoami(&credentials, &mut out)?,
                AccountAction::List => commands::account::list(&credentials, &mut out)?,
            }
            commands::warn_if_unsaved(credentials.last_persistence_error(), &mut out)?;
        }
        Commands::Notice { action } => match action {
            NoticeAction::Pop => {
                let credentials = config.open_credentials();
                commands::notice::pop(&credentials, &mut out)?;
            }
        },
    }
    Ok(())
}

impl RecordTarget {
    fn resolve(self) -> Result<commands::inventory::Target, commands::CommandError> {
        match (self.id, self.row) {
            (Some(id), _) => Ok(commands::inventory::Target::Id(id)),
            (None, Some(row)) => commands::inventory::Target::from_row(row),
            (None, None) => Err(commands::CommandError::MissingTarget),
        }
    }
}
