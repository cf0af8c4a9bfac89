//! # Stylist CLI (`stylist`)
//!
//! ## Usage
//!
//! ```bash
//! stylist --config ./config/stylist.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `stylist init` | Create the SQLite database and run schema migrations |
//! | `stylist catalog seed` | Load the demo catalog |
//! | `stylist catalog list` | Print the catalog |
//! | `stylist catalog add <file>` | Upsert products from a JSON array |
//! | `stylist catalog remove <id>` | Soft-delete a product |
//! | `stylist chat "<message>"` | Handle one utterance and print the reply |
//! | `stylist preferences` | Show the stored preferences of an identity |
//! | `stylist history` | Show the conversations of an identity |
//!
//! ## Examples
//!
//! ```bash
//! stylist init
//! stylist catalog seed
//! stylist chat --session demo "Tôi muốn kính tròn dưới 350k"
//! stylist preferences --session demo
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use stylist::chat_cmd::IdentityArgs;
use stylist::{catalog_cmd, chat_cmd, config, logging, migrate};

/// Stylist: a rule-based eyewear shopping assistant.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/stylist.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "stylist",
    about = "Rule-based eyewear shopping assistant",
    version,
    long_about = "Stylist extracts shopping preferences (style, face shape, color, price range, \
    keywords) from Vietnamese or English chat messages, remembers them per account or session, \
    and recommends matching frames from a SQLite catalog."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/stylist.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent; running it multiple times is safe.
    Init,

    /// Manage the product catalog.
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Send one chat message and print the assistant reply.
    ///
    /// Without `--account` or `--session`, a new anonymous session id is
    /// generated and printed.
    Chat {
        #[command(flatten)]
        who: WhoArgs,

        /// Continue an existing conversation instead of starting a new one.
        #[arg(long)]
        conversation: Option<i64>,

        /// Print the full reply as JSON.
        #[arg(long)]
        json: bool,

        /// The user's message.
        message: String,
    },

    /// Show the stored preferences of an account or session.
    Preferences {
        #[command(flatten)]
        who: WhoArgs,
    },

    /// Show recent conversations of an account or session.
    History {
        #[command(flatten)]
        who: WhoArgs,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load the demo categories and products.
    Seed,
    /// List products in catalog order.
    List {
        /// Include soft-deleted products.
        #[arg(long)]
        all: bool,
    },
    /// Upsert products from a JSON file holding an array of products.
    Add {
        path: PathBuf,
    },
    /// Soft-delete a product by id.
    Remove {
        id: String,
    },
}

#[derive(Args)]
struct WhoArgs {
    /// Authenticated account id.
    #[arg(long, conflicts_with = "session")]
    account: Option<String>,

    /// Anonymous session id.
    #[arg(long)]
    session: Option<String>,
}

impl From<WhoArgs> for IdentityArgs {
    fn from(args: WhoArgs) -> Self {
        IdentityArgs {
            account: args.account,
            session: args.session,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Catalog { action } => match action {
            CatalogAction::Seed => catalog_cmd::run_seed(&cfg).await?,
            CatalogAction::List { all } => catalog_cmd::run_list(&cfg, all).await?,
            CatalogAction::Add { path } => catalog_cmd::run_add(&cfg, &path).await?,
            CatalogAction::Remove { id } => catalog_cmd::run_remove(&cfg, &id).await?,
        },
        Commands::Chat {
            who,
            conversation,
            json,
            message,
        } => {
            chat_cmd::run_chat(&cfg, &who.into(), conversation, &message, json).await?;
        }
        Commands::Preferences { who } => {
            chat_cmd::run_preferences(&cfg, &who.into()).await?;
        }
        Commands::History { who } => {
            chat_cmd::run_history(&cfg, &who.into()).await?;
        }
    }

    Ok(())
}
