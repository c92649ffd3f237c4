// src/main.rs
// pricebot - phone price lookup bot

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pricebot::{BotConfig, CatalogStore, ConversationHandler, config, db, telegram};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "pricebot")]
#[command(about = "Phone price lookup and catalog administration bot")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot (default)
    Serve,

    /// Look up a model the way a chat message would
    Lookup {
        /// Free-text model query
        query: String,

        /// Print matched records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the whole catalog
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(level: &str, verbose: bool) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        level.parse::<Level>().unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already be set
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let cli = Cli::parse();
    init_tracing(&config::log_level(), cli.verbose)?;
    if !dotenv_loaded {
        info!("no .env file found, using process environment");
    }

    let config = BotConfig::from_env().context("Failed to load configuration")?;

    let pool = db::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open catalog database {}", config.database_url))?;
    let store = CatalogStore::new(pool);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!(phones = store.count().await?, admin = %config.admin_id, "starting pricebot");
            let handler = ConversationHandler::new(store, &config);
            telegram::run(&config, handler).await?;
        }
        Commands::Lookup { query, json } => {
            if json {
                let records = store.find_by_substring(query.trim()).await?;
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                let handler = ConversationHandler::new(store, &config);
                let reply = handler.lookup(&query).await;
                println!("{}", reply.text);
            }
        }
        Commands::List { json } => {
            let phones = store.list_all().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&phones)?);
            } else {
                println!("{}", pricebot::conversation::format::listing(&phones));
            }
        }
    }

    Ok(())
}
