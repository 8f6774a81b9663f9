use anyhow::Context;
use booking_api::config::Config;
use booking_api::database::Database;
use booking_api::listing::ActivityListing;
use booking_api::search::{FilterRequest, UseCase};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "booking-api")]
#[command(about = "Activity catalog search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List activity occurrences matching the given filters, as JSON
    List {
        /// upcoming, past or all (defaults to BOOKING_USE_CASE)
        #[arg(long)]
        use_case: Option<String>,
        #[command(flatten)]
        filters: FilterRequest,
    },
    /// Tell whether an activity is new
    IsNew { activity_id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let database = match Database::new(&config.database_url).await {
        Ok(db) => {
            tracing::info!("Database initialized at {}", config.database_url);
            Arc::new(db)
        }
        Err(e) => {
            tracing::error!(
                "Failed to initialize database at {}: {:#}",
                config.database_url,
                e
            );
            return Err(e);
        }
    };
    let listing = ActivityListing::new(database.clone(), database.clone(), database);

    match cli.command {
        Commands::List { use_case, filters } => {
            let use_case: UseCase = use_case
                .as_deref()
                .unwrap_or(&config.default_use_case)
                .parse()?;
            let views = listing.list(&filters, use_case).await?;
            let json = serde_json::to_string_pretty(&views).context("Failed to encode listing")?;
            println!("{}", json);
        }
        Commands::IsNew { activity_id } => {
            let is_new = listing.is_new(activity_id).await?;
            println!("{}", is_new);
        }
    }

    Ok(())
}
