use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod output;
mod scrape;

#[derive(Debug, Parser)]
#[command(name = "platerev-cli")]
#[command(about = "Restaurant review harvester command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape reviews for the configured restaurants
    Scrape(scrape::ScrapeArgs),
    /// List the configured restaurants without scraping
    Restaurants {
        /// Override the restaurant list path from configuration
        #[arg(long)]
        restaurants: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = platerev_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape(args) => scrape::run(&config, args).await,
        Commands::Restaurants { restaurants } => {
            let path = restaurants.unwrap_or_else(|| config.restaurants_path.clone());
            let list = platerev_core::load_restaurants(&path)?;
            for restaurant in &list {
                println!(
                    "{}  {}",
                    restaurant.slug(),
                    platerev_core::shorten(&restaurant.url, 70)
                );
            }
            println!("{} restaurants configured", list.len());
            Ok(())
        }
    }
}
