//! Rates CLI
//!
//! Command-line interface for the Rates API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use rates_client::RatesClient;
use rates_types::CurrencyPair;

#[derive(Parser)]
#[command(name = "rates")]
#[command(author, version, about = "Exchange rate API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Rates API
    #[arg(long, env = "RATES_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the rate for a currency pair
    Rate {
        /// Pair in BASE-QUOTE form, e.g. USD-EUR
        #[arg(value_parser = parse_pair)]
        pair: CurrencyPair,
        /// Amount of the base currency to convert
        #[arg(long)]
        amount: Option<f64>,
    },
    /// Check API health
    Health,
}

fn parse_pair(s: &str) -> Result<CurrencyPair, String> {
    CurrencyPair::parse(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = RatesClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }

        Commands::Rate { pair, amount } => {
            let resp = match amount {
                Some(amount) => client.convert(&pair, amount).await?,
                None => client.get_rate(&pair).await?,
            };
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
    }

    Ok(())
}
