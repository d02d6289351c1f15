#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for the tally survey service.
//!
//! ```text
//! tally serve [--bind 0.0.0.0] [--port 8080]
//! tally submit <survey.json>
//! tally stats <locality>
//! tally trend <locality>
//! tally localities <states|cities|areas|pincodes>
//! ```
//!
//! Every command uses the store selected by `STORE_BACKEND` and
//! `DATABASE_PATH`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_analytics::LocalityTerm;
use tally_analytics::stats::survey_stats_by_locality;
use tally_analytics::trends::ratings_over_time;
use tally_database::db::connect_from_env;
use tally_locality::registry::{LocalityCategory, list_display_values};
use tally_server::{ServerConfig, run_server};
use tally_survey_models::SurveySubmission;

#[derive(Parser)]
#[command(name = "tally", about = "Collect locality surveys and inspect their statistics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind to (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Store a survey read from a JSON file
    Submit {
        /// Path to a survey submission JSON file
        file: PathBuf,
    },
    /// Print aggregated statistics for a locality
    Stats {
        /// State, city, area, or pincode
        locality: String,
    },
    /// Print the daily rating series for a locality
    Trend {
        /// State, city, area, or pincode
        locality: String,
    },
    /// List known values of a locality field
    Localities {
        /// One of: states, cities, areas, pincodes
        category: LocalityCategory,
    },
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let store = connect_from_env().await?;

    match cli.command {
        Commands::Serve { bind, port } => {
            let mut config = ServerConfig::from_env();
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            run_server(config, store).await?;
        }
        Commands::Submit { file } => {
            let contents = std::fs::read_to_string(&file)?;
            let submission: SurveySubmission = serde_json::from_str(&contents)?;
            let id = tally_survey::submit(store.as_ref(), submission).await?;
            println!("Stored survey {id}");
        }
        Commands::Stats { locality } => {
            let term = LocalityTerm::parse(Some(locality.as_str()))?;
            let stats = survey_stats_by_locality(store.as_ref(), &term).await?;
            if stats.is_none() {
                log::info!("No surveys match '{locality}'");
            }
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Trend { locality } => {
            let term = LocalityTerm::parse(Some(locality.as_str()))?;
            let series = ratings_over_time(store.as_ref(), &term).await?;
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        Commands::Localities { category } => {
            for value in list_display_values(store.as_ref(), category).await? {
                println!("{value}");
            }
        }
    }

    Ok(())
}
