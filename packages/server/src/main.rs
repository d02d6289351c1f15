#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Entry point for the tally API server.
//!
//! Configuration comes from the environment; see
//! [`tally_server::ServerConfig::from_env`] and
//! [`tally_database::db::connect_from_env`].

use tally_server::{ServerConfig, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Opening document store...");
    let store = tally_database::db::connect_from_env()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    run_server(ServerConfig::from_env(), store).await
}
