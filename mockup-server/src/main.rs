// Backend proxy for the mockup studio.
// Holds the upstream API key and exposes generate/edit endpoints to the browser.

mod config;
mod routes;
mod server;

use clap::Parser;
use mockup_ai::GeminiClient;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();

    // no key, no server
    let gemini = match config.validate() {
        Ok(gemini) => gemini,
        Err(err) => {
            error!(error = %err, "refusing to start");
            return ExitCode::FAILURE;
        }
    };

    match run(&config, gemini) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = ?err, "server stopped");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ServerConfig, gemini: mockup_ai::GeminiConfig) -> anyhow::Result<()> {
    info!(
        generate_model = %gemini.generate_model,
        edit_model = %gemini.edit_model,
        workers = config.workers,
        "starting mockup server"
    );
    let client = GeminiClient::new(gemini)?;
    server::serve(config, Arc::new(client))
}
