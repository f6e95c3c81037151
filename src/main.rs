//! OmniMind NLU - Entry Point
//!
//! Spawned by the OmniMind shell. Loads the classifier, then answers one
//! JSON line on stdout for every command line on stdin. Diagnostics go to
//! stderr so stdout carries nothing but protocol output.

use omnimind_nlu::core::config::{ServerConfig, LOG_TARGET};
use omnimind_nlu::nlu::{CommandProcessor, InferenceClient, IntentCatalog};
use omnimind_nlu::server::LineServer;

use std::process::ExitCode;
use tokio::io::{self, BufReader};

fn main() -> ExitCode {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    // Single-threaded: each line finishes before the next is read
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(target: LOG_TARGET, "Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = ServerConfig::from_env();
    if config.api_token.is_none() {
        tracing::warn!(
            target: LOG_TARGET,
            "HF_API_TOKEN not set - inference requests are anonymous and may be refused or rate limited"
        );
    }
    let client = match rt.block_on(InferenceClient::connect(&config)) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(target: LOG_TARGET, "Error initializing classifier: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let processor = CommandProcessor::new(client, IntentCatalog::default());
    let mut server = LineServer::new(processor);

    let stdin = BufReader::new(io::stdin());
    match rt.block_on(server.run(stdin, io::stdout())) {
        Ok(reason) => {
            tracing::debug!(
                target: LOG_TARGET,
                "Stopped after {} responses ({:?})",
                server.lines_answered(),
                reason
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(target: LOG_TARGET, "Server loop failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
