//! Main entry point for the `cairn` command line.

use std::process::ExitCode;

use cairn_cli::{
    cli::Cli,
    commands,
    config::Configuration,
    logging::{self, LoggingConfig},
};
use cairn_client::ConsulClient;
use clap::Parser;
use tracing::{debug, error};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let _logging_guard = logging::init_logging(&LoggingConfig::from_env())?;

    let configuration = Configuration::load(&cli.global)?;
    let consul_config = configuration.consul_config()?;
    debug!("Using Consul agent at {}", consul_config.base_url());

    let client = ConsulClient::new(consul_config)?;
    let outcome = commands::execute(&client, cli.command).await.inspect_err(|e| {
        error!("Command failed: {:#}", e);
    })?;

    println!("{}", outcome.render()?);

    if outcome.succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
