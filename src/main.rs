//! Medrag CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medrag::cli::{Cli, Commands};
use medrag::infrastructure::config::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => medrag::cli::handle_error(&err.into(), cli.json),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Ingest(args) => {
            medrag::cli::commands::ingest::execute(args, &config, cli.json).await
        }
        Commands::Ask(args) => medrag::cli::commands::ask::execute(args, &config, cli.json).await,
        Commands::Experiment(args) => {
            medrag::cli::commands::experiment::execute(args, &config, cli.json).await
        }
        Commands::Status(args) => {
            medrag::cli::commands::status::execute(args, &config, cli.json).await
        }
    };

    if let Err(err) = result {
        medrag::cli::handle_error(&err, cli.json);
    }
}
