mod main_runtime;

use anyhow::Context;
use clap::Parser;
use predictd::cli::{self, Cli, Commands};
use predictd::config::AppConfig;
use tracing::{error, info};

use main_runtime::{init_logging, init_logging_simple};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(&cli.config_dir).with_context(|| {
        format!(
            "failed to load configuration from {}",
            cli.config_dir.display()
        )
    })?;
    if let Err(errors) = config.validate() {
        anyhow::bail!("invalid configuration:\n  {}", errors.join("\n  "));
    }

    match &cli.command {
        Commands::ServeBreastCancer { port } => {
            init_logging(&config.logging);
            info!("Starting breast cancer prediction service");
            if let Err(e) = cli::serve_breast_cancer(&config, *port).await {
                error!("Breast cancer service failed: {}", e);
                return Err(e).context("breast cancer service failed");
            }
        }
        Commands::ServeCharacter { port } => {
            init_logging(&config.logging);
            info!("Starting character recognition service");
            if let Err(e) = cli::serve_character(&config, *port).await {
                error!("Character recognition service failed: {}", e);
                return Err(e).context("character recognition service failed");
            }
        }
        Commands::FeatureMeans { csv, target, out } => {
            init_logging_simple();
            cli::feature_means(csv, target, out)
                .with_context(|| format!("failed to compute feature means from {}", csv.display()))?;
        }
    }

    Ok(())
}
