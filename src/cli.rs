use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::api::{
    self, create_breast_cancer_router, create_character_router, AppState, BREAST_CANCER_BANNER,
    CHARACTER_BANNER,
};
use crate::config::{AppConfig, ServerConfig};
use crate::error::{PredictError, Result};
use crate::services::{self, BreastCancerService, CharacterService, DEFAULT_TARGET_COLUMN};

#[derive(Parser)]
#[command(name = "predictd")]
#[command(version = "0.1.0")]
#[command(about = "Breast-cancer and handwritten-character prediction services", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding default.toml and per-environment overrides
    #[arg(short, long, default_value = "config", env = "PREDICTD_CONFIG_DIR")]
    pub config_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve breast-cancer predictions from tabular features
    ServeBreastCancer {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Serve handwritten-character predictions from uploaded images
    ServeCharacter {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Compute the feature-mean artifact from a training CSV
    FeatureMeans {
        /// Training data with a header row
        #[arg(long)]
        csv: PathBuf,
        /// Label column excluded from the means
        #[arg(long, default_value = DEFAULT_TARGET_COLUMN)]
        target: String,
        /// Where to write the feature means JSON
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn bind_addr(server: &ServerConfig, port: Option<u16>) -> Result<SocketAddr> {
    let port = port.unwrap_or(server.port);
    format!("{}:{}", server.host, port)
        .parse()
        .map_err(|e| PredictError::Validation(format!("invalid bind address {}: {e}", server.host)))
}

pub async fn serve_breast_cancer(config: &AppConfig, port: Option<u16>) -> Result<()> {
    let addr = bind_addr(&config.server, port)?;
    let service = BreastCancerService::load(&config.breast_cancer)?;
    let state = AppState::new(service, "breast_cancer", BREAST_CANCER_BANNER);
    api::serve(create_breast_cancer_router(state), addr).await
}

pub async fn serve_character(config: &AppConfig, port: Option<u16>) -> Result<()> {
    let addr = bind_addr(&config.server, port)?;
    let service = CharacterService::load(&config.character)?;
    let state = AppState::new(service, "character", CHARACTER_BANNER);
    api::serve(
        create_character_router(state, config.server.max_upload_bytes),
        addr,
    )
    .await
}

pub fn feature_means(csv: &Path, target: &str, out: &Path) -> Result<()> {
    let table = services::write_feature_means(csv, target, out)?;
    println!(
        "Feature means saved: {} features -> {}",
        table.len(),
        out.display()
    );
    Ok(())
}
