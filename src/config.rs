use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::preprocess::ResizeFilter;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub breast_cancer: BreastCancerConfig,
    #[serde(default)]
    pub character: CharacterConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily-rolling log files; console only when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreastCancerConfig {
    /// Serialized classifier
    #[serde(default = "default_bc_model")]
    pub model_path: PathBuf,
    /// Serialized standard scaler
    #[serde(default = "default_bc_scaler")]
    pub scaler_path: PathBuf,
    /// Feature mean table (defines canonical feature order)
    #[serde(default = "default_bc_means")]
    pub feature_means_path: PathBuf,
    /// Reject feature names that are not in the mean table
    #[serde(default)]
    pub reject_unknown_features: bool,
}

fn default_bc_model() -> PathBuf {
    PathBuf::from("models/breast_cancer/best_model.json")
}

fn default_bc_scaler() -> PathBuf {
    PathBuf::from("models/breast_cancer/scaler.json")
}

fn default_bc_means() -> PathBuf {
    PathBuf::from("models/breast_cancer/feature_means.json")
}

impl Default for BreastCancerConfig {
    fn default() -> Self {
        Self {
            model_path: default_bc_model(),
            scaler_path: default_bc_scaler(),
            feature_means_path: default_bc_means(),
            reject_unknown_features: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterConfig {
    /// Serialized classifier
    #[serde(default = "default_ch_model")]
    pub model_path: PathBuf,
    /// Serialized PCA transform
    #[serde(default = "default_ch_pca")]
    pub pca_path: PathBuf,
    /// Label encoder (encoded id -> dataset label)
    #[serde(default = "default_ch_encoder")]
    pub label_encoder_path: PathBuf,
    /// Dataset label -> display character
    #[serde(default = "default_ch_label_map")]
    pub label_map_path: PathBuf,
    /// Target image width in pixels
    #[serde(default = "default_image_side")]
    pub image_width: u32,
    /// Target image height in pixels
    #[serde(default = "default_image_side")]
    pub image_height: u32,
    /// Resampling filter used when resizing uploads
    #[serde(default)]
    pub resize_filter: ResizeFilter,
}

fn default_ch_model() -> PathBuf {
    PathBuf::from("models/character/optimized_model.json")
}

fn default_ch_pca() -> PathBuf {
    PathBuf::from("models/character/pca_transformer.json")
}

fn default_ch_encoder() -> PathBuf {
    PathBuf::from("models/character/label_encoder.json")
}

fn default_ch_label_map() -> PathBuf {
    PathBuf::from("models/character/emnist_label_map.json")
}

fn default_image_side() -> u32 {
    28
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            model_path: default_ch_model(),
            pca_path: default_ch_pca(),
            label_encoder_path: default_ch_encoder(),
            label_map_path: default_ch_label_map(),
            image_width: default_image_side(),
            image_height: default_image_side(),
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("server.port", 8000)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("PREDICTD_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (PREDICTD_SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("PREDICTD")
                    .separator("__")
                    .try_parsing(true),
            );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }

        if self.server.max_upload_bytes == 0 {
            errors.push("server.max_upload_bytes must be positive".to_string());
        }

        if self.character.image_width == 0 || self.character.image_height == 0 {
            errors.push(format!(
                "character image geometry must be non-empty, got {}x{}",
                self.character.image_width, self.character.image_height
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            breast_cancer: BreastCancerConfig::default(),
            character: CharacterConfig::default(),
        }
    }
}
