pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod ml;
pub mod preprocess;
pub mod services;

pub use config::AppConfig;
pub use error::{PredictError, Result};
pub use ml::{Classifier, FeatureTransform};
pub use preprocess::{FeatureMeanTable, ImageNormalizer};
pub use services::{BreastCancerService, CharacterService};
