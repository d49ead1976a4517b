pub mod breast_cancer;
pub mod character;
pub mod feature_means;
pub mod metrics;

pub use breast_cancer::{BreastCancerPrediction, BreastCancerService, Diagnosis, BENIGN_CLASS};
pub use character::{CharacterPrediction, CharacterService};
pub use feature_means::{compute_feature_means, write_feature_means, DEFAULT_TARGET_COLUMN};
pub use metrics::Metrics;
