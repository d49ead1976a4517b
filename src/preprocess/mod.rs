//! Request preprocessing: the only stateful-looking logic in the services,
//! and all of it pure.

pub mod features;
pub mod imaging;

pub use features::{FeatureMap, FeatureMean, FeatureMeanTable, FEATURE_MEANS_VERSION};
pub use imaging::{correct_orientation, ImageNormalizer, ResizeFilter};
