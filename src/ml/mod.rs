//! Model capabilities and the artifacts that implement them.
//!
//! The services only talk to `Classifier` and `FeatureTransform`; the
//! concrete models are deserialized from JSON exports (or ONNX graphs with
//! the `onnx` feature).

pub mod artifact;
pub mod dense;
pub mod labels;
pub mod linear;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod pca;
pub mod scaler;
pub mod traits;

pub use artifact::{
    load_classifier, load_label_encoder, load_label_map, load_pca, load_scaler,
    ClassifierArtifact,
};
pub use dense::{Activation, DenseClassifier, DenseLayer};
pub use labels::{LabelEncoder, LabelMap};
pub use linear::LinearClassifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use pca::{Pca, PcaArtifact};
pub use scaler::StandardScaler;
pub use traits::{Classifier, FeatureTransform};
