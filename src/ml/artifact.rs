//! Loading serialized model artifacts from disk.
//!
//! Every loader reports failures as `PredictError::ArtifactLoad` naming the
//! offending file, so a service refuses to start on the first bad artifact.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::dense::DenseClassifier;
use super::labels::{LabelEncoder, LabelMap};
use super::linear::LinearClassifier;
use super::pca::{Pca, PcaArtifact};
use super::scaler::StandardScaler;
use super::traits::Classifier;
use crate::error::{PredictError, Result};

/// On-disk classifier description, tagged by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Linear(LinearClassifier),
    Dense(DenseClassifier),
    Onnx {
        /// Graph file, relative to the descriptor.
        path: PathBuf,
        input_dim: usize,
        classes: Vec<i64>,
    },
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).map_err(|e| PredictError::artifact(path, e))?;
    serde_json::from_str(&content).map_err(|e| PredictError::artifact(path, e))
}

pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>> {
    let artifact: ClassifierArtifact = read_json(path)?;
    let model: Arc<dyn Classifier> = match artifact {
        ClassifierArtifact::Linear(model) => {
            model.validate().map_err(|e| PredictError::artifact(path, e))?;
            Arc::new(model)
        }
        ClassifierArtifact::Dense(model) => {
            model.validate().map_err(|e| PredictError::artifact(path, e))?;
            Arc::new(model)
        }
        ClassifierArtifact::Onnx {
            path: graph,
            input_dim,
            classes,
        } => load_onnx(path, &graph, input_dim, classes)?,
    };
    info!(
        path = %path.display(),
        input_dim = model.input_dim(),
        classes = model.classes().len(),
        "loaded classifier"
    );
    Ok(model)
}

#[cfg(feature = "onnx")]
fn load_onnx(
    descriptor: &Path,
    graph: &Path,
    input_dim: usize,
    classes: Vec<i64>,
) -> Result<Arc<dyn Classifier>> {
    let graph = descriptor
        .parent()
        .map(|dir| dir.join(graph))
        .unwrap_or_else(|| graph.to_path_buf());
    Ok(Arc::new(super::onnx::OnnxClassifier::load(
        &graph, input_dim, classes,
    )?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(
    descriptor: &Path,
    _graph: &Path,
    _input_dim: usize,
    _classes: Vec<i64>,
) -> Result<Arc<dyn Classifier>> {
    Err(PredictError::artifact(
        descriptor,
        "onnx classifiers require building with the `onnx` feature",
    ))
}

pub fn load_scaler(path: &Path) -> Result<StandardScaler> {
    let scaler: StandardScaler = read_json(path)?;
    scaler.validate().map_err(|e| PredictError::artifact(path, e))?;
    info!(path = %path.display(), dim = scaler.mean.len(), "loaded scaler");
    Ok(scaler)
}

pub fn load_pca(path: &Path) -> Result<Pca> {
    let artifact: PcaArtifact = read_json(path)?;
    let pca = Pca::try_from(artifact).map_err(|e| PredictError::artifact(path, e))?;
    info!(path = %path.display(), "loaded PCA transform");
    Ok(pca)
}

pub fn load_label_encoder(path: &Path) -> Result<LabelEncoder> {
    let encoder: LabelEncoder = read_json(path)?;
    encoder.validate().map_err(|e| PredictError::artifact(path, e))?;
    info!(path = %path.display(), classes = encoder.len(), "loaded label encoder");
    Ok(encoder)
}

pub fn load_label_map(path: &Path) -> Result<LabelMap> {
    let raw: BTreeMap<String, String> = read_json(path)?;
    LabelMap::from_raw(raw).map_err(|e| PredictError::artifact(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_tagged_linear_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(
            &path,
            r#"{"kind": "linear", "classes": [0, 1], "coef": [[1.0, -1.0]], "intercept": [0.0]}"#,
        )
        .unwrap();

        let model = load_classifier(&path).unwrap();
        assert_eq!(model.input_dim(), 2);
        assert_eq!(model.class_index(1), Some(1));
    }

    #[test]
    fn invalid_shapes_fail_as_artifact_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(
            &path,
            r#"{"kind": "linear", "classes": [0, 1], "coef": [[1.0]], "intercept": []}"#,
        )
        .unwrap();

        assert!(matches!(
            load_classifier(&path),
            Err(PredictError::ArtifactLoad { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_scaler(&dir.path().join("absent.json")).unwrap_err();
        match err {
            PredictError::ArtifactLoad { path, .. } => assert!(path.ends_with("absent.json")),
            other => panic!("expected ArtifactLoad, got {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, r#"{"kind": "random_forest", "trees": []}"#).unwrap();
        assert!(load_classifier(&path).is_err());
    }

    #[test]
    fn label_map_with_bad_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        fs::write(&path, r#"{"10": "A", "x": "B"}"#).unwrap();
        assert!(matches!(
            load_label_map(&path),
            Err(PredictError::ArtifactLoad { .. })
        ));
    }
}
