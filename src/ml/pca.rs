use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::traits::{check_input_len, FeatureTransform};
use crate::error::Result;

/// Exported PCA parameters, as fit at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcaArtifact {
    /// Per-pixel training mean, length = n_features.
    pub mean: Vec<f64>,
    /// Principal axes, shape [n_components][n_features].
    pub components: Vec<Vec<f64>>,
    #[serde(default)]
    pub whiten: bool,
    /// Required when `whiten` is set, length = n_components.
    #[serde(default)]
    pub explained_variance: Option<Vec<f64>>,
}

/// Projection onto the principal axes: `(x - mean) · componentsᵀ`.
#[derive(Debug, Clone)]
pub struct Pca {
    mean: Array1<f64>,
    components: Array2<f64>,
    whiten_scale: Option<Array1<f64>>,
}

impl TryFrom<PcaArtifact> for Pca {
    type Error = String;

    fn try_from(artifact: PcaArtifact) -> std::result::Result<Self, String> {
        let n_features = artifact.mean.len();
        if n_features == 0 {
            return Err("mean must not be empty".to_string());
        }
        let n_components = artifact.components.len();
        if n_components == 0 {
            return Err("components must not be empty".to_string());
        }
        if let Some(r) = artifact.components.iter().position(|c| c.len() != n_features) {
            return Err(format!(
                "component {r} len {} != n_features {n_features}",
                artifact.components[r].len()
            ));
        }

        let whiten_scale = match (artifact.whiten, artifact.explained_variance) {
            (false, _) => None,
            (true, None) => return Err("whiten requires explained_variance".to_string()),
            (true, Some(var)) => {
                if var.len() != n_components {
                    return Err(format!(
                        "explained_variance len {} != n_components {n_components}",
                        var.len()
                    ));
                }
                if var.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                    return Err("explained_variance must be finite and > 0".to_string());
                }
                Some(Array1::from_iter(var.into_iter().map(f64::sqrt)))
            }
        };

        let flat: Vec<f64> = artifact.components.into_iter().flatten().collect();
        let components = Array2::from_shape_vec((n_components, n_features), flat)
            .map_err(|e| format!("components reshape failed: {e}"))?;

        Ok(Self {
            mean: Array1::from(artifact.mean),
            components,
            whiten_scale,
        })
    }
}

impl FeatureTransform for Pca {
    fn input_dim(&self) -> usize {
        self.mean.len()
    }

    fn output_dim(&self) -> usize {
        self.components.nrows()
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_input_len("Pca", input, self.mean.len())?;
        let centred = &ArrayView1::from(input) - &self.mean;
        let mut projected = self.components.dot(&centred);
        if let Some(scale) = &self.whiten_scale {
            projected /= scale;
        }
        Ok(projected.to_vec())
    }
}
