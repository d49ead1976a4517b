//! Feature reconciliation for the tabular classifier.
//!
//! A request may carry any subset of the training columns, in any order,
//! plus names the model has never seen. The mean table fixes the column
//! order the scaler was fit against and supplies the value for every column
//! the request leaves out.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

use crate::error::{PredictError, Result};
use crate::ml::artifact::read_json;

/// Current version of the explicit mean-table document.
pub const FEATURE_MEANS_VERSION: u32 = 1;

/// Request payload: feature name -> number, numeric string, `""` or `null`.
pub type FeatureMap = HashMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMean {
    pub name: String,
    pub mean: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VersionedFeatureMeans {
    version: u32,
    features: Vec<FeatureMean>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureMeansDocument {
    Versioned(VersionedFeatureMeans),
    /// `{name: mean}` in canonical order.
    Legacy(serde_json::Map<String, Value>),
}

/// Training-set means in canonical feature order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMeanTable {
    features: Vec<FeatureMean>,
}

impl FeatureMeanTable {
    pub fn new(features: Vec<FeatureMean>) -> std::result::Result<Self, String> {
        if features.is_empty() {
            return Err("feature mean table must not be empty".to_string());
        }
        let mut seen = HashSet::new();
        for feature in &features {
            if !seen.insert(feature.name.as_str()) {
                return Err(format!("feature '{}' appears twice", feature.name));
            }
            if !feature.mean.is_finite() {
                return Err(format!("mean for '{}' is not finite", feature.name));
            }
        }
        Ok(Self { features })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let document: FeatureMeansDocument = read_json(path)?;
        let features = match document {
            FeatureMeansDocument::Versioned(doc) => {
                if doc.version != FEATURE_MEANS_VERSION {
                    return Err(PredictError::artifact(
                        path,
                        format!("unsupported feature means version {}", doc.version),
                    ));
                }
                doc.features
            }
            FeatureMeansDocument::Legacy(map) => map
                .into_iter()
                .map(|(name, value)| match value.as_f64() {
                    Some(mean) => Ok(FeatureMean { name, mean }),
                    None => Err(PredictError::artifact(
                        path,
                        format!("mean for '{name}' is not a number"),
                    )),
                })
                .collect::<Result<Vec<_>>>()?,
        };
        Self::new(features).map_err(|e| PredictError::artifact(path, e))
    }

    /// Write the explicit, versioned form.
    pub fn save(&self, path: &Path) -> Result<()> {
        let doc = VersionedFeatureMeans {
            version: FEATURE_MEANS_VERSION,
            features: self.features.clone(),
        };
        let payload = serde_json::to_vec_pretty(&doc)?;
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.name.as_str())
    }

    pub fn mean(&self, name: &str) -> Option<f64> {
        self.features.iter().find(|f| f.name == name).map(|f| f.mean)
    }

    /// Build the model-order vector from a partial request.
    ///
    /// Names absent from the table are ignored unless `strict` is set.
    pub fn reconcile(&self, request: &FeatureMap, strict: bool) -> Result<Vec<f64>> {
        let unknown: Vec<&str> = request
            .keys()
            .map(String::as_str)
            .filter(|name| self.mean(name).is_none())
            .collect();
        if !unknown.is_empty() {
            if strict {
                let mut names = unknown;
                names.sort_unstable();
                return Err(PredictError::UnknownFeature(names.join(", ")));
            }
            debug!(ignored = ?unknown, "ignoring unrecognised feature names");
        }

        self.features
            .iter()
            .map(|feature| match request.get(&feature.name) {
                Some(value) => Ok(parse_feature_value(&feature.name, value)?.unwrap_or(feature.mean)),
                None => Ok(feature.mean),
            })
            .collect()
    }
}

/// `Ok(None)` means the caller left the feature blank.
fn parse_feature_value(name: &str, value: &Value) -> Result<Option<f64>> {
    let invalid = || PredictError::InvalidFeatureValue {
        feature: name.to_string(),
        value: value.to_string(),
    };

    let parsed = match value {
        Value::Null => return Ok(None),
        Value::String(s) if s.is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        Value::Number(n) => n.as_f64().ok_or_else(invalid)?,
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => return Err(invalid()),
    };

    if !parsed.is_finite() {
        return Err(PredictError::NonFiniteFeatureValue {
            feature: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(Some(parsed))
}
