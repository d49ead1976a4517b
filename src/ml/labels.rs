use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{PredictError, Result};

/// Maps the compact ids a classifier was trained on back to dataset labels.
///
/// Encoded id `k` corresponds to `classes[k]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<i64>,
}

impl LabelEncoder {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.classes.is_empty() {
            return Err("classes must not be empty".to_string());
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.classes.iter().find(|c| !seen.insert(**c)) {
            return Err(format!("duplicate class {dup}"));
        }
        Ok(())
    }

    pub fn inverse_transform(&self, encoded: i64) -> Result<i64> {
        usize::try_from(encoded)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .copied()
            .ok_or(PredictError::UnknownLabel {
                stage: "label encoder",
                label: encoded,
            })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Dataset label id -> display character.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    labels: HashMap<i64, String>,
}

impl LabelMap {
    /// Parse the on-disk form, whose keys are string-encoded integers.
    pub fn from_raw(raw: BTreeMap<String, String>) -> std::result::Result<Self, String> {
        let mut labels = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            let id: i64 = key
                .trim()
                .parse()
                .map_err(|_| format!("label map key '{key}' is not an integer"))?;
            if labels.insert(id, value).is_some() {
                return Err(format!("label map key {id} appears twice"));
            }
        }
        if labels.is_empty() {
            return Err("label map must not be empty".to_string());
        }
        Ok(Self { labels })
    }

    pub fn resolve(&self, label: i64) -> Result<&str> {
        self.labels
            .get(&label)
            .map(String::as_str)
            .ok_or(PredictError::UnknownLabel {
                stage: "label map",
                label,
            })
    }

    pub fn contains(&self, label: i64) -> bool {
        self.labels.contains_key(&label)
    }
}

impl FromIterator<(i64, String)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}
