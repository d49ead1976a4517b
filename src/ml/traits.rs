//! Capabilities the prediction services need from a fitted model.

use crate::error::{PredictError, Result};

/// A fitted classifier over a fixed-width feature vector.
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Expected feature vector length.
    fn input_dim(&self) -> usize;

    /// Position of `class` in the probability vector, if the model knows it.
    fn class_index(&self, class: i64) -> Option<usize>;

    /// Class labels in probability-vector order.
    fn classes(&self) -> Vec<i64>;

    /// Per-class probabilities, ordered like `classes()`.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;

    /// Most probable class label.
    fn predict(&self, features: &[f64]) -> Result<i64> {
        let proba = self.predict_proba(features)?;
        let idx = argmax(&proba)
            .ok_or_else(|| PredictError::Internal("classifier produced no scores".to_string()))?;
        self.classes()
            .get(idx)
            .copied()
            .ok_or_else(|| PredictError::Internal(format!("class index {idx} out of range")))
    }
}

/// A fitted, deterministic vector transform (scaler, PCA, ...).
pub trait FeatureTransform: Send + Sync {
    fn input_dim(&self) -> usize;

    fn output_dim(&self) -> usize;

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>>;
}

pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

pub(crate) fn check_input_len(what: &str, input: &[f64], expected: usize) -> Result<()> {
    if input.len() != expected {
        return Err(PredictError::Internal(format!(
            "{what} input dim mismatch: got {}, expected {expected}",
            input.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_first_of_ties() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5, 0.1]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
