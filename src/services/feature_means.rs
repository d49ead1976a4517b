//! Offline computation of the feature-mean artifact from a training CSV.

use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::error::{PredictError, Result};
use crate::preprocess::{FeatureMean, FeatureMeanTable};

/// Default name of the label column dropped before averaging.
pub const DEFAULT_TARGET_COLUMN: &str = "target";

/// Column-wise means of every non-target column, in CSV column order.
///
/// Empty cells are skipped; any other non-numeric cell is an error.
pub fn compute_feature_means<R: Read>(reader: R, target: &str) -> Result<FeatureMeanTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let target_idx = headers.iter().position(|h| h == target).ok_or_else(|| {
        PredictError::Validation(format!("target column '{target}' not found in CSV header"))
    })?;

    let columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target_idx)
        .map(|(i, name)| (i, name.to_string()))
        .collect();
    let mut sums = vec![0.0_f64; columns.len()];
    let mut counts = vec![0_u64; columns.len()];

    for (row_no, record) in rdr.records().enumerate() {
        let record = record?;
        for (slot, (idx, name)) in columns.iter().enumerate() {
            let cell = record.get(*idx).unwrap_or("");
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell.parse().map_err(|_| {
                PredictError::Validation(format!(
                    "row {}: column '{name}' has non-numeric value '{cell}'",
                    row_no + 1
                ))
            })?;
            sums[slot] += value;
            counts[slot] += 1;
        }
    }

    let features = columns
        .into_iter()
        .zip(sums.into_iter().zip(counts))
        .map(|((_, name), (sum, count))| {
            if count == 0 {
                return Err(PredictError::Validation(format!(
                    "column '{name}' has no values"
                )));
            }
            Ok(FeatureMean {
                name,
                mean: sum / count as f64,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    FeatureMeanTable::new(features).map_err(PredictError::Validation)
}

/// Read `csv_path`, compute the means and write the versioned artifact.
pub fn write_feature_means(csv_path: &Path, target: &str, out_path: &Path) -> Result<FeatureMeanTable> {
    let file = std::fs::File::open(csv_path)?;
    let table = compute_feature_means(file, target)?;
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    table.save(out_path)?;
    info!(
        features = table.len(),
        out = %out_path.display(),
        "feature means saved"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
mean radius,mean texture,target,mean area
10.0,20.0,0,500.0
14.0,,1,700.0
12.0,22.0,1,600.0
";

    #[test]
    fn averages_every_column_except_target() {
        let table = compute_feature_means(CSV.as_bytes(), "target").unwrap();

        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["mean radius", "mean texture", "mean area"]);
        assert_eq!(table.mean("mean radius"), Some(12.0));
        assert_eq!(table.mean("mean texture"), Some(21.0));
        assert_eq!(table.mean("mean area"), Some(600.0));
        assert_eq!(table.mean("target"), None);
    }

    #[test]
    fn missing_target_column_is_an_error() {
        assert!(compute_feature_means(CSV.as_bytes(), "diagnosis").is_err());
    }

    #[test]
    fn non_numeric_cell_is_an_error() {
        let csv = "a,target\n1.0,0\nabc,1\n";
        let err = compute_feature_means(csv.as_bytes(), "target").unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn writes_loadable_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("breast_cancer.csv");
        let out = dir.path().join("models").join("feature_means.json");
        std::fs::write(&csv_path, CSV).unwrap();

        let written = write_feature_means(&csv_path, "target", &out).unwrap();
        assert_eq!(FeatureMeanTable::load(&out).unwrap(), written);
    }
}
