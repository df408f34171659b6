//! Delimited-file loader for the water-quality training table.

use crate::dataset::schema::FeatureSchema;
use crate::dataset::{PassthroughColumn, RawDataset, TrainingDataset, DEFAULT_LABEL_COLUMN};
use crate::error::{PotabilityError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use ndarray::Array2;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads a header-first delimited table, separates the label column and
/// imputes missing feature values with column means.
///
/// Defaults: label column `potability` (matched case-insensitively),
/// delimiter `,`.
#[derive(Clone, Debug)]
pub struct DatasetLoader {
    label_column: String,
    delimiter: u8,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            delimiter: b',',
        }
    }

    pub fn label_column(mut self, name: impl Into<String>) -> Self {
        self.label_column = name.into();
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load and impute the table at `path`.
    ///
    /// # Errors
    /// [`PotabilityError::DataSourceNotFound`] if `path` does not exist, plus
    /// every error of [`DatasetLoader::load_from_bytes`].
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<TrainingDataset> {
        let path = path.as_ref();
        let dataset = self.read_raw(path)?.impute()?;
        info!(
            "loaded {} samples x {} features from {} (class counts {:?})",
            dataset.n_samples(),
            dataset.n_features(),
            path.display(),
            dataset.class_counts()
        );
        Ok(dataset)
    }

    /// Load and impute an in-memory table.
    pub fn load_from_bytes(&self, bytes: &[u8]) -> Result<TrainingDataset> {
        self.read_raw_from_bytes(bytes)?.impute()
    }

    /// Read the table at `path` without imputing.
    pub fn read_raw<P: AsRef<Path>>(&self, path: P) -> Result<RawDataset> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PotabilityError::DataSourceNotFound {
                path: path.to_path_buf(),
            },
            _ => PotabilityError::Io(e),
        })?;
        self.read_raw_from_bytes(&bytes)
    }

    /// Parse an in-memory table without imputing.
    ///
    /// # Errors
    /// - [`PotabilityError::MissingColumn`] if the label column is absent
    /// - [`PotabilityError::InvalidLabel`] if a label is not 0 or 1
    /// - [`PotabilityError::EmptyData`] if there are no data rows
    /// - [`PotabilityError::Csv`] for malformed rows
    pub fn read_raw_from_bytes(&self, bytes: &[u8]) -> Result<RawDataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        let label_idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(&self.label_column))
            .ok_or_else(|| PotabilityError::MissingColumn(self.label_column.clone()))?;

        let records: Vec<StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
        if records.is_empty() {
            return Err(PotabilityError::EmptyData(
                "source has a header but no data rows".to_string(),
            ));
        }

        let labels = records
            .iter()
            .enumerate()
            .map(|(row, record)| parse_label(row + 1, &record[label_idx]))
            .collect::<Result<Vec<u8>>>()?;

        let mut names = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();
        let mut passthrough = Vec::new();

        for (col, name) in headers.iter().enumerate().filter(|&(i, _)| i != label_idx) {
            match parse_numeric_column(&records, col) {
                Some(values) => {
                    names.push(name.to_string());
                    columns.push(values);
                }
                None => {
                    warn!("column {name:?} is not numeric; carried through without imputation");
                    passthrough.push(PassthroughColumn {
                        name: name.to_string(),
                        values: records.iter().map(|r| r[col].to_string()).collect(),
                    });
                }
            }
        }

        let features = Array2::from_shape_fn((records.len(), columns.len()), |(row, col)| {
            columns[col][row]
        });

        Ok(RawDataset {
            features,
            labels,
            schema: FeatureSchema::new(names)?,
            passthrough,
            fingerprint: self.fingerprint(bytes),
        })
    }

    /// Content hash, salted with the loader settings that shape the result.
    fn fingerprint(&self, bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.label_column.to_ascii_lowercase().as_bytes());
        hasher.update([0u8, self.delimiter]);
        hasher.update(bytes);
        hex::encode(hasher.finalize())
    }
}

/// `0`/`1` (or `0.0`/`1.0`). `row` is 1-based, header excluded.
fn parse_label(row: usize, cell: &str) -> Result<u8> {
    match cell.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(0),
        Ok(v) if v == 1.0 => Ok(1),
        _ => Err(PotabilityError::InvalidLabel {
            row,
            value: cell.to_string(),
        }),
    }
}

/// Column values with blanks as `NaN`, or `None` if a non-blank cell isn't a number.
fn parse_numeric_column(records: &[StringRecord], col: usize) -> Option<Vec<f64>> {
    records
        .iter()
        .map(|record| {
            let cell = record.get(col).unwrap_or("");
            if cell.is_empty() {
                Some(f64::NAN)
            } else {
                cell.parse::<f64>().ok()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::WATER_CSV;
    use std::io::Write;

    #[test]
    fn test_load_separates_label_and_keeps_column_order() {
        let ds = DatasetLoader::new().load_from_bytes(WATER_CSV.as_bytes()).unwrap();
        assert_eq!(ds.n_samples(), 10);
        assert_eq!(ds.schema(), &FeatureSchema::water_quality());
        assert_eq!(ds.labels(), &[0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
        assert_eq!(ds.class_counts(), [5, 5]);
    }

    #[test]
    fn test_imputation_removes_missing_and_preserves_means() {
        let loader = DatasetLoader::new();
        let raw = loader.read_raw_from_bytes(WATER_CSV.as_bytes()).unwrap();
        assert_eq!(raw.missing_count(), 4);
        assert_eq!(raw.missing_per_column()[0], 2);
        assert_eq!(raw.missing_per_column()[4], 2);

        let before = raw.observed_means();
        let ds = raw.impute().unwrap();
        assert_eq!(ds.missing_count(), 0);

        let after = ds.features().mean_axis(ndarray::Axis(0)).unwrap();
        for (b, a) in before.iter().zip(after.iter()) {
            assert!((b.unwrap() - a).abs() < 1e-9);
        }

        let ph_mean = (3.71 + 8.09 + 8.31 + 9.09 + 5.58 + 10.22 + 8.64 + 11.18) / 8.0;
        assert!((ds.features()[[0, 0]] - ph_mean).abs() < 1e-12);
        assert!((ds.features()[[8, 0]] - ph_mean).abs() < 1e-12);
    }

    #[test]
    fn test_load_is_idempotent() {
        let loader = DatasetLoader::new();
        let a = loader.load_from_bytes(WATER_CSV.as_bytes()).unwrap();
        let b = loader.load_from_bytes(WATER_CSV.as_bytes()).unwrap();
        let bits = |ds: &TrainingDataset| -> Vec<u64> {
            ds.features().iter().map(|v| v.to_bits()).collect()
        };
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(a.labels(), b.labels());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_missing_file_is_data_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("water_potability.csv");
        let err = DatasetLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, PotabilityError::DataSourceNotFound { path: p } if p == path));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(WATER_CSV.as_bytes()).unwrap();
        let from_file = DatasetLoader::new().load(file.path()).unwrap();
        let from_bytes = DatasetLoader::new().load_from_bytes(WATER_CSV.as_bytes()).unwrap();
        assert_eq!(from_file.features(), from_bytes.features());
        assert_eq!(from_file.fingerprint(), from_bytes.fingerprint());
    }

    #[test]
    fn test_label_column_is_case_insensitive_and_configurable() {
        let csv = "a,LABEL\n1.0,1\n2.0,0\n";
        let ds = DatasetLoader::new()
            .label_column("label")
            .load_from_bytes(csv.as_bytes())
            .unwrap();
        assert_eq!(ds.labels(), &[1, 0]);
        assert_eq!(ds.schema().names(), ["a"]);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv = "ph;potability\n7.0;1\n6.0;0\n";
        let ds = DatasetLoader::new()
            .delimiter(b';')
            .load_from_bytes(csv.as_bytes())
            .unwrap();
        assert_eq!(ds.n_samples(), 2);
    }

    #[test]
    fn test_missing_label_column() {
        let csv = "ph,Hardness\n7.0,100\n";
        assert!(matches!(
            DatasetLoader::new().load_from_bytes(csv.as_bytes()),
            Err(PotabilityError::MissingColumn(c)) if c == "potability"
        ));
    }

    #[test]
    fn test_invalid_and_blank_labels() {
        let csv = "ph,potability\n7.0,1\n6.0,yes\n";
        assert!(matches!(
            DatasetLoader::new().load_from_bytes(csv.as_bytes()),
            Err(PotabilityError::InvalidLabel { row: 2, .. })
        ));

        let blank = "ph,potability\n7.0,\n";
        assert!(matches!(
            DatasetLoader::new().load_from_bytes(blank.as_bytes()),
            Err(PotabilityError::InvalidLabel { row: 1, .. })
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "ph,potability\n";
        assert!(matches!(
            DatasetLoader::new().load_from_bytes(csv.as_bytes()),
            Err(PotabilityError::EmptyData(_))
        ));
    }

    #[test]
    fn test_non_numeric_column_is_passed_through() {
        let csv = "site,ph,potability\nnorth,7.0,1\n,6.0,0\nsouth,,1\n";
        let ds = DatasetLoader::new().load_from_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.schema().names(), ["ph"]);
        assert_eq!(ds.passthrough().len(), 1);
        assert_eq!(ds.passthrough()[0].name, "site");
        assert_eq!(ds.passthrough()[0].values, vec!["north", "", "south"]);
        assert_eq!(ds.features()[[2, 0]], 6.5);
    }

    #[test]
    fn test_ragged_rows_are_csv_errors() {
        let csv = "ph,potability\n7.0,1,extra\n";
        assert!(matches!(
            DatasetLoader::new().load_from_bytes(csv.as_bytes()),
            Err(PotabilityError::Csv(_))
        ));
    }
}
