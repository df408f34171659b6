//! Training data: loading, imputation and the feature schema.
//!
//! # Core Concepts
//!
//! - [`RawDataset`]: the table as read from the source; missing cells are `NaN`.
//! - [`TrainingDataset`]: the same table after per-column mean imputation.
//!   It never contains missing values.
//! - [`FeatureSchema`]: the left-to-right order of feature columns, carried
//!   alongside the data and later alongside the trained model.
//!
//! # Example
//!
//! ```rust
//! use potability::dataset::DatasetLoader;
//!
//! let csv = "ph,Hardness,Potability\n7.0,200.0,1\n,180.0,0\n6.0,,1\n";
//! let dataset = DatasetLoader::new().load_from_bytes(csv.as_bytes()).unwrap();
//!
//! assert_eq!(dataset.n_samples(), 3);
//! assert_eq!(dataset.schema().names(), ["ph", "Hardness"]);
//! assert_eq!(dataset.missing_count(), 0);
//! assert_eq!(dataset.features()[[1, 0]], 6.5); // mean of 7.0 and 6.0
//! ```

use crate::dataset::schema::FeatureSchema;
use crate::error::Result;
use crate::preprocessing::imputation::column_means;
use crate::preprocessing::{FittedMeanImputer, FittedTransformer, MeanImputer, Transformer};
use ndarray::{Array2, Axis};
use sha2::{Digest, Sha256};

pub mod loader;
pub mod schema;

pub use self::loader::DatasetLoader;

/// Label column name expected by default.
pub const DEFAULT_LABEL_COLUMN: &str = "potability";

/// Ten rows of the reference table with four blank cells.
#[cfg(test)]
pub(crate) const WATER_CSV: &str = "\
ph,Hardness,Solids,Chloramines,Sulfate,Conductivity,Organic_carbon,Trihalomethanes,Turbidity,Potability
,204.89,20791.31,7.30,368.51,564.30,10.37,86.99,2.96,0
3.71,129.42,18630.05,6.63,,592.88,15.18,56.32,4.50,0
8.09,224.23,19909.54,9.27,,418.60,16.86,66.42,3.05,0
8.31,214.37,22018.41,8.05,356.88,363.26,18.43,100.34,4.62,0
9.09,181.10,17978.98,6.54,310.13,398.41,11.55,31.99,4.07,0
5.58,188.31,28748.68,7.54,326.67,280.46,8.39,54.91,2.55,1
10.22,248.07,28749.71,7.51,393.66,283.65,13.79,84.60,2.67,1
8.64,203.36,13672.09,4.56,303.31,474.61,12.36,62.80,4.40,1
,118.99,14285.58,7.80,268.64,389.38,12.71,53.93,3.60,1
11.18,227.23,25484.51,9.08,404.04,563.89,17.93,71.98,4.37,1
";

/// A non-numeric column, carried through loading untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassthroughColumn {
    pub name: String,
    pub values: Vec<String>,
}

/// A table as read from its source, before imputation.
#[derive(Clone, Debug)]
pub struct RawDataset {
    pub(crate) features: Array2<f64>,
    pub(crate) labels: Vec<u8>,
    pub(crate) schema: FeatureSchema,
    pub(crate) passthrough: Vec<PassthroughColumn>,
    pub(crate) fingerprint: String,
}

impl RawDataset {
    /// Feature matrix, `NaN` where the source cell was blank.
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of missing cells across all feature columns.
    pub fn missing_count(&self) -> usize {
        self.features.iter().filter(|v| v.is_nan()).count()
    }

    /// Missing cells per feature column, in schema order.
    pub fn missing_per_column(&self) -> Vec<usize> {
        self.features
            .axis_iter(Axis(1))
            .map(|c| c.iter().filter(|v| v.is_nan()).count())
            .collect()
    }

    /// Mean of each column over its observed values; `None` if nothing was observed.
    pub fn observed_means(&self) -> Vec<Option<f64>> {
        column_means(&self.features)
    }

    /// Replace every missing value with its column mean.
    pub fn impute(self) -> Result<TrainingDataset> {
        let imputer = MeanImputer::new().fit(&self.features)?;
        self.impute_with(&imputer)
    }

    /// Fill missing values with means learned elsewhere, e.g. on a training split.
    ///
    /// # Errors
    /// [`PotabilityError::FeatureMismatch`](crate::error::PotabilityError::FeatureMismatch)
    /// if `imputer` was fitted on a different number of columns.
    pub fn impute_with(self, imputer: &FittedMeanImputer) -> Result<TrainingDataset> {
        let features = imputer.transform(&self.features)?;
        Ok(TrainingDataset {
            features,
            labels: self.labels,
            schema: self.schema,
            imputation_means: imputer.statistics().to_vec(),
            passthrough: self.passthrough,
            fingerprint: self.fingerprint,
        })
    }

    /// Rows at `indices`, in that order, still unimputed. Indices out of bounds are skipped.
    pub fn subset(&self, indices: &[usize]) -> RawDataset {
        let indices = in_bounds(indices, self.n_samples());
        RawDataset {
            features: self.features.select(Axis(0), &indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            schema: self.schema.clone(),
            passthrough: select_passthrough(&self.passthrough, &indices),
            fingerprint: subset_fingerprint(&self.fingerprint, &indices),
        }
    }
}

fn in_bounds(indices: &[usize], n_rows: usize) -> Vec<usize> {
    indices.iter().copied().filter(|&i| i < n_rows).collect()
}

fn select_passthrough(columns: &[PassthroughColumn], indices: &[usize]) -> Vec<PassthroughColumn> {
    columns
        .iter()
        .map(|col| PassthroughColumn {
            name: col.name.clone(),
            values: indices.iter().map(|&i| col.values[i].clone()).collect(),
        })
        .collect()
}

fn subset_fingerprint(parent: &str, indices: &[usize]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(parent.as_bytes());
    for &i in indices {
        hasher.update((i as u64).to_le_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Imputed training table with binary labels.
///
/// Invariants: no feature value is `NaN`; `features.ncols() == schema.len()`;
/// `features.nrows() == labels.len()`; every label is 0 or 1.
#[derive(Clone, Debug)]
pub struct TrainingDataset {
    features: Array2<f64>,
    labels: Vec<u8>,
    schema: FeatureSchema,
    imputation_means: Vec<f64>,
    passthrough: Vec<PassthroughColumn>,
    fingerprint: String,
}

impl TrainingDataset {
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Labels, `1` = potable.
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Value substituted for missing cells in each column.
    pub fn imputation_means(&self) -> &[f64] {
        &self.imputation_means
    }

    /// Non-numeric columns found in the source.
    pub fn passthrough(&self) -> &[PassthroughColumn] {
        &self.passthrough
    }

    /// SHA-256 of the source content (hex). Equal content gives equal fingerprints.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Always 0 after imputation.
    pub fn missing_count(&self) -> usize {
        self.features.iter().filter(|v| v.is_nan()).count()
    }

    /// `[non-potable, potable]` sample counts.
    pub fn class_counts(&self) -> [usize; 2] {
        let potable = self.labels.iter().filter(|&&l| l == 1).count();
        [self.labels.len() - potable, potable]
    }

    /// Rows at `indices`, in that order. Indices out of bounds are skipped.
    ///
    /// The imputation means of the parent are kept, so the subset's values were
    /// filled using every parent row. Split a [`RawDataset`] instead when the
    /// parts must not share statistics. The fingerprint is derived from the
    /// parent's and the selected indices.
    pub fn subset(&self, indices: &[usize]) -> TrainingDataset {
        let indices = in_bounds(indices, self.n_samples());
        TrainingDataset {
            features: self.features.select(Axis(0), &indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            schema: self.schema.clone(),
            imputation_means: self.imputation_means.clone(),
            passthrough: select_passthrough(&self.passthrough, &indices),
            fingerprint: subset_fingerprint(&self.fingerprint, &indices),
        }
    }

    /// Build a dataset directly from an already complete matrix.
    ///
    /// Used for synthetic data and tests; `NaN`s are imputed like a loaded table.
    pub fn from_parts(
        features: Array2<f64>,
        labels: Vec<u8>,
        schema: FeatureSchema,
    ) -> Result<TrainingDataset> {
        use crate::error::PotabilityError;

        if features.ncols() != schema.len() {
            return Err(PotabilityError::FeatureMismatch {
                expected_features: schema.len(),
                got_features: features.ncols(),
            });
        }
        if features.nrows() != labels.len() {
            return Err(PotabilityError::InvalidParameter(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        if let Some(row) = labels.iter().position(|&l| l > 1) {
            return Err(PotabilityError::InvalidLabel {
                row: row + 1,
                value: labels[row].to_string(),
            });
        }

        let mut hasher = Sha256::new();
        for name in schema.names() {
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
        }
        for v in features.iter() {
            hasher.update(v.to_bits().to_le_bytes());
        }
        hasher.update(&labels);

        RawDataset {
            features,
            labels,
            schema,
            passthrough: Vec::new(),
            fingerprint: hex::encode(hasher.finalize()),
        }
        .impute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small_dataset() -> TrainingDataset {
        TrainingDataset::from_parts(
            array![[7.0, 100.0], [f64::NAN, 200.0], [5.0, 300.0], [6.0, f64::NAN]],
            vec![1, 0, 0, 1],
            FeatureSchema::new(["ph", "Hardness"]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_from_parts_imputes() {
        let ds = small_dataset();
        assert_eq!(ds.missing_count(), 0);
        assert_eq!(ds.features()[[1, 0]], 6.0);
        assert_eq!(ds.features()[[3, 1]], 200.0);
        assert_eq!(ds.imputation_means(), &[6.0, 200.0]);
        assert_eq!(ds.class_counts(), [2, 2]);
    }

    #[test]
    fn test_from_parts_rejects_bad_shapes_and_labels() {
        let schema = FeatureSchema::new(["ph", "Hardness"]).unwrap();
        assert!(TrainingDataset::from_parts(array![[1.0]], vec![0], schema.clone()).is_err());
        assert!(
            TrainingDataset::from_parts(array![[1.0, 2.0]], vec![0, 1], schema.clone()).is_err()
        );
        assert!(TrainingDataset::from_parts(array![[1.0, 2.0]], vec![2], schema).is_err());
    }

    #[test]
    fn test_subset_selects_rows_in_order() {
        let ds = small_dataset();
        let sub = ds.subset(&[2, 0, 99]);
        assert_eq!(sub.n_samples(), 2);
        assert_eq!(sub.labels(), &[0, 1]);
        assert_eq!(sub.features().row(0).to_vec(), vec![5.0, 300.0]);
        assert_eq!(sub.schema(), ds.schema());
        assert_ne!(sub.fingerprint(), ds.fingerprint());
    }

    #[test]
    fn test_raw_split_imputes_with_training_means() {
        let raw = RawDataset {
            features: array![[2.0], [f64::NAN], [4.0], [100.0], [f64::NAN]],
            labels: vec![0, 1, 0, 1, 1],
            schema: FeatureSchema::new(["ph"]).unwrap(),
            passthrough: vec![PassthroughColumn {
                name: "site".to_string(),
                values: ["a", "b", "c", "d", "e"].map(String::from).to_vec(),
            }],
            fingerprint: "parent".to_string(),
        };

        let train_raw = raw.subset(&[0, 1, 2]);
        let test_raw = raw.subset(&[3, 4, 7]);
        assert_eq!(test_raw.n_samples(), 2);
        assert_eq!(test_raw.passthrough[0].values, ["d", "e"]);
        assert_ne!(train_raw.fingerprint, test_raw.fingerprint);

        let imputer = MeanImputer::new().fit(train_raw.features()).unwrap();
        let train = train_raw.impute_with(&imputer).unwrap();
        let test = test_raw.impute_with(&imputer).unwrap();

        // The held-out 100.0 does not leak into the fill value.
        assert_eq!(train.imputation_means(), &[3.0]);
        assert_eq!(train.features()[[1, 0]], 3.0);
        assert_eq!(test.features()[[1, 0]], 3.0);
        assert_eq!(test.labels(), &[1, 1]);
    }

    #[test]
    fn test_fingerprint_is_content_based() {
        assert_eq!(small_dataset().fingerprint(), small_dataset().fingerprint());
    }
}
