//! Mean imputation.
//!
//! Missing values are represented as `NaN`. Fitting computes the mean of each
//! column over its non-missing entries; transforming replaces every `NaN`
//! with its column's mean. Substituting the mean leaves each column's mean
//! unchanged.

use crate::error::{PotabilityError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use log::warn;
use ndarray::{Array2, Axis};

/// Column-mean imputer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct MeanImputer;

impl MeanImputer {
    pub fn new() -> Self {
        Self
    }
}

/// Mean of the non-NaN values of each column, `None` for all-missing columns.
pub(crate) fn column_means(data: &Array2<f64>) -> Vec<Option<f64>> {
    data.axis_iter(Axis(1))
        .map(|column| {
            let (sum, count) = column
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0, 0usize), |(sum, count), &v| (sum + v, count + 1));
            (count > 0).then(|| sum / count as f64)
        })
        .collect()
}

impl Transformer for MeanImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Fitted = FittedMeanImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        if data.nrows() == 0 {
            return Err(PotabilityError::EmptyData(
                "cannot fit MeanImputer on empty data".to_string(),
            ));
        }

        let statistics = column_means(data)
            .into_iter()
            .enumerate()
            .map(|(col, mean)| {
                mean.unwrap_or_else(|| {
                    warn!("column {col} has no observed values; imputing 0.0");
                    0.0
                })
            })
            .collect();

        Ok(FittedMeanImputer {
            statistics,
            n_features: data.ncols(),
        })
    }
}

/// Fitted mean imputer.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedMeanImputer {
    statistics: Vec<f64>,
    n_features: usize,
}

impl FittedMeanImputer {
    /// Fill value for each column.
    pub fn statistics(&self) -> &[f64] {
        &self.statistics
    }

    /// Consume the imputer, keeping only the fill values.
    pub fn into_statistics(self) -> Vec<f64> {
        self.statistics
    }
}

impl FittedTransformer for FittedMeanImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        if data.ncols() != self.n_features {
            return Err(PotabilityError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        let mut result = data.clone();
        for (mut column, &fill) in result.axis_iter_mut(Axis(1)).zip(&self.statistics) {
            column.mapv_inplace(|v| if v.is_nan() { fill } else { v });
        }
        Ok(result)
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}
