//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: unfitted, configurable; learns parameters from data.
//! - [`FittedTransformer`]: holds the learned parameters and applies them.

use crate::error::Result;

/// Trait for unfitted transformers.
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use potability::preprocessing::{FittedTransformer, MeanImputer, Transformer};
///
/// let data = array![[1.0, f64::NAN], [3.0, 4.0]];
/// let fitted = MeanImputer::new().fit(&data).unwrap();
/// let imputed = fitted.transform(&data).unwrap();
/// assert_eq!(imputed[[0, 1]], 4.0);
/// ```
pub trait Transformer {
    /// Input data type.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// The fitted transformer type.
    type Fitted: FittedTransformer<Input = Self::Input, Output = Self::Output>;

    /// Learn parameters from the training data.
    ///
    /// # Errors
    /// Returns an error if the data is empty or has an unusable shape.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;

    /// Fit and transform the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output> {
        self.fit(data)?.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
pub trait FittedTransformer {
    type Input;
    type Output;

    /// Transform data using the learned parameters.
    ///
    /// # Errors
    /// Returns an error if the input shape doesn't match the one seen at fit time.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;
}
