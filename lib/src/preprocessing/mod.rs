//! Data preprocessing applied to the training table before fitting.
//!
//! The only transformation is per-column mean imputation of missing values
//! ([`MeanImputer`]); it follows the fit → fitted → transform pattern of
//! [`Transformer`] and [`FittedTransformer`].

pub mod imputation;
pub mod traits;

pub use imputation::{FittedMeanImputer, MeanImputer};
pub use traits::{FittedTransformer, Transformer};
