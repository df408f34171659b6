//! Ordered feature schema shared by training and prediction.

use crate::error::{PotabilityError, Result};
use crate::feature::Feature;
use serde::Serialize;
use std::collections::HashSet;

/// The ordered list of feature columns a model was trained on.
///
/// This is the single source of truth for column order: feature vectors are
/// assembled by walking the schema, and two schemas are compatible only when
/// they list the same names in the same order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from column names, left to right.
    ///
    /// # Errors
    /// [`PotabilityError::DuplicateFeature`] if a name repeats.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(PotabilityError::DuplicateFeature(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// The nine measurements in the reference dataset's column order.
    pub fn water_quality() -> Self {
        Self {
            names: Feature::ALL
                .iter()
                .map(|f| f.column_name().to_string())
                .collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Check that `other` lists exactly the same columns in the same order.
    pub fn ensure_matches(&self, other: &FeatureSchema) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(PotabilityError::FeatureOrderMismatch {
                expected: self.names.clone(),
                got: other.names.clone(),
            })
        }
    }

    /// Map every column to the measurement it names, keeping schema order.
    ///
    /// # Errors
    /// - [`PotabilityError::UnknownFeature`] for a column that names no measurement
    /// - [`PotabilityError::DuplicateFeature`] when two columns name the same one
    pub fn resolve_features(&self) -> Result<Vec<Feature>> {
        let mut seen = HashSet::with_capacity(self.names.len());
        self.names
            .iter()
            .map(|name| {
                let feature = Feature::from_column_name(name)
                    .ok_or_else(|| PotabilityError::UnknownFeature(name.clone()))?;
                if !seen.insert(feature) {
                    return Err(PotabilityError::DuplicateFeature(name.clone()));
                }
                Ok(feature)
            })
            .collect()
    }
}
