//! The nine water-quality measurements and their column names.
//!
//! Column names found in a training source are resolved to [`Feature`]s
//! case-insensitively, ignoring `_`, `-` and spaces, so `Organic_carbon`,
//! `organic carbon` and `OrganicCarbon` all name the same measurement.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// A continuous water-quality measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Ph,
    Hardness,
    Solids,
    Chloramines,
    Sulfate,
    Conductivity,
    OrganicCarbon,
    Trihalomethanes,
    Turbidity,
}

impl Feature {
    /// All measurements in the canonical column order of the reference dataset.
    pub const ALL: [Feature; 9] = [
        Feature::Ph,
        Feature::Hardness,
        Feature::Solids,
        Feature::Chloramines,
        Feature::Sulfate,
        Feature::Conductivity,
        Feature::OrganicCarbon,
        Feature::Trihalomethanes,
        Feature::Turbidity,
    ];

    /// Column header used by the reference dataset.
    pub const fn column_name(self) -> &'static str {
        match self {
            Feature::Ph => "ph",
            Feature::Hardness => "Hardness",
            Feature::Solids => "Solids",
            Feature::Chloramines => "Chloramines",
            Feature::Sulfate => "Sulfate",
            Feature::Conductivity => "Conductivity",
            Feature::OrganicCarbon => "Organic_carbon",
            Feature::Trihalomethanes => "Trihalomethanes",
            Feature::Turbidity => "Turbidity",
        }
    }

    /// Measurement unit, empty for pH.
    pub const fn unit(self) -> &'static str {
        match self {
            Feature::Ph => "",
            Feature::Hardness => "mg/L",
            Feature::Solids => "ppm",
            Feature::Chloramines => "ppm",
            Feature::Sulfate => "mg/L",
            Feature::Conductivity => "μS/cm",
            Feature::OrganicCarbon => "ppm",
            Feature::Trihalomethanes => "μg/L",
            Feature::Turbidity => "NTU",
        }
    }

    /// Documented input range, used by input surfaces for widget bounds.
    ///
    /// Not enforced anywhere in this crate: out-of-range values are still
    /// accepted by the model.
    pub fn range(self) -> RangeInclusive<f64> {
        match self {
            Feature::Ph => 0.0..=14.0,
            Feature::Hardness => 50.0..=400.0,
            Feature::Solids => 5_000.0..=50_000.0,
            Feature::Chloramines => 0.0..=15.0,
            Feature::Sulfate => 100.0..=500.0,
            Feature::Conductivity => 100.0..=800.0,
            Feature::OrganicCarbon => 0.0..=30.0,
            Feature::Trihalomethanes => 0.0..=130.0,
            Feature::Turbidity => 0.0..=7.0,
        }
    }

    /// Resolve a column header to a measurement.
    pub fn from_column_name(name: &str) -> Option<Feature> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let feature = match key.as_str() {
            "ph" => Feature::Ph,
            "hardness" => Feature::Hardness,
            "solids" | "totaldissolvedsolids" | "tds" => Feature::Solids,
            "chloramines" | "chloramine" => Feature::Chloramines,
            "sulfate" | "sulphate" => Feature::Sulfate,
            "conductivity" => Feature::Conductivity,
            "organiccarbon" | "toc" => Feature::OrganicCarbon,
            "trihalomethanes" | "thm" => Feature::Trihalomethanes,
            "turbidity" => Feature::Turbidity,
            _ => return None,
        };
        Some(feature)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
