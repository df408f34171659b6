//! Measurement-based potability prediction.
//!
//! A [`WaterSample`] names each of its nine measurements, so there is no
//! positional vector for a caller to get wrong: [`PredictionService::predict`]
//! assembles the model's input by walking the model's own [`FeatureSchema`].
//! Callers that already hold a positional vector must tag it with its schema
//! as a [`FeatureVector`]; a vector built for another column order is refused.

use crate::dataset::schema::FeatureSchema;
use crate::error::{PotabilityError, Result};
use crate::feature::Feature;
use crate::trainer::TrainedModel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicted class. `1` in the training labels is [`Potability::Potable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Potability {
    NotPotable,
    Potable,
}

impl Potability {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Potability::Potable
        } else {
            Potability::NotPotable
        }
    }

    pub fn label(self) -> u8 {
        match self {
            Potability::NotPotable => 0,
            Potability::Potable => 1,
        }
    }
}

impl fmt::Display for Potability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Potability::NotPotable => f.write_str("not potable"),
            Potability::Potable => f.write_str("potable"),
        }
    }
}

/// One water sample, one field per measurement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterSample {
    pub ph: f64,
    pub hardness: f64,
    pub solids: f64,
    pub chloramines: f64,
    pub sulfate: f64,
    pub conductivity: f64,
    pub organic_carbon: f64,
    pub trihalomethanes: f64,
    pub turbidity: f64,
}

impl WaterSample {
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Ph => self.ph,
            Feature::Hardness => self.hardness,
            Feature::Solids => self.solids,
            Feature::Chloramines => self.chloramines,
            Feature::Sulfate => self.sulfate,
            Feature::Conductivity => self.conductivity,
            Feature::OrganicCarbon => self.organic_carbon,
            Feature::Trihalomethanes => self.trihalomethanes,
            Feature::Turbidity => self.turbidity,
        }
    }

    /// First measurement that is NaN or infinite, if any.
    fn first_non_finite(&self) -> Option<(Feature, f64)> {
        Feature::ALL
            .iter()
            .map(|&f| (f, self.value(f)))
            .find(|(_, v)| !v.is_finite())
    }
}

/// `p0 + p1 == 1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClassProbabilities {
    pub p0: f64,
    pub p1: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Potability,
    pub probability: ClassProbabilities,
}

/// A positional feature vector that knows which column order it follows.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    /// # Errors
    /// [`PotabilityError::FeatureMismatch`] if `values` and `schema` differ in length.
    pub fn new(schema: FeatureSchema, values: Vec<f64>) -> Result<Self> {
        if schema.len() != values.len() {
            return Err(PotabilityError::FeatureMismatch {
                expected_features: schema.len(),
                got_features: values.len(),
            });
        }
        Ok(Self { schema, values })
    }

    /// Lay `sample` out in the order of `schema`.
    pub fn from_sample(schema: &FeatureSchema, sample: &WaterSample) -> Result<Self> {
        let values = schema
            .resolve_features()?
            .into_iter()
            .map(|f| sample.value(f))
            .collect();
        Ok(Self {
            schema: schema.clone(),
            values,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Stateless front end over a [`TrainedModel`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PredictionService;

impl PredictionService {
    /// Classify a sample.
    ///
    /// # Errors
    /// [`PotabilityError::NonFiniteMeasurement`] if any measurement is NaN or infinite.
    pub fn predict(model: &TrainedModel, sample: &WaterSample) -> Result<Prediction> {
        if let Some((feature, value)) = sample.first_non_finite() {
            return Err(PotabilityError::NonFiniteMeasurement {
                feature: feature.column_name(),
                value,
            });
        }
        let values: Vec<f64> = model.features().iter().map(|&f| sample.value(f)).collect();
        Ok(Self::vote(model, &values))
    }

    /// Classify several samples; stops at the first invalid one.
    pub fn predict_batch(model: &TrainedModel, samples: &[WaterSample]) -> Result<Vec<Prediction>> {
        samples.iter().map(|s| Self::predict(model, s)).collect()
    }

    /// Classify a positional vector.
    ///
    /// # Errors
    /// - [`PotabilityError::FeatureOrderMismatch`] if `vector` follows another column order
    /// - [`PotabilityError::NonFiniteMeasurement`] for a NaN or infinite value
    pub fn predict_vector(model: &TrainedModel, vector: &FeatureVector) -> Result<Prediction> {
        model.schema().ensure_matches(vector.schema())?;
        if let Some((i, &value)) = vector.values().iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(PotabilityError::NonFiniteMeasurement {
                feature: model.features()[i].column_name(),
                value,
            });
        }
        Ok(Self::vote(model, vector.values()))
    }

    fn vote(model: &TrainedModel, values: &[f64]) -> Prediction {
        let votes = model.forest().predict_votes(values);
        let [p0, p1] = votes.probabilities();
        Prediction {
            label: if p1 >= 0.5 {
                Potability::Potable
            } else {
                Potability::NotPotable
            },
            probability: ClassProbabilities { p0, p1 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetLoader, WATER_CSV};
    use crate::trainer::{ForestConfig, TrainingPipeline};

    fn model() -> TrainedModel {
        let dataset = DatasetLoader::new()
            .load_from_bytes(WATER_CSV.as_bytes())
            .unwrap();
        TrainingPipeline::new(ForestConfig::builder().n_trees(15).build())
            .train(&dataset)
            .unwrap()
    }

    fn sample() -> WaterSample {
        WaterSample {
            ph: 7.08,
            hardness: 196.37,
            solids: 22014.09,
            chloramines: 7.12,
            sulfate: 333.78,
            conductivity: 426.21,
            organic_carbon: 14.28,
            trihalomethanes: 66.40,
            turbidity: 3.97,
        }
    }

    #[test]
    fn test_probabilities_sum_to_one_and_label_follows_p1() {
        let model = model();
        for ph in [3.0, 6.0, 7.0, 9.0, 12.0] {
            let prediction = PredictionService::predict(&model, &WaterSample { ph, ..sample() }).unwrap();
            let p = prediction.probability;
            assert!((p.p0 + p.p1 - 1.0).abs() < 1e-12);
            assert!((0.0..=1.0).contains(&p.p1));
            assert_eq!(prediction.label == Potability::Potable, p.p1 >= 0.5);
        }
    }

    #[test]
    fn test_named_sample_matches_vector_in_model_order() {
        let model = model();
        let vector = FeatureVector::from_sample(model.schema(), &sample()).unwrap();
        assert_eq!(
            PredictionService::predict(&model, &sample()).unwrap(),
            PredictionService::predict_vector(&model, &vector).unwrap()
        );
    }

    #[test]
    fn test_column_order_of_source_does_not_matter() {
        // Same table with the first two columns swapped.
        let swapped: String = WATER_CSV
            .lines()
            .map(|line| {
                let mut cells: Vec<&str> = line.split(',').collect();
                cells.swap(0, 1);
                cells.join(",") + "\n"
            })
            .collect();
        let dataset = DatasetLoader::new()
            .load_from_bytes(swapped.as_bytes())
            .unwrap();
        let swapped_model = TrainingPipeline::new(ForestConfig::builder().n_trees(15).build())
            .train(&dataset)
            .unwrap();
        assert_eq!(swapped_model.schema().names()[0], "Hardness");

        let prediction = PredictionService::predict(&swapped_model, &sample()).unwrap();
        let vector = FeatureVector::from_sample(swapped_model.schema(), &sample()).unwrap();
        assert_eq!(vector.values()[0], sample().hardness);
        assert_eq!(
            prediction,
            PredictionService::predict_vector(&swapped_model, &vector).unwrap()
        );
    }

    #[test]
    fn test_vector_in_wrong_order_is_refused() {
        let model = model();
        let mut names: Vec<String> = model.schema().names().to_vec();
        names.swap(0, 1);
        let reordered = FeatureSchema::new(names).unwrap();
        let vector = FeatureVector::from_sample(&reordered, &sample()).unwrap();

        assert!(matches!(
            PredictionService::predict_vector(&model, &vector),
            Err(PotabilityError::FeatureOrderMismatch { .. })
        ));
    }

    #[test]
    fn test_non_finite_measurement_is_rejected() {
        let model = model();
        let err = PredictionService::predict(
            &model,
            &WaterSample {
                sulfate: f64::NAN,
                ..sample()
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PotabilityError::NonFiniteMeasurement { feature: "Sulfate", .. }
        ));

        let mut values = FeatureVector::from_sample(model.schema(), &sample())
            .unwrap()
            .values()
            .to_vec();
        values[8] = f64::INFINITY;
        let vector = FeatureVector::new(model.schema().clone(), values).unwrap();
        assert!(PredictionService::predict_vector(&model, &vector).is_err());
    }

    #[test]
    fn test_out_of_range_values_are_still_accepted() {
        let model = model();
        let extreme = WaterSample {
            ph: 20.0,
            solids: 1e9,
            ..sample()
        };
        assert!(PredictionService::predict(&model, &extreme).is_ok());
    }

    #[test]
    fn test_feature_vector_length_checked() {
        assert!(matches!(
            FeatureVector::new(FeatureSchema::water_quality(), vec![1.0; 3]),
            Err(PotabilityError::FeatureMismatch {
                expected_features: 9,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_batch_prediction() {
        let model = model();
        let predictions = PredictionService::predict_batch(&model, &[sample(), sample()]).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0], predictions[1]);
    }

    #[test]
    fn test_potability_labels() {
        assert_eq!(Potability::from_label(1), Potability::Potable);
        assert_eq!(Potability::from_label(0), Potability::NotPotable);
        assert_eq!(Potability::Potable.label(), 1);
        assert_eq!(Potability::NotPotable.to_string(), "not potable");
    }
}
