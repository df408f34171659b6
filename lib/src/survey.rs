//! Rule-based risk evaluation of a qualitative water survey.
//!
//! Six yes/no observations plus a turbidity proxy are turned into a
//! [`RiskAssessment`]: every triggered indicator contributes one
//! [`RiskReason`], and the number of reasons selects the [`RiskTier`].
//!
//! | reasons | tier                  |
//! |---------|-----------------------|
//! | 0       | [`RiskTier::Safe`]    |
//! | 1–2     | [`RiskTier::Caution`] |
//! | ≥ 3     | [`RiskTier::High`]    |
//!
//! # Example
//! ```rust
//! use potability::survey::{RuleBasedRiskEvaluator, RiskTier, SurveyAnswer};
//!
//! let answer = SurveyAnswer {
//!     foaming: true,
//!     discoloration: true,
//!     chlorine_odor: true,
//!     turbidity_proxy: 10_000,
//!     ..SurveyAnswer::default()
//! };
//! let assessment = RuleBasedRiskEvaluator::default().evaluate(&answer);
//! assert_eq!(assessment.tier, RiskTier::High);
//! assert_eq!(assessment.risk_count(), 3);
//! ```

use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A turbidity proxy strictly above this value is a concern.
pub const TURBIDITY_PROXY_THRESHOLD: i64 = 30_000;

/// Reason count from which a survey is classified [`RiskTier::High`].
pub const HIGH_RISK_MIN_REASONS: usize = 3;

/// Answers to the water survey.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyAnswer {
    /// Water foams noticeably.
    pub foaming: bool,
    /// Water is reddish or brown.
    pub discoloration: bool,
    /// Strong disinfectant (chlorine) smell.
    pub chlorine_odor: bool,
    /// Metallic taste.
    pub metallic_taste: bool,
    /// Any other smell.
    pub odor: bool,
    /// Stale or unpleasant taste.
    pub stale_taste: bool,
    /// How cloudy the water looks, on the survey's 0–50000 scale.
    pub turbidity_proxy: i64,
}

impl SurveyAnswer {
    /// Domain offered by the survey slider. Values outside it are still evaluated.
    pub const TURBIDITY_PROXY_RANGE: RangeInclusive<i64> = 0..=50_000;
}

/// A triggered concern, in the order the evaluator checks them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskReason {
    Foaming,
    Discoloration,
    ChlorineOdor,
    MetallicTaste,
    Odor,
    StaleTaste,
    TurbidityExcess,
}

impl RiskReason {
    /// Stable machine-readable code.
    pub const fn code(self) -> &'static str {
        match self {
            RiskReason::Foaming => "foaming",
            RiskReason::Discoloration => "discoloration",
            RiskReason::ChlorineOdor => "chlorine_odor",
            RiskReason::MetallicTaste => "metallic_taste",
            RiskReason::Odor => "odor",
            RiskReason::StaleTaste => "stale_taste",
            RiskReason::TurbidityExcess => "turbidity_excess",
        }
    }
}

/// Severity bucket. Ordered `Safe < Caution < High`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Safe,
    Caution,
    High,
}

impl RiskTier {
    /// Tier for a given number of triggered reasons.
    pub const fn from_count(risk_count: usize) -> Self {
        match risk_count {
            0 => RiskTier::Safe,
            n if n >= HIGH_RISK_MIN_REASONS => RiskTier::High,
            _ => RiskTier::Caution,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RiskTier::Safe => "safe",
            RiskTier::Caution => "caution",
            RiskTier::High => "high",
        }
    }
}

/// Outcome of one survey evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    /// Fixed sentence for the tier, in the evaluator's locale.
    pub summary: String,
    pub reasons: Vec<RiskReason>,
}

impl RiskAssessment {
    /// Number of triggered reasons.
    pub fn risk_count(&self) -> usize {
        self.reasons.len()
    }
}

/// Stateless survey evaluator.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBasedRiskEvaluator {
    locale: Locale,
}

impl RuleBasedRiskEvaluator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Evaluate one survey. Pure and infallible.
    pub fn evaluate(&self, answer: &SurveyAnswer) -> RiskAssessment {
        let indicators = [
            (answer.foaming, RiskReason::Foaming),
            (answer.discoloration, RiskReason::Discoloration),
            (answer.chlorine_odor, RiskReason::ChlorineOdor),
            (answer.metallic_taste, RiskReason::MetallicTaste),
            (answer.odor, RiskReason::Odor),
            (answer.stale_taste, RiskReason::StaleTaste),
            (
                answer.turbidity_proxy > TURBIDITY_PROXY_THRESHOLD,
                RiskReason::TurbidityExcess,
            ),
        ];

        let reasons: Vec<RiskReason> = indicators
            .into_iter()
            .filter_map(|(triggered, reason)| triggered.then_some(reason))
            .collect();

        let tier = RiskTier::from_count(reasons.len());
        RiskAssessment {
            tier,
            summary: self.locale.tier_summary(tier).to_string(),
            reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_from_bits(bits: u8, turbidity_proxy: i64) -> SurveyAnswer {
        SurveyAnswer {
            foaming: bits & 0b000001 != 0,
            discoloration: bits & 0b000010 != 0,
            chlorine_odor: bits & 0b000100 != 0,
            metallic_taste: bits & 0b001000 != 0,
            odor: bits & 0b010000 != 0,
            stale_taste: bits & 0b100000 != 0,
            turbidity_proxy,
        }
    }

    #[test]
    fn test_no_indicators_is_safe() {
        let evaluator = RuleBasedRiskEvaluator::default();
        for proxy in [0, 15_000, 30_000] {
            let assessment = evaluator.evaluate(&answer_from_bits(0, proxy));
            assert_eq!(assessment.tier, RiskTier::Safe);
            assert!(assessment.reasons.is_empty());
        }
    }

    #[test]
    fn test_three_indicators_is_high() {
        let answer = SurveyAnswer {
            foaming: true,
            discoloration: true,
            chlorine_odor: true,
            turbidity_proxy: 10_000,
            ..SurveyAnswer::default()
        };
        let assessment = RuleBasedRiskEvaluator::default().evaluate(&answer);
        assert_eq!(assessment.tier, RiskTier::High);
        assert_eq!(
            assessment.reasons,
            vec![
                RiskReason::Foaming,
                RiskReason::Discoloration,
                RiskReason::ChlorineOdor
            ]
        );
    }

    #[test]
    fn test_turbidity_alone_is_caution() {
        let assessment = RuleBasedRiskEvaluator::default().evaluate(&answer_from_bits(0, 35_000));
        assert_eq!(assessment.tier, RiskTier::Caution);
        assert_eq!(assessment.reasons, vec![RiskReason::TurbidityExcess]);
        assert_eq!(assessment.reasons[0].code(), "turbidity_excess");
    }

    #[test]
    fn test_turbidity_boundary_is_exclusive() {
        let evaluator = RuleBasedRiskEvaluator::default();
        assert!(evaluator.evaluate(&answer_from_bits(0, 30_000)).reasons.is_empty());
        assert_eq!(evaluator.evaluate(&answer_from_bits(0, 30_001)).risk_count(), 1);
    }

    #[test]
    fn test_out_of_range_proxy_is_still_compared() {
        let evaluator = RuleBasedRiskEvaluator::default();
        assert_eq!(evaluator.evaluate(&answer_from_bits(0, -5)).tier, RiskTier::Safe);
        assert_eq!(
            evaluator.evaluate(&answer_from_bits(0, 1_000_000)).tier,
            RiskTier::Caution
        );
    }

    #[test]
    fn test_all_inputs_count_and_monotonic_tier() {
        let evaluator = RuleBasedRiskEvaluator::default();
        for proxy in [0, 30_000, 30_001, 50_000] {
            for bits in 0u8..64 {
                let assessment = evaluator.evaluate(&answer_from_bits(bits, proxy));
                let expected = bits.count_ones() as usize + usize::from(proxy > 30_000);
                assert_eq!(assessment.risk_count(), expected);
                assert_eq!(assessment.tier, RiskTier::from_count(expected));
            }
        }

        let tiers: Vec<RiskTier> = (0..=7).map(RiskTier::from_count).collect();
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(tiers[0], RiskTier::Safe);
        assert_eq!(tiers[1], RiskTier::Caution);
        assert_eq!(tiers[2], RiskTier::Caution);
        assert_eq!(tiers[3], RiskTier::High);
    }

    #[test]
    fn test_reason_order_is_fixed() {
        let assessment =
            RuleBasedRiskEvaluator::default().evaluate(&answer_from_bits(0b111111, 40_000));
        let codes: Vec<&str> = assessment.reasons.iter().map(|r| r.code()).collect();
        assert_eq!(
            codes,
            vec![
                "foaming",
                "discoloration",
                "chlorine_odor",
                "metallic_taste",
                "odor",
                "stale_taste",
                "turbidity_excess"
            ]
        );
    }

    #[test]
    fn test_summary_follows_locale() {
        let answer = answer_from_bits(0, 0);
        let en = RuleBasedRiskEvaluator::new(Locale::En).evaluate(&answer);
        let ko = RuleBasedRiskEvaluator::new(Locale::Ko).evaluate(&answer);
        assert_eq!(en.summary, Locale::En.tier_summary(RiskTier::Safe));
        assert_eq!(ko.summary, Locale::Ko.tier_summary(RiskTier::Safe));
        assert_ne!(en.summary, ko.summary);
    }
}
