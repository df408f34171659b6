//! Localized display strings.
//!
//! One lookup table keyed by [`Locale`] serves every presentation surface.
//! The decision logic never branches on locale; only the rendered text does.

use crate::feature::Feature;
use crate::prediction::Potability;
use crate::survey::{RiskReason, RiskTier};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Display language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    pub const fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ko => "ko",
        }
    }

    pub const fn tier_label(self, tier: RiskTier) -> &'static str {
        match (self, tier) {
            (Locale::En, RiskTier::High) => "High risk",
            (Locale::En, RiskTier::Caution) => "Caution advised",
            (Locale::En, RiskTier::Safe) => "Presumed safe",
            (Locale::Ko, RiskTier::High) => "높은 위험",
            (Locale::Ko, RiskTier::Caution) => "주의 필요",
            (Locale::Ko, RiskTier::Safe) => "안전 추정",
        }
    }

    pub const fn tier_summary(self, tier: RiskTier) -> &'static str {
        match (self, tier) {
            (Locale::En, RiskTier::High) => {
                "Several problems were found. You should avoid drinking this water."
            }
            (Locale::En, RiskTier::Caution) => {
                "There are some concerns. Take care before drinking this water."
            }
            (Locale::En, RiskTier::Safe) => {
                "No particular problems were found. The water looks fine to drink."
            }
            (Locale::Ko, RiskTier::High) => "여러 문제점이 발견되어 음용을 피해야 합니다.",
            (Locale::Ko, RiskTier::Caution) => {
                "몇 가지 우려 사항이 있어 음용 전 주의가 필요합니다."
            }
            (Locale::Ko, RiskTier::Safe) => {
                "특별한 문제는 발견되지 않았습니다. 마셔도 괜찮아 보입니다."
            }
        }
    }

    pub const fn reason_text(self, reason: RiskReason) -> &'static str {
        match (self, reason) {
            (Locale::En, RiskReason::Foaming) => "Possible pH imbalance (foaming)",
            (Locale::En, RiskReason::Discoloration) => "Iron oxide or rust in the water",
            (Locale::En, RiskReason::ChlorineOdor) => "Possible excess residual chlorine",
            (Locale::En, RiskReason::MetallicTaste) => {
                "Possible heavy metals or plumbing contamination"
            }
            (Locale::En, RiskReason::Odor) => "Possible microbial or organic contamination",
            (Locale::En, RiskReason::StaleTaste) => "Possible trihalomethanes (carcinogen)",
            (Locale::En, RiskReason::TurbidityExcess) => {
                "Turbidity excess (high concentration of particles)"
            }
            (Locale::Ko, RiskReason::Foaming) => "pH 불균형 가능성 (거품 발생)",
            (Locale::Ko, RiskReason::Discoloration) => "산화철 또는 녹이 섞인 물",
            (Locale::Ko, RiskReason::ChlorineOdor) => "잔류 염소 농도 과다 가능성",
            (Locale::Ko, RiskReason::MetallicTaste) => "중금속류 또는 배관 오염 가능성",
            (Locale::Ko, RiskReason::Odor) => "미생물 또는 유기물 오염 가능성",
            (Locale::Ko, RiskReason::StaleTaste) => "트리할로메탄(발암 물질) 가능성",
            (Locale::Ko, RiskReason::TurbidityExcess) => "탁도 과다 (이물질 농도 높음)",
        }
    }

    pub const fn feature_label(self, feature: Feature) -> &'static str {
        match (self, feature) {
            (Locale::En, Feature::Ph) => "pH",
            (Locale::En, Feature::Hardness) => "Hardness",
            (Locale::En, Feature::Solids) => "Total dissolved solids",
            (Locale::En, Feature::Chloramines) => "Chloramines",
            (Locale::En, Feature::Sulfate) => "Sulfate",
            (Locale::En, Feature::Conductivity) => "Conductivity",
            (Locale::En, Feature::OrganicCarbon) => "Organic carbon",
            (Locale::En, Feature::Trihalomethanes) => "Trihalomethanes",
            (Locale::En, Feature::Turbidity) => "Turbidity",
            (Locale::Ko, Feature::Ph) => "pH",
            (Locale::Ko, Feature::Hardness) => "경도",
            (Locale::Ko, Feature::Solids) => "총 용존 고형물",
            (Locale::Ko, Feature::Chloramines) => "클로라민",
            (Locale::Ko, Feature::Sulfate) => "황산염",
            (Locale::Ko, Feature::Conductivity) => "전기 전도도",
            (Locale::Ko, Feature::OrganicCarbon) => "유기 탄소",
            (Locale::Ko, Feature::Trihalomethanes) => "트리할로메탄",
            (Locale::Ko, Feature::Turbidity) => "탁도",
        }
    }

    pub const fn potability_label(self, label: Potability) -> &'static str {
        match (self, label) {
            (Locale::En, Potability::Potable) => "Potable",
            (Locale::En, Potability::NotPotable) => "Not potable",
            (Locale::Ko, Potability::Potable) => "마실 수 있음",
            (Locale::Ko, Potability::NotPotable) => "마실 수 없음",
        }
    }

    /// Heading shown above the list of triggered reasons.
    pub const fn reasons_heading(self) -> &'static str {
        match self {
            Locale::En => "Detected problems",
            Locale::Ko => "감지된 문제",
        }
    }

    /// Shown instead of the list when nothing was triggered.
    pub const fn all_clear(self) -> &'static str {
        match self {
            Locale::En => "All items look good!",
            Locale::Ko => "모든 항목이 양호합니다!",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unsupported locale code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown locale {0:?} (expected \"en\" or \"ko\")")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::En),
            "ko" | "ko-kr" | "korean" => Ok(Locale::Ko),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("KO-kr".parse::<Locale>(), Ok(Locale::Ko));
        let err = "fr".parse::<Locale>().unwrap_err();
        assert_eq!(err, UnknownLocale("fr".to_string()));
        assert_eq!(err.to_string(), r#"unknown locale "fr" (expected "en" or "ko")"#);
    }

    #[test]
    fn test_every_tier_has_distinct_summaries() {
        for locale in [Locale::En, Locale::Ko] {
            let summaries = [
                locale.tier_summary(RiskTier::Safe),
                locale.tier_summary(RiskTier::Caution),
                locale.tier_summary(RiskTier::High),
            ];
            assert_ne!(summaries[0], summaries[1]);
            assert_ne!(summaries[1], summaries[2]);
        }
    }

    #[test]
    fn test_feature_labels_cover_all_features() {
        for feature in Feature::ALL {
            assert!(!Locale::En.feature_label(feature).is_empty());
            assert!(!Locale::Ko.feature_label(feature).is_empty());
        }
    }
}
