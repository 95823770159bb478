use serde::{Deserialize, Serialize};

use super::super::advice::AdviceKind;

pub(crate) const RED_FLAG_SCORE: u8 = 95;
/// Non-red-flag results stay strictly below `RED_FLAG_SCORE`.
pub(crate) const SYMPTOM_CEILING: u16 = 90;
pub(crate) const MODERATE_THRESHOLD: u8 = 40;
/// A clean respondent reads as "low", never as 0%.
pub(crate) const LOW_FLOOR: u8 = 10;

/// Primary classification of a scored assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
        }
    }
}

pub(crate) struct Tier {
    pub risk_level: RiskLevel,
    pub score: u8,
    pub primary_advice: AdviceKind,
}

pub(crate) fn decide_tier(has_red_flags: bool, symptom_total: u16) -> Tier {
    if has_red_flags {
        return Tier {
            risk_level: RiskLevel::High,
            score: RED_FLAG_SCORE,
            primary_advice: AdviceKind::Urgent,
        };
    }

    // The ceiling keeps the value inside u8.
    let score = symptom_total.min(SYMPTOM_CEILING) as u8;

    if score >= MODERATE_THRESHOLD {
        Tier {
            risk_level: RiskLevel::Moderate,
            score,
            primary_advice: AdviceKind::Medication,
        }
    } else {
        Tier {
            risk_level: RiskLevel::Low,
            score: score.max(LOW_FLOOR),
            primary_advice: AdviceKind::Lifestyle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(decide_tier(false, 40).risk_level, RiskLevel::Moderate);
        assert_eq!(decide_tier(false, 39).risk_level, RiskLevel::Low);
    }

    #[test]
    fn clamps_and_floors() {
        assert_eq!(decide_tier(false, 95).score, 90);
        assert_eq!(decide_tier(false, 0).score, 10);
        assert_eq!(decide_tier(false, 30).score, 30);
    }

    #[test]
    fn red_flags_ignore_the_symptom_total() {
        for total in [0, 39, 40, 95] {
            let tier = decide_tier(true, total);
            assert_eq!(tier.risk_level, RiskLevel::High);
            assert_eq!(tier.score, RED_FLAG_SCORE);
            assert_eq!(tier.primary_advice, AdviceKind::Urgent);
        }
    }
}
