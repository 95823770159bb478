mod policy;
mod rules;

pub use policy::RiskLevel;
pub use rules::SymptomContribution;

use serde::{Deserialize, Serialize};

use super::advice::{AdviceCatalog, AdviceEntry};
use super::answers::AnswerSet;
use policy::decide_tier;

/// Stateless scorer that turns a finished answer set into a risk tier and advice.
///
/// Scoring never fails: missing answers simply do not match any weighted condition.
#[derive(Debug, Clone)]
pub struct RiskScoringEngine {
    catalog: AdviceCatalog,
}

impl RiskScoringEngine {
    pub fn new(catalog: AdviceCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &AdviceCatalog {
        &self.catalog
    }

    pub fn score(&self, answers: &AnswerSet) -> ScoreResult {
        let has_red_flags = answers.has_red_flags();
        let symptom_total = if has_red_flags {
            0
        } else {
            rules::score_symptoms(answers).1
        };

        let tier = decide_tier(has_red_flags, symptom_total);

        let mut advice = vec![self.catalog.entry(tier.primary_advice)];
        advice.extend(
            rules::triggered_advice(answers)
                .into_iter()
                .map(|kind| self.catalog.entry(kind)),
        );

        ScoreResult {
            risk_level: tier.risk_level,
            score: tier.score,
            advice,
        }
    }

    /// Per-symptom points behind the symptom total, regardless of red flags.
    pub fn breakdown(&self, answers: &AnswerSet) -> Vec<SymptomContribution> {
        rules::score_symptoms(answers).0
    }
}

/// Outcome shown to the respondent and stored with the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub risk_level: RiskLevel,
    pub score: u8,
    pub advice: Vec<AdviceEntry>,
}
