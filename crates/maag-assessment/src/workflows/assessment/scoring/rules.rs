use serde::{Deserialize, Serialize};

use super::super::advice::AdviceKind;
use super::super::answers::AnswerSet;

pub(crate) const YES: &str = "Ya";
pub(crate) const NO: &str = "Tidak";
pub(crate) const LONG_DURATION: &str = "> 3 hari";

#[derive(Debug, Clone, Copy)]
pub(crate) enum Condition {
    Equals(&'static str),
    /// Any answer other than the given one; an absent answer never matches.
    AnyBut(&'static str),
}

impl Condition {
    fn matches(self, answer: Option<&str>) -> bool {
        match (self, answer) {
            (Condition::Equals(expected), Some(value)) => value == expected,
            (Condition::AnyBut(excluded), Some(value)) => value != excluded,
            (_, None) => false,
        }
    }
}

pub(crate) struct SymptomWeight {
    pub question_id: &'static str,
    pub condition: Condition,
    pub points: u16,
}

pub(crate) const SYMPTOM_WEIGHTS: [SymptomWeight; 7] = [
    SymptomWeight {
        question_id: "heartburn",
        condition: Condition::Equals(YES),
        points: 20,
    },
    SymptomWeight {
        question_id: "burning_sensation",
        condition: Condition::Equals(YES),
        points: 20,
    },
    SymptomWeight {
        question_id: "bloating",
        condition: Condition::Equals(YES),
        points: 10,
    },
    SymptomWeight {
        question_id: "nausea",
        condition: Condition::AnyBut(NO),
        points: 10,
    },
    SymptomWeight {
        question_id: "vomiting",
        condition: Condition::AnyBut(NO),
        points: 15,
    },
    SymptomWeight {
        question_id: "early_satiety",
        condition: Condition::Equals(YES),
        points: 10,
    },
    SymptomWeight {
        question_id: "duration",
        condition: Condition::Equals(LONG_DURATION),
        points: 10,
    },
];

/// Trigger answer substrings and the advice they add, in emission order.
pub(crate) const TRIGGER_RULES: [(&str, AdviceKind); 3] = [
    ("Makan pedas", AdviceKind::Diet),
    ("Stres", AdviceKind::Mind),
    ("Telat makan", AdviceKind::Habit),
];

pub(crate) const TRIGGER_QUESTION: &str = "trigger";

/// Points one symptom answer contributed, kept for audit output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomContribution {
    pub question_id: String,
    pub answer: Option<String>,
    pub points: u16,
}

pub(crate) fn score_symptoms(answers: &AnswerSet) -> (Vec<SymptomContribution>, u16) {
    let mut contributions = Vec::with_capacity(SYMPTOM_WEIGHTS.len());
    let mut total: u16 = 0;

    for weight in &SYMPTOM_WEIGHTS {
        let answer = answers.scalar(weight.question_id);
        let points = if weight.condition.matches(answer) {
            weight.points
        } else {
            0
        };
        total += points;
        contributions.push(SymptomContribution {
            question_id: weight.question_id.to_string(),
            answer: answer.map(str::to_string),
            points,
        });
    }

    (contributions, total)
}

pub(crate) fn triggered_advice(answers: &AnswerSet) -> Vec<AdviceKind> {
    let Some(trigger) = answers.get(TRIGGER_QUESTION) else {
        return Vec::new();
    };

    TRIGGER_RULES
        .iter()
        .filter(|(needle, _)| trigger.mentions(needle))
        .map(|(_, kind)| *kind)
        .collect()
}
