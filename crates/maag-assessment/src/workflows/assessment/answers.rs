use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::checklist::ChecklistPolicy;
use super::schema::{QuestionnaireSchema, SectionKind};

/// A single answer: one picked option, or the checklist selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Scalar(String),
    Checklist(Vec<String>),
}

impl AnswerValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            AnswerValue::Scalar(value) => Some(value),
            AnswerValue::Checklist(_) => None,
        }
    }

    pub fn as_checklist(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Checklist(values) => Some(values),
            AnswerValue::Scalar(_) => None,
        }
    }

    /// Substring match for scalars; any-element substring match for lists.
    pub fn mentions(&self, needle: &str) -> bool {
        match self {
            AnswerValue::Scalar(value) => value.contains(needle),
            AnswerValue::Checklist(values) => values.iter().any(|value| value.contains(needle)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Scalar(value) => value.is_empty(),
            AnswerValue::Checklist(values) => values.is_empty(),
        }
    }
}

/// Rejections raised while binding raw answers to a questionnaire.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("answer for unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("question '{question_id}' expects a {expected} answer")]
    ShapeMismatch {
        question_id: String,
        expected: &'static str,
    },
    #[error("checklist answer '{question_id}' repeats '{option}'")]
    DuplicateSelection { question_id: String, option: String },
    #[error("checklist answer '{question_id}' combines '{exclusive_option}' with other options")]
    ExclusiveConflict {
        question_id: String,
        exclusive_option: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChecklistSlot {
    question_id: String,
    policy: ChecklistPolicy,
}

/// Answers of one respondent, keyed by question id.
///
/// A set created through [`AnswerSet::for_schema`] or [`AnswerSet::resolve`] knows which
/// question is the red-flag checklist and what its exclusive option is. An unbound set (the
/// `Default`) has no checklist, so red flags never fire for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    values: BTreeMap<String, AnswerValue>,
    checklist: Option<ChecklistSlot>,
}

impl AnswerSet {
    pub fn for_schema(schema: &QuestionnaireSchema) -> Self {
        let question = schema.checklist_question();
        Self {
            values: BTreeMap::new(),
            checklist: ChecklistPolicy::for_question(question).map(|policy| ChecklistSlot {
                question_id: question.id.clone(),
                policy,
            }),
        }
    }

    /// Bind a loosely keyed answer map to `schema`, checking ids and answer shapes.
    ///
    /// A checklist that names the exclusive option next to anything else is rejected rather
    /// than repaired.
    pub fn resolve(
        schema: &QuestionnaireSchema,
        raw: BTreeMap<String, AnswerValue>,
    ) -> Result<Self, AnswerError> {
        let mut answers = Self::for_schema(schema);

        for (question_id, value) in raw {
            let (section, _) = schema
                .find_question(&question_id)
                .ok_or_else(|| AnswerError::UnknownQuestion(question_id.clone()))?;

            match (section.kind, &value) {
                (SectionKind::Standard, AnswerValue::Scalar(_)) => {}
                (SectionKind::Standard, AnswerValue::Checklist(_)) => {
                    return Err(AnswerError::ShapeMismatch {
                        question_id,
                        expected: "single choice",
                    });
                }
                (SectionKind::ExclusiveChecklist, AnswerValue::Checklist(selections)) => {
                    let mut seen = BTreeSet::new();
                    for selection in selections {
                        if !seen.insert(selection.as_str()) {
                            return Err(AnswerError::DuplicateSelection {
                                question_id,
                                option: selection.clone(),
                            });
                        }
                    }
                    if let Some(policy) = answers.checklist_policy() {
                        if !policy.is_consistent(selections) {
                            return Err(AnswerError::ExclusiveConflict {
                                question_id,
                                exclusive_option: policy.exclusive_option().to_string(),
                            });
                        }
                    }
                }
                (SectionKind::ExclusiveChecklist, AnswerValue::Scalar(_)) => {
                    return Err(AnswerError::ShapeMismatch {
                        question_id,
                        expected: "checklist",
                    });
                }
            }

            answers.values.insert(question_id, value);
        }

        Ok(answers)
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.values.get(question_id)
    }

    pub fn scalar(&self, question_id: &str) -> Option<&str> {
        self.get(question_id).and_then(AnswerValue::as_scalar)
    }

    pub fn set_scalar(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(question_id.into(), AnswerValue::Scalar(value.into()));
    }

    /// Current checklist selection; empty when unanswered or unbound.
    pub fn checklist(&self) -> &[String] {
        self.checklist
            .as_ref()
            .and_then(|slot| self.get(&slot.question_id))
            .and_then(AnswerValue::as_checklist)
            .unwrap_or_default()
    }

    pub fn checklist_policy(&self) -> Option<&ChecklistPolicy> {
        self.checklist.as_ref().map(|slot| &slot.policy)
    }

    /// Apply one checklist click. Returns `false` on an unbound set.
    pub fn toggle_checklist(&mut self, option: &str) -> bool {
        let Some(slot) = self.checklist.as_ref() else {
            return false;
        };

        let next = slot.policy.toggle(self.checklist(), option);
        let question_id = slot.question_id.clone();
        self.values
            .insert(question_id, AnswerValue::Checklist(next));
        true
    }

    /// True when the checklist names at least one real danger sign.
    pub fn has_red_flags(&self) -> bool {
        self.checklist_policy()
            .map(|policy| policy.has_substantive(self.checklist()))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &BTreeMap<String, AnswerValue> {
        &self.values
    }

    /// Opaque blob handed to the submission store.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.values).unwrap_or(serde_json::Value::Null)
    }
}
