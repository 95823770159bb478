use std::collections::BTreeSet;

use serde::{Deserialize, Serialize, Serializer};

const BUILTIN_SCHEMA: &str = include_str!("../../../assets/default_schema.json");

/// Distinguishes single-select pages from the red-flag checklist page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[default]
    Standard,
    #[serde(alias = "checklist_exclusive")]
    ExclusiveChecklist,
}

/// One prompt within a section. Ids are unique across the whole questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(
        default,
        rename = "exclusiveOption",
        alias = "exclusive_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub exclusive_option: Option<String>,
}

/// One page of the questionnaire; question order is the traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "type")]
    pub kind: SectionKind,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    pub fn is_checklist(&self) -> bool {
        self.kind == SectionKind::ExclusiveChecklist
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions
            .iter()
            .find(|question| question.id == question_id)
    }
}

/// Structural problems that make a questionnaire unusable.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("questionnaire schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("questionnaire schema has no sections")]
    Empty,
    #[error("section '{0}' has no questions")]
    EmptySection(String),
    #[error("section id '{0}' is used more than once")]
    DuplicateSection(String),
    #[error("question id '{0}' is used more than once")]
    DuplicateQuestion(String),
    #[error("question '{question_id}' needs at least two options (found {found})")]
    TooFewOptions { question_id: String, found: usize },
    #[error("expected exactly one exclusive checklist section, found {0}")]
    ChecklistSectionCount(usize),
    #[error("checklist section '{section_id}' must hold exactly one question (found {found})")]
    ChecklistQuestionCount { section_id: String, found: usize },
    #[error("checklist question '{0}' has no options")]
    ChecklistWithoutOptions(String),
    #[error("checklist question '{0}' is missing its exclusive option")]
    MissingExclusiveOption(String),
    #[error("checklist question '{0}' lists its exclusive option among the regular options")]
    ExclusiveOptionListed(String),
    #[error("question '{0}' carries an exclusive option outside the checklist section")]
    UnexpectedExclusiveOption(String),
}

/// Validated, read-only questionnaire definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionnaireSchema {
    sections: Vec<Section>,
    checklist_index: usize,
}

impl Serialize for QuestionnaireSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.sections.serialize(serializer)
    }
}

impl QuestionnaireSchema {
    /// Validate `sections` and wrap them. Nothing is accepted partially.
    pub fn new(sections: Vec<Section>) -> Result<Self, SchemaError> {
        let checklist_index = validate(&sections)?;
        Ok(Self {
            sections,
            checklist_index,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, SchemaError> {
        let sections: Vec<Section> = serde_json::from_str(raw)?;
        Self::new(sections)
    }

    /// The questionnaire shipped with the crate.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_json(BUILTIN_SCHEMA)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.questions.len())
            .sum()
    }

    /// Locate a question and the section that owns it.
    pub fn find_question(&self, question_id: &str) -> Option<(&Section, &Question)> {
        self.sections.iter().find_map(|section| {
            section
                .question(question_id)
                .map(|question| (section, question))
        })
    }

    pub fn checklist_section(&self) -> &Section {
        &self.sections[self.checklist_index]
    }

    /// The single question of the exclusive checklist section.
    pub fn checklist_question(&self) -> &Question {
        &self.checklist_section().questions[0]
    }

    /// The checklist's "none of the above" option.
    pub fn exclusive_option(&self) -> &str {
        self.checklist_question()
            .exclusive_option
            .as_deref()
            .unwrap_or_default()
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }
}

/// Returns the index of the checklist section.
fn validate(sections: &[Section]) -> Result<usize, SchemaError> {
    if sections.is_empty() {
        return Err(SchemaError::Empty);
    }

    let mut section_ids = BTreeSet::new();
    let mut question_ids = BTreeSet::new();
    let mut checklist_sections = 0;
    let mut checklist_index = 0;

    for (index, section) in sections.iter().enumerate() {
        if !section_ids.insert(section.id.as_str()) {
            return Err(SchemaError::DuplicateSection(section.id.clone()));
        }
        if section.questions.is_empty() {
            return Err(SchemaError::EmptySection(section.id.clone()));
        }

        for question in &section.questions {
            if !question_ids.insert(question.id.as_str()) {
                return Err(SchemaError::DuplicateQuestion(question.id.clone()));
            }
        }

        match section.kind {
            SectionKind::Standard => {
                for question in &section.questions {
                    if question.exclusive_option.is_some() {
                        return Err(SchemaError::UnexpectedExclusiveOption(question.id.clone()));
                    }
                    if question.options.len() < 2 {
                        return Err(SchemaError::TooFewOptions {
                            question_id: question.id.clone(),
                            found: question.options.len(),
                        });
                    }
                }
            }
            SectionKind::ExclusiveChecklist => {
                checklist_sections += 1;
                checklist_index = index;
                if section.questions.len() != 1 {
                    return Err(SchemaError::ChecklistQuestionCount {
                        section_id: section.id.clone(),
                        found: section.questions.len(),
                    });
                }
                validate_checklist_question(&section.questions[0])?;
            }
        }
    }

    if checklist_sections != 1 {
        return Err(SchemaError::ChecklistSectionCount(checklist_sections));
    }

    Ok(checklist_index)
}

fn validate_checklist_question(question: &Question) -> Result<(), SchemaError> {
    if question.options.is_empty() {
        return Err(SchemaError::ChecklistWithoutOptions(question.id.clone()));
    }

    let sentinel = match question.exclusive_option.as_deref() {
        Some(sentinel) if !sentinel.trim().is_empty() => sentinel,
        _ => return Err(SchemaError::MissingExclusiveOption(question.id.clone())),
    };

    if question.options.iter().any(|option| option == sentinel) {
        return Err(SchemaError::ExclusiveOptionListed(question.id.clone()));
    }

    Ok(())
}
