use std::sync::Arc;

use super::answers::AnswerSet;
use super::completion::is_complete;
use super::respondent::{RegistrationError, RespondentProfile};
use super::schema::{QuestionnaireSchema, Section};
use super::scoring::{RiskScoringEngine, ScoreResult};

/// Where a respondent is in the assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStage {
    Registration,
    Questionnaire { section: usize },
    Completed(ScoreResult),
}

impl SessionStage {
    pub const fn label(&self) -> &'static str {
        match self {
            SessionStage::Registration => "registration",
            SessionStage::Questionnaire { .. } => "questionnaire",
            SessionStage::Completed(_) => "completed",
        }
    }
}

/// Result of a successful forward step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Section(usize),
    Finished(ScoreResult),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error("cannot {action} during {stage}")]
    InvalidStage {
        action: &'static str,
        stage: &'static str,
    },
    #[error("section '{0}' is not complete")]
    SectionIncomplete(String),
    #[error("question '{question_id}' does not belong to section '{section_id}'")]
    QuestionNotInSection {
        question_id: String,
        section_id: String,
    },
    #[error("section '{0}' is a checklist; toggle its options instead")]
    ChecklistAnswer(String),
    #[error("section '{0}' has no checklist")]
    NotChecklist(String),
}

/// One respondent walking the questionnaire.
///
/// The session keeps the schema snapshot it was started with, so publishing a new schema does
/// not affect respondents already in progress.
#[derive(Debug)]
pub struct AssessmentSession {
    schema: Arc<QuestionnaireSchema>,
    respondent: Option<RespondentProfile>,
    answers: AnswerSet,
    stage: SessionStage,
}

impl AssessmentSession {
    pub fn new(schema: Arc<QuestionnaireSchema>) -> Self {
        let answers = AnswerSet::for_schema(&schema);
        Self {
            schema,
            respondent: None,
            answers,
            stage: SessionStage::Registration,
        }
    }

    pub fn stage(&self) -> &SessionStage {
        &self.stage
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn respondent(&self) -> Option<&RespondentProfile> {
        self.respondent.as_ref()
    }

    pub fn schema(&self) -> &QuestionnaireSchema {
        &self.schema
    }

    pub fn current_section(&self) -> Option<&Section> {
        match self.stage {
            SessionStage::Questionnaire { section } => self.schema.section(section),
            _ => None,
        }
    }

    /// Progress through the questionnaire as a percentage of sections reached.
    pub fn progress_percent(&self) -> u8 {
        match self.stage {
            SessionStage::Registration => 0,
            SessionStage::Questionnaire { section } => {
                (((section + 1) * 100) / self.schema.len().max(1)) as u8
            }
            SessionStage::Completed(_) => 100,
        }
    }

    /// Accept a validated registration and open the first section.
    pub fn register(&mut self, profile: RespondentProfile) -> Result<(), SessionError> {
        self.expect_stage("register", matches!(self.stage, SessionStage::Registration))?;
        profile.validate()?;
        self.respondent = Some(profile);
        self.stage = SessionStage::Questionnaire { section: 0 };
        Ok(())
    }

    /// Record a single-choice answer for a question of the current section.
    pub fn answer(&mut self, question_id: &str, value: &str) -> Result<(), SessionError> {
        let section = self.require_section("answer")?;
        if section.is_checklist() {
            return Err(SessionError::ChecklistAnswer(section.id.clone()));
        }
        if section.question(question_id).is_none() {
            return Err(SessionError::QuestionNotInSection {
                question_id: question_id.to_string(),
                section_id: section.id.clone(),
            });
        }

        self.answers.set_scalar(question_id, value);
        Ok(())
    }

    /// Flip one checklist option while the checklist section is current.
    pub fn toggle_flag(&mut self, option: &str) -> Result<&[String], SessionError> {
        let section = self.require_section("toggle a checklist option")?;
        if !section.is_checklist() {
            return Err(SessionError::NotChecklist(section.id.clone()));
        }

        self.answers.toggle_checklist(option);
        Ok(self.answers.checklist())
    }

    /// Move forward if the current section is complete; the last section finishes the
    /// assessment and scores it exactly once.
    pub fn advance(&mut self, engine: &RiskScoringEngine) -> Result<Advance, SessionError> {
        let index = match self.stage {
            SessionStage::Questionnaire { section } => section,
            _ => {
                return Err(SessionError::InvalidStage {
                    action: "advance",
                    stage: self.stage.label(),
                })
            }
        };
        let section = self.require_section("advance")?;
        if !is_complete(section, &self.answers) {
            return Err(SessionError::SectionIncomplete(section.id.clone()));
        }

        if index + 1 < self.schema.len() {
            self.stage = SessionStage::Questionnaire { section: index + 1 };
            return Ok(Advance::Section(index + 1));
        }

        let result = engine.score(&self.answers);
        tracing::debug!(
            risk_level = result.risk_level.label(),
            score = result.score,
            "assessment session completed"
        );
        self.stage = SessionStage::Completed(result.clone());
        Ok(Advance::Finished(result))
    }

    /// Step back one section. Never validated; stays put on the first section.
    pub fn back(&mut self) -> Result<usize, SessionError> {
        match self.stage {
            SessionStage::Questionnaire { section } => {
                let previous = section.saturating_sub(1);
                self.stage = SessionStage::Questionnaire { section: previous };
                Ok(previous)
            }
            _ => Err(SessionError::InvalidStage {
                action: "go back",
                stage: self.stage.label(),
            }),
        }
    }

    /// The score once completed.
    pub fn result(&self) -> Option<&ScoreResult> {
        match &self.stage {
            SessionStage::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// Hand the respondent and answers over for recording.
    pub fn into_parts(self) -> (Option<RespondentProfile>, AnswerSet, SessionStage) {
        (self.respondent, self.answers, self.stage)
    }

    fn require_section(&self, action: &'static str) -> Result<&Section, SessionError> {
        self.current_section().ok_or(SessionError::InvalidStage {
            action,
            stage: self.stage.label(),
        })
    }

    fn expect_stage(&self, action: &'static str, allowed: bool) -> Result<(), SessionError> {
        if allowed {
            Ok(())
        } else {
            Err(SessionError::InvalidStage {
                action,
                stage: self.stage.label(),
            })
        }
    }
}
