use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::answers::{AnswerError, AnswerSet, AnswerValue};
use super::completion::first_incomplete;
use super::export::{export_csv, ExportError};
use super::registry::{RegistryError, SchemaRegistry};
use super::repository::{
    NewSubmission, Page, RepositoryError, SubmissionId, SubmissionRecord, SubmissionRepository,
};
use super::respondent::{RegistrationError, RespondentProfile};
use super::schema::{QuestionnaireSchema, Section};
use super::scoring::{RiskScoringEngine, ScoreResult};
use super::session::AssessmentSession;

/// Default number of submissions returned by the admin listing.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Payload posted when a respondent finishes the questionnaire.
///
/// Any score the client computed itself is ignored; the result is always recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub respondent: RespondentProfile,
    pub answers: BTreeMap<String, AnswerValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    /// Absent when the result could not be recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<SubmissionId>,
    pub result: ScoreResult,
}

/// Service composing the schema registry, scoring engine and submission store.
pub struct AssessmentService<R> {
    registry: Arc<SchemaRegistry>,
    engine: Arc<RiskScoringEngine>,
    repository: Arc<R>,
    page_size: usize,
}

impl<R> AssessmentService<R>
where
    R: SubmissionRepository + 'static,
{
    pub fn new(
        registry: Arc<SchemaRegistry>,
        engine: Arc<RiskScoringEngine>,
        repository: Arc<R>,
    ) -> Self {
        Self {
            registry,
            engine,
            repository,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn engine(&self) -> &RiskScoringEngine {
        &self.engine
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn schema(&self) -> Arc<QuestionnaireSchema> {
        self.registry.current()
    }

    pub fn publish_schema(
        &self,
        sections: Vec<Section>,
    ) -> Result<Arc<QuestionnaireSchema>, AssessmentServiceError> {
        Ok(self.registry.publish(sections)?)
    }

    /// A fresh respondent session over the current schema snapshot.
    pub fn start_session(&self) -> AssessmentSession {
        AssessmentSession::new(self.schema())
    }

    /// Validate, score and record a finished questionnaire.
    ///
    /// Recording is best effort: a store failure is logged and the result still returned.
    pub fn submit(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<SubmissionOutcome, AssessmentServiceError> {
        submission.respondent.validate()?;

        let schema = self.schema();
        let answers = AnswerSet::resolve(&schema, submission.answers)?;
        if let Some(section) = first_incomplete(&schema, &answers) {
            return Err(AssessmentServiceError::Incomplete {
                section_id: section.id.clone(),
            });
        }

        let result = self.engine.score(&answers);
        tracing::info!(
            risk_level = result.risk_level.label(),
            score = result.score,
            advice = result.advice.len(),
            "assessment scored"
        );

        let submission_id = self.record(&submission.respondent, &answers, &result);
        Ok(SubmissionOutcome {
            submission_id,
            result,
        })
    }

    /// Store a completed session. Returns `None` when the session is not finished.
    pub fn record_session(&self, session: AssessmentSession) -> Option<SubmissionOutcome> {
        let result = session.result()?.clone();
        let (respondent, answers, _) = session.into_parts();
        let respondent = respondent?;
        let submission_id = self.record(&respondent, &answers, &result);
        Some(SubmissionOutcome {
            submission_id,
            result,
        })
    }

    fn record(
        &self,
        respondent: &RespondentProfile,
        answers: &AnswerSet,
        result: &ScoreResult,
    ) -> Option<SubmissionId> {
        let row = NewSubmission::new(respondent, answers.to_json(), result, Utc::now());
        match self.repository.insert(row) {
            Ok(record) => Some(record.id),
            Err(error) => {
                tracing::warn!(%error, "failed to record assessment submission");
                None
            }
        }
    }

    /// Newest-first listing; `limit` defaults to the configured page size.
    pub fn submissions(
        &self,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<SubmissionRecord>, AssessmentServiceError> {
        let page = Page {
            limit: limit.unwrap_or(self.page_size),
            offset,
        };
        Ok(self.repository.list(page)?)
    }

    pub fn delete_submission(&self, id: SubmissionId) -> Result<(), AssessmentServiceError> {
        self.repository.delete(id)?;
        tracing::info!(%id, "submission deleted");
        Ok(())
    }

    /// Every stored submission as CSV bytes, newest first.
    pub fn export(&self) -> Result<Vec<u8>, AssessmentServiceError> {
        let records = self.repository.list(Page::everything())?;
        let mut buffer = Vec::new();
        export_csv(&records, &mut buffer)?;
        Ok(buffer)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Answers(#[from] AnswerError),
    #[error("section '{section_id}' is not complete")]
    Incomplete { section_id: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl AssessmentServiceError {
    /// Whether the caller sent something unusable, as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AssessmentServiceError::Registration(_)
                | AssessmentServiceError::Answers(_)
                | AssessmentServiceError::Incomplete { .. }
                | AssessmentServiceError::Registry(RegistryError::Schema(_))
        )
    }
}
