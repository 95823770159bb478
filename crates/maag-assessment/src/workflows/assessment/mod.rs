//! Gastric-symptom (maag) self-assessment.
//!
//! A respondent registers, walks the questionnaire section by section (each section gated by
//! [`is_complete`]), ticks the red-flag checklist under the exclusive "none of the above" rule,
//! and receives a [`ScoreResult`] from the [`RiskScoringEngine`]. The service layer recomputes
//! the score server-side, records submissions, and serves the admin listing and CSV export.

pub mod advice;
pub mod answers;
pub mod checklist;
pub mod completion;
pub mod export;
pub mod registry;
pub mod repository;
pub mod respondent;
pub mod router;
pub mod schema;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use advice::{AdviceCatalog, AdviceEntry, AdviceKind, AdviceTemplate, CatalogError};
pub use answers::{AnswerError, AnswerSet, AnswerValue};
pub use checklist::{toggle, ChecklistPolicy};
pub use completion::{first_incomplete, is_complete};
pub use export::{export_csv, export_file_name, ExportError, EXPORT_HEADERS};
pub use registry::{
    InMemorySchemaSource, JsonFileSchemaSource, RegistryError, SchemaRegistry, SchemaSource,
    SchemaSourceError,
};
pub use repository::{
    InMemorySubmissionRepository, NewSubmission, Page, RepositoryError, SubmissionId,
    SubmissionRecord, SubmissionRepository,
};
pub use respondent::{Gender, Occupation, RegistrationError, RespondentProfile};
pub use router::assessment_router;
pub use schema::{Question, QuestionnaireSchema, SchemaError, Section, SectionKind};
pub use scoring::{RiskLevel, RiskScoringEngine, ScoreResult, SymptomContribution};
pub use service::{
    AssessmentService, AssessmentServiceError, AssessmentSubmission, SubmissionOutcome,
    DEFAULT_PAGE_SIZE,
};
pub use session::{Advance, AssessmentSession, SessionError, SessionStage};
