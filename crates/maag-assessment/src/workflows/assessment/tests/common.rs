use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::answers::{AnswerSet, AnswerValue};
use crate::workflows::assessment::registry::{InMemorySchemaSource, SchemaRegistry};
use crate::workflows::assessment::repository::{
    InMemorySubmissionRepository, NewSubmission, Page, RepositoryError, SubmissionId,
    SubmissionRecord, SubmissionRepository,
};
use crate::workflows::assessment::respondent::{Gender, Occupation, RespondentProfile};
use crate::workflows::assessment::{
    assessment_router, AdviceCatalog, AssessmentService, AssessmentSubmission,
    QuestionnaireSchema, RiskScoringEngine,
};

pub(super) const NONE_OF_THE_ABOVE: &str = "Tidak mengalami semua di atas";

pub(super) fn schema() -> QuestionnaireSchema {
    QuestionnaireSchema::builtin().expect("builtin schema is valid")
}

pub(super) fn engine() -> RiskScoringEngine {
    RiskScoringEngine::new(AdviceCatalog::builtin().expect("builtin catalog is valid"))
}

pub(super) fn respondent() -> RespondentProfile {
    RespondentProfile {
        name: "Dewi Lestari".to_string(),
        email: "dewi.lestari@example.id".to_string(),
        phone: "081298765432".to_string(),
        age: 29,
        gender: Some(Gender::Female),
        occupation: Some(Occupation::Employee),
        consent: true,
    }
}

/// Raw answers as the browser posts them.
pub(super) fn raw_answers(
    scalars: &[(&str, &str)],
    red_flags: &[&str],
) -> BTreeMap<String, AnswerValue> {
    let mut raw: BTreeMap<String, AnswerValue> = scalars
        .iter()
        .map(|(id, value)| (id.to_string(), AnswerValue::Scalar(value.to_string())))
        .collect();
    raw.insert(
        "red_flags".to_string(),
        AnswerValue::Checklist(red_flags.iter().map(|flag| flag.to_string()).collect()),
    );
    raw
}

pub(super) fn answers(scalars: &[(&str, &str)], red_flags: &[&str]) -> AnswerSet {
    AnswerSet::resolve(&schema(), raw_answers(scalars, red_flags)).expect("answers resolve")
}

/// Every symptom negative, shortest duration, unknown trigger.
pub(super) const CALM: [(&str, &str); 8] = [
    ("heartburn", "Tidak"),
    ("burning_sensation", "Tidak"),
    ("bloating", "Tidak"),
    ("nausea", "Tidak"),
    ("vomiting", "Tidak"),
    ("early_satiety", "Tidak"),
    ("duration", "< 24 jam"),
    ("trigger", "Tidak tahu"),
];

/// `CALM` with selected answers replaced.
pub(super) fn calm_with(
    overrides: &[(&'static str, &'static str)],
) -> Vec<(&'static str, &'static str)> {
    CALM.iter()
        .map(|&(id, value)| {
            overrides
                .iter()
                .find(|(override_id, _)| *override_id == id)
                .copied()
                .unwrap_or((id, value))
        })
        .collect()
}

pub(super) fn submission(scalars: &[(&str, &str)], red_flags: &[&str]) -> AssessmentSubmission {
    AssessmentSubmission {
        respondent: respondent(),
        answers: raw_answers(scalars, red_flags),
    }
}

pub(super) fn build_service() -> (
    AssessmentService<InMemorySubmissionRepository>,
    Arc<InMemorySubmissionRepository>,
) {
    let repository = Arc::new(InMemorySubmissionRepository::default());
    let service = service_with(repository.clone());
    (service, repository)
}

pub(super) fn service_with<R>(repository: Arc<R>) -> AssessmentService<R>
where
    R: SubmissionRepository + 'static,
{
    let registry = SchemaRegistry::load(Arc::new(InMemorySchemaSource::default()), schema())
        .expect("registry loads");
    AssessmentService::new(Arc::new(registry), Arc::new(engine()), repository)
}

pub(super) fn assessment_router_with_service(
    service: AssessmentService<InMemorySubmissionRepository>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn insert(&self, _submission: NewSubmission) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _page: Page) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: SubmissionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
