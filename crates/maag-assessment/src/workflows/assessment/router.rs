use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::export::export_file_name;
use super::registry::RegistryError;
use super::repository::{RepositoryError, SubmissionId, SubmissionRepository};
use super::schema::Section;
use super::service::{AssessmentService, AssessmentServiceError, AssessmentSubmission};

/// Router builder exposing the questionnaire, submission and admin endpoints.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: SubmissionRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessment/questions",
            get(questions_handler::<R>).post(publish_handler::<R>),
        )
        .route("/api/v1/assessment/submit", post(submit_handler::<R>))
        .route(
            "/api/v1/assessment/submissions",
            get(submissions_handler::<R>),
        )
        .route(
            "/api/v1/assessment/submissions/export",
            get(export_handler::<R>),
        )
        .route(
            "/api/v1/assessment/submissions/:submission_id",
            delete(delete_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SubmissionQuery {
    pub(crate) limit: Option<usize>,
    #[serde(default)]
    pub(crate) offset: usize,
}

pub(crate) async fn questions_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let schema = service.schema();
    (StatusCode::OK, axum::Json(schema.as_ref())).into_response()
}

pub(crate) async fn publish_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    axum::Json(sections): axum::Json<Vec<Section>>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.publish_schema(sections) {
        Ok(schema) => {
            let payload = json!({
                "status": "published",
                "sections": schema.len(),
                "questions": schema.question_count(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.submit(submission) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submissions_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Query(query): Query<SubmissionQuery>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.submissions(query.limit, query.offset) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(submission_id): Path<u64>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let id = SubmissionId(submission_id);
    match service.delete_submission(id) {
        Ok(()) => {
            let payload = json!({ "status": "deleted", "id": id });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R>(State(service): State<Arc<AssessmentService<R>>>) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.export() {
        Ok(body) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                export_file_name(Local::now().date_naive())
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Registry(RegistryError::Schema(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        other if other.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(%error, "assessment request failed");
    }

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
