use maag_assessment::config::QuestionnaireConfig;
use maag_assessment::error::AppError;
use maag_assessment::workflows::assessment::{
    AnswerValue, InMemorySchemaSource, JsonFileSchemaSource, QuestionnaireSchema, SchemaRegistry,
    SchemaSource,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Schema edits go to `APP_SCHEMA_PATH` when set, otherwise they live in memory.
pub(crate) fn schema_registry(config: &QuestionnaireConfig) -> Result<SchemaRegistry, AppError> {
    let source: Arc<dyn SchemaSource> = match &config.schema_path {
        Some(path) => Arc::new(JsonFileSchemaSource::new(path.clone())),
        None => Arc::new(InMemorySchemaSource::default()),
    };

    Ok(SchemaRegistry::load(source, QuestionnaireSchema::builtin()?)?)
}

pub(crate) fn read_schema_file(path: &Path) -> Result<QuestionnaireSchema, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(QuestionnaireSchema::from_json(&raw)?)
}

/// Answer file shaped like the submit payload's `answers` object.
pub(crate) fn read_answer_file(path: &Path) -> Result<BTreeMap<String, AnswerValue>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let answers = serde_json::from_str(&raw).map_err(std::io::Error::from)?;
    Ok(answers)
}
