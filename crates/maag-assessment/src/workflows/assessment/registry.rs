use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use super::schema::{QuestionnaireSchema, SchemaError, Section};

/// Where an edited questionnaire is persisted between restarts.
pub trait SchemaSource: Send + Sync {
    /// `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<Section>>, SchemaSourceError>;
    fn save(&self, sections: &[Section]) -> Result<(), SchemaSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaSourceError {
    #[error("schema file '{path}' could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("schema file '{path}' is not valid JSON: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("schema store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Source(#[from] SchemaSourceError),
}

/// Keeps saved sections in memory; used by tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct InMemorySchemaSource {
    saved: Mutex<Option<Vec<Section>>>,
}

impl InMemorySchemaSource {
    pub fn with_sections(sections: Vec<Section>) -> Self {
        Self {
            saved: Mutex::new(Some(sections)),
        }
    }

    pub fn saved(&self) -> Option<Vec<Section>> {
        self.saved.lock().ok().and_then(|guard| guard.clone())
    }
}

impl SchemaSource for InMemorySchemaSource {
    fn load(&self) -> Result<Option<Vec<Section>>, SchemaSourceError> {
        let guard = self
            .saved
            .lock()
            .map_err(|_| SchemaSourceError::Unavailable("schema mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, sections: &[Section]) -> Result<(), SchemaSourceError> {
        let mut guard = self
            .saved
            .lock()
            .map_err(|_| SchemaSourceError::Unavailable("schema mutex poisoned".to_string()))?;
        *guard = Some(sections.to_vec());
        Ok(())
    }
}

/// Pretty-printed JSON array of sections on disk. A missing file loads as `None`.
#[derive(Debug, Clone)]
pub struct JsonFileSchemaSource {
    path: PathBuf,
}

impl JsonFileSchemaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SchemaSourceError {
        SchemaSourceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SchemaSource for JsonFileSchemaSource {
    fn load(&self) -> Result<Option<Vec<Section>>, SchemaSourceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| SchemaSourceError::Format {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, sections: &[Section]) -> Result<(), SchemaSourceError> {
        let body =
            serde_json::to_string_pretty(sections).map_err(|source| SchemaSourceError::Format {
                path: self.path.clone(),
                source,
            })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        fs::write(&self.path, body).map_err(|err| self.io_error(err))
    }
}

/// Current questionnaire plus the store edits are written to.
///
/// Readers take an `Arc` snapshot; `publish` swaps the pointer only after the new schema has
/// validated and been persisted.
pub struct SchemaRegistry {
    source: Arc<dyn SchemaSource>,
    current: RwLock<Arc<QuestionnaireSchema>>,
}

impl SchemaRegistry {
    /// Use the saved override when there is one, else `builtin`.
    pub fn load(
        source: Arc<dyn SchemaSource>,
        builtin: QuestionnaireSchema,
    ) -> Result<Self, RegistryError> {
        let schema = match source.load()? {
            Some(sections) => {
                let schema = QuestionnaireSchema::new(sections)?;
                tracing::info!(sections = schema.len(), "loaded saved questionnaire");
                schema
            }
            None => builtin,
        };

        Ok(Self {
            source,
            current: RwLock::new(Arc::new(schema)),
        })
    }

    pub fn current(&self) -> Arc<QuestionnaireSchema> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    pub fn publish(&self, sections: Vec<Section>) -> Result<Arc<QuestionnaireSchema>, RegistryError> {
        let schema = QuestionnaireSchema::new(sections)?;
        self.source.save(schema.sections())?;

        let schema = Arc::new(schema);
        match self.current.write() {
            Ok(mut guard) => *guard = Arc::clone(&schema),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&schema),
        }

        tracing::info!(
            sections = schema.len(),
            questions = schema.question_count(),
            "questionnaire published"
        );
        Ok(schema)
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> QuestionnaireSchema {
        QuestionnaireSchema::builtin().expect("builtin schema is valid")
    }

    #[test]
    fn falls_back_to_builtin_when_nothing_is_saved() {
        let registry = SchemaRegistry::load(Arc::new(InMemorySchemaSource::default()), builtin())
            .expect("registry loads");

        assert_eq!(registry.current().len(), 5);
        assert_eq!(registry.current().exclusive_option(), "Tidak mengalami semua di atas");
    }

    #[test]
    fn prefers_saved_sections() {
        let mut sections = builtin().into_sections();
        sections[0].title = "Gejala Utama (revisi)".to_string();
        let source = Arc::new(InMemorySchemaSource::with_sections(sections));

        let registry = SchemaRegistry::load(source, builtin()).expect("registry loads");

        assert_eq!(registry.current().sections()[0].title, "Gejala Utama (revisi)");
    }

    #[test]
    fn refuses_to_start_from_a_broken_saved_schema() {
        let source = Arc::new(InMemorySchemaSource::with_sections(Vec::new()));
        let result = SchemaRegistry::load(source, builtin());
        assert!(matches!(result, Err(RegistryError::Schema(SchemaError::Empty))));
    }

    #[test]
    fn publish_swaps_snapshot_and_persists() {
        let source = Arc::new(InMemorySchemaSource::default());
        let registry = SchemaRegistry::load(source.clone(), builtin()).expect("registry loads");
        let before = registry.current();

        let mut sections = builtin().into_sections();
        sections.remove(1);
        let published = registry.publish(sections).expect("publish succeeds");

        assert_eq!(published.len(), 4);
        assert_eq!(registry.current().len(), 4);
        assert_eq!(before.len(), 5, "existing snapshots are untouched");
        assert_eq!(source.saved().map(|saved| saved.len()), Some(4));
    }

    #[test]
    fn invalid_publish_keeps_current_schema() {
        let source = Arc::new(InMemorySchemaSource::default());
        let registry = SchemaRegistry::load(source.clone(), builtin()).expect("registry loads");

        let mut sections = builtin().into_sections();
        sections.retain(|section| !section.is_checklist());
        let result = registry.publish(sections);

        assert!(matches!(
            result,
            Err(RegistryError::Schema(SchemaError::ChecklistSectionCount(0)))
        ));
        assert_eq!(registry.current().len(), 5);
        assert!(source.saved().is_none());
    }

    #[test]
    fn json_file_source_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("maag-schema-{}", std::process::id()));
        let source = JsonFileSchemaSource::new(dir.join("questions.json"));
        assert!(source.load().expect("missing file is fine").is_none());

        source
            .save(builtin().sections())
            .expect("schema file written");
        let loaded = source.load().expect("schema file read").expect("saved");
        assert_eq!(loaded, builtin().into_sections());

        let _ = fs::remove_dir_all(dir);
    }
}
