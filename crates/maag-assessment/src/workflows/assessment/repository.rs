use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::respondent::{Gender, Occupation, RespondentProfile};
use super::scoring::{RiskLevel, ScoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scored assessment ready to be stored; the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u8,
    pub gender: Option<Gender>,
    pub occupation: Option<Occupation>,
    pub risk_level: RiskLevel,
    pub score: u8,
    pub answers: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl NewSubmission {
    /// Flatten respondent, answer blob and result into one row.
    pub fn new(
        respondent: &RespondentProfile,
        answers: serde_json::Value,
        result: &ScoreResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: respondent.name.trim().to_string(),
            email: respondent.email.trim().to_string(),
            phone: respondent.phone.trim().to_string(),
            age: respondent.age,
            gender: respondent.gender,
            occupation: respondent.occupation,
            risk_level: result.risk_level,
            score: result.score,
            answers,
            created_at,
        }
    }
}

/// Stored submission as listed by the admin endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    #[serde(flatten)]
    pub submission: NewSubmission,
}

/// Window over the newest-first submission list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl Page {
    pub const fn first(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }

    pub const fn everything() -> Self {
        Self::first(usize::MAX)
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, submission: NewSubmission) -> Result<SubmissionRecord, RepositoryError>;
    /// Newest first.
    fn list(&self, page: Page) -> Result<Vec<SubmissionRecord>, RepositoryError>;
    fn fetch(&self, id: SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn delete(&self, id: SubmissionId) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("submission not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    records: BTreeMap<SubmissionId, SubmissionRecord>,
}

/// `Mutex`-guarded map handing out sequential ids starting at 1.
#[derive(Debug, Default, Clone)]
pub struct InMemorySubmissionRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemorySubmissionRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|state| state.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, submission: NewSubmission) -> Result<SubmissionRecord, RepositoryError> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let record = SubmissionRecord {
            id: SubmissionId(state.next_id),
            submission,
        };
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    fn list(&self, page: Page) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let state = self.lock()?;
        let mut records: Vec<_> = state.records.values().cloned().collect();
        records.sort_by(|a, b| {
            b.submission
                .created_at
                .cmp(&a.submission.created_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(records
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect())
    }

    fn fetch(&self, id: SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.records.get(&id).cloned())
    }

    fn delete(&self, id: SubmissionId) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        state
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission(name: &str, minute: u32) -> NewSubmission {
        NewSubmission {
            name: name.to_string(),
            email: format!("{}@example.id", name.to_lowercase()),
            phone: String::new(),
            age: 30,
            gender: Some(Gender::Female),
            occupation: Some(Occupation::Teacher),
            risk_level: RiskLevel::Low,
            score: 10,
            answers: serde_json::json!({}),
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 14, 9, minute, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn assigns_sequential_ids() {
        let repository = InMemorySubmissionRepository::default();
        let first = repository.insert(submission("Sari", 0)).expect("insert");
        let second = repository.insert(submission("Budi", 1)).expect("insert");

        assert_eq!(first.id, SubmissionId(1));
        assert_eq!(second.id, SubmissionId(2));
        assert_eq!(repository.len(), 2);
    }

    #[test]
    fn lists_newest_first_with_paging() {
        let repository = InMemorySubmissionRepository::default();
        for (name, minute) in [("Sari", 5), ("Budi", 20), ("Dewi", 10)] {
            repository.insert(submission(name, minute)).expect("insert");
        }

        let names = |page| -> Vec<String> {
            repository
                .list(page)
                .expect("list")
                .into_iter()
                .map(|record| record.submission.name)
                .collect()
        };

        assert_eq!(names(Page::everything()), ["Budi", "Dewi", "Sari"]);
        assert_eq!(names(Page { limit: 1, offset: 1 }), ["Dewi"]);
        assert!(names(Page { limit: 5, offset: 3 }).is_empty());
    }

    #[test]
    fn delete_reports_missing_records() {
        let repository = InMemorySubmissionRepository::default();
        let record = repository.insert(submission("Sari", 0)).expect("insert");

        repository.delete(record.id).expect("first delete succeeds");
        assert!(repository.fetch(record.id).expect("fetch").is_none());
        assert!(matches!(
            repository.delete(record.id),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn record_serializes_flat() {
        let repository = InMemorySubmissionRepository::default();
        let record = repository.insert(submission("Sari", 0)).expect("insert");

        let value = serde_json::to_value(&record).expect("serializes");
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Sari");
        assert_eq!(value["risk_level"], "LOW");
        assert_eq!(value["gender"], "female");
    }
}
