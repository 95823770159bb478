use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const BUILTIN_CATALOG: &str = include_str!("../../../assets/advice_catalog.json");

/// Advice template identifiers. Order of the variants is not significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    Urgent,
    Medication,
    Lifestyle,
    Diet,
    Mind,
    Habit,
}

impl AdviceKind {
    pub const ALL: [AdviceKind; 6] = [
        AdviceKind::Urgent,
        AdviceKind::Medication,
        AdviceKind::Lifestyle,
        AdviceKind::Diet,
        AdviceKind::Mind,
        AdviceKind::Habit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            AdviceKind::Urgent => "urgent",
            AdviceKind::Medication => "medication",
            AdviceKind::Lifestyle => "lifestyle",
            AdviceKind::Diet => "diet",
            AdviceKind::Mind => "mind",
            AdviceKind::Habit => "habit",
        }
    }
}

/// Editable text behind one advice kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceTemplate {
    pub kind: AdviceKind,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
}

/// One advice block attached to a score result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceEntry {
    pub kind: AdviceKind,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

impl From<&AdviceTemplate> for AdviceEntry {
    fn from(template: &AdviceTemplate) -> Self {
        Self {
            kind: template.kind,
            title: template.title.clone(),
            content: template.content.clone(),
            items: if template.items.is_empty() {
                None
            } else {
                Some(template.items.clone())
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("advice catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("advice catalog has no '{}' template", .0.label())]
    MissingKind(AdviceKind),
    #[error("advice catalog defines '{}' more than once", .0.label())]
    DuplicateKind(AdviceKind),
}

/// Complete set of advice templates, one per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceCatalog {
    templates: BTreeMap<AdviceKind, AdviceTemplate>,
}

impl AdviceCatalog {
    pub fn new(templates: Vec<AdviceTemplate>) -> Result<Self, CatalogError> {
        let mut by_kind = BTreeMap::new();
        for template in templates {
            let kind = template.kind;
            if by_kind.insert(kind, template).is_some() {
                return Err(CatalogError::DuplicateKind(kind));
            }
        }

        if let Some(missing) = AdviceKind::ALL
            .into_iter()
            .find(|kind| !by_kind.contains_key(kind))
        {
            return Err(CatalogError::MissingKind(missing));
        }

        Ok(Self { templates: by_kind })
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let templates: Vec<AdviceTemplate> = serde_json::from_str(raw)?;
        Self::new(templates)
    }

    /// Indonesian texts shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn template(&self, kind: AdviceKind) -> &AdviceTemplate {
        // `new` rejects catalogs that miss any kind.
        &self.templates[&kind]
    }

    pub fn entry(&self, kind: AdviceKind) -> AdviceEntry {
        AdviceEntry::from(self.template(kind))
    }

    pub fn templates(&self) -> impl Iterator<Item = &AdviceTemplate> {
        self.templates.values()
    }
}
