use crate::error::{Error, Result};
use crate::models::catalog::{Catalog, SubjectEntry, TieredQuestions, TrophyEntry};
use crate::models::difficulty::DifficultyLevel;

const EMBEDDED_CATALOG: &str = include_str!("../../data/catalog.json");

/// A subject as seen by the generator: its own metadata and chapters, plus the
/// question bank it draws from (its own, or the default subject's).
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSubject<'a> {
    pub entry: &'a SubjectEntry,
    pub questions: &'a TieredQuestions,
}

#[derive(Debug, Clone)]
pub struct CatalogService {
    catalog: Catalog,
}

impl CatalogService {
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("Invalid question catalog: {}", e)))?;
        Self::new(catalog)
    }

    pub fn new(catalog: Catalog) -> Result<Self> {
        validate_catalog(&catalog)?;
        Ok(Self { catalog })
    }

    pub fn subjects(&self) -> &[SubjectEntry] {
        &self.catalog.subjects
    }

    pub fn trophies(&self) -> &[TrophyEntry] {
        &self.catalog.trophies
    }

    pub fn subject(&self, subject_id: &str) -> Option<&SubjectEntry> {
        self.catalog.subjects.iter().find(|s| s.id == subject_id)
    }

    fn default_subject(&self) -> &SubjectEntry {
        self.subject(&self.catalog.default_subject)
            .unwrap_or(&self.catalog.subjects[0])
    }

    /// Unknown subjects resolve to the default subject entirely. Known subjects
    /// without a bank of their own keep their chapters but borrow the default
    /// subject's questions.
    pub fn resolve(&self, subject_id: &str) -> ResolvedSubject<'_> {
        let default = self.default_subject();
        let entry = match self.subject(subject_id) {
            Some(entry) => entry,
            None => {
                tracing::warn!(
                    subject_id,
                    fallback = %default.id,
                    "unknown subject, using default question bank"
                );
                default
            }
        };

        let questions = entry
            .questions
            .as_ref()
            .filter(|q| !q.is_empty())
            .or(default.questions.as_ref());

        ResolvedSubject {
            entry,
            questions: questions.unwrap_or(&EMPTY_BANK),
        }
    }

    pub fn chapters_for(&self, subject_id: &str) -> &[String] {
        &self.resolve(subject_id).entry.chapters
    }
}

static EMPTY_BANK: TieredQuestions = TieredQuestions {
    easy: Vec::new(),
    medium: Vec::new(),
    intermediate: Vec::new(),
    hard: Vec::new(),
};

fn validate_catalog(catalog: &Catalog) -> Result<()> {
    if catalog.subjects.is_empty() {
        return Err(Error::Config("Question catalog has no subjects".to_string()));
    }
    if !catalog
        .subjects
        .iter()
        .any(|s| s.id == catalog.default_subject)
    {
        return Err(Error::Config(format!(
            "Default subject '{}' is not in the catalog",
            catalog.default_subject
        )));
    }

    for subject in &catalog.subjects {
        let Some(bank) = &subject.questions else {
            continue;
        };
        for tier in DifficultyLevel::ALL {
            for question in bank.tier(tier) {
                if !question.is_well_formed() {
                    return Err(Error::Config(format!(
                        "Question '{}' in subject '{}' has an invalid answer index",
                        question.id, subject.id
                    )));
                }
                if question.difficulty != tier {
                    return Err(Error::Config(format!(
                        "Question '{}' in subject '{}' is filed under {} but marked {}",
                        question.id, subject.id, tier, question.difficulty
                    )));
                }
            }
        }
    }
    Ok(())
}
