use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::dto::store_dto::{
    CreateResultPayload, CreateSubjectPayload, CreateTestRecordPayload, CreateTrophyPayload,
    CreateUserPayload, CreateUserTrophyPayload, UpsertProgressPayload,
};
use crate::error::{Error, Result};
use crate::models::progress::UserProgress;
use crate::models::stored_result::StoredResult;
use crate::models::subject::Subject;
use crate::models::test_record::TestRecord;
use crate::models::trophy::{Trophy, TrophyStatus, UserTrophy};
use crate::models::user::User;
use crate::services::catalog_service::CatalogService;
use crate::utils::time::Clock;

#[derive(Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    user_seq: Sequence,
    subjects: BTreeMap<i64, Subject>,
    subject_seq: Sequence,
    tests: BTreeMap<i64, TestRecord>,
    test_seq: Sequence,
    progress: HashMap<(i64, i64), UserProgress>,
    progress_seq: Sequence,
    results: BTreeMap<i64, StoredResult>,
    result_seq: Sequence,
    trophies: BTreeMap<i64, Trophy>,
    trophy_seq: Sequence,
    user_trophies: HashMap<(i64, i64), UserTrophy>,
    user_trophy_seq: Sequence,
}

impl Tables {
    fn user(&self, id: i64) -> Result<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    fn subject(&self, id: i64) -> Result<&Subject> {
        self.subjects
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("Subject {} not found", id)))
    }

    fn trophy(&self, id: i64) -> Result<&Trophy> {
        self.trophies
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("Trophy {} not found", id)))
    }
}

/// In-memory storage for users, subjects, saved tests, progress, results and
/// trophies. Ids are assigned per table starting at 1.
#[derive(Clone)]
pub struct MemStore {
    tables: Arc<RwLock<Tables>>,
    clock: Arc<dyn Clock>,
}

impl MemStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            clock,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| Error::Internal("Store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| Error::Internal("Store lock poisoned".to_string()))
    }

    /// Loads the catalog's subjects and trophies. Skipped when the store
    /// already holds subjects.
    pub fn seed_catalog(&self, catalog: &CatalogService) -> Result<()> {
        if !self.read()?.subjects.is_empty() {
            return Ok(());
        }
        for entry in catalog.subjects() {
            self.create_subject(&CreateSubjectPayload {
                name: entry.name.clone(),
                description: entry.description.clone(),
                icon: entry.icon.clone(),
                color: entry.color.clone(),
                background_color: entry.background_color.clone(),
                icon_background_color: entry.icon_background_color.clone(),
            })?;
        }
        for entry in catalog.trophies() {
            self.create_trophy(&CreateTrophyPayload {
                name: entry.name.clone(),
                description: entry.description.clone(),
                icon: entry.icon.clone(),
                icon_color: entry.icon_color.clone(),
            })?;
        }
        tracing::info!(
            subjects = catalog.subjects().len(),
            trophies = catalog.trophies().len(),
            "seeded store from catalog"
        );
        Ok(())
    }

    // Users

    pub fn get_user(&self, id: i64) -> Result<User> {
        self.read()?.user(id).cloned()
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User '{}' not found", username)))
    }

    pub fn create_user(&self, payload: &CreateUserPayload) -> Result<User> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.username == payload.username) {
            return Err(Error::BadRequest(format!(
                "Username '{}' is already taken",
                payload.username
            )));
        }
        let user = User {
            id: tables.user_seq.next(),
            username: payload.username.clone(),
            password: payload.password.clone(),
            display_name: payload.display_name.clone(),
            avatar_url: payload.avatar_url.clone(),
            created_at: self.clock.now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    // Subjects

    pub fn get_subject(&self, id: i64) -> Result<Subject> {
        self.read()?.subject(id).cloned()
    }

    pub fn list_subjects(&self) -> Result<Vec<Subject>> {
        Ok(self.read()?.subjects.values().cloned().collect())
    }

    pub fn create_subject(&self, payload: &CreateSubjectPayload) -> Result<Subject> {
        let mut tables = self.write()?;
        let subject = Subject {
            id: tables.subject_seq.next(),
            name: payload.name.clone(),
            description: payload.description.clone(),
            icon: payload.icon.clone(),
            color: payload.color.clone(),
            background_color: payload.background_color.clone(),
            icon_background_color: payload.icon_background_color.clone(),
            created_at: self.clock.now(),
        };
        tables.subjects.insert(subject.id, subject.clone());
        Ok(subject)
    }

    // Saved tests

    pub fn get_test(&self, id: i64) -> Result<TestRecord> {
        self.read()?
            .tests
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Test {} not found", id)))
    }

    pub fn list_tests_by_subject(&self, subject_id: i64) -> Result<Vec<TestRecord>> {
        let tables = self.read()?;
        tables.subject(subject_id)?;
        Ok(tables
            .tests
            .values()
            .filter(|t| t.subject_id == subject_id)
            .cloned()
            .collect())
    }

    pub fn create_test(
        &self,
        subject_id: i64,
        payload: &CreateTestRecordPayload,
    ) -> Result<TestRecord> {
        let mut tables = self.write()?;
        tables.subject(subject_id)?;
        let record = TestRecord {
            id: tables.test_seq.next(),
            title: payload.title.clone(),
            subject_id,
            chapter: payload.chapter.clone(),
            icon: payload.icon.clone(),
            difficulty: payload.difficulty,
            generated_by: payload.generated_by,
            duration: payload.duration,
            questions: payload.questions.clone(),
            created_at: self.clock.now(),
        };
        tables.tests.insert(record.id, record.clone());
        Ok(record)
    }

    // Progress

    pub fn get_progress(&self, user_id: i64, subject_id: i64) -> Result<UserProgress> {
        self.read()?
            .progress
            .get(&(user_id, subject_id))
            .cloned()
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "No progress for user {} in subject {}",
                    user_id, subject_id
                ))
            })
    }

    pub fn list_progress(&self, user_id: i64) -> Result<Vec<UserProgress>> {
        let tables = self.read()?;
        tables.user(user_id)?;
        let mut rows: Vec<UserProgress> = tables
            .progress
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.subject_id);
        Ok(rows)
    }

    /// Creates the row for `(user_id, subject_id)` or replaces its progress and
    /// rating in place.
    pub fn upsert_progress(
        &self,
        user_id: i64,
        payload: &UpsertProgressPayload,
    ) -> Result<UserProgress> {
        let mut tables = self.write()?;
        tables.user(user_id)?;
        tables.subject(payload.subject_id)?;
        let now = self.clock.now();

        let key = (user_id, payload.subject_id);
        if let Some(existing) = tables.progress.get_mut(&key) {
            existing.progress = payload.progress;
            existing.rating = payload.rating;
            existing.last_updated = now;
            return Ok(existing.clone());
        }

        let row = UserProgress {
            id: tables.progress_seq.next(),
            user_id,
            subject_id: payload.subject_id,
            progress: payload.progress,
            rating: payload.rating,
            last_updated: now,
        };
        tables.progress.insert(key, row.clone());
        Ok(row)
    }

    // Results

    pub fn get_result(&self, id: i64) -> Result<StoredResult> {
        self.read()?
            .results
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Result {} not found", id)))
    }

    pub fn list_results(&self, user_id: i64) -> Result<Vec<StoredResult>> {
        let tables = self.read()?;
        tables.user(user_id)?;
        Ok(tables
            .results
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    pub fn create_result(
        &self,
        user_id: i64,
        payload: &CreateResultPayload,
    ) -> Result<StoredResult> {
        let mut tables = self.write()?;
        tables.user(user_id)?;
        let result = StoredResult {
            id: tables.result_seq.next(),
            user_id,
            test_id: payload.test_id.clone(),
            total_questions: payload.total_questions,
            correct_answers: payload.correct_answers,
            incorrect_answers: payload.incorrect_answers,
            unattempted: payload.unattempted,
            score: payload.score,
            user_answers: payload.user_answers.clone(),
            completed_at: payload.completed_at.unwrap_or_else(|| self.clock.now()),
        };
        tables.results.insert(result.id, result.clone());
        Ok(result)
    }

    // Trophies

    pub fn get_trophy(&self, id: i64) -> Result<Trophy> {
        self.read()?.trophy(id).cloned()
    }

    pub fn list_trophies(&self) -> Result<Vec<Trophy>> {
        Ok(self.read()?.trophies.values().cloned().collect())
    }

    pub fn create_trophy(&self, payload: &CreateTrophyPayload) -> Result<Trophy> {
        let mut tables = self.write()?;
        let trophy = Trophy {
            id: tables.trophy_seq.next(),
            name: payload.name.clone(),
            description: payload.description.clone(),
            icon: payload.icon.clone(),
            icon_color: payload.icon_color.clone(),
            created_at: self.clock.now(),
        };
        tables.trophies.insert(trophy.id, trophy.clone());
        Ok(trophy)
    }

    pub fn list_user_trophies(&self, user_id: i64) -> Result<Vec<UserTrophy>> {
        let tables = self.read()?;
        tables.user(user_id)?;
        let mut rows: Vec<UserTrophy> = tables
            .user_trophies
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.trophy_id);
        Ok(rows)
    }

    pub fn create_user_trophy(
        &self,
        user_id: i64,
        payload: &CreateUserTrophyPayload,
    ) -> Result<UserTrophy> {
        let mut tables = self.write()?;
        tables.user(user_id)?;
        tables.trophy(payload.trophy_id)?;

        let key = (user_id, payload.trophy_id);
        if tables.user_trophies.contains_key(&key) {
            return Err(Error::Conflict(format!(
                "User {} already has trophy {}",
                user_id, payload.trophy_id
            )));
        }

        let row = UserTrophy {
            id: tables.user_trophy_seq.next(),
            user_id,
            trophy_id: payload.trophy_id,
            status: payload.status,
            earned_at: (payload.status == TrophyStatus::Unlocked).then(|| self.clock.now()),
        };
        tables.user_trophies.insert(key, row.clone());
        Ok(row)
    }

    /// `earned_at` is stamped the first time the trophy becomes unlocked and
    /// kept from then on.
    pub fn update_user_trophy_status(
        &self,
        user_id: i64,
        trophy_id: i64,
        status: TrophyStatus,
    ) -> Result<UserTrophy> {
        let mut tables = self.write()?;
        let row = tables
            .user_trophies
            .get_mut(&(user_id, trophy_id))
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "User {} has no trophy {}",
                    user_id, trophy_id
                ))
            })?;
        row.status = status;
        if status == TrophyStatus::Unlocked && row.earned_at.is_none() {
            row.earned_at = Some(self.clock.now());
        }
        tracing::info!(user_id, trophy_id, status = status.as_str(), "trophy status updated");
        Ok(row.clone())
    }
}
