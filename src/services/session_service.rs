use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::difficulty::DifficultyLevel;
use crate::models::session::{Advance, SessionState, TestSession, TickOutcome, UiPreferences};
use crate::services::generator_service::GeneratorService;
use crate::services::scoring_service::ScoringService;

const TICK: Duration = Duration::from_secs(1);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct SessionSlot {
    session: Mutex<TestSession>,
    countdown: Mutex<Option<CancellationToken>>,
    last_touched: Mutex<Instant>,
}

impl SessionSlot {
    fn touch(&self) -> Result<()> {
        *lock(&self.last_touched)? = Instant::now();
        Ok(())
    }

    fn idle_for(&self, now: Instant) -> Result<Duration> {
        Ok(now.saturating_duration_since(*lock(&self.last_touched)?))
    }

    fn cancel_countdown(&self) -> Result<()> {
        if let Some(token) = lock(&self.countdown)?.take() {
            token.cancel();
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| Error::Internal("Session lock poisoned".to_string()))
}

/// Owns every live quiz session and drives their countdowns.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<SessionSlot>>>>,
    generator: GeneratorService,
    scorer: ScoringService,
    preferences: UiPreferences,
}

impl SessionService {
    pub fn new(
        generator: GeneratorService,
        scorer: ScoringService,
        preferences: UiPreferences,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            generator,
            scorer,
            preferences,
        }
    }

    pub fn create(
        &self,
        subject_id: &str,
        difficulty: DifficultyLevel,
        chapter_id: Option<String>,
        preferences: Option<UiPreferences>,
    ) -> Result<TestSession> {
        let test = self
            .generator
            .generate_test(subject_id, difficulty, chapter_id.as_deref());
        let session = TestSession::new(
            subject_id,
            test,
            chapter_id,
            preferences.unwrap_or(self.preferences),
        );
        let snapshot = session.clone();

        let slot = Arc::new(SessionSlot {
            session: Mutex::new(session),
            countdown: Mutex::new(None),
            last_touched: Mutex::new(Instant::now()),
        });
        self.sessions
            .write()
            .map_err(|_| Error::Internal("Session table lock poisoned".to_string()))?
            .insert(snapshot.id, slot);

        tracing::info!(session_id = %snapshot.id, subject_id, "session created");
        Ok(snapshot)
    }

    fn slot(&self, id: Uuid) -> Result<Arc<SessionSlot>> {
        let slot = self
            .sessions
            .read()
            .map_err(|_| Error::Internal("Session table lock poisoned".to_string()))?
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Session {} not found", id)))?;
        slot.touch()?;
        Ok(slot)
    }

    fn update<F>(&self, id: Uuid, f: F) -> Result<TestSession>
    where
        F: FnOnce(&mut TestSession) -> Result<()>,
    {
        let slot = self.slot(id)?;
        let mut session = lock(&slot.session)?;
        f(&mut session)?;
        Ok(session.clone())
    }

    pub fn get(&self, id: Uuid) -> Result<TestSession> {
        let slot = self.slot(id)?;
        let session = lock(&slot.session)?;
        Ok(session.clone())
    }

    pub fn remove(&self, id: Uuid) -> Result<()> {
        let slot = self
            .sessions
            .write()
            .map_err(|_| Error::Internal("Session table lock poisoned".to_string()))?
            .remove(&id)
            .ok_or_else(|| Error::NotFound(format!("Session {} not found", id)))?;
        slot.cancel_countdown()?;
        tracing::info!(session_id = %id, "session removed");
        Ok(())
    }

    /// Drops every session that has not been touched for `idle`. A session with
    /// a running test is kept; its countdown finishes it first.
    pub fn evict_idle(&self, idle: Duration) -> Result<usize> {
        let now = Instant::now();
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| Error::Internal("Session table lock poisoned".to_string()))?;

        let mut stale = Vec::new();
        for (id, slot) in sessions.iter() {
            let running = lock(&slot.session)?.state == SessionState::InProgress;
            if !running && slot.idle_for(now)? >= idle {
                stale.push(*id);
            }
        }

        for id in &stale {
            if let Some(slot) = sessions.remove(id) {
                slot.cancel_countdown()?;
                tracing::debug!(session_id = %id, "idle session evicted");
            }
        }
        Ok(stale.len())
    }

    /// Sweeps idle sessions once a minute for the life of the runtime.
    pub fn spawn_cleanup(&self, idle: Duration) {
        let service = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                match service.evict_idle(idle) {
                    Ok(0) => {}
                    Ok(evicted) => tracing::info!(evicted, "idle sessions evicted"),
                    Err(e) => tracing::error!(error = %e, "session cleanup failed"),
                }
            }
        });
    }

    /// Starts the test and its countdown. Must be called from within a tokio
    /// runtime.
    pub fn start(&self, id: Uuid) -> Result<TestSession> {
        let slot = self.slot(id)?;
        let snapshot = {
            let mut session = lock(&slot.session)?;
            session.start()?;
            session.clone()
        };

        let token = CancellationToken::new();
        if let Some(stale) = lock(&slot.countdown)?.replace(token.clone()) {
            stale.cancel();
        }
        self.spawn_countdown(slot, token);

        tracing::info!(session_id = %id, duration = snapshot.time_remaining, "test started");
        Ok(snapshot)
    }

    fn spawn_countdown(&self, slot: Arc<SessionSlot>, token: CancellationToken) {
        let service = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let outcome = match lock(&slot.session) {
                            Ok(mut session) => session.tick(),
                            Err(e) => {
                                tracing::error!(error = %e, "countdown stopped");
                                break;
                            }
                        };
                        match outcome {
                            TickOutcome::Running(_) => {}
                            TickOutcome::Idle => break,
                            TickOutcome::Expired => {
                                match service.finish(&slot) {
                                    Ok(session) => tracing::info!(
                                        session_id = %session.id,
                                        "time is up, test submitted"
                                    ),
                                    Err(e) => tracing::warn!(error = %e, "auto-submit skipped"),
                                }
                                break;
                            }
                        }
                    }
                }
            }
        });
    }

    /// Scores the session's answers and moves it to `completed`. The state
    /// check under the session lock makes a second submission a conflict.
    fn finish(&self, slot: &SessionSlot) -> Result<TestSession> {
        let snapshot = {
            let mut session = lock(&slot.session)?;
            session.ensure_can_submit()?;
            let result = self.scorer.score_test(&session.test, &session.answers);
            let next = ScoringService::next_difficulty(&result);
            tracing::info!(
                session_id = %session.id,
                score = result.score,
                current = %result.difficulty,
                next = %next,
                "test submitted"
            );
            session.complete(result, next)?;
            session.clone()
        };
        slot.touch()?;
        slot.cancel_countdown()?;
        Ok(snapshot)
    }

    pub fn select_option(&self, id: Uuid, option: usize) -> Result<TestSession> {
        self.update(id, |s| s.select_option(option))
    }

    /// Moves to the next question, submitting when already on the last one.
    pub fn next(&self, id: Uuid) -> Result<TestSession> {
        let slot = self.slot(id)?;
        {
            let mut session = lock(&slot.session)?;
            if session.next()? == Advance::Moved {
                return Ok(session.clone());
            }
        }
        self.finish(&slot)
    }

    pub fn previous(&self, id: Uuid) -> Result<TestSession> {
        self.update(id, |s| s.previous())
    }

    pub fn submit(&self, id: Uuid) -> Result<TestSession> {
        let slot = self.slot(id)?;
        self.finish(&slot)
    }

    pub fn review(&self, id: Uuid) -> Result<TestSession> {
        self.update(id, |s| s.review())
    }

    pub fn back_to_results(&self, id: Uuid) -> Result<TestSession> {
        self.update(id, |s| s.back_to_results())
    }

    /// Generates a fresh test for the whole subject at the adapted difficulty.
    pub fn take_again(&self, id: Uuid) -> Result<TestSession> {
        let slot = self.slot(id)?;
        let mut session = lock(&slot.session)?;
        session.ensure_finished()?;
        slot.cancel_countdown()?;
        let test = self
            .generator
            .generate_test(&session.subject_id, session.difficulty, None);
        session.reset(test, None);
        Ok(session.clone())
    }

    pub fn choose_chapter(&self, id: Uuid, chapter_id: String) -> Result<TestSession> {
        let slot = self.slot(id)?;
        let mut session = lock(&slot.session)?;
        session.ensure_can_regenerate()?;
        slot.cancel_countdown()?;
        let test = self.generator.generate_test(
            &session.subject_id,
            session.difficulty,
            Some(&chapter_id),
        );
        session.reset(test, Some(chapter_id));
        Ok(session.clone())
    }

    pub fn set_difficulty(&self, id: Uuid, difficulty: DifficultyLevel) -> Result<TestSession> {
        self.update(id, |session| {
            session.ensure_intro("change difficulty")?;
            let chapter_id = session.chapter_id.clone();
            let test = self.generator.generate_test(
                &session.subject_id,
                difficulty,
                chapter_id.as_deref(),
            );
            session.reset(test, chapter_id);
            Ok(())
        })
    }
}
