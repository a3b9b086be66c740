//! Application state.

use crate::commands::CommandError;
use crate::db::SqliteRepository;
use crate::locale::LocaleDirectory;
use matchquiz_core::QuizSession;
use std::sync::{Arc, Mutex, MutexGuard};

/// Global application state.
pub struct AppState {
    pub session: Mutex<QuizSession>,
    pub repository: Arc<Mutex<SqliteRepository>>,
    pub locales: LocaleDirectory,
}

impl AppState {
    pub fn new(
        session: QuizSession,
        repository: SqliteRepository,
        locales: LocaleDirectory,
    ) -> Self {
        Self {
            session: Mutex::new(session),
            repository: Arc::new(Mutex::new(repository)),
            locales,
        }
    }

    /// Lock the quiz session. Each command holds it for one handler only.
    pub fn session(&self) -> Result<MutexGuard<'_, QuizSession>, CommandError> {
        self.session.lock().map_err(|_| CommandError::poisoned("session"))
    }

    pub fn repository(&self) -> Result<MutexGuard<'_, SqliteRepository>, CommandError> {
        self.repository
            .lock()
            .map_err(|_| CommandError::poisoned("repository"))
    }
}
