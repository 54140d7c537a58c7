use sqlx::error::ErrorKind;

pub type Result<T, E = QuizError> = std::result::Result<T, E>;

/// Everything the catalog store and the session engine can fail with.
///
/// The first five variants are user mistakes and carry a message fit to show
/// as-is. The rest are store failures.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Integrity(String),

    #[error("only {available} question(s) available for this theme, {requested} requested")]
    InsufficientData { requested: usize, available: usize },

    #[error("{0}")]
    InvalidState(String),

    #[error("default catalog is malformed: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("migration {version} failed: {source}")]
    Migration {
        version: &'static str,
        source: sqlx::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl QuizError {
    /// True for errors caused by the caller's input or timing rather than by the store.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            QuizError::Validation(_)
                | QuizError::Conflict(_)
                | QuizError::Integrity(_)
                | QuizError::InsufficientData { .. }
                | QuizError::InvalidState(_)
        )
    }
}

pub(crate) trait ResultExt<T> {
    /// Maps constraint violations reported by SQLite onto the matching error
    /// variant. `what` names the record being written, e.g. `theme 'Science'`.
    fn or_classify(self, what: &str) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn or_classify(self, what: &str) -> Result<T> {
        self.map_err(|err| classify(err, what))
    }
}

fn classify(err: sqlx::Error, what: &str) -> QuizError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.kind() {
            ErrorKind::UniqueViolation => {
                tracing::warn!("unique constraint rejected {what}: {}", db_err.message());
                return QuizError::Conflict(format!("{what} already exists"));
            }
            ErrorKind::ForeignKeyViolation => {
                tracing::warn!("foreign key rejected {what}: {}", db_err.message());
                return QuizError::Integrity(format!("{what} references a record that does not exist"));
            }
            ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                tracing::warn!("check constraint rejected {what}: {}", db_err.message());
                return QuizError::Validation(format!("{what} is not valid"));
            }
            _ => {}
        }
    }

    tracing::error!("store failure while writing {what}: {err}");
    QuizError::Database(err)
}
