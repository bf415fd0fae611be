use thiserror::Error;

use crate::services::team_formation::FormationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("User is not a coach for this competition")]
    NotCoach,

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error(transparent)]
    Formation(#[from] FormationError),

    #[error("Merge commit failed: {0}")]
    MergeCommitFailed(#[source] Box<StorageError>),
}

pub type Result<T> = std::result::Result<T, StorageError>;
