use core_types::CoreError;
use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    /// A value read back from the database differs from what was written.
    #[error("{0}")]
    Verification(String),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
