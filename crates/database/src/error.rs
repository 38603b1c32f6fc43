use std::path::PathBuf;
use thiserror::Error;

// Variants wrapping another error leave it out of their message; the cause
// chain is printed by the caller.

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load settings for database connection")]
    ConnectionConfigError(#[from] configuration::error::ConfigError),

    #[error("Database operation failed")]
    QueryError(#[from] sqlx::Error),

    #[error("Failed to read schema file {path}")]
    SchemaFileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The requested {0} was not found in the database.")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn schema_file_error_leaves_the_cause_to_the_chain() {
        let err = DbError::SchemaFileError {
            path: PathBuf::from("missing.sql"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "Failed to read schema file missing.sql");
        assert_eq!(
            err.source().map(|cause| cause.to_string()).as_deref(),
            Some("no such file")
        );
    }

    #[test]
    fn query_error_message_does_not_repeat_the_sqlx_error() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), "Database operation failed");
        assert!(err.source().is_some());
    }
}
