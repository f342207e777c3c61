//! Data access layer for the `shopping_list` table
//!
//! Schema is owned elsewhere - NO migrations.
//! Assumes the table already exists with the layout in `schema`.

pub mod client;
pub mod schema;
pub mod shopping_list;

pub use client::*;
pub use schema::*;
pub use shopping_list::ShoppingListService;

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(#[source] sqlx::Error),

    #[error("Database query error: {0}")]
    QueryError(#[source] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Update for item {0} sets no fields")]
    EmptyUpdate(i32),
}

impl DbError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation(_))
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, DbError::ConnectionError(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let constraint = err.as_database_error().is_some_and(|db_err| {
            matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            )
        });

        if constraint {
            DbError::ConstraintViolation(err)
        } else if matches!(
            err,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::WorkerCrashed
        ) {
            DbError::ConnectionError(err)
        } else {
            DbError::QueryError(err)
        }
    }
}

impl From<shoplist_config::ConfigError> for DbError {
    fn from(err: shoplist_config::ConfigError) -> Self {
        DbError::ConfigError(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
