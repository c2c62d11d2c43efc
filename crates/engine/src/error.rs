//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a character, item, advert or offer is missing.
//! - [`Forbidden`] thrown when the principal does not own the resource.
//! - [`Conflict`] thrown when an item is already listed or offered, or when a
//!   concurrent trade won the race.
//! - [`InsufficientResource`] thrown when a checked debit would leave a
//!   balance negative.
//! - [`InvalidValue`] thrown when a name, kind or required field is not valid.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`Conflict`]: EngineError::Conflict
//!  [`InsufficientResource`]: EngineError::InsufficientResource
//!  [`InvalidValue`]: EngineError::InvalidValue
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::{Rarity, Resource};

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid trade: {0}")]
    InvalidTrade(String),
    #[error("Trades must be of the same rarity: offered {offered}, wanted {wanted}")]
    RarityMismatch { offered: Rarity, wanted: Rarity },
    #[error(
        "Insufficient {resource}: required {}, available {}",
        amount(.resource, .required),
        amount(.resource, .available)
    )]
    InsufficientResource {
        resource: Resource,
        required: i64,
        available: i64,
    },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Database(DbErr),
}

fn amount(resource: &Resource, value: &i64) -> String {
    resource.format(*value)
}

impl From<DbErr> for EngineError {
    fn from(value: DbErr) -> Self {
        match value.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict(detail),
            _ => Self::Database(value),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::InvalidTrade(a), Self::InvalidTrade(b)) => a == b,
            (
                Self::RarityMismatch {
                    offered: a,
                    wanted: b,
                },
                Self::RarityMismatch {
                    offered: c,
                    wanted: d,
                },
            ) => a == c && b == d,
            (
                Self::InsufficientResource {
                    resource: a,
                    required: b,
                    available: c,
                },
                Self::InsufficientResource {
                    resource: d,
                    required: e,
                    available: f,
                },
            ) => a == d && b == e && c == f,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidValue(a), Self::InvalidValue(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
