//! Error taxonomy shared by the store implementations and the flows.

use thiserror::Error;

use crate::logger::{LogLevel, Logger};
use crate::model::CourtNumber;

/// A record or request broke a structural rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failures originating from the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached (network down, server stopped).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The remote side answered with an error status.
    #[error("remote error {status}: {message}")]
    Remote { status: u16, message: String },

    /// A record could not be decoded.
    #[error("malformed record: {0}")]
    Decode(String),

    #[error("match '{0}' not found")]
    MatchNotFound(String),

    #[error("court {0} already has an active match")]
    CourtOccupied(CourtNumber),

    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),
}

/// What a flow reports when an operation does not succeed.
///
/// Every store call site converts its outcome into one of these before
/// handing anything back to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store fault: {0}")]
    StoreFault(#[from] StoreError),
}

impl FlowError {
    /// Log level this kind of failure is recorded at.
    pub fn level(&self) -> LogLevel {
        match self {
            FlowError::Validation(_) => LogLevel::Info,
            FlowError::NotFound(_) => LogLevel::Warn,
            FlowError::StoreFault(_) => LogLevel::Error,
        }
    }

    /// Record this failure with the raw cause attached as detail.
    pub fn report(&self, logger: &dyn Logger, source: &str, message: &str) {
        let detail = self.to_string();
        logger.log(self.level(), message, source, Some(&detail));
    }
}
