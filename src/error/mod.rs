//! Error definitions
//!
//! This module provides the crate-level error type, so test code can use
//! `?` over both faults raised by stubs and failed verifications.

use thiserror::Error;

use crate::stub::Fault;
use crate::verify::VerificationFailure;

/// Main error type for stubkit
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A verification did not hold
    #[error("Verification failed: {0}")]
    Verification(#[from] VerificationFailure),

    /// A stubbed call raised a fault
    #[error("Raised: {0}")]
    Raised(#[from] Fault),
}

impl Error {
    /// The verification failure, if this error is one.
    #[must_use]
    pub fn as_verification(&self) -> Option<&VerificationFailure> {
        match self {
            Error::Verification(failure) => Some(failure),
            Error::Raised(_) => None,
        }
    }

    /// The raised fault, if this error is one.
    #[must_use]
    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            Error::Raised(fault) => Some(fault),
            Error::Verification(_) => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
