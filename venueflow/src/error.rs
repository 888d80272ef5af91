//! Error taxonomy surfaced by dashboard operations

use crate::types::{BookingId, BookingStatus};
use thiserror::Error;

/// Why a dashboard operation failed
///
/// Carried inside `OperationFailed` events, so it is `Clone` and compares by value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// The backend could not be reached
    #[error("backend unreachable: {0}")]
    NetworkUnreachable(String),

    /// The backend answered with a non-success status
    #[error("backend returned status {status}")]
    Backend {
        /// HTTP status code
        status: u16,
    },

    /// The backend answered with a body that could not be decoded
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    /// Unknown email or wrong password
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Sign-up with an email that already has an account
    #[error("An account with this email already exists.")]
    AlreadyExists,

    /// A mutation was attempted while the backend is unreachable
    #[error("Cannot {operation} while offline.")]
    OfflineRejected {
        /// What was attempted, e.g. `cancel booking`
        operation: String,
    },

    /// The operation needs a session
    #[error("You must be logged in.")]
    NotAuthenticated,

    /// The session may not perform this operation
    #[error("You are not allowed to do that.")]
    Forbidden,

    /// No booking with this id in the mirror
    #[error("booking {0} not found")]
    NotFound(BookingId),

    /// Status change not allowed from the current status
    #[error("cannot change booking from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: BookingStatus,
        /// Requested status
        to: BookingStatus,
    },

    /// The booking request breaks a booking invariant
    #[error("invalid booking: {0}")]
    InvalidBooking(String),

    /// Venue id not in the catalog
    #[error("unknown venue '{0}'")]
    UnknownVenue(String),

    /// A command with this request key was already accepted
    #[error("duplicate submission")]
    DuplicateSubmission,

    /// The store did not answer in time or is shutting down
    #[error("dashboard runtime error: {0}")]
    Runtime(String),
}

impl From<venueflow_runtime::StoreError> for DashboardError {
    fn from(error: venueflow_runtime::StoreError) -> Self {
        Self::Runtime(error.to_string())
    }
}
