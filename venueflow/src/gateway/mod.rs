//! Backend sync gateway.
//!
//! The gateway is the only writer of persistent state. It wraps a
//! [`BookingBackend`] (the REST API, or an in-process store) and adds the
//! offline rules: a failed booking fetch yields the built-in fallback dataset
//! and [`Connectivity::Offline`], and every mutation is refused up front while
//! the caller's connectivity is offline.

use crate::error::DashboardError;
use crate::types::{Booking, BookingId, BookingStatus, Connectivity, NewBooking, NewUser, User};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

pub mod fallback;
pub mod memory;
pub mod rest;

pub use memory::InMemoryBackend;
pub use rest::RestBackend;

/// Gateway result
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Boxed future returned by backend operations
pub type BackendFuture<T> = Pin<Box<dyn Future<Output = GatewayResult<T>> + Send>>;

/// Backend failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No response from the backend
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// Non-success status
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response body could not be decoded
    #[error("could not decode backend response: {0}")]
    Decode(String),

    /// Mutation refused because the dashboard is offline
    #[error("cannot {operation} while offline")]
    Offline {
        /// What was attempted
        operation: &'static str,
    },
}

impl From<GatewayError> for DashboardError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Unreachable(message) => Self::NetworkUnreachable(message),
            GatewayError::Status { status, .. } => Self::Backend { status },
            GatewayError::Decode(message) => Self::MalformedResponse(message),
            GatewayError::Offline { operation } => Self::OfflineRejected {
                operation: operation.to_string(),
            },
        }
    }
}

/// Persistence operations of the backend
///
/// Futures own everything they need so effects can run them on any task.
pub trait BookingBackend: Send + Sync {
    /// All bookings
    fn fetch_bookings(&self) -> BackendFuture<Vec<Booking>>;

    /// Accounts whose email equals `email` (already lower-cased)
    fn find_users_by_email(&self, email: &str) -> BackendFuture<Vec<User>>;

    /// Create an account
    fn create_user(&self, user: NewUser) -> BackendFuture<User>;

    /// Create a booking
    fn create_booking(&self, booking: NewBooking) -> BackendFuture<Booking>;

    /// Replace the status of a booking
    fn update_booking_status(&self, id: &BookingId, status: BookingStatus) -> BackendFuture<Booking>;

    /// Delete a booking
    fn delete_booking(&self, id: &BookingId) -> BackendFuture<()>;
}

/// Result of a booking fetch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Whether the data came from the backend
    pub connectivity: Connectivity,
    /// The bookings
    pub bookings: Vec<Booking>,
}

/// Backend plus offline rules
#[derive(Clone)]
pub struct SyncGateway {
    backend: Arc<dyn BookingBackend>,
}

impl std::fmt::Debug for SyncGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncGateway").finish_non_exhaustive()
    }
}

impl SyncGateway {
    /// Wrap a backend
    #[must_use]
    pub fn new(backend: Arc<dyn BookingBackend>) -> Self {
        Self { backend }
    }

    /// Fetch all bookings, falling back to the built-in dataset on any failure
    pub async fn fetch_bookings(&self) -> Snapshot {
        match self.backend.fetch_bookings().await {
            Ok(bookings) => {
                tracing::info!(count = bookings.len(), "Fetched bookings");
                Snapshot {
                    connectivity: Connectivity::Online,
                    bookings,
                }
            },
            Err(error) => {
                tracing::warn!(error = %error, "Backend unavailable, using fallback data");
                Snapshot {
                    connectivity: Connectivity::Offline,
                    bookings: fallback::fallback_bookings(),
                }
            },
        }
    }

    /// Accounts that may match a login for `email`
    ///
    /// Any backend failure yields the built-in accounts instead.
    pub async fn login_candidates(&self, email: &str) -> Vec<User> {
        match self.backend.find_users_by_email(email).await {
            Ok(users) => users,
            Err(error) => {
                tracing::warn!(error = %error, "User lookup failed, using fallback accounts");
                fallback::fallback_users()
            },
        }
    }

    /// Accounts registered under `email`
    ///
    /// # Errors
    ///
    /// [`GatewayError::Offline`] while offline, otherwise backend failures.
    pub async fn find_users_by_email(
        &self,
        connectivity: Connectivity,
        email: &str,
    ) -> GatewayResult<Vec<User>> {
        Self::guard(connectivity, "sign up")?;
        self.backend.find_users_by_email(email).await
    }

    /// Create an account
    ///
    /// # Errors
    ///
    /// [`GatewayError::Offline`] while offline, otherwise backend failures.
    pub async fn create_user(&self, connectivity: Connectivity, user: NewUser) -> GatewayResult<User> {
        Self::guard(connectivity, "sign up")?;
        self.backend.create_user(user).await.inspect_err(log_failure)
    }

    /// Create a booking
    ///
    /// # Errors
    ///
    /// [`GatewayError::Offline`] while offline, otherwise backend failures.
    pub async fn create_booking(
        &self,
        connectivity: Connectivity,
        booking: NewBooking,
    ) -> GatewayResult<Booking> {
        Self::guard(connectivity, "add booking")?;
        self.backend.create_booking(booking).await.inspect_err(log_failure)
    }

    /// Change the status of a booking
    ///
    /// # Errors
    ///
    /// [`GatewayError::Offline`] while offline, otherwise backend failures.
    pub async fn update_booking_status(
        &self,
        connectivity: Connectivity,
        id: &BookingId,
        status: BookingStatus,
    ) -> GatewayResult<Booking> {
        Self::guard(connectivity, "update booking")?;
        self.backend
            .update_booking_status(id, status)
            .await
            .inspect_err(log_failure)
    }

    /// Delete a booking
    ///
    /// # Errors
    ///
    /// [`GatewayError::Offline`] while offline, otherwise backend failures.
    pub async fn delete_booking(&self, connectivity: Connectivity, id: &BookingId) -> GatewayResult<()> {
        Self::guard(connectivity, "cancel booking")?;
        self.backend.delete_booking(id).await.inspect_err(log_failure)
    }

    const fn guard(connectivity: Connectivity, operation: &'static str) -> GatewayResult<()> {
        if connectivity.is_online() {
            Ok(())
        } else {
            Err(GatewayError::Offline { operation })
        }
    }
}

fn log_failure(error: &GatewayError) {
    tracing::error!(error = %error, "Backend write failed");
}
