//! Dashboard facade.
//!
//! Wraps the Store so callers can issue an operation and await its outcome as
//! a `Result`. Every command is tagged with a fresh [`RequestId`] and the
//! facade waits for the event carrying that id.

use crate::booking::{BookingRequest, DashboardAction, DashboardEnvironment, DashboardReducer, DashboardState};
use crate::calendar::{MonthCursor, MonthGrid};
use crate::error::DashboardError;
use crate::gateway::{BookingBackend, SyncGateway};
use crate::types::{Booking, BookingId, Connectivity, RequestId, User};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use venueflow_core::environment::{Clock, SystemClock};
use venueflow_runtime::Store;

/// Store running the dashboard reducer
pub type DashboardStore = Store<DashboardState, DashboardAction, DashboardEnvironment, DashboardReducer>;

/// Operations of the booking dashboard
#[derive(Clone)]
pub struct Dashboard {
    store: DashboardStore,
    clock: Arc<dyn Clock>,
    response_wait: Duration,
}

impl Dashboard {
    /// Dashboard over `backend` using the wall clock
    #[must_use]
    pub fn new(backend: Arc<dyn BookingBackend>, response_wait: Duration) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock), response_wait)
    }

    /// Dashboard over `backend` using `clock`
    #[must_use]
    pub fn with_clock(backend: Arc<dyn BookingBackend>, clock: Arc<dyn Clock>, response_wait: Duration) -> Self {
        let environment = DashboardEnvironment::new(SyncGateway::new(backend), Arc::clone(&clock));
        Self {
            store: Store::new(DashboardState::default(), DashboardReducer::new(), environment),
            clock,
            response_wait,
        }
    }

    /// Send a command and wait for the event answering it
    ///
    /// # Errors
    ///
    /// The error carried by `OperationFailed`, or [`DashboardError::Runtime`]
    /// when the store does not answer in time.
    async fn dispatch(&self, request_id: RequestId, command: DashboardAction) -> Result<DashboardAction, DashboardError> {
        let event = self
            .store
            .send_and_wait_for(command, move |action| action.answers(request_id), self.response_wait)
            .await?;

        match event {
            DashboardAction::OperationFailed { error, .. } => Err(error),
            event => Ok(event),
        }
    }

    fn unexpected(event: &DashboardAction) -> DashboardError {
        DashboardError::Runtime(format!("unexpected answer {event:?}"))
    }

    /// Fetch bookings, going offline with the fallback data if the backend fails
    ///
    /// # Errors
    ///
    /// Only runtime failures; an unreachable backend is reported as
    /// [`Connectivity::Offline`].
    pub async fn refresh(&self) -> Result<Connectivity, DashboardError> {
        let request_id = RequestId::new();
        match self.dispatch(request_id, DashboardAction::LoadBookings { request_id }).await? {
            DashboardAction::BookingsLoaded { connectivity, .. } => Ok(connectivity),
            event => Err(Self::unexpected(&event)),
        }
    }

    /// Log in
    ///
    /// # Errors
    ///
    /// [`DashboardError::InvalidCredentials`] on unknown email or wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, DashboardError> {
        let request_id = RequestId::new();
        let command = DashboardAction::Login {
            request_id,
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.dispatch(request_id, command).await? {
            DashboardAction::LoggedIn { user, .. } => Ok(user),
            event => Err(Self::unexpected(&event)),
        }
    }

    /// Create an account and log in as it
    ///
    /// # Errors
    ///
    /// [`DashboardError::OfflineRejected`] while offline,
    /// [`DashboardError::AlreadyExists`] for a taken email, otherwise backend failures.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, DashboardError> {
        let request_id = RequestId::new();
        let command = DashboardAction::SignUp {
            request_id,
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.dispatch(request_id, command).await? {
            DashboardAction::SignedUp { user, .. } => Ok(user),
            event => Err(Self::unexpected(&event)),
        }
    }

    /// End the session
    ///
    /// # Errors
    ///
    /// Runtime failures only.
    pub async fn logout(&self) -> Result<(), DashboardError> {
        self.store.send(DashboardAction::Logout).await?;
        Ok(())
    }

    /// Submit a booking request as the session user
    ///
    /// # Errors
    ///
    /// See [`Dashboard::submit_booking_with_key`].
    pub async fn submit_booking(&self, request: BookingRequest) -> Result<Booking, DashboardError> {
        self.submit_booking_with_key(RequestId::new(), request).await
    }

    /// Submit a booking request under a caller-chosen key
    ///
    /// Re-sending a key that was already accepted is rejected, which makes a
    /// double-clicked submit create one booking.
    ///
    /// # Errors
    ///
    /// - [`DashboardError::NotAuthenticated`] without a session
    /// - [`DashboardError::OfflineRejected`] while offline
    /// - [`DashboardError::DuplicateSubmission`] for a reused key
    /// - [`DashboardError::UnknownVenue`] or [`DashboardError::InvalidBooking`]
    ///   for a request that breaks the catalog rules
    pub async fn submit_booking_with_key(
        &self,
        request_id: RequestId,
        request: BookingRequest,
    ) -> Result<Booking, DashboardError> {
        match self
            .dispatch(request_id, DashboardAction::SubmitBooking { request_id, request })
            .await?
        {
            DashboardAction::BookingCreated { booking, .. } => Ok(booking),
            event => Err(Self::unexpected(&event)),
        }
    }

    /// Approve a pending booking
    ///
    /// # Errors
    ///
    /// - [`DashboardError::Forbidden`] unless the session is an admin
    /// - [`DashboardError::OfflineRejected`] while offline
    /// - [`DashboardError::NotFound`] for an unknown id
    /// - [`DashboardError::InvalidTransition`] unless the booking is pending
    pub async fn confirm_booking(&self, booking_id: &BookingId) -> Result<Booking, DashboardError> {
        let request_id = RequestId::new();
        let command = DashboardAction::ConfirmBooking {
            request_id,
            booking_id: booking_id.clone(),
        };
        match self.dispatch(request_id, command).await? {
            DashboardAction::BookingStatusChanged { booking, .. } => Ok(booking),
            event => Err(Self::unexpected(&event)),
        }
    }

    /// Decline a pending booking
    ///
    /// # Errors
    ///
    /// Same as [`Dashboard::confirm_booking`].
    pub async fn reject_booking(&self, booking_id: &BookingId) -> Result<Booking, DashboardError> {
        let request_id = RequestId::new();
        let command = DashboardAction::RejectBooking {
            request_id,
            booking_id: booking_id.clone(),
        };
        match self.dispatch(request_id, command).await? {
            DashboardAction::BookingStatusChanged { booking, .. } => Ok(booking),
            event => Err(Self::unexpected(&event)),
        }
    }

    /// Delete one of the session user's bookings
    ///
    /// # Errors
    ///
    /// - [`DashboardError::NotAuthenticated`] without a session
    /// - [`DashboardError::OfflineRejected`] while offline
    /// - [`DashboardError::NotFound`] for an unknown id
    /// - [`DashboardError::Forbidden`] for someone else's booking
    pub async fn cancel_booking(&self, booking_id: &BookingId) -> Result<(), DashboardError> {
        let request_id = RequestId::new();
        let command = DashboardAction::CancelBooking {
            request_id,
            booking_id: booking_id.clone(),
        };
        match self.dispatch(request_id, command).await? {
            DashboardAction::BookingCancelled { .. } => Ok(()),
            event => Err(Self::unexpected(&event)),
        }
    }

    /// All bookings in the mirror
    pub async fn bookings(&self) -> Vec<Booking> {
        self.store.state(|s| s.bookings.clone()).await
    }

    /// Bookings owned by the session user
    pub async fn my_bookings(&self) -> Vec<Booking> {
        self.store
            .state(|s| s.my_bookings().into_iter().cloned().collect())
            .await
    }

    /// Booking by id
    pub async fn booking(&self, booking_id: &BookingId) -> Option<Booking> {
        self.store.state(|s| s.booking(booking_id).cloned()).await
    }

    /// The logged-in account
    pub async fn session(&self) -> Option<User> {
        self.store.state(|s| s.session.clone()).await
    }

    /// Result of the last fetch
    pub async fn connectivity(&self) -> Connectivity {
        self.store.state(|s| s.connectivity).await
    }

    /// Most recent failure
    pub async fn last_error(&self) -> Option<DashboardError> {
        self.store.state(|s| s.last_error.clone()).await
    }

    /// When bookings were last fetched
    pub async fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.store.state(|s| s.last_synced_at).await
    }

    /// Month containing today
    #[must_use]
    pub fn current_month(&self) -> MonthCursor {
        MonthCursor::current(self.clock.as_ref())
    }

    /// Run `view` over the grid of `cursor`'s month filled with the mirrored bookings
    pub async fn with_month<T>(&self, cursor: MonthCursor, view: impl FnOnce(MonthGrid<'_>) -> T) -> T {
        self.store.state(|s| view(cursor.grid(&s.bookings))).await
    }

    /// Stop accepting operations and let running ones finish
    ///
    /// # Errors
    ///
    /// [`DashboardError::Runtime`] if operations are still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), DashboardError> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }
}
