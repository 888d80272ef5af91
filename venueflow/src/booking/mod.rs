//! Dashboard reducer: sessions and the booking lifecycle.
//!
//! Commands are validated against the in-process mirror. Rejections are
//! answered with an `OperationFailed` event so the caller waiting on the
//! command's request id always gets an answer. Accepted commands return an
//! effect that calls the gateway and feeds the outcome back as an event;
//! only events mutate the mirror.
//!
//! Checks run in a fixed order: session, connectivity, authorization, then
//! existence and status.

use crate::error::DashboardError;
use crate::gateway::SyncGateway;
use crate::session;
use crate::types::{Booking, BookingId, BookingStatus, Connectivity, NewUser, RequestId, Role, User};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use venueflow_core::environment::Clock;
use venueflow_core::{SmallVec, async_effect, effect::Effect, feedback, reducer::Reducer, smallvec};

pub mod request;

pub use request::BookingRequest;

// ============================================================================
// State
// ============================================================================

/// In-process mirror of the backend plus the session
#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    /// Logged-in account
    pub session: Option<User>,
    /// Result of the last booking fetch
    pub connectivity: Connectivity,
    /// Bookings as of the last fetch and the writes since
    pub bookings: Vec<Booking>,
    /// Request keys of booking submissions in flight or completed
    ///
    /// A key is released again when its backend write fails, so the same
    /// attempt can be retried.
    pub submissions: HashSet<RequestId>,
    /// Most recent failure
    pub last_error: Option<DashboardError>,
    /// When bookings were last fetched
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    /// Booking by id
    #[must_use]
    pub fn booking(&self, id: &BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|booking| &booking.id == id)
    }

    /// Bookings owned by the session user
    #[must_use]
    pub fn my_bookings(&self) -> Vec<&Booking> {
        self.session.as_ref().map_or_else(Vec::new, |user| {
            self.bookings
                .iter()
                .filter(|booking| booking.is_owned_by(user))
                .collect()
        })
    }

    fn upsert(&mut self, booking: Booking) {
        match self.bookings.iter_mut().find(|existing| existing.id == booking.id) {
            Some(existing) => *existing = booking,
            None => self.bookings.push(booking),
        }
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Commands and the events answering them
#[derive(Clone, Debug)]
pub enum DashboardAction {
    // Commands
    /// Fetch all bookings
    LoadBookings {
        /// Correlation key
        request_id: RequestId,
    },
    /// Authenticate
    Login {
        /// Correlation key
        request_id: RequestId,
        /// Email, any case
        email: String,
        /// Password
        password: String,
    },
    /// Create an account and authenticate as it
    SignUp {
        /// Correlation key
        request_id: RequestId,
        /// Display name
        name: String,
        /// Email, any case
        email: String,
        /// Password
        password: String,
    },
    /// Clear the session
    Logout,
    /// Submit a booking request as the session user
    SubmitBooking {
        /// Correlation key, one per attempt
        request_id: RequestId,
        /// What to book
        request: BookingRequest,
    },
    /// Approve a pending booking (admin)
    ConfirmBooking {
        /// Correlation key
        request_id: RequestId,
        /// Booking to approve
        booking_id: BookingId,
    },
    /// Decline a pending booking (admin)
    RejectBooking {
        /// Correlation key
        request_id: RequestId,
        /// Booking to decline
        booking_id: BookingId,
    },
    /// Delete one of the session user's bookings
    CancelBooking {
        /// Correlation key
        request_id: RequestId,
        /// Booking to delete
        booking_id: BookingId,
    },

    // Events
    /// Bookings fetched, from the backend or the fallback
    BookingsLoaded {
        /// Correlation key
        request_id: RequestId,
        /// Where the data came from
        connectivity: Connectivity,
        /// The bookings
        bookings: Vec<Booking>,
        /// Fetch time
        loaded_at: DateTime<Utc>,
    },
    /// Session established
    LoggedIn {
        /// Correlation key
        request_id: RequestId,
        /// The account
        user: User,
    },
    /// Account created and session established
    SignedUp {
        /// Correlation key
        request_id: RequestId,
        /// The new account
        user: User,
    },
    /// Booking persisted
    BookingCreated {
        /// Correlation key
        request_id: RequestId,
        /// The stored booking
        booking: Booking,
    },
    /// Booking status persisted
    BookingStatusChanged {
        /// Correlation key
        request_id: RequestId,
        /// The stored booking
        booking: Booking,
    },
    /// Booking deleted
    BookingCancelled {
        /// Correlation key
        request_id: RequestId,
        /// The deleted booking
        booking_id: BookingId,
    },
    /// A command was rejected or its backend call failed
    OperationFailed {
        /// Correlation key
        request_id: RequestId,
        /// Why
        error: DashboardError,
    },
}

impl DashboardAction {
    /// Correlation key, for every action but `Logout`
    #[must_use]
    pub const fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::Logout => None,
            Self::LoadBookings { request_id }
            | Self::Login { request_id, .. }
            | Self::SignUp { request_id, .. }
            | Self::SubmitBooking { request_id, .. }
            | Self::ConfirmBooking { request_id, .. }
            | Self::RejectBooking { request_id, .. }
            | Self::CancelBooking { request_id, .. }
            | Self::BookingsLoaded { request_id, .. }
            | Self::LoggedIn { request_id, .. }
            | Self::SignedUp { request_id, .. }
            | Self::BookingCreated { request_id, .. }
            | Self::BookingStatusChanged { request_id, .. }
            | Self::BookingCancelled { request_id, .. }
            | Self::OperationFailed { request_id, .. } => Some(*request_id),
        }
    }

    /// Whether this is an event answering a command
    #[must_use]
    pub const fn is_event(&self) -> bool {
        matches!(
            self,
            Self::BookingsLoaded { .. }
                | Self::LoggedIn { .. }
                | Self::SignedUp { .. }
                | Self::BookingCreated { .. }
                | Self::BookingStatusChanged { .. }
                | Self::BookingCancelled { .. }
                | Self::OperationFailed { .. }
        )
    }

    /// Whether this event answers the command tagged `request_id`
    #[must_use]
    pub fn answers(&self, request_id: RequestId) -> bool {
        self.is_event() && self.request_id() == Some(request_id)
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the dashboard reducer
#[derive(Clone)]
pub struct DashboardEnvironment {
    /// Backend access
    pub gateway: SyncGateway,
    /// Clock for sync timestamps
    pub clock: Arc<dyn Clock>,
}

impl DashboardEnvironment {
    /// Creates a new `DashboardEnvironment`
    #[must_use]
    pub fn new(gateway: SyncGateway, clock: Arc<dyn Clock>) -> Self {
        Self { gateway, clock }
    }
}

// ============================================================================
// Reducer
// ============================================================================

type Effects = SmallVec<[Effect<DashboardAction>; 4]>;

/// Reducer for the dashboard
#[derive(Clone, Debug, Default)]
pub struct DashboardReducer;

impl DashboardReducer {
    /// Creates a new `DashboardReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn reject(request_id: RequestId, error: DashboardError) -> Effects {
        smallvec![feedback!(DashboardAction::OperationFailed { request_id, error })]
    }

    fn require_online(state: &DashboardState, operation: &str) -> Result<(), DashboardError> {
        if state.connectivity.is_online() {
            Ok(())
        } else {
            Err(DashboardError::OfflineRejected {
                operation: operation.to_string(),
            })
        }
    }

    /// Admin status change from `pending` to `target`
    fn validate_review(
        state: &DashboardState,
        booking_id: &BookingId,
        target: BookingStatus,
    ) -> Result<Connectivity, DashboardError> {
        session::require_admin(state.session.as_ref())?;
        Self::require_online(state, "update booking")?;
        let booking = state
            .booking(booking_id)
            .ok_or_else(|| DashboardError::NotFound(booking_id.clone()))?;
        if booking.status != BookingStatus::Pending {
            return Err(DashboardError::InvalidTransition {
                from: booking.status,
                to: target,
            });
        }
        Ok(state.connectivity)
    }

    fn validate_cancel(state: &DashboardState, booking_id: &BookingId) -> Result<Connectivity, DashboardError> {
        let user = session::require_user(state.session.as_ref())?;
        Self::require_online(state, "cancel booking")?;
        let booking = state
            .booking(booking_id)
            .ok_or_else(|| DashboardError::NotFound(booking_id.clone()))?;
        session::require_owner(user, booking)?;
        Ok(state.connectivity)
    }

    fn review(
        state: &DashboardState,
        env: &DashboardEnvironment,
        request_id: RequestId,
        booking_id: BookingId,
        target: BookingStatus,
    ) -> Effects {
        match Self::validate_review(state, &booking_id, target) {
            Ok(connectivity) => {
                let gateway = env.gateway.clone();
                smallvec![async_effect! {
                    Some(match gateway.update_booking_status(connectivity, &booking_id, target).await {
                        Ok(booking) => DashboardAction::BookingStatusChanged { request_id, booking },
                        Err(error) => DashboardAction::OperationFailed { request_id, error: error.into() },
                    })
                }]
            },
            Err(error) => Self::reject(request_id, error),
        }
    }

    /// Applies an event to state
    fn apply_event(state: &mut DashboardState, action: DashboardAction) {
        match action {
            DashboardAction::BookingsLoaded {
                connectivity,
                bookings,
                loaded_at,
                ..
            } => {
                state.connectivity = connectivity;
                state.bookings = bookings;
                state.last_synced_at = Some(loaded_at);
                state.last_error = None;
            },
            DashboardAction::LoggedIn { user, .. } | DashboardAction::SignedUp { user, .. } => {
                tracing::info!(user_id = %user.id, "Session started");
                state.session = Some(user);
                state.last_error = None;
            },
            DashboardAction::BookingCreated { booking, .. } => {
                tracing::info!(booking_id = %booking.id, venue = %booking.venue_id, "Booking created");
                state.upsert(booking);
                state.last_error = None;
            },
            DashboardAction::BookingStatusChanged { booking, .. } => {
                tracing::info!(booking_id = %booking.id, status = %booking.status, "Booking status changed");
                state.upsert(booking);
                state.last_error = None;
            },
            DashboardAction::BookingCancelled { booking_id, .. } => {
                tracing::info!(booking_id = %booking_id, "Booking cancelled");
                state.bookings.retain(|booking| booking.id != booking_id);
                state.last_error = None;
            },
            DashboardAction::OperationFailed { request_id, error } => {
                tracing::warn!(%request_id, error = %error, "Operation failed");
                if error != DashboardError::DuplicateSubmission && state.submissions.remove(&request_id) {
                    tracing::debug!(%request_id, "Submission key released for retry");
                }
                state.last_error = Some(error);
            },
            _ => {},
        }
    }
}

/// Create `new_user` unless its email is already registered
async fn register(
    gateway: &SyncGateway,
    connectivity: Connectivity,
    new_user: NewUser,
) -> Result<User, DashboardError> {
    let existing = gateway.find_users_by_email(connectivity, &new_user.email).await?;
    if !existing.is_empty() {
        return Err(DashboardError::AlreadyExists);
    }
    Ok(gateway.create_user(connectivity, new_user).await?)
}

impl Reducer for DashboardReducer {
    type State = DashboardState;
    type Action = DashboardAction;
    type Environment = DashboardEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per command
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            DashboardAction::LoadBookings { request_id } => {
                let gateway = env.gateway.clone();
                let clock = Arc::clone(&env.clock);
                smallvec![async_effect! {
                    let snapshot = gateway.fetch_bookings().await;
                    Some(DashboardAction::BookingsLoaded {
                        request_id,
                        connectivity: snapshot.connectivity,
                        bookings: snapshot.bookings,
                        loaded_at: clock.now(),
                    })
                }]
            },

            DashboardAction::Login {
                request_id,
                email,
                password,
            } => {
                let gateway = env.gateway.clone();
                let email = session::normalize_email(&email);
                smallvec![async_effect! {
                    let candidates = gateway.login_candidates(&email).await;
                    Some(match session::authenticate(&candidates, &email, &password) {
                        Ok(user) => DashboardAction::LoggedIn { request_id, user },
                        Err(error) => DashboardAction::OperationFailed { request_id, error },
                    })
                }]
            },

            DashboardAction::SignUp {
                request_id,
                name,
                email,
                password,
            } => {
                if let Err(error) = Self::require_online(state, "sign up") {
                    return Self::reject(request_id, error);
                }
                let gateway = env.gateway.clone();
                let connectivity = state.connectivity;
                let new_user = NewUser {
                    email: session::normalize_email(&email),
                    password,
                    name,
                    role: Role::User,
                };
                smallvec![async_effect! {
                    Some(match register(&gateway, connectivity, new_user).await {
                        Ok(user) => DashboardAction::SignedUp { request_id, user },
                        Err(error) => DashboardAction::OperationFailed { request_id, error },
                    })
                }]
            },

            DashboardAction::Logout => {
                if let Some(user) = state.session.take() {
                    tracing::info!(user_id = %user.id, "Session ended");
                }
                state.last_error = None;
                SmallVec::new()
            },

            DashboardAction::SubmitBooking { request_id, request } => {
                // a recorded key only ever answers DuplicateSubmission
                if state.submissions.contains(&request_id) {
                    return Self::reject(request_id, DashboardError::DuplicateSubmission);
                }
                let Some(owner) = state.session.clone() else {
                    return Self::reject(request_id, DashboardError::NotAuthenticated);
                };
                if let Err(error) = Self::require_online(state, "add booking") {
                    return Self::reject(request_id, error);
                }
                let new_booking = match request.into_new_booking(&owner) {
                    Ok(new_booking) => new_booking,
                    Err(error) => return Self::reject(request_id, error),
                };

                state.submissions.insert(request_id);
                let gateway = env.gateway.clone();
                let connectivity = state.connectivity;
                smallvec![async_effect! {
                    Some(match gateway.create_booking(connectivity, new_booking).await {
                        Ok(booking) => DashboardAction::BookingCreated { request_id, booking },
                        Err(error) => DashboardAction::OperationFailed { request_id, error: error.into() },
                    })
                }]
            },

            DashboardAction::ConfirmBooking {
                request_id,
                booking_id,
            } => Self::review(state, env, request_id, booking_id, BookingStatus::Confirmed),

            DashboardAction::RejectBooking {
                request_id,
                booking_id,
            } => Self::review(state, env, request_id, booking_id, BookingStatus::Rejected),

            DashboardAction::CancelBooking {
                request_id,
                booking_id,
            } => match Self::validate_cancel(state, &booking_id) {
                Ok(connectivity) => {
                    let gateway = env.gateway.clone();
                    smallvec![async_effect! {
                        Some(match gateway.delete_booking(connectivity, &booking_id).await {
                            Ok(()) => DashboardAction::BookingCancelled { request_id, booking_id },
                            Err(error) => DashboardAction::OperationFailed { request_id, error: error.into() },
                        })
                    }]
                },
                Err(error) => Self::reject(request_id, error),
            },

            event => {
                Self::apply_event(state, event);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::gateway::InMemoryBackend;
    use crate::gateway::fallback::{fallback_bookings, fallback_users};
    use crate::types::FeatureCategory;
    use chrono::{NaiveDate, NaiveTime};
    use venueflow_testing::{ReducerTest, assertions, test_clock};

    fn env(backend: &InMemoryBackend) -> DashboardEnvironment {
        DashboardEnvironment::new(
            SyncGateway::new(Arc::new(backend.clone())),
            Arc::new(test_clock()),
        )
    }

    fn user(name: &str) -> User {
        fallback_users().into_iter().find(|u| u.name == name).unwrap()
    }

    fn pending_booking() -> Booking {
        Booking {
            id: BookingId::new("7"),
            status: BookingStatus::Pending,
            ..fallback_bookings().remove(0)
        }
    }

    fn state_with(session: Option<User>, connectivity: Connectivity) -> DashboardState {
        let mut bookings = fallback_bookings();
        bookings.push(pending_booking());
        DashboardState {
            session,
            connectivity,
            bookings,
            ..DashboardState::default()
        }
    }

    fn failure(actions: &[DashboardAction]) -> Option<DashboardError> {
        match actions {
            [DashboardAction::OperationFailed { error, .. }] => Some(error.clone()),
            _ => None,
        }
    }

    #[test]
    fn load_bookings_goes_offline_with_fallback_data() {
        let backend = InMemoryBackend::new();
        backend.set_reachable(false);

        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&backend))
            .given_state(DashboardState::default())
            .when_action(DashboardAction::LoadBookings {
                request_id: RequestId::new(),
            })
            .then_effects(assertions::assert_has_future_effect)
            .then_feedback(|actions| {
                let [DashboardAction::BookingsLoaded { connectivity, bookings, loaded_at, .. }] = actions else {
                    panic!("expected BookingsLoaded, got {actions:?}");
                };
                assert_eq!(*connectivity, Connectivity::Offline);
                assert_eq!(bookings, &fallback_bookings());
                assert_eq!(*loaded_at, test_clock().now());
            })
            .run();
    }

    #[test]
    fn bookings_loaded_replaces_mirror() {
        let loaded_at = test_clock().now();
        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::new()))
            .given_state(state_with(None, Connectivity::Offline))
            .when_action(DashboardAction::BookingsLoaded {
                request_id: RequestId::new(),
                connectivity: Connectivity::Online,
                bookings: Vec::new(),
                loaded_at,
            })
            .then_state(move |state| {
                assert_eq!(state.connectivity, Connectivity::Online);
                assert!(state.bookings.is_empty());
                assert_eq!(state.last_synced_at, Some(loaded_at));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn login_is_case_insensitive() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::seeded()))
            .given_state(DashboardState::default())
            .when_action(DashboardAction::Login {
                request_id: RequestId::new(),
                email: "ADMIN@venueflow.com".to_string(),
                password: "adminpassword".to_string(),
            })
            .then_feedback(|actions| {
                assert!(matches!(
                    actions,
                    [DashboardAction::LoggedIn { user, .. }] if user.role == Role::Admin
                ));
            })
            .run();
    }

    #[test]
    fn login_with_wrong_password_fails() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::seeded()))
            .given_state(DashboardState::default())
            .when_action(DashboardAction::Login {
                request_id: RequestId::new(),
                email: "alex@venueflow.com".to_string(),
                password: "nope".to_string(),
            })
            .then_state(|state| assert!(state.session.is_none()))
            .then_feedback(|actions| {
                assert_eq!(failure(actions), Some(DashboardError::InvalidCredentials));
            })
            .run();
    }

    #[test]
    fn sign_up_refused_offline_without_requests() {
        let backend = InMemoryBackend::seeded();
        let probe = backend.clone();

        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&backend))
            .given_state(state_with(None, Connectivity::Offline))
            .when_action(DashboardAction::SignUp {
                request_id: RequestId::new(),
                name: "Sam".to_string(),
                email: "sam@venueflow.com".to_string(),
                password: "pw".to_string(),
            })
            .then_feedback(move |actions| {
                assert!(matches!(failure(actions), Some(DashboardError::OfflineRejected { .. })));
                assert_eq!(probe.request_count(), 0);
            })
            .run();
    }

    #[test]
    fn sign_up_with_existing_email_creates_nothing() {
        let backend = InMemoryBackend::seeded();
        let probe = backend.clone();

        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&backend))
            .given_state(DashboardState::default())
            .when_action(DashboardAction::SignUp {
                request_id: RequestId::new(),
                name: "Alex Again".to_string(),
                email: "Alex@VenueFlow.com".to_string(),
                password: "pw".to_string(),
            })
            .then_feedback(move |actions| {
                assert_eq!(failure(actions), Some(DashboardError::AlreadyExists));
                assert_eq!(probe.request_count(), 1);
                assert_eq!(probe.users().len(), 2);
            })
            .run();
    }

    #[test]
    fn submit_requires_a_session() {
        let request = BookingRequest::new(
            "bus",
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        );

        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::seeded()))
            .given_state(DashboardState::default())
            .when_action(DashboardAction::SubmitBooking {
                request_id: RequestId::new(),
                request,
            })
            .then_state(|state| assert!(state.submissions.is_empty()))
            .then_feedback(|actions| {
                assert_eq!(failure(actions), Some(DashboardError::NotAuthenticated));
            })
            .run();
    }

    #[test]
    fn submit_records_request_key_and_creates_pending_booking() {
        let request_id = RequestId::new();
        let request = BookingRequest::new(
            "auditorium",
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        )
        .with_selection(FeatureCategory::Refreshments, "Lunch Buffet")
        .with_members(50);

        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::seeded()))
            .given_state(state_with(Some(user("Alex")), Connectivity::Online))
            .when_action(DashboardAction::SubmitBooking { request_id, request })
            .then_state(move |state| assert!(state.submissions.contains(&request_id)))
            .then_feedback(|actions| {
                let [DashboardAction::BookingCreated { booking, .. }] = actions else {
                    panic!("expected BookingCreated, got {actions:?}");
                };
                assert_eq!(booking.status, BookingStatus::Pending);
                assert_eq!(booking.details["refreshments"], "Lunch Buffet for 50 members");
            })
            .run();
    }

    #[test]
    fn resubmitting_same_key_is_a_duplicate() {
        let request_id = RequestId::new();
        let mut state = state_with(Some(user("Alex")), Connectivity::Online);
        state.submissions.insert(request_id);
        let request = BookingRequest::new(
            "bus",
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        );

        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::seeded()))
            .given_state(state)
            .when_action(DashboardAction::SubmitBooking { request_id, request })
            .then_feedback(|actions| {
                assert_eq!(failure(actions), Some(DashboardError::DuplicateSubmission));
            })
            .run();
    }

    #[test]
    fn failed_submission_releases_its_key() {
        let request_id = RequestId::new();
        let mut state = state_with(Some(user("Alex")), Connectivity::Online);
        state.submissions.insert(request_id);

        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::seeded()))
            .given_state(state)
            .when_action(DashboardAction::OperationFailed {
                request_id,
                error: DashboardError::NetworkUnreachable("connection refused".to_string()),
            })
            .then_state(move |state| {
                assert!(!state.submissions.contains(&request_id));
                assert!(matches!(state.last_error, Some(DashboardError::NetworkUnreachable(_))));
            })
            .run();
    }

    #[test]
    fn duplicate_rejection_keeps_the_key() {
        let request_id = RequestId::new();
        let mut state = state_with(Some(user("Alex")), Connectivity::Online);
        state.submissions.insert(request_id);

        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::seeded()))
            .given_state(state)
            .when_action(DashboardAction::OperationFailed {
                request_id,
                error: DashboardError::DuplicateSubmission,
            })
            .then_state(move |state| assert!(state.submissions.contains(&request_id)))
            .run();
    }

    #[test]
    fn non_admin_cannot_confirm() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::seeded()))
            .given_state(state_with(Some(user("Alex")), Connectivity::Online))
            .when_action(DashboardAction::ConfirmBooking {
                request_id: RequestId::new(),
                booking_id: BookingId::new("7"),
            })
            .then_feedback(|actions| {
                assert_eq!(failure(actions), Some(DashboardError::Forbidden));
            })
            .run();
    }

    #[test]
    fn confirmed_booking_cannot_be_rejected() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::seeded()))
            .given_state(state_with(Some(user("Admin")), Connectivity::Online))
            .when_action(DashboardAction::RejectBooking {
                request_id: RequestId::new(),
                booking_id: BookingId::new("1"),
            })
            .then_state(|state| {
                assert_eq!(
                    state.booking(&BookingId::new("1")).map(|b| b.status),
                    Some(BookingStatus::Confirmed)
                );
            })
            .then_feedback(|actions| {
                assert_eq!(
                    failure(actions),
                    Some(DashboardError::InvalidTransition {
                        from: BookingStatus::Confirmed,
                        to: BookingStatus::Rejected,
                    })
                );
            })
            .run();
    }

    #[test]
    fn admin_confirms_pending_booking() {
        let backend = InMemoryBackend::with_data(fallback_users(), vec![pending_booking()]);

        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&backend))
            .given_state(state_with(Some(user("Admin")), Connectivity::Online))
            .when_action(DashboardAction::ConfirmBooking {
                request_id: RequestId::new(),
                booking_id: BookingId::new("7"),
            })
            .then_feedback(|actions| {
                assert!(matches!(
                    actions,
                    [DashboardAction::BookingStatusChanged { booking, .. }]
                        if booking.status == BookingStatus::Confirmed
                ));
            })
            .run();
    }

    #[test]
    fn offline_cancel_is_rejected_before_any_request() {
        let backend = InMemoryBackend::seeded();
        let probe = backend.clone();

        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&backend))
            .given_state(state_with(Some(user("Alex")), Connectivity::Offline))
            .when_action(DashboardAction::CancelBooking {
                request_id: RequestId::new(),
                booking_id: BookingId::new("1"),
            })
            .then_state(|state| assert_eq!(state.bookings.len(), 2))
            .then_feedback(move |actions| {
                assert_eq!(
                    failure(actions),
                    Some(DashboardError::OfflineRejected {
                        operation: "cancel booking".to_string()
                    })
                );
                assert_eq!(probe.request_count(), 0);
            })
            .run();
    }

    #[test]
    fn admin_cannot_cancel_someone_elses_booking() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::seeded()))
            .given_state(state_with(Some(user("Admin")), Connectivity::Online))
            .when_action(DashboardAction::CancelBooking {
                request_id: RequestId::new(),
                booking_id: BookingId::new("1"),
            })
            .then_feedback(|actions| {
                assert_eq!(failure(actions), Some(DashboardError::Forbidden));
            })
            .run();
    }

    #[test]
    fn cancelled_event_removes_booking() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::new()))
            .given_state(state_with(Some(user("Alex")), Connectivity::Online))
            .when_action(DashboardAction::BookingCancelled {
                request_id: RequestId::new(),
                booking_id: BookingId::new("1"),
            })
            .then_state(|state| {
                assert!(state.booking(&BookingId::new("1")).is_none());
                assert_eq!(state.my_bookings().len(), 1);
            })
            .run();
    }

    #[test]
    fn failure_event_records_last_error() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(env(&InMemoryBackend::new()))
            .given_state(DashboardState::default())
            .when_action(DashboardAction::OperationFailed {
                request_id: RequestId::new(),
                error: DashboardError::Backend { status: 500 },
            })
            .then_state(|state| {
                assert_eq!(state.last_error, Some(DashboardError::Backend { status: 500 }));
            })
            .run();
    }

    #[test]
    fn answers_matches_only_events_with_same_key() {
        let request_id = RequestId::new();
        let command = DashboardAction::LoadBookings { request_id };
        let event = DashboardAction::OperationFailed {
            request_id,
            error: DashboardError::Forbidden,
        };

        assert!(!command.answers(request_id));
        assert!(event.answers(request_id));
        assert!(!event.answers(RequestId::new()));
        assert_eq!(DashboardAction::Logout.request_id(), None);
    }
}
