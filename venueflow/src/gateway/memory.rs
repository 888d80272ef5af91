//! Process-local backend.
//!
//! Behaves like the json-server API the dashboard talks to: ids are assigned
//! on create, unknown ids answer 404. It can be switched unreachable and
//! counts every request it receives, which is what the tests need to prove
//! that offline mutations never leave the process.

use super::{BackendFuture, BookingBackend, GatewayError, GatewayResult};
use crate::types::{Booking, BookingId, BookingStatus, NewBooking, NewUser, User, UserId};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    bookings: Vec<Booking>,
    next_id: u64,
}

impl Tables {
    fn assign_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

/// In-memory [`BookingBackend`]
#[derive(Clone, Debug)]
pub struct InMemoryBackend {
    tables: Arc<Mutex<Tables>>,
    reachable: Arc<AtomicBool>,
    requests: Arc<AtomicUsize>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Empty, reachable backend
    #[must_use]
    pub fn new() -> Self {
        Self::with_data(Vec::new(), Vec::new())
    }

    /// Backend holding the built-in demo accounts and booking
    #[must_use]
    pub fn seeded() -> Self {
        Self::with_data(super::fallback::fallback_users(), super::fallback::fallback_bookings())
    }

    /// Backend holding `users` and `bookings`
    #[must_use]
    pub fn with_data(users: Vec<User>, bookings: Vec<Booking>) -> Self {
        let next_id = bookings
            .iter()
            .filter_map(|booking| booking.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            tables: Arc::new(Mutex::new(Tables {
                users,
                bookings,
                next_id,
            })),
            reachable: Arc::new(AtomicBool::new(true)),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Simulate the backend going down or coming back
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Requests received so far, including refused ones
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Stored bookings
    #[must_use]
    pub fn bookings(&self) -> Vec<Booking> {
        self.tables
            .lock()
            .map(|tables| tables.bookings.clone())
            .unwrap_or_default()
    }

    /// Stored accounts
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.tables
            .lock()
            .map(|tables| tables.users.clone())
            .unwrap_or_default()
    }

    fn request<T, F>(&self, operation: F) -> BackendFuture<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Tables) -> GatewayResult<T>,
    {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let result = if self.reachable.load(Ordering::SeqCst) {
            self.tables
                .lock()
                .map_err(|_| GatewayError::Unreachable("in-memory store poisoned".to_string()))
                .and_then(|mut tables| operation(&mut tables))
        } else {
            Err(GatewayError::Unreachable("in-memory backend switched off".to_string()))
        };

        Box::pin(std::future::ready(result))
    }
}

fn not_found(id: &BookingId) -> GatewayError {
    GatewayError::Status {
        status: 404,
        message: format!("booking {id} not found"),
    }
}

impl BookingBackend for InMemoryBackend {
    fn fetch_bookings(&self) -> BackendFuture<Vec<Booking>> {
        self.request(|tables| Ok(tables.bookings.clone()))
    }

    fn find_users_by_email(&self, email: &str) -> BackendFuture<Vec<User>> {
        let email = email.to_string();
        self.request(move |tables| {
            Ok(tables
                .users
                .iter()
                .filter(|user| user.email == email)
                .cloned()
                .collect())
        })
    }

    fn create_user(&self, user: NewUser) -> BackendFuture<User> {
        self.request(move |tables| {
            let created = User {
                id: UserId::new(tables.assign_id()),
                email: user.email,
                password: user.password,
                name: user.name,
                role: user.role,
            };
            tables.users.push(created.clone());
            Ok(created)
        })
    }

    fn create_booking(&self, booking: NewBooking) -> BackendFuture<Booking> {
        self.request(move |tables| {
            let created = booking.into_booking(BookingId::new(tables.assign_id()));
            tables.bookings.push(created.clone());
            Ok(created)
        })
    }

    fn update_booking_status(&self, id: &BookingId, status: BookingStatus) -> BackendFuture<Booking> {
        let id = id.clone();
        self.request(move |tables| {
            let booking = tables
                .bookings
                .iter_mut()
                .find(|booking| booking.id == id)
                .ok_or_else(|| not_found(&id))?;
            booking.status = status;
            Ok(booking.clone())
        })
    }

    fn delete_booking(&self, id: &BookingId) -> BackendFuture<()> {
        let id = id.clone();
        self.request(move |tables| {
            let before = tables.bookings.len();
            tables.bookings.retain(|booking| booking.id != id);
            if tables.bookings.len() == before {
                Err(not_found(&id))
            } else {
                Ok(())
            }
        })
    }
}
