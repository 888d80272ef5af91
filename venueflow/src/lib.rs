//! # VenueFlow
//!
//! Core of a venue booking dashboard: a fixed venue catalog, the booking
//! lifecycle with its authorization rules, a month calendar, sessions, a
//! backend gateway that degrades to built-in data when the backend is
//! unreachable, and AI-generated summaries and suggestions.
//!
//! ## Architecture
//!
//! ```text
//! Dashboard (facade) ──► Store<DashboardState, DashboardAction, ..., DashboardReducer>
//!                                   │ effects
//!                                   ▼
//!                             SyncGateway ──► BookingBackend (REST | in-memory)
//! ```
//!
//! Every mutation of the mirrored bookings goes through the reducer, and
//! every backend write goes through the gateway, which refuses writes while
//! the dashboard is offline.
//!
//! ## Example
//!
//! ```ignore
//! use venueflow::{Dashboard, gateway::RestBackend};
//!
//! let dashboard = Dashboard::new(Arc::new(RestBackend::new("http://localhost:3001")), Duration::from_secs(30));
//! dashboard.refresh().await?;
//! dashboard.login("alex@venueflow.com", "userpassword").await?;
//! let mine = dashboard.my_bookings().await;
//! ```

pub mod assist;
pub mod booking;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod session;
pub mod types;

pub use booking::{BookingRequest, DashboardAction, DashboardEnvironment, DashboardReducer, DashboardState};
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::DashboardError;
