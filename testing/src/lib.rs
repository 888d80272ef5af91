//! # VenueFlow Testing
//!
//! Testing utilities and helpers for VenueFlow reducers.
//!
//! This crate provides:
//! - A deterministic clock
//! - A Given-When-Then harness for reducers
//! - Helpers that resolve effects into the actions they feed back
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use venueflow_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(DashboardReducer)
//!     .with_env(test_environment())
//!     .given_state(DashboardState::default())
//!     .when_action(DashboardAction::Logout)
//!     .then_state(|state| assert!(state.session.is_none()))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use venueflow_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use venueflow_testing::mocks::FixedClock;
    /// use venueflow_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which cannot happen.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Effect resolution helpers
pub mod helpers {
    use venueflow_core::effect::Effect;

    /// Run every effect to completion on the current thread and collect the
    /// actions they feed back, in order
    ///
    /// Only suitable for effects that need no async runtime of their own
    /// (in-memory collaborators, immediate feedback).
    pub fn resolve_effects<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<A> {
        let mut actions = Vec::new();
        for effect in effects {
            resolve_into(effect, &mut actions);
        }
        actions
    }

    fn resolve_into<A>(effect: Effect<A>, actions: &mut Vec<A>) {
        match effect {
            Effect::None => {},
            Effect::Parallel(effects) | Effect::Sequential(effects) => {
                for effect in effects {
                    resolve_into(effect, actions);
                }
            },
            Effect::Future(fut) => {
                if let Some(action) = futures::executor::block_on(fut) {
                    actions.push(action);
                }
            },
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
