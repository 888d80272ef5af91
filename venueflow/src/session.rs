//! Identity rules: credential checks and the authorization guards used by the
//! booking lifecycle.

use crate::error::DashboardError;
use crate::types::{Booking, User};

/// Emails are compared ignoring case; the backend stores them lower-cased
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Find the account among `candidates` matching `email` and `password`
///
/// The password is compared verbatim.
///
/// # Errors
///
/// Returns [`DashboardError::InvalidCredentials`] when no candidate matches.
pub fn authenticate(candidates: &[User], email: &str, password: &str) -> Result<User, DashboardError> {
    let email = normalize_email(email);
    candidates
        .iter()
        .find(|user| normalize_email(&user.email) == email && user.password == password)
        .cloned()
        .ok_or(DashboardError::InvalidCredentials)
}

/// The session user, if any
///
/// # Errors
///
/// Returns [`DashboardError::NotAuthenticated`] without a session.
pub fn require_user(session: Option<&User>) -> Result<&User, DashboardError> {
    session.ok_or(DashboardError::NotAuthenticated)
}

/// The session user, if it is an administrator
///
/// # Errors
///
/// [`DashboardError::NotAuthenticated`] without a session,
/// [`DashboardError::Forbidden`] for non-admins.
pub fn require_admin(session: Option<&User>) -> Result<&User, DashboardError> {
    let user = require_user(session)?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(DashboardError::Forbidden)
    }
}

/// Check that `user` owns `booking`
///
/// # Errors
///
/// Returns [`DashboardError::Forbidden`] when someone else owns it.
pub fn require_owner(user: &User, booking: &Booking) -> Result<(), DashboardError> {
    if booking.is_owned_by(user) {
        Ok(())
    } else {
        Err(DashboardError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fallback::fallback_users;

    #[test]
    fn login_ignores_email_case() {
        let users = fallback_users();
        let user = authenticate(&users, "Alex@VenueFlow.com", "userpassword");
        assert_eq!(user.map(|u| u.name), Ok("Alex".to_string()));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let users = fallback_users();
        assert_eq!(
            authenticate(&users, "alex@venueflow.com", "UserPassword"),
            Err(DashboardError::InvalidCredentials)
        );
        assert_eq!(
            authenticate(&[], "alex@venueflow.com", "userpassword"),
            Err(DashboardError::InvalidCredentials)
        );
    }

    #[test]
    fn guards_distinguish_anonymous_and_non_admin() {
        let users = fallback_users();
        let admin = users.iter().find(|u| u.is_admin());
        let alex = users.iter().find(|u| !u.is_admin());

        assert_eq!(require_admin(None), Err(DashboardError::NotAuthenticated));
        assert_eq!(require_admin(alex), Err(DashboardError::Forbidden));
        assert!(require_admin(admin).is_ok());
    }
}
