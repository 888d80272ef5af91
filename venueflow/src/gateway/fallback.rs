//! Built-in dataset served while the backend is unreachable.

use crate::types::{Booking, BookingDetails, BookingId, BookingStatus, Role, User, UserId};
use chrono::{NaiveDate, NaiveDateTime};

/// Demo accounts accepted when the backend cannot be asked
#[must_use]
pub fn fallback_users() -> Vec<User> {
    vec![
        User {
            id: UserId::new("admin01"),
            email: "admin@venueflow.com".to_string(),
            password: "adminpassword".to_string(),
            name: "Admin".to_string(),
            role: Role::Admin,
        },
        User {
            id: UserId::new("user01"),
            email: "alex@venueflow.com".to_string(),
            password: "userpassword".to_string(),
            name: "Alex".to_string(),
            role: Role::User,
        },
    ]
}

/// The single confirmed demo booking
#[must_use]
pub fn fallback_bookings() -> Vec<Booking> {
    let details: BookingDetails = [
        ("seating", "VIP"),
        ("av", "Projector"),
        ("ac", "Yes"),
        ("refreshments", "Lunch Buffet for 50 members"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();

    vec![Booking {
        id: BookingId::new("1"),
        user_id: UserId::new("user01"),
        venue_id: "auditorium".to_string(),
        booking_date_time: at(2025, 11, 15, 14, 30),
        end_time: Some(at(2025, 11, 15, 16, 30)),
        details,
        status: BookingStatus::Confirmed,
        booked_by: "Alex".to_string(),
    }]
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}
