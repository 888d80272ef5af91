//! Domain types for the venue booking dashboard.
//!
//! Users, bookings and the identifiers and enums around them. Wire names follow
//! the backend's JSON (`camelCase`); booking times travel as local
//! `YYYY-MM-DDTHH:MM` strings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// An id as the backend sends it: json-server style APIs mix strings and numbers
#[doc(hidden)]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// String id
    Text(String),
    /// Numeric id
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

macro_rules! text_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "RawId", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw id
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the id text
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<RawId> for $name {
            fn from(raw: RawId) -> Self {
                Self(raw.into())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_id!(
    /// Identifier of a user account
    UserId
);

text_id!(
    /// Identifier of a booking
    BookingId
);

/// Correlation key carried by every command so its caller can find the answer
///
/// One key per user attempt: resubmitting the same key is a duplicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new random `RequestId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RequestId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Users
// ============================================================================

/// Account role
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user: books venues and cancels their own bookings
    #[default]
    User,
    /// Administrator: approves and rejects pending bookings
    Admin,
}

/// A user account as stored by the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account id
    pub id: UserId,
    /// Email, unique ignoring case
    pub email: String,
    /// Password, compared verbatim
    pub password: String,
    /// Display name
    pub name: String,
    /// Role
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Whether this account may approve or reject bookings
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Payload for creating an account; the backend assigns the id
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Email, already lower-cased
    pub email: String,
    /// Password
    pub password: String,
    /// Display name
    pub name: String,
    /// Role, always `user` for self sign-up
    pub role: Role,
}

// ============================================================================
// Bookings
// ============================================================================

/// Booking lifecycle status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting an administrator
    #[default]
    Pending,
    /// Approved
    Confirmed,
    /// Took place
    Completed,
    /// Declined
    Rejected,
}

impl BookingStatus {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable facility category
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureCategory {
    /// Seating arrangement
    Seating,
    /// Audio-visual equipment
    Av,
    /// Air conditioning
    Ac,
    /// Catering
    Refreshments,
    /// Transport
    Transport,
}

impl FeatureCategory {
    /// Every category, in display order
    pub const ALL: [Self; 5] = [
        Self::Seating,
        Self::Av,
        Self::Ac,
        Self::Refreshments,
        Self::Transport,
    ];

    /// Wire name, used as the key in booking details
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seating => "seating",
            Self::Av => "av",
            Self::Ac => "ac",
            Self::Refreshments => "refreshments",
            Self::Transport => "transport",
        }
    }

    /// Parse a wire name
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == name)
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking details: feature category name to chosen value
pub type BookingDetails = BTreeMap<String, String>;

/// A booking as stored by the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Booking id
    pub id: BookingId,
    /// Owner
    pub user_id: UserId,
    /// Catalog venue id
    pub venue_id: String,
    /// Start, local time
    #[serde(with = "minute_time")]
    pub booking_date_time: NaiveDateTime,
    /// End, local time; older rows may lack it
    #[serde(default, with = "minute_time::option", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    /// Chosen value per feature category
    #[serde(default)]
    pub details: BookingDetails,
    /// Lifecycle status
    #[serde(default)]
    pub status: BookingStatus,
    /// Display name of the owner at booking time
    #[serde(default)]
    pub booked_by: String,
}

impl Booking {
    /// Whether `user` owns this booking
    #[must_use]
    pub fn is_owned_by(&self, user: &User) -> bool {
        self.user_id == user.id
    }
}

/// Payload for creating a booking; the backend assigns the id
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    /// Owner
    pub user_id: UserId,
    /// Catalog venue id
    pub venue_id: String,
    /// Start, local time
    #[serde(with = "minute_time")]
    pub booking_date_time: NaiveDateTime,
    /// End, local time
    #[serde(with = "minute_time")]
    pub end_time: NaiveDateTime,
    /// Chosen value per feature category
    pub details: BookingDetails,
    /// Always `pending` on creation
    pub status: BookingStatus,
    /// Display name of the owner
    pub booked_by: String,
}

impl NewBooking {
    /// The stored booking once the backend assigned `id`
    #[must_use]
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            user_id: self.user_id,
            venue_id: self.venue_id,
            booking_date_time: self.booking_date_time,
            end_time: Some(self.end_time),
            details: self.details,
            status: self.status,
            booked_by: self.booked_by,
        }
    }
}

/// Whether the backend answered the last fetch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// The backend answered
    #[default]
    Online,
    /// The backend was unreachable; data comes from the built-in fallback
    Offline,
}

impl Connectivity {
    /// Whether mutations may be attempted
    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Wire format for booking times
///
/// Serialized as `YYYY-MM-DDTHH:MM`; seconds are accepted on input.
pub mod minute_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Output format
    pub const FORMAT: &str = "%Y-%m-%dT%H:%M";

    const FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

    /// Parse either accepted format
    ///
    /// # Errors
    ///
    /// Returns the chrono parse error of the minute format when neither matches.
    pub fn parse(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(text, FORMAT)
            .or_else(|err| NaiveDateTime::parse_from_str(text, FORMAT_WITH_SECONDS).map_err(|_| err))
    }

    /// Serialize with [`FORMAT`]
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    /// Deserialize either accepted format
    ///
    /// # Errors
    ///
    /// Fails on anything that is not a local date-time string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(serde::de::Error::custom)
    }

    /// Same format for optional fields; `null` and absence both mean `None`
    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize the inner time with [`super::FORMAT`]
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S: Serializer>(time: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.collect_str(&time.format(super::FORMAT)),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize an optional local date-time string
        ///
        /// # Errors
        ///
        /// Fails on a present value that is not a local date-time string.
        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|text| super::parse(&text).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// Human readable range, e.g. `Nov 15, 2025, 2:30 PM - 4:30 PM`
#[must_use]
pub fn format_time_range(start: NaiveDateTime, end: Option<NaiveDateTime>) -> String {
    let date = start.format("%b %-d, %Y");
    let start_time = start.format("%-I:%M %p");
    match end {
        Some(end) => format!("{date}, {start_time} - {}", end.format("%-I:%M %p")),
        None => format!("{date}, {start_time}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_accept_numbers_and_strings() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "id": 42,
            "userId": "user01",
            "venueId": "bus",
            "bookingDateTime": "2025-11-15T14:30",
            "endTime": "2025-11-15T16:30:00",
            "status": "pending"
        }))
        .unwrap();

        assert_eq!(booking.id, BookingId::new("42"));
        assert_eq!(booking.user_id.as_str(), "user01");
        assert!(booking.details.is_empty());
        assert_eq!(
            booking.end_time.unwrap().format(minute_time::FORMAT).to_string(),
            "2025-11-15T16:30"
        );
    }

    #[test]
    fn missing_end_time_decodes_as_none() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "id": "6",
            "userId": "user01",
            "venueId": "bus",
            "bookingDateTime": "2025-11-16T09:00",
            "status": "pending"
        }))
        .unwrap();

        assert_eq!(booking.end_time, None);
        assert!(serde_json::to_value(&booking).unwrap().get("endTime").is_none());

        let with_null: Booking = serde_json::from_value(serde_json::json!({
            "id": "7",
            "userId": "user01",
            "venueId": "bus",
            "bookingDateTime": "2025-11-16T09:00",
            "endTime": null
        }))
        .unwrap();
        assert_eq!(with_null.end_time, None);
    }

    #[test]
    fn booking_round_trips_in_wire_format() {
        let json = serde_json::json!({
            "id": "7",
            "userId": "user01",
            "venueId": "auditorium",
            "bookingDateTime": "2025-11-15T14:30",
            "endTime": "2025-11-15T16:30",
            "details": { "seating": "VIP" },
            "status": "confirmed",
            "bookedBy": "Alex"
        });
        let booking: Booking = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&booking).unwrap(), json);
    }

    #[test]
    fn formats_time_range_like_the_dashboard() {
        let start = minute_time::parse("2025-11-15T14:30").unwrap();
        let end = minute_time::parse("2025-11-15T16:30").unwrap();
        assert_eq!(format_time_range(start, Some(end)), "Nov 15, 2025, 2:30 PM - 4:30 PM");
        assert_eq!(format_time_range(start, None), "Nov 15, 2025, 2:30 PM");
    }

    #[test]
    fn feature_category_parses_wire_names() {
        assert_eq!(FeatureCategory::parse("av"), Some(FeatureCategory::Av));
        assert_eq!(FeatureCategory::parse("parking"), None);
    }
}
