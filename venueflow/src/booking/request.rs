//! Booking requests as filled in by a user, before they become a `NewBooking`.

use crate::assist::Suggestion;
use crate::catalog;
use crate::error::DashboardError;
use crate::types::{BookingDetails, BookingStatus, FeatureCategory, NewBooking, User};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;

/// Default party size for refreshments
pub const DEFAULT_MEMBERS: u32 = 10;

/// Refreshment choice replaced by the free-text custom value
pub const CUSTOM_CHOICE: &str = "Custom";

/// A booking request for one venue on one day
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingRequest {
    /// Catalog venue id
    pub venue_id: String,
    /// Day of the booking
    pub date: NaiveDate,
    /// Start time
    pub start: NaiveTime,
    /// End time
    pub end: NaiveTime,
    /// Chosen value per feature category
    pub selections: BTreeMap<FeatureCategory, String>,
    /// Party size for refreshments
    pub members: u32,
    /// Free text used when the refreshment choice is [`CUSTOM_CHOICE`]
    pub custom_refreshment: Option<String>,
}

impl BookingRequest {
    /// Request for `venue_id` with no selections and the default party size
    #[must_use]
    pub fn new(venue_id: impl Into<String>, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            venue_id: venue_id.into(),
            date,
            start,
            end,
            selections: BTreeMap::new(),
            members: DEFAULT_MEMBERS,
            custom_refreshment: None,
        }
    }

    /// Request pre-filled from an assistant suggestion
    ///
    /// A composed refreshment such as `Lunch Buffet for 30 members` is split
    /// back into the choice and the party size. A refreshment the venue does
    /// not list becomes a [`CUSTOM_CHOICE`] with the text as custom value.
    #[must_use]
    pub fn from_suggestion(suggestion: &Suggestion, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        let mut request = Self::new(suggestion.venue_id.clone(), date, start, end);
        let venue = catalog::lookup(&suggestion.venue_id).ok();

        for (key, value) in &suggestion.details {
            let Some(category) = FeatureCategory::parse(key) else {
                continue;
            };
            if category != FeatureCategory::Refreshments {
                request.selections.insert(category, value.clone());
                continue;
            }

            let (choice, members) = split_party_size(value);
            if let Some(members) = members {
                request.members = members;
            }
            let listed = venue.is_none_or(|venue| venue.options_for(category).contains(&choice));
            if listed {
                request.selections.insert(category, choice.to_string());
            } else {
                request.selections.insert(category, CUSTOM_CHOICE.to_string());
                request.custom_refreshment = Some(choice.to_string());
            }
        }
        request
    }

    /// Builder: choose `value` for `category`
    #[must_use]
    pub fn with_selection(mut self, category: FeatureCategory, value: impl Into<String>) -> Self {
        self.selections.insert(category, value.into());
        self
    }

    /// Builder: set party size
    #[must_use]
    pub const fn with_members(mut self, members: u32) -> Self {
        self.members = members;
        self
    }

    /// Builder: set the custom refreshment text
    #[must_use]
    pub fn with_custom_refreshment(mut self, text: impl Into<String>) -> Self {
        self.custom_refreshment = Some(text.into());
        self
    }

    /// Start as a local date-time
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    /// End as a local date-time
    #[must_use]
    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end)
    }

    /// Validate against the catalog and build the pending booking owned by `owner`
    ///
    /// # Errors
    ///
    /// - [`DashboardError::UnknownVenue`] if the venue is not in the catalog
    /// - [`DashboardError::InvalidBooking`] if a selection is not a venue
    ///   feature, the party size is zero, or the booking ends before it starts
    pub fn into_new_booking(self, owner: &User) -> Result<NewBooking, DashboardError> {
        let venue = catalog::lookup(&self.venue_id)
            .map_err(|_| DashboardError::UnknownVenue(self.venue_id.clone()))?;

        if let Some(category) = self.selections.keys().find(|category| !venue.supports(**category)) {
            return Err(DashboardError::InvalidBooking(format!(
                "{} does not offer {category}",
                venue.name
            )));
        }
        if self.end < self.start {
            return Err(DashboardError::InvalidBooking(
                "end time is before start time".to_string(),
            ));
        }

        let mut details = BookingDetails::new();
        for (category, value) in &self.selections {
            if *category != FeatureCategory::Refreshments {
                details.insert(category.as_str().to_string(), value.clone());
            }
        }

        if venue.supports(FeatureCategory::Refreshments) {
            if self.members == 0 {
                return Err(DashboardError::InvalidBooking(
                    "member count must be positive".to_string(),
                ));
            }
            let item = self
                .selections
                .get(&FeatureCategory::Refreshments)
                .map(|choice| split_party_size(choice).0)
                .filter(|choice| !choice.is_empty())
                .and_then(|choice| {
                    if choice == CUSTOM_CHOICE {
                        self.custom_refreshment.as_deref().map(str::trim).filter(|text| !text.is_empty())
                    } else {
                        Some(choice)
                    }
                })
                .or_else(|| venue.options_for(FeatureCategory::Refreshments).first().copied());

            if let Some(item) = item {
                details.insert(
                    FeatureCategory::Refreshments.as_str().to_string(),
                    format!("{item} for {} members", self.members),
                );
            }
        }

        Ok(NewBooking {
            user_id: owner.id.clone(),
            venue_id: venue.id.to_string(),
            booking_date_time: self.starts_at(),
            end_time: self.ends_at(),
            details,
            status: BookingStatus::Pending,
            booked_by: owner.name.clone(),
        })
    }
}

/// Split `Lunch Buffet for 30 members` into `("Lunch Buffet", Some(30))`
///
/// Text without the suffix comes back trimmed with no count.
fn split_party_size(text: &str) -> (&str, Option<u32>) {
    let text = text.trim();
    text.strip_suffix(" members")
        .and_then(|rest| rest.rsplit_once(" for "))
        .and_then(|(choice, count)| Some((choice.trim(), count.trim().parse::<u32>().ok()?)))
        .map_or((text, None), |(choice, count)| (choice, Some(count)))
}
