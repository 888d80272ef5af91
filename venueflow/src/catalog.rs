//! The fixed venue catalog.
//!
//! Venues are compile-time constants; nothing mutates them at runtime.

use crate::types::FeatureCategory;
use thiserror::Error;

/// Catalog lookup failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No venue with this id
    #[error("unknown venue '{0}'")]
    UnknownVenue(String),
}

/// A bookable venue
#[derive(Debug, PartialEq, Eq)]
pub struct Venue {
    /// Stable id used in bookings
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Seats, when the venue has a fixed capacity
    pub capacity: Option<u32>,
    /// Base price, when the venue is priced
    pub base_price: Option<u32>,
    /// Categories that can be configured on a booking
    pub features: &'static [FeatureCategory],
    options: &'static [(FeatureCategory, &'static [&'static str])],
}

impl Venue {
    /// First word of the name, used for compact calendar labels
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.split(' ').next().unwrap_or(self.name)
    }

    /// Whether bookings of this venue may configure `category`
    #[must_use]
    pub fn supports(&self, category: FeatureCategory) -> bool {
        self.features.contains(&category)
    }

    /// Enumerated choices for `category`, empty when the category is free-form or absent
    #[must_use]
    pub fn options_for(&self, category: FeatureCategory) -> &'static [&'static str] {
        self.options
            .iter()
            .find(|(candidate, _)| *candidate == category)
            .map_or(&[], |(_, choices)| *choices)
    }
}

static VENUES: [Venue; 4] = [
    Venue {
        id: "auditorium",
        name: "Grand Auditorium",
        capacity: Some(500),
        base_price: Some(15_000),
        features: &[
            FeatureCategory::Seating,
            FeatureCategory::Av,
            FeatureCategory::Ac,
            FeatureCategory::Refreshments,
        ],
        options: &[
            (FeatureCategory::Seating, &["VIP", "Audience", "Stage-side"]),
            (FeatureCategory::Av, &["Projector", "Sound System", "Lighting"]),
            (
                FeatureCategory::Refreshments,
                &["Tea/Coffee & Cookies", "Lunch Buffet", "High Tea"],
            ),
        ],
    },
    Venue {
        id: "ramanujan",
        name: "Ramanujan Hall",
        capacity: Some(200),
        base_price: Some(18_000),
        features: &[
            FeatureCategory::Seating,
            FeatureCategory::Refreshments,
            FeatureCategory::Av,
        ],
        options: &[
            (FeatureCategory::Seating, &["Guest Special Seating"]),
            (FeatureCategory::Av, &["Audio-Video System"]),
            (FeatureCategory::Refreshments, &["Tea/Coffee", "Snacks"]),
        ],
    },
    Venue {
        id: "impactGreens",
        name: "Impact Greens (Lawn)",
        capacity: Some(1000),
        base_price: Some(112_000),
        features: &[FeatureCategory::Seating, FeatureCategory::Av],
        options: &[
            (FeatureCategory::Seating, &["Guest-Only", "Guest + Audience"]),
            (FeatureCategory::Av, &["Audio-Visual System"]),
        ],
    },
    Venue {
        id: "bus",
        name: "Bus Facility",
        capacity: None,
        base_price: None,
        features: &[FeatureCategory::Transport],
        options: &[],
    },
];

/// Every venue, in display order
#[must_use]
pub fn all() -> &'static [Venue] {
    &VENUES
}

/// Find a venue by id
///
/// # Errors
///
/// Returns [`CatalogError::UnknownVenue`] when no venue has this id.
pub fn lookup(venue_id: &str) -> Result<&'static Venue, CatalogError> {
    VENUES
        .iter()
        .find(|venue| venue.id == venue_id)
        .ok_or_else(|| CatalogError::UnknownVenue(venue_id.to_string()))
}
