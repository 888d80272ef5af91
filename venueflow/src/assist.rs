//! AI assist: booking summaries and venue suggestions.
//!
//! The dashboard only depends on [`BookingAssistant`]; [`GeminiAssistant`]
//! implements it over the Gemini `generateContent` API. Results go straight
//! back to the caller and never touch dashboard state.

use crate::catalog;
use crate::types::{Booking, BookingDetails, FeatureCategory, format_time_range};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt::Write as _;
use thiserror::Error;
use venueflow_gemini::{GeminiClient, GeminiError, GenerateContentRequest, GenerationConfig};

/// Shown in place of a summary that could not be generated
pub const SUMMARY_APOLOGY: &str = "Sorry, I couldn't generate a summary for this booking.";

/// Assist failure
#[derive(Debug, Error)]
pub enum AssistError {
    /// The generative service failed
    #[error(transparent)]
    Gemini(#[from] GeminiError),

    /// The model answered with something other than the requested JSON
    #[error("unusable suggestion: {0}")]
    InvalidSuggestion(String),

    /// The suggested venue is not in the catalog
    #[error("suggested venue '{0}' is not in the catalog")]
    UnknownVenue(String),
}

/// Venue and details proposed from a free-text request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    /// Catalog venue id
    pub venue_id: String,
    /// Details limited to the venue's features
    pub details: BookingDetails,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    venue_id: String,
    #[serde(default)]
    details: serde_json::Map<String, serde_json::Value>,
}

impl RawSuggestion {
    /// Check the venue and drop details the venue does not offer
    fn validate(self) -> Result<Suggestion, AssistError> {
        let venue = catalog::lookup(&self.venue_id).map_err(|_| AssistError::UnknownVenue(self.venue_id))?;

        let details = self
            .details
            .into_iter()
            .filter_map(|(key, value)| {
                let category = FeatureCategory::parse(&key)?;
                if !venue.supports(category) {
                    tracing::debug!(venue = venue.id, feature = %key, "Dropping unsupported suggested detail");
                    return None;
                }
                let value = match value {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                Some((category.as_str().to_string(), value))
            })
            .collect();

        Ok(Suggestion {
            venue_id: venue.id.to_string(),
            details,
        })
    }
}

/// Generative helpers used by the dashboard
#[allow(async_fn_in_trait)]
pub trait BookingAssistant: Send + Sync {
    /// One friendly paragraph describing `booking`
    ///
    /// # Errors
    ///
    /// Returns error if the service fails or returns no text
    async fn summarize(&self, booking: &Booking) -> Result<String, AssistError>;

    /// Venue and details for a free-text request on `date`
    ///
    /// # Errors
    ///
    /// Returns error if the service fails or suggests something unusable
    async fn suggest(&self, prompt: &str, date: NaiveDate) -> Result<Suggestion, AssistError>;
}

/// Summary of `booking`, or [`SUMMARY_APOLOGY`] when it cannot be produced
pub async fn summarize_or_apology<A: BookingAssistant>(assistant: &A, booking: &Booking) -> String {
    match assistant.summarize(booking).await {
        Ok(summary) => summary,
        Err(error) => {
            tracing::error!(booking_id = %booking.id, error = %error, "Failed to get summary");
            SUMMARY_APOLOGY.to_string()
        },
    }
}

/// Prompt asking for a summary of `booking`
#[must_use]
pub fn summary_prompt(booking: &Booking) -> String {
    let venue = catalog::lookup(&booking.venue_id).map_or("Unknown Venue", |venue| venue.name);
    let details = serde_json::to_string(&booking.details).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Summarize the following booking details in a friendly, concise paragraph. \
         Convert all details into a natural sentence. \
         Booking made by: {}. Venue: {venue}. Date and Time: {}. Status: {}. Other details: {details}.",
        booking.booked_by,
        format_time_range(booking.booking_date_time, booking.end_time),
        booking.status,
    )
}

/// System instruction describing the catalog to the model
#[must_use]
pub fn suggestion_instruction() -> String {
    let mut instruction = String::from(
        "You help users book venues. Pick the single best venue for the request and fill in \
         details only for features that venue offers. Answer with JSON only.\nVenues:\n",
    );
    for venue in catalog::all() {
        let features: Vec<String> = venue
            .features
            .iter()
            .map(|feature| {
                let options = venue.options_for(*feature);
                if options.is_empty() {
                    feature.as_str().to_string()
                } else {
                    format!("{} ({})", feature.as_str(), options.join(", "))
                }
            })
            .collect();
        let _ = writeln!(instruction, "- {}: {}; features: {}", venue.id, venue.name, features.join("; "));
    }
    instruction
}

fn suggestion_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "venueId": { "type": "STRING" },
            "details": { "type": "OBJECT" }
        },
        "required": ["venueId", "details"]
    })
}

/// [`BookingAssistant`] backed by Gemini
#[derive(Clone, Debug)]
pub struct GeminiAssistant {
    client: GeminiClient,
}

impl GeminiAssistant {
    /// Wrap a configured client
    #[must_use]
    pub const fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

impl BookingAssistant for GeminiAssistant {
    async fn summarize(&self, booking: &Booking) -> Result<String, AssistError> {
        let request = GenerateContentRequest::from_prompt(summary_prompt(booking));
        let response = self.client.generate_content(request).await?;
        let text = response.text()?.to_string();
        tracing::info!(booking_id = %booking.id, "Generated booking summary");
        Ok(text)
    }

    async fn suggest(&self, prompt: &str, date: NaiveDate) -> Result<Suggestion, AssistError> {
        let request = GenerateContentRequest::from_prompt(format!("Request for {date}: {prompt}"))
            .with_system_instruction(suggestion_instruction())
            .with_generation_config(GenerationConfig::json(suggestion_schema()));

        let response = self.client.generate_content(request).await?;
        let raw: RawSuggestion = serde_json::from_str(response.text()?.trim())
            .map_err(|e| AssistError::InvalidSuggestion(e.to_string()))?;

        let suggestion = raw.validate()?;
        tracing::info!(venue = %suggestion.venue_id, "Generated venue suggestion");
        Ok(suggestion)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::fallback::fallback_bookings;

    struct Failing;

    impl BookingAssistant for Failing {
        async fn summarize(&self, _booking: &Booking) -> Result<String, AssistError> {
            Err(GeminiError::EmptyResponse.into())
        }

        async fn suggest(&self, _prompt: &str, _date: NaiveDate) -> Result<Suggestion, AssistError> {
            Err(GeminiError::RateLimited.into())
        }
    }

    #[test]
    fn summary_prompt_lists_booking_facts() {
        let booking = fallback_bookings().remove(0);
        let prompt = summary_prompt(&booking);

        assert!(prompt.starts_with("Summarize the following booking details in a friendly, concise paragraph."));
        assert!(prompt.contains("Booking made by: Alex. Venue: Grand Auditorium."));
        assert!(prompt.contains("Date and Time: Nov 15, 2025, 2:30 PM - 4:30 PM."));
        assert!(prompt.contains("Status: confirmed."));
        assert!(prompt.ends_with(r#""seating":"VIP"}."#));
    }

    #[test]
    fn suggestion_drops_features_the_venue_lacks() {
        let raw: RawSuggestion = serde_json::from_value(serde_json::json!({
            "venueId": "bus",
            "details": { "transport": "Airport pickup", "seating": "VIP", "colour": "red" }
        }))
        .unwrap();

        let suggestion = raw.validate().unwrap();

        assert_eq!(suggestion.venue_id, "bus");
        assert_eq!(suggestion.details.len(), 1);
        assert_eq!(suggestion.details["transport"], "Airport pickup");
    }

    #[test]
    fn suggestion_for_unknown_venue_is_an_error() {
        let raw: RawSuggestion = serde_json::from_value(serde_json::json!({ "venueId": "moon" })).unwrap();
        assert!(matches!(raw.validate(), Err(AssistError::UnknownVenue(id)) if id == "moon"));
    }

    #[test]
    fn instruction_names_every_venue() {
        let instruction = suggestion_instruction();
        for venue in catalog::all() {
            assert!(instruction.contains(venue.id));
        }
    }

    #[tokio::test]
    async fn failed_summary_becomes_apology() {
        let booking = fallback_bookings().remove(0);
        assert_eq!(summarize_or_apology(&Failing, &booking).await, SUMMARY_APOLOGY);
    }
}
