//! Trip-detail extraction
//!
//! Pulls an itinerary name, destination, traveler count, duration and client
//! preferences out of a free-text sentence. Each field is found by its own
//! pass over the original input, so one pattern consuming text never hides it
//! from another. The result can be internally inconsistent (a name that
//! contains a destination word, for example); no cross-field checks are made.

use crate::destination::DestinationTable;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Partial trip record; absent fields were not found in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itinerary_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_travelers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_preferences: Option<String>,
}

impl TripDetails {
    /// True when no field was extracted
    pub fn is_empty(&self) -> bool {
        self.itinerary_name.is_none()
            && self.destination.is_none()
            && self.number_of_travelers.is_none()
            && self.duration.is_none()
            && self.client_preferences.is_none()
    }

    /// Overwrite fields with those present in `newer`.
    pub fn merge(&mut self, newer: TripDetails) {
        if newer.itinerary_name.is_some() {
            self.itinerary_name = newer.itinerary_name;
        }
        if newer.destination.is_some() {
            self.destination = newer.destination;
        }
        if newer.number_of_travelers.is_some() {
            self.number_of_travelers = newer.number_of_travelers;
        }
        if newer.duration.is_some() {
            self.duration = newer.duration;
        }
        if newer.client_preferences.is_some() {
            self.client_preferences = newer.client_preferences;
        }
    }

    /// Number of days encoded in `duration`, if any
    pub fn duration_days(&self) -> Option<u32> {
        self.duration.as_deref().and_then(leading_number)
    }
}

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(?:called|named)\s+["']?([^"'.,!?]+?)["']?(?:\s+(?:for|with|to|in|from|on|lasting)\b|[.,!?]|$)"#,
    )
    .expect("itinerary name pattern is valid")
});

static TRAVELERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(?:people|persons?|travell?ers?|guests?|adults?|pax)\b")
        .expect("traveler count pattern is valid")
});

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)[\s-]*(day|night)s?\b").expect("duration pattern is valid")
});

static PREFERENCES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:prefers?|preference for|interested in|who (?:loves?|likes?|enjoys?))\s+([^.!?]+)",
    )
    .expect("preferences pattern is valid")
});

static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("number pattern is valid"));

/// Extract trip details using the built-in destination table.
pub fn parse_trip_details(input: &str) -> TripDetails {
    parse_trip_details_with(input, DestinationTable::builtin())
}

/// Extract trip details using a caller-supplied destination table.
pub fn parse_trip_details_with(input: &str, destinations: &DestinationTable) -> TripDetails {
    let details = TripDetails {
        itinerary_name: extract_name(input),
        destination: destinations.lookup(input).map(str::to_string),
        number_of_travelers: extract_travelers(input),
        duration: extract_duration(input),
        client_preferences: extract_preferences(input),
    };

    debug!(
        name = ?details.itinerary_name,
        destination = ?details.destination,
        travelers = ?details.number_of_travelers,
        duration = ?details.duration,
        "Trip details extracted"
    );

    details
}

fn extract_name(input: &str) -> Option<String> {
    NAME_RE
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_travelers(input: &str) -> Option<String> {
    TRAVELERS_RE
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_duration(input: &str) -> Option<String> {
    let caps = DURATION_RE.captures(input)?;
    let count = caps.get(1)?.as_str();
    let unit = caps.get(2)?.as_str().to_lowercase();
    let plural = if count.parse::<u64>().ok() == Some(1) { "" } else { "s" };
    Some(format!("{count} {unit}{plural}"))
}

fn extract_preferences(input: &str) -> Option<String> {
    PREFERENCES_RE
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// First run of digits in `s`, saturating at `u32::MAX`
pub(crate) fn leading_number(s: &str) -> Option<u32> {
    let digits = LEADING_NUMBER_RE.find(s)?.as_str();
    // the run is all ASCII digits, so parsing only fails on overflow
    Some(digits.parse().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sentence() {
        let details =
            parse_trip_details("Create a 7-day trip to Phuket called Paradise Beach for 4 people");
        assert_eq!(
            details,
            TripDetails {
                itinerary_name: Some("Paradise Beach".to_string()),
                destination: Some("Phuket, Thailand".to_string()),
                number_of_travelers: Some("4".to_string()),
                duration: Some("7 days".to_string()),
                client_preferences: None,
            }
        );
    }

    #[test]
    fn test_nothing_recognized() {
        let details = parse_trip_details("hello there, how are you?");
        assert!(details.is_empty());
        assert_eq!(details, TripDetails::default());
    }

    #[test]
    fn test_name_at_end_of_sentence() {
        let details = parse_trip_details("Make an itinerary named \"Island Hopper\"");
        assert_eq!(details.itinerary_name.as_deref(), Some("Island Hopper"));
    }

    #[test]
    fn test_name_may_contain_destination_word() {
        let details = parse_trip_details("A trip called Bali Dreams for 2 travelers");
        assert_eq!(details.itinerary_name.as_deref(), Some("Bali Dreams"));
        assert_eq!(details.destination.as_deref(), Some("Bali, Indonesia"));
        assert_eq!(details.number_of_travelers.as_deref(), Some("2"));
    }

    #[test]
    fn test_number_words_not_recognized() {
        let details = parse_trip_details("four people for five days");
        assert_eq!(details.number_of_travelers, None);
        assert_eq!(details.duration, None);
    }

    #[test]
    fn test_duration_units() {
        assert_eq!(
            parse_trip_details("10 nights in Tokyo").duration.as_deref(),
            Some("10 nights")
        );
        assert_eq!(
            parse_trip_details("just 1 day").duration.as_deref(),
            Some("1 day")
        );
        assert_eq!(
            parse_trip_details("a 5 Days break").duration.as_deref(),
            Some("5 days")
        );
    }

    #[test]
    fn test_huge_duration_saturates() {
        let details = parse_trip_details("a 99999999999 days odyssey");
        assert_eq!(details.duration.as_deref(), Some("99999999999 days"));
        assert_eq!(details.duration_days(), Some(u32::MAX));
        assert_eq!(leading_number("4294967295 days"), Some(u32::MAX));
        assert_eq!(leading_number("007 nights"), Some(7));
        assert_eq!(leading_number("a week"), None);
    }

    #[test]
    fn test_traveler_variants() {
        for input in ["3 adults", "3 guests", "3 travellers", "3pax"] {
            assert_eq!(
                parse_trip_details(input).number_of_travelers.as_deref(),
                Some("3"),
                "input {input}"
            );
        }
    }

    #[test]
    fn test_preferences() {
        let details = parse_trip_details("The Smiths prefer quiet beaches and seafood. Thanks");
        assert_eq!(
            details.client_preferences.as_deref(),
            Some("quiet beaches and seafood")
        );
    }

    #[test]
    fn test_merge_keeps_older_fields() {
        let mut details = parse_trip_details("5 days in Paris");
        details.merge(parse_trip_details("make it 6 people"));
        assert_eq!(details.destination.as_deref(), Some("Paris, France"));
        assert_eq!(details.duration.as_deref(), Some("5 days"));
        assert_eq!(details.number_of_travelers.as_deref(), Some("6"));
        assert_eq!(details.duration_days(), Some(5));
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let details = parse_trip_details("2 nights in Dubai");
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"destination": "Dubai, United Arab Emirates", "duration": "2 nights"})
        );
    }
}
