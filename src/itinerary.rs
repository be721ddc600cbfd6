//! Sample itinerary generation
//!
//! Hard-coded day-by-day plans per destination. A plan is cut down to the
//! requested length but never stretched: asking for more days than a
//! destination has returns every available day and marks the result as
//! truncated. Days are not repeated or invented.

use crate::extract::leading_number;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One day of a sample plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub title: String,
    pub activities: Vec<String>,
}

/// Generated plan plus what was asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleItinerary {
    pub destination: String,
    /// Days parsed from the duration, `None` when it held no number
    pub requested_days: Option<u32>,
    pub days: Vec<DayPlan>,
}

impl SampleItinerary {
    /// True when fewer days were returned than requested
    pub fn is_truncated(&self) -> bool {
        self.requested_days
            .is_some_and(|requested| (self.days.len() as u32) < requested)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

type DayTemplate = (&'static str, &'static [&'static str]);

const PHUKET: &[DayTemplate] = &[
    (
        "Arrival & Patong Beach",
        &[
            "Airport pickup and hotel check-in",
            "Sunset walk along Patong Beach",
            "Welcome dinner at a beachfront seafood restaurant",
        ],
    ),
    (
        "Phi Phi Islands",
        &[
            "Speedboat to Phi Phi Islands",
            "Snorkeling at Maya Bay",
            "Lunch on Phi Phi Don",
        ],
    ),
    (
        "Old Town & Big Buddha",
        &[
            "Visit the Big Buddha viewpoint",
            "Explore Phuket Old Town's Sino-Portuguese streets",
            "Evening at the Sunday walking market",
        ],
    ),
    (
        "Phang Nga Bay",
        &[
            "Sea canoeing through Phang Nga Bay caves",
            "James Bond Island photo stop",
            "Thai cooking class",
        ],
    ),
    (
        "Spa & Leisure",
        &[
            "Traditional Thai massage",
            "Free afternoon at the resort pool",
            "Farewell dinner at Promthep Cape",
        ],
    ),
];

const BALI: &[DayTemplate] = &[
    (
        "Arrival in Seminyak",
        &[
            "Airport pickup and villa check-in",
            "Sunset at a Seminyak beach club",
        ],
    ),
    (
        "Ubud Culture",
        &[
            "Tegallalang rice terraces",
            "Sacred Monkey Forest Sanctuary",
            "Ubud Art Market",
        ],
    ),
    (
        "Temples & Waterfalls",
        &[
            "Tirta Empul water temple",
            "Tegenungan waterfall",
            "Balinese dance performance",
        ],
    ),
    (
        "Nusa Penida",
        &[
            "Fast boat to Nusa Penida",
            "Kelingking Beach viewpoint",
            "Snorkeling with manta rays",
        ],
    ),
    (
        "Uluwatu",
        &[
            "Padang Padang beach",
            "Uluwatu Temple at sunset",
            "Kecak fire dance",
        ],
    ),
    (
        "Departure",
        &["Morning yoga session", "Airport transfer"],
    ),
];

const PARIS: &[DayTemplate] = &[
    (
        "Arrival & Eiffel Tower",
        &[
            "Hotel check-in",
            "Seine river cruise",
            "Evening at the Eiffel Tower",
        ],
    ),
    (
        "Louvre & Tuileries",
        &[
            "Guided Louvre tour",
            "Stroll through the Tuileries Garden",
            "Dinner in Saint-Germain",
        ],
    ),
    (
        "Montmartre",
        &[
            "Sacre-Coeur Basilica",
            "Place du Tertre artists' square",
            "Cabaret show",
        ],
    ),
    (
        "Versailles",
        &[
            "Day trip to the Palace of Versailles",
            "Gardens and Marie-Antoinette's estate",
        ],
    ),
];

const TOKYO: &[DayTemplate] = &[
    (
        "Arrival & Shinjuku",
        &[
            "Airport limousine bus to the hotel",
            "Shinjuku Gyoen National Garden",
            "Dinner in Omoide Yokocho",
        ],
    ),
    (
        "Traditional Tokyo",
        &[
            "Senso-ji Temple in Asakusa",
            "Nakamise shopping street",
            "Sumida river cruise",
        ],
    ),
    (
        "Modern Tokyo",
        &[
            "Shibuya Crossing",
            "Harajuku and Meiji Shrine",
            "teamLab digital art museum",
        ],
    ),
    (
        "Day Trip to Nikko",
        &[
            "Toshogu Shrine",
            "Kegon Falls",
            "Onsen bath",
        ],
    ),
];

const GENERIC: &[DayTemplate] = &[
    (
        "Arrival",
        &[
            "Airport transfer and check-in",
            "Orientation walk",
            "Welcome dinner",
        ],
    ),
    (
        "City Highlights",
        &[
            "Guided city tour",
            "Local market visit",
            "Free evening",
        ],
    ),
    (
        "Local Experiences",
        &[
            "Cultural workshop",
            "Regional cuisine tasting",
        ],
    ),
    (
        "Departure",
        &["Souvenir shopping", "Airport transfer"],
    ),
];

fn templates_for(destination: &str) -> &'static [DayTemplate] {
    let lower = destination.to_lowercase();
    if lower.contains("phuket") {
        PHUKET
    } else if lower.contains("bali") {
        BALI
    } else if lower.contains("paris") {
        PARIS
    } else if lower.contains("tokyo") {
        TOKYO
    } else {
        GENERIC
    }
}

/// Build a sample plan for `destination` lasting `duration` (e.g. `"3 days"`).
pub fn generate_sample_itinerary(destination: &str, duration: &str) -> SampleItinerary {
    let templates = templates_for(destination);
    let requested_days = leading_number(duration);
    let count = requested_days
        .map(|n| (n as usize).min(templates.len()))
        .unwrap_or(templates.len());

    let days: Vec<DayPlan> = templates
        .iter()
        .take(count)
        .zip(1u32..)
        .map(|((title, activities), day)| DayPlan {
            day,
            title: title.to_string(),
            activities: activities.iter().map(|a| a.to_string()).collect(),
        })
        .collect();

    let itinerary = SampleItinerary {
        destination: destination.to_string(),
        requested_days,
        days,
    };

    if itinerary.is_truncated() {
        warn!(
            destination = %destination,
            requested = requested_days.unwrap_or_default(),
            available = templates.len(),
            "Requested duration exceeds the sample plan, returning fewer days"
        );
    } else {
        debug!(
            destination = %destination,
            days = itinerary.days.len(),
            "Sample itinerary generated"
        );
    }

    itinerary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phuket_three_days() {
        let plan = generate_sample_itinerary("Phuket, Thailand", "3 days");
        assert_eq!(plan.days.len(), 3);
        assert!(plan.days.iter().all(|d| !d.activities.is_empty()));
        assert_eq!(
            plan.days.iter().map(|d| d.day).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(!plan.is_truncated());
    }

    #[test]
    fn test_truncates_without_repeating() {
        let plan = generate_sample_itinerary("Paris, France", "10 days");
        assert_eq!(plan.days.len(), PARIS.len());
        assert_eq!(plan.requested_days, Some(10));
        assert!(plan.is_truncated());
    }

    #[test]
    fn test_unknown_destination_uses_generic_plan() {
        let plan = generate_sample_itinerary("Atlantis", "2 days");
        assert_eq!(plan.days.len(), 2);
        assert_eq!(plan.days[0].title, "Arrival");
    }

    #[test]
    fn test_duration_without_number_returns_all_days() {
        let plan = generate_sample_itinerary("Bali, Indonesia", "a week");
        assert_eq!(plan.requested_days, None);
        assert_eq!(plan.days.len(), BALI.len());
        assert!(!plan.is_truncated());
    }

    #[test]
    fn test_huge_duration_still_reports_truncation() {
        let plan = generate_sample_itinerary("Phuket, Thailand", "99999999999 days");
        assert_eq!(plan.requested_days, Some(u32::MAX));
        assert_eq!(plan.len(), PHUKET.len());
        assert!(plan.is_truncated());
    }

    #[test]
    fn test_zero_days() {
        let plan = generate_sample_itinerary("Tokyo, Japan", "0 days");
        assert!(plan.is_empty());
        assert!(!plan.is_truncated());
    }

    #[test]
    fn test_nights_count_as_days() {
        let plan = generate_sample_itinerary("Tokyo, Japan", "2 nights");
        assert_eq!(plan.len(), 2);
    }
}
