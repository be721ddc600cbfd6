//! Seed data
//!
//! Vendor profiles, negotiations and market intelligence loaded from JSON.
//! Callers pass a [`SeedData`] around explicitly; nothing here is global.

use crate::error::{AssistantError, Result};
use crate::negotiation::{MarketIntelligence, Negotiation, NegotiationStatus};
use crate::types::VendorId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const BUILTIN_SEED: &str = include_str!("../fixtures/seed.json");

/// A supplier's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorProfile {
    pub id: VendorId,
    pub name: String,
    pub service_type: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

/// Fixture bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub vendors: Vec<VendorProfile>,
    #[serde(default)]
    pub negotiations: Vec<Negotiation>,
    #[serde(default)]
    pub market_intelligence: Vec<MarketIntelligence>,
}

impl SeedData {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let seed: SeedData = serde_json::from_str(json)?;
        seed.validate()?;
        info!(
            vendors = seed.vendors.len(),
            negotiations = seed.negotiations.len(),
            market_entries = seed.market_intelligence.len(),
            "Seed data loaded"
        );
        Ok(seed)
    }

    /// Reject rates strategy maths cannot divide by
    pub fn validate(&self) -> Result<()> {
        for negotiation in &self.negotiations {
            negotiation.validate()?;
        }
        for market in &self.market_intelligence {
            if !(market.average_rate.is_finite() && market.average_rate > 0.0) {
                return Err(AssistantError::Configuration(format!(
                    "market average rate for {} {} must be positive, got {}",
                    market.destination, market.service_type, market.average_rate
                )));
            }
            if !(0.0..=100.0).contains(&market.occupancy_rate) {
                return Err(AssistantError::Configuration(format!(
                    "occupancy for {} {} must be a percentage, got {}",
                    market.destination, market.service_type, market.occupancy_rate
                )));
            }
        }
        Ok(())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The example data bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_SEED)
    }

    /// Market numbers for a destination and service type, both matched
    /// case-insensitively.
    pub fn market_for(&self, destination: &str, service_type: &str) -> Option<&MarketIntelligence> {
        self.market_intelligence.iter().find(|m| {
            m.destination.eq_ignore_ascii_case(destination)
                && m.service_type.eq_ignore_ascii_case(service_type)
        })
    }

    /// Market numbers matching a negotiation's destination and service
    pub fn market_for_negotiation(&self, negotiation: &Negotiation) -> Option<&MarketIntelligence> {
        let destination = negotiation.destination.as_deref()?;
        self.market_for(destination, &negotiation.service_type)
    }

    pub fn vendors_in(&self, location: &str) -> impl Iterator<Item = &VendorProfile> {
        let location = location.to_lowercase();
        self.vendors
            .iter()
            .filter(move |v| v.location.to_lowercase().contains(&location))
    }

    pub fn vendor_by_name(&self, name: &str) -> Option<&VendorProfile> {
        self.vendors
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Negotiations still waiting on a vendor decision
    pub fn open_negotiations(&self) -> impl Iterator<Item = &Negotiation> {
        self.negotiations.iter().filter(|n| n.status.is_open())
    }

    pub fn negotiations_with_status(
        &self,
        status: NegotiationStatus,
    ) -> impl Iterator<Item = &Negotiation> {
        self.negotiations.iter().filter(move |n| n.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NegotiationError;
    use crate::negotiation::{plan_strategy, Approach};

    #[test]
    fn test_builtin_seed_loads() {
        let seed = SeedData::builtin().unwrap();
        assert_eq!(seed.vendors.len(), 4);
        assert_eq!(seed.negotiations.len(), 2);
        assert_eq!(seed.market_intelligence.len(), 3);
        assert_eq!(seed.open_negotiations().count(), 2);
        assert_eq!(
            seed.negotiations_with_status(NegotiationStatus::Countered)
                .count(),
            1
        );
    }

    #[test]
    fn test_lookups() {
        let seed = SeedData::builtin().unwrap();
        assert!(seed.market_for("phuket, thailand", "HOTEL").is_some());
        assert!(seed.market_for("Phuket, Thailand", "villa").is_none());
        assert_eq!(seed.vendors_in("phuket").count(), 2);
        assert_eq!(
            seed.vendor_by_name("andaman resort").map(|v| v.service_type.as_str()),
            Some("hotel")
        );
    }

    #[test]
    fn test_seed_negotiations_feed_strategy() {
        let seed = SeedData::builtin().unwrap();
        let villa = seed
            .negotiations
            .iter()
            .find(|n| n.service_type == "villa")
            .unwrap();
        let market = seed.market_for_negotiation(villa);
        assert_eq!(plan_strategy(villa, market).approach, Approach::Relationship);
    }

    #[test]
    fn test_invalid_json() {
        let err = SeedData::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, AssistantError::Serialization(_)));
    }

    #[test]
    fn test_empty_object_is_empty_seed() {
        assert_eq!(SeedData::from_json_str("{}").unwrap(), SeedData::default());
    }

    fn seed_with(negotiation_rates: &str, average_rate: f64) -> String {
        format!(
            r#"{{
                "negotiations": [{{
                    "id": "a1b2c3d4-e5f6-4711-8899-aabbccddeeff",
                    "itinerary_item": "Room",
                    "vendor_name": "V",
                    "service_type": "hotel",
                    {negotiation_rates},
                    "status": "pending",
                    "created_at": "2026-09-01T09:30:00Z",
                    "updated_at": "2026-09-01T09:30:00Z"
                }}],
                "market_intelligence": [{{
                    "destination": "Phuket, Thailand",
                    "service_type": "hotel",
                    "average_rate": {average_rate},
                    "occupancy_rate": 70.0,
                    "demand_level": "medium"
                }}]
            }}"#
        )
    }

    #[test]
    fn test_seed_rates_are_validated() {
        let valid = seed_with(r#""original_rate": 200.0, "requested_rate": 170.0"#, 190.0);
        assert!(SeedData::from_json_str(&valid).is_ok());

        let zero_original = seed_with(r#""original_rate": 0, "requested_rate": 170.0"#, 190.0);
        assert!(matches!(
            SeedData::from_json_str(&zero_original).unwrap_err(),
            AssistantError::Negotiation(NegotiationError::InvalidRate { .. })
        ));

        let negative_counter = seed_with(
            r#""original_rate": 200.0, "requested_rate": 170.0, "counter_rate": -1.0"#,
            190.0,
        );
        assert!(matches!(
            SeedData::from_json_str(&negative_counter).unwrap_err(),
            AssistantError::Negotiation(_)
        ));

        let zero_market = seed_with(r#""original_rate": 200.0, "requested_rate": 170.0"#, 0.0);
        assert!(matches!(
            SeedData::from_json_str(&zero_market).unwrap_err(),
            AssistantError::Configuration(_)
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SeedData::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, AssistantError::Io(_)));
    }
}
