//! Rate negotiations between agents and vendors
//!
//! A [`Negotiation`] tracks one itinerary item's rate through its states.
//! Strategy suggestions and email drafts are rule-based text built from the
//! negotiation's numbers and, when available, market intelligence.

use crate::conversation::{Message, Sender};
use crate::error::{NegotiationError, NegotiationResult};
use crate::types::{NegotiationId, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Where a negotiation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegotiationStatus {
    /// Waiting for the vendor
    Pending,
    /// Vendor proposed another rate
    Countered,
    /// Rate agreed
    Accepted,
    /// Vendor declined
    Rejected,
}

impl NegotiationStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Countered)
    }
}

/// What happened in a negotiation's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NegotiationAction {
    Requested { rate: f64 },
    Countered { rate: f64 },
    Accepted { rate: f64 },
    Rejected {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

/// One entry of a negotiation's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationEvent {
    pub actor: Role,
    #[serde(flatten)]
    pub action: NegotiationAction,
    pub at: DateTime<Utc>,
}

/// A rate negotiation for one itinerary item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Negotiation {
    pub id: NegotiationId,
    pub itinerary_item: String,
    pub vendor_name: String,
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub original_rate: f64,
    pub requested_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_rate: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub status: NegotiationStatus,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub history: Vec<NegotiationEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Negotiation {
    /// Open a negotiation asking `vendor_name` to move from `original_rate`
    /// to `requested_rate`.
    pub fn new(
        itinerary_item: impl Into<String>,
        vendor_name: impl Into<String>,
        service_type: impl Into<String>,
        original_rate: f64,
        requested_rate: f64,
    ) -> NegotiationResult<Self> {
        let id = NegotiationId::new();
        check_rate(id, original_rate)?;
        check_rate(id, requested_rate)?;

        let now = Utc::now();
        Ok(Self {
            id,
            itinerary_item: itinerary_item.into(),
            vendor_name: vendor_name.into(),
            service_type: service_type.into(),
            destination: None,
            original_rate,
            requested_rate,
            counter_rate: None,
            currency: default_currency(),
            status: NegotiationStatus::Pending,
            messages: Vec::new(),
            history: vec![NegotiationEvent {
                actor: Role::Agent,
                action: NegotiationAction::Requested {
                    rate: requested_rate,
                },
                at: now,
            }],
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Check every rate on the negotiation, e.g. after deserializing one.
    pub fn validate(&self) -> NegotiationResult<()> {
        check_rate(self.id, self.original_rate)?;
        check_rate(self.id, self.requested_rate)?;
        if let Some(counter) = self.counter_rate {
            check_rate(self.id, counter)?;
        }
        Ok(())
    }

    /// Discount asked for, as a percentage of the original rate
    pub fn requested_discount_pct(&self) -> f64 {
        (self.original_rate - self.requested_rate) / self.original_rate * 100.0
    }

    /// Rate on the table right now: the counter if there is one
    pub fn current_offer(&self) -> f64 {
        self.counter_rate.unwrap_or(self.requested_rate)
    }

    /// Agreed rate once accepted
    pub fn agreed_rate(&self) -> Option<f64> {
        (self.status == NegotiationStatus::Accepted).then(|| self.current_offer())
    }

    /// Vendor proposes `rate`
    pub fn counter(&mut self, rate: f64) -> NegotiationResult<()> {
        self.ensure_open()?;
        check_rate(self.id, rate)?;
        self.counter_rate = Some(rate);
        self.transition(
            NegotiationStatus::Countered,
            Role::Vendor,
            NegotiationAction::Countered { rate },
        );
        Ok(())
    }

    /// Vendor accepts the current offer
    pub fn accept(&mut self) -> NegotiationResult<()> {
        self.ensure_open()?;
        let rate = self.current_offer();
        self.transition(
            NegotiationStatus::Accepted,
            Role::Vendor,
            NegotiationAction::Accepted { rate },
        );
        Ok(())
    }

    /// Vendor declines
    pub fn reject(&mut self, reason: Option<String>) -> NegotiationResult<()> {
        self.ensure_open()?;
        self.transition(
            NegotiationStatus::Rejected,
            Role::Vendor,
            NegotiationAction::Rejected { reason },
        );
        Ok(())
    }

    /// Record a chat message on the negotiation
    pub fn add_message(&mut self, sender: Sender, text: impl Into<String>) {
        self.messages.push(Message::new(sender, text));
        self.updated_at = Utc::now();
    }

    fn ensure_open(&self) -> NegotiationResult<()> {
        if self.status.is_open() {
            Ok(())
        } else {
            Err(NegotiationError::Closed {
                id: self.id,
                status: self.status,
            })
        }
    }

    fn transition(&mut self, status: NegotiationStatus, actor: Role, action: NegotiationAction) {
        info!(
            negotiation_id = %self.id,
            from = ?self.status,
            to = ?status,
            "Negotiation status changed"
        );
        let now = Utc::now();
        self.status = status;
        self.history.push(NegotiationEvent {
            actor,
            action,
            at: now,
        });
        self.updated_at = now;
    }
}

fn check_rate(id: NegotiationId, rate: f64) -> NegotiationResult<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(NegotiationError::InvalidRate { id, rate })
    }
}

/// How busy a market is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

/// Market numbers for one destination and service type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketIntelligence {
    pub destination: String,
    pub service_type: String,
    pub average_rate: f64,
    /// Percentage, 0-100
    pub occupancy_rate: f64,
    pub demand_level: DemandLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
}

/// Negotiation approach picked by [`plan_strategy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    /// Counter is close enough, take it
    AcceptNow,
    /// Vendor is above market, push hard
    Aggressive,
    /// Anchor and settle in the middle
    Moderate,
    /// Busy market, trade on value-adds instead of price
    Relationship,
    /// Nothing left to negotiate
    Closed,
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Approach::AcceptNow => "Accept now",
            Approach::Aggressive => "Aggressive",
            Approach::Moderate => "Moderate",
            Approach::Relationship => "Relationship",
            Approach::Closed => "Closed",
        };
        f.write_str(label)
    }
}

/// Suggested approach and its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub approach: Approach,
    pub text: String,
}

/// A counter within this percentage of the requested rate is worth taking
const ACCEPT_WITHIN_PCT: f64 = 5.0;
/// A vendor this far above the market average is pushed hard
const ABOVE_MARKET_PCT: f64 = 10.0;
/// Occupancy from which the market counts as busy
const BUSY_OCCUPANCY_PCT: f64 = 85.0;
/// Requested discounts beyond this are unlikely to land in one round
const STEEP_DISCOUNT_PCT: f64 = 25.0;

/// Pick a negotiation approach and explain it.
pub fn plan_strategy(
    negotiation: &Negotiation,
    market: Option<&MarketIntelligence>,
) -> Strategy {
    let n = negotiation;
    let cur = &n.currency;
    let discount = n.requested_discount_pct();

    let (approach, text) = if !n.status.is_open() {
        (
            Approach::Closed,
            format!(
                "The negotiation with {} is {:?}. No further strategy is needed; record the \
                 outcome and move on to the next line item.",
                n.vendor_name, n.status
            ),
        )
    } else if let Some(counter) = n
        .counter_rate
        .filter(|c| (c - n.requested_rate) / n.requested_rate * 100.0 <= ACCEPT_WITHIN_PCT)
    {
        (
            Approach::AcceptNow,
            format!(
                "{} countered at {cur} {counter:.2}, within {ACCEPT_WITHIN_PCT:.0}% of your \
                 request of {cur} {:.2}. Accept now and ask for a small value-add such as \
                 breakfast or a late checkout to close on a good note.",
                n.vendor_name, n.requested_rate
            ),
        )
    } else if let Some(m) = market.filter(|m| {
        m.demand_level == DemandLevel::High || m.occupancy_rate >= BUSY_OCCUPANCY_PCT
    }) {
        (
            Approach::Relationship,
            format!(
                "Demand in {} is high ({:.0}% occupancy). {} has little reason to cut price, so \
                 keep the discount request modest (around 5%) and negotiate inclusions instead: \
                 upgrades, transfers, or flexible cancellation for {}.",
                m.destination, m.occupancy_rate, n.vendor_name, n.itinerary_item
            ),
        )
    } else if let Some((m, gap)) = market
        .map(|m| (m, (n.original_rate - m.average_rate) / m.average_rate * 100.0))
        .filter(|(_, gap)| *gap > ABOVE_MARKET_PCT)
    {
        (
            Approach::Aggressive,
            format!(
                "{}'s rate of {cur} {:.2} is {gap:.0}% above the {} market average of {cur} \
                 {:.2}. Lead with the market data and ask for {cur} {:.2}; be ready to move \
                 the group to a competitor if they won't come down.",
                n.vendor_name, n.original_rate, m.destination, m.average_rate, m.average_rate
            ),
        )
    } else if discount > STEEP_DISCOUNT_PCT {
        let midpoint = (n.original_rate + n.requested_rate) / 2.0;
        (
            Approach::Moderate,
            format!(
                "A {discount:.0}% discount is steep for one round. Open at {cur} {:.2} but plan \
                 to settle near {cur} {midpoint:.2}; offer a deposit or guaranteed room block to \
                 justify it.",
                n.requested_rate
            ),
        )
    } else {
        (
            Approach::Moderate,
            format!(
                "Ask {} for {cur} {:.2} ({discount:.0}% off {cur} {:.2}). Mention the group \
                 size and repeat business, and offer flexible dates if they hesitate.",
                n.vendor_name, n.requested_rate, n.original_rate
            ),
        )
    };

    debug!(negotiation_id = %n.id, approach = %approach, "Strategy planned");
    Strategy { approach, text }
}

/// Strategy text for a negotiation
pub fn suggest_strategy(negotiation: &Negotiation, market: Option<&MarketIntelligence>) -> String {
    plan_strategy(negotiation, market).text
}

/// Which email to draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    InitialRequest,
    FollowUp,
    CounterResponse,
    Acceptance,
    Decline,
}

/// Email ready to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

/// Draft an email to the vendor about `negotiation`.
pub fn draft_email(kind: EmailKind, negotiation: &Negotiation) -> EmailDraft {
    let n = negotiation;
    let cur = &n.currency;
    let place = n
        .destination
        .as_deref()
        .map(|d| format!(" in {d}"))
        .unwrap_or_default();

    let (subject, body) = match kind {
        EmailKind::InitialRequest => (
            format!("Rate request: {}", n.itinerary_item),
            format!(
                "Dear {},\n\nWe are arranging {}{place} for one of our clients and would love \
                 to work with you. Your published rate is {cur} {:.2}; would you consider \
                 {cur} {:.2} for this booking?\n\nWe look forward to your reply.\n\nBest regards",
                n.vendor_name, n.itinerary_item, n.original_rate, n.requested_rate
            ),
        ),
        EmailKind::FollowUp => (
            format!("Following up: {}", n.itinerary_item),
            format!(
                "Dear {},\n\nI wanted to follow up on our request of {cur} {:.2} for {}{place}. \
                 Our client is keen to confirm soon, so any update would be appreciated.\n\n\
                 Best regards",
                n.vendor_name, n.requested_rate, n.itinerary_item
            ),
        ),
        EmailKind::CounterResponse => (
            format!("Re: counter-offer for {}", n.itinerary_item),
            format!(
                "Dear {},\n\nThank you for your counter-offer of {cur} {:.2}. We'd like to meet \
                 you halfway at {cur} {:.2}. Could you confirm whether that works?\n\n\
                 Best regards",
                n.vendor_name,
                n.current_offer(),
                (n.current_offer() + n.requested_rate) / 2.0
            ),
        ),
        EmailKind::Acceptance => (
            format!("Confirmed: {}", n.itinerary_item),
            format!(
                "Dear {},\n\nWe're happy to confirm {}{place} at {cur} {:.2}. Booking details \
                 will follow shortly.\n\nThank you for working with us.\n\nBest regards",
                n.vendor_name,
                n.itinerary_item,
                n.current_offer()
            ),
        ),
        EmailKind::Decline => (
            format!("Regarding {}", n.itinerary_item),
            format!(
                "Dear {},\n\nThank you for considering our request for {}. Unfortunately we \
                 won't be able to proceed this time, but we hope to work together on future \
                 trips.\n\nBest regards",
                n.vendor_name, n.itinerary_item
            ),
        ),
    };

    EmailDraft { subject, body }
}
