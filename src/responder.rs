//! Role-aware response selection
//!
//! Each [`Role`] owns a [`RuleBook`]: an ordered [`RuleChain`] plus a fallback
//! template. Selecting a response normalizes the input, walks the chain and
//! renders the first matching template, or the fallback when nothing matches.
//! Selection is total: the result is never empty.

use crate::destination::DestinationTable;
use crate::error::{RuleError, RuleResult};
use crate::extract::{parse_trip_details_with, TripDetails};
use crate::normalize::normalize;
use crate::rule::{ResponseRule, ResponseTemplate, RuleChain, RuleCondition, RuleMatch};
use crate::types::{Role, RuleId};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, error};

/// Name of the built-in agent rule that starts a new itinerary
pub const CREATE_ITINERARY_RULE: &str = "create_itinerary";

/// Rendered response and the rule that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub text: String,
    /// `None` when the fallback answered
    pub matched: Option<RuleMatch>,
}

/// Ordered rules and fallback for one role
#[derive(Debug, Clone)]
pub struct RuleBook {
    role: Role,
    chain: RuleChain,
    fallback: ResponseTemplate,
}

impl RuleBook {
    /// Empty rule book; `fallback` must render something.
    pub fn new(role: Role, fallback: impl Into<String>) -> RuleResult<Self> {
        let fallback = ResponseTemplate::new(fallback);
        if fallback.as_str().trim().is_empty() {
            return Err(RuleError::EmptyFallback(role.to_string()));
        }
        Ok(Self {
            role,
            chain: RuleChain::new(),
            fallback,
        })
    }

    /// Build from an ordered list of rules
    pub fn with_rules(
        role: Role,
        fallback: impl Into<String>,
        rules: impl IntoIterator<Item = ResponseRule>,
    ) -> RuleResult<Self> {
        let mut book = Self::new(role, fallback)?;
        for rule in rules {
            book.chain.push(rule)?;
        }
        Ok(book)
    }

    /// The rule book shipped for `role`
    pub fn default_for(role: Role) -> Self {
        match role {
            Role::Agent => DEFAULT_AGENT.clone(),
            Role::Traveler => DEFAULT_TRAVELER.clone(),
            Role::Vendor => DEFAULT_VENDOR.clone(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn chain(&self) -> &RuleChain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut RuleChain {
        &mut self.chain
    }

    pub fn push(&mut self, rule: ResponseRule) -> RuleResult<RuleId> {
        self.chain.push(rule)
    }

    /// Pick and render the response for `input`.
    pub fn select(&self, input: &str, details: Option<&TripDetails>) -> Selection {
        let normalized = normalize(input);

        if let Some((rule, matched)) = self.chain.first_match(&normalized, details) {
            let text = rule.template.render(details, &matched.captures);
            if !text.trim().is_empty() {
                return Selection {
                    text,
                    matched: Some(matched),
                };
            }
            debug!(rule_name = %rule.name, "Matched rule rendered empty, using fallback");
        }

        debug!(role = %self.role, "No rule matched, using fallback");
        Selection {
            text: self.fallback.render(details, &[]),
            matched: None,
        }
    }
}

/// Rule books for every role plus the destination table used to extract
/// trip details when the caller has none.
#[derive(Debug, Clone)]
pub struct Responder {
    agent: RuleBook,
    traveler: RuleBook,
    vendor: RuleBook,
    destinations: DestinationTable,
}

impl Responder {
    pub fn new() -> Self {
        Self {
            agent: RuleBook::default_for(Role::Agent),
            traveler: RuleBook::default_for(Role::Traveler),
            vendor: RuleBook::default_for(Role::Vendor),
            destinations: DestinationTable::builtin().clone(),
        }
    }

    /// Replace the rule book for the book's role
    pub fn with_rule_book(mut self, book: RuleBook) -> Self {
        let role = book.role();
        *self.book_mut(role) = book;
        self
    }

    pub fn with_destinations(mut self, destinations: DestinationTable) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn book(&self, role: Role) -> &RuleBook {
        match role {
            Role::Agent => &self.agent,
            Role::Traveler => &self.traveler,
            Role::Vendor => &self.vendor,
        }
    }

    pub fn book_mut(&mut self, role: Role) -> &mut RuleBook {
        match role {
            Role::Agent => &mut self.agent,
            Role::Traveler => &mut self.traveler,
            Role::Vendor => &mut self.vendor,
        }
    }

    pub fn destinations(&self) -> &DestinationTable {
        &self.destinations
    }

    /// Extract trip details with this responder's destination table
    pub fn extract(&self, input: &str) -> TripDetails {
        parse_trip_details_with(input, &self.destinations)
    }

    /// Select a response. Details are extracted from `input` when the caller
    /// passes none.
    pub fn select(&self, input: &str, role: Role, details: Option<&TripDetails>) -> Selection {
        match details {
            Some(details) => self.book(role).select(input, Some(details)),
            None => {
                let extracted = self.extract(input);
                self.book(role).select(input, Some(&extracted))
            }
        }
    }

    pub fn respond(&self, input: &str, role: Role, details: Option<&TripDetails>) -> String {
        self.select(input, role, details).text
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_RESPONDER: LazyLock<Responder> = LazyLock::new(Responder::new);

/// Respond with the built-in rule books.
pub fn respond(input: &str, role: Role, details: Option<&TripDetails>) -> String {
    DEFAULT_RESPONDER.respond(input, role, details)
}

fn any(words: &[&str]) -> RuleCondition {
    RuleCondition::any_of(words.iter().copied())
}

fn all(words: &[&str]) -> RuleCondition {
    RuleCondition::all_of(words.iter().copied())
}

fn build_default(role: Role, fallback: &str, rules: Vec<ResponseRule>) -> RuleBook {
    // Built-in rules are static text; a rejected rule is dropped rather than
    // taking the whole book down.
    let mut book = match RuleBook::new(role, fallback) {
        Ok(book) => book,
        Err(_) => RuleBook {
            role,
            chain: RuleChain::new(),
            fallback: ResponseTemplate::new("How can I help with your trip?"),
        },
    };
    for rule in rules {
        let name = rule.name.clone();
        if let Err(e) = book.chain.push(rule) {
            error!(rule_name = %name, error = %e, "Built-in rule rejected");
        }
    }
    book
}

static DEFAULT_AGENT: LazyLock<RuleBook> = LazyLock::new(|| {
    build_default(
        Role::Agent,
        "I can create itineraries, add hotels, tours and transfers, suggest negotiation \
         strategies for vendor rates, or draft client emails. What would you like to do?",
        vec![
            ResponseRule::new(
                "add_snorkeling_phuket",
                all(&["add", "snorkel"]).and(RuleCondition::destination("phuket")),
                "Added a full-day snorkeling trip to the Phi Phi Islands with a stop at Maya Bay \
                 to {itinerary_name}. Speedboat pickup is from Rassada Pier at 8:00; lunch and \
                 equipment are included.",
            ),
            ResponseRule::new(
                "add_snorkeling_bali",
                all(&["add", "snorkel"]).and(RuleCondition::destination("bali")),
                "Added a snorkeling morning at Blue Lagoon, Padang Bai, to {itinerary_name}. \
                 Hotel pickup is at 7:30 and the boat returns before lunch.",
            ),
            ResponseRule::new(
                "add_snorkeling",
                all(&["add", "snorkel"]),
                "Added a guided snorkeling excursion in {destination} to {itinerary_name}. \
                 I'll ask the local operator for their best reef and confirm pickup times.",
            ),
            ResponseRule::new(
                "add_hotel",
                RuleCondition::literal("add").and(any(&[
                    "hotel",
                    "resort",
                    "villa",
                    "accommodation",
                ])),
                "Added accommodation in {destination} to {itinerary_name}. I've shortlisted \
                 three properties that match the group size ({travelers}); want me to open a \
                 rate negotiation with the top pick?",
            ),
            ResponseRule::new(
                "add_transfer",
                RuleCondition::literal("add").and(any(&["transfer", "airport", "pickup"])),
                "Added a private airport transfer in {destination} for {itinerary_name}, \
                 sized for {travelers} travelers with luggage allowance.",
            ),
            ResponseRule::new(
                "add_tour",
                RuleCondition::literal("add").and(any(&[
                    "tour",
                    "excursion",
                    "activity",
                    "experience",
                ])),
                "Added a half-day guided tour in {destination} to {itinerary_name}. You can \
                 move it to any free slot in the day-by-day view.",
            ),
            ResponseRule::new(
                CREATE_ITINERARY_RULE,
                any(&["create", "plan", "build", "start", "new"]).and(any(&[
                    "trip",
                    "itinerary",
                    "vacation",
                    "holiday",
                    "getaway",
                ])),
                "I've started a new itinerary \"{itinerary_name}\". Destination: {destination}. \
                 Duration: {duration}. Travelers: {travelers}. A sample day-by-day plan is ready \
                 for you to refine; ask me to add hotels, tours or transfers.",
            ),
            ResponseRule::new(
                "negotiation_strategy",
                any(&["negotiat", "discount", "better rate", "lower rate", "bargain"]),
                "Negotiation strategy for {destination}: open with a 15-20% discount request \
                 anchored on group size ({travelers}) and length of stay ({duration}). Offer \
                 flexible dates or a non-refundable deposit in exchange, and ask for value-adds \
                 such as breakfast or transfers if the vendor holds firm on price.",
            ),
            ResponseRule::new(
                "draft_email",
                any(&["email", "draft", "write to", "message the"]),
                "Here's a draft you can send:\n\nSubject: {itinerary_name} - {destination}\n\n\
                 Hi,\n\nI'm putting together {itinerary_name} in {destination} ({duration}, \
                 travelers: {travelers}). Could you share your best available rates and any \
                 group benefits?\n\nKind regards",
            ),
            ResponseRule::new(
                "budget",
                any(&["budget", "cost", "price", "quote", "how much"]),
                "For {destination} I'll build the quote from confirmed vendor rates. Share a \
                 per-person budget and I'll flag any line items that push past it.",
            ),
            ResponseRule::new(
                "vendor_search",
                any(&["vendor", "supplier", "partner", "operator"]),
                "I'll pull vendor profiles in {destination} with their ratings and past \
                 negotiation outcomes so you can pick who to approach first.",
            ),
            // last, so "hi, create a trip..." reaches the action rules
            ResponseRule::new(
                "greeting",
                RuleCondition::regex(r"^(hi|hello|hey|good (morning|afternoon|evening))\b"),
                "Hello! Ready to build a trip? Tell me the destination, how long, and how many \
                 travelers, for example: \"Create a 7-day trip to Phuket called Paradise Beach \
                 for 4 people\".",
            ),
        ],
    )
});

static DEFAULT_TRAVELER: LazyLock<RuleBook> = LazyLock::new(|| {
    build_default(
        Role::Traveler,
        "I'm here to help with your trip. Ask me about your itinerary, the weather, what to \
         pack, travel documents, or request a change and I'll pass it on to your agent.",
        vec![
            ResponseRule::new(
                "weather_phuket",
                any(&["weather", "rain", "temperature", "climate"])
                    .and(RuleCondition::destination("phuket")),
                "Phuket is warm all year (27-33°C). May to October is monsoon season with short \
                 afternoon showers, so plan boat trips for the morning.",
            ),
            ResponseRule::new(
                "weather",
                any(&["weather", "rain", "temperature", "climate"]),
                "I'll check the forecast for {destination} closer to departure. Pack a light \
                 layer and an umbrella just in case.",
            ),
            ResponseRule::new(
                "packing",
                any(&["pack", "bring", "luggage", "suitcase"]),
                "For {destination}: comfortable walking shoes, sun protection, a reusable water \
                 bottle, adapters, and copies of your booking confirmations.",
            ),
            ResponseRule::new(
                "documents",
                any(&["visa", "passport", "document", "insurance"]),
                "Make sure your passport is valid for at least six months after your return. \
                 Your agent will confirm visa requirements for {destination}.",
            ),
            ResponseRule::new(
                "cancel",
                any(&["cancel", "refund"]),
                "I've flagged a cancellation request on {itinerary_name}. Your agent will review \
                 vendor cancellation terms and get back to you with any fees before anything \
                 is changed.",
            ),
            ResponseRule::new(
                "change_request",
                any(&["change", "modify", "swap", "move", "reschedule"]),
                "Got it. I've sent your change request for {itinerary_name} to your agent, who \
                 will confirm availability with the vendors.",
            ),
            ResponseRule::new(
                "dining",
                RuleCondition::regex(r"\b(restaurants?|food|eat(ing)?|dinners?|lunch(es)?)\b"),
                "Your agent can reserve restaurants in {destination}. Let us know about any \
                 dietary needs so we can pass them on.",
            ),
            ResponseRule::new(
                "itinerary_overview",
                RuleCondition::regex(r"\b(itinerar(y|ies)|schedule|plans?|days?)\b"),
                "{itinerary_name} takes you to {destination} for {duration}. Open the \
                 day-by-day view to see each activity, or ask me about a specific day.",
            ),
        ],
    )
});

static DEFAULT_VENDOR: LazyLock<RuleBook> = LazyLock::new(|| {
    build_default(
        Role::Vendor,
        "I can help you respond to negotiation requests: accept the proposed rate, counter \
         with your own, or decline. How would you like to respond?",
        vec![
            ResponseRule::new(
                "counter_with_amount",
                RuleCondition::regex(r"counter(?:[- ]?offer)?\D*?\$?(\d+(?:\.\d{1,2})?)"),
                "I'll send a counter-offer of ${1} to the agent with a note on what's \
                 included. You'll be notified as soon as they respond.",
            ),
            ResponseRule::new(
                "counter",
                RuleCondition::literal("counter"),
                "What rate would you like to counter with? Including inclusions such as \
                 breakfast or late checkout often closes the gap faster than price alone.",
            ),
            ResponseRule::new(
                "reject",
                any(&["reject", "decline", "cannot", "can't", "unable"]),
                "I'll decline the request politely and leave the door open for future \
                 bookings. Would you like to suggest alternative dates?",
            ),
            ResponseRule::new(
                "accept",
                any(&["accept", "agree", "approve", "deal"]),
                "Great, I'll confirm the agreed rate with the agent and mark the negotiation as \
                 accepted. The booking details will follow.",
            ),
            ResponseRule::new(
                "occupancy",
                any(&["occupancy", "availability", "available", "capacity", "booked"]),
                "Sharing current occupancy helps agents understand your pricing. High occupancy \
                 periods justify holding your rate; low ones are a good time to offer value-adds.",
            ),
            ResponseRule::new(
                "market",
                any(&["market", "demand", "season", "competitor"]),
                "Market data for {destination} is available in your dashboard: average rates, \
                 occupancy and demand level for the season.",
            ),
            ResponseRule::new(
                "rate_question",
                any(&["rate", "price", "pricing"]),
                "The agent's request is listed with the original and requested rate. You can \
                 accept it, counter, or decline from the negotiation view.",
            ),
        ],
    )
});
