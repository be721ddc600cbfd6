//! # Tripdesk - Rule-Based Travel Assistant
//!
//! Tripdesk is the conversational core of a travel-planning tool. It reads a
//! short natural-language message, pulls structured trip details out of it,
//! and answers with a canned response chosen by the sender's role. No model
//! calls are involved: every answer comes from an ordered rule chain.
//!
//! ## Features
//!
//! - **Detail extraction**: itinerary name, destination, traveler count,
//!   duration and client preferences from free text
//! - **Ordered rule chains**: literal, all-of, any-of, regex and destination
//!   conditions, first match wins, one chain per role
//! - **Templates**: `{itinerary_name}`, `{destination}`, `{travelers}`,
//!   `{duration}`, `{preferences}` and regex captures `{1}`..`{9}`
//! - **Sample itineraries**: day-by-day plans for known destinations
//! - **Negotiation helpers**: counter/accept/reject tracking, strategy
//!   suggestions and email drafts
//! - **Conversations**: async storage trait with an in-memory default
//!
//! ## Quick Start
//!
//! ```
//! use tripdesk::{parse_trip_details, respond, Role};
//!
//! let details = parse_trip_details(
//!     "Create a new itinerary called Paradise Beach for 4 people to Phuket for 7 days",
//! );
//! assert_eq!(details.destination.as_deref(), Some("Phuket, Thailand"));
//!
//! let reply = respond("Add snorkeling in Phuket", Role::Agent, Some(&details));
//! assert!(reply.contains("Phi Phi"));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! message ─► normalize ─► extract (TripDetails)
//!                 │
//!                 ▼
//!          RuleBook[role] ─► first matching rule ─► template render
//!                 │                                     │
//!                 └──────── fallback (always) ◄─────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`normalize`]: case and whitespace folding
//! - [`destination`]: ordered keyword to place lookup
//! - [`extract`]: trip detail extraction
//! - [`rule`]: conditions, templates and rule chains
//! - [`responder`]: per-role rule books and response selection
//! - [`itinerary`]: sample day-by-day plans
//! - [`negotiation`]: vendor negotiations, strategy and email drafts
//! - [`fixtures`]: seed data loading
//! - [`conversation`]: messages and conversation history
//! - [`storage`]: conversation storage backends
//! - [`assistant`]: async façade tying it all together
//! - [`error`]: error types and result aliases

// Core type definitions
pub mod types;

// Error types
pub mod error;

// Text processing
pub mod destination;
pub mod extract;
pub mod normalize;

// Rule engine
pub mod responder;
pub mod rule;

// Domain helpers
pub mod fixtures;
pub mod itinerary;
pub mod negotiation;

// Conversations and storage
pub mod conversation;
pub mod storage;

// Assistant core
pub mod assistant;

pub use assistant::{Assistant, AssistantBuilder, AssistantConfig, AssistantReply, LogLevel};
pub use conversation::{Conversation, Message, Sender};
pub use destination::{DestinationEntry, DestinationTable};
pub use error::{
    AssistantError, NegotiationError, Result, RuleError, StorageError,
};
pub use extract::{parse_trip_details, parse_trip_details_with, TripDetails};
pub use fixtures::{SeedData, VendorProfile};
pub use itinerary::{generate_sample_itinerary, DayPlan, SampleItinerary};
pub use negotiation::{
    draft_email, plan_strategy, suggest_strategy, Approach, DemandLevel, EmailDraft, EmailKind,
    MarketIntelligence, Negotiation, NegotiationAction, NegotiationEvent, NegotiationStatus,
    Strategy,
};
pub use normalize::normalize;
pub use responder::{respond, Responder, RuleBook, Selection, CREATE_ITINERARY_RULE};
pub use rule::{ResponseRule, ResponseTemplate, RuleChain, RuleCondition, RuleMatch};
pub use storage::{memory::InMemoryConversationStore, ConversationStore};
pub use types::*;
