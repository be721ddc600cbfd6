//! Walk through one conversation per role
//!
//! Creates an itinerary as an agent, asks a traveler question, answers a
//! negotiation as a vendor, then prints a strategy and email draft for the
//! seeded negotiations.
//!
//! Run with: cargo run --example trip_assistant

use std::time::Duration;
use tripdesk::{
    draft_email, plan_strategy, Assistant, AssistantConfig, EmailKind, LogLevel, Role, SeedData,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AssistantConfig {
        thinking_delay: Duration::from_millis(300),
        max_history: 50,
        log_level: LogLevel::Info,
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level.as_tracing_level())
        .init();

    let assistant = Assistant::builder()
        .name("Trip Desk")
        .config(config)
        .build()?;

    println!("✓ Assistant created: {}\n", assistant.name());

    let agent = assistant.start_conversation(Role::Agent).await?;
    for message in [
        "Create a new itinerary called Paradise Beach for 4 people to Phuket for 7 days",
        "Add snorkeling",
        "Add a hotel near the beach",
    ] {
        println!("Agent: {message}");
        let reply = assistant.reply(agent, message).await?;
        println!("Desk:  {}\n", reply.text);

        if let Some(itinerary) = reply.itinerary {
            for day in &itinerary.days {
                println!("  Day {}: {}", day.day, day.title);
                for activity in &day.activities {
                    println!("    - {activity}");
                }
            }
            if itinerary.is_truncated() {
                println!(
                    "  (sample plan covers {} of {} requested days)",
                    itinerary.len(),
                    itinerary.requested_days.unwrap_or_default()
                );
            }
            println!();
        }
    }

    let traveler = assistant.start_conversation(Role::Traveler).await?;
    for message in ["We're heading to Bali next month", "What should I pack?"] {
        println!("Traveler: {message}");
        println!("Desk:     {}\n", assistant.reply(traveler, message).await?.text);
    }

    let vendor = assistant.start_conversation(Role::Vendor).await?;
    let message = "We can counter at $195 per night";
    println!("Vendor: {message}");
    println!("Desk:   {}\n", assistant.reply(vendor, message).await?.text);

    let seed = SeedData::builtin()?;
    for negotiation in seed.open_negotiations() {
        let strategy = plan_strategy(negotiation, seed.market_for_negotiation(negotiation));
        println!(
            "Negotiation with {} ({}): {}",
            negotiation.vendor_name, strategy.approach, strategy.text
        );

        let draft = draft_email(EmailKind::FollowUp, negotiation);
        println!("  Subject: {}\n", draft.subject);
    }

    for id in [agent, traveler, vendor] {
        assistant.end_conversation(&id).await?;
    }

    Ok(())
}
