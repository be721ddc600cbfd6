// Integration tests for the negotiation workflow over seed data

use tripdesk::{
    draft_email, plan_strategy, respond, Approach, EmailKind, Negotiation, NegotiationAction,
    NegotiationError, NegotiationStatus, Role, SeedData, Sender,
};

fn seeded_hotel(seed: &SeedData) -> Negotiation {
    seed.vendor_by_name("Andaman Resort")
        .and_then(|vendor| {
            seed.negotiations
                .iter()
                .find(|n| n.vendor_name == vendor.name)
        })
        .cloned()
        .expect("seed contains the Andaman Resort negotiation")
}

#[test]
fn test_hotel_negotiation_lifecycle() {
    let seed = SeedData::builtin().unwrap();
    let mut negotiation = seeded_hotel(&seed);
    let market = seed.market_for_negotiation(&negotiation);
    assert!(market.is_some());

    // 220 against a 190 market average
    let opening = plan_strategy(&negotiation, market);
    assert_eq!(opening.approach, Approach::Aggressive);
    assert!(opening.text.contains("190.00"));

    let request = draft_email(EmailKind::InitialRequest, &negotiation);
    assert!(request.body.contains("USD 180.00"));

    negotiation.counter(185.0).unwrap();
    negotiation.add_message(Sender::User, "We can counter at $185");
    assert_eq!(negotiation.status, NegotiationStatus::Countered);
    assert_eq!(plan_strategy(&negotiation, market).approach, Approach::AcceptNow);

    negotiation.accept().unwrap();
    assert_eq!(negotiation.agreed_rate(), Some(185.0));
    assert_eq!(plan_strategy(&negotiation, market).approach, Approach::Closed);

    let confirmation = draft_email(EmailKind::Acceptance, &negotiation);
    assert!(confirmation.subject.starts_with("Confirmed"));
    assert!(confirmation.body.contains("USD 185.00"));

    assert!(matches!(
        negotiation.history.last().map(|e| &e.action),
        Some(NegotiationAction::Accepted { rate }) if *rate == 185.0
    ));
    assert_eq!(negotiation.messages.len(), 2);
}

#[test]
fn test_rejected_negotiation_is_final() {
    let seed = SeedData::builtin().unwrap();
    let mut negotiation = seeded_hotel(&seed);

    negotiation
        .reject(Some("Fully booked for those dates".to_string()))
        .unwrap();

    assert!(matches!(
        negotiation.counter(200.0),
        Err(NegotiationError::Closed {
            status: NegotiationStatus::Rejected,
            ..
        })
    ));
    assert_eq!(seed.open_negotiations().count(), 2, "seed data is untouched");
}

#[test]
fn test_busy_market_prefers_value_adds() {
    let seed = SeedData::builtin().unwrap();
    let villa = seed
        .negotiations_with_status(NegotiationStatus::Countered)
        .next()
        .unwrap();

    let strategy = plan_strategy(villa, seed.market_for_negotiation(villa));
    assert_eq!(strategy.approach, Approach::Relationship);
    assert!(strategy.text.contains("88%"));
}

#[test]
fn test_vendor_chat_matches_negotiation_actions() {
    assert!(respond("We can counter at $185", Role::Vendor, None).contains("$185"));
    assert!(respond("Happy to accept", Role::Vendor, None).contains("accepted"));
    assert!(respond("Sorry, we must decline", Role::Vendor, None).contains("decline"));
}

#[test]
fn test_custom_currency_in_drafts() {
    let negotiation = Negotiation::new("Canal view room", "Hotel Amstel", "hotel", 300.0, 260.0)
        .unwrap()
        .with_destination("Amsterdam, Netherlands")
        .with_currency("EUR");

    let draft = draft_email(EmailKind::FollowUp, &negotiation);
    assert!(draft.body.contains("EUR 260.00"));
    assert!(draft.body.contains("in Amsterdam, Netherlands"));
}
