//! Engine wiring: listing intake, reply routing, lifecycle.

use orderflow_rs::generator::protocol::{
    ExecutionReport, InstrumentDescriptor, OrderPlacementConfirmation, TradingReply,
};
use orderflow_rs::prelude::*;

fn seeded_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();
    catalog.add_venue(Venue {
        venue_id: "XSIM".to_owned(),
        random_parties_count: Some(10),
        orders_on_startup: false,
    });

    catalog.add_listing(Listing {
        symbol: Some("AAA".to_owned()),
        ..Listing::new(1, "XSIM")
    });
    catalog.add_listing(Listing {
        symbol: Some("BBB".to_owned()),
        ..Listing::new(2, "XSIM")
    });
    // No symbol: skipped at intake.
    catalog.add_listing(Listing::new(3, "XSIM"));
    // Another venue: skipped at intake.
    catalog.add_listing(Listing {
        symbol: Some("CCC".to_owned()),
        ..Listing::new(4, "OTHER")
    });
    // Inverted quantity bounds: skipped at intake.
    catalog.add_listing(Listing {
        symbol: Some("DDD".to_owned()),
        qty_minimum: Some(10.0),
        qty_maximum: Some(1.0),
        ..Listing::new(5, "XSIM")
    });

    catalog.add_price_seed(PriceSeed {
        bid_price: Some(10.0),
        offer_price: Some(10.05),
        ..PriceSeed::new("AAA")
    });
    // BBB has no price seed: context exists, random generation disabled.

    catalog
}

fn engine() -> Engine {
    let catalog = seeded_catalog();
    let venue = catalog.venue("XSIM").expect("venue configured");
    Engine::new(venue, &catalog, TradingChannel::new())
}

fn resting_order_reply(id: &str, status: OrderStatus, instrument_id: u64) -> TradingReply {
    TradingReply::Execution(ExecutionReport {
        order_status: Some(status),
        client_order_id: Some(id.to_owned()),
        instrument: InstrumentDescriptor {
            requester_instrument_id: Some(instrument_id),
            ..InstrumentDescriptor::default()
        },
        ..ExecutionReport::default()
    })
}

#[test]
fn engine_accepts_only_eligible_listings_of_its_venue() {
    let engine = engine();
    let symbols: Vec<_> = engine
        .contexts()
        .iter()
        .filter_map(|context| context.listing().symbol_str().map(str::to_owned))
        .collect();
    assert_eq!(symbols, ["AAA", "BBB"]);
}

#[test]
fn reply_for_an_unknown_instrument_is_ignored() {
    // S6: no panic, no mutation, a warning is logged.
    let engine = engine();
    let mut message = GeneratedMessage::new(MessageType::ExecutionReport);
    message.client_order_id = Some("SIM-1".to_owned());
    message.order_status = Some(OrderStatus::Filled);

    engine.process_reply(9_999, &message);

    for context in engine.contexts() {
        assert!(context.registry().is_empty());
    }
}

#[test]
fn replies_route_to_the_originating_instrument_registry() {
    let engine = engine();
    let context = engine
        .contexts()
        .iter()
        .find(|context| context.listing().listing_id == 1)
        .expect("AAA context");

    context.registry().add(
        OrderData::builder("CP1", "SIM-7", Side::Buy)
            .price(10.0)
            .quantity(5.0)
            .build()
            .expect("valid order"),
    );

    // A fill for instrument 1 removes the order there and only there.
    engine.dispatch_reply(&resting_order_reply("SIM-7", OrderStatus::Filled, 1));
    assert!(context.registry().is_empty());
}

#[test]
fn partial_fill_replies_update_the_stored_quantity() {
    let engine = engine();
    let context = engine
        .contexts()
        .iter()
        .find(|context| context.listing().listing_id == 2)
        .expect("BBB context");

    context.registry().add(
        OrderData::builder("CP2", "SIM-8", Side::Sell)
            .price(11.0)
            .quantity(20.0)
            .build()
            .expect("valid order"),
    );

    let reply = TradingReply::Execution(ExecutionReport {
        order_status: Some(OrderStatus::PartiallyFilled),
        client_order_id: Some("SIM-8".to_owned()),
        cum_executed_quantity: Some(4.0),
        leaves_quantity: Some(5.0),
        instrument: InstrumentDescriptor {
            requester_instrument_id: Some(2),
            ..InstrumentDescriptor::default()
        },
        ..ExecutionReport::default()
    });
    engine.dispatch_reply(&reply);

    let stored = context.registry().find_by_identifier("SIM-8").expect("live");
    assert_eq!(stored.quantity(), 9.0); // cum 4 + leaves 5
}

#[test]
fn placement_confirmations_convert_to_new_status_reports() {
    let engine = engine();

    // A confirmation for an aggressive order: unknown id, silently
    // absorbed by the updater.
    let reply = TradingReply::PlacementConfirmation(OrderPlacementConfirmation {
        client_order_id: Some("SIM-AGGR".to_owned()),
        instrument: InstrumentDescriptor {
            requester_instrument_id: Some(1),
            ..InstrumentDescriptor::default()
        },
        ..OrderPlacementConfirmation::default()
    });
    engine.dispatch_reply(&reply);
}

#[test]
fn replies_without_a_requester_id_are_dropped() {
    let engine = engine();
    let reply = TradingReply::Execution(ExecutionReport::default());
    engine.dispatch_reply(&reply);
}

#[test]
fn lifecycle_round_trip() {
    let engine = engine();
    assert!(!engine.status(), "orders_on_startup is off");

    engine.resume();
    assert!(engine.status());

    engine.suspend();
    assert!(!engine.status());

    engine.terminate();
    engine.resume();
    assert!(!engine.status(), "termination is absorbing");
}

#[test]
fn engine_start_and_terminate_join_cleanly() {
    let engine = engine();
    engine.resume();
    engine.start();
    std::thread::sleep(std::time::Duration::from_millis(50));
    engine.terminate();
}

#[test]
fn dropping_an_engine_terminates_it() {
    let engine = engine();
    engine.resume();
    engine.start();
    drop(engine);
}

#[test]
fn descriptor_carries_the_requester_instrument_id() {
    let engine = engine();
    for context in engine.contexts() {
        assert_eq!(
            context.descriptor().requester_instrument_id,
            Some(context.listing().listing_id)
        );
    }
}

#[test]
fn missing_venue_yields_no_engine() {
    let catalog = seeded_catalog();
    assert!(
        Engine::for_venue("UNKNOWN", &catalog, TradingChannel::new(), EngineConfig::default())
            .is_none()
    );
}
