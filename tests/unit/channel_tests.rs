//! Trading channel binding semantics and the crossbeam gateway.

use std::sync::Arc;

use orderflow_rs::generator::protocol::InstrumentStateRequest;
use orderflow_rs::prelude::*;

fn resting_message() -> GeneratedMessage {
    let mut message = GeneratedMessage::new(MessageType::NewOrderSingle);
    message.order_type = Some(OrderType::Limit);
    message.time_in_force = Some(TimeInForce::Day);
    message.side = Some(Side::Buy);
    message.order_price = Some(10.0);
    message.quantity = Some(5.0);
    message.client_order_id = Some("SIM-1".to_owned());
    message.party_id = Some("CP1".to_owned());
    message
}

#[test]
fn unbound_channel_drops_sends_without_failing() {
    let channel = TradingChannel::new();
    assert!(!channel.is_bound());

    // Logged and dropped; generation must not fail on an unbound channel.
    channel.send_order_message(&resting_message(), &InstrumentDescriptor::default());

    assert!(
        channel
            .query_instrument_state(InstrumentStateRequest::default())
            .is_none()
    );
}

#[test]
fn channel_gateway_forwards_requests_into_a_crossbeam_channel() {
    let (sender, receiver) = crossbeam::channel::unbounded();
    let channel = TradingChannel::bound(Arc::new(ChannelGateway::new(sender)));
    assert!(channel.is_bound());

    channel.send_order_message(&resting_message(), &InstrumentDescriptor::default());

    let request = receiver.try_recv().expect("one request forwarded");
    match request {
        TradingRequest::Placement(placement) => {
            assert_eq!(placement.client_order_id.as_deref(), Some("SIM-1"));
            assert_eq!(placement.side, Some(Side::Buy));
            assert_eq!(placement.order_price, Some(10.0));
            assert_eq!(placement.parties.len(), 1);
        }
        other => panic!("expected a placement request, got {other:?}"),
    }
}

#[test]
fn market_orders_travel_unpriced() {
    let (sender, receiver) = crossbeam::channel::unbounded();
    let channel = TradingChannel::bound(Arc::new(ChannelGateway::new(sender)));

    let mut message = resting_message();
    message.order_type = Some(OrderType::Market);
    message.time_in_force = Some(TimeInForce::ImmediateOrCancel);
    channel.send_order_message(&message, &InstrumentDescriptor::default());

    match receiver.try_recv().expect("one request forwarded") {
        TradingRequest::Placement(placement) => {
            assert_eq!(placement.order_type, Some(OrderType::Market));
            assert_eq!(placement.order_price, None);
        }
        other => panic!("expected a placement request, got {other:?}"),
    }
}

#[test]
fn cancel_requests_carry_both_identifiers() {
    let (sender, receiver) = crossbeam::channel::unbounded();
    let channel = TradingChannel::bound(Arc::new(ChannelGateway::new(sender)));

    let mut message = resting_message();
    message.message_type = MessageType::OrderCancelRequest;
    message.orig_client_order_id = Some("SIM-0".to_owned());
    channel.send_order_message(&message, &InstrumentDescriptor::default());

    match receiver.try_recv().expect("one request forwarded") {
        TradingRequest::Cancellation(cancellation) => {
            assert_eq!(cancellation.client_order_id.as_deref(), Some("SIM-1"));
            assert_eq!(cancellation.orig_client_order_id.as_deref(), Some("SIM-0"));
        }
        other => panic!("expected a cancellation request, got {other:?}"),
    }
}

#[test]
fn execution_reports_have_no_wire_representation() {
    let (sender, receiver) = crossbeam::channel::unbounded();
    let channel = TradingChannel::bound(Arc::new(ChannelGateway::new(sender)));

    let mut message = resting_message();
    message.message_type = MessageType::ExecutionReport;
    channel.send_order_message(&message, &InstrumentDescriptor::default());

    assert!(receiver.try_recv().is_err());
}

#[test]
fn unbinding_restores_the_dropping_behavior() {
    let (sender, receiver) = crossbeam::channel::unbounded();
    let channel = TradingChannel::bound(Arc::new(ChannelGateway::new(sender)));

    channel.unbind();
    channel.send_order_message(&resting_message(), &InstrumentDescriptor::default());
    assert!(receiver.try_recv().is_err());
}
