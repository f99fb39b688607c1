//! Cell parsing of historical source rows.
//!
//! Individual cell failures make the affected attribute absent; whether
//! that kills the record is decided by the record builder's
//! mandatory-attribute validation.

use chrono::{NaiveDateTime, Timelike};

use crate::model::ColumnKind;

use super::mapping::MappingParams;
use super::record::{Level, LevelBuilder, RecordBuilder, Timestamp};
use super::row::Row;

/// Parses a full-string floating point cell.
pub fn parse_f64(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses a `YYYY-MM-DD HH:MM:SS(.fraction)` timestamp cell, truncating
/// the fraction to microsecond precision.
pub fn parse_timestamp(cell: &str) -> Option<Timestamp> {
    let parsed = NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S"))
        .ok()?;
    parsed.with_nanosecond(parsed.nanosecond() / 1_000 * 1_000)
}

fn cell_at<'a>(row: &Row<'a>, mapping: &MappingParams, kind: ColumnKind, depth: u32) -> Option<&'a str> {
    let index = mapping.column_index(kind, depth)?;
    row.cell(index)
}

fn parse_bid_level_part(row: &Row<'_>, mapping: &MappingParams, depth: u32, builder: &mut LevelBuilder) {
    if let Some(price) = cell_at(row, mapping, ColumnKind::BidPrice, depth).and_then(parse_f64) {
        builder.bid_price(price);
    }
    if let Some(quantity) = cell_at(row, mapping, ColumnKind::BidQuantity, depth).and_then(parse_f64)
    {
        builder.bid_quantity(quantity);
    }
    if let Some(party) =
        cell_at(row, mapping, ColumnKind::BidParty, depth).filter(|cell| !cell.is_empty())
    {
        builder.bid_counterparty(party);
    }
}

fn parse_offer_level_part(
    row: &Row<'_>,
    mapping: &MappingParams,
    depth: u32,
    builder: &mut LevelBuilder,
) {
    if let Some(price) = cell_at(row, mapping, ColumnKind::OfferPrice, depth).and_then(parse_f64) {
        builder.offer_price(price);
    }
    if let Some(quantity) =
        cell_at(row, mapping, ColumnKind::OfferQuantity, depth).and_then(parse_f64)
    {
        builder.offer_quantity(quantity);
    }
    if let Some(party) =
        cell_at(row, mapping, ColumnKind::OfferParty, depth).filter(|cell| !cell.is_empty())
    {
        builder.offer_counterparty(party);
    }
}

/// Parses one source row into a record builder: timestamps, instrument
/// and up to `depth_levels_to_parse` depth levels per side.
pub fn parse_record(
    row: &Row<'_>,
    mapping: &MappingParams,
    depth_levels_to_parse: u32,
    builder: &mut RecordBuilder,
) {
    if let Some(receive_time) =
        cell_at(row, mapping, ColumnKind::ReceivedTimestamp, 1).and_then(parse_timestamp)
    {
        builder.receive_time(receive_time);
    }

    if let Some(message_time) =
        cell_at(row, mapping, ColumnKind::MessageTimestamp, 1).and_then(parse_timestamp)
    {
        builder.message_time(message_time);
    }

    if let Some(instrument) =
        cell_at(row, mapping, ColumnKind::Instrument, 1).filter(|cell| !cell.is_empty())
    {
        builder.instrument(instrument);
    }

    for depth in 1..=depth_levels_to_parse {
        let mut level_builder = Level::builder();
        parse_bid_level_part(row, mapping, depth, &mut level_builder);
        parse_offer_level_part(row, mapping, depth, &mut level_builder);

        if !level_builder.is_empty() {
            builder.add_level((depth - 1) as usize, level_builder.build());
        }
    }
}
