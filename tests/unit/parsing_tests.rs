//! Timestamp and value cell parsing.

use chrono::{NaiveDate, Timelike};
use orderflow_rs::generator::historical::{parse_f64, parse_timestamp};

#[test]
fn timestamps_parse_with_and_without_fractions() {
    let plain = parse_timestamp("2023-06-01 10:15:30").expect("plain timestamp");
    assert_eq!(
        plain.date(),
        NaiveDate::from_ymd_opt(2023, 6, 1).expect("valid date")
    );
    assert_eq!(plain.time().second(), 30);
    assert_eq!(plain.time().nanosecond(), 0);

    let fractional = parse_timestamp("2023-06-01 10:15:30.123456").expect("fractional timestamp");
    assert_eq!(fractional.time().nanosecond(), 123_456_000);
}

#[test]
fn fractions_truncate_to_microseconds() {
    let nanos = parse_timestamp("2023-06-01 10:15:30.123456789").expect("nanosecond input");
    assert_eq!(nanos.time().nanosecond(), 123_456_000);
}

#[test]
fn malformed_timestamps_are_rejected() {
    assert!(parse_timestamp("").is_none());
    assert!(parse_timestamp("2023-06-01").is_none());
    assert!(parse_timestamp("10:15:30").is_none());
    assert!(parse_timestamp("2023-13-01 10:15:30").is_none());
    assert!(parse_timestamp("2023-06-32 10:15:30").is_none());
    assert!(parse_timestamp("01/06/2023 10:15:30").is_none());
}

#[test]
fn float_cells_parse_full_string_only() {
    assert_eq!(parse_f64("9.95"), Some(9.95));
    assert_eq!(parse_f64("-1.5"), Some(-1.5));
    assert_eq!(parse_f64("10"), Some(10.0));

    assert_eq!(parse_f64(""), None);
    assert_eq!(parse_f64("9.95x"), None);
    assert_eq!(parse_f64("n/a"), None);
    // Non-finite values never enter a price or quantity.
    assert_eq!(parse_f64("inf"), None);
    assert_eq!(parse_f64("NaN"), None);
}
