//! CSV datasource ingestion end to end: tokenizing, mapping, grouping.

use std::io::Write;

use chrono::Duration;
use orderflow_rs::generator::historical::create_provider;
use orderflow_rs::prelude::*;
use tempfile::NamedTempFile;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write csv");
    file.flush().expect("flush csv");
    file
}

fn numeric_datasource(path: &str) -> Datasource {
    Datasource {
        datasource_id: 1,
        name: "unit-csv".to_owned(),
        venue_id: "XSIM".to_owned(),
        connection: path.to_owned(),
        columns_mapping: vec![
            ColumnMapping::new("ReceivedTimeStamp", "1"),
            ColumnMapping::new("Instrument", "2"),
            ColumnMapping::new("BidParty", "3"),
            ColumnMapping::new("BidQuantity", "4"),
            ColumnMapping::new("BidPrice", "5"),
            ColumnMapping::new("AskPrice", "6"),
            ColumnMapping::new("AskQuantity", "7"),
            ColumnMapping::new("AskParty", "8"),
        ],
        ..Datasource::default()
    }
}

#[test]
fn headerless_numeric_mapping_produces_grouped_actions() {
    let file = write_csv(
        "2023-06-01 10:00:00.000100,TEST,B1,10,9.9,10.1,12,S1\n\
         2023-06-01 10:00:00.000100,TEST,B2,5,9.8,10.2,6,S2\n\
         2023-06-01 10:00:02.500000,TEST,B1,11,9.95,10.05,12,S1\n",
    );
    let datasource = numeric_datasource(&file.path().to_string_lossy());

    let mut provider = create_provider(&datasource).expect("provider built");
    assert!(!provider.is_empty());

    // The two co-timed rows group into one action.
    let first = provider.pull_action().expect("first action");
    assert_eq!(first.records().len(), 2);
    assert_eq!(first.records()[0].source_row(), 1);
    assert_eq!(first.records()[1].source_row(), 2);

    let record = &first.records()[0];
    assert_eq!(record.instrument(), "TEST");
    let level = &record.levels()[0];
    assert_eq!(level.bid_counterparty(), Some("B1"));
    assert_eq!(level.bid_quantity(), Some(10.0));
    assert_eq!(level.bid_price(), Some(9.9));
    assert_eq!(level.offer_price(), Some(10.1));
    assert_eq!(level.offer_counterparty(), Some("S1"));

    // The third row fires 2.5 seconds after the first group.
    let second = provider.pull_action().expect("second action");
    assert_eq!(second.records().len(), 1);
    assert_eq!(
        second.action_time() - first.action_time(),
        Duration::microseconds(2_500_000) - Duration::microseconds(100)
    );

    assert!(provider.is_empty());
}

#[test]
fn header_row_names_resolve_and_leading_rows_are_trimmed() {
    let file = write_csv(
        "# exported by the venue recorder\n\
         time,symbol,bpx,bqty\n\
         2023-06-01 10:00:00,TEST,9.9,10\n\
         2023-06-01 10:00:01,TEST,9.8,5\n",
    );
    let datasource = Datasource {
        text_header_row: Some(2),
        data_row: Some(3),
        columns_mapping: vec![
            ColumnMapping::new("ReceivedTimeStamp", "time"),
            ColumnMapping::new("Instrument", "symbol"),
            ColumnMapping::new("BidPrice", "bpx"),
            ColumnMapping::new("BidQuantity", "bqty"),
        ],
        ..numeric_datasource(&file.path().to_string_lossy())
    };

    let mut provider = create_provider(&datasource).expect("provider built");

    let first = provider.pull_action().expect("first action");
    // Row numbers are global file line numbers.
    assert_eq!(first.records()[0].source_row(), 3);
    assert_eq!(first.records()[0].levels()[0].bid_price(), Some(9.9));

    let second = provider.pull_action().expect("second action");
    assert_eq!(second.records()[0].source_row(), 4);
    assert!(provider.is_empty());
}

#[test]
fn variable_depth_mapping_expands_from_the_row_width() {
    let file = write_csv(
        "time,symbol,bpx1,bqty1,bpx2,bqty2\n\
         2023-06-01 10:00:00,TEST,9.9,10,9.8,20\n",
    );
    let datasource = Datasource {
        text_header_row: Some(1),
        columns_mapping: vec![
            ColumnMapping::new("ReceivedTimeStamp", "time"),
            ColumnMapping::new("Instrument", "symbol"),
            ColumnMapping::new("BidPrice#", "bpx#"),
            ColumnMapping::new("BidQuantity#", "bqty#"),
        ],
        ..numeric_datasource(&file.path().to_string_lossy())
    };

    let mut provider = create_provider(&datasource).expect("provider built");
    let action = provider.pull_action().expect("one action");
    let record = &action.records()[0];

    // (6 columns - 2 fixed) / 2 variable families = 2 depth levels.
    assert_eq!(record.levels().len(), 2);
    assert_eq!(record.levels()[0].bid_price(), Some(9.9));
    assert_eq!(record.levels()[1].bid_price(), Some(9.8));
    assert_eq!(record.levels()[1].bid_quantity(), Some(20.0));
}

#[test]
fn max_depth_levels_caps_the_parsed_ladder() {
    let file = write_csv(
        "time,symbol,bpx1,bqty1,bpx2,bqty2\n\
         2023-06-01 10:00:00,TEST,9.9,10,9.8,20\n",
    );
    let datasource = Datasource {
        text_header_row: Some(1),
        max_depth_levels: Some(1),
        columns_mapping: vec![
            ColumnMapping::new("ReceivedTimeStamp", "time"),
            ColumnMapping::new("Instrument", "symbol"),
            ColumnMapping::new("BidPrice#", "bpx#"),
            ColumnMapping::new("BidQuantity#", "bqty#"),
        ],
        ..numeric_datasource(&file.path().to_string_lossy())
    };

    let mut provider = create_provider(&datasource).expect("provider built");
    let action = provider.pull_action().expect("one action");
    assert_eq!(action.records()[0].levels().len(), 1);
}

#[test]
fn rows_with_unparsable_mandatory_attributes_are_dropped() {
    let file = write_csv(
        "not-a-timestamp,TEST,B1,10,9.9,10.1,12,S1\n\
         2023-06-01 10:00:00,TEST,B1,10,9.9,10.1,12,S1\n\
         2023-06-01 10:00:01,,B1,10,9.9,10.1,12,S1\n",
    );
    let datasource = numeric_datasource(&file.path().to_string_lossy());

    let mut provider = create_provider(&datasource).expect("provider built");

    // Only the middle row survives: the first has no parsable receive
    // time, the third no instrument.
    let action = provider.pull_action().expect("one action");
    assert_eq!(action.records().len(), 1);
    assert_eq!(action.records()[0].source_row(), 2);
    assert!(provider.is_empty());
}

#[test]
fn malformed_value_cells_leave_the_attribute_absent() {
    let file = write_csv("2023-06-01 10:00:00,TEST,B1,not-a-number,9.9,10.1,12,S1\n");
    let datasource = numeric_datasource(&file.path().to_string_lossy());

    let mut provider = create_provider(&datasource).expect("provider built");
    let action = provider.pull_action().expect("one action");
    let level = &action.records()[0].levels()[0];

    // Bid quantity failed to parse: price present, quantity absent (the
    // applier will later reject the level as unprocessable).
    assert_eq!(level.bid_price(), Some(9.9));
    assert_eq!(level.bid_quantity(), None);
    assert_eq!(level.offer_quantity(), Some(12.0));
}

#[test]
fn repeat_flag_selects_the_looping_provider() {
    let file = write_csv("2023-06-01 10:00:00,TEST,B1,10,9.9,10.1,12,S1\n");
    let datasource = Datasource {
        repeat: true,
        ..numeric_datasource(&file.path().to_string_lossy())
    };

    let mut provider = create_provider(&datasource).expect("provider built");
    provider.pull_action().expect("cycle 1");
    assert!(!provider.is_empty(), "a repeating provider never runs dry");
    provider.pull_action().expect("cycle 2");
}

#[test]
fn missing_file_fails_provider_construction() {
    let datasource = numeric_datasource("/nonexistent/depth.csv");
    assert!(create_provider(&datasource).is_err());
}
