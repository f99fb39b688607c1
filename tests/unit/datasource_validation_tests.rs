//! Load-time validation rules of datasource column mappings.

use orderflow_rs::model::{ColumnMapping, Datasource, DatasourceError, DatasourceFormat};

fn csv_datasource(mappings: Vec<ColumnMapping>) -> Datasource {
    Datasource {
        datasource_id: 1,
        name: "validation".to_owned(),
        venue_id: "XSIM".to_owned(),
        connection: "depth.csv".to_owned(),
        format: DatasourceFormat::Csv,
        text_header_row: Some(1),
        columns_mapping: mappings,
        ..Datasource::default()
    }
}

#[test]
fn sharp_suffix_must_match_on_both_sides() {
    let only_from = csv_datasource(vec![ColumnMapping::new("BidPrice#", "bpx1")]);
    assert!(matches!(
        only_from.validate(),
        Err(DatasourceError::MismatchedVariableDepth { .. })
    ));

    let only_to = csv_datasource(vec![ColumnMapping::new("BidPrice", "bpx#")]);
    assert!(matches!(
        only_to.validate(),
        Err(DatasourceError::MismatchedVariableDepth { .. })
    ));

    let both = csv_datasource(vec![ColumnMapping::new("BidPrice#", "bpx#")]);
    assert!(both.validate().is_ok());
}

#[test]
fn headerless_csv_requires_numeric_references() {
    let named = Datasource {
        text_header_row: None,
        ..csv_datasource(vec![ColumnMapping::new("BidPrice", "bpx")])
    };
    assert!(matches!(
        named.validate(),
        Err(DatasourceError::NonNumericColumnTo { .. })
    ));

    let numeric = Datasource {
        text_header_row: Some(0),
        ..csv_datasource(vec![ColumnMapping::new("BidPrice", "3")])
    };
    assert!(numeric.validate().is_ok());

    // Database sources may reference result columns by name without a
    // header row concept.
    let database = Datasource {
        format: DatasourceFormat::Postgres,
        text_header_row: None,
        table_name: Some("depth".to_owned()),
        ..csv_datasource(vec![ColumnMapping::new("BidPrice", "bpx")])
    };
    assert!(database.validate().is_ok());
}

#[test]
fn unknown_semantic_names_are_rejected() {
    let datasource = csv_datasource(vec![ColumnMapping::new("BidVolume", "3")]);
    assert!(matches!(
        datasource.validate(),
        Err(DatasourceError::UnknownColumnFrom { .. })
    ));
}

#[test]
fn depth_ladders_must_start_at_one() {
    let datasource = csv_datasource(vec![
        ColumnMapping::new("BidPrice2", "b2"),
        ColumnMapping::new("BidPrice3", "b3"),
    ]);
    assert!(matches!(
        datasource.validate(),
        Err(DatasourceError::DepthLadderStart { depth: 2, .. })
    ));
}

#[test]
fn depth_ladders_must_be_gap_free() {
    let datasource = csv_datasource(vec![
        ColumnMapping::new("AskQuantity", "a1"),
        ColumnMapping::new("AskQuantity3", "a3"),
    ]);
    assert!(matches!(
        datasource.validate(),
        Err(DatasourceError::DepthLadderGap {
            previous: 1,
            next: 3,
            ..
        })
    ));
}

#[test]
fn depth_ladders_must_reach_the_configured_ceiling() {
    let datasource = Datasource {
        max_depth_levels: Some(3),
        ..csv_datasource(vec![
            ColumnMapping::new("BidPrice", "b1"),
            ColumnMapping::new("BidPrice2", "b2"),
        ])
    };
    assert!(matches!(
        datasource.validate(),
        Err(DatasourceError::DepthLadderTooShallow {
            deepest: 2,
            configured: 3,
            ..
        })
    ));

    let deep_enough = Datasource {
        max_depth_levels: Some(2),
        ..csv_datasource(vec![
            ColumnMapping::new("BidPrice", "b1"),
            ColumnMapping::new("BidPrice2", "b2"),
        ])
    };
    assert!(deep_enough.validate().is_ok());
}

#[test]
fn complete_gap_free_ladder_passes() {
    let datasource = csv_datasource(vec![
        ColumnMapping::new("ReceivedTimeStamp", "time"),
        ColumnMapping::new("MessageTimeStamp", "mtime"),
        ColumnMapping::new("Instrument", "symbol"),
        ColumnMapping::new("BidParty", "bp1"),
        ColumnMapping::new("BidQuantity", "bq1"),
        ColumnMapping::new("BidPrice", "bpx1"),
        ColumnMapping::new("AskPrice", "apx1"),
        ColumnMapping::new("AskQuantity", "aq1"),
        ColumnMapping::new("AskParty", "ap1"),
        ColumnMapping::new("BidPrice2", "bpx2"),
        ColumnMapping::new("AskPrice2", "apx2"),
        ColumnMapping::new("BidQuantity2", "bq2"),
        ColumnMapping::new("AskQuantity2", "aq2"),
    ]);
    assert!(datasource.validate().is_ok());
}
