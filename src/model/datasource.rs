//! Historical datasource catalog entry and its load-time validation.
//!
//! A datasource row describes one CSV file or one database table holding
//! recorded depth snapshots, together with the mapping from semantic record
//! attributes to source columns. Validation happens once, when the catalog
//! is loaded; the generation core only ever sees datasources that passed.

use std::collections::BTreeSet;
use std::fmt;

/// Physical format of a historical datasource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasourceFormat {
    /// Delimiter-separated text file.
    Csv,
    /// PostgreSQL-compatible table, read with a single `SELECT *`.
    Postgres,
}

/// Semantic record attribute a source column maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnKind {
    /// Mandatory record receive timestamp.
    ReceivedTimestamp,
    /// Optional original message timestamp.
    MessageTimestamp,
    /// Instrument symbol.
    Instrument,
    /// Bid-side counterparty at a depth level.
    BidParty,
    /// Bid-side quantity at a depth level.
    BidQuantity,
    /// Bid-side price at a depth level.
    BidPrice,
    /// Offer-side counterparty at a depth level.
    OfferParty,
    /// Offer-side quantity at a depth level.
    OfferQuantity,
    /// Offer-side price at a depth level.
    OfferPrice,
}

impl ColumnKind {
    /// Whether columns of this kind carry a depth-level tag.
    pub fn has_depth(self) -> bool {
        !matches!(
            self,
            ColumnKind::ReceivedTimestamp | ColumnKind::MessageTimestamp | ColumnKind::Instrument
        )
    }

    /// Base attribute name used in column mappings.
    pub fn base_name(self) -> &'static str {
        match self {
            ColumnKind::ReceivedTimestamp => "ReceivedTimeStamp",
            ColumnKind::MessageTimestamp => "MessageTimeStamp",
            ColumnKind::Instrument => "Instrument",
            ColumnKind::BidParty => "BidParty",
            ColumnKind::BidQuantity => "BidQuantity",
            ColumnKind::BidPrice => "BidPrice",
            ColumnKind::OfferParty => "AskParty",
            ColumnKind::OfferQuantity => "AskQuantity",
            ColumnKind::OfferPrice => "AskPrice",
        }
    }

    const ALL: [ColumnKind; 9] = [
        ColumnKind::ReceivedTimestamp,
        ColumnKind::MessageTimestamp,
        ColumnKind::Instrument,
        ColumnKind::BidParty,
        ColumnKind::BidQuantity,
        ColumnKind::BidPrice,
        ColumnKind::OfferParty,
        ColumnKind::OfferQuantity,
        ColumnKind::OfferPrice,
    ];
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}

/// Depth tag of a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnDepth {
    /// Concrete depth level, 1-based. An un-suffixed depth column means
    /// level 1.
    Fixed(u32),
    /// `#`-suffixed family covering every level the source row width
    /// allows.
    Variable,
}

/// Parsed `column_from` value of a mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFrom {
    /// Semantic attribute.
    pub kind: ColumnKind,
    /// Depth tag; always `Fixed(1)` for depth-less kinds.
    pub depth: ColumnDepth,
}

impl ColumnFrom {
    /// Parses a semantic column name (`BidPrice`, `AskQuantity2`,
    /// `BidParty#`, `ReceivedTimeStamp`, ...).
    pub fn parse(name: &str) -> Result<Self, DatasourceError> {
        for kind in ColumnKind::ALL {
            let base = kind.base_name();
            let Some(suffix) = name.strip_prefix(base) else {
                continue;
            };

            if !kind.has_depth() {
                if suffix.is_empty() {
                    return Ok(Self {
                        kind,
                        depth: ColumnDepth::Fixed(1),
                    });
                }
                continue;
            }

            let depth = match suffix {
                "" => ColumnDepth::Fixed(1),
                "#" => ColumnDepth::Variable,
                digits => {
                    let level: u32 = digits.parse().map_err(|_| {
                        DatasourceError::UnknownColumnFrom {
                            name: name.to_owned(),
                        }
                    })?;
                    if level == 0 {
                        return Err(DatasourceError::DepthLadderStart {
                            column: kind,
                            depth: 0,
                        });
                    }
                    ColumnDepth::Fixed(level)
                }
            };

            return Ok(Self { kind, depth });
        }

        Err(DatasourceError::UnknownColumnFrom {
            name: name.to_owned(),
        })
    }
}

/// One `column_from` -> `column_to` mapping entry of a datasource.
///
/// `column_to` is either a 1-based numeric column index or a source column
/// name (header name for CSV, result column name for a database table);
/// `#`-suffixed names denote a variable-depth family on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Semantic attribute name, see [`ColumnFrom::parse`].
    pub column_from: String,
    /// Source column reference.
    pub column_to: String,
}

impl ColumnMapping {
    /// Convenience constructor.
    pub fn new(column_from: impl Into<String>, column_to: impl Into<String>) -> Self {
        Self {
            column_from: column_from.into(),
            column_to: column_to.into(),
        }
    }
}

/// One historical datasource row of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasource {
    /// Datasource identifier, unique within the catalog.
    pub datasource_id: u64,
    /// Human-readable datasource name (used in logs).
    pub name: String,
    /// Venue this datasource feeds.
    pub venue_id: String,
    /// File path (CSV) or connection string (database).
    pub connection: String,
    /// Physical format.
    pub format: DatasourceFormat,
    /// Loop over the recorded data forever instead of replaying it once.
    pub repeat: bool,
    /// Disabled datasources are ignored by the engine.
    pub enabled: bool,
    /// Cell delimiter for CSV sources.
    pub delimiter: char,
    /// 1-based line number of the CSV header row; `None` or `Some(0)`
    /// means the file has no header.
    pub text_header_row: Option<u64>,
    /// 1-based line number of the first data row.
    pub data_row: Option<u64>,
    /// Table to select from for database sources.
    pub table_name: Option<String>,
    /// Ceiling on parsed depth levels per side; `None` or zero means
    /// unlimited.
    pub max_depth_levels: Option<u32>,
    /// Column mapping entries.
    pub columns_mapping: Vec<ColumnMapping>,
}

impl Default for Datasource {
    fn default() -> Self {
        Self {
            datasource_id: 0,
            name: String::new(),
            venue_id: String::new(),
            connection: String::new(),
            format: DatasourceFormat::Csv,
            repeat: false,
            enabled: true,
            delimiter: ',',
            text_header_row: None,
            data_row: None,
            table_name: None,
            max_depth_levels: None,
            columns_mapping: Vec::new(),
        }
    }
}

impl Datasource {
    /// Whether the source declares a CSV header row.
    pub fn has_header_row(&self) -> bool {
        matches!(self.text_header_row, Some(row) if row > 0)
    }

    /// First data row, defaulting to the line after the header (or the
    /// first line of the file).
    pub fn first_data_row(&self) -> u64 {
        self.data_row
            .unwrap_or_else(|| self.text_header_row.unwrap_or(0) + 1)
    }

    /// Effective depth ceiling; zero is normalized to "unlimited".
    pub fn depth_ceiling(&self) -> Option<u32> {
        self.max_depth_levels.filter(|levels| *levels > 0)
    }

    /// Validates the column mapping against the load-time rules:
    ///
    /// 1. A `#` suffix on `column_from` or `column_to` requires the suffix
    ///    on both.
    /// 2. A CSV source without a header row can only map numeric column
    ///    indexes.
    /// 3. Explicitly mapped depth levels per column must form a gap-free
    ///    ladder `1..=k` with `k` at least the configured depth ceiling.
    pub fn validate(&self) -> Result<(), DatasourceError> {
        let mut depth_ladders: std::collections::BTreeMap<ColumnKind, BTreeSet<u32>> =
            std::collections::BTreeMap::new();
        let mut variable_columns: BTreeSet<ColumnKind> = BTreeSet::new();

        for mapping in &self.columns_mapping {
            let from_variable = mapping.column_from.ends_with('#');
            let to_variable = mapping.column_to.ends_with('#');
            if from_variable != to_variable {
                return Err(DatasourceError::MismatchedVariableDepth {
                    column_from: mapping.column_from.clone(),
                    column_to: mapping.column_to.clone(),
                });
            }

            if self.format == DatasourceFormat::Csv
                && !self.has_header_row()
                && !mapping.column_to.chars().all(|c| c.is_ascii_digit())
            {
                return Err(DatasourceError::NonNumericColumnTo {
                    column_to: mapping.column_to.clone(),
                });
            }

            let column_from = ColumnFrom::parse(&mapping.column_from)?;
            if column_from.kind.has_depth() {
                match column_from.depth {
                    ColumnDepth::Variable => {
                        variable_columns.insert(column_from.kind);
                    }
                    ColumnDepth::Fixed(level) => {
                        depth_ladders
                            .entry(column_from.kind)
                            .or_default()
                            .insert(level);
                    }
                }
            }
        }

        let ceiling = self.depth_ceiling().unwrap_or(0);
        for (column, ladder) in depth_ladders {
            if variable_columns.contains(&column) {
                continue;
            }

            let mut expected = 1u32;
            for depth in &ladder {
                if *depth != expected {
                    return if expected == 1 {
                        Err(DatasourceError::DepthLadderStart {
                            column,
                            depth: *depth,
                        })
                    } else {
                        Err(DatasourceError::DepthLadderGap {
                            column,
                            previous: expected - 1,
                            next: *depth,
                        })
                    };
                }
                expected += 1;
            }

            let deepest = expected - 1;
            if ceiling != 0 && deepest < ceiling {
                return Err(DatasourceError::DepthLadderTooShallow {
                    column,
                    deepest,
                    configured: ceiling,
                });
            }
        }

        Ok(())
    }
}

/// Validation failures of a datasource catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DatasourceError {
    /// Only one side of a mapping pair carries the `#` suffix.
    MismatchedVariableDepth {
        /// Offending semantic name.
        column_from: String,
        /// Offending source reference.
        column_to: String,
    },

    /// Headerless CSV sources require numeric column references.
    NonNumericColumnTo {
        /// Offending source reference.
        column_to: String,
    },

    /// The semantic column name is not recognized.
    UnknownColumnFrom {
        /// Offending name.
        name: String,
    },

    /// A depth ladder does not start at level 1.
    DepthLadderStart {
        /// Affected column.
        column: ColumnKind,
        /// First mapped depth level.
        depth: u32,
    },

    /// A depth ladder has a hole.
    DepthLadderGap {
        /// Affected column.
        column: ColumnKind,
        /// Deepest contiguous level.
        previous: u32,
        /// Next mapped level after the hole.
        next: u32,
    },

    /// The mapped ladder is shallower than the configured depth ceiling.
    DepthLadderTooShallow {
        /// Affected column.
        column: ColumnKind,
        /// Deepest mapped level.
        deepest: u32,
        /// Configured maximum depth levels.
        configured: u32,
    },
}

impl fmt::Display for DatasourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasourceError::MismatchedVariableDepth {
                column_from,
                column_to,
            } => write!(
                f,
                "column mapping `{column_from}' -> `{column_to}' has the `#' suffix on only one side"
            ),
            DatasourceError::NonNumericColumnTo { column_to } => write!(
                f,
                "column reference `{column_to}' must be numeric for a CSV source without a header row"
            ),
            DatasourceError::UnknownColumnFrom { name } => {
                write!(f, "unknown semantic column name `{name}'")
            }
            DatasourceError::DepthLadderStart { column, depth } => write!(
                f,
                "depth ladder for `{column}' starts at level {depth}, expected 1"
            ),
            DatasourceError::DepthLadderGap {
                column,
                previous,
                next,
            } => write!(
                f,
                "depth ladder for `{column}' has a gap between levels {previous} and {next}"
            ),
            DatasourceError::DepthLadderTooShallow {
                column,
                deepest,
                configured,
            } => write!(
                f,
                "depth ladder for `{column}' stops at level {deepest}, below the configured maximum of {configured}"
            ),
        }
    }
}

impl std::error::Error for DatasourceError {}
