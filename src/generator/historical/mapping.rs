//! Resolution of column mappings against a concrete source layout.

use std::collections::HashMap;

use crate::model::{ColumnDepth, ColumnFrom, ColumnKind, Datasource};

use super::error::HistoricalError;

/// Depth ladder derived from a source's row width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthConfig {
    /// Depth levels the source data can hold.
    pub datasource_depth: u32,
    /// Depth levels actually parsed (capped by the datasource
    /// configuration).
    pub depth_to_parse: u32,
}

/// Column mapping of one datasource, resolved to concrete cell indexes
/// once the source layout (column names and row width) is known.
#[derive(Debug, Clone)]
pub struct MappingParams {
    entries: Vec<(ColumnFrom, String)>,
    resolved: HashMap<(ColumnKind, u32), usize>,
}

impl MappingParams {
    /// Parses the mapping configuration of a datasource.
    pub fn from_datasource(datasource: &Datasource) -> Result<Self, HistoricalError> {
        let mut entries = Vec::with_capacity(datasource.columns_mapping.len());
        for mapping in &datasource.columns_mapping {
            let column_from = ColumnFrom::parse(&mapping.column_from)?;
            entries.push((column_from, mapping.column_to.clone()));
        }

        Ok(Self {
            entries,
            resolved: HashMap::new(),
        })
    }

    /// Derives the depth ladder from the source's row width.
    ///
    /// With variable-depth mappings present, the columns not claimed by
    /// depth-less mappings are divided evenly among the variable column
    /// families; otherwise the ladder is whatever the explicit mappings
    /// declare. The parsed depth is capped by the datasource's configured
    /// ceiling.
    pub fn depth_config(&self, total_columns: u32, depth_ceiling: Option<u32>) -> DepthConfig {
        let variable_count = self
            .entries
            .iter()
            .filter(|(from, _)| from.depth == ColumnDepth::Variable)
            .count() as u32;

        let datasource_depth = if variable_count > 0 {
            let fixed_count = self.entries.len() as u32 - variable_count;
            total_columns.saturating_sub(fixed_count) / variable_count
        } else {
            self.entries
                .iter()
                .filter(|(from, _)| from.kind.has_depth())
                .filter_map(|(from, _)| match from.depth {
                    ColumnDepth::Fixed(level) => Some(level),
                    ColumnDepth::Variable => None,
                })
                .max()
                .unwrap_or(0)
        };

        let depth_to_parse = match depth_ceiling {
            Some(ceiling) => datasource_depth.min(ceiling),
            None => datasource_depth,
        };

        DepthConfig {
            datasource_depth,
            depth_to_parse,
        }
    }

    /// Resolves every mapping entry to a cell index.
    ///
    /// `column_names` is the source header (or result-set column names);
    /// `None` for headerless sources, where only numeric references are
    /// legal. Variable-depth families expand up to the datasource depth,
    /// stopping at the first level whose column does not exist.
    pub fn resolve(
        &mut self,
        column_names: Option<&[String]>,
        depth_config: DepthConfig,
    ) -> Result<(), HistoricalError> {
        self.resolved.clear();

        for (column_from, column_to) in &self.entries {
            match column_from.depth {
                ColumnDepth::Fixed(level) => {
                    let index = resolve_reference(column_to, column_names)?;
                    self.resolved.insert((column_from.kind, level), index);
                }
                ColumnDepth::Variable => {
                    let base = column_to.trim_end_matches('#');
                    for level in 1..=depth_config.datasource_depth {
                        let reference = format!("{base}{level}");
                        match resolve_reference(&reference, column_names) {
                            Ok(index) => {
                                self.resolved.insert((column_from.kind, level), index);
                            }
                            Err(_) => break,
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Cell index of a semantic column at a depth level (1-based; pass 1
    /// for depth-less kinds).
    pub fn column_index(&self, kind: ColumnKind, depth: u32) -> Option<usize> {
        self.resolved.get(&(kind, depth)).copied()
    }
}

/// A numeric reference is a 1-based column index; anything else is looked
/// up in the source column names.
fn resolve_reference(
    reference: &str,
    column_names: Option<&[String]>,
) -> Result<usize, HistoricalError> {
    if !reference.is_empty() && reference.chars().all(|c| c.is_ascii_digit()) {
        let position: usize = reference
            .parse()
            .map_err(|_| HistoricalError::UnresolvedColumn {
                reference: reference.to_owned(),
            })?;
        if position == 0 {
            return Err(HistoricalError::UnresolvedColumn {
                reference: reference.to_owned(),
            });
        }
        return Ok(position - 1);
    }

    column_names
        .and_then(|names| names.iter().position(|name| name == reference))
        .ok_or_else(|| HistoricalError::UnresolvedColumn {
            reference: reference.to_owned(),
        })
}
