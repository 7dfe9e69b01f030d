//! Fixed column-position extraction for tables without usable headers.

use super::document::Document;
use super::{cap_rows, Candidates, ExtractionStrategy};
use crate::models::RawCandidate;

/// Column indices used when a table's header cannot be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalLayout {
    pub label: usize,
    pub address: usize,
    pub region: Option<usize>,
    pub port: Option<usize>,
    pub latency: Option<usize>,
    /// Rows with fewer cells are skipped
    pub min_columns: usize,
}

impl PositionalLayout {
    fn row_to_candidate(&self, row: &[String]) -> Option<RawCandidate> {
        if row.len() < self.min_columns || row.len() <= self.address {
            return None;
        }
        let cell = |index: Option<usize>| index.and_then(|i| row.get(i)).cloned();

        Some(RawCandidate {
            label: cell(Some(self.label)).unwrap_or_default(),
            address_text: row[self.address].clone(),
            port_text: cell(self.port),
            region_text: cell(self.region).unwrap_or_default(),
            latency_text: cell(self.latency),
        })
    }
}

/// Reads every data row at fixed column positions.
#[derive(Debug, Clone)]
pub struct PositionalColumns {
    pub layout: PositionalLayout,
    pub max_rows: usize,
}

impl ExtractionStrategy for PositionalColumns {
    fn name(&self) -> &'static str {
        "positional-columns"
    }

    fn extract<'a>(&'a self, document: &'a Document) -> Candidates<'a> {
        let Some(grid) = document.grid.as_ref() else {
            return Box::new(std::iter::empty());
        };
        let layout = self.layout;
        // the cap counts rows considered, short ones included
        Box::new(
            cap_rows(grid.rows.iter(), self.max_rows)
                .filter_map(move |row| layout.row_to_candidate(row)),
        )
    }
}
