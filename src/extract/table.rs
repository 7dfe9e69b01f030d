//! Header-driven table extraction.
//!
//! Columns are located by matching header text against keyword lists, so
//! reordered or extra columns do not break extraction.

use super::document::{CellGrid, Document};
use super::{cap_rows, Candidates, ExtractionStrategy};
use crate::models::RawCandidate;
use crate::validate::{is_valid_address, split_address_port};

const ADDRESS_KEYWORDS: &[&str] = &["address", "地址", "host"];
const PORT_KEYWORDS: &[&str] = &["port", "端口"];
const LATENCY_KEYWORDS: &[&str] = &["latency", "delay", "ping", "rtt", "延迟", "延时"];
const REGION_KEYWORDS: &[&str] = &[
    "colo", "region", "location", "country", "datacenter", "地区", "数据中心", "机房", "国家",
];
const LABEL_KEYWORDS: &[&str] = &["line", "线路", "name", "isp", "运营商", "label", "carrier"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Address,
    Port,
    Latency,
    Region,
    Label,
}

fn classify(header: &str) -> Option<Field> {
    let h: String = header
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let any = |keywords: &[&str]| keywords.iter().any(|k| h.contains(k));

    // "ip", "ip地址", "ipv4", "ipaddress"; but not "description"
    if h.starts_with("ip") || any(ADDRESS_KEYWORDS) {
        Some(Field::Address)
    } else if any(PORT_KEYWORDS) {
        Some(Field::Port)
    } else if any(LATENCY_KEYWORDS) {
        Some(Field::Latency)
    } else if any(REGION_KEYWORDS) {
        Some(Field::Region)
    } else if any(LABEL_KEYWORDS) {
        Some(Field::Label)
    } else {
        None
    }
}

/// Column positions recovered from a header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub address: Option<usize>,
    pub port: Option<usize>,
    pub label: Option<usize>,
    pub region: Option<usize>,
    pub latency: Option<usize>,
}

impl ColumnMap {
    /// Maps header cells to fields; the first column matching a field wins.
    pub fn from_header(header: &[String]) -> ColumnMap {
        let mut map = ColumnMap::default();
        for (index, cell) in header.iter().enumerate() {
            let slot = match classify(cell) {
                Some(Field::Address) => &mut map.address,
                Some(Field::Port) => &mut map.port,
                Some(Field::Latency) => &mut map.latency,
                Some(Field::Region) => &mut map.region,
                Some(Field::Label) => &mut map.label,
                None => continue,
            };
            slot.get_or_insert(index);
        }
        map
    }

    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }

    fn row_to_candidate(&self, row: &[String]) -> Option<RawCandidate> {
        let address = row.get(self.address?)?;
        let cell = |index: Option<usize>| index.and_then(|i| row.get(i)).cloned();

        Some(RawCandidate {
            label: cell(self.label).unwrap_or_default(),
            address_text: address.clone(),
            port_text: cell(self.port),
            region_text: cell(self.region).unwrap_or_default(),
            latency_text: cell(self.latency),
        })
    }
}

/// Finds the header of a grid and the rows that follow it.
///
/// An explicit `<th>` header is used as is. Otherwise the first row counts
/// as a header when it maps an address column and holds no address itself.
fn locate_header(grid: &CellGrid) -> Option<(ColumnMap, &[Vec<String>])> {
    if let Some(header) = &grid.header {
        let map = ColumnMap::from_header(header);
        return map.has_address().then_some((map, grid.rows.as_slice()));
    }

    let (first, rest) = grid.rows.split_first()?;
    let holds_address = first
        .iter()
        .any(|cell| is_valid_address(split_address_port(cell).0));
    if holds_address {
        return None;
    }
    let map = ColumnMap::from_header(first);
    map.has_address().then_some((map, rest))
}

/// Extracts rows by interpreting the table's header.
#[derive(Debug, Clone)]
pub struct StructuredTable {
    pub max_rows: usize,
}

impl ExtractionStrategy for StructuredTable {
    fn name(&self) -> &'static str {
        "structured-table"
    }

    fn extract<'a>(&'a self, document: &'a Document) -> Candidates<'a> {
        let Some((map, rows)) = document.grid.as_ref().and_then(locate_header) else {
            return Box::new(std::iter::empty());
        };
        Box::new(
            cap_rows(rows.iter(), self.max_rows).filter_map(move |row| map.row_to_candidate(row)),
        )
    }
}
