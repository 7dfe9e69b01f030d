//! Fetched documents and the cell grids extracted from them.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::models::SourceKind;
use crate::utils::{normalize_cell, parse_selector_unsafe};

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("table", "TABLE_SELECTOR"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("tr", "ROW_SELECTOR"));
static HEADER_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("th", "HEADER_CELL_SELECTOR"));
static DATA_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("td", "DATA_CELL_SELECTOR"));

/// Rows of cell text taken from an HTML table or a delimited feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGrid {
    /// Explicit header cells (`<th>` row). Delimited feeds never set this;
    /// their first row is inspected by the structured strategy instead.
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl CellGrid {
    /// Builds a grid from the first table in the page that has data rows.
    pub fn from_html(html: &Html) -> Option<CellGrid> {
        html.select(&TABLE_SELECTOR)
            .map(grid_from_table)
            .find(|grid| !grid.rows.is_empty())
    }

    /// Builds a grid from delimited text, sniffing the delimiter from the first line.
    ///
    /// Ragged rows are kept as they are; unreadable records are skipped.
    pub fn from_delimited(body: &str) -> Option<CellGrid> {
        let body = body.trim_start_matches('\u{feff}');
        let delimiter = sniff_delimiter(body);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(body.as_bytes());

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            match record {
                Ok(record) => {
                    let cells: Vec<String> = record.iter().map(normalize_cell).collect();
                    if cells.iter().any(|c| !c.is_empty()) {
                        rows.push(cells);
                    }
                }
                Err(e) => log::debug!("Skipping unreadable record {}: {}", index, e),
            }
        }

        if rows.is_empty() {
            None
        } else {
            Some(CellGrid { header: None, rows })
        }
    }
}

fn grid_from_table(table: ElementRef<'_>) -> CellGrid {
    let mut header = None;
    let mut rows = Vec::new();

    for row in table.select(&ROW_SELECTOR) {
        let cells: Vec<String> = row.select(&DATA_CELL_SELECTOR).map(cell_text).collect();
        if cells.is_empty() {
            if header.is_none() {
                let header_cells: Vec<String> =
                    row.select(&HEADER_CELL_SELECTOR).map(cell_text).collect();
                if !header_cells.is_empty() {
                    header = Some(header_cells);
                }
            }
            continue;
        }
        rows.push(cells);
    }

    CellGrid { header, rows }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    normalize_cell(&cell.text().collect::<Vec<_>>().join(" "))
}

fn sniff_delimiter(body: &str) -> u8 {
    let first_line = body.lines().next().unwrap_or_default();
    [b',', b'\t', b';', b'|']
        .into_iter()
        .max_by_key(|d| first_line.bytes().filter(|b| b == d).count())
        .filter(|d| first_line.bytes().any(|b| b == *d))
        .unwrap_or(b',')
}

/// A fetched source, parsed once into everything the strategies need.
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the document came from (for logging)
    pub source: String,
    pub kind: SourceKind,
    /// Visible text (HTML) or the raw body
    pub text: String,
    /// Tabular view, if the document has one
    pub grid: Option<CellGrid>,
}

impl Document {
    /// Parses a fetched body according to the source kind.
    pub fn parse(source: impl Into<String>, kind: SourceKind, body: String) -> Self {
        let (text, grid) = match kind {
            SourceKind::Html | SourceKind::Rendered => {
                let html = Html::parse_document(&body);
                let grid = CellGrid::from_html(&html);
                let text = html.root_element().text().collect::<Vec<_>>().join(" ");
                (text, grid)
            }
            SourceKind::Csv => {
                let grid = CellGrid::from_delimited(&body);
                (body, grid)
            }
            SourceKind::Text => (body, None),
        };

        Document {
            source: source.into(),
            kind,
            text,
            grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table id="layout"><tr><th>nav</th></tr></table>
        <table>
          <thead><tr><th>线路</th><th>优选地址</th><th>延迟</th></tr></thead>
          <tbody>
            <tr><td>电信</td><td> 104.16.1.1 </td><td>80ms</td></tr>
            <tr><td>联通</td><td>104.16.1.2</td></tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn test_grid_from_html_picks_first_table_with_rows() {
        let html = Html::parse_document(PAGE);
        let grid = CellGrid::from_html(&html).unwrap();
        assert_eq!(
            grid.header,
            Some(vec!["线路".to_string(), "优选地址".to_string(), "延迟".to_string()])
        );
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.rows[0], vec!["电信", "104.16.1.1", "80ms"]);
        assert_eq!(grid.rows[1].len(), 2);
    }

    #[test]
    fn test_grid_from_html_without_table() {
        let html = Html::parse_document("<p>1.1.1.1</p>");
        assert!(CellGrid::from_html(&html).is_none());
    }

    #[test]
    fn test_grid_from_delimited_sniffs_delimiter() {
        let grid = CellGrid::from_delimited("IP\tPort\n1.1.1.1\t443\n\n1.0.0.1\n").unwrap();
        assert_eq!(grid.rows.len(), 3);
        assert_eq!(grid.rows[0], vec!["IP", "Port"]);
        assert_eq!(grid.rows[2], vec!["1.0.0.1"]);
    }

    #[test]
    fn test_grid_from_delimited_strips_bom() {
        let grid = CellGrid::from_delimited("\u{feff}IP地址,端口\n1.1.1.1,443\n").unwrap();
        assert_eq!(grid.rows[0][0], "IP地址");
    }

    #[test]
    fn test_document_parse_text_has_no_grid() {
        let doc = Document::parse("mem", SourceKind::Text, "1.1.1.1 2.2.2.2".into());
        assert!(doc.grid.is_none());
        assert_eq!(doc.text, "1.1.1.1 2.2.2.2");
    }

    #[test]
    fn test_document_parse_html_collects_text() {
        let doc = Document::parse("mem", SourceKind::Html, PAGE.to_string());
        assert!(doc.grid.is_some());
        assert!(doc.text.contains("104.16.1.2"));
    }
}
