//! Candidate extraction from fetched documents.
//!
//! Strategies are tried in order; the first one that yields at least one
//! valid record is used for the whole document:
//! 1. [`StructuredTable`]: columns located by header keywords
//! 2. [`PositionalColumns`]: columns at fixed, configured positions
//! 3. [`FreeTextRegex`]: address-like substrings anywhere in the text

mod document;
mod positional;
mod table;
mod text;

pub use document::{CellGrid, Document};
pub use positional::{PositionalColumns, PositionalLayout};
pub use table::{ColumnMap, StructuredTable};
pub use text::FreeTextRegex;

use crate::error_handling::{HarvestError, InvalidRecord};
use crate::models::{CandidateRecord, RawCandidate};
use crate::validate::Normalizer;

/// Lazily produced candidates borrowed from a document.
pub type Candidates<'a> = Box<dyn Iterator<Item = RawCandidate> + 'a>;

/// Limits an iterator to `max_rows` items; 0 means unlimited.
pub(crate) fn cap_rows<'a, T: 'a>(
    iter: impl Iterator<Item = T> + 'a,
    max_rows: usize,
) -> Box<dyn Iterator<Item = T> + 'a> {
    if max_rows == 0 {
        Box::new(iter)
    } else {
        Box::new(iter.take(max_rows))
    }
}

/// One way of turning a document into raw candidates.
pub trait ExtractionStrategy {
    fn name(&self) -> &'static str;

    /// Returns an empty iterator when the document does not fit the strategy.
    fn extract<'a>(&'a self, document: &'a Document) -> Candidates<'a>;
}

/// Validated candidates from the strategy used for a document.
#[derive(Debug, Default)]
pub struct Extraction {
    pub strategy: &'static str,
    /// Raw candidates the strategy produced
    pub seen: usize,
    pub records: Vec<CandidateRecord>,
    pub rejected: Vec<InvalidRecord>,
}

impl Extraction {
    fn run(strategy: &dyn ExtractionStrategy, document: &Document, normalizer: &Normalizer) -> Self {
        let mut extraction = Extraction {
            strategy: strategy.name(),
            ..Default::default()
        };
        for raw in strategy.extract(document) {
            extraction.seen += 1;
            match normalizer.normalize(&raw) {
                Ok(record) => extraction.records.push(record),
                Err(invalid) => extraction.rejected.push(invalid),
            }
        }
        extraction
    }
}

/// Ordered chain of extraction strategies.
pub struct Extractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Extractor {
    /// Default chain: structured table, positional columns, free text.
    pub fn new(layout: PositionalLayout, max_rows: usize) -> Self {
        Self::with_strategies(vec![
            Box::new(StructuredTable { max_rows }),
            Box::new(PositionalColumns { layout, max_rows }),
            Box::new(FreeTextRegex { max_rows }),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Picks the first strategy whose candidates validate.
    ///
    /// When strategies produce candidates but none of them validate, the
    /// first such attempt is returned (with no records) so its rejects can
    /// be counted.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::StructureNotFound`] when no strategy produces
    /// a single candidate.
    pub fn extract(
        &self,
        document: &Document,
        normalizer: &Normalizer,
    ) -> Result<Extraction, HarvestError> {
        let mut first_attempt: Option<Extraction> = None;

        for strategy in &self.strategies {
            let extraction = Extraction::run(strategy.as_ref(), document, normalizer);
            if !extraction.records.is_empty() {
                log::debug!(
                    "Extracting {} with strategy {}",
                    document.source,
                    strategy.name()
                );
                return Ok(extraction);
            }
            if extraction.seen > 0 {
                log::debug!(
                    "Strategy {} found {} candidates in {}, none valid",
                    strategy.name(),
                    extraction.seen,
                    document.source
                );
                first_attempt.get_or_insert(extraction);
            } else {
                log::debug!(
                    "Strategy {} found nothing in {}",
                    strategy.name(),
                    document.source
                );
            }
        }

        first_attempt.ok_or_else(|| HarvestError::StructureNotFound {
            url: document.source.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::DropReason;
    use crate::models::SourceKind;

    fn normalizer() -> Normalizer {
        Normalizer::new("Unknown", None)
    }

    fn layout() -> PositionalLayout {
        PositionalLayout {
            label: 0,
            address: 1,
            region: Some(4),
            port: None,
            latency: None,
            min_columns: 2,
        }
    }

    #[test]
    fn test_structured_table_preferred() {
        let page = "<table><tr><th>Colo</th><th>IP</th></tr><tr><td>SEA</td><td>1.1.1.1</td></tr></table>";
        let doc = Document::parse("mem", SourceKind::Html, page.to_string());
        let extractor = Extractor::new(layout(), 0);
        let extraction = extractor.extract(&doc, &normalizer()).unwrap();
        assert_eq!(extraction.strategy, "structured-table");
        assert_eq!(extraction.records[0].region_hint, "SEA");
    }

    #[test]
    fn test_falls_back_to_positional() {
        let page = "<table><tr><td>电信</td><td>1.1.1.1</td></tr><tr><td>联通</td><td>1.0.0.1</td></tr></table>";
        let doc = Document::parse("mem", SourceKind::Html, page.to_string());
        let extractor = Extractor::new(layout(), 0);
        let extraction = extractor.extract(&doc, &normalizer()).unwrap();
        assert_eq!(extraction.strategy, "positional-columns");
        assert_eq!(extraction.records.len(), 2);
    }

    #[test]
    fn test_falls_back_to_free_text() {
        let page = "<html><body><pre>104.16.1.1\n104.16.1.2:8443</pre></body></html>";
        let doc = Document::parse("mem", SourceKind::Html, page.to_string());
        let extractor = Extractor::new(layout(), 0);
        let extraction = extractor.extract(&doc, &normalizer()).unwrap();
        assert_eq!(extraction.strategy, "free-text-regex");
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.records[1].port, 8443);
    }

    #[test]
    fn test_structure_not_found() {
        let doc = Document::parse("mem", SourceKind::Text, "maintenance".to_string());
        let extractor = Extractor::new(layout(), 0);
        let err = extractor.extract(&doc, &normalizer()).err().unwrap();
        assert!(matches!(err, HarvestError::StructureNotFound { .. }));
    }

    #[test]
    fn test_headerless_ip_port_feed_falls_through_to_free_text() {
        // positional reads the port column as the address, so nothing validates
        let doc = Document::parse("mem", SourceKind::Csv, "1.1.1.1,443\n1.0.0.1,2053\n".to_string());
        let extraction = Extractor::new(layout(), 0)
            .extract(&doc, &normalizer())
            .unwrap();
        assert_eq!(extraction.strategy, "free-text-regex");
        let addresses: Vec<&str> = extraction.records.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["1.1.1.1", "1.0.0.1"]);
        assert!(extraction.rejected.is_empty());
    }

    #[test]
    fn test_no_valid_candidates_reports_first_attempt() {
        let page = "<table><tr><td>电信</td><td>999.1.1.1</td></tr><tr><td>联通</td><td>1.2.3</td></tr></table>";
        let doc = Document::parse("mem", SourceKind::Html, page.to_string());
        let extraction = Extractor::new(layout(), 0)
            .extract(&doc, &normalizer())
            .unwrap();
        assert_eq!(extraction.strategy, "positional-columns");
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.seen, 2);
        assert!(extraction
            .rejected
            .iter()
            .all(|r| r.reason == DropReason::InvalidAddress));
    }

    #[test]
    fn test_strategy_order() {
        let extractor = Extractor::new(layout(), 0);
        assert_eq!(
            extractor.strategy_names(),
            vec!["structured-table", "positional-columns", "free-text-regex"]
        );
    }
}
