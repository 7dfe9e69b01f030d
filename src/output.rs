//! Output file writing.
//!
//! One record per line, `ADDRESS:PORT#LABEL-CC`. The destination is replaced
//! atomically so readers never see a partial file.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error_handling::HarvestError;
use crate::models::ResolvedRecord;

/// Formats one output line (without the newline).
pub fn format_line(record: &ResolvedRecord) -> String {
    format!(
        "{}:{}#{}-{}",
        record.record.address, record.record.port, record.record.label, record.country
    )
}

fn write_error(path: &Path, source: std::io::Error) -> HarvestError {
    HarvestError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `records` to `path`, replacing any previous file.
///
/// Content goes to a temporary file in the destination directory, is
/// flushed and synced, then renamed over `path`.
///
/// # Errors
///
/// [`HarvestError::NothingToWrite`] for an empty slice (the destination is
/// left untouched), [`HarvestError::Write`] for any I/O failure.
pub fn write_records(path: &Path, records: &[ResolvedRecord]) -> Result<usize, HarvestError> {
    if records.is_empty() {
        return Err(HarvestError::NothingToWrite);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| write_error(path, e))?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        for record in records {
            writeln!(writer, "{}", format_line(record)).map_err(|e| write_error(path, e))?;
        }
        writer.flush().map_err(|e| write_error(path, e))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|e| write_error(path, e))?;

    temp.persist(path).map_err(|e| write_error(path, e.error))?;
    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateRecord;

    fn resolved(address: &str, port: u16, label: &str, country: &str) -> ResolvedRecord {
        ResolvedRecord {
            record: CandidateRecord {
                address: address.to_string(),
                port,
                label: label.to_string(),
                region_hint: String::new(),
                latency_ms: None,
            },
            country: country.to_string(),
            resolved_by: None,
        }
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line(&resolved("104.16.1.1", 443, "电信", "US")),
            "104.16.1.1:443#电信-US"
        );
        assert_eq!(
            format_line(&resolved("2606:4700:0:0:0:0:6810:1", 2053, "Unknown", "UNKNOWN")),
            "2606:4700:0:0:0:0:6810:1:2053#Unknown-UNKNOWN"
        );
    }

    #[test]
    fn test_write_records_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ip.txt");
        std::fs::write(&path, "old content\n").unwrap();

        let records = vec![
            resolved("1.1.1.1", 443, "a", "US"),
            resolved("1.0.0.1", 8443, "b", "JP"),
        ];
        assert_eq!(write_records(&path, &records).unwrap(), 2);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "1.1.1.1:443#a-US\n1.0.0.1:8443#b-JP\n"
        );
        // only the destination is left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_nothing_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ip.txt");
        std::fs::write(&path, "keep me\n").unwrap();

        let err = write_records(&path, &[]).unwrap_err();
        assert!(matches!(err, HarvestError::NothingToWrite));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me\n");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("ip.txt");
        let err = write_records(&path, &[resolved("1.1.1.1", 443, "a", "US")]).unwrap_err();
        assert!(matches!(err, HarvestError::Write { .. }));
    }
}
