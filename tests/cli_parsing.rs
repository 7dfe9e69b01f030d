//! Tests for command-line parsing into `Config`.

use clap::Parser;
use edge_harvest::config::DEFAULT_SOURCE_URL;
use edge_harvest::models::SourceKind;
use edge_harvest::{Config, LogFormat, LogLevel};
use std::path::PathBuf;

#[test]
fn test_cli_defaults() {
    let config = Config::try_parse_from(["edge_harvest"]).expect("Should parse without flags");

    assert_eq!(config.max_rows, 50);
    assert_eq!(config.max_output, 0);
    assert_eq!(config.min_yield, 1);
    assert_eq!(config.max_cycles, 3);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.log_format, LogFormat::Plain);
    assert!(!config.no_remote_geo);
    assert_eq!(config.remote_geo_interval_ms, 1400);
    assert!(config.preferred_regions.is_empty());

    let sources = config.source_specs();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].url, DEFAULT_SOURCE_URL);
    assert_eq!(sources[0].kind, SourceKind::Html);
}

#[test]
fn test_cli_sources_keep_kind_order() {
    let config = Config::try_parse_from([
        "edge_harvest",
        "--text-source",
        "https://example.com/a.txt",
        "--csv-source",
        "https://example.com/b.csv",
        "--source",
        "https://example.com/c.html",
        "--source",
        "https://example.com/d.html",
    ])
    .expect("Should parse source flags");

    let kinds: Vec<SourceKind> = config.source_specs().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SourceKind::Html,
            SourceKind::Html,
            SourceKind::Csv,
            SourceKind::Text
        ]
    );
}

#[test]
fn test_cli_region_lists_and_mappings() {
    let config = Config::try_parse_from([
        "edge_harvest",
        "--preferred-region",
        "US,JP",
        "--preferred-region",
        "SG",
        "--fallback-region",
        "DE",
        "--region-map",
        "HKG=HK",
        "--region-map",
        "xyz=fr",
        "--max-output",
        "8",
        "--max-latency-ms",
        "250.5",
    ])
    .expect("Should parse region flags");

    assert_eq!(config.preferred_regions, vec!["US", "JP", "SG"]);
    assert_eq!(config.fallback_regions, vec!["DE"]);
    assert_eq!(config.region_map.len(), 2);
    assert_eq!(config.region_map[0], ("HKG".to_string(), "HK".to_string()));
    assert_eq!(config.max_output, 8);
    assert_eq!(config.max_latency_ms, Some(250.5));
}

#[test]
fn test_cli_rejects_bad_region_mapping() {
    assert!(Config::try_parse_from(["edge_harvest", "--region-map", "HKG"]).is_err());
}

#[test]
fn test_cli_layout_flags() {
    let config = Config::try_parse_from([
        "edge_harvest",
        "--output",
        "out/edges.txt",
        "--min-columns",
        "6",
        "--address-column",
        "0",
        "--port-column",
        "1",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--no-remote-geo",
    ])
    .expect("Should parse layout flags");

    assert_eq!(config.output, PathBuf::from("out/edges.txt"));
    let layout = config.positional_layout();
    assert_eq!(layout.min_columns, 6);
    assert_eq!(layout.address, 0);
    assert_eq!(layout.port, Some(1));
    assert_eq!(layout.latency, None);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_format, LogFormat::Json);
    assert!(config.no_remote_geo);
}

#[test]
fn test_cli_rejects_unknown_log_level() {
    assert!(Config::try_parse_from(["edge_harvest", "--log-level", "verbose"]).is_err());
}
