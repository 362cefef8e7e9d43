//! covlab core: daily partition acquisition, dataset assembly, chart construction.
//!
//! This crate contains:
//! - The acquisition engine: walks a date range, fetches one CSV partition per
//!   day, skips days that are not published yet and concatenates the rest
//! - Fetch primitives (HTTP mirror, local directory) behind one trait
//! - Dataset persistence (CSV, Parquet) and reload
//! - Chart constructors driven by shared field lists and a palette
//! - A standalone HTML renderer for chart specs
//! - TOML-backed application configuration

pub mod chart;
pub mod config;
pub mod data;
