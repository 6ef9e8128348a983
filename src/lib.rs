//! Core entry point for the counter_ritual crate.
//!
//! A run loads (or creates) the YAML config, draws mock figures, renders the
//! Markdown report, attempts a PDF copy, keeps a backup of yesterday's report
//! and finally chimes and opens the result. See [`ritual::Ritual`].

pub mod backup;
pub mod builder;
pub mod config;
pub mod fonts;
pub mod mock;
pub mod model;
pub mod notify;
pub mod pdf;
pub mod report;
pub mod richtext;
pub mod ritual;

pub use config::{Config, ConfigSource};
pub use ritual::{Layout, Ritual, RitualError, RunSummary};
