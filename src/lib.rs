//! trendlens: terminal dashboard for trending search terms.
//!
//! The library holds the dashboard logic (catalog loading, range parsing,
//! the uptrends query runner, sorting, the series chart and the modal) as
//! headless state driven by [`app::Event`]s. The binary adds a clap CLI
//! and an interactive shell on top.

pub mod app;
pub mod chart;
pub mod cli;
pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod filters;
pub mod logging;
pub mod modal;
pub mod model;
pub mod range;
pub mod shell;
pub mod sort;
pub mod storage;
pub mod table;
pub mod ui;
pub mod weeks;
