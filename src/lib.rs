//! Word Count Language Server
//!
//! A small Language Server Protocol implementation that reports word and
//! character counts for markdown documents to the editor's status bar.
//!
//! This library provides:
//! - Whitespace-normalized character and word counting
//! - Status label formatting
//! - An event-driven status controller
//! - LSP protocol implementation
//! - Configuration management with live reload

pub mod config;
pub mod controller;
pub mod lsp;
pub mod metrics;
pub mod status;
pub mod watch;

pub use config::Config;
pub use controller::{Controller, ControllerOptions, StatusUpdate};
pub use metrics::{character_count, word_count, Metrics, SelectionRange, TextMetrics};
pub use status::format_status;
