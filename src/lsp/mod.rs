//! LSP Protocol Implementation
//!
//! Document tracking and editor events over tower-lsp, plus the custom
//! `wordCount/*` extension methods.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use backend::Backend;
