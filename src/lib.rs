//! Local-first sales pipeline copilot.
//!
//! A SQLite-backed prospect store plus a deterministic rule engine that
//! classifies reply sentiment, explains conversations, scores engagement,
//! recommends next actions, and drafts follow-up messages. No network, no
//! external model: every recommendation is reproducible from stored state.

pub mod db;
pub mod engine;
pub mod error;
pub mod seed;
pub mod types;
pub mod util;

pub use db::ProspectDb;
pub use error::StoreError;
