//! FP&A Copilot
//!
//! Answers natural-language finance questions over a small in-memory ledger:
//! - Routes a question to one of a fixed set of analytical intents
//! - Computes the matching metric from actuals, budget, cash and FX tables
//! - Keeps "zero" and "undefined" apart in every result
//! - Renders a short text summary of the answer
//!
//! QUESTION → ROUTE → DISPATCH → SUMMARIZE

pub mod agent;
pub mod answer;
pub mod api;
pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod router;
pub mod tools;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use agent::{Answer, Copilot};
pub use router::{route, IntentRouter};
