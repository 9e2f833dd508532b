pub mod api;
pub mod config;
pub mod decoded;
pub mod explain;
pub mod hiro;
pub mod models;
pub mod resolve;
pub mod units;

pub use explain::{explain, explain_at};
pub use models::{ExplainedTransaction, NormalizedEvent};
