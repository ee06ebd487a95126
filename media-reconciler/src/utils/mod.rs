//! Shared utilities: retry policy and request pacing

pub mod pacing;
pub mod retry;

pub use pacing::Pacer;
pub use retry::with_retry;
