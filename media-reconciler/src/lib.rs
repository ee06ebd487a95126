//! # Media Location Reconciliation & Migration Engine
//!
//! Reconciles where a subject's media object *should* live (its canonical
//! storage bucket, derived from the subject's affiliation) against where it
//! *actually* lives, and relocates it while keeping the record's pointer
//! field consistent.
//!
//! The engine is strictly sequential: all storage traffic is paced with
//! explicit cooldown delays to avoid exhausting client-side network
//! resources. See [`services::scheduler`] for the run loop.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use models::{Category, MigrationTask, Subject};
pub use services::{Report, RunMode, Scheduler};
