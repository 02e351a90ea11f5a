//! Prompt detection and input suggestion for monitored terminal sessions.
//!
//! The pipeline reads newly appended log bytes, looks for a prompt awaiting
//! input near the tail, classifies it, and ranks likely responses using both
//! static heuristics and statistics learned from previously observed answers.

pub mod commands;
pub mod config;
pub mod detector;
pub mod error;
pub mod fs;
pub mod inference;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod patterns;
pub mod security;
pub mod service;
pub mod validation;

pub use error::{Result, SidekickError};
pub use service::Sidekick;
