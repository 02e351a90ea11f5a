//! Integration tests for sidekick
//!
//! These tests drive the `Sidekick` context object end to end: monitoring a
//! growing log, detecting prompts, learning from tracked answers, and
//! maintaining on-disk history.

pub mod config_env;
pub mod helpers;
pub mod scenarios;
pub mod workflow;
