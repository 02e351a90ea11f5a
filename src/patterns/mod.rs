//! Pattern learning: event tracking, aggregation and persistence.

mod query;
mod store;

pub use query::{MostCommonResponse, PatternList, PatternSummary, ResponseSummary, SortKey};
pub use store::{PatternStore, TrackResult};
