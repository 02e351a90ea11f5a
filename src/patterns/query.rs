use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::PatternStore;
use crate::error::{Result, SidekickError};
use crate::models::Pattern;
use crate::validation::{list_values, validate_min_occurrences};

/// Ordering for [`PatternStore::get_patterns_formatted`], always descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Occurrences,
    LastSeen,
    /// Success rate of each pattern's most common response
    SuccessRate,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[SortKey::Occurrences, SortKey::LastSeen, SortKey::SuccessRate]
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Occurrences => write!(f, "occurrences"),
            SortKey::LastSeen => write!(f, "last_seen"),
            SortKey::SuccessRate => write!(f, "success_rate"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = SidekickError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "occurrences" => Ok(SortKey::Occurrences),
            "last_seen" => Ok(SortKey::LastSeen),
            "success_rate" => Ok(SortKey::SuccessRate),
            _ => Err(SidekickError::invalid(format!(
                "Invalid sort_by: {s}. Must be one of: {}",
                list_values(SortKey::all())
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostCommonResponse {
    pub input_text: String,
    pub count: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub input_text: String,
    pub count: u64,
    pub success_count: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSummary {
    pub prompt_text: String,
    pub total_occurrences: u64,
    pub most_common_response: Option<MostCommonResponse>,
    /// Lexicographic by response text
    pub all_responses: Vec<ResponseSummary>,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternList {
    pub patterns: Vec<PatternSummary>,
    pub total_patterns: usize,
}

impl From<&Pattern> for PatternSummary {
    fn from(pattern: &Pattern) -> Self {
        Self {
            prompt_text: pattern.prompt_text.clone(),
            total_occurrences: pattern.total_occurrences,
            most_common_response: pattern.most_common_response().map(|(text, stats)| {
                MostCommonResponse {
                    input_text: text.to_string(),
                    count: stats.count,
                    success_rate: stats.success_rate(),
                }
            }),
            all_responses: pattern
                .responses
                .iter()
                .map(|(text, stats)| ResponseSummary {
                    input_text: text.clone(),
                    count: stats.count,
                    success_count: stats.success_count,
                    success_rate: stats.success_rate(),
                })
                .collect(),
            last_seen: pattern.last_seen,
        }
    }
}

fn top_success_rate(pattern: &Pattern) -> f64 {
    pattern
        .most_common_response()
        .map(|(_, stats)| stats.success_rate())
        .unwrap_or(0.0)
}

impl PatternStore {
    /// Filter, sort and project the learned patterns for display.
    ///
    /// `prompt_filter` is a case-insensitive substring match on prompt text.
    /// Sorting is stable, so equal keys keep `pattern_id` order.
    pub fn get_patterns_formatted(
        &self,
        prompt_filter: Option<&str>,
        min_occurrences: u64,
        sort_by: SortKey,
    ) -> Result<PatternList> {
        validate_min_occurrences(min_occurrences)?;

        let filter = prompt_filter
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        let mut selected: Vec<&Pattern> = self
            .patterns()
            .filter(|p| p.total_occurrences >= min_occurrences)
            .filter(|p| match &filter {
                Some(f) => p.prompt_text.to_lowercase().contains(f.as_str()),
                None => true,
            })
            .collect();

        match sort_by {
            SortKey::Occurrences => {
                selected.sort_by(|a, b| b.total_occurrences.cmp(&a.total_occurrences))
            }
            SortKey::LastSeen => selected.sort_by(|a, b| b.last_seen.cmp(&a.last_seen)),
            SortKey::SuccessRate => selected.sort_by(|a, b| {
                top_success_rate(b)
                    .partial_cmp(&top_success_rate(a))
                    .unwrap_or(Ordering::Equal)
            }),
        }

        let patterns: Vec<PatternSummary> =
            selected.into_iter().map(PatternSummary::from).collect();
        Ok(PatternList {
            total_patterns: patterns.len(),
            patterns,
        })
    }
}
