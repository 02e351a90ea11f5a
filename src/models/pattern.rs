use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Counters for one response to one prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStats {
    pub count: u64,
    pub success_count: u64,
}

impl ResponseStats {
    /// Fraction of uses that succeeded, 0.0 when never used.
    pub fn success_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.success_count as f64 / self.count as f64
        }
    }

    pub fn record(&mut self, success: bool) {
        self.count += 1;
        if success {
            self.success_count += 1;
        }
    }
}

/// Aggregated response history for one normalized prompt.
///
/// Invariant: the sum of `responses[*].count` equals `total_occurrences`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub pattern_id: String,
    /// Raw text of the first observation
    pub prompt_text: String,
    pub responses: BTreeMap<String, ResponseStats>,
    pub total_occurrences: u64,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Pattern {
    pub fn new(prompt_text: &str) -> Self {
        let now = Utc::now();
        Self {
            pattern_id: pattern_id(prompt_text),
            prompt_text: prompt_text.to_string(),
            responses: BTreeMap::new(),
            total_occurrences: 0,
            last_seen: now,
            created_at: now,
        }
    }

    /// Count one observed response.
    pub fn record(&mut self, response: &str, success: bool) {
        self.responses
            .entry(response.to_string())
            .or_default()
            .record(success);
        self.total_occurrences += 1;
        self.last_seen = Utc::now();

        debug_assert!(self.is_consistent());
    }

    /// Response with the highest count. Ties go to the lexicographically
    /// smallest response text.
    pub fn most_common_response(&self) -> Option<(&str, &ResponseStats)> {
        // BTreeMap iterates in ascending key order, so keeping the first
        // maximum resolves ties toward the smaller text.
        let mut best: Option<(&str, &ResponseStats)> = None;
        for (text, stats) in &self.responses {
            match best {
                Some((_, current)) if current.count >= stats.count => {}
                _ => best = Some((text.as_str(), stats)),
            }
        }
        best
    }

    /// Responses ordered by count descending, then text ascending.
    pub fn ranked_responses(&self) -> Vec<(&str, &ResponseStats)> {
        let mut ranked: Vec<_> = self
            .responses
            .iter()
            .map(|(text, stats)| (text.as_str(), stats))
            .collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    pub fn is_consistent(&self) -> bool {
        self.responses.values().map(|r| r.count).sum::<u64>() == self.total_occurrences
    }
}

/// Identity of a prompt: first 16 hex chars of SHA-256 over the lowercased,
/// trimmed text. Inner whitespace is not normalized.
pub fn pattern_id(prompt_text: &str) -> String {
    let normalized = prompt_text.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..8])
}
