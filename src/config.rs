//! Parameters of one batch similarity run

use serde::{Deserialize, Serialize};

use crate::vectorizer::vocabulary::{SortOrder, TieBreak};

/// Vocabulary size used when none is given
pub const DEFAULT_K: usize = 1000;
/// Cosine similarity cutoff; only strictly greater scores are reported
pub const DEFAULT_THRESHOLD: f64 = 0.5;
/// Document frequency floor for a term to receive an idf value
pub const DEFAULT_MIN_DF: u64 = 10;

/// Analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Vocabulary size (top-K terms by idf)
    pub k: usize,

    /// Similarity cutoff
    pub threshold: f64,

    /// df floor for idf inclusion
    pub min_df: u64,

    /// Which document is used as the query
    pub query_index: usize,

    /// idf sort direction for vocabulary selection
    pub order: SortOrder,

    /// How equal idf values are ordered
    pub tie_break: TieBreak,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self {
            k: DEFAULT_K,
            threshold: DEFAULT_THRESHOLD,
            min_df: DEFAULT_MIN_DF,
            query_index: 0,
            order: SortOrder::Descending,
            tie_break: TieBreak::Insertion,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}
