//! Two-tier priority ranking.
//!
//! | Tier | Input | Points |
//! |------|-------|--------|
//! | Type preference | `content_type` in the preferred set | 2, else 0 |
//! | Depth preference | `depth` = overview / supporting_detail | 2 / 1, else 0 |
//!
//! Both comparisons are case-insensitive. Rows are ordered by the sum,
//! highest first; equal sums keep their input order.

use kbscope_core::knowledge::KnowledgeRow;
use std::cmp::Reverse;
use std::collections::HashSet;

const TYPE_BONUS: u8 = 2;
const OVERVIEW_BONUS: u8 = 2;
const SUPPORTING_DETAIL_BONUS: u8 = 1;

/// Highest composite score a row can earn.
pub const MAX_SCORE: u8 = TYPE_BONUS + OVERVIEW_BONUS;

/// Content types preferred when no configuration says otherwise.
pub const DEFAULT_PREFERRED_TYPES: &[&str] = &["project_summary", "summary", "outcome", "method"];

/// Orders rows by content-type and depth preference.
#[derive(Debug, Clone)]
pub struct PriorityRanker {
    preferred_types: HashSet<String>,
}

impl PriorityRanker {
    pub fn new<I, S>(preferred_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            preferred_types: preferred_types
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Composite score of a single row, `0..=MAX_SCORE`.
    pub fn score(&self, row: &KnowledgeRow) -> u8 {
        let type_score = if self
            .preferred_types
            .contains(&row.content_type.to_lowercase())
        {
            TYPE_BONUS
        } else {
            0
        };

        let depth_score = match row.depth.as_deref().map(str::to_lowercase).as_deref() {
            Some("overview") => OVERVIEW_BONUS,
            Some("supporting_detail") => SUPPORTING_DETAIL_BONUS,
            _ => 0,
        };

        type_score + depth_score
    }

    /// Return a new ordering of `rows`, highest score first.
    pub fn rank<'a>(&self, rows: &[&'a KnowledgeRow]) -> Vec<&'a KnowledgeRow> {
        let mut ranked = rows.to_vec();
        // sort_by_cached_key is stable: ties stay in load order.
        ranked.sort_by_cached_key(|row| Reverse(self.score(row)));
        ranked
    }
}

impl Default for PriorityRanker {
    fn default() -> Self {
        Self::new(DEFAULT_PREFERRED_TYPES)
    }
}
