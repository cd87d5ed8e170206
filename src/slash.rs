//! Slash-command detection over the composer buffer.
//!
//! Offsets are character offsets into the buffer text, matching how the
//! input buffer tracks its cursor.

use std::ops::Range;

use crate::catalog::{Catalog, Tool};

pub const TRIGGER: char = '/';

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub tool: Tool,
    pub score: f64,
}

/// Ranking strategy applied to tools that survived the containment filter.
pub trait Scorer {
    fn score(&self, tool: &Tool, query: &str) -> f64;
}

/// Every surviving tool ranks equally, so catalog order decides.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformScorer;

impl Scorer for UniformScorer {
    fn score(&self, _tool: &Tool, _query: &str) -> f64 {
        1.0
    }
}

/// Name prefix beats name substring, which beats a category or description hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamePrefixScorer;

impl Scorer for NamePrefixScorer {
    fn score(&self, tool: &Tool, query: &str) -> f64 {
        let name = tool.name.to_lowercase();
        if name.starts_with(query) {
            3.0
        } else if name.contains(query) {
            2.0
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// No usable trigger before the cursor.
    NoTrigger,
    /// A trigger was found but nothing in the catalog matched its query.
    NoMatches { range: Range<usize> },
    Active {
        matches: Vec<Match>,
        range: Range<usize>,
    },
}

impl Detection {
    #[cfg(test)]
    pub fn matches(&self) -> &[Match] {
        match self {
            Detection::Active { matches, .. } => matches,
            _ => &[],
        }
    }

    #[cfg(test)]
    pub fn range(&self) -> Option<Range<usize>> {
        match self {
            Detection::NoTrigger => None,
            Detection::NoMatches { range } | Detection::Active { range, .. } => {
                Some(range.clone())
            }
        }
    }
}

pub fn detect(text: &str, cursor: usize, catalog: &Catalog, scorer: &dyn Scorer) -> Detection {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let before_cursor = &chars[..cursor];

    let Some(trigger_idx) = before_cursor.iter().rposition(|ch| *ch == TRIGGER) else {
        return Detection::NoTrigger;
    };
    if trigger_idx > 0 && !matches!(before_cursor[trigger_idx - 1], ' ' | '\n') {
        return Detection::NoTrigger;
    }

    let query = before_cursor[trigger_idx + 1..]
        .iter()
        .collect::<String>()
        .to_lowercase();
    let range = trigger_idx..cursor;
    let matches = rank(catalog.tools(), &query, scorer);
    if matches.is_empty() {
        Detection::NoMatches { range }
    } else {
        Detection::Active { matches, range }
    }
}

/// Unfiltered catalog in catalog order, used when the dropdown is opened explicitly.
pub fn all_matches(catalog: &Catalog, scorer: &dyn Scorer) -> Vec<Match> {
    rank(catalog.tools(), "", scorer)
}

fn rank(tools: &[Tool], query: &str, scorer: &dyn Scorer) -> Vec<Match> {
    let mut matches = tools
        .iter()
        .filter(|tool| tool.matches_query(query))
        .map(|tool| Match {
            tool: tool.clone(),
            score: scorer.score(tool, query),
        })
        .collect::<Vec<_>>();
    // sort_by is stable, so ties keep catalog order
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches
}

#[cfg(test)]
#[path = "../tests/unit/slash_tests.rs"]
mod tests;
