//! Typo-tolerant component name resolution.
//!
//! Maps a user-typed name onto a catalog of known names:
//! - An exact (case-sensitive) match always wins
//! - Otherwise every entry that contains the query, is contained by the query,
//!   or lies within [`MAX_EDIT_DISTANCE`] edits of it becomes a candidate
//! - Candidates keep catalog order; nothing is ranked by distance

use crate::catalog::CatalogEntry;

/// Largest Levenshtein distance at which an entry still counts as a typo of the query
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Outcome of resolving a query against a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<'a> {
    /// The query is exactly a catalog name
    Exact { entry: &'a CatalogEntry },
    /// Exactly one fuzzy candidate; the caller should say which name was substituted
    UniqueFuzzy { entry: &'a CatalogEntry },
    /// Several fuzzy candidates in catalog order (user selection needed)
    Ambiguous { candidates: Vec<&'a CatalogEntry> },
    /// Nothing close enough
    NoMatch,
}

impl<'a> MatchResult<'a> {
    /// The entry to use without further input, if there is one
    pub fn entry(&self) -> Option<&'a CatalogEntry> {
        match self {
            MatchResult::Exact { entry } | MatchResult::UniqueFuzzy { entry } => Some(entry),
            MatchResult::Ambiguous { .. } | MatchResult::NoMatch => None,
        }
    }

    /// Whether the caller must ask the user before proceeding
    pub fn needs_selection(&self) -> bool {
        matches!(self, MatchResult::Ambiguous { .. })
    }
}

/// Resolve `query` against `catalog`.
///
/// The query is used verbatim; trimming and case handling are up to the caller.
pub fn resolve<'a>(query: &str, catalog: &'a [CatalogEntry]) -> MatchResult<'a> {
    if let Some(entry) = catalog.iter().find(|e| e.name == query) {
        return MatchResult::Exact { entry };
    }

    let mut candidates: Vec<&'a CatalogEntry> = catalog
        .iter()
        .filter(|e| is_fuzzy_candidate(&e.name, query))
        .collect();

    match candidates.len() {
        0 => MatchResult::NoMatch,
        1 => MatchResult::UniqueFuzzy {
            entry: candidates.remove(0),
        },
        _ => MatchResult::Ambiguous { candidates },
    }
}

fn is_fuzzy_candidate(name: &str, query: &str) -> bool {
    name.contains(query) || query.contains(name) || levenshtein(name, query) <= MAX_EDIT_DISTANCE
}

/// Levenshtein edit distance over UTF-16 code units (unit-cost insert, delete, substitute).
///
/// A character outside the Basic Multilingual Plane is a surrogate pair and
/// counts as two units. No normalization or case folding is applied.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<u16> = a.encode_utf16().collect();
    let b: Vec<u16> = b.encode_utf16().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows of the DP matrix, indexed by position in `b`
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
