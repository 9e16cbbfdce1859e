//! Symptom catalog with fuzzy suggestion lookup.

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// A catalog entry matched against a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomMatch {
    /// Index into the catalog.
    pub index: usize,
    /// Match score (higher = better match). None for unfiltered results.
    pub score: Option<u32>,
    /// Byte indices of matched characters for highlighting.
    pub match_indices: Vec<usize>,
}

/// Ordered list of symptom names offered by the service.
///
/// Immutable once loaded; a reload replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomCatalog {
    names: Vec<String>,
}

impl SymptomCatalog {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Returns up to `limit` entries matching `query`, best first.
    ///
    /// An empty query returns entries in catalog order. Entries for which
    /// `skip` returns true are left out (e.g. already selected symptoms).
    pub fn suggest(
        &self,
        query: &str,
        limit: usize,
        skip: impl Fn(&str) -> bool,
    ) -> Vec<SymptomMatch> {
        let query = query.trim();
        if query.is_empty() {
            return self
                .names
                .iter()
                .enumerate()
                .filter(|(_, name)| !skip(name))
                .take(limit)
                .map(|(index, _)| SymptomMatch {
                    index,
                    score: None,
                    match_indices: Vec::new(),
                })
                .collect();
        }

        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);

        let mut matches: Vec<SymptomMatch> = self
            .names
            .iter()
            .enumerate()
            .filter(|(_, name)| !skip(name))
            .filter_map(|(index, name)| {
                let mut buf = Vec::new();
                let haystack = Utf32Str::new(name, &mut buf);

                pattern.score(haystack, &mut matcher).map(|score| {
                    let mut char_indices = Vec::new();
                    pattern.indices(haystack, &mut matcher, &mut char_indices);

                    SymptomMatch {
                        index,
                        score: Some(score),
                        match_indices: char_to_byte_indices(name, &char_indices),
                    }
                })
            })
            .collect();

        // Best score first; ties keep catalog order (stable sort)
        matches.sort_by_key(|m| std::cmp::Reverse(m.score.unwrap_or(0)));
        matches.truncate(limit);
        matches
    }
}

/// Converts character indices (as returned by nucleo) to byte indices.
fn char_to_byte_indices(text: &str, char_indices: &[u32]) -> Vec<usize> {
    let mut sorted: Vec<usize> = char_indices.iter().map(|&i| i as usize).collect();
    sorted.sort_unstable();
    sorted.dedup();

    text.char_indices()
        .enumerate()
        .filter(|(char_idx, _)| sorted.binary_search(char_idx).is_ok())
        .map(|(_, (byte_idx, _))| byte_idx)
        .collect()
}
