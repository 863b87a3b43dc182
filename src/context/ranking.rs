//! Snippet ranking by Jaccard similarity
//!
//! Both strings are split into symbol sets on a fixed delimiter class; the
//! score is |intersection| / |union|. Case is preserved — `Foo` and `foo`
//! are different symbols.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    /// Whitespace plus the punctuation commonly separating code symbols.
    static ref SYMBOL_DELIMITERS: Regex =
        Regex::new(r"[\s.,/#!$%\^&\*;:{}=\-_`~()\[\]]+").expect("delimiter class is valid");
}

/// A candidate piece of context, not yet scored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub content: String,
    pub filepath: String,
}

impl CodeSnippet {
    pub fn new(content: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            filepath: filepath.into(),
        }
    }
}

/// A snippet with its relevance to the comparison window, in `[0, 1]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedSnippet {
    pub content: String,
    pub filepath: String,
    pub score: f64,
}

/// Symbol set of a snippet: split on the delimiter class, drop empties.
pub fn symbols_for_snippet(snippet: &str) -> HashSet<&str> {
    SYMBOL_DELIMITERS
        .split(snippet)
        .filter(|symbol| !symbol.is_empty())
        .collect()
}

/// Jaccard similarity of two strings' symbol sets.
///
/// 0 when the union is empty; 1 for identical non-empty sets; symmetric.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a_set = symbols_for_snippet(a);
    let b_set = symbols_for_snippet(b);

    let union = a_set.union(&b_set).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a_set.intersection(&b_set).count();
    intersection as f64 / union as f64
}

/// Score every snippet against the window around the cursor and sort by
/// score descending. The sort is stable: ties keep their original relative
/// order, so ranking is reproducible.
pub fn rank_snippets(snippets: &[CodeSnippet], window_around_cursor: &str) -> Vec<RankedSnippet> {
    let mut ranked: Vec<RankedSnippet> = snippets
        .iter()
        .map(|snippet| RankedSnippet {
            content: snippet.content.clone(),
            filepath: snippet.filepath.clone(),
            score: jaccard_similarity(&snippet.content, window_around_cursor),
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Keep only the best-scoring snippet per filepath, preserving the order in
/// which filepaths first appear.
pub fn deduplicate_snippets(snippets: Vec<RankedSnippet>) -> Vec<RankedSnippet> {
    let mut deduplicated: Vec<RankedSnippet> = Vec::new();
    for snippet in snippets {
        match deduplicated
            .iter_mut()
            .find(|kept| kept.filepath == snippet.filepath)
        {
            Some(kept) => {
                if snippet.score > kept.score {
                    *kept = snippet;
                }
            }
            None => deduplicated.push(snippet),
        }
    }
    deduplicated
}
