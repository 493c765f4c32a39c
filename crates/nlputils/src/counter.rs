//! Term-frequency counting over a corpus of token sequences.
//!
//! A corpus item is either a single token or a sequence of tokens. Exactly
//! one level of nesting is flattened and string items are always atomic.

use indexmap::IndexMap;

/// An item of a corpus: one atomic token or a flat sequence of tokens.
pub trait CorpusEntry {
    fn for_each_token<F: FnMut(&str)>(&self, f: F);
}

impl CorpusEntry for str {
    fn for_each_token<F: FnMut(&str)>(&self, mut f: F) {
        f(self)
    }
}

impl CorpusEntry for String {
    fn for_each_token<F: FnMut(&str)>(&self, mut f: F) {
        f(self)
    }
}

impl<S: AsRef<str>> CorpusEntry for [S] {
    fn for_each_token<F: FnMut(&str)>(&self, mut f: F) {
        for token in self {
            f(token.as_ref())
        }
    }
}

impl<S: AsRef<str>> CorpusEntry for Vec<S> {
    fn for_each_token<F: FnMut(&str)>(&self, f: F) {
        self.as_slice().for_each_token(f)
    }
}

impl<S: AsRef<str>, const N: usize> CorpusEntry for [S; N] {
    fn for_each_token<F: FnMut(&str)>(&self, f: F) {
        self.as_slice().for_each_token(f)
    }
}

impl<T: CorpusEntry + ?Sized> CorpusEntry for &T {
    fn for_each_token<F: FnMut(&str)>(&self, f: F) {
        (**self).for_each_token(f)
    }
}

/// A corpus item for corpora mixing bare tokens and token sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusItem {
    Token(String),
    Tokens(Vec<String>),
}

impl CorpusEntry for CorpusItem {
    fn for_each_token<F: FnMut(&str)>(&self, f: F) {
        match self {
            CorpusItem::Token(token) => token.for_each_token(f),
            CorpusItem::Tokens(tokens) => tokens.for_each_token(f),
        }
    }
}

/// Raw counts per distinct token, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequencies {
    counts: IndexMap<String, u64>,
    total: u64,
}

impl TermFrequencies {
    pub fn get(&self, token: &str) -> Option<u64> {
        self.counts.get(token).copied()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of token occurrences across the flattened corpus.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Iterate `(token, count)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(token, &count)| (token.as_str(), count))
    }

    /// `(token, count)` sorted by descending count. The sort is stable, so
    /// ties keep first-seen order.
    pub fn most_common(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// `(token, count / total)` in first-seen order. Values sum to 1.0 for a
    /// non-empty corpus.
    pub fn normalized(&self) -> Vec<(&str, f64)> {
        let total = self.total as f64;
        self.iter()
            .map(|(token, count)| (token, count as f64 / total))
            .collect()
    }

    fn add(&mut self, token: &str) {
        match self.counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(token.to_owned(), 1);
            }
        }
        self.total += 1;
    }
}

/// Count every token occurrence in `corpus`.
pub fn count<I>(corpus: I) -> TermFrequencies
where
    I: IntoIterator,
    I::Item: CorpusEntry,
{
    let mut freqs = TermFrequencies::default();
    for item in corpus {
        item.for_each_token(|token| freqs.add(token));
    }
    freqs
}
