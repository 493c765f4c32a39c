//! Vocabulary construction from a segmented corpus.
//!
//! The produced vocabulary is the special tokens in canonical order
//! followed by corpus tokens ranked by descending frequency (ties keep
//! first-seen order). Which corpus tokens survive is decided by a
//! [`SelectionPolicy`].

use crate::artifacts::{read_vocab_file, write_vocab_file};
use crate::counter::{count, CorpusEntry, TermFrequencies};
use crate::errors::{invalid, Result};
use crate::special::SpecialTokens;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Keep tokens whose raw count is strictly greater than the threshold.
    /// `None` keeps every token.
    MinCount(Option<u64>),
    /// Keep the most frequent tokens until their cumulative normalized
    /// frequency first reaches the threshold, in `(0.0, 1.0]`.
    Coverage(f64),
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::MinCount(None)
    }
}

impl SelectionPolicy {
    pub fn validate(&self) -> Result<()> {
        match *self {
            SelectionPolicy::Coverage(c) if !(c > 0.0 && c <= 1.0) => Err(invalid(format!(
                "coverage must be in (0.0, 1.0], got {c}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Where `VocabBuilder::load` takes its tokens from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabSource {
    Tokens(Vec<String>),
    File(PathBuf),
}

impl VocabSource {
    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        VocabSource::Tokens(tokens.into_iter().map(Into::into).collect())
    }

    pub(crate) fn into_tokens(self) -> Result<Vec<String>> {
        match self {
            VocabSource::Tokens(tokens) => Ok(tokens),
            VocabSource::File(path) => {
                let tokens = read_vocab_file(&path)?;
                log::info!("loaded vocabulary from {}", path.display());
                Ok(tokens)
            }
        }
    }
}

impl From<Vec<String>> for VocabSource {
    fn from(tokens: Vec<String>) -> Self {
        VocabSource::Tokens(tokens)
    }
}

impl From<PathBuf> for VocabSource {
    fn from(path: PathBuf) -> Self {
        VocabSource::File(path)
    }
}

impl From<&Path> for VocabSource {
    fn from(path: &Path) -> Self {
        VocabSource::File(path.to_path_buf())
    }
}

#[derive(Debug, Clone)]
pub struct VocabBuilder {
    policy: SelectionPolicy,
    special_tokens: SpecialTokens,
    token_frequencies: TermFrequencies,
    vocab: Vec<String>,
}

impl VocabBuilder {
    pub fn new(policy: SelectionPolicy) -> Result<Self> {
        Self::with_special_tokens(policy, SpecialTokens::default())
    }

    pub fn with_special_tokens(policy: SelectionPolicy, special_tokens: SpecialTokens) -> Result<Self> {
        policy.validate()?;
        let vocab = special_prefix(&special_tokens);
        Ok(Self {
            policy,
            special_tokens,
            token_frequencies: TermFrequencies::default(),
            vocab,
        })
    }

    pub fn min_count(threshold: Option<u64>) -> Result<Self> {
        Self::new(SelectionPolicy::MinCount(threshold))
    }

    pub fn coverage(coverage: f64) -> Result<Self> {
        Self::new(SelectionPolicy::Coverage(coverage))
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Count `corpus` and rebuild the vocabulary from scratch.
    pub fn generate<I>(&mut self, corpus: I) -> &[String]
    where
        I: IntoIterator,
        I::Item: CorpusEntry,
    {
        self.token_frequencies = count(corpus);
        let ranked = self.token_frequencies.most_common();
        let selected = match self.policy {
            SelectionPolicy::MinCount(threshold) => select_min_count(&ranked, threshold),
            SelectionPolicy::Coverage(coverage) => {
                select_coverage(&ranked, self.token_frequencies.total(), coverage)
            }
        };

        let mut vocab = special_prefix(&self.special_tokens);
        let mut seen: HashSet<String> = vocab.iter().cloned().collect();
        for token in selected {
            if seen.insert(token.to_owned()) {
                vocab.push(token.to_owned());
            } else {
                log::debug!("skipping corpus token '{token}' that collides with a special token");
            }
        }

        log::info!(
            "generated vocabulary of {} tokens ({} distinct corpus tokens, {} occurrences)",
            vocab.len(),
            self.token_frequencies.len(),
            self.token_frequencies.total()
        );
        self.vocab = vocab;
        &self.vocab
    }

    /// Replace the vocabulary with `source` verbatim, skipping counting.
    /// On failure the current vocabulary is kept.
    pub fn load(&mut self, source: impl Into<VocabSource>) -> Result<&[String]> {
        let tokens = source.into().into_tokens()?;
        self.token_frequencies = TermFrequencies::default();
        self.vocab = tokens;
        Ok(&self.vocab)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_vocab_file(path, &self.vocab)?;
        log::info!("saved {} vocabulary tokens to {}", self.vocab.len(), path.display());
        Ok(())
    }

    pub fn get_vocab(&self) -> &[String] {
        &self.vocab
    }

    pub fn into_vocab(self) -> Vec<String> {
        self.vocab
    }

    /// Raw counts from the last `generate`; empty after `load`.
    pub fn token_frequencies(&self) -> &TermFrequencies {
        &self.token_frequencies
    }

    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.special_tokens
    }
}

fn special_prefix(special_tokens: &SpecialTokens) -> Vec<String> {
    let mut prefix: Vec<String> = Vec::new();
    for token in special_tokens.all() {
        if !prefix.iter().any(|t| t == token) {
            prefix.push(token.to_owned());
        }
    }
    prefix
}

fn select_min_count<'a>(ranked: &[(&'a str, u64)], threshold: Option<u64>) -> Vec<&'a str> {
    ranked
        .iter()
        .filter(|(_, count)| threshold.map_or(true, |t| *count > t))
        .map(|(token, _)| *token)
        .collect()
}

/// Walk `ranked` accumulating counts and stop right after the token whose
/// cumulative share first reaches `coverage`. The share is the ratio of two
/// exact integers, so a boundary like `7 / 25` compares equal to `0.28`.
fn select_coverage<'a>(ranked: &[(&'a str, u64)], total: u64, coverage: f64) -> Vec<&'a str> {
    let total = total as f64;
    let mut cumulative: u64 = 0;
    let mut selected = Vec::new();
    for (token, count) in ranked {
        selected.push(*token);
        cumulative += count;
        if cumulative as f64 / total >= coverage {
            break;
        }
    }
    selected
}
