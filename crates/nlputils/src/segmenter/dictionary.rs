//! Statistical word segmentation for text without whitespace word breaks.
//!
//! Each run of Han characters and ASCII letters/digits is segmented by
//! building the DAG of dictionary words starting at every position and
//! taking the route with the highest total log-probability. Characters the
//! dictionary does not know become single-character tokens, except ASCII
//! letters/digits which are glued back into one token. Whitespace runs and
//! other symbols pass through as their own tokens, so concatenating the
//! output reproduces the input.

use super::Segmenter;
use crate::artifacts::read_dictionary_file;
use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct DictionarySegmenter {
    freqs: HashMap<String, u64>,
    total: u64,
    max_word_chars: usize,
}

impl DictionarySegmenter {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut segmenter = Self::default();
        for (word, freq) in words {
            segmenter.add_word(word.into(), freq);
        }
        segmenter
    }

    /// Load a dictionary with one `word [freq [tag]]` entry per line.
    /// A missing frequency counts as 1.
    pub fn from_path(path: &Path) -> Result<Self> {
        let lines = read_dictionary_file(path)?;
        let mut segmenter = Self::default();
        for line in &lines {
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let freq = match fields.next() {
                Some(raw) => raw.parse::<u64>().map_err(|_| {
                    Error::Artifact(format!(
                        "invalid frequency '{raw}' for '{word}' in {}",
                        path.display()
                    ))
                })?,
                None => 1,
            };
            segmenter.add_word(word.to_owned(), freq);
        }
        log::info!(
            "loaded {} dictionary words from {}",
            segmenter.freqs.len(),
            path.display()
        );
        Ok(segmenter)
    }

    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    fn add_word(&mut self, word: String, freq: u64) {
        let chars = word.chars().count();
        if chars == 0 {
            return;
        }
        self.max_word_chars = self.max_word_chars.max(chars);
        self.total += freq;
        *self.freqs.entry(word).or_insert(0) += freq;
    }

    fn word_freq(&self, chars: &[char]) -> Option<u64> {
        if chars.len() > self.max_word_chars {
            return None;
        }
        let word: String = chars.iter().collect();
        self.freqs.get(&word).copied().filter(|&freq| freq > 0)
    }

    /// For every start position, the end positions (exclusive) of the
    /// dictionary words beginning there. A single character is always an
    /// edge.
    fn build_dag(&self, chars: &[char]) -> Vec<Vec<usize>> {
        let n = chars.len();
        (0..n)
            .map(|start| {
                let mut ends = vec![start + 1];
                let limit = n.min(start + self.max_word_chars);
                for end in start + 2..=limit {
                    if self.word_freq(&chars[start..end]).is_some() {
                        ends.push(end);
                    }
                }
                ends
            })
            .collect()
    }

    /// Best route from each position to the end: `(log_prob, end_of_first_word)`.
    fn calc_route(&self, chars: &[char], dag: &[Vec<usize>]) -> Vec<(f64, usize)> {
        let n = chars.len();
        let log_total = (self.total.max(1) as f64).ln();
        let mut route = vec![(0.0f64, n); n + 1];
        for start in (0..n).rev() {
            let mut best = (f64::NEG_INFINITY, start + 1);
            for &end in &dag[start] {
                let freq = self.word_freq(&chars[start..end]).unwrap_or(1);
                let score = (freq as f64).ln() - log_total + route[end].0;
                // Ties go to the longer word.
                if score > best.0 || (score == best.0 && end > best.1) {
                    best = (score, end);
                }
            }
            route[start] = best;
        }
        route
    }

    fn cut_block(&self, chars: &[char], out: &mut Vec<String>) {
        let dag = self.build_dag(chars);
        let route = self.calc_route(chars, &dag);

        let mut ascii_buf = String::new();
        let mut start = 0;
        while start < chars.len() {
            let end = route[start].1;
            let piece = &chars[start..end];
            if piece.len() == 1 && piece[0].is_ascii_alphanumeric() {
                ascii_buf.push(piece[0]);
            } else {
                if !ascii_buf.is_empty() {
                    out.push(std::mem::take(&mut ascii_buf));
                }
                out.push(piece.iter().collect());
            }
            start = end;
        }
        if !ascii_buf.is_empty() {
            out.push(ascii_buf);
        }
    }
}

impl Segmenter for DictionarySegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let mut j = i + 1;
            if is_block_char(c) {
                while j < chars.len() && is_block_char(chars[j]) {
                    j += 1;
                }
                self.cut_block(&chars[i..j], &mut tokens);
            } else if c.is_whitespace() {
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                tokens.push(chars[i..j].iter().collect());
            } else {
                tokens.push(c.to_string());
            }
            i = j;
        }
        tokens
    }

    fn name(&self) -> &'static str {
        "dictionary"
    }
}

fn is_block_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_han(c)
}

fn is_han(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}')
}
