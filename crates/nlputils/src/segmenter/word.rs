//! Rule-based word tokenizer for whitespace-delimited languages.

use super::Segmenter;
use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{N}+(?:[.,:/]\p{N}+)+|[\p{L}\p{M}\p{N}]+(?:['’][\p{L}\p{M}]+)*|[^\s\p{L}\p{M}\p{N}]")
        .expect("token pattern is valid")
});

const CLITICS: [&str; 6] = ["s", "re", "ve", "ll", "d", "m"];

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

/// Splits words, numbers and punctuation; detaches English clitics
/// (`don't` -> `do` `n't`, `it's` -> `it` `'s`).
///
/// With `norm`, tokens are lower-cased and clitics spelled out
/// (`n't` -> `not`, `'re` -> `are`). With `merge_entities`, runs of two or
/// more capitalized words on one line become a single token
/// (`New York`), before normalization.
#[derive(Debug, Clone, Default)]
pub struct WordSegmenter {
    norm: bool,
    merge_entities: bool,
}

impl WordSegmenter {
    pub fn new(norm: bool, merge_entities: bool) -> Self {
        Self {
            norm,
            merge_entities,
        }
    }

    fn spans(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        for m in TOKEN_RE.find_iter(text) {
            split_clitic(m.as_str(), m.start(), &mut spans);
        }
        if self.merge_entities {
            spans = merge_capitalized(text, spans);
        }
        spans
    }
}

impl Segmenter for WordSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.spans(text)
            .into_iter()
            .map(|span| {
                let surface = &text[span.start..span.end];
                if self.norm {
                    normalize(surface)
                } else {
                    surface.to_owned()
                }
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "word"
    }
}

fn split_clitic(word: &str, offset: usize, spans: &mut Vec<Span>) {
    let end = offset + word.len();
    let lower = word.to_lowercase();

    if lower.len() == word.len() {
        for suffix in ["n't", "n’t"] {
            if lower.ends_with(suffix) && word.len() > suffix.len() {
                let cut = end - suffix.len();
                spans.push(Span { start: offset, end: cut });
                spans.push(Span { start: cut, end });
                return;
            }
        }
    }

    if let Some((idx, apostrophe)) = word.char_indices().rev().find(|(_, c)| *c == '\'' || *c == '’') {
        let suffix = &lower_tail(word, idx + apostrophe.len_utf8());
        if idx > 0 && CLITICS.contains(&suffix.as_str()) {
            spans.push(Span { start: offset, end: offset + idx });
            spans.push(Span { start: offset + idx, end });
            return;
        }
    }

    spans.push(Span { start: offset, end });
}

fn lower_tail(word: &str, from: usize) -> String {
    word[from..].to_lowercase()
}

fn is_capitalized(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.is_uppercase() && chars.all(|c| c.is_alphabetic() || c == '-'),
        None => false,
    }
}

fn merge_capitalized(text: &str, spans: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    let mut run_len = 0usize;
    for span in spans {
        let capitalized = is_capitalized(&text[span.start..span.end]);
        if capitalized && run_len > 0 {
            if let Some(last) = merged.last_mut() {
                if !text[last.end..span.start].contains('\n') {
                    last.end = span.end;
                    run_len += 1;
                    continue;
                }
            }
        }
        run_len = usize::from(capitalized);
        merged.push(span);
    }
    merged
}

fn normalize(token: &str) -> String {
    let folded: String = token
        .chars()
        .map(|c| match c {
            '’' | '‘' => '\'',
            '“' | '”' => '"',
            other => other,
        })
        .collect::<String>()
        .to_lowercase();

    match folded.as_str() {
        "n't" => "not".to_owned(),
        "'re" => "are".to_owned(),
        "'ve" => "have".to_owned(),
        "'ll" => "will".to_owned(),
        "'m" => "am".to_owned(),
        _ => folded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_punctuation() {
        let seg = WordSegmenter::default();
        assert_eq!(
            seg.segment("Hello, world! It costs 3.50 dollars."),
            vec!["Hello", ",", "world", "!", "It", "costs", "3.50", "dollars", "."]
        );
    }

    #[test]
    fn detaches_clitics() {
        let seg = WordSegmenter::default();
        assert_eq!(
            seg.segment("I don't think it's what we're after"),
            vec!["I", "do", "n't", "think", "it", "'s", "what", "we", "'re", "after"]
        );
        assert_eq!(seg.segment("o'clock"), vec!["o'clock"]);
    }

    #[test]
    fn norm_lowercases_and_expands() {
        let seg = WordSegmenter::new(true, false);
        assert_eq!(
            seg.segment("They DON’T know we’re Here"),
            vec!["they", "do", "not", "know", "we", "are", "here"]
        );
    }

    #[test]
    fn merges_capitalized_runs() {
        let seg = WordSegmenter::new(false, true);
        assert_eq!(
            seg.segment("the player Alex Tanaka moved to New York City."),
            vec!["the", "player", "Alex Tanaka", "moved", "to", "New York City", "."]
        );
    }

    #[test]
    fn merge_does_not_cross_lines_or_single_words() {
        let seg = WordSegmenter::new(false, true);
        assert_eq!(
            seg.segment("Paris\nLondon and Rome"),
            vec!["Paris", "London", "and", "Rome"]
        );
    }

    #[test]
    fn merge_then_norm() {
        let seg = WordSegmenter::new(true, true);
        assert_eq!(seg.segment("visit New York"), vec!["visit", "new york"]);
    }
}
