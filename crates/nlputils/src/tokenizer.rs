//! Text <-> id round trip over a pluggable segmenter.
//!
//! A [`Tokenizer`] starts without a vocabulary. Segmentation works in that
//! state, everything that needs ids fails with [`Error::NotReady`] until
//! [`Tokenizer::load_vocab`] succeeds.

use crate::artifacts::{fingerprint, read_json, write_json, write_vocab_file};
use crate::config::{Config, Language, SegmenterCfg};
use crate::errors::{invalid, Error, Result};
use crate::mapper::TokenIdMap;
use crate::padding::{pad_sequence_to_fixed_length, Side};
use crate::segmenter::{build_segmenter, Segmenter};
use crate::special::SpecialTokens;
use crate::stopwords::StopWords;
use crate::validate::validate_config;
use crate::vocab::{SelectionPolicy, VocabBuilder, VocabSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

pub const STATE_FORMAT_VERSION: u32 = 1;

const NO_VOCAB: &str = "no vocabulary loaded; call load_vocab first";

/// Knobs for [`Tokenizer::encode`]. The default encodes without padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub max_length: Option<usize>,
    pub padding: Side,
    pub truncation: Side,
    pub discard_stop_words: bool,
}

impl EncodeOptions {
    pub fn fixed_length(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Default::default()
        }
    }
}

/// On-disk form of a whole tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizerState {
    pub format_version: u32,
    pub language: Language,
    pub segmenter: SegmenterCfg,
    pub special_tokens: SpecialTokens,
    pub vocab: Option<Vec<String>>,
    pub stopwords: Vec<String>,
    pub fingerprint: Option<String>,
}

pub struct Tokenizer {
    language: Language,
    segmenter_cfg: SegmenterCfg,
    segmenter: Box<dyn Segmenter>,
    special_tokens: SpecialTokens,
    stopwords: StopWords,
    mapper: Option<TokenIdMap>,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("language", &self.language)
            .field("segmenter", &self.segmenter.name())
            .field("special_tokens", &self.special_tokens)
            .field("stopwords", &self.stopwords.len())
            .field("vocab_size", &self.mapper.as_ref().map(TokenIdMap::len))
            .finish()
    }
}

impl Tokenizer {
    /// Build the configured language's segmenter and load its stop words.
    pub fn new(cfg: &Config) -> Result<Self> {
        validate_config(cfg)?;
        let segmenter = build_segmenter(cfg.language, &cfg.segmenter)?;
        Self::from_parts(cfg, segmenter)
    }

    /// Like [`Tokenizer::new`] but with a caller-supplied segmenter.
    pub fn with_segmenter<S>(cfg: &Config, segmenter: S) -> Result<Self>
    where
        S: Segmenter + 'static,
    {
        validate_config(cfg)?;
        Self::from_parts(cfg, Box::new(segmenter))
    }

    fn from_parts(cfg: &Config, segmenter: Box<dyn Segmenter>) -> Result<Self> {
        let stopwords = match cfg.stopwords_path() {
            Some(path) => StopWords::from_path(path)?,
            None => StopWords::default(),
        };
        log::info!(
            "tokenizer ready for '{}' ({} segmenter, {} stop words)",
            cfg.language,
            segmenter.name(),
            stopwords.len()
        );
        Ok(Self {
            language: cfg.language,
            segmenter_cfg: cfg.segmenter.clone(),
            segmenter,
            special_tokens: cfg.special_tokens.resolve(),
            stopwords,
            mapper: None,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.special_tokens
    }

    pub fn is_ready(&self) -> bool {
        self.mapper.is_some()
    }

    fn mapper(&self) -> Result<&TokenIdMap> {
        self.mapper.as_ref().ok_or(Error::NotReady(NO_VOCAB))
    }

    /// Segment `text`, optionally dropping stop words. Needs no vocabulary.
    pub fn segment(&self, text: &str, discard_stop_words: bool) -> Vec<String> {
        let tokens = self.segmenter.segment(text);
        if discard_stop_words {
            self.stopwords.filter(tokens)
        } else {
            tokens
        }
    }

    pub fn tokenize(&self, text: &str, discard_stop_words: bool) -> Result<Vec<String>> {
        self.mapper()?;
        Ok(self.segment(text, discard_stop_words))
    }

    /// Tokenize and map to ids; with `max_length`, pad with the pad token's
    /// id or truncate to exactly that length.
    pub fn encode(&self, text: &str, options: &EncodeOptions) -> Result<Vec<u32>> {
        let mapper = self.mapper()?;
        let tokens = self.segment(text, options.discard_stop_words);
        let ids = mapper.convert_tokens_to_ids(&tokens);
        let Some(max_length) = options.max_length else {
            return Ok(ids);
        };
        let pad_id = mapper.get_id(&self.special_tokens.pad).ok_or_else(|| {
            invalid(format!(
                "pad token '{}' is not in the vocabulary",
                self.special_tokens.pad
            ))
        })?;
        Ok(pad_sequence_to_fixed_length(
            ids,
            max_length,
            pad_id,
            options.padding,
            options.truncation,
        ))
    }

    /// Map ids back to tokens and join them without a separator.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        Ok(self.convert_ids_to_tokens(ids)?.concat())
    }

    pub fn convert_tokens_to_ids<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<u32>> {
        Ok(self.mapper()?.convert_tokens_to_ids(tokens))
    }

    pub fn convert_ids_to_tokens(&self, ids: &[u32]) -> Result<Vec<String>> {
        Ok(self.mapper()?.convert_ids_to_tokens(ids))
    }

    pub fn token_to_id(&self, token: &str) -> Result<u32> {
        Ok(self.mapper()?.token_to_id(token))
    }

    pub fn id_to_token(&self, id: u32) -> Result<&str> {
        Ok(self.mapper()?.id_to_token(id))
    }

    pub fn get_vocab(&self) -> Result<&[String]> {
        Ok(self.mapper()?.vocab())
    }

    pub fn get_token2id(&self) -> Result<&HashMap<String, u32>> {
        Ok(self.mapper()?.token2id())
    }

    pub fn get_id2token(&self) -> Result<HashMap<u32, &str>> {
        Ok(self.mapper()?.id2token())
    }

    pub fn all_special_tokens(&self) -> Vec<&str> {
        self.special_tokens.all()
    }

    /// A builder that prefixes this tokenizer's special tokens.
    pub fn vocab_builder(&self, policy: SelectionPolicy) -> Result<VocabBuilder> {
        VocabBuilder::with_special_tokens(policy, self.special_tokens.clone())
    }

    /// Replace the vocabulary and rebuild the id map. On failure the
    /// previous vocabulary stays in place.
    pub fn load_vocab(&mut self, source: impl Into<VocabSource>) -> Result<()> {
        let tokens = source.into().into_tokens()?;
        let mapper = TokenIdMap::new(tokens, &self.special_tokens.unk)?;
        log::info!("tokenizer vocabulary set to {} tokens", mapper.len());
        self.mapper = Some(mapper);
        Ok(())
    }

    pub fn save_vocab(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let vocab = self.get_vocab()?;
        write_vocab_file(path, vocab)?;
        log::info!("saved {} vocabulary tokens to {}", vocab.len(), path.display());
        Ok(())
    }

    /// Replace the stop words. On failure the previous set stays in place.
    pub fn load_stopwords(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.stopwords = StopWords::from_path(path.as_ref())?;
        Ok(())
    }

    pub fn set_stopwords(&mut self, stopwords: StopWords) {
        self.stopwords = stopwords;
    }

    pub fn get_stopwords(&self) -> &StopWords {
        &self.stopwords
    }

    pub fn discard_stop_words(&self, tokens: Vec<String>) -> Vec<String> {
        self.stopwords.filter(tokens)
    }

    pub fn to_state(&self) -> TokenizerState {
        let vocab = self.mapper.as_ref().map(|m| m.vocab().to_vec());
        TokenizerState {
            format_version: STATE_FORMAT_VERSION,
            language: self.language,
            segmenter: self.segmenter_cfg.clone(),
            special_tokens: self.special_tokens.clone(),
            fingerprint: vocab.as_deref().map(fingerprint),
            vocab,
            stopwords: self.stopwords.to_sorted_vec(),
        }
    }

    /// Persist everything needed to rebuild this tokenizer with
    /// [`Tokenizer::load_state`].
    pub fn save_tokenizer_state(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_json(path, &self.to_state())?;
        log::info!("saved tokenizer state to {}", path.display());
        Ok(())
    }

    pub fn load_state(path: impl AsRef<Path>) -> Result<Self> {
        let state: TokenizerState = read_json(path.as_ref())?;
        let segmenter = build_segmenter(state.language, &state.segmenter)?;
        Self::from_state(state, segmenter)
    }

    /// Restore a tokenizer saved with a custom segmenter.
    pub fn load_state_with_segmenter<S>(path: impl AsRef<Path>, segmenter: S) -> Result<Self>
    where
        S: Segmenter + 'static,
    {
        let state: TokenizerState = read_json(path.as_ref())?;
        Self::from_state(state, Box::new(segmenter))
    }

    fn from_state(state: TokenizerState, segmenter: Box<dyn Segmenter>) -> Result<Self> {
        if state.format_version != STATE_FORMAT_VERSION {
            return Err(Error::Artifact(format!(
                "unsupported tokenizer state version {} (expected {STATE_FORMAT_VERSION})",
                state.format_version
            )));
        }

        let cfg = Config {
            language: state.language,
            segmenter: state.segmenter,
            special_tokens: (&state.special_tokens).into(),
            ..Default::default()
        };
        validate_config(&cfg)?;

        let mut tokenizer = Self::from_parts(&cfg, segmenter)?;
        tokenizer.stopwords = StopWords::from_words(state.stopwords);

        if let Some(vocab) = state.vocab {
            let actual = fingerprint(&vocab);
            if state.fingerprint.as_deref() != Some(actual.as_str()) {
                return Err(Error::Artifact(
                    "tokenizer state fingerprint does not match its vocabulary".into(),
                ));
            }
            tokenizer.load_vocab(vocab)?;
        }
        Ok(tokenizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    fn whitespace_tokenizer() -> Tokenizer {
        let split = |text: &str| text.split_whitespace().map(String::from).collect::<Vec<_>>();
        Tokenizer::with_segmenter(&Config::default(), split).unwrap()
    }

    #[test]
    fn tokenizer_is_send_and_sync() {
        assert_send_sync::<Tokenizer>();
    }

    #[test]
    fn vocabulary_operations_require_ready() {
        let tok = whitespace_tokenizer();
        assert!(!tok.is_ready());
        assert_eq!(tok.segment("a b", false), vec!["a", "b"]);
        assert!(matches!(tok.tokenize("a b", false), Err(Error::NotReady(_))));
        assert!(matches!(
            tok.encode("a", &EncodeOptions::default()),
            Err(Error::NotReady(_))
        ));
        assert!(matches!(tok.decode(&[0]), Err(Error::NotReady(_))));
        assert!(matches!(tok.convert_tokens_to_ids(&["a"]), Err(Error::NotReady(_))));
        assert!(matches!(tok.get_vocab(), Err(Error::NotReady(_))));
    }

    #[test]
    fn encode_pads_with_pad_id() {
        let mut tok = whitespace_tokenizer();
        tok.load_vocab(VocabSource::tokens(["[PAD]", "[UNK]", "hello", "world"]))
            .unwrap();

        let ids = tok.encode("hello there world", &EncodeOptions::default()).unwrap();
        assert_eq!(ids, vec![2, 1, 3]);

        let options = EncodeOptions {
            max_length: Some(5),
            padding: Side::Left,
            ..Default::default()
        };
        assert_eq!(tok.encode("hello world", &options).unwrap(), vec![0, 0, 0, 2, 3]);
        assert_eq!(
            tok.encode("hello world hello", &EncodeOptions::fixed_length(2)).unwrap(),
            vec![2, 3]
        );
    }

    #[test]
    fn fixed_length_needs_a_pad_token() {
        let mut tok = whitespace_tokenizer();
        tok.load_vocab(VocabSource::tokens(["[UNK]", "a"])).unwrap();
        assert!(tok.encode("a", &EncodeOptions::default()).is_ok());
        assert!(matches!(
            tok.encode("a", &EncodeOptions::fixed_length(4)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn stop_words_are_dropped_on_request() {
        let mut tok = whitespace_tokenizer();
        tok.set_stopwords(StopWords::from_words(["the"]));
        tok.load_vocab(VocabSource::tokens(["[UNK]", "the", "cat"])).unwrap();
        assert_eq!(tok.tokenize("the cat", true).unwrap(), vec!["cat"]);
        assert_eq!(tok.tokenize("the cat", false).unwrap(), vec!["the", "cat"]);
        let options = EncodeOptions {
            discard_stop_words: true,
            ..Default::default()
        };
        assert_eq!(tok.encode("the cat", &options).unwrap(), vec![2]);
    }

    #[test]
    fn invalid_vocabulary_keeps_previous_state() {
        let mut tok = whitespace_tokenizer();
        tok.load_vocab(VocabSource::tokens(["[UNK]", "a"])).unwrap();
        assert!(tok.load_vocab(VocabSource::tokens(["a", "b"])).is_err());
        assert!(tok.load_vocab(VocabSource::tokens(["[UNK]", "a", "a"])).is_err());
        assert_eq!(tok.get_vocab().unwrap(), &["[UNK]", "a"]);
    }

    #[test]
    fn state_without_vocabulary_restores_unconfigured() {
        let tok = whitespace_tokenizer();
        let state = tok.to_state();
        assert_eq!(state.vocab, None);
        assert_eq!(state.fingerprint, None);
        assert_eq!(state.special_tokens, SpecialTokens::default());
    }
}
