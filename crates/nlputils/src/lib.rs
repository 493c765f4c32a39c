//! Vocabulary and id-mapping utilities for text preprocessing.
//!
//! The pipeline runs raw text through a language-specific [`Segmenter`],
//! counts the resulting tokens over a corpus, selects a vocabulary with a
//! [`VocabBuilder`] and maps tokens to dense ids with a [`Tokenizer`].
//!
//! # Configuration
//!
//! A [`Config`] picks the language (`cn` or `en`), the segmenter options,
//! overrides for the special tokens and a language -> stop-word file table.
//! Configs load from TOML or JSON and are validated before any file they
//! reference is opened.
//!
//! # Vocabulary
//!
//! Vocabularies always start with the special tokens (`[BOS]`, `[EOS]`,
//! `[UNK]`, `[SEP]`, `[PAD]`, `[CLS]`, `[MASK]` unless overridden, then any
//! additional ones) followed by corpus tokens in descending frequency.
//! Corpus tokens are kept either above a raw count threshold or until a
//! cumulative frequency coverage is reached.
//!
//! # Persistence
//!
//! Vocabularies and stop words are plain UTF-8 files with one entry per
//! line. A whole tokenizer serializes to JSON with a SHA-256 fingerprint of
//! its vocabulary that is verified on load.
//!
//! # Thread Safety
//!
//! [`Tokenizer`] is `Send + Sync`; shared read-only use (`encode`,
//! `decode`) needs no synchronization, mutation needs `&mut`.

pub mod config;
pub mod counter;
pub mod errors;
pub mod mapper;
pub mod padding;
pub mod segmenter;
pub mod special;
pub mod stopwords;
pub mod tokenizer;
pub mod vocab;

mod artifacts;
mod validate;

pub use config::{Config, Language, SegmenterCfg};
pub use counter::{count, CorpusEntry, CorpusItem, TermFrequencies};
pub use errors::{Error, Result};
pub use mapper::TokenIdMap;
pub use padding::{pad_sequence_to_fixed_length, Side};
pub use segmenter::{build_segmenter, DictionarySegmenter, Segmenter, WordSegmenter};
pub use special::{SpecialTokens, SpecialTokensCfg};
pub use stopwords::StopWords;
pub use tokenizer::{EncodeOptions, Tokenizer, TokenizerState};
pub use validate::{validate_config, validate_special_tokens};
pub use vocab::{SelectionPolicy, VocabBuilder, VocabSource};
