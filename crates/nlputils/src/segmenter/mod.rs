//! Raw text segmentation, one strategy per language.
//!
//! The tokenizer only sees the [`Segmenter`] capability; which concrete
//! strategy backs it is decided by [`build_segmenter`] from the configured
//! [`Language`].

mod dictionary;
mod word;

pub use dictionary::DictionarySegmenter;
pub use word::WordSegmenter;

use crate::config::{Language, SegmenterCfg};
use crate::errors::Result;

/// Turns raw text into an ordered sequence of string tokens.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> Segmenter for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn segment(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

pub fn build_segmenter(language: Language, cfg: &SegmenterCfg) -> Result<Box<dyn Segmenter>> {
    let segmenter: Box<dyn Segmenter> = match language {
        Language::Cn => match cfg.dictionary.as_deref() {
            Some(path) => Box::new(DictionarySegmenter::from_path(path)?),
            None => Box::new(DictionarySegmenter::default()),
        },
        Language::En => Box::new(WordSegmenter::new(cfg.norm, cfg.merge_entities)),
    };
    log::debug!("using {} segmenter for '{}'", segmenter.name(), language);
    Ok(segmenter)
}
