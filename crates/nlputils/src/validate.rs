use crate::config::{Config, Language};
use crate::errors::{invalid, Result};
use crate::special::SpecialTokensCfg;
use std::collections::HashSet;

pub fn validate_config(cfg: &Config) -> Result<()> {
    validate_special_tokens(&cfg.special_tokens)?;

    if cfg.language != Language::Cn && cfg.segmenter.dictionary.is_some() {
        return Err(invalid(format!(
            "segmenter.dictionary is only supported for 'cn', not '{}'",
            cfg.language
        )));
    }

    if cfg.language != Language::En && (cfg.segmenter.norm || cfg.segmenter.merge_entities) {
        return Err(invalid(format!(
            "segmenter.norm and segmenter.merge_entities are only supported for 'en', not '{}'",
            cfg.language
        )));
    }

    for key in cfg.stopwords.keys() {
        key.parse::<Language>()?;
    }

    Ok(())
}

/// Every special token must be non-empty and distinct, so that the
/// vocabulary built around them stays duplicate-free.
pub fn validate_special_tokens(cfg: &SpecialTokensCfg) -> Result<()> {
    let specials = cfg.resolve();
    let mut seen = HashSet::new();
    for token in specials.all() {
        if token.trim().is_empty() {
            return Err(invalid("special tokens must not be empty or whitespace"));
        }
        if token.trim() != token {
            return Err(invalid(format!(
                "special token '{token}' must not carry surrounding whitespace"
            )));
        }
        if !seen.insert(token) {
            return Err(invalid(format!(
                "special token '{token}' appears multiple times"
            )));
        }
    }
    Ok(())
}
