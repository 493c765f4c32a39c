use crate::errors::{invalid, Error, Result};
use crate::special::SpecialTokensCfg;
use crate::validate::validate_config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub segmenter: SegmenterCfg,
    #[serde(default)]
    pub special_tokens: SpecialTokensCfg,
    /// Language code -> stop-word file.
    #[serde(default)]
    pub stopwords: BTreeMap<String, PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Cn,
    En,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmenterCfg {
    /// `en` only: emit normalized forms instead of surface text.
    #[serde(default)]
    pub norm: bool,
    /// `en` only: merge contiguous capitalized spans into one token.
    #[serde(default)]
    pub merge_entities: bool,
    /// `cn` only: prefix dictionary, `word [freq [tag]]` per line.
    #[serde(default)]
    pub dictionary: Option<PathBuf>,
}

impl Language {
    pub const SUPPORTED: [Language; 2] = [Language::Cn, Language::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Cn => "cn",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cn" => Ok(Language::Cn),
            "en" => Ok(Language::En),
            other => {
                let supported: Vec<&str> = Language::SUPPORTED.iter().map(|l| l.as_str()).collect();
                Err(invalid(format!(
                    "language '{other}' not supported (expected one of {})",
                    supported.join(", ")
                )))
            }
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Config {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    /// Read a `.toml` (default) or `.json` config; relative paths resolve
    /// against the config file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let extension = path.extension().and_then(|ext| ext.to_str());
        let parsed: std::result::Result<Config, String> = match extension {
            Some("json") => serde_json::from_str(&contents).map_err(|err| err.to_string()),
            Some("toml") | None => toml::from_str(&contents).map_err(|err| err.to_string()),
            Some(other) => {
                return Err(invalid(format!(
                    "unsupported configuration extension '{other}'"
                )))
            }
        };
        // Unknown languages and special-token keys are rejected by serde.
        let mut config: Config = parsed
            .map_err(|err| invalid(format!("invalid config {}: {err}", path.display())))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.apply_base_path(base_dir);
        validate_config(&config)?;
        log::info!("loaded {} tokenizer config from {}", config.language, path.display());
        Ok(config)
    }

    /// Stop-word file configured for this config's language.
    pub fn stopwords_path(&self) -> Option<&Path> {
        self.stopwords
            .get(self.language.as_str())
            .map(PathBuf::as_path)
    }

    fn apply_base_path(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if let Some(dictionary) = self.segmenter.dictionary.as_mut() {
            resolve(dictionary);
        }
        for path in self.stopwords.values_mut() {
            resolve(path);
        }
    }
}
