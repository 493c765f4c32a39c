//! Reserved tokens with fixed roles.

use crate::errors::{invalid, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BOS_TOKEN: &str = "[BOS]";
pub const DEFAULT_EOS_TOKEN: &str = "[EOS]";
pub const DEFAULT_UNK_TOKEN: &str = "[UNK]";
pub const DEFAULT_SEP_TOKEN: &str = "[SEP]";
pub const DEFAULT_PAD_TOKEN: &str = "[PAD]";
pub const DEFAULT_CLS_TOKEN: &str = "[CLS]";
pub const DEFAULT_MASK_TOKEN: &str = "[MASK]";

/// Keys accepted in a special-token configuration.
pub const SPECIAL_TOKEN_KEYS: [&str; 8] = [
    "bos_token",
    "eos_token",
    "unk_token",
    "sep_token",
    "pad_token",
    "cls_token",
    "mask_token",
    "additional_special_tokens",
];

/// User-facing special token overrides. Unset fields fall back to the
/// bracketed defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecialTokensCfg {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bos_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eos_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unk_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sep_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_special_tokens: Option<Vec<String>>,
}

impl SpecialTokensCfg {
    /// Build from a dynamic key/value map (e.g. a JSON object).
    ///
    /// Keys outside [`SPECIAL_TOKEN_KEYS`], non-string token values and a
    /// non-array `additional_special_tokens` are rejected.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let map = match value {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(invalid(format!(
                    "special tokens must be given as a key/value map, got {other}"
                )))
            }
        };

        let mut cfg = SpecialTokensCfg::default();
        for (key, value) in map {
            if key == "additional_special_tokens" {
                let items = value.as_array().ok_or_else(|| {
                    invalid("value of additional_special_tokens must be a sequence of strings")
                })?;
                let tokens = items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_owned).ok_or_else(|| {
                            invalid("additional_special_tokens may only contain strings")
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                cfg.additional_special_tokens = Some(tokens);
                continue;
            }

            let slot = match key.as_str() {
                "bos_token" => &mut cfg.bos_token,
                "eos_token" => &mut cfg.eos_token,
                "unk_token" => &mut cfg.unk_token,
                "sep_token" => &mut cfg.sep_token,
                "pad_token" => &mut cfg.pad_token,
                "cls_token" => &mut cfg.cls_token,
                "mask_token" => &mut cfg.mask_token,
                other => {
                    return Err(invalid(format!(
                        "not supported keyword argument '{other}' (expected one of {})",
                        SPECIAL_TOKEN_KEYS.join(", ")
                    )))
                }
            };
            let token = value
                .as_str()
                .ok_or_else(|| invalid(format!("value of {key} must be a string")))?;
            *slot = Some(token.to_owned());
        }
        Ok(cfg)
    }

    /// Resolve against the defaults.
    pub fn resolve(&self) -> SpecialTokens {
        let pick = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_owned())
        };
        SpecialTokens {
            bos: pick(&self.bos_token, DEFAULT_BOS_TOKEN),
            eos: pick(&self.eos_token, DEFAULT_EOS_TOKEN),
            unk: pick(&self.unk_token, DEFAULT_UNK_TOKEN),
            sep: pick(&self.sep_token, DEFAULT_SEP_TOKEN),
            pad: pick(&self.pad_token, DEFAULT_PAD_TOKEN),
            cls: pick(&self.cls_token, DEFAULT_CLS_TOKEN),
            mask: pick(&self.mask_token, DEFAULT_MASK_TOKEN),
            additional: self.additional_special_tokens.clone().unwrap_or_default(),
        }
    }
}

impl From<&SpecialTokens> for SpecialTokensCfg {
    fn from(tokens: &SpecialTokens) -> Self {
        SpecialTokensCfg {
            bos_token: Some(tokens.bos.clone()),
            eos_token: Some(tokens.eos.clone()),
            unk_token: Some(tokens.unk.clone()),
            sep_token: Some(tokens.sep.clone()),
            pad_token: Some(tokens.pad.clone()),
            cls_token: Some(tokens.cls.clone()),
            mask_token: Some(tokens.mask.clone()),
            additional_special_tokens: (!tokens.additional.is_empty())
                .then(|| tokens.additional.clone()),
        }
    }
}

/// The resolved set of special tokens owned by a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    pub bos: String,
    pub eos: String,
    pub unk: String,
    pub sep: String,
    pub pad: String,
    pub cls: String,
    pub mask: String,
    #[serde(default)]
    pub additional: Vec<String>,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        SpecialTokensCfg::default().resolve()
    }
}

impl SpecialTokens {
    /// Every special token in canonical order: bos, eos, unk, sep, pad, cls,
    /// mask, then the additional tokens as configured.
    pub fn all(&self) -> Vec<&str> {
        let mut tokens = vec![
            self.bos.as_str(),
            self.eos.as_str(),
            self.unk.as_str(),
            self.sep.as_str(),
            self.pad.as_str(),
            self.cls.as_str(),
            self.mask.as_str(),
        ];
        tokens.extend(self.additional.iter().map(String::as_str));
        tokens
    }

    pub fn contains(&self, token: &str) -> bool {
        self.all().contains(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use serde_json::json;

    #[test]
    fn defaults_are_bracketed_literals() {
        let specials = SpecialTokens::default();
        assert_eq!(
            specials.all(),
            vec!["[BOS]", "[EOS]", "[UNK]", "[SEP]", "[PAD]", "[CLS]", "[MASK]"]
        );
    }

    #[test]
    fn overrides_keep_canonical_order() {
        let cfg = SpecialTokensCfg::from_value(json!({
            "pad_token": "<pad>",
            "bos_token": "<s>",
            "additional_special_tokens": ["<x>", "<y>"],
        }))
        .unwrap();
        let specials = cfg.resolve();
        assert_eq!(
            specials.all(),
            vec!["<s>", "[EOS]", "[UNK]", "[SEP]", "<pad>", "[CLS]", "[MASK]", "<x>", "<y>"]
        );
        assert!(specials.contains("<y>"));
        assert!(!specials.contains("[PAD]"));
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        let err = SpecialTokensCfg::from_value(json!({ "foo_token": "[FOO]" })).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(msg) if msg.contains("foo_token")));
    }

    #[test]
    fn non_string_token_is_rejected() {
        let err = SpecialTokensCfg::from_value(json!({ "unk_token": 3 })).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn additional_tokens_must_be_a_string_sequence() {
        let err = SpecialTokensCfg::from_value(json!({ "additional_special_tokens": "<x>" }))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = SpecialTokensCfg::from_value(json!({ "additional_special_tokens": ["<x>", 1] }))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn serde_rejects_unknown_fields() {
        let parsed: std::result::Result<SpecialTokensCfg, _> =
            serde_json::from_value(json!({ "start_token": "<s>" }));
        assert!(parsed.is_err());
    }
}
