//! Bijective token <-> id mapping over a vocabulary snapshot.
//!
//! Ids are `0..N` in vocabulary order. Lookups never fail: unknown tokens
//! and ids outside `0..N` resolve to the unk token.

use crate::errors::{invalid, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdMap {
    id_to_token: Vec<String>,
    token_to_id: HashMap<String, u32>,
    unk_id: u32,
}

impl TokenIdMap {
    /// Assign ids to `vocab` in order.
    ///
    /// Fails if a token repeats (the map would stop being a bijection) or if
    /// `unk_token` is missing (out-of-vocabulary lookups need it).
    pub fn new(vocab: Vec<String>, unk_token: &str) -> Result<Self> {
        if vocab.len() > u32::MAX as usize {
            return Err(invalid(format!(
                "vocabulary of {} tokens exceeds the id range",
                vocab.len()
            )));
        }

        let mut token_to_id = HashMap::with_capacity(vocab.len());
        for (id, token) in vocab.iter().enumerate() {
            if token_to_id.insert(token.clone(), id as u32).is_some() {
                return Err(invalid(format!(
                    "token '{token}' appears more than once in the vocabulary"
                )));
            }
        }

        let unk_id = *token_to_id.get(unk_token).ok_or_else(|| {
            invalid(format!(
                "unk token '{unk_token}' must be part of the vocabulary"
            ))
        })?;

        Ok(Self {
            id_to_token: vocab,
            token_to_id,
            unk_id,
        })
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    pub fn unk_id(&self) -> u32 {
        self.unk_id
    }

    pub fn vocab(&self) -> &[String] {
        &self.id_to_token
    }

    pub fn token_to_id(&self, token: &str) -> u32 {
        self.get_id(token).unwrap_or(self.unk_id)
    }

    pub fn id_to_token(&self, id: u32) -> &str {
        self.get_token(id)
            .unwrap_or_else(|| &self.id_to_token[self.unk_id as usize])
    }

    /// Strict lookup, `None` for out-of-vocabulary tokens.
    pub fn get_id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    /// Strict lookup, `None` for ids outside `0..N`.
    pub fn get_token(&self, id: u32) -> Option<&str> {
        self.id_to_token.get(id as usize).map(String::as_str)
    }

    pub fn convert_tokens_to_ids<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        tokens
            .iter()
            .map(|token| self.token_to_id(token.as_ref()))
            .collect()
    }

    pub fn convert_ids_to_tokens(&self, ids: &[u32]) -> Vec<String> {
        ids.iter()
            .map(|&id| self.id_to_token(id).to_owned())
            .collect()
    }

    pub fn token2id(&self) -> &HashMap<String, u32> {
        &self.token_to_id
    }

    pub fn id2token(&self) -> HashMap<u32, &str> {
        self.id_to_token
            .iter()
            .enumerate()
            .map(|(id, token)| (id as u32, token.as_str()))
            .collect()
    }
}
