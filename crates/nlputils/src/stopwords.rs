use crate::artifacts::read_stopwords_file;
use crate::errors::Result;
use std::collections::HashSet;
use std::path::Path;

/// Set of words dropped by `tokenize(.., discard_stop_words = true)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// One stop word per line, UTF-8.
    pub fn from_path(path: &Path) -> Result<Self> {
        let words = read_stopwords_file(path)?;
        log::info!("loaded {} stop words from {}", words.len(), path.display());
        Ok(Self::from_words(words))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Drop stop words, keeping relative order.
    pub fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        if self.words.is_empty() {
            return tokens;
        }
        tokens.into_iter().filter(|t| !self.contains(t)).collect()
    }

    /// Sorted copy, for stable output.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut words: Vec<String> = self.words.iter().cloned().collect();
        words.sort();
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn filter_keeps_order() {
        let stop = StopWords::from_words(["the", "of"]);
        let tokens = vec!["the", "end", "of", "the", "road"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(stop.filter(tokens), vec!["end", "road"]);
    }

    #[test]
    fn loads_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stop.txt");
        fs::write(&path, "的\n了\n the \n")?;
        let stop = StopWords::from_path(&path)?;
        assert_eq!(stop.len(), 3);
        assert!(stop.contains("的"));
        assert!(stop.contains("the"));
        assert_eq!(stop.to_sorted_vec(), vec!["the", "了", "的"]);
        Ok(())
    }
}
