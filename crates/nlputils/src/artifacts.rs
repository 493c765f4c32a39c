use crate::errors::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const VOCAB_FILE_ERR: &str = "vocabulary file not found at";
const STOPWORDS_FILE_ERR: &str = "stop-word file not found at";
const DICTIONARY_FILE_ERR: &str = "dictionary file not found at";
const STATE_FILE_ERR: &str = "tokenizer state not found at";

/// One token per line, every line kept so ids stay positional. Surrounding
/// whitespace is stripped from ordinary tokens; a line made only of
/// whitespace is a whitespace token and is kept verbatim.
pub fn read_vocab_file(path: &Path) -> Result<Vec<String>> {
    ensure_file(path, VOCAB_FILE_ERR)?;
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut tokens = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            tokens.push(line.to_owned());
        } else {
            tokens.push(trimmed.to_owned());
        }
    }
    Ok(tokens)
}

/// Write a vocabulary, one token per line. Tokens spanning a line break
/// cannot be read back at the same position and are rejected.
pub fn write_vocab_file<S: AsRef<str>>(path: &Path, tokens: &[S]) -> Result<()> {
    if let Some(token) = tokens
        .iter()
        .map(AsRef::as_ref)
        .find(|t| t.contains(['\n', '\r']))
    {
        return Err(Error::InvalidArgument(format!(
            "vocabulary token {token:?} contains a line break"
        )));
    }
    write_lines(path, tokens)
}

pub fn read_stopwords_file(path: &Path) -> Result<Vec<String>> {
    ensure_file(path, STOPWORDS_FILE_ERR)?;
    read_stripped_lines(path)
}

pub fn read_dictionary_file(path: &Path) -> Result<Vec<String>> {
    ensure_file(path, DICTIONARY_FILE_ERR)?;
    read_stripped_lines(path)
}

/// Write one token per line, in order, UTF-8.
fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    ensure_file(path, STATE_FILE_ERR)?;
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader)?;
    Ok(value)
}

/// Hex SHA-256 over the tokens, one per line.
pub fn fingerprint<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut hasher = Sha256::new();
    for token in tokens {
        hasher.update(token.as_ref().as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Lines with surrounding whitespace stripped; blank lines are skipped.
/// Invalid UTF-8 surfaces as an `InvalidData` IO error.
fn read_stripped_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_owned());
        }
    }
    Ok(lines)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn ensure_file(path: &Path, context: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::Artifact(format!("{context} {}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocab_lines_keep_their_positions() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("vocab.txt");
        fs::write(&path, "  [PAD] \n[UNK]\n\n  \nhello\r\n \r\n")?;
        assert_eq!(
            read_vocab_file(&path)?,
            vec!["[PAD]", "[UNK]", "", "  ", "hello", " "]
        );
        Ok(())
    }

    #[test]
    fn stopword_lines_skip_blanks() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stop.txt");
        fs::write(&path, " the \n\n  \nof\r\n")?;
        assert_eq!(read_stopwords_file(&path)?, vec!["the", "of"]);
        Ok(())
    }

    #[test]
    fn whitespace_tokens_survive_a_vocab_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("vocab.txt");
        let tokens = vec!["[UNK]", " ", "开", "\t", "放"];
        write_vocab_file(&path, &tokens)?;
        assert_eq!(read_vocab_file(&path)?, tokens);
        Ok(())
    }

    #[test]
    fn line_breaks_cannot_be_written_as_tokens() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("vocab.txt");
        let err = write_vocab_file(&path, &["[UNK]", "\n"]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn write_then_read_preserves_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("vocab.txt");
        let tokens = vec!["z", "y", "你好", "x"];
        write_vocab_file(&path, &tokens)?;
        assert_eq!(fs::read_to_string(&path)?, "z\ny\n你好\nx\n");
        assert_eq!(read_vocab_file(&path)?, tokens);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_artifact_error() {
        let err = read_stopwords_file(Path::new("definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, Error::Artifact(msg) if msg.contains("stop-word")));
    }

    #[test]
    fn invalid_utf8_is_an_io_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.txt");
        fs::write(&path, [0x66, 0xff, 0xfe, 0x0a])?;
        let err = read_vocab_file(&path).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        Ok(())
    }

    #[test]
    fn fingerprint_depends_on_order() {
        assert_ne!(fingerprint(&["a", "b"]), fingerprint(&["b", "a"]));
        assert_eq!(fingerprint(&["a", "b"]), fingerprint(&["a".to_string(), "b".to_string()]));
    }
}
