//! Pair files: one `|`-separated entry per line.
//!
//! Lemma files hold `word|lemma` or `word|pos|lemma` lines (the latter keyed as
//! `word/pos`); count files hold `key|id` lines. Blank lines are skipped and a
//! trailing `\r` is ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;
use tracing::info;

use crate::{CountDictionary, DictError, Dictionary, LemmaDictionary};

const FIELD_SEPARATOR: char = '|';

/// Strategy for reading a pair file.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file.
    #[default]
    Mmap,
    /// Read the file into an owned buffer.
    Owned,
}

impl LoadMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mmap" => Some(LoadMode::Mmap),
            "owned" => Some(LoadMode::Owned),
            _ => None,
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Load a `word|lemma` / `word|pos|lemma` file into a lemma dictionary.
pub fn load_lemma_dictionary(
    path: impl AsRef<Path>,
    mode: LoadMode,
) -> Result<LemmaDictionary, DictError> {
    let path = path.as_ref();
    let buffer = load_file(path, mode)?;
    let dict = Dictionary::build(parse_lemma_pairs(buffer.as_slice())?)?;
    info!(
        "loaded {} lemmas from {} ({} duplicates ignored)",
        dict.len(),
        path.display(),
        dict.duplicates()
    );
    Ok(dict)
}

/// Load a `key|id` file into a count dictionary.
pub fn load_count_dictionary(
    path: impl AsRef<Path>,
    mode: LoadMode,
) -> Result<CountDictionary, DictError> {
    let path = path.as_ref();
    let buffer = load_file(path, mode)?;
    let dict = Dictionary::build(parse_count_pairs(buffer.as_slice())?)?;
    info!(
        "loaded {} vocabulary entries from {} ({} duplicates ignored)",
        dict.len(),
        path.display(),
        dict.duplicates()
    );
    Ok(dict)
}

pub fn parse_lemma_pairs(bytes: &[u8]) -> Result<Vec<(String, String)>, DictError> {
    let mut pairs = Vec::new();
    for (lineno, line) in lines(bytes) {
        let line = line?;
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let (key, lemma) = match fields.as_slice() {
            [word, lemma] => (word.to_string(), *lemma),
            [word, pos, lemma] => (format!("{word}/{pos}"), *lemma),
            other => {
                return Err(DictError::shape(format!(
                    "line {lineno}: expected 2 or 3 fields, got {}",
                    other.len()
                )));
            }
        };
        if fields[0].is_empty() {
            return Err(DictError::shape(format!("line {lineno}: key is empty")));
        }
        pairs.push((key, lemma.to_string()));
    }
    Ok(pairs)
}

pub fn parse_count_pairs(bytes: &[u8]) -> Result<Vec<(String, i64)>, DictError> {
    let mut pairs = Vec::new();
    for (lineno, line) in lines(bytes) {
        let line = line?;
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let [key, id] = fields.as_slice() else {
            return Err(DictError::shape(format!(
                "line {lineno}: expected 2 fields, got {}",
                fields.len()
            )));
        };
        if key.is_empty() {
            return Err(DictError::shape(format!("line {lineno}: key is empty")));
        }
        let id = id.trim().parse::<i64>().map_err(|e| {
            DictError::shape(format!("line {lineno}: invalid id {:?}: {e}", id.trim()))
        })?;
        pairs.push((key.to_string(), id));
    }
    Ok(pairs)
}

/// Non-blank lines with their 1-based line numbers.
fn lines(bytes: &[u8]) -> impl Iterator<Item = (usize, Result<&str, DictError>)> {
    bytes
        .split(|b| *b == b'\n')
        .enumerate()
        .map(|(idx, raw)| (idx + 1, strip_cr(raw)))
        .filter(|(_, raw)| !raw.iter().all(u8::is_ascii_whitespace))
        .map(|(lineno, raw)| {
            let line = std::str::from_utf8(raw)
                .map_err(|_| DictError::shape(format!("line {lineno}: invalid UTF-8")));
            (lineno, line)
        })
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer, DictError> {
    let io_err = |source| DictError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_err)?;
    match mode {
        // SAFETY: the mapping only lives for the duration of the parse.
        LoadMode::Mmap => unsafe { Mmap::map(&file) }
            .map(Buffer::Mmap)
            .map_err(io_err),
        LoadMode::Owned => {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf).map_err(io_err)?;
            Ok(Buffer::Owned(buf))
        }
    }
}
