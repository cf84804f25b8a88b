// Persistent word frequency index

use crate::error::{CoreError, Result};
use crate::words::WordCounts;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_STORE_PATH: &str = "word-counts.json";

/// Word → count mapping persisted as a sorted JSON object.
///
/// Counts only ever grow: the store changes through [`FrequencyStore::merge`]
/// and merging is commutative and associative per word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyStore {
    counts: WordCounts,
}

impl FrequencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };

        let malformed = |reason: String| CoreError::Format {
            path: path.to_path_buf(),
            reason,
        };

        let value: Value = serde_json::from_str(&raw).map_err(|e| malformed(e.to_string()))?;
        let Value::Object(entries) = value else {
            return Err(malformed("expected a JSON object".to_string()));
        };

        let mut counts = WordCounts::new();
        for (word, count) in entries {
            let count = count
                .as_u64()
                .ok_or_else(|| malformed(format!("count for '{}' is not a non-negative integer", word)))?;
            counts.insert(word, count);
        }
        debug!("Loaded {} words from {}", counts.len(), path.display());
        Ok(Self { counts })
    }

    /// Add `new_counts` on top of this store, returning the combined store.
    pub fn merge(&self, new_counts: &WordCounts) -> Self {
        let mut counts = self.counts.clone();
        for (word, count) in new_counts {
            let total = counts.entry(word.clone()).or_insert(0);
            *total = total.saturating_add(*count);
        }
        Self { counts }
    }

    /// Write the store as pretty, key-sorted, ASCII-only JSON with a trailing
    /// newline. The file is replaced atomically through a sibling temp file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let bytes = self.to_json_bytes()?;
        let tmp_path = temp_path(path);
        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_data()?;
        drop(file);
        fs::rename(&tmp_path, path)?;

        debug!("Saved {} words to {}", self.counts.len(), path.display());
        Ok(())
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter::new());
        self.counts.serialize(&mut serializer)?;
        out.push(b'\n');
        Ok(out)
    }

    pub fn counts(&self) -> &WordCounts {
        &self.counts
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.counts.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl From<WordCounts> for FrequencyStore {
    fn from(counts: WordCounts) -> Self {
        Self { counts }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Pretty printer (two-space indent) that escapes every non-ASCII character
/// as `\uXXXX`, using surrogate pairs outside the BMP.
struct AsciiFormatter {
    inner: PrettyFormatter<'static>,
}

impl AsciiFormatter {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for AsciiFormatter {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}
