// Reference language word frequencies

use crate::error::{CoreError, Result};
use caseless::default_case_fold_str;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;

/// Source of per-language word frequencies.
pub trait LanguageCorpus {
    /// The `count` most frequent words of a language, most frequent first.
    fn top_n(&self, language_code: &str, count: usize) -> Result<Vec<String>>;

    /// Frequency of `word` in the language, `None` if the word is unknown.
    fn frequency(&self, word: &str, language_code: &str) -> Result<Option<f64>>;
}

#[derive(Debug, Default)]
struct LanguageTable {
    ranked: Vec<(String, f64)>,
    lookup: HashMap<String, f64>,
}

/// Word lists stored as `<dir>/<code>.txt`, one `word frequency` pair per line.
///
/// Blank lines and lines starting with `#` are ignored. A language is read the
/// first time it is asked for and then kept in memory.
pub struct FileCorpus {
    dir: PathBuf,
    cache: RefCell<HashMap<String, Rc<LanguageTable>>>,
}

impl FileCorpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn language(&self, code: &str) -> Result<Rc<LanguageTable>> {
        if let Some(table) = self.cache.borrow().get(code) {
            return Ok(table.clone());
        }
        let table = Rc::new(self.load(code)?);
        self.cache.borrow_mut().insert(code.to_string(), table.clone());
        Ok(table)
    }

    fn load(&self, code: &str) -> Result<LanguageTable> {
        let valid_code = !code.is_empty()
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_code {
            return Err(CoreError::Corpus(format!("Invalid language code '{}'", code)));
        }

        let path = self.dir.join(format!("{}.txt", code));
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CoreError::Corpus(format!(
                    "Unknown language '{}' (no {})",
                    code,
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let table = parse_word_list(&raw).map_err(|reason| {
            CoreError::Corpus(format!("{}: {}", path.display(), reason))
        })?;
        debug!("Loaded {} reference words for '{}'", table.ranked.len(), code);
        Ok(table)
    }
}

impl LanguageCorpus for FileCorpus {
    fn top_n(&self, language_code: &str, count: usize) -> Result<Vec<String>> {
        let table = self.language(language_code)?;
        Ok(table
            .ranked
            .iter()
            .take(count)
            .map(|(word, _)| word.clone())
            .collect())
    }

    fn frequency(&self, word: &str, language_code: &str) -> Result<Option<f64>> {
        let table = self.language(language_code)?;
        Ok(table.lookup.get(word).copied())
    }
}

fn parse_word_list(raw: &str) -> std::result::Result<LanguageTable, String> {
    let mut table = LanguageTable::default();
    for (number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(word), Some(frequency), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(format!("line {}: expected 'word frequency'", number + 1));
        };
        let frequency: f64 = frequency
            .parse()
            .ok()
            .filter(|f: &f64| f.is_finite() && *f >= 0.0)
            .ok_or_else(|| format!("line {}: invalid frequency '{}'", number + 1, frequency))?;

        let word = default_case_fold_str(word);
        if table.lookup.contains_key(&word) {
            continue;
        }
        table.lookup.insert(word.clone(), frequency);
        table.ranked.push((word, frequency));
    }
    // Stable: equal frequencies keep file order
    table.ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(table)
}
