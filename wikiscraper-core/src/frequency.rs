// Article vs. language relative word frequencies

use crate::corpus::LanguageCorpus;
use crate::error::{CoreError, Result};
use crate::store::FrequencyStore;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_LANGUAGE_CODE: &str = "en";
pub const DEFAULT_LANGUAGE_TOP_K: usize = 50_000;
/// The reference list is never shorter than this.
pub const MIN_REFERENCE_WORDS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Most frequent words of the crawled articles.
    Article,
    /// Most frequent words of the reference language.
    Language,
}

impl FromStr for AnalysisMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "article" => Ok(AnalysisMode::Article),
            "language" => Ok(AnalysisMode::Language),
            other => Err(CoreError::Validation(format!(
                "mode must be 'article' or 'language', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Article => write!(f, "article"),
            AnalysisMode::Language => write!(f, "language"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub language_code: String,
    pub mode: String,
    pub count: usize,
    pub language_top_k: usize,
}

impl AnalysisRequest {
    pub fn new(language_code: impl Into<String>, mode: impl Into<String>, count: usize) -> Self {
        Self {
            language_code: language_code.into(),
            mode: mode.into(),
            count,
            language_top_k: DEFAULT_LANGUAGE_TOP_K,
        }
    }

    pub fn with_language_top_k(mut self, top_k: usize) -> Self {
        self.language_top_k = top_k;
        self
    }

    fn reference_size(&self) -> usize {
        MIN_REFERENCE_WORDS.max(self.count).max(self.language_top_k)
    }
}

/// One word with its normalized article and language frequencies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub word: String,
    pub article: Option<f64>,
    pub language: Option<f64>,
}

/// Compare store counts with the reference language.
///
/// Both columns are scaled so their largest value is 1.0; words missing from
/// one side keep `None` there.
pub fn analyze<C: LanguageCorpus + ?Sized>(
    store: &FrequencyStore,
    corpus: &C,
    request: &AnalysisRequest,
) -> Result<Vec<ComparisonRow>> {
    let mode: AnalysisMode = request.mode.parse()?;
    if request.count == 0 {
        return Err(CoreError::Validation("count must be positive".to_string()));
    }
    if store.is_empty() {
        return Err(CoreError::EmptyInput(
            "the word count store is empty; count or crawl some articles first".to_string(),
        ));
    }

    let code = request.language_code.as_str();
    let reference = corpus.top_n(code, request.reference_size())?;
    let in_reference: HashSet<&str> = reference.iter().map(String::as_str).collect();
    debug!(
        "Analyzing {} words in {} mode against {} '{}' reference words",
        request.count,
        mode,
        reference.len(),
        code
    );

    let words: Vec<String> = match mode {
        AnalysisMode::Article => top_store_words(store, request.count),
        AnalysisMode::Language => reference.iter().take(request.count).cloned().collect(),
    };

    let mut article = Vec::with_capacity(words.len());
    let mut language = Vec::with_capacity(words.len());
    for word in &words {
        article.push(store.get(word).map(|count| count as f64));
        language.push(if in_reference.contains(word.as_str()) {
            corpus.frequency(word, code)?
        } else {
            None
        });
    }
    normalize(&mut article);
    normalize(&mut language);

    Ok(words
        .into_iter()
        .zip(article.into_iter().zip(language))
        .map(|(word, (article, language))| ComparisonRow {
            word,
            article,
            language,
        })
        .collect())
}

/// Highest counts first, ties alphabetical.
fn top_store_words(store: &FrequencyStore, count: usize) -> Vec<String> {
    let mut entries: Vec<(&String, &u64)> = store.counts().iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(count)
        .map(|(word, _)| word.clone())
        .collect()
}

/// Divide every present value by the largest one. Left untouched when there
/// is nothing to scale by.
pub fn normalize(values: &mut [Option<f64>]) {
    let max = values.iter().flatten().copied().fold(None, |max: Option<f64>, v| {
        Some(max.map_or(v, |m| m.max(v)))
    });
    let Some(max) = max.filter(|m| *m > 0.0) else {
        return;
    };
    for value in values.iter_mut().flatten() {
        *value /= max;
    }
}
