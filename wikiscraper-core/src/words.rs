use caseless::default_case_fold_str;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

/// Word → occurrence count, ordered by word.
pub type WordCounts = BTreeMap<String, u64>;

lazy_static! {
    // Letters and combining marks, optionally joined to one more run by an apostrophe.
    static ref WORD_RE: Regex = Regex::new(r"[\p{L}\p{M}]+(?:['’][\p{L}\p{M}]+)?").expect("valid regex");
}

/// Split text into case-folded word tokens, keeping order and duplicates.
///
/// Digits, underscores and punctuation never end up inside a token, so
/// `"R2-D2"` yields `["r", "d"]` and `"It's"` yields `["it's"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| default_case_fold_str(m.as_str()))
        .collect()
}

pub fn count_words<I, S>(words: I) -> WordCounts
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts = WordCounts::new();
    for word in words {
        *counts.entry(word.into()).or_insert(0) += 1;
    }
    counts
}

/// Tokenize and count in one pass.
pub fn count_text(text: &str) -> WordCounts {
    count_words(tokenize(text))
}
