// Classification of raw hrefs into same-wiki article references

use crate::phrase::{Phrase, URL_SEPARATOR};
use percent_encoding::percent_decode_str;

/// Returns the part of `href` between the article prefix and the first
/// fragment/query marker, or `None` when `href` cannot be an article link.
fn article_segment<'a>(href: &'a str, prefix: &str) -> Option<&'a str> {
    let href = href.trim();
    if href.is_empty() || prefix.is_empty() {
        return None;
    }

    // Absolute and protocol-relative URLs point off-wiki
    if href.starts_with("//") || href.contains("://") {
        return None;
    }

    let rest = href.strip_prefix(prefix)?;
    let end = rest.find(['#', '?']).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// True iff `href` is an in-wiki article link under `prefix`.
///
/// Namespaced pages (`File:`, `Category:`, `Special:` ...) are rejected; the
/// colon check runs on the percent-decoded title so `File%3AX` is caught too.
pub fn is_article_href(href: &str, prefix: &str) -> bool {
    match article_segment(href, prefix) {
        Some(segment) if !segment.is_empty() => {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            !decoded.contains(':') && !decoded.trim().is_empty()
        }
        _ => false,
    }
}

/// Convert an article href into the phrase it names.
///
/// Returns `None` for anything [`is_article_href`] rejects.
pub fn href_to_phrase(href: &str, prefix: &str) -> Option<Phrase> {
    if !is_article_href(href, prefix) {
        return None;
    }
    let segment = article_segment(href, prefix)?;
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    let phrase = Phrase::new(&decoded.replace(URL_SEPARATOR, " "));
    (!phrase.is_empty()).then_some(phrase)
}
