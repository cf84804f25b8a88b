use std::fmt;

/// Separator used in place of spaces in article URL segments.
pub const URL_SEPARATOR: char = '_';

/// A human-readable article title with its whitespace canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phrase(String);

impl Phrase {
    pub fn new(raw: &str) -> Self {
        Phrase(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dedup key: two phrases name the same article iff their keys are equal.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    /// The phrase as it appears in an article path, e.g. `Team_Rocket`.
    pub fn url_segment(&self) -> String {
        normalize_phrase(&self.0)
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Phrase {
    fn from(raw: &str) -> Self {
        Phrase::new(raw)
    }
}

/// Trim, collapse whitespace runs and join the words with [`URL_SEPARATOR`].
pub fn normalize_phrase(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    for (i, word) in phrase.split_whitespace().enumerate() {
        if i > 0 {
            out.push(URL_SEPARATOR);
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phrase_replaces_spaces() {
        assert_eq!(normalize_phrase("Team Rocket"), "Team_Rocket");
        assert_eq!(normalize_phrase("  Team   Rocket  "), "Team_Rocket");
        assert_eq!(normalize_phrase(""), "");
    }

    #[test]
    fn test_phrase_key_ignores_case_and_spacing() {
        let a = Phrase::new("Team  Rocket");
        let b = Phrase::new(" team rocket\t");
        assert_eq!(a.key(), b.key());
        assert_eq!(a.as_str(), "Team Rocket");
    }

    #[test]
    fn test_phrase_url_segment() {
        assert_eq!(Phrase::new("Jessie's cat").url_segment(), "Jessie's_cat");
    }
}
