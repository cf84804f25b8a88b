// Single-article operations: summary, word count, table

use crate::error::{CoreError, Result};
use crate::store::FrequencyStore;
use crate::tables::{TableExtraction, extract_table, get_nth_table};
use crate::words::count_text;
use std::path::{Path, PathBuf};
use tracing::info;
use wikiscraper_scanner::{Document, Fetcher, Phrase};

/// Result of merging one article into the store.
#[derive(Debug, Clone)]
pub struct ArticleWordCount {
    pub phrase: Phrase,
    pub store_path: PathBuf,
    /// Tokens found in the article.
    pub article_words: u64,
    pub article_distinct: usize,
    /// Distinct words in the store after the merge.
    pub store_distinct: usize,
}

fn require_phrase(phrase: &Phrase) -> Result<()> {
    if phrase.is_empty() {
        return Err(CoreError::Validation("phrase must not be empty".to_string()));
    }
    Ok(())
}

async fn fetch_markup(fetcher: &Fetcher, phrase: &Phrase) -> Result<String> {
    require_phrase(phrase)?;
    Ok(fetcher.fetch(phrase).await?)
}

/// First non-empty paragraph of the article.
pub async fn fetch_summary(fetcher: &Fetcher, phrase: &Phrase) -> Result<String> {
    let markup = fetch_markup(fetcher, phrase).await?;
    let summary = Document::parse(&markup).first_paragraph_text();
    if summary.is_empty() {
        return Err(CoreError::EmptyContent(format!("no summary found for '{}'", phrase)));
    }
    Ok(summary)
}

/// Count the words of one article and merge them into the store at `store_path`.
pub async fn count_article_words(
    fetcher: &Fetcher,
    phrase: &Phrase,
    store_path: &Path,
) -> Result<ArticleWordCount> {
    let markup = fetch_markup(fetcher, phrase).await?;
    let counts = count_text(&Document::parse(&markup).full_text());

    let store = FrequencyStore::load(store_path)?.merge(&counts);
    store.save(store_path)?;
    info!(
        "Merged {} distinct words from '{}' into {}",
        counts.len(),
        phrase,
        store_path.display()
    );

    Ok(ArticleWordCount {
        phrase: phrase.clone(),
        store_path: store_path.to_path_buf(),
        article_words: counts.values().sum(),
        article_distinct: counts.len(),
        store_distinct: store.len(),
    })
}

/// Extract the `number`-th (1-based) table of the article.
pub async fn fetch_table(
    fetcher: &Fetcher,
    phrase: &Phrase,
    number: usize,
    first_row_is_header: bool,
) -> Result<TableExtraction> {
    let markup = fetch_markup(fetcher, phrase).await?;
    table_from_markup(&markup, number, first_row_is_header)
}

pub fn table_from_markup(markup: &str, number: usize, first_row_is_header: bool) -> Result<TableExtraction> {
    let document = Document::parse(markup);
    let tables = document.tables();
    let table = get_nth_table(&tables, number)?;
    extract_table(table, first_row_is_header)
}
