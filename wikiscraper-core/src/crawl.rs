use crate::error::{CoreError, Result};
use crate::store::FrequencyStore;
use crate::words::count_text;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;
use wikiscraper_scanner::{
    CrawlReport, CrawledPage, Crawler, Fetcher, PageSink, Phrase, ProgressCallback, ScanError,
    ScraperConfig, SinkResult,
};

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub start: Phrase,
    pub max_depth: usize,
    pub delay: Duration,
    pub store_path: PathBuf,
    pub show_progress: bool,
}

/// Page sink that folds every page's words into the store file.
///
/// The store is saved after each page, so an aborted crawl keeps the counts
/// of every page processed before the failure.
pub struct StoreSink {
    path: PathBuf,
    store: FrequencyStore,
    pages: usize,
}

impl StoreSink {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = FrequencyStore::load(&path)?;
        Ok(Self {
            path,
            store,
            pages: 0,
        })
    }

    pub fn store(&self) -> &FrequencyStore {
        &self.store
    }

    pub fn pages_saved(&self) -> usize {
        self.pages
    }

    pub fn into_store(self) -> FrequencyStore {
        self.store
    }

    fn absorb(&mut self, text: &str) -> Result<()> {
        let merged = self.store.merge(&count_text(text));
        merged.save(&self.path)?;
        self.store = merged;
        self.pages += 1;
        Ok(())
    }
}

impl PageSink for StoreSink {
    fn on_page(&mut self, page: &CrawledPage) -> SinkResult {
        self.absorb(&page.text)?;
        debug!(
            "Merged '{}' into {} ({} distinct words)",
            page.phrase,
            self.path.display(),
            self.store.len()
        );
        Ok(())
    }
}

/// Outcome of a finished crawl.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub report: CrawlReport,
    pub store_path: PathBuf,
    pub distinct_words: usize,
    pub total_words: u64,
}

/// Crawl from `options.start`, merging every page into the store at
/// `options.store_path`.
pub async fn execute_crawl(config: ScraperConfig, options: CrawlOptions) -> Result<CrawlSummary> {
    let CrawlOptions {
        start,
        max_depth,
        delay,
        store_path,
        show_progress,
    } = options;

    if start.is_empty() {
        return Err(CoreError::Validation("phrase must not be empty".to_string()));
    }

    let article_prefix = config.article_prefix.clone();
    let fetcher = Fetcher::new(config)?;
    let mut sink = StoreSink::open(&store_path)?;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Starting crawl...");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let processed = Arc::new(AtomicUsize::new(0));
    let mut crawler = Crawler::new(fetcher, article_prefix)
        .with_max_depth(max_depth)
        .with_delay(delay);
    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let count_clone = processed.clone();
        let callback: ProgressCallback = Arc::new(move |phrase: &Phrase, depth: usize| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            pb_clone.set_message(format!(
                "Crawling '{}' (depth {})... {} pages",
                phrase, depth, count
            ));
        });
        crawler = crawler.with_progress_callback(callback);
    }

    let outcome = crawler.crawl(&start, &mut sink).await;

    if let Some(ref pb) = progress_bar {
        match outcome {
            Ok(ref report) => pb.finish_with_message(format!(
                "Crawl complete! {} pages processed",
                report.pages_processed()
            )),
            Err(_) => pb.abandon_with_message(format!(
                "Crawl aborted after {} pages",
                sink.pages_saved()
            )),
        }
    }

    let report = outcome.map_err(unwrap_sink_error)?;
    Ok(CrawlSummary {
        report,
        store_path,
        distinct_words: sink.store().len(),
        total_words: sink.store().total(),
    })
}

/// Store failures come back from the crawler boxed; surface them as
/// [`CoreError`] again.
fn unwrap_sink_error(error: ScanError) -> CoreError {
    match error {
        ScanError::Sink(inner) => match inner.downcast::<CoreError>() {
            Ok(core) => *core,
            Err(other) => CoreError::Scan(ScanError::Sink(other)),
        },
        other => CoreError::Scan(other),
    }
}
