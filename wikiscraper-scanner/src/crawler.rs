use crate::document::Document;
use crate::error::{Result, ScanError};
use crate::links::href_to_phrase;
use crate::phrase::Phrase;
use crate::result::{CrawlReport, CrawledPage};
use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Called with each phrase and its distance as it starts processing.
pub type ProgressCallback = Arc<dyn Fn(&Phrase, usize) + Send + Sync>;

/// Outcome of handing a page to a [`PageSink`].
pub type SinkResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Anything that can turn a phrase into raw article markup.
pub trait PageSource {
    fn fetch_page(&self, phrase: &Phrase) -> impl Future<Output = Result<String>>;
}

/// Receives every processed page, in processing order.
///
/// An error aborts the crawl; pages already handed over stay handed over.
pub trait PageSink {
    fn on_page(&mut self, page: &CrawledPage) -> SinkResult;
}

/// Breadth-first crawler over in-wiki article links.
///
/// Pages are processed strictly one at a time: every distance-`d` phrase is
/// fetched and handed to the sink before any distance-`d + 1` phrase, and a
/// failed fetch ends the whole crawl.
pub struct Crawler<S> {
    source: S,
    article_prefix: String,
    max_depth: usize,
    delay: Duration,
    progress_callback: Option<ProgressCallback>,
}

impl<S: PageSource> Crawler<S> {
    pub fn new(source: S, article_prefix: impl Into<String>) -> Self {
        Self {
            source,
            article_prefix: article_prefix.into(),
            max_depth: 1,
            delay: Duration::from_secs(1),
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Pause between two consecutive pages.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub async fn crawl<K: PageSink>(&self, start: &Phrase, sink: &mut K) -> Result<CrawlReport> {
        info!(
            "Starting crawl of '{}' (max depth {}, delay {:?})",
            start, self.max_depth, self.delay
        );

        let mut frontier: VecDeque<(Phrase, usize)> = VecDeque::new();
        let mut discovered: HashSet<String> = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut report = CrawlReport::default();

        discovered.insert(start.key());
        frontier.push_back((start.clone(), 0));

        while let Some((phrase, depth)) = frontier.pop_front() {
            if !visited.insert(phrase.key()) {
                debug!("Skipping already visited '{}'", phrase);
                continue;
            }

            if let Some(ref callback) = self.progress_callback {
                callback(&phrase, depth);
            }

            let markup = self.source.fetch_page(&phrase).await?;
            let (text, links) = extract_page(&markup);

            let mut queued = 0;
            if depth < self.max_depth {
                for href in &links {
                    let Some(next) = href_to_phrase(href, &self.article_prefix) else {
                        continue;
                    };
                    let key = next.key();
                    if visited.contains(&key) || !discovered.insert(key) {
                        continue;
                    }
                    frontier.push_back((next, depth + 1));
                    queued += 1;
                }
            }
            debug!(
                "'{}' (depth {}): {} links, {} newly queued, frontier {}",
                phrase,
                depth,
                links.len(),
                queued,
                frontier.len()
            );

            let page = CrawledPage {
                phrase,
                depth,
                text,
                links_found: links.len(),
                links_queued: queued,
            };
            sink.on_page(&page).map_err(ScanError::Sink)?;
            report.record(&page);

            if !frontier.is_empty() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!("Crawl complete. Processed {} pages", report.pages_processed());
        Ok(report)
    }
}

/// Full text and outbound links of a page. The parsed document is dropped
/// before returning so it is never held across an await point.
fn extract_page(markup: &str) -> (String, Vec<String>) {
    let document = Document::parse(markup);
    (document.full_text(), document.links())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapSource(HashMap<String, String>);

    impl PageSource for MapSource {
        async fn fetch_page(&self, phrase: &Phrase) -> Result<String> {
            self.0
                .get(phrase.as_str())
                .cloned()
                .ok_or_else(|| ScanError::FetchStatus {
                    url: phrase.url_segment(),
                    status: 404,
                })
        }
    }

    #[derive(Default)]
    struct Collect(Vec<(String, usize)>);

    impl PageSink for Collect {
        fn on_page(&mut self, page: &CrawledPage) -> SinkResult {
            self.0.push((page.phrase.to_string(), page.depth));
            Ok(())
        }
    }

    fn page(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|l| format!(r#"<a href="/wiki/{}">{}</a>"#, l, l))
            .collect();
        format!("<html><body><p>text {}</p></body></html>", anchors)
    }

    #[tokio::test]
    async fn test_depth_zero_processes_only_start() {
        let mut pages = HashMap::new();
        pages.insert("Start".to_string(), page(&["A", "B"]));
        let crawler = Crawler::new(MapSource(pages), "/wiki/")
            .with_max_depth(0)
            .with_delay(Duration::ZERO);

        let mut sink = Collect::default();
        let report = crawler.crawl(&Phrase::new("Start"), &mut sink).await.unwrap();
        assert_eq!(report.pages_processed(), 1);
        assert_eq!(sink.0, vec![("Start".to_string(), 0)]);
    }

    #[tokio::test]
    async fn test_progress_callback_sees_every_page() {
        let mut pages = HashMap::new();
        pages.insert("Start".to_string(), page(&["A"]));
        pages.insert("A".to_string(), page(&[]));

        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let crawler = Crawler::new(MapSource(pages), "/wiki/")
            .with_delay(Duration::ZERO)
            .with_progress_callback(Arc::new(move |phrase: &Phrase, depth: usize| {
                seen_clone.lock().unwrap().push(format!("{}@{}", phrase, depth));
            }));

        crawler
            .crawl(&Phrase::new("Start"), &mut Collect::default())
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["Start@0", "A@1"]);
    }
}
