use crate::phrase::Phrase;
use serde::Serialize;

/// One processed article, as handed to a page sink.
#[derive(Debug, Clone)]
pub struct CrawledPage {
    pub phrase: Phrase,
    pub depth: usize,
    /// Full article text.
    pub text: String,
    pub links_found: usize,
    pub links_queued: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitedPage {
    pub phrase: String,
    pub depth: usize,
    pub links_found: usize,
    pub links_queued: usize,
}

/// Summary of a finished crawl, pages in processing order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    pub pages: Vec<VisitedPage>,
}

impl CrawlReport {
    pub fn record(&mut self, page: &CrawledPage) {
        self.pages.push(VisitedPage {
            phrase: page.phrase.to_string(),
            depth: page.depth,
            links_found: page.links_found,
            links_queued: page.links_queued,
        });
    }

    pub fn pages_processed(&self) -> usize {
        self.pages.len()
    }

    pub fn max_depth_reached(&self) -> usize {
        self.pages.iter().map(|p| p.depth).max().unwrap_or(0)
    }

    pub fn phrases(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.phrase.as_str()).collect()
    }
}
