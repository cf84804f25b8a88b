pub mod config;
pub mod crawler;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod links;
pub mod phrase;
pub mod result;

pub use config::ScraperConfig;
pub use crawler::{Crawler, PageSink, PageSource, ProgressCallback, SinkResult};
pub use document::Document;
pub use error::ScanError;
pub use fetcher::Fetcher;
pub use phrase::Phrase;
pub use result::{CrawlReport, CrawledPage};
