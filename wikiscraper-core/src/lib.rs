pub mod article;
pub mod corpus;
pub mod crawl;
pub mod error;
pub mod frequency;
pub mod report;
pub mod store;
pub mod tables;
pub mod words;

pub use corpus::{FileCorpus, LanguageCorpus};
pub use error::{CoreError, Result};
pub use frequency::{AnalysisMode, AnalysisRequest, ComparisonRow, analyze};
pub use store::FrequencyStore;
pub use tables::{TableExtraction, TableGrid, ValueCount};
pub use words::{WordCounts, count_words, tokenize};
