use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use wikiscraper_core::article::{count_article_words, fetch_summary, fetch_table};
use wikiscraper_core::crawl::{CrawlOptions, execute_crawl};
use wikiscraper_core::report::{
    render_comparison, render_crawl_report, render_grid, render_value_counts, render_word_count,
};
use wikiscraper_core::{AnalysisRequest, FileCorpus, FrequencyStore, analyze};
use wikiscraper_scanner::{Fetcher, Phrase, ScraperConfig};

/// Expand `~` and environment variables in a user supplied path.
///
/// A reference to an unset variable leaves the variables unexpanded and only
/// `~` is resolved.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            debug!("Not expanding variables in {}: {}", raw, e);
            PathBuf::from(shellexpand::tilde(raw).as_ref())
        }
    }
}

/// Read a JSON scraper configuration; fields it leaves out take their defaults.
pub fn load_config(path: &Path) -> Result<ScraperConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: ScraperConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    debug!("Loaded scraper config from {}", path.display());
    Ok(config)
}

/// Scraper configuration from `--config`, with `--base-url` and
/// `--use-local-html` applied on top.
pub fn build_config(matches: &ArgMatches) -> Result<ScraperConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => load_config(&expand_path(path))?,
        None => ScraperConfig::default(),
    };
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(local) = matches.get_one::<PathBuf>("use-local-html") {
        config = config.with_local_html(expand_path(&local.to_string_lossy()));
    }
    Ok(config)
}

fn phrase_arg(args: &ArgMatches) -> Result<Phrase> {
    let phrase = Phrase::new(args.get_one::<String>("PHRASE").map(String::as_str).unwrap_or_default());
    if phrase.is_empty() {
        bail!("Phrase must not be empty");
    }
    Ok(phrase)
}

fn store_arg(args: &ArgMatches) -> PathBuf {
    let raw = args
        .get_one::<String>("store")
        .map(String::as_str)
        .unwrap_or(wikiscraper_core::store::DEFAULT_STORE_PATH);
    expand_path(raw)
}

pub fn print_banner() {
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!(
        "{} {}",
        "  WIKISCRAPER".bright_white().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub async fn handle_summary(config: ScraperConfig, args: &ArgMatches) -> Result<()> {
    let phrase = phrase_arg(args)?;
    let fetcher = Fetcher::new(config)?;
    let summary = fetch_summary(&fetcher, &phrase).await?;
    println!("{}", summary);
    Ok(())
}

pub async fn handle_table(config: ScraperConfig, args: &ArgMatches) -> Result<()> {
    let phrase = phrase_arg(args)?;
    let number = args.get_one::<usize>("number").copied().unwrap_or(1);
    let first_row_is_header = args.get_flag("first-row-is-header");

    let fetcher = Fetcher::new(config)?;
    let extraction = fetch_table(&fetcher, &phrase, number, first_row_is_header).await?;

    println!("{}", format!("Table {} of '{}'", number, phrase).bright_white().bold());
    print!("{}", render_grid(&extraction.grid));
    println!();
    println!("{}", "Value counts".bright_white().bold());
    print!("{}", render_value_counts(&extraction.value_counts));
    Ok(())
}

pub async fn handle_count_words(config: ScraperConfig, args: &ArgMatches) -> Result<()> {
    let phrase = phrase_arg(args)?;
    let store_path = store_arg(args);
    let fetcher = Fetcher::new(config)?;
    let outcome = count_article_words(&fetcher, &phrase, &store_path).await?;
    print!("{} {}", "✓".green().bold(), render_word_count(&outcome));
    Ok(())
}

/// Inter-request pause from a `--wait` value in seconds.
pub fn parse_wait(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .with_context(|| format!("Invalid wait time: {} (must be a non-negative number of seconds)", seconds))
}

pub async fn handle_crawl(config: ScraperConfig, args: &ArgMatches, quiet: bool) -> Result<()> {
    let start = phrase_arg(args)?;
    let max_depth = args.get_one::<usize>("depth").copied().unwrap_or(1);
    let delay = parse_wait(args.get_one::<f64>("wait").copied().unwrap_or(1.0))?;
    let store_path = store_arg(args);

    if !quiet {
        println!("\n{} Crawling '{}'", "→".blue(), start.to_string().bright_white());
        println!("Max depth: {}", max_depth);
        println!("Wait: {:?}", delay);
        println!("Store: {}\n", store_path.display());
    }

    let summary = execute_crawl(
        config,
        CrawlOptions {
            start,
            max_depth,
            delay,
            store_path,
            show_progress: !quiet,
        },
    )
    .await?;

    println!("\n{} Crawl complete!\n", "✓".green().bold());
    print!("{}", render_crawl_report(&summary));
    Ok(())
}

pub fn handle_analyze(args: &ArgMatches) -> Result<()> {
    let mode = args
        .get_one::<String>("mode")
        .context("--mode is required")?;
    let count = args.get_one::<usize>("count").copied().context("--count is required")?;
    let language = args
        .get_one::<String>("language")
        .map(String::as_str)
        .unwrap_or(wikiscraper_core::frequency::DEFAULT_LANGUAGE_CODE);
    let corpus_dir = args
        .get_one::<String>("corpus-dir")
        .context("--corpus-dir is required")?;

    let store = FrequencyStore::load(&store_arg(args))?;
    let corpus = FileCorpus::new(expand_path(corpus_dir));
    let rows = analyze(&store, &corpus, &AnalysisRequest::new(language, mode.as_str(), count))?;

    print!("{}", render_comparison(&rows));
    Ok(())
}

/// Run the subcommand selected in `matches`.
pub async fn dispatch(matches: &ArgMatches) -> Result<()> {
    let quiet = matches.get_flag("quiet");
    if !quiet {
        print_banner();
    }

    match matches.subcommand() {
        Some(("summary", sub)) => handle_summary(build_config(sub)?, sub).await,
        Some(("table", sub)) => handle_table(build_config(sub)?, sub).await,
        Some(("count-words", sub)) => handle_count_words(build_config(sub)?, sub).await,
        Some(("crawl", sub)) => handle_crawl(build_config(sub)?, sub, quiet).await,
        Some(("analyze", sub)) => handle_analyze(sub),
        _ => bail!("No command given; see --help"),
    }
}
