use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt};
use wikiscraper::{command_argument_builder, dispatch};

#[tokio::main]
async fn main() {
    // Library logs go to stderr; RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let matches = command_argument_builder().get_matches();

    if let Err(e) = dispatch(&matches).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
