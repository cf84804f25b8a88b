use crate::CLAP_STYLING;
use clap::{arg, command};
use std::path::PathBuf;
use wikiscraper_core::store::DEFAULT_STORE_PATH;

fn store_arg() -> clap::Arg {
    arg!(--"store" <PATH>)
        .required(false)
        .help("Word count file to merge into (~ is expanded)")
        .default_value(DEFAULT_STORE_PATH)
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("wikiscraper")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wikiscraper")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(--"base-url" <URL>)
                .required(false)
                .global(true)
                .help("Wiki base URL (default: https://bulbapedia.bulbagarden.net)"),
        )
        .arg(
            arg!(--"config" <PATH>)
                .required(false)
                .global(true)
                .help("JSON scraper configuration file"),
        )
        .arg(
            arg!(--"use-local-html" <PATH>)
                .required(false)
                .global(true)
                .help("Read every article from this HTML file instead of the network")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .subcommand_required(true)
        .subcommand(
            command!("summary")
                .about("Print the first paragraph of an article")
                .arg(arg!(<PHRASE>).help("Article title, e.g. \"Team Rocket\"")),
        )
        .subcommand(
            command!("table")
                .about("Print a table of an article and the counts of its values")
                .arg(arg!(<PHRASE>).help("Article title"))
                .arg(
                    arg!(-n --"number" <N>)
                        .required(true)
                        .help("1-based table number within the article")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"first-row-is-header")
                        .required(false)
                        .help("Use the first table row as column labels")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("count-words")
                .about("Count the words of an article and merge them into the word count file")
                .arg(arg!(<PHRASE>).help("Article title"))
                .arg(store_arg()),
        )
        .subcommand(
            command!("crawl")
                .about(
                    "Follow article links breadth-first from a start article, merging every \
                page's words into the word count file.",
                )
                .arg(arg!(<PHRASE>).help("Start article title"))
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum link distance from the start article")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(-w --"wait" <SECONDS>)
                        .required(false)
                        .help("Pause between requests in seconds")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("1"),
                )
                .arg(store_arg()),
        )
        .subcommand(
            command!("analyze")
                .about("Compare word frequencies of the word count file with a reference language")
                .arg(
                    arg!(-m --"mode" <MODE>)
                        .required(true)
                        .help("Which words to compare: the article's or the language's most frequent")
                        .value_parser(["article", "language"]),
                )
                .arg(
                    arg!(-c --"count" <N>)
                        .required(true)
                        .help("Number of words to compare")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-l --"language" <CODE>)
                        .required(false)
                        .help("Reference language code")
                        .default_value("en"),
                )
                .arg(
                    arg!(--"corpus-dir" <DIR>)
                        .required(true)
                        .help("Directory of <code>.txt word frequency lists"),
                )
                .arg(store_arg()),
        )
}
