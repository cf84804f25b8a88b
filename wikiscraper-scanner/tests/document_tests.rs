// Tests for document extraction and link classification on a saved article

use wikiscraper_scanner::Document;
use wikiscraper_scanner::links::{href_to_phrase, is_article_href};

const FIXTURE: &str = include_str!("../../fixtures/team_rocket_minimal.html");

#[test]
fn test_first_paragraph_skips_empty_paragraphs() {
    let document = Document::parse(FIXTURE);
    assert_eq!(
        document.first_paragraph_text(),
        "Team Rocket is a villainous team led by Giovanni that operates in Kanto and Johto as well as the Sevii Islands."
    );
}

#[test]
fn test_full_text_is_limited_to_article_root() {
    let text = Document::parse(FIXTURE).full_text();
    assert!(text.starts_with("Team Rocket Leader Giovanni"));
    assert!(text.contains("It's Team Rocket's motto!"));
    assert!(!text.contains("Main Page"));
    assert!(!text.contains("not article text"));
    assert!(!text.contains("  "));
}

#[test]
fn test_links_and_tables_come_from_article_root() {
    let document = Document::parse(FIXTURE);
    let links = document.links();
    assert_eq!(links.len(), 11);
    assert!(!links.iter().any(|l| l.contains("Main_Page")));
    assert_eq!(document.tables().len(), 4);
}

#[test]
fn test_article_phrases_in_fixture() {
    let document = Document::parse(FIXTURE);
    let mut phrases: Vec<String> = Vec::new();
    for href in document.links() {
        if let Some(phrase) = href_to_phrase(&href, "/wiki/")
            && !phrases.contains(&phrase.to_string())
        {
            phrases.push(phrase.to_string());
        }
    }
    assert_eq!(phrases, vec!["Giovanni", "Kanto", "Johto", "Jessie", "James (anime)"]);

    let rejected: Vec<String> = document
        .links()
        .into_iter()
        .filter(|href| !is_article_href(href, "/wiki/"))
        .collect();
    assert_eq!(rejected.len(), 4);
}

#[test]
fn test_href_to_phrase_examples() {
    assert_eq!(
        href_to_phrase("/wiki/Jessie%27s_cat#Section", "/wiki/").unwrap().as_str(),
        "Jessie's cat"
    );
    assert_eq!(href_to_phrase("/wiki/Special:Random", "/wiki/"), None);
    assert_eq!(
        href_to_phrase("/wiki/Team__Rocket_", "/wiki/").unwrap().as_str(),
        "Team Rocket"
    );
}

#[test]
fn test_page_without_containers_uses_body() {
    let document = Document::parse("<html><body><p>Plain page</p><table><tr><td>1</td></tr></table></body></html>");
    assert_eq!(document.first_paragraph_text(), "Plain page");
    assert_eq!(document.tables().len(), 1);
}
