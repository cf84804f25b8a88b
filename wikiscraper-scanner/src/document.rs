use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    /// Article containers, most preferred first.
    static ref ROOT_SELECTORS: Vec<Selector> = [
        "div.mw-content-ltr",
        "div#mw-content-text",
        "div.mw-parser-output",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("valid selector"))
    .collect();
    static ref PARSER_OUTPUT: Selector = Selector::parse("div.mw-parser-output").expect("valid selector");
    static ref BODY: Selector = Selector::parse("body").expect("valid selector");
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("valid selector");
    static ref LINK: Selector = Selector::parse("a[href]").expect("valid selector");
    static ref TABLE: Selector = Selector::parse("table").expect("valid selector");
}

/// Elements whose text never counts as article content.
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// A parsed wiki page.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Resolve the article root.
    ///
    /// Each container selector is tried in order and the first hit wins; its
    /// inner `div.mw-parser-output` is preferred when it has one. Without any
    /// container the body is used, then the whole document.
    pub fn root(&self) -> ElementRef<'_> {
        for selector in ROOT_SELECTORS.iter() {
            if let Some(candidate) = self.html.select(selector).next() {
                return candidate.select(&PARSER_OUTPUT).next().unwrap_or(candidate);
            }
        }
        self.html
            .select(&BODY)
            .next()
            .unwrap_or_else(|| self.html.root_element())
    }

    /// Text of the first paragraph with visible content, or an empty string.
    pub fn first_paragraph_text(&self) -> String {
        self.root()
            .select(&PARAGRAPH)
            .map(element_text)
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    /// All text under the article root, collapsed to single spaces.
    pub fn full_text(&self) -> String {
        element_text(self.root())
    }

    /// Every non-empty `href` under the article root, in document order.
    pub fn links(&self) -> Vec<String> {
        self.root()
            .select(&LINK)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| !href.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Tables under the article root in document order.
    pub fn tables(&self) -> Vec<ElementRef<'_>> {
        self.root().select(&TABLE).collect()
    }
}

/// Text of `element`: every text node trimmed and collapsed, empty ones
/// dropped, the rest joined by a single space.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let inside_non_content = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| NON_CONTENT_ELEMENTS.contains(&e.name()))
        });
        if inside_non_content {
            continue;
        }
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            parts.push(collapsed);
        }
    }
    parts.join(" ")
}
