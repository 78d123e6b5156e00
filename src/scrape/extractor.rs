// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML content extraction
//!
//! Turns a raw page into cleaned main-content text. Never fails: anything
//! unparseable simply yields less (or no) text.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Subtrees that never hold page content
const NOISE_SELECTOR: &str =
    "script, style, noscript, nav, footer, header, iframe, svg, meta, link, template";

#[allow(clippy::expect_used)]
static CONTENT_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)job|posting|description|content").expect("valid regex"));

#[allow(clippy::expect_used)]
static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

#[allow(clippy::expect_used)]
static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));

/// Extract cleaned main-content text from HTML
///
/// Noise subtrees are removed first, then the first available of
/// `<main>`, `<article>`, an element with a job/content-like class,
/// `<body>`, or the whole document is serialized, one text node per line.
pub fn extract(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let mut document = Html::parse_document(html);
    strip_noise(&mut document);

    let text = match select_main(&document) {
        Some(element) => element_text(&element),
        None => element_text(&document.root_element()),
    };

    clean_text(&text)
}

/// Trimmed `<title>` text, if any
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn strip_noise(document: &mut Html) {
    let Ok(selector) = Selector::parse(NOISE_SELECTOR) else {
        return;
    };
    let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn select_main(document: &Html) -> Option<ElementRef<'_>> {
    for tag in ["main", "article"] {
        if let Some(element) = first_attached(document, tag) {
            return Some(element);
        }
    }

    if let Ok(selector) = Selector::parse("[class]") {
        let by_class = document.select(&selector).find(|el| {
            is_attached(document, el)
                && el
                    .value()
                    .attr("class")
                    .map(|class| CONTENT_CLASS_RE.is_match(class))
                    .unwrap_or(false)
        });
        if by_class.is_some() {
            return by_class;
        }
    }

    first_attached(document, "body")
}

fn first_attached<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find(|el| is_attached(document, el))
}

/// Detached noise subtrees stay in the arena and are still visited by
/// `select`, so candidates must reach the document root.
fn is_attached(document: &Html, element: &ElementRef<'_>) -> bool {
    let root = document.tree.root().id();
    element.ancestors().any(|node| node.id() == root)
}

/// Text nodes of `element`, trimmed, non-empty, one per line
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Control characters other than newline, CR and tab, plus the C1 range
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}'..='\u{9F}')
}

/// Normalize extracted text
///
/// Strips control and non-BMP characters, collapses 3+ newlines to two and
/// space/tab runs to one space, then trims.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let filtered: String = text
        .chars()
        .filter(|c| !is_stripped_control(*c) && (*c as u32) <= 0xFFFF)
        .collect();

    let collapsed = BLANK_LINES_RE.replace_all(&filtered, "\n\n");
    let collapsed = SPACE_RUN_RE.replace_all(&collapsed, " ");
    collapsed.trim().to_string()
}
