//! Minimal DOM query interface used by the extractor
//!
//! The extractor only ever needs five things from a parsed page: find
//! descendants by CSS selector, read text, read an attribute, list children
//! and list siblings. Keeping those behind [`Node`] lets the extraction rules
//! run against fixture documents without any network layer.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Read-only view of one element in a parsed document
pub trait Node: Sized {
    /// Descendant elements matching a CSS selector, in document order
    ///
    /// A selector that fails to parse matches nothing.
    fn query(&self, selector: &str) -> Vec<Self>;

    /// Concatenated text of this element and all its descendants
    fn text_content(&self) -> String;

    /// Value of an attribute, if present
    fn attr(&self, name: &str) -> Option<String>;

    /// Child elements, in document order
    fn element_children(&self) -> Vec<Self>;

    /// All other elements sharing this element's parent, in document order
    fn element_siblings(&self) -> Vec<Self>;

    /// Value of an attribute, or `default` when it is missing
    fn attr_or(&self, name: &str, default: &str) -> String {
        self.attr(name).unwrap_or_else(|| default.to_string())
    }
}

/// Text of every element matching `selector`, concatenated
pub fn select_text<N: Node>(node: &N, selector: &str) -> String {
    node.query(selector)
        .iter()
        .map(Node::text_content)
        .collect()
}

/// Attribute of the first element matching `selector`
///
/// Returns `default` when nothing matches or the first match lacks the
/// attribute; later matches are not consulted.
pub fn first_attr_or<N: Node>(node: &N, selector: &str, name: &str, default: &str) -> String {
    node.query(selector)
        .first()
        .map(|el| el.attr_or(name, default))
        .unwrap_or_else(|| default.to_string())
}

impl<'a> Node for ElementRef<'a> {
    fn query(&self, selector: &str) -> Vec<Self> {
        match Selector::parse(selector) {
            Ok(selector) => ElementRef::select(self, &selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn text_content(&self) -> String {
        ElementRef::text(self).collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn element_children(&self) -> Vec<Self> {
        self.children().filter_map(ElementRef::wrap).collect()
    }

    fn element_siblings(&self) -> Vec<Self> {
        let mut siblings: Vec<Self> = self.prev_siblings().filter_map(ElementRef::wrap).collect();
        siblings.reverse();
        siblings.extend(self.next_siblings().filter_map(ElementRef::wrap));
        siblings
    }
}

/// A fetched and parsed HTML page together with the URL it came from
#[derive(Debug)]
pub struct Page {
    pub url: Url,
    pub html: Html,
}

impl Page {
    /// Parses an HTML body; html5ever recovers from malformed markup, so this never fails
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(body),
        }
    }

    /// The `<html>` element, starting point for every query
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Resolves an href found on this page to an absolute URL string
    ///
    /// Absolute hrefs come back unchanged (modulo normalisation); an href
    /// that cannot be joined is returned as-is so the caller still records it.
    pub fn resolve(&self, href: &str) -> String {
        match self.url.join(href) {
            Ok(url) => url.to_string(),
            Err(_) => href.to_string(),
        }
    }
}
