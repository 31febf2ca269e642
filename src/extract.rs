/// Structural element lookup
///
/// This module handles:
/// - The minimal document-tree capability set (`Node`)
/// - Composable element predicates (`Query`, `FnPredicate`)
/// - Fail-fast lookup: `find_tag` never reports absence as `None`
///
/// Every extraction step downstream is written assuming its input exists,
/// so a missing element is always a `ParserError::TagNotFound`.
use crate::error::{ParserError, ParserResult};
use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

/// Minimal capability set the extractors need from a parsed document
pub trait Node: Clone + Sized {
    /// Element tag name, lowercase
    fn tag_name(&self) -> &str;

    /// Attribute value, if present
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Concatenated text of this element and all of its descendants
    fn text_content(&self) -> String;

    /// Descendant elements in document order, excluding `self`
    fn descendant_elements(&self) -> Box<dyn Iterator<Item = Self> + '_>;

    /// The next element at the same level, skipping text nodes
    fn next_element_sibling(&self) -> Option<Self>;

    /// First descendant matching `predicate`
    fn find_first<P: Predicate<Self> + ?Sized>(&self, predicate: &P) -> Option<Self> {
        self.descendant_elements().find(|node| predicate.matches(node))
    }

    /// All descendants matching `predicate`, at most `limit` of them
    fn find_all<P: Predicate<Self> + ?Sized>(&self, predicate: &P, limit: Option<usize>) -> Vec<Self> {
        let matches = self.descendant_elements().filter(|node| predicate.matches(node));
        match limit {
            Some(n) => matches.take(n).collect(),
            None => matches.collect(),
        }
    }

    /// First following sibling matching `predicate`
    fn find_next_sibling<P: Predicate<Self> + ?Sized>(&self, predicate: &P) -> Option<Self> {
        let mut current = self.next_element_sibling();
        while let Some(node) = current {
            if predicate.matches(&node) {
                return Some(node);
            }
            current = node.next_element_sibling();
        }
        None
    }
}

impl<'a> Node for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn descendant_elements(&self) -> Box<dyn Iterator<Item = Self> + '_> {
        Box::new(self.descendants().skip(1).filter_map(ElementRef::wrap))
    }

    fn next_element_sibling(&self) -> Option<Self> {
        self.next_siblings().find_map(ElementRef::wrap)
    }
}

/// Parse a full HTML page
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// A test over a single node, with a human-readable description used in errors
pub trait Predicate<N> {
    fn matches(&self, node: &N) -> bool;
    fn describe(&self) -> String;
}

/// Wraps an arbitrary closure as a predicate
pub struct FnPredicate<F> {
    description: String,
    test: F,
}

impl<F> FnPredicate<F> {
    pub fn new(description: impl Into<String>, test: F) -> Self {
        Self { description: description.into(), test }
    }
}

impl<N, F> Predicate<N> for FnPredicate<F>
where
    F: Fn(&N) -> bool,
{
    fn matches(&self, node: &N) -> bool {
        (self.test)(node)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

enum Filter<N> {
    AttrEquals { name: String, value: String },
    HasClass(String),
    AttrMatches { name: String, pattern: Regex },
    Custom(Box<dyn Predicate<N>>),
}

impl<N: Node> Filter<N> {
    fn matches(&self, node: &N) -> bool {
        match self {
            Filter::AttrEquals { name, value } => node.attribute(name) == Some(value.as_str()),
            Filter::HasClass(class) => node
                .attribute("class")
                .map(|classes| classes.split_whitespace().any(|c| c == class))
                .unwrap_or(false),
            Filter::AttrMatches { name, pattern } => {
                node.attribute(name).map(|v| pattern.is_match(v)).unwrap_or(false)
            }
            Filter::Custom(predicate) => predicate.matches(node),
        }
    }

    fn describe(&self) -> String {
        match self {
            Filter::AttrEquals { name, value } => format!("{}=\"{}\"", name, value),
            Filter::HasClass(class) => format!("class~=\"{}\"", class),
            Filter::AttrMatches { name, pattern } => format!("{}=/{}/", name, pattern.as_str()),
            Filter::Custom(predicate) => format!("[{}]", predicate.describe()),
        }
    }
}

/// Tag name plus attribute filters; all filters must hold
///
/// ```ignore
/// let query = Query::tag("a").attr_matches("href", PEP_HREF.clone());
/// let link = find_tag(&row, &query)?;
/// ```
pub struct Query<N> {
    tag: String,
    filters: Vec<Filter<N>>,
}

impl<N: Node> Query<N> {
    /// Match elements with this tag name
    pub fn tag(name: &str) -> Self {
        Self { tag: name.to_ascii_lowercase(), filters: Vec::new() }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.filters.push(Filter::AttrEquals { name: name.to_string(), value: value.to_string() });
        self
    }

    pub fn id(self, value: &str) -> Self {
        self.attr("id", value)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.filters.push(Filter::HasClass(class.to_string()));
        self
    }

    pub fn attr_matches(mut self, name: &str, pattern: Regex) -> Self {
        self.filters.push(Filter::AttrMatches { name: name.to_string(), pattern });
        self
    }

    /// Add an arbitrary test over the node
    pub fn filter<F>(mut self, description: &str, test: F) -> Self
    where
        F: Fn(&N) -> bool + 'static,
    {
        self.filters.push(Filter::Custom(Box::new(FnPredicate::new(description, test))));
        self
    }
}

impl<N: Node> Predicate<N> for Query<N> {
    fn matches(&self, node: &N) -> bool {
        if node.tag_name() != self.tag {
            return false;
        }
        self.filters.iter().all(|f| f.matches(node))
    }

    fn describe(&self) -> String {
        let mut parts = vec![self.tag.clone()];
        parts.extend(self.filters.iter().map(|f| f.describe()));
        format!("<{}>", parts.join(" "))
    }
}

fn not_found<N, P: Predicate<N> + ?Sized>(predicate: &P) -> ParserError {
    ParserError::TagNotFound { criteria: predicate.describe() }
}

/// Find the first descendant of `container` matching `predicate`, or fail
pub fn find_tag<N, P>(container: &N, predicate: &P) -> ParserResult<N>
where
    N: Node,
    P: Predicate<N> + ?Sized,
{
    container.find_first(predicate).ok_or_else(|| not_found(predicate))
}

/// Find the first following sibling of `node` matching `predicate`, or fail
pub fn find_next_sibling_tag<N, P>(node: &N, predicate: &P) -> ParserResult<N>
where
    N: Node,
    P: Predicate<N> + ?Sized,
{
    node.find_next_sibling(predicate).ok_or_else(|| not_found(predicate))
}

/// Attribute value of `node`, or `MissingAttribute`
pub fn require_attribute<'n, N: Node>(node: &'n N, name: &str) -> ParserResult<&'n str> {
    node.attribute(name).ok_or_else(|| ParserError::MissingAttribute {
        tag: node.tag_name().to_string(),
        attribute: name.to_string(),
    })
}

/// Join a relative link onto `base`
pub fn join_url(base: &Url, href: &str) -> ParserResult<Url> {
    base.join(href).map_err(|e| ParserError::InvalidLink { href: href.to_string(), reason: e.to_string() })
}

/// Resolve the `href` of `node` against `base`
pub fn resolve_href<N: Node>(node: &N, base: &Url) -> ParserResult<Url> {
    join_url(base, require_attribute(node, "href")?)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod extract_test;
