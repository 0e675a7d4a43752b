//! Table cells and their markup.
//!
//! A cell keeps its content as a small node tree (text and elements with
//! attributes), enough for sort extraction to see image alternative text,
//! icon labels and machine-readable timestamps. The [`CellMarkup`] trait is
//! the seam extraction reads through.

use super::value::SortValue;

/// A node of cell content.
#[derive(Debug, Clone, PartialEq)]
pub enum CellNode {
    /// A run of text.
    Text(String),
    /// An element such as `<span>` or `<img>`.
    Element(Element),
}

impl CellNode {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl From<Element> for CellNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An element inside a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<CellNode>,
}

impl Element {
    /// Create an element. Tag names are stored lowercase.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into().to_ascii_lowercase(), value.into()));
        self
    }

    /// Add a child node.
    pub fn child(mut self, node: impl Into<CellNode>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Add a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(CellNode::text(text))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[CellNode] {
        &self.children
    }
}

/// Read access to cell markup used by sort extraction.
pub trait CellMarkup {
    /// Concatenated text of all descendant text nodes, untrimmed.
    fn text_content(&self) -> String;

    /// Alternative text of every image, in document order.
    ///
    /// `None` when the content has no images; an image without `alt`
    /// contributes an empty string.
    fn image_alts(&self) -> Option<Vec<String>>;

    /// `aria-label` (preferred) or `title` of each `a`, `span` and `i`
    /// element in document order, skipping elements that carry neither.
    fn inline_labels(&self) -> Vec<String>;

    /// The `datetime` attribute of the first `<time>` element.
    fn machine_timestamp(&self) -> Option<&str>;
}

/// The markup content of a cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellContent {
    nodes: Vec<CellNode>,
}

impl CellContent {
    pub fn new(nodes: Vec<CellNode>) -> Self {
        Self { nodes }
    }

    /// Content made of a single text node.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            nodes: vec![CellNode::text(text)],
        }
    }

    pub fn nodes(&self) -> &[CellNode] {
        &self.nodes
    }

    /// Depth-first walk over every element.
    fn elements(&self) -> Vec<&Element> {
        fn walk<'a>(nodes: &'a [CellNode], out: &mut Vec<&'a Element>) {
            for node in nodes {
                if let CellNode::Element(element) = node {
                    out.push(element);
                    walk(&element.children, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }
}

impl CellMarkup for CellContent {
    fn text_content(&self) -> String {
        fn walk(nodes: &[CellNode], out: &mut String) {
            for node in nodes {
                match node {
                    CellNode::Text(text) => out.push_str(text),
                    CellNode::Element(element) => walk(&element.children, out),
                }
            }
        }

        let mut out = String::new();
        walk(&self.nodes, &mut out);
        out
    }

    fn image_alts(&self) -> Option<Vec<String>> {
        let alts: Vec<String> = self
            .elements()
            .into_iter()
            .filter(|element| element.tag == "img")
            .map(|image| image.attribute("alt").unwrap_or_default().to_string())
            .collect();
        (!alts.is_empty()).then_some(alts)
    }

    fn inline_labels(&self) -> Vec<String> {
        self.elements()
            .into_iter()
            .filter(|element| matches!(element.tag.as_str(), "a" | "span" | "i"))
            .filter_map(|element| {
                element
                    .attribute("aria-label")
                    .filter(|label| !label.is_empty())
                    .or_else(|| element.attribute("title").filter(|title| !title.is_empty()))
                    .map(str::to_string)
            })
            .collect()
    }

    fn machine_timestamp(&self) -> Option<&str> {
        self.elements()
            .into_iter()
            .find(|element| element.tag == "time")
            .and_then(|time| time.attribute("datetime"))
    }
}

/// One table cell.
///
/// Besides its content, a cell memoizes its sort value. The memo is filled on
/// the first sort and dropped when the content is replaced. A caller-supplied
/// override (the `data-o-table-sort-value` attribute in markup) always wins
/// over computed extraction and survives content replacement.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    content: CellContent,
    sort_value: Option<SortValue>,
    has_override: bool,
}

impl Cell {
    pub fn new(content: CellContent) -> Self {
        Self {
            content,
            sort_value: None,
            has_override: false,
        }
    }

    /// A cell containing plain text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(CellContent::from_text(text))
    }

    /// Attach an explicit sort value.
    pub fn with_sort_value(mut self, value: impl Into<SortValue>) -> Self {
        self.set_sort_value_override(Some(value.into()));
        self
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Replace the content, dropping any computed sort value.
    pub fn set_content(&mut self, content: CellContent) {
        self.content = content;
        if !self.has_override {
            self.sort_value = None;
        }
    }

    /// Set or clear the explicit sort value.
    pub fn set_sort_value_override(&mut self, value: Option<SortValue>) {
        self.has_override = value.is_some();
        self.sort_value = value.map(SortValue::normalized);
    }

    /// Whether the sort value was supplied by the caller.
    pub fn has_override(&self) -> bool {
        self.has_override
    }

    /// The memoized or overridden sort value.
    pub fn sort_value(&self) -> Option<&SortValue> {
        self.sort_value.as_ref()
    }

    /// Drop a computed sort value. Overrides are kept.
    pub fn invalidate_sort_value(&mut self) {
        if !self.has_override {
            self.sort_value = None;
        }
    }

    pub(crate) fn memoize(&mut self, value: SortValue) -> &SortValue {
        self.sort_value.insert(value)
    }
}

impl CellMarkup for Cell {
    fn text_content(&self) -> String {
        self.content.text_content()
    }

    fn image_alts(&self) -> Option<Vec<String>> {
        self.content.image_alts()
    }

    fn inline_labels(&self) -> Vec<String> {
        self.content.inline_labels()
    }

    fn machine_timestamp(&self) -> Option<&str> {
        self.content.machine_timestamp()
    }
}
