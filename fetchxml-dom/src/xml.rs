//! FetchXML generation utilities.
//!
//! [`XmlWriter`] is a small streaming writer that produces the indented
//! layout Dataverse tooling emits: one element per line, attributes kept
//! on the start tag, `<name />` for empty elements and inline text for
//! text-only elements.

use crate::config::XmlOptions;

/// Returns `true` if XML 1.0 can carry the character.
///
/// Control characters other than tab, line feed and carriage return, and
/// the non-characters U+FFFE and U+FFFF, have no legal representation, not
/// even as a character reference.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escapes a string for use in a double-quoted XML attribute value.
///
/// Characters rejected by [`is_xml_char`] are passed through unchanged;
/// the validation pass reports them as [`ErrorKind::InvalidCharacter`].
///
/// [`ErrorKind::InvalidCharacter`]: crate::error::ErrorKind::InvalidCharacter
pub fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\t' => out.push_str("&#x9;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a string for use as element text.
///
/// Like [`escape_attribute`], this does not touch characters XML cannot
/// carry.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Formats a boolean the way FetchXML attributes expect it.
pub(crate) fn bool_str(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

/// Returns the string if it holds anything besides whitespace.
pub(crate) fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.trim().is_empty())
}

/// A node that knows how to render itself as FetchXML.
pub trait WriteXml {
    /// Writes this node (and its children) to the writer.
    fn write_xml(&self, writer: &mut XmlWriter<'_>);
}

#[derive(Debug)]
struct OpenElement {
    name: &'static str,
    /// The start tag is still waiting for its closing `>`.
    start_open: bool,
    has_children: bool,
    has_text: bool,
}

/// Streaming XML writer.
#[derive(Debug)]
pub struct XmlWriter<'a> {
    options: &'a XmlOptions,
    out: String,
    stack: Vec<OpenElement>,
    links_written: usize,
}

impl<'a> XmlWriter<'a> {
    /// Creates a writer using the given options.
    pub fn new(options: &'a XmlOptions) -> Self {
        Self {
            options,
            out: String::new(),
            stack: Vec::new(),
            links_written: 0,
        }
    }

    /// Returns the options this writer renders with.
    pub fn options(&self) -> &XmlOptions {
        self.options
    }

    /// Opens a new element as a child of the current one.
    pub fn start_element(&mut self, name: &'static str) {
        let depth = self.stack.len();
        if let Some(parent) = self.stack.last_mut() {
            if parent.start_open {
                self.out.push('>');
                parent.start_open = false;
            }
            parent.has_children = true;
        }
        if !self.out.is_empty() {
            self.new_line(depth);
        }
        self.out.push('<');
        self.out.push_str(name);
        self.stack.push(OpenElement {
            name,
            start_open: true,
            has_children: false,
            has_text: false,
        });
    }

    /// Writes an attribute on the element that was just opened.
    pub fn attribute(&mut self, name: &str, value: &str) {
        debug_assert!(
            self.stack.last().is_some_and(|e| e.start_open),
            "attribute '{name}' written outside a start tag"
        );
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&escape_attribute(value));
        self.out.push('"');
    }

    /// Writes text content inside the current element.
    pub fn text(&mut self, value: &str) {
        if let Some(current) = self.stack.last_mut() {
            if current.start_open {
                self.out.push('>');
                current.start_open = false;
            }
            current.has_text = true;
        }
        self.out.push_str(&escape_text(value));
    }

    /// Closes the current element.
    pub fn end_element(&mut self) {
        let Some(element) = self.stack.pop() else {
            return;
        };
        if element.start_open {
            self.out.push_str(" />");
            return;
        }
        if element.has_children && !element.has_text {
            self.new_line(self.stack.len());
        }
        self.out.push_str("</");
        self.out.push_str(element.name);
        self.out.push('>');
    }

    /// Writes `<name>text</name>` as a child of the current element.
    pub fn element_string(&mut self, name: &'static str, value: &str) {
        self.start_element(name);
        self.text(value);
        self.end_element();
    }

    /// Returns the 1-based ordinal of the next link-entity in document order.
    pub(crate) fn next_link_ordinal(&mut self) -> usize {
        self.links_written += 1;
        self.links_written
    }

    /// Closes any open elements and returns the document.
    pub fn finish(mut self) -> String {
        while !self.stack.is_empty() {
            self.end_element();
        }
        self.out
    }

    fn new_line(&mut self, depth: usize) {
        self.out.push_str(&self.options.new_line);
        for _ in 0..depth {
            self.out.push_str(&self.options.indent);
        }
    }
}
