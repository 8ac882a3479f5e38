//! Rendering configuration

/// Controls how a fetch query is laid out when rendered.
///
/// The defaults reproduce the canonical layout: two-space indentation,
/// `\n` line breaks, no generated aliases.
///
/// # Example
///
/// ```
/// use fetchxml_dom::XmlOptions;
///
/// let options = XmlOptions::default()
///     .with_indent("\t")
///     .with_generated_link_aliases(true);
/// assert_eq!(options.indent, "\t");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    /// String repeated once per nesting level.
    ///
    /// Default: two spaces
    pub indent: String,

    /// Line terminator written before each nested element.
    ///
    /// Default: `"\n"`
    pub new_line: String,

    /// Give unaliased link-entities a `{name}{N}` alias, where `N` is the
    /// 1-based position of the link-entity in the document.
    ///
    /// Default: false
    pub generate_link_aliases: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            new_line: "\n".to_string(),
            generate_link_aliases: false,
        }
    }
}

impl XmlOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation string.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the line terminator.
    pub fn with_new_line(mut self, new_line: impl Into<String>) -> Self {
        self.new_line = new_line.into();
        self
    }

    /// Enables or disables generated link-entity aliases.
    pub fn with_generated_link_aliases(mut self, enabled: bool) -> Self {
        self.generate_link_aliases = enabled;
        self
    }

    /// Creates options that render the whole document on one line.
    pub fn compact() -> Self {
        Self {
            indent: String::new(),
            new_line: String::new(),
            generate_link_aliases: false,
        }
    }
}
