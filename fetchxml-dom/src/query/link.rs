//! Joins (`<link-entity>` elements).

use crate::error::require;
use crate::error::Error;
use crate::error::ValidationError;
use crate::validation::check_xml_chars;
use crate::validation::Validate;
use crate::xml::non_blank;
use crate::xml::WriteXml;
use crate::xml::XmlWriter;

use super::entity::Entity;
use super::entity::EntityComposition;
use super::token::wire_token;

/// The kind of join a link-entity performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkType {
    /// Inner join (default): only rows with a related row.
    #[default]
    Inner,
    /// Left outer join: all rows, related columns null when missing.
    Outer,
    /// Rows with at least one related row matching the link filter.
    Any,
    /// Rows with no related row matching the link filter.
    NotAny,
    /// Rows where every related row matches the link filter.
    All,
    /// Rows with no related row failing the link filter.
    NotAll,
    /// Semi-join through `EXISTS`: parent rows with a related row, no duplicates.
    Exists,
    /// Semi-join through `IN`: parent rows with a related row, no duplicates.
    In,
    /// Joins only the first matching related row.
    MatchFirstRowUsingCrossApply,
}

impl LinkType {
    /// Every join type, in declaration order.
    pub const ALL: &'static [LinkType] = &[
        LinkType::Inner,
        LinkType::Outer,
        LinkType::Any,
        LinkType::NotAny,
        LinkType::All,
        LinkType::NotAll,
        LinkType::Exists,
        LinkType::In,
        LinkType::MatchFirstRowUsingCrossApply,
    ];

    /// Returns the `link-type` attribute value.
    pub const fn as_str(self) -> &'static str {
        match self {
            LinkType::Inner => "inner",
            LinkType::Outer => "outer",
            LinkType::Any => "any",
            LinkType::NotAny => "not any",
            LinkType::All => "all",
            LinkType::NotAll => "not all",
            LinkType::Exists => "exists",
            LinkType::In => "in",
            LinkType::MatchFirstRowUsingCrossApply => "matchfirstrowusingcrossapply",
        }
    }
}

wire_token!(LinkType, "link type");

/// A related table joined into an entity or filter.
///
/// A link-entity carries its own columns, filter, nested links and orders
/// through [`Entity`].
///
/// # Example
///
/// ```
/// use fetchxml_dom::prelude::*;
///
/// let mut account = LinkEntity::new("account", "accountid", "parentcustomerid")?
///     .with_link_type(LinkType::Outer)
///     .with_alias("acct");
/// account.add_columns(["name"])?;
///
/// assert_eq!(account.alias(), Some("acct"));
/// assert_eq!(account.column_set().len(), 1);
/// # Ok::<(), fetchxml_dom::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEntity {
    /// Logical name of the related table.
    name: String,
    /// Column on the related table.
    from: String,
    /// Column on the parent table.
    to: String,
    link_type: LinkType,
    alias: Option<String>,
    intersect: bool,
    composition: EntityComposition,
}

impl LinkEntity {
    /// Creates an inner join to `name` on `name.from = parent.to`.
    pub fn new(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            name: require(name.into(), "link-entity name")?,
            from: from.into(),
            to: to.into(),
            link_type: LinkType::default(),
            alias: None,
            intersect: false,
            composition: EntityComposition::default(),
        })
    }

    /// Creates a link with every attribute an entity builder accepts.
    pub(crate) fn build(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        link_type: LinkType,
        alias: Option<&str>,
    ) -> Result<Self, Error> {
        let mut link = Self::new(name, from, to)?.with_link_type(link_type);
        link.alias = alias.map(str::to_string);
        Ok(link)
    }

    /// Sets the join type.
    pub fn with_link_type(mut self, link_type: LinkType) -> Self {
        self.link_type = link_type;
        self
    }

    /// Sets the alias columns and conditions use to refer to this link.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Marks the link as the intersect side of a many-to-many relationship.
    pub fn with_intersect(mut self, intersect: bool) -> Self {
        self.intersect = intersect;
        self
    }

    /// Changes the join type in place.
    pub fn set_link_type(&mut self, link_type: LinkType) -> &mut Self {
        self.link_type = link_type;
        self
    }

    /// Replaces or clears the alias.
    pub fn set_alias(&mut self, alias: Option<String>) -> &mut Self {
        self.alias = alias;
        self
    }

    /// Changes the intersect flag in place.
    pub fn set_intersect(&mut self, intersect: bool) -> &mut Self {
        self.intersect = intersect;
        self
    }

    /// Returns the logical name of the related table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the join column on the related table.
    pub fn from_column(&self) -> &str {
        &self.from
    }

    /// Returns the join column on the parent table.
    pub fn to_column(&self) -> &str {
        &self.to
    }

    /// Returns the join type.
    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// Returns the explicit alias, if it holds anything besides whitespace.
    pub fn alias(&self) -> Option<&str> {
        non_blank(&self.alias)
    }

    /// Returns `true` for the intersect side of a many-to-many relationship.
    pub fn intersect(&self) -> bool {
        self.intersect
    }
}

impl Entity for LinkEntity {
    fn composition(&self) -> &EntityComposition {
        &self.composition
    }

    fn composition_mut(&mut self) -> &mut EntityComposition {
        &mut self.composition
    }
}

impl Validate for LinkEntity {
    fn validate_into(&self, path: &str, errors: &mut Vec<ValidationError>) {
        check_xml_chars(errors, path, "Name", &self.name);
        check_xml_chars(errors, path, "From", &self.from);
        check_xml_chars(errors, path, "To", &self.to);
        if let Some(alias) = &self.alias {
            check_xml_chars(errors, path, "Alias", alias);
        }
        self.composition.validate_into(path, errors);
    }
}

impl WriteXml for LinkEntity {
    fn write_xml(&self, writer: &mut XmlWriter<'_>) {
        // Taken before the children so ordinals follow document order.
        let ordinal = writer.next_link_ordinal();

        writer.start_element("link-entity");
        writer.attribute("name", &self.name);
        if !self.from.trim().is_empty() {
            writer.attribute("from", &self.from);
        }
        if !self.to.trim().is_empty() {
            writer.attribute("to", &self.to);
        }
        writer.attribute("link-type", self.link_type.as_str());
        if let Some(alias) = self.alias() {
            writer.attribute("alias", alias);
        } else if writer.options().generate_link_aliases {
            writer.attribute("alias", &format!("{}{ordinal}", self.name));
        }
        if self.intersect {
            writer.attribute("intersect", "true");
        }
        self.composition.write_xml(writer);
        writer.end_element();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::XmlOptions;
    use crate::query::ConditionOperator;

    fn render_with(link: &LinkEntity, options: &XmlOptions) -> String {
        let mut writer = XmlWriter::new(options);
        link.write_xml(&mut writer);
        writer.finish()
    }

    fn render(link: &LinkEntity) -> String {
        render_with(link, &XmlOptions::default())
    }

    #[test]
    fn test_simple_link() {
        let link = LinkEntity::new("contact", "contactid", "primarycontactid").unwrap();
        assert_eq!(
            render(&link),
            r#"<link-entity name="contact" from="contactid" to="primarycontactid" link-type="inner" />"#
        );
    }

    #[test]
    fn test_link_with_options() {
        let mut link = LinkEntity::new("contact", "contactid", "primarycontactid")
            .unwrap()
            .with_alias("pc")
            .with_link_type(LinkType::Outer);
        link.add_columns(["fullname", "emailaddress1"]).unwrap();

        assert_eq!(
            render(&link),
            "<link-entity name=\"contact\" from=\"contactid\" to=\"primarycontactid\" link-type=\"outer\" alias=\"pc\">\n  <attribute name=\"fullname\" />\n  <attribute name=\"emailaddress1\" />\n</link-entity>"
        );
    }

    #[test]
    fn test_link_with_filter() {
        let mut link = LinkEntity::new("contact", "contactid", "primarycontactid").unwrap();
        link.add_condition_value("statecode", ConditionOperator::Equal, 0)
            .unwrap();

        let xml = render(&link);
        assert!(xml.contains(r#"<filter type="and">"#));
        assert!(xml.contains(r#"operator="eq""#));
    }

    #[test]
    fn test_nested_links() {
        let mut link = LinkEntity::new("contact", "contactid", "primarycontactid").unwrap();
        link.add_link("account", "accountid", "parentcustomerid", LinkType::Inner, None)
            .unwrap()
            .add_columns(["name"])
            .unwrap();

        let xml = render(&link);
        assert!(xml.contains(r#"<link-entity name="contact""#));
        assert!(xml.contains(r#"  <link-entity name="account""#));
    }

    #[test]
    fn test_two_word_link_types() {
        let link = LinkEntity::new("task", "regardingobjectid", "accountid")
            .unwrap()
            .with_link_type(LinkType::NotAny);
        assert!(render(&link).contains(r#"link-type="not any""#));
        assert_eq!("not all".parse::<LinkType>().unwrap(), LinkType::NotAll);
    }

    #[test]
    fn test_blank_join_columns_omitted() {
        let link = LinkEntity::new("systemuser", "", " ")
            .unwrap()
            .with_intersect(true);
        assert_eq!(
            render(&link),
            r#"<link-entity name="systemuser" link-type="inner" intersect="true" />"#
        );
    }

    #[test]
    fn test_setters_update_in_place() {
        let mut link = LinkEntity::new("contact", "contactid", "primarycontactid").unwrap();
        link.set_link_type(LinkType::Exists)
            .set_alias(Some(" ".to_string()))
            .set_intersect(true);

        assert_eq!(link.name(), "contact");
        assert_eq!(link.from_column(), "contactid");
        assert_eq!(link.to_column(), "primarycontactid");
        assert_eq!(link.link_type(), LinkType::Exists);
        assert_eq!(link.alias(), None);
        assert!(link.intersect());

        link.set_alias(Some("pc".to_string()));
        assert_eq!(link.alias(), Some("pc"));
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(matches!(
            LinkEntity::new(" ", "a", "b"),
            Err(Error::RequiredFieldMissing { field: "link-entity name" })
        ));
    }

    #[test]
    fn test_generated_aliases_follow_document_order() {
        let mut outer = LinkEntity::new("contact", "contactid", "primarycontactid").unwrap();
        outer
            .add_link("account", "accountid", "parentcustomerid", LinkType::Inner, None)
            .unwrap();
        outer
            .add_link("team", "teamid", "owningteam", LinkType::Inner, Some("t"))
            .unwrap();

        let options = XmlOptions::default().with_generated_link_aliases(true);
        let xml = render_with(&outer, &options);
        assert!(xml.contains(r#"alias="contact1""#));
        assert!(xml.contains(r#"alias="account2""#));
        assert!(xml.contains(r#"alias="t""#));
        assert!(!xml.contains("team3"));

        assert!(!render(&outer).contains("contact1"));
    }
}
