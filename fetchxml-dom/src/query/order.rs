//! Sort orders (`<order>` elements).

use crate::error::require;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::error::ValidationError;
use crate::validation::check_xml_chars;
use crate::validation::report;
use crate::validation::Validate;
use crate::xml::non_blank;
use crate::xml::WriteXml;
use crate::xml::XmlWriter;

/// Sorts results by a column, by a column alias (aggregate queries), or by
/// a column of a link-entity.
///
/// # Example
///
/// ```
/// use fetchxml_dom::query::OrderExpression;
///
/// let by_revenue = OrderExpression::from_column("revenue", true)?;
/// let by_count = OrderExpression::from_alias("Count", false)?;
/// let by_linked = OrderExpression::from_link_entity_column("acct", "name", false)?;
///
/// assert!(by_revenue.descending());
/// assert_eq!(by_count.alias(), Some("Count"));
/// assert_eq!(by_linked.entity_name(), Some("acct"));
/// # Ok::<(), fetchxml_dom::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OrderExpression {
    column: Option<String>,
    alias: Option<String>,
    descending: bool,
    entity_name: Option<String>,
}

impl OrderExpression {
    /// Orders by a column of the entity the order belongs to.
    pub fn from_column(column: impl Into<String>, descending: bool) -> Result<Self, Error> {
        Ok(Self {
            column: Some(require(column.into(), "order column")?),
            descending,
            ..Self::default()
        })
    }

    /// Orders by a column alias.
    pub fn from_alias(alias: impl Into<String>, descending: bool) -> Result<Self, Error> {
        Ok(Self {
            alias: Some(require(alias.into(), "order alias")?),
            descending,
            ..Self::default()
        })
    }

    /// Orders by a column of the link-entity with the given alias.
    pub fn from_link_entity_column(
        entity_alias: impl Into<String>,
        column: impl Into<String>,
        descending: bool,
    ) -> Result<Self, Error> {
        Ok(Self {
            column: Some(require(column.into(), "order column")?),
            entity_name: Some(require(entity_alias.into(), "order entity alias")?),
            descending,
            ..Self::default()
        })
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn descending(&self) -> bool {
        self.descending
    }

    pub fn entity_name(&self) -> Option<&str> {
        self.entity_name.as_deref()
    }
}

impl Validate for OrderExpression {
    fn validate_into(&self, path: &str, errors: &mut Vec<ValidationError>) {
        if non_blank(&self.column).is_none() && non_blank(&self.alias).is_none() {
            report(
                errors,
                path,
                "Column",
                ErrorKind::RequiredFieldMissing,
                "Either Column or Alias is required",
            );
        }
        let members = [
            ("Column", &self.column),
            ("Alias", &self.alias),
            ("EntityName", &self.entity_name),
        ];
        for (member, value) in members {
            if let Some(value) = value {
                check_xml_chars(errors, path, member, value);
            }
        }
    }
}

impl WriteXml for OrderExpression {
    fn write_xml(&self, writer: &mut XmlWriter<'_>) {
        writer.start_element("order");
        if let Some(column) = non_blank(&self.column) {
            writer.attribute("attribute", column);
        }
        if let Some(alias) = non_blank(&self.alias) {
            writer.attribute("alias", alias);
        }
        if self.descending {
            writer.attribute("descending", "true");
        }
        if let Some(entity_name) = non_blank(&self.entity_name) {
            writer.attribute("entityname", entity_name);
        }
        writer.end_element();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::XmlOptions;

    fn render(order: &OrderExpression) -> String {
        let options = XmlOptions::default();
        let mut writer = XmlWriter::new(&options);
        order.write_xml(&mut writer);
        writer.finish()
    }

    #[test]
    fn test_ascending_column() {
        let order = OrderExpression::from_column("name", false).unwrap();
        assert_eq!(render(&order), r#"<order attribute="name" />"#);
    }

    #[test]
    fn test_descending_column() {
        let order = OrderExpression::from_column("revenue", true).unwrap();
        assert_eq!(
            render(&order),
            r#"<order attribute="revenue" descending="true" />"#
        );
    }

    #[test]
    fn test_alias() {
        let order = OrderExpression::from_alias("Count", true).unwrap();
        assert_eq!(render(&order), r#"<order alias="Count" descending="true" />"#);
    }

    #[test]
    fn test_link_entity_column() {
        let order = OrderExpression::from_link_entity_column("acct", "name", false).unwrap();
        assert_eq!(
            render(&order),
            r#"<order attribute="name" entityname="acct" />"#
        );
    }

    #[test]
    fn test_blank_rejected() {
        assert!(matches!(
            OrderExpression::from_column("  ", false),
            Err(Error::RequiredFieldMissing { field: "order column" })
        ));
        assert!(OrderExpression::from_alias("", false).is_err());
        assert!(OrderExpression::from_link_entity_column("", "name", false).is_err());
    }

    #[test]
    fn test_empty_order_fails_validation() {
        let errors = OrderExpression::default().validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::RequiredFieldMissing);
        assert!(OrderExpression::from_alias("x", false)
            .unwrap()
            .validation_errors()
            .is_empty());
    }
}
