//! Single predicates (`<condition>` elements).

use crate::error::require;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::error::ValidationError;
use crate::model::Value;
use crate::validation::check_xml_chars;
use crate::validation::report;
use crate::validation::Validate;
use crate::xml::non_blank;
use crate::xml::WriteXml;
use crate::xml::XmlWriter;

use super::operator::ConditionOperator;

/// A condition comparing a column with literal values, with another
/// column of the same row (`valueof`), or with nothing at all for unary
/// operators such as `null`.
///
/// Construction rejects blank names and null literals. Whether the number
/// of values fits the operator, and whether values and `valueof` are both
/// set, is checked by the validation pass.
///
/// # Example
///
/// ```
/// use fetchxml_dom::query::{ConditionExpression, ConditionOperator};
///
/// let active = ConditionExpression::single("statecode", ConditionOperator::Equal, 0)?;
/// let codes = ConditionExpression::multiple("industrycode", ConditionOperator::In, [1, 2, 3])?;
/// let same = ConditionExpression::other_column("fullname", ConditionOperator::Equal, "acct.name")?;
///
/// assert_eq!(active.values().len(), 1);
/// assert_eq!(codes.values().len(), 3);
/// assert_eq!(same.value_of(), Some("acct.name"));
/// # Ok::<(), fetchxml_dom::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionExpression {
    attribute: String,
    operator: ConditionOperator,
    entity_name: Option<String>,
    values: Vec<Value>,
    value_of: Option<String>,
}

impl ConditionExpression {
    /// Creates a condition without values.
    pub fn new(attribute: impl Into<String>, operator: ConditionOperator) -> Result<Self, Error> {
        Ok(Self {
            attribute: require(attribute.into(), "condition attribute")?,
            operator,
            entity_name: None,
            values: Vec::new(),
            value_of: None,
        })
    }

    /// Creates a condition with one value.
    ///
    /// A null value is treated as no value at all.
    pub fn single(
        attribute: impl Into<String>,
        operator: ConditionOperator,
        value: impl Into<Value>,
    ) -> Result<Self, Error> {
        let mut condition = Self::new(attribute, operator)?;
        let value = value.into();
        if !value.is_null() {
            condition.values.push(value);
        }
        Ok(condition)
    }

    /// Creates a condition with a list of values.
    ///
    /// Fails with [`Error::InvalidValue`] if any entry is null.
    pub fn multiple<I, V>(
        attribute: impl Into<String>,
        operator: ConditionOperator,
        values: I,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut condition = Self::new(attribute, operator)?;
        condition.set_values(values)?;
        Ok(condition)
    }

    /// Creates a condition comparing with another column of the same row.
    ///
    /// Use `alias.column` to reference a column of a link-entity.
    pub fn other_column(
        attribute: impl Into<String>,
        operator: ConditionOperator,
        other_column: impl Into<String>,
    ) -> Result<Self, Error> {
        let mut condition = Self::new(attribute, operator)?;
        condition.value_of = Some(require(other_column.into(), "valueof column")?);
        Ok(condition)
    }

    /// Scopes the condition to the link-entity with the given alias.
    pub fn in_entity(mut self, entity_alias: impl Into<String>) -> Result<Self, Error> {
        self.entity_name = Some(require(entity_alias.into(), "condition entity alias")?);
        Ok(self)
    }

    /// Replaces the literal values.
    ///
    /// Fails with [`Error::InvalidValue`] if any entry is null, leaving the
    /// previous values in place.
    pub fn set_values<I, V>(&mut self, values: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if let Some(index) = values.iter().position(Value::is_null) {
            return Err(Error::InvalidValue {
                field: "values",
                index,
            });
        }
        self.values = values;
        Ok(self)
    }

    /// Replaces the `valueof` column reference.
    pub fn set_value_of(&mut self, other_column: Option<String>) -> &mut Self {
        self.value_of = other_column;
        self
    }

    /// Returns the column the condition applies to.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns the operator.
    pub fn operator(&self) -> ConditionOperator {
        self.operator
    }

    /// Returns the link-entity alias the condition is scoped to.
    pub fn entity_name(&self) -> Option<&str> {
        self.entity_name.as_deref()
    }

    /// Returns the literal values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the `valueof` column reference.
    pub fn value_of(&self) -> Option<&str> {
        non_blank(&self.value_of)
    }

    /// Number of value slots in use: one per literal, one for `valueof`.
    pub fn value_count(&self) -> usize {
        self.values.len() + usize::from(self.value_of().is_some())
    }
}

impl Validate for ConditionExpression {
    fn validate_into(&self, path: &str, errors: &mut Vec<ValidationError>) {
        check_xml_chars(errors, path, "Attribute", &self.attribute);
        if let Some(entity_name) = &self.entity_name {
            check_xml_chars(errors, path, "EntityName", entity_name);
        }
        if let Some(value_of) = &self.value_of {
            check_xml_chars(errors, path, "ValueOf", value_of);
        }
        for (i, value) in self.values.iter().enumerate() {
            if let Value::String(text) = value {
                check_xml_chars(errors, path, &format!("Values[{i}]"), text);
            }
        }

        if !self.values.is_empty() && self.value_of().is_some() {
            report(
                errors,
                path,
                "ValueOf",
                ErrorKind::ConflictingFields,
                "Values and ValueOf cannot be set together",
            );
            return;
        }

        let rule = self.operator.value_rule();
        let count = self.value_count();
        if !rule.accepts(count) {
            report(
                errors,
                path,
                "Operator",
                ErrorKind::OperatorCardinalityMismatch,
                rule.mismatch_message(self.operator, count),
            );
        }
    }
}

impl WriteXml for ConditionExpression {
    fn write_xml(&self, writer: &mut XmlWriter<'_>) {
        writer.start_element("condition");
        writer.attribute("attribute", &self.attribute);
        writer.attribute("operator", self.operator.as_str());
        if let Some(entity_name) = non_blank(&self.entity_name) {
            writer.attribute("entityname", entity_name);
        }
        if let Some(value_of) = self.value_of() {
            writer.attribute("valueof", value_of);
        }
        match self.values.as_slice() {
            [] => {}
            [value] => writer.attribute("value", &value.to_fetchxml()),
            values => {
                for value in values {
                    writer.element_string("value", &value.to_fetchxml());
                }
            }
        }
        writer.end_element();
    }
}
