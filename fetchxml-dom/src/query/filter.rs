//! Boolean groups (`<filter>` elements).

use crate::error::Error;
use crate::error::ErrorKind;
use crate::error::ValidationError;
use crate::model::Value;
use crate::validation::report;
use crate::validation::validate_list;
use crate::validation::Validate;
use crate::xml::bool_str;
use crate::xml::WriteXml;
use crate::xml::XmlWriter;

use super::condition::ConditionExpression;
use super::link::LinkEntity;
use super::link::LinkType;
use super::operator::ConditionOperator;
use super::token::wire_token;

/// Maximum number of conditions directly inside one filter.
pub const MAX_CONDITIONS: usize = 500;

/// How the children of a filter are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterType {
    /// Every child must hold.
    #[default]
    And,
    /// At least one child must hold.
    Or,
}

impl FilterType {
    /// Both filter types.
    pub const ALL: &'static [FilterType] = &[FilterType::And, FilterType::Or];

    /// Returns the `type` attribute value.
    pub const fn as_str(self) -> &'static str {
        match self {
            FilterType::And => "and",
            FilterType::Or => "or",
        }
    }
}

wire_token!(FilterType, "filter type");

/// A group of conditions, nested filters and existence links combined
/// with `and` or `or`.
///
/// Children render in a fixed order regardless of insertion order:
/// conditions, then nested filters, then links.
///
/// # Example
///
/// ```
/// use fetchxml_dom::query::{ConditionOperator, FilterExpression, FilterType};
///
/// let mut filter = FilterExpression::new(FilterType::And);
/// filter.add_condition_value("statecode", ConditionOperator::Equal, 0)?;
///
/// let either = filter.add_filter(FilterType::Or);
/// either.add_condition_value("name", ConditionOperator::BeginsWith, "A")?;
/// either.add_condition_value("name", ConditionOperator::BeginsWith, "B")?;
///
/// assert_eq!(filter.conditions().len(), 1);
/// assert_eq!(filter.filters()[0].conditions().len(), 2);
/// # Ok::<(), fetchxml_dom::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpression {
    filter_type: FilterType,
    union_hint: bool,
    is_quick_find_fields: Option<bool>,
    override_quick_find_record_limit_enabled: bool,
    override_quick_find_record_limit_disabled: bool,
    conditions: Vec<ConditionExpression>,
    filters: Vec<FilterExpression>,
    links: Vec<LinkEntity>,
}

impl FilterExpression {
    /// Creates an empty filter.
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            filter_type,
            ..Self::default()
        }
    }

    /// Returns how the children are combined.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Changes how the children are combined.
    pub fn set_filter_type(&mut self, filter_type: FilterType) -> &mut Self {
        self.filter_type = filter_type;
        self
    }

    /// Returns `true` if the filter carries the union hint.
    pub fn union_hint(&self) -> bool {
        self.union_hint
    }

    /// Renders `hint="union"`, letting the server run `or` branches as a
    /// union.
    pub fn set_union_hint(&mut self, union_hint: bool) -> &mut Self {
        self.union_hint = union_hint;
        self
    }

    /// Returns the `isquickfindfields` attribute.
    pub fn is_quick_find_fields(&self) -> Option<bool> {
        self.is_quick_find_fields
    }

    /// Marks the filter as the quick-find field filter of a view.
    pub fn set_quick_find_fields(&mut self, value: Option<bool>) -> &mut Self {
        self.is_quick_find_fields = value;
        self
    }

    /// Returns `true` if the quick-find record limit is forced on.
    pub fn override_quick_find_record_limit_enabled(&self) -> bool {
        self.override_quick_find_record_limit_enabled
    }

    /// Forces the quick-find record limit on for this filter.
    pub fn set_override_quick_find_record_limit_enabled(&mut self, value: bool) -> &mut Self {
        self.override_quick_find_record_limit_enabled = value;
        self
    }

    /// Returns `true` if the quick-find record limit is forced off.
    pub fn override_quick_find_record_limit_disabled(&self) -> bool {
        self.override_quick_find_record_limit_disabled
    }

    /// Forces the quick-find record limit off for this filter.
    pub fn set_override_quick_find_record_limit_disabled(&mut self, value: bool) -> &mut Self {
        self.override_quick_find_record_limit_disabled = value;
        self
    }

    /// Appends a condition without values (`null`, `today`, ...).
    pub fn add_condition(
        &mut self,
        attribute: impl Into<String>,
        operator: ConditionOperator,
    ) -> Result<&mut Self, Error> {
        self.push_condition(ConditionExpression::new(attribute, operator)?);
        Ok(self)
    }

    /// Appends a condition with one value.
    pub fn add_condition_value(
        &mut self,
        attribute: impl Into<String>,
        operator: ConditionOperator,
        value: impl Into<Value>,
    ) -> Result<&mut Self, Error> {
        self.push_condition(ConditionExpression::single(attribute, operator, value)?);
        Ok(self)
    }

    /// Appends a condition with a list of values.
    pub fn add_condition_values<I, V>(
        &mut self,
        attribute: impl Into<String>,
        operator: ConditionOperator,
        values: I,
    ) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_condition(ConditionExpression::multiple(attribute, operator, values)?);
        Ok(self)
    }

    /// Appends a condition comparing two columns of the same row.
    pub fn add_condition_to_other_column(
        &mut self,
        attribute: impl Into<String>,
        operator: ConditionOperator,
        other_column: impl Into<String>,
    ) -> Result<&mut Self, Error> {
        self.push_condition(ConditionExpression::other_column(
            attribute,
            operator,
            other_column,
        )?);
        Ok(self)
    }

    /// Appends a condition comparing with a column of a link-entity,
    /// referenced as `entity_alias.column`.
    pub fn add_condition_to_linked_column(
        &mut self,
        attribute: impl Into<String>,
        operator: ConditionOperator,
        entity_alias: &str,
        column: &str,
    ) -> Result<&mut Self, Error> {
        if entity_alias.trim().is_empty() {
            return Err(Error::required("linked entity alias"));
        }
        if column.trim().is_empty() {
            return Err(Error::required("linked column"));
        }
        self.add_condition_to_other_column(attribute, operator, format!("{entity_alias}.{column}"))
    }

    /// Appends a prebuilt condition.
    pub fn push_condition(&mut self, condition: ConditionExpression) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    /// Appends a nested filter and returns it.
    pub fn add_filter(&mut self, filter_type: FilterType) -> &mut FilterExpression {
        self.push_filter(FilterExpression::new(filter_type))
    }

    /// Appends a prebuilt nested filter and returns it.
    pub fn push_filter(&mut self, filter: FilterExpression) -> &mut FilterExpression {
        self.filters.push(filter);
        let last = self.filters.len() - 1;
        &mut self.filters[last]
    }

    /// Appends a link-entity, typically `any`/`not any`, for related-row
    /// existence checks and returns it.
    pub fn add_link(
        &mut self,
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        link_type: LinkType,
        alias: Option<&str>,
    ) -> Result<&mut LinkEntity, Error> {
        let link = LinkEntity::build(name, from, to, link_type, alias)?;
        Ok(self.push_link(link))
    }

    /// Appends a prebuilt link-entity and returns it.
    pub fn push_link(&mut self, link: LinkEntity) -> &mut LinkEntity {
        self.links.push(link);
        let last = self.links.len() - 1;
        &mut self.links[last]
    }

    /// Returns the conditions.
    pub fn conditions(&self) -> &[ConditionExpression] {
        &self.conditions
    }

    /// Gives direct access to the conditions.
    pub fn conditions_mut(&mut self) -> &mut Vec<ConditionExpression> {
        &mut self.conditions
    }

    /// Returns the nested filters.
    pub fn filters(&self) -> &[FilterExpression] {
        &self.filters
    }

    /// Gives direct access to the nested filters.
    pub fn filters_mut(&mut self) -> &mut Vec<FilterExpression> {
        &mut self.filters
    }

    /// Returns the existence links.
    pub fn links(&self) -> &[LinkEntity] {
        &self.links
    }

    /// Gives direct access to the existence links.
    pub fn links_mut(&mut self) -> &mut Vec<LinkEntity> {
        &mut self.links
    }

    /// Returns `true` if the filter has no children.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.filters.is_empty() && self.links.is_empty()
    }
}

impl Validate for FilterExpression {
    fn validate_into(&self, path: &str, errors: &mut Vec<ValidationError>) {
        if self.conditions.len() > MAX_CONDITIONS {
            report(
                errors,
                path,
                "Conditions",
                ErrorKind::CollectionLimitExceeded,
                format!(
                    "A filter cannot contain more than {MAX_CONDITIONS} conditions, found {}",
                    self.conditions.len()
                ),
            );
        }
        validate_list(&self.conditions, path, "Conditions", errors);
        validate_list(&self.filters, path, "Filters", errors);
        validate_list(&self.links, path, "LinkEntities", errors);
    }
}

impl WriteXml for FilterExpression {
    fn write_xml(&self, writer: &mut XmlWriter<'_>) {
        writer.start_element("filter");
        writer.attribute("type", self.filter_type.as_str());
        if self.union_hint {
            writer.attribute("hint", "union");
        }
        if let Some(quick_find) = self.is_quick_find_fields {
            writer.attribute("isquickfindfields", bool_str(quick_find));
        }
        if self.override_quick_find_record_limit_enabled {
            writer.attribute("overridequickfindrecordlimitenabled", "1");
        }
        if self.override_quick_find_record_limit_disabled {
            writer.attribute("overridequickfindrecordlimitdisabled", "1");
        }
        for condition in &self.conditions {
            condition.write_xml(writer);
        }
        for filter in &self.filters {
            filter.write_xml(writer);
        }
        for link in &self.links {
            link.write_xml(writer);
        }
        writer.end_element();
    }
}
