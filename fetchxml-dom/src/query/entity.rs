//! The composition shared by the fetch entity and link-entities.
//!
//! Both [`FetchExpression`](super::FetchExpression) and
//! [`LinkEntity`] embed an [`EntityComposition`] and expose it through the
//! [`Entity`] trait, which provides every builder operation once.

use crate::error::Error;
use crate::error::ValidationError;
use crate::model::Value;
use crate::validation::member_path;
use crate::validation::validate_list;
use crate::validation::Validate;
use crate::xml::WriteXml;
use crate::xml::XmlWriter;

use super::column::AggregateFunction;
use super::column::ColumnExpression;
use super::column::DateGrouping;
use super::column_set::ColumnSet;
use super::condition::ConditionExpression;
use super::filter::FilterExpression;
use super::filter::FilterType;
use super::link::LinkEntity;
use super::link::LinkType;
use super::operator::ConditionOperator;
use super::order::OrderExpression;

/// Columns, filter, joins and orders of one table-level node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityComposition {
    column_set: ColumnSet,
    filter: Option<FilterExpression>,
    links: Vec<LinkEntity>,
    orders: Vec<OrderExpression>,
}

impl EntityComposition {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validate for EntityComposition {
    fn validate_into(&self, path: &str, errors: &mut Vec<ValidationError>) {
        self.column_set.validate_into(path, errors);
        if let Some(filter) = &self.filter {
            filter.validate_into(&member_path(path, "Filter"), errors);
        }
        validate_list(&self.links, path, "LinkEntities", errors);
        validate_list(&self.orders, path, "Order", errors);
    }
}

impl WriteXml for EntityComposition {
    fn write_xml(&self, writer: &mut XmlWriter<'_>) {
        self.column_set.write_xml(writer);
        if let Some(filter) = &self.filter {
            filter.write_xml(writer);
        }
        for link in &self.links {
            link.write_xml(writer);
        }
        for order in &self.orders {
            order.write_xml(writer);
        }
    }
}

/// Builder operations of a table-level node.
///
/// Implementors only hand out their [`EntityComposition`]; everything else
/// is provided.
///
/// # Example
///
/// ```
/// use fetchxml_dom::prelude::*;
///
/// let mut fetch = FetchExpression::new("account")?;
/// fetch
///     .add_columns(["name", "revenue"])?
///     .add_condition_value("statecode", ConditionOperator::Equal, 0)?
///     .order_by_descending("revenue")?;
///
/// fetch
///     .add_link("contact", "contactid", "primarycontactid", LinkType::Outer, Some("pc"))?
///     .add_columns(["fullname"])?;
///
/// assert_eq!(fetch.column_set().len(), 2);
/// assert_eq!(fetch.links().len(), 1);
/// # Ok::<(), fetchxml_dom::Error>(())
/// ```
pub trait Entity {
    fn composition(&self) -> &EntityComposition;

    fn composition_mut(&mut self) -> &mut EntityComposition;

    fn column_set(&self) -> &ColumnSet {
        &self.composition().column_set
    }

    fn column_set_mut(&mut self) -> &mut ColumnSet {
        &mut self.composition_mut().column_set
    }

    /// Adds a plain column for each name.
    fn add_columns<I, S>(&mut self, names: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_set_mut().add_names(names)?;
        Ok(self)
    }

    /// Adds one column, optionally aliased.
    fn add_column(
        &mut self,
        name: impl Into<String>,
        alias: Option<&str>,
    ) -> Result<&mut Self, Error> {
        let mut column = ColumnExpression::new(name)?;
        if let Some(alias) = alias {
            column = column.with_alias(alias);
        }
        self.add_column_expression(column)
    }

    /// Adds a prebuilt column.
    fn add_column_expression(&mut self, column: ColumnExpression) -> Result<&mut Self, Error> {
        self.column_set_mut().add(column)?;
        Ok(self)
    }

    /// Adds an aggregate column; the alias defaults to the column name.
    fn add_aggregate_column(
        &mut self,
        name: impl Into<String>,
        function: AggregateFunction,
        alias: Option<&str>,
    ) -> Result<&mut Self, Error> {
        self.add_column_expression(ColumnExpression::aggregate(name, function, alias)?)
    }

    /// Adds a group-by column; the alias defaults to the column name.
    fn add_group_column(
        &mut self,
        name: impl Into<String>,
        alias: Option<&str>,
        date_grouping: Option<DateGrouping>,
    ) -> Result<&mut Self, Error> {
        let mut column = ColumnExpression::group(name, alias)?;
        if let Some(date_grouping) = date_grouping {
            column = column.with_date_grouping(date_grouping);
        }
        self.add_column_expression(column)
    }

    /// Requests all columns, dropping explicit ones.
    fn all_columns(&mut self) -> &mut Self {
        self.column_set_mut().set_all_columns(true);
        self
    }

    /// Appends a link-entity and returns it.
    fn add_link(
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
    fn push_link(&mut self, link: LinkEntity) -> &mut LinkEntity {
        let links = &mut self.composition_mut().links;
        links.push(link);
        let last = links.len() - 1;
        &mut links[last]
    }

    fn links(&self) -> &[LinkEntity] {
        &self.composition().links
    }

    fn links_mut(&mut self) -> &mut Vec<LinkEntity> {
        &mut self.composition_mut().links
    }

    fn filter(&self) -> Option<&FilterExpression> {
        self.composition().filter.as_ref()
    }

    fn filter_mut(&mut self) -> Option<&mut FilterExpression> {
        self.composition_mut().filter.as_mut()
    }

    /// Sets a new, empty filter and returns it.
    ///
    /// An entity holds a single filter, so any previous one is discarded.
    /// Nest further filters inside the returned one.
    fn add_filter(&mut self, filter_type: FilterType) -> &mut FilterExpression {
        let slot = &mut self.composition_mut().filter;
        if slot.is_some() {
            log::debug!("replacing existing entity filter with a new '{filter_type}' filter");
        }
        slot.insert(FilterExpression::new(filter_type))
    }

    /// Returns the filter, creating an `and` filter first if there is none.
    fn filter_or_default(&mut self) -> &mut FilterExpression {
        self.composition_mut().filter.get_or_insert_with(FilterExpression::default)
    }

    /// Appends a condition without values to the entity filter.
    fn add_condition(
        &mut self,
        attribute: impl Into<String>,
        operator: ConditionOperator,
    ) -> Result<&mut Self, Error> {
        self.filter_or_default().add_condition(attribute, operator)?;
        Ok(self)
    }

    /// Appends a single-value condition to the entity filter.
    fn add_condition_value(
        &mut self,
        attribute: impl Into<String>,
        operator: ConditionOperator,
        value: impl Into<Value>,
    ) -> Result<&mut Self, Error> {
        self.filter_or_default()
            .add_condition_value(attribute, operator, value)?;
        Ok(self)
    }

    /// Appends a multi-value condition to the entity filter.
    fn add_condition_values<I, V>(
        &mut self,
        attribute: impl Into<String>,
        operator: ConditionOperator,
        values: I,
    ) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter_or_default()
            .add_condition_values(attribute, operator, values)?;
        Ok(self)
    }

    /// Appends a column-to-column condition to the entity filter.
    fn add_condition_to_other_column(
        &mut self,
        attribute: impl Into<String>,
        operator: ConditionOperator,
        other_column: impl Into<String>,
    ) -> Result<&mut Self, Error> {
        self.filter_or_default()
            .add_condition_to_other_column(attribute, operator, other_column)?;
        Ok(self)
    }

    /// Appends a condition comparing with `entity_alias.column`.
    fn add_condition_to_linked_column(
        &mut self,
        attribute: impl Into<String>,
        operator: ConditionOperator,
        entity_alias: &str,
        column: &str,
    ) -> Result<&mut Self, Error> {
        self.filter_or_default()
            .add_condition_to_linked_column(attribute, operator, entity_alias, column)?;
        Ok(self)
    }

    /// Appends a prebuilt condition to the entity filter.
    fn push_condition(&mut self, condition: ConditionExpression) -> &mut Self {
        self.filter_or_default().push_condition(condition);
        self
    }

    /// Appends a prebuilt order.
    fn push_order(&mut self, order: OrderExpression) -> &mut Self {
        self.composition_mut().orders.push(order);
        self
    }

    fn order_by(&mut self, column: impl Into<String>) -> Result<&mut Self, Error> {
        Ok(self.push_order(OrderExpression::from_column(column, false)?))
    }

    fn order_by_descending(&mut self, column: impl Into<String>) -> Result<&mut Self, Error> {
        Ok(self.push_order(OrderExpression::from_column(column, true)?))
    }

    fn order_by_alias(&mut self, alias: impl Into<String>) -> Result<&mut Self, Error> {
        Ok(self.push_order(OrderExpression::from_alias(alias, false)?))
    }

    fn order_by_alias_descending(&mut self, alias: impl Into<String>) -> Result<&mut Self, Error> {
        Ok(self.push_order(OrderExpression::from_alias(alias, true)?))
    }

    /// Orders by a column of the link-entity with the given alias.
    fn order_by_link_entity_column(
        &mut self,
        entity_alias: impl Into<String>,
        column: impl Into<String>,
    ) -> Result<&mut Self, Error> {
        Ok(self.push_order(OrderExpression::from_link_entity_column(
            entity_alias,
            column,
            false,
        )?))
    }

    fn order_by_link_entity_column_descending(
        &mut self,
        entity_alias: impl Into<String>,
        column: impl Into<String>,
    ) -> Result<&mut Self, Error> {
        Ok(self.push_order(OrderExpression::from_link_entity_column(
            entity_alias,
            column,
            true,
        )?))
    }

    fn orders(&self) -> &[OrderExpression] {
        &self.composition().orders
    }

    fn orders_mut(&mut self) -> &mut Vec<OrderExpression> {
        &mut self.composition_mut().orders
    }
}

impl Entity for EntityComposition {
    fn composition(&self) -> &EntityComposition {
        self
    }

    fn composition_mut(&mut self) -> &mut EntityComposition {
        self
    }
}
