//! Projected columns (`<attribute>` elements).

use crate::error::require;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::error::ValidationError;
use crate::validation::check_xml_chars;
use crate::validation::report;
use crate::validation::Validate;
use crate::xml::bool_str;
use crate::xml::non_blank;
use crate::xml::WriteXml;
use crate::xml::XmlWriter;

use super::token::wire_token;

/// Aggregate function applied to a column in an aggregate query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AggregateFunction {
    /// The average value of the column values with data.
    Avg,
    /// The number of rows.
    Count,
    /// The number of rows with data in that column.
    CountColumn,
    /// The maximum value of the rows in that column.
    Max,
    /// The minimum value of the rows in that column.
    Min,
    /// The total value of the column values with data.
    Sum,
}

impl AggregateFunction {
    /// Every aggregate function, in declaration order.
    pub const ALL: &'static [AggregateFunction] = &[
        AggregateFunction::Avg,
        AggregateFunction::Count,
        AggregateFunction::CountColumn,
        AggregateFunction::Max,
        AggregateFunction::Min,
        AggregateFunction::Sum,
    ];

    /// Returns the wire token.
    pub const fn as_str(self) -> &'static str {
        match self {
            AggregateFunction::Avg => "avg",
            AggregateFunction::Count => "count",
            AggregateFunction::CountColumn => "countcolumn",
            AggregateFunction::Max => "max",
            AggregateFunction::Min => "min",
            AggregateFunction::Sum => "sum",
        }
    }
}

wire_token!(AggregateFunction, "aggregate function");

/// Date part used when grouping by a datetime column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateGrouping {
    /// Day of the month.
    Day,
    /// Week of the year.
    Week,
    /// Month of the year.
    Month,
    /// Quarter of the fiscal year.
    Quarter,
    /// The year.
    Year,
    /// Period of the fiscal year.
    FiscalPeriod,
    /// The fiscal year.
    FiscalYear,
}

impl DateGrouping {
    /// Every date grouping, in declaration order.
    pub const ALL: &'static [DateGrouping] = &[
        DateGrouping::Day,
        DateGrouping::Week,
        DateGrouping::Month,
        DateGrouping::Quarter,
        DateGrouping::Year,
        DateGrouping::FiscalPeriod,
        DateGrouping::FiscalYear,
    ];

    /// Returns the wire token.
    pub const fn as_str(self) -> &'static str {
        match self {
            DateGrouping::Day => "day",
            DateGrouping::Week => "week",
            DateGrouping::Month => "month",
            DateGrouping::Quarter => "quarter",
            DateGrouping::Year => "year",
            DateGrouping::FiscalPeriod => "fiscal-period",
            DateGrouping::FiscalYear => "fiscal-year",
        }
    }
}

wire_token!(DateGrouping, "date grouping");

/// A column returned by an entity or link-entity.
///
/// Two columns are equal when every field matches; a [`ColumnSet`]
/// relies on this to reject duplicates. Columns are immutable once built:
/// the `with_*` methods consume and return the column.
///
/// [`ColumnSet`]: super::ColumnSet
///
/// # Example
///
/// ```
/// use fetchxml_dom::query::{AggregateFunction, ColumnExpression, DateGrouping};
///
/// let total = ColumnExpression::aggregate("revenue", AggregateFunction::Sum, Some("total"))?;
/// let month = ColumnExpression::group("createdon", None)?
///     .with_date_grouping(DateGrouping::Month)
///     .with_user_time_zone(false);
///
/// assert_eq!(month.alias(), Some("createdon"));
/// assert!(total.is_aggregate_column());
/// # Ok::<(), fetchxml_dom::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnExpression {
    name: String,
    alias: Option<String>,
    aggregate: Option<AggregateFunction>,
    date_grouping: Option<DateGrouping>,
    distinct: bool,
    group_by: bool,
    row_aggregate: bool,
    user_time_zone: Option<bool>,
}

impl ColumnExpression {
    /// Creates a plain column.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            name: require(name.into(), "column name")?,
            alias: None,
            aggregate: None,
            date_grouping: None,
            distinct: false,
            group_by: false,
            row_aggregate: false,
            user_time_zone: None,
        })
    }

    /// Creates a column computed by an aggregate function.
    ///
    /// The alias defaults to the column name when `None`.
    pub fn aggregate(
        name: impl Into<String>,
        function: AggregateFunction,
        alias: Option<&str>,
    ) -> Result<Self, Error> {
        let mut column = Self::new(name)?;
        column.alias = Some(column.default_alias(alias)?);
        column.aggregate = Some(function);
        Ok(column)
    }

    /// Creates a column that groups the rows of an aggregate query.
    ///
    /// The alias defaults to the column name when `None`.
    pub fn group(name: impl Into<String>, alias: Option<&str>) -> Result<Self, Error> {
        let mut column = Self::new(name)?;
        column.alias = Some(column.default_alias(alias)?);
        column.group_by = true;
        Ok(column)
    }

    fn default_alias(&self, alias: Option<&str>) -> Result<String, Error> {
        match alias {
            Some(alias) => require(alias.to_string(), "aggregate column alias"),
            None => Ok(self.name.clone()),
        }
    }

    /// Sets the column alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the date part used to group a datetime column.
    pub fn with_date_grouping(mut self, date_grouping: DateGrouping) -> Self {
        self.date_grouping = Some(date_grouping);
        self
    }

    /// Counts only distinct values (with `countcolumn`).
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Includes the number of hierarchically related child rows.
    pub fn with_row_aggregate(mut self, row_aggregate: bool) -> Self {
        self.row_aggregate = row_aggregate;
        self
    }

    /// Chooses between the user's time zone (`true`) and UTC (`false`)
    /// when grouping by date.
    pub fn with_user_time_zone(mut self, user_time_zone: bool) -> Self {
        self.user_time_zone = Some(user_time_zone);
        self
    }

    /// Returns the column logical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the aggregate function, if any.
    pub fn aggregate_function(&self) -> Option<AggregateFunction> {
        self.aggregate
    }

    /// Returns the date grouping, if any.
    pub fn date_grouping(&self) -> Option<DateGrouping> {
        self.date_grouping
    }

    /// Returns `true` if only distinct values are counted.
    pub fn distinct(&self) -> bool {
        self.distinct
    }

    /// Returns `true` if this column groups an aggregate query.
    pub fn group_by(&self) -> bool {
        self.group_by
    }

    /// Returns `true` if the child row count is requested.
    pub fn row_aggregate(&self) -> bool {
        self.row_aggregate
    }

    /// Returns the time zone flag, if set.
    pub fn user_time_zone(&self) -> Option<bool> {
        self.user_time_zone
    }

    /// Returns `true` if this is an aggregate or group-by column.
    pub fn is_aggregate_column(&self) -> bool {
        self.group_by || self.aggregate.is_some()
    }
}

impl Validate for ColumnExpression {
    fn validate_into(&self, path: &str, errors: &mut Vec<ValidationError>) {
        if self.name.trim().is_empty() {
            report(errors, path, "Name", ErrorKind::RequiredFieldMissing, "Column name is required");
        }
        if self.is_aggregate_column() && non_blank(&self.alias).is_none() {
            report(
                errors,
                path,
                "Alias",
                ErrorKind::RequiredFieldMissing,
                "Alias is required for aggregate columns",
            );
        }
        check_xml_chars(errors, path, "Name", &self.name);
        if let Some(alias) = &self.alias {
            check_xml_chars(errors, path, "Alias", alias);
        }
    }
}

impl WriteXml for ColumnExpression {
    fn write_xml(&self, writer: &mut XmlWriter<'_>) {
        writer.start_element("attribute");
        writer.attribute("name", &self.name);
        if let Some(alias) = non_blank(&self.alias) {
            writer.attribute("alias", alias);
        }
        if let Some(aggregate) = self.aggregate {
            writer.attribute("aggregate", aggregate.as_str());
        }
        if let Some(date_grouping) = self.date_grouping {
            writer.attribute("dategrouping", date_grouping.as_str());
        }
        if self.distinct {
            writer.attribute("distinct", "true");
        }
        if self.group_by {
            writer.attribute("groupby", "true");
        }
        if self.row_aggregate {
            writer.attribute("rowaggregate", "CountChildren");
        }
        if let Some(user_time_zone) = self.user_time_zone {
            writer.attribute("usertimezone", bool_str(user_time_zone));
        }
        writer.end_element();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::XmlOptions;

    fn render(column: &ColumnExpression) -> String {
        let options = XmlOptions::default();
        let mut writer = XmlWriter::new(&options);
        column.write_xml(&mut writer);
        writer.finish()
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(matches!(
            ColumnExpression::new("  "),
            Err(Error::RequiredFieldMissing { field: "column name" })
        ));
    }

    #[test]
    fn test_plain_column() {
        let column = ColumnExpression::new("fullname").unwrap();
        assert_eq!(column.alias(), None);
        assert!(!column.is_aggregate_column());
        assert_eq!(render(&column), r#"<attribute name="fullname" />"#);
    }

    #[test]
    fn test_group_column_defaults_alias() {
        let column = ColumnExpression::group("lastname", None).unwrap();
        assert_eq!(
            render(&column),
            r#"<attribute name="lastname" alias="lastname" groupby="true" />"#
        );
    }

    #[test]
    fn test_aggregate_column() {
        let column =
            ColumnExpression::aggregate("contactid", AggregateFunction::Count, Some("Count")).unwrap();
        assert_eq!(
            render(&column),
            r#"<attribute name="contactid" alias="Count" aggregate="count" />"#
        );
    }

    #[test]
    fn test_blank_aggregate_alias_rejected() {
        let result = ColumnExpression::aggregate("contactid", AggregateFunction::Count, Some(" "));
        assert!(matches!(result, Err(Error::RequiredFieldMissing { .. })));
    }

    #[test]
    fn test_all_modifiers_in_order() {
        let column = ColumnExpression::group("createdon", Some("month"))
            .unwrap()
            .with_date_grouping(DateGrouping::FiscalPeriod)
            .with_distinct(true)
            .with_row_aggregate(true)
            .with_user_time_zone(false);
        assert_eq!(
            render(&column),
            r#"<attribute name="createdon" alias="month" dategrouping="fiscal-period" distinct="true" groupby="true" rowaggregate="CountChildren" usertimezone="false" />"#
        );
    }

    #[test]
    fn test_equality_covers_all_fields() {
        let a = ColumnExpression::new("name").unwrap();
        let b = ColumnExpression::new("name").unwrap();
        let c = ColumnExpression::new("name").unwrap().with_alias("n");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_grouping_tokens() {
        assert_eq!(DateGrouping::FiscalYear.to_string(), "fiscal-year");
        assert_eq!("quarter".parse::<DateGrouping>().unwrap(), DateGrouping::Quarter);
        assert_eq!(AggregateFunction::CountColumn.to_string(), "countcolumn");
    }

    #[test]
    fn test_aggregate_without_alias_fails_validation() {
        let column = ColumnExpression::new("revenue").unwrap().with_alias(" ");
        assert!(column.validation_errors().is_empty());

        let grouped = ColumnExpression::group("revenue", None).unwrap().with_alias("");
        let errors = grouped.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "Alias");
        assert_eq!(errors[0].kind, ErrorKind::RequiredFieldMissing);
    }
}
