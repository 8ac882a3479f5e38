//! The query root (`<fetch>` element).

use std::collections::BTreeSet;
use std::fmt;

use crate::config::XmlOptions;
use crate::error::require;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::error::ValidationError;
use crate::error::ValidationErrors;
use crate::executor::AsyncFetchExecutor;
use crate::executor::FetchExecutor;
use crate::validation::check_xml_chars;
use crate::validation::report;
use crate::validation::Validate;
use crate::xml::bool_str;
use crate::xml::non_blank;
use crate::xml::WriteXml;
use crate::xml::XmlWriter;

use super::entity::Entity;
use super::entity::EntityComposition;
use super::token::wire_token;

/// Upper bound of `top`.
pub const MAX_TOP: u32 = 5000;

/// Upper bound of `aggregatelimit`.
pub const MAX_AGGREGATE_LIMIT: u32 = 50_000;

/// A SQL Server query hint passed through the `options` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FetchOption {
    /// Plans for an average value instead of the sniffed parameters.
    OptimizeForUnknown,
    /// Joins tables in the order the query lists them.
    ForceOrder,
    /// Plans for returning every row rather than the first few.
    DisableRowGoal,
    /// Turns on optimizer fixes from later cumulative updates.
    EnableOptimizerHotfixes,
    /// Uses nested loop joins.
    LoopJoin,
    /// Uses merge joins.
    MergeJoin,
    /// Uses hash joins.
    HashJoin,
    /// Stops the optimizer from adding spool operators. Token `NO_PERFORMANCE_SPOOL`.
    NoPerformanceSpool,
    /// Amends histograms for ascending keys. Token `ENABLE_HIST_AMENDMENT_FOR_ASC_KEYS`.
    EnableHistAmendmentForAscKeys,
}

impl FetchOption {
    /// Every option, in declaration (and rendering) order.
    pub const ALL: &'static [FetchOption] = &[
        FetchOption::OptimizeForUnknown,
        FetchOption::ForceOrder,
        FetchOption::DisableRowGoal,
        FetchOption::EnableOptimizerHotfixes,
        FetchOption::LoopJoin,
        FetchOption::MergeJoin,
        FetchOption::HashJoin,
        FetchOption::NoPerformanceSpool,
        FetchOption::EnableHistAmendmentForAscKeys,
    ];

    /// Returns the hint as written in the `options` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            FetchOption::OptimizeForUnknown => "OptimizeForUnknown",
            FetchOption::ForceOrder => "ForceOrder",
            FetchOption::DisableRowGoal => "DisableRowGoal",
            FetchOption::EnableOptimizerHotfixes => "EnableOptimizerHotfixes",
            FetchOption::LoopJoin => "LoopJoin",
            FetchOption::MergeJoin => "MergeJoin",
            FetchOption::HashJoin => "HashJoin",
            FetchOption::NoPerformanceSpool => "NO_PERFORMANCE_SPOOL",
            FetchOption::EnableHistAmendmentForAscKeys => "ENABLE_HIST_AMENDMENT_FOR_ASC_KEYS",
        }
    }
}

wire_token!(FetchOption, "fetch option");

/// A complete FetchXML query.
///
/// Holds the paging and aggregation knobs of the `<fetch>` element and,
/// through [`Entity`], the columns, filter, joins and orders of the queried
/// table.
///
/// Setters accept any value; ranges and the exclusivity of `top` with the
/// paging attributes are checked by [`validate`](Self::validate) and by
/// [`render`](Self::render) when asked to.
///
/// # Example
///
/// ```
/// use fetchxml_dom::prelude::*;
///
/// let mut fetch = FetchExpression::new("contact")?;
/// fetch.set_top(Some(10));
/// fetch.add_columns(["fullname"])?;
///
/// assert_eq!(
///     fetch.to_xml(),
///     "<fetch top=\"10\">\n  <entity name=\"contact\">\n    <attribute name=\"fullname\" />\n  </entity>\n</fetch>"
/// );
/// # Ok::<(), fetchxml_dom::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchExpression {
    table_name: String,
    aggregate: Option<bool>,
    aggregate_limit: Option<u32>,
    distinct: Option<bool>,
    top: Option<u32>,
    page: Option<u32>,
    count: Option<u32>,
    paging_cookie: Option<String>,
    return_total_record_count: Option<bool>,
    late_materialize: Option<bool>,
    options: BTreeSet<FetchOption>,
    use_raw_order_by: Option<bool>,
    for_retained_rows_only: Option<bool>,
    composition: EntityComposition,
}

impl FetchExpression {
    /// Creates a query over the table with the given logical name.
    pub fn new(table_name: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            table_name: require(table_name.into(), "table name")?,
            ..Self::default()
        })
    }

    /// Returns the queried table; empty for a default-constructed query.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the `aggregate` attribute.
    pub fn aggregate(&self) -> Option<bool> {
        self.aggregate
    }

    /// Marks the query as an aggregate query.
    pub fn set_aggregate(&mut self, aggregate: Option<bool>) -> &mut Self {
        self.aggregate = aggregate;
        self
    }

    /// Returns the `aggregatelimit` attribute.
    pub fn aggregate_limit(&self) -> Option<u32> {
        self.aggregate_limit
    }

    /// Raises or lowers the number of rows an aggregate query may scan.
    pub fn set_aggregate_limit(&mut self, limit: Option<u32>) -> &mut Self {
        self.aggregate_limit = limit;
        self
    }

    /// Returns the `distinct` attribute.
    pub fn distinct(&self) -> Option<bool> {
        self.distinct
    }

    /// Removes duplicate rows from the result.
    pub fn set_distinct(&mut self, distinct: Option<bool>) -> &mut Self {
        self.distinct = distinct;
        self
    }

    /// Returns the `top` attribute.
    pub fn top(&self) -> Option<u32> {
        self.top
    }

    /// Limits the number of rows returned. Not usable together with paging.
    pub fn set_top(&mut self, top: Option<u32>) -> &mut Self {
        self.top = top;
        self
    }

    /// Returns the 1-based page number.
    pub fn page(&self) -> Option<u32> {
        self.page
    }

    /// Selects the page to return, starting at 1.
    pub fn set_page(&mut self, page: Option<u32>) -> &mut Self {
        self.page = page;
        self
    }

    /// Returns the page size.
    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// Sets the page size.
    pub fn set_count(&mut self, count: Option<u32>) -> &mut Self {
        self.count = count;
        self
    }

    /// Returns the paging cookie, if it holds anything besides whitespace.
    pub fn paging_cookie(&self) -> Option<&str> {
        non_blank(&self.paging_cookie)
    }

    /// Sets the cookie returned with the previous page.
    pub fn set_paging_cookie(&mut self, cookie: Option<String>) -> &mut Self {
        self.paging_cookie = cookie;
        self
    }

    /// Returns the `returntotalrecordcount` attribute.
    pub fn return_total_record_count(&self) -> Option<bool> {
        self.return_total_record_count
    }

    /// Asks the server for the total number of matching rows.
    pub fn set_return_total_record_count(&mut self, value: Option<bool>) -> &mut Self {
        self.return_total_record_count = value;
        self
    }

    /// Returns the `latematerialize` attribute.
    pub fn late_materialize(&self) -> Option<bool> {
        self.late_materialize
    }

    /// Fetches the primary keys first and the remaining columns afterwards.
    pub fn set_late_materialize(&mut self, value: Option<bool>) -> &mut Self {
        self.late_materialize = value;
        self
    }

    /// Returns the `useraworderby` attribute.
    pub fn use_raw_order_by(&self) -> Option<bool> {
        self.use_raw_order_by
    }

    /// Sorts choice columns by their integer value instead of their label.
    pub fn set_use_raw_order_by(&mut self, value: Option<bool>) -> &mut Self {
        self.use_raw_order_by = value;
        self
    }

    /// Returns whether the query targets retained rows.
    pub fn for_retained_rows_only(&self) -> Option<bool> {
        self.for_retained_rows_only
    }

    /// Queries long-term retained rows (`datasource="retained"`).
    pub fn set_for_retained_rows_only(&mut self, value: Option<bool>) -> &mut Self {
        self.for_retained_rows_only = value;
        self
    }

    /// Adds a query hint. Hints render in declaration order.
    pub fn add_option(&mut self, option: FetchOption) -> &mut Self {
        self.options.insert(option);
        self
    }

    /// Removes a query hint.
    pub fn remove_option(&mut self, option: FetchOption) -> &mut Self {
        self.options.remove(&option);
        self
    }

    /// Returns the query hints in rendering order.
    pub fn options(&self) -> &BTreeSet<FetchOption> {
        &self.options
    }

    /// Runs every validation rule over the whole tree.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::from(errors))
        }
    }

    /// Renders the query with the default options.
    ///
    /// Rendering never fails; invalid trees render as they are.
    pub fn to_xml(&self) -> String {
        self.to_xml_with(&XmlOptions::default())
    }

    /// Renders the query with explicit options.
    pub fn to_xml_with(&self, options: &XmlOptions) -> String {
        let mut writer = XmlWriter::new(options);
        self.write_xml(&mut writer);
        let xml = writer.finish();
        log::trace!("rendered fetch over '{}' ({} bytes)", self.table_name, xml.len());
        xml
    }

    /// Renders the query, first validating it when `validate` is set.
    ///
    /// Fails with [`Error::ValidationFailed`] carrying every violation.
    pub fn render(&self, validate: bool) -> Result<String, Error> {
        self.render_with(validate, &XmlOptions::default())
    }

    /// Like [`render`](Self::render), with explicit options.
    pub fn render_with(&self, validate: bool, options: &XmlOptions) -> Result<String, Error> {
        if validate {
            if let Err(errors) = self.validate() {
                log::debug!(
                    "fetch over '{}' failed validation with {} error(s)",
                    self.table_name,
                    errors.len()
                );
                return Err(Error::ValidationFailed(errors));
            }
        }
        Ok(self.to_xml_with(options))
    }

    /// Renders the query and hands it to a synchronous executor.
    pub fn execute<E: FetchExecutor>(&self, executor: &E, validate: bool) -> Result<E::Output, Error> {
        let xml = self.render(validate)?;
        log::debug!("executing fetch over '{}'", self.table_name);
        executor.execute_fetch(&xml).map_err(Error::executor)
    }

    /// Renders the query and hands it to an asynchronous executor.
    pub async fn execute_async<E: AsyncFetchExecutor>(
        &self,
        executor: &E,
        validate: bool,
    ) -> Result<E::Output, Error> {
        let xml = self.render(validate)?;
        log::debug!("executing fetch over '{}'", self.table_name);
        executor.execute_fetch(&xml).await.map_err(Error::executor)
    }

    fn validate_paging(&self, path: &str, errors: &mut Vec<ValidationError>) {
        let Some(top) = self.top else {
            return;
        };
        if !(1..=MAX_TOP).contains(&top) {
            report(
                errors,
                path,
                "Top",
                ErrorKind::InvalidRange,
                format!("Top value must be between 1 and {MAX_TOP}"),
            );
        }
        if self.page.is_some()
            || self.count.is_some()
            || self.paging_cookie().is_some()
            || self.return_total_record_count.is_some()
        {
            report(
                errors,
                path,
                "Top",
                ErrorKind::ConflictingFields,
                "Don't use top together with the page, count, paging-cookie or returntotalrecordcount attributes",
            );
        }
    }
}

impl Entity for FetchExpression {
    fn composition(&self) -> &EntityComposition {
        &self.composition
    }

    fn composition_mut(&mut self) -> &mut EntityComposition {
        &mut self.composition
    }
}

impl Validate for FetchExpression {
    fn validate_into(&self, path: &str, errors: &mut Vec<ValidationError>) {
        if self.table_name.trim().is_empty() {
            report(
                errors,
                path,
                "TableName",
                ErrorKind::RequiredFieldMissing,
                "Table name is required",
            );
        }
        check_xml_chars(errors, path, "TableName", &self.table_name);
        if let Some(cookie) = &self.paging_cookie {
            check_xml_chars(errors, path, "PagingCookie", cookie);
        }
        self.validate_paging(path, errors);
        if self.count == Some(0) {
            report(
                errors,
                path,
                "Count",
                ErrorKind::InvalidRange,
                "Count must be at least 1",
            );
        }
        if let Some(limit) = self.aggregate_limit {
            if !(1..=MAX_AGGREGATE_LIMIT).contains(&limit) {
                report(
                    errors,
                    path,
                    "AggregateLimit",
                    ErrorKind::InvalidRange,
                    format!("AggregateLimit must be between 1 and {MAX_AGGREGATE_LIMIT}"),
                );
            }
        }
        self.composition.validate_into(path, errors);
    }
}

impl WriteXml for FetchExpression {
    fn write_xml(&self, writer: &mut XmlWriter<'_>) {
        writer.start_element("fetch");
        if let Some(aggregate) = self.aggregate {
            writer.attribute("aggregate", bool_str(aggregate));
        }
        if let Some(limit) = self.aggregate_limit {
            writer.attribute("aggregatelimit", &limit.to_string());
        }
        if let Some(distinct) = self.distinct {
            writer.attribute("distinct", bool_str(distinct));
        }
        if let Some(top) = self.top {
            writer.attribute("top", &top.to_string());
        }
        if let Some(page) = self.page {
            writer.attribute("page", &page.to_string());
        }
        if let Some(count) = self.count {
            writer.attribute("count", &count.to_string());
        }
        if let Some(cookie) = self.paging_cookie() {
            writer.attribute("paging-cookie", cookie);
        }
        if let Some(value) = self.return_total_record_count {
            writer.attribute("returntotalrecordcount", bool_str(value));
        }
        if let Some(value) = self.late_materialize {
            writer.attribute("latematerialize", bool_str(value));
        }
        if !self.options.is_empty() {
            let options: Vec<_> = self.options.iter().map(|o| o.as_str()).collect();
            writer.attribute("options", &options.join(","));
        }
        if let Some(value) = self.use_raw_order_by {
            writer.attribute("useraworderby", bool_str(value));
        }
        if self.for_retained_rows_only == Some(true) {
            writer.attribute("datasource", "retained");
        }

        if !self.table_name.is_empty() {
            writer.start_element("entity");
            writer.attribute("name", &self.table_name);
            self.composition.write_xml(writer);
            writer.end_element();
        }
        writer.end_element();
    }
}

impl fmt::Display for FetchExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}
