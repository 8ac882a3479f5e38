//! Ordered, duplicate-free column collection.

use std::ops::Index;

use crate::error::Error;
use crate::error::ValidationError;
use crate::validation::validate_list;
use crate::validation::Validate;
use crate::xml::WriteXml;
use crate::xml::XmlWriter;

use super::column::ColumnExpression;

/// The columns returned by an entity or link-entity.
///
/// Either holds explicit columns in insertion order, or is flagged to
/// return all columns; the two states exclude each other. Setting the
/// flag drops the explicit columns, and adding a column clears the flag.
///
/// # Example
///
/// ```
/// use fetchxml_dom::query::ColumnSet;
///
/// let mut columns = ColumnSet::new();
/// columns.set_all_columns(true);
/// columns.add_names(["name", "revenue"])?;
///
/// assert_eq!(columns.len(), 2);
/// assert!(!columns.all_columns());
/// # Ok::<(), fetchxml_dom::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<ColumnExpression>,
    all_columns: bool,
}

/// The legacy name of [`ColumnSet`].
pub type AttributeSet = ColumnSet;

impl ColumnSet {
    /// Creates an empty column set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if all columns are requested.
    pub fn all_columns(&self) -> bool {
        self.all_columns
    }

    /// Requests all columns (`true`, dropping explicit ones) or clears the
    /// flag (`false`).
    pub fn set_all_columns(&mut self, all: bool) {
        if all && !self.columns.is_empty() {
            log::debug!(
                "all-attributes requested, dropping {} explicit column(s)",
                self.columns.len()
            );
            self.columns.clear();
        }
        self.all_columns = all;
    }

    /// Appends a column, clearing the all-columns flag.
    ///
    /// Fails with [`Error::DuplicateEntry`] if an equal column is already
    /// present.
    pub fn add(&mut self, column: ColumnExpression) -> Result<&ColumnExpression, Error> {
        if self.columns.contains(&column) {
            return Err(Error::DuplicateEntry {
                name: column.name().to_string(),
            });
        }
        self.all_columns = false;
        self.columns.push(column);
        Ok(&self.columns[self.columns.len() - 1])
    }

    /// Appends a plain column for each name.
    ///
    /// Stops at the first failing name; the names before it stay added.
    pub fn add_names<I, S>(&mut self, names: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add(ColumnExpression::new(name)?)?;
        }
        Ok(self)
    }

    /// Returns the number of explicit columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if there are no explicit columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the column at `index`.
    pub fn get(&self, index: usize) -> Option<&ColumnExpression> {
        self.columns.get(index)
    }

    /// Iterates over the columns in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnExpression> {
        self.columns.iter()
    }
}

impl Index<usize> for ColumnSet {
    type Output = ColumnExpression;

    fn index(&self, index: usize) -> &Self::Output {
        &self.columns[index]
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a ColumnExpression;
    type IntoIter = std::slice::Iter<'a, ColumnExpression>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

impl Validate for ColumnSet {
    fn validate_into(&self, path: &str, errors: &mut Vec<ValidationError>) {
        validate_list(&self.columns, path, "ColumnSet", errors);
    }
}

impl WriteXml for ColumnSet {
    fn write_xml(&self, writer: &mut XmlWriter<'_>) {
        if self.all_columns {
            writer.start_element("all-attributes");
            writer.end_element();
            return;
        }
        for column in &self.columns {
            column.write_xml(writer);
        }
    }
}
