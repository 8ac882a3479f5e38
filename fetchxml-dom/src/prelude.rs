//! Glob-importable re-exports for building queries.

pub use crate::config::XmlOptions;
pub use crate::error::Error;
pub use crate::executor::AsyncFetchExecutor;
pub use crate::executor::FetchExecutor;
pub use crate::model::Value;
pub use crate::query::AggregateFunction;
pub use crate::query::ColumnExpression;
pub use crate::query::ColumnSet;
pub use crate::query::ConditionExpression;
pub use crate::query::ConditionOperator;
pub use crate::query::DateGrouping;
pub use crate::query::Entity;
pub use crate::query::FetchExpression;
pub use crate::query::FetchOption;
pub use crate::query::FilterExpression;
pub use crate::query::FilterType;
pub use crate::query::LinkEntity;
pub use crate::query::LinkType;
pub use crate::query::OrderExpression;
pub use crate::validation::Validate;
