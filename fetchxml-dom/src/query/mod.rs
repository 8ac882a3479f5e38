//! The query tree.
//!
//! A [`FetchExpression`] owns every node below it: columns, one filter per
//! entity (with nested filters), link-entities and orders. Nodes are plain
//! values; building a tree never touches the network.

mod token;

mod column;
mod column_set;
mod condition;
mod entity;
mod fetch;
mod filter;
mod link;
mod operator;
mod order;

pub use column::*;
pub use column_set::*;
pub use condition::*;
pub use entity::*;
pub use fetch::*;
pub use filter::*;
pub use link::*;
pub use operator::*;
pub use order::*;
