//! Error types

mod query;
mod validation;

pub use query::*;
pub use validation::*;
