//! Typed models

mod value;

pub use value::*;
