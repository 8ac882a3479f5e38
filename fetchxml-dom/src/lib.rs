//! FetchXML query DOM
//!
//! Builds Dataverse FetchXML queries as a typed tree, validates them and
//! renders them to the canonical XML layout.
//!
//! # Example
//!
//! ```
//! use fetchxml_dom::prelude::*;
//!
//! let mut fetch = FetchExpression::new("contact")?;
//! fetch
//!     .add_columns(["contactid", "fullname"])?
//!     .add_condition_to_other_column("fullname", ConditionOperator::Equal, "acct.name")?;
//! fetch
//!     .add_link("account", "accountid", "parentcustomerid", LinkType::Outer, Some("acct"))?
//!     .add_columns(["name"])?;
//!
//! let xml = fetch.render(true)?;
//! assert!(xml.starts_with("<fetch>\n  <entity name=\"contact\">"));
//! # Ok::<(), fetchxml_dom::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod model;
pub mod prelude;
pub mod query;
pub mod validation;
pub mod xml;

pub use config::XmlOptions;
pub use error::Error;
pub use error::ErrorKind;
pub use error::ValidationError;
pub use error::ValidationErrors;
