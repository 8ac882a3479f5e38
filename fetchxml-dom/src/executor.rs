//! Seams for running a rendered query against a server.
//!
//! This crate does not talk to any server. An executor receives the
//! rendered FetchXML as an opaque string and returns whatever result type
//! its transport produces. See [`FetchExpression::execute`] and
//! [`FetchExpression::execute_async`].
//!
//! [`FetchExpression::execute`]: crate::query::FetchExpression::execute
//! [`FetchExpression::execute_async`]: crate::query::FetchExpression::execute_async

use async_trait::async_trait;

/// Runs a FetchXML query synchronously.
///
/// # Example
///
/// ```
/// use fetchxml_dom::executor::FetchExecutor;
/// use fetchxml_dom::query::FetchExpression;
///
/// struct Echo;
///
/// impl FetchExecutor for Echo {
///     type Output = String;
///     type Error = std::convert::Infallible;
///
///     fn execute_fetch(&self, fetch_xml: &str) -> Result<String, Self::Error> {
///         Ok(fetch_xml.to_string())
///     }
/// }
///
/// let fetch = FetchExpression::new("account")?;
/// let xml = fetch.execute(&Echo, true)?;
/// assert!(xml.starts_with("<fetch>"));
/// # Ok::<(), fetchxml_dom::Error>(())
/// ```
pub trait FetchExecutor {
    /// The result collection produced by the transport.
    type Output;
    /// The transport failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes the given FetchXML document.
    fn execute_fetch(&self, fetch_xml: &str) -> Result<Self::Output, Self::Error>;
}

/// Runs a FetchXML query asynchronously.
#[async_trait]
pub trait AsyncFetchExecutor: Send + Sync {
    /// The result collection produced by the transport.
    type Output: Send;
    /// The transport failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes the given FetchXML document.
    async fn execute_fetch(&self, fetch_xml: &str) -> Result<Self::Output, Self::Error>;
}
