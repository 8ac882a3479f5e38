//! Handing rendered queries to executors.

mod common;

use std::cell::RefCell;
use std::fmt;

use async_trait::async_trait;
use fetchxml_dom::prelude::*;

#[derive(Debug)]
struct TransportError;

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("connection reset")
    }
}

impl std::error::Error for TransportError {}

#[derive(Default)]
struct RecordingExecutor {
    received: RefCell<Vec<String>>,
}

impl FetchExecutor for RecordingExecutor {
    type Output = usize;
    type Error = TransportError;

    fn execute_fetch(&self, fetch_xml: &str) -> Result<usize, TransportError> {
        self.received.borrow_mut().push(fetch_xml.to_string());
        Ok(self.received.borrow().len())
    }
}

struct FailingExecutor;

#[async_trait]
impl AsyncFetchExecutor for FailingExecutor {
    type Output = Vec<String>;
    type Error = TransportError;

    async fn execute_fetch(&self, _fetch_xml: &str) -> Result<Vec<String>, TransportError> {
        Err(TransportError)
    }
}

struct EchoExecutor;

#[async_trait]
impl AsyncFetchExecutor for EchoExecutor {
    type Output = String;
    type Error = TransportError;

    async fn execute_fetch(&self, fetch_xml: &str) -> Result<String, TransportError> {
        Ok(fetch_xml.to_string())
    }
}

fn account_query() -> FetchExpression {
    let mut fetch = FetchExpression::new("account").unwrap();
    fetch.add_columns(["name"]).unwrap();
    fetch
}

#[test]
fn test_executor_receives_rendered_xml() {
    common::init_logger();
    let executor = RecordingExecutor::default();
    let fetch = account_query();

    assert_eq!(fetch.execute(&executor, true).unwrap(), 1);
    assert_eq!(executor.received.borrow()[0], fetch.to_xml());
}

#[test]
fn test_invalid_query_is_not_sent() {
    let executor = RecordingExecutor::default();
    let mut fetch = account_query();
    fetch.set_top(Some(10)).set_page(Some(1));

    let err = fetch.execute(&executor, true).unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));
    assert!(executor.received.borrow().is_empty());

    assert!(fetch.execute(&executor, false).is_ok());
}

#[tokio::test]
async fn test_async_executor() {
    common::init_logger();
    let fetch = account_query();
    let xml = fetch.execute_async(&EchoExecutor, true).await.unwrap();
    assert_eq!(xml, fetch.to_xml());
}

#[tokio::test]
async fn test_async_executor_failure() {
    let err = account_query()
        .execute_async(&FailingExecutor, false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Executor(_)));
    assert_eq!(err.to_string(), "Executor error: connection reset");
}
