//! # Mock Store & Testing Guide
//!
//! [`MockStore<T>`] hands out a real [`StoreClient<T>`], but the requests it sends are
//! answered from a queue of scripted expectations instead of a live store. Every request
//! is also appended to a call log, so a test can prove that a call did *not* happen.
//!
//! ## When to use Mocks vs the Real Store
//!
//! | Feature | MockStore | StoreActor |
//! |---------|-----------|------------|
//! | **State** | None (scripted replies) | Real records |
//! | **Error Injection** | Easy (`return_err`) | Only constraint violations |
//! | **Call Assertions** | `calls()` log | None |
//! | **Use Case** | Testing the service's control flow | Testing behavior end to end |
//!
//! ## Example: the gate never saves invalid input
//!
//! ```rust
//! use crud_framework::mock::MockStore;
//! use crud_framework::{record, CrudService, ValidationPort, ValidatorOptions, Violation};
//! use async_trait::async_trait;
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! record! {
//!     pub struct Pet {
//!         id: u64,
//!         pub name: String,
//!     }
//! }
//!
//! struct RejectAll;
//!
//! #[async_trait]
//! impl ValidationPort<Pet> for RejectAll {
//!     type Error = Infallible;
//!     async fn validate(&self, _: &Pet, _: &ValidatorOptions) -> Result<Vec<Violation>, Infallible> {
//!         Ok(vec![Violation::new("name").with_constraint("isNotEmpty", "name should not be empty")])
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockStore::<Pet>::new();
//!     let pets = CrudService::new(mock.client(), RejectAll, Arc::new(ValidatorOptions::default()));
//!
//!     assert!(pets.create(PetPartial::default()).await.is_err());
//!     assert!(mock.calls().is_empty());
//!     mock.verify();
//! }
//! ```
//!
//! Requests that arrive out of script order make the mock task panic; the waiting
//! caller then sees [`StoreError::Dropped`].

use crate::ports::DeleteResult;
use crate::record::Record;
use crate::store::{StoreClient, StoreError, StoreRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

enum Expectation<T: Record> {
    FindAll(Result<Vec<T>, StoreError>),
    FindById {
        id: T::Id,
        response: Result<Option<T>, StoreError>,
    },
    FindOne(Result<Option<T>, StoreError>),
    Save(Result<T, StoreError>),
    SaveEcho,
    Delete {
        id: T::Id,
        response: Result<DeleteResult, StoreError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A store client whose replies are scripted in advance.
pub struct MockStore<T: Record> {
    client: StoreClient<T>,
    expectations: Queue<T>,
    calls: Arc<Mutex<Vec<&'static str>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Record> Default for MockStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> MockStore<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let calls_clone = calls.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                calls_clone.lock().unwrap().push(request.kind());
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (StoreRequest::FindAll { respond_to }, Some(Expectation::FindAll(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::FindById { id, respond_to },
                        Some(Expectation::FindById {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "find_by_id called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::FindOne { respond_to, .. }, Some(Expectation::FindOne(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Save { respond_to, .. }, Some(Expectation::Save(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Save { record, respond_to }, Some(Expectation::SaveEcho)) => {
                        let _ = respond_to.send(Ok(record));
                    }
                    (
                        StoreRequest::Delete { id, respond_to },
                        Some(Expectation::Delete {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "delete called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected {} request or expectation mismatch", request.kind());
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            calls,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> StoreClient<T> {
        self.client.clone()
    }

    pub fn expect_find_all(&self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::FindAll)
    }

    pub fn expect_find_by_id(&self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::FindById { id, response })
    }

    pub fn expect_find_one(&self) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Expectation::FindOne)
    }

    pub fn expect_save(&self) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Save)
    }

    pub fn expect_delete(&self, id: T::Id) -> ExpectationBuilder<T, DeleteResult> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    /// Operation names of every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Panics if any scripted expectation was not consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn builder<R>(
        &self,
        wrap: impl FnOnce(Result<R, StoreError>) -> Expectation<T> + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }
}

/// Scripts the reply to one expected request.
pub struct ExpectationBuilder<T: Record, R> {
    expectations: Queue<T>,
    wrap: Box<dyn FnOnce(Result<R, StoreError>) -> Expectation<T>>,
}

impl<T: Record, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, StoreError>) {
        let expectation = (self.wrap)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

impl<T: Record> ExpectationBuilder<T, T> {
    /// Replies to the save with the record exactly as it was sent.
    pub fn echo(self) {
        self.expectations.lock().unwrap().push_back(Expectation::SaveEcho);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PersistencePort;

    crate::record! {
        struct Badge {
            id: u64,
            label: String,
        }
    }

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mock = MockStore::<Badge>::new();
        let existing = Badge {
            id: Some(3),
            label: "gold".into(),
        };
        mock.expect_find_by_id(3).return_ok(Some(existing.clone()));
        mock.expect_save().echo();
        mock.expect_delete(3).return_ok(DeleteResult::affected(1));

        let store = mock.client();
        assert_eq!(store.find_by_id(3).await.unwrap(), Some(existing.clone()));
        assert_eq!(store.save(existing.clone()).await.unwrap(), existing);
        assert_eq!(store.delete_by_id(3).await.unwrap().affected, 1);

        assert_eq!(mock.calls(), vec!["find_by_id", "save", "delete"]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_injected_error_is_returned() {
        let mock = MockStore::<Badge>::new();
        mock.expect_find_all().return_err(StoreError::Closed);

        let err = mock.client().find_all().await.unwrap_err();
        assert_eq!(err, StoreError::Closed);
    }

    #[tokio::test]
    async fn test_unscripted_request_drops_reply() {
        let mock = MockStore::<Badge>::new();
        let err = mock.client().find_all().await.unwrap_err();
        assert_eq!(err, StoreError::Dropped);
        assert_eq!(mock.calls(), vec!["find_all"]);
    }

    #[tokio::test]
    #[should_panic(expected = "1 remaining")]
    async fn test_verify_reports_unmet_expectations() {
        let mock = MockStore::<Badge>::new();
        mock.expect_find_one().return_ok(None);
        mock.verify();
    }
}
