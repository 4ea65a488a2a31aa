//! # Mock Cart Store
//!
//! Expectation-driven [`CartStore`] for testing code that sits on top of a
//! store (the service, the health probe, the interceptor chain) without a
//! real backend.
//!
//! Queue expectations in the order the calls will happen, run the code under
//! test, then call [`MockCartStore::verify`]:
//!
//! ```ignore
//! let mock = MockCartStore::new();
//! mock.expect_get_cart("user_1").return_ok(Cart::empty("user_1"));
//! mock.expect_add_item("user_1").return_err(StoreError::Unavailable("down".into()));
//! mock.expect_ping(false);
//!
//! // ... exercise the code under test ...
//! mock.verify();
//! ```
//!
//! An unexpected call (wrong operation, wrong user, or an empty queue) panics.

use super::{CartStore, StoreError};
use crate::model::Cart;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Represents an expected call to the mock store.
#[derive(Debug)]
enum Expectation {
    Initialize(Result<(), StoreError>),
    AddItem {
        user_id: String,
        response: Result<(), StoreError>,
    },
    EmptyCart {
        user_id: String,
        response: Result<(), StoreError>,
    },
    GetCart {
        user_id: String,
        response: Result<Cart, StoreError>,
    },
    Ping(bool),
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// A mock store with expectation tracking for fluent testing.
#[derive(Debug, Default, Clone)]
pub struct MockCartStore {
    expectations: Queue,
}

impl MockCartStore {
    /// Creates a new mock store with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects an `initialize` call.
    pub fn expect_initialize(&self) -> ExpectationBuilder<()> {
        ExpectationBuilder::new(self.expectations.clone(), Box::new(Expectation::Initialize))
    }

    /// Expects an `add_item` call for `user_id`.
    pub fn expect_add_item(&self, user_id: impl Into<String>) -> ExpectationBuilder<()> {
        let user_id = user_id.into();
        ExpectationBuilder::new(
            self.expectations.clone(),
            Box::new(move |response| Expectation::AddItem { user_id, response }),
        )
    }

    /// Expects an `empty_cart` call for `user_id`.
    pub fn expect_empty_cart(&self, user_id: impl Into<String>) -> ExpectationBuilder<()> {
        let user_id = user_id.into();
        ExpectationBuilder::new(
            self.expectations.clone(),
            Box::new(move |response| Expectation::EmptyCart { user_id, response }),
        )
    }

    /// Expects a `get_cart` call for `user_id`.
    pub fn expect_get_cart(&self, user_id: impl Into<String>) -> ExpectationBuilder<Cart> {
        let user_id = user_id.into();
        ExpectationBuilder::new(
            self.expectations.clone(),
            Box::new(move |response| Expectation::GetCart { user_id, response }),
        )
    }

    /// Expects a `ping` call answering `alive`.
    pub fn expect_ping(&self, alive: bool) {
        self.expectations.lock().unwrap().push_back(Expectation::Ping(alive));
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining: {:?}", exps.len(), exps);
        }
    }

    fn next(&self, call: &str) -> Expectation {
        self.expectations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("Unexpected call: {}", call))
    }
}

/// Builder that completes an expectation with its response.
pub struct ExpectationBuilder<R> {
    expectations: Queue,
    make: Box<dyn FnOnce(Result<R, StoreError>) -> Expectation + Send>,
}

impl<R> ExpectationBuilder<R> {
    fn new(
        expectations: Queue,
        make: Box<dyn FnOnce(Result<R, StoreError>) -> Expectation + Send>,
    ) -> Self {
        Self { expectations, make }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.make)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        let expectation = (self.make)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

#[async_trait]
impl CartStore for MockCartStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        match self.next("initialize") {
            Expectation::Initialize(response) => response,
            other => panic!("Expectation mismatch: got initialize, expected {:?}", other),
        }
    }

    async fn add_item(&self, user_id: &str, _product_id: &str, _quantity: i32) -> Result<(), StoreError> {
        match self.next("add_item") {
            Expectation::AddItem { user_id: expected, response } => {
                assert_eq!(user_id, expected, "add_item called for the wrong user");
                response
            }
            other => panic!("Expectation mismatch: got add_item, expected {:?}", other),
        }
    }

    async fn empty_cart(&self, user_id: &str) -> Result<(), StoreError> {
        match self.next("empty_cart") {
            Expectation::EmptyCart { user_id: expected, response } => {
                assert_eq!(user_id, expected, "empty_cart called for the wrong user");
                response
            }
            other => panic!("Expectation mismatch: got empty_cart, expected {:?}", other),
        }
    }

    async fn get_cart(&self, user_id: &str) -> Result<Cart, StoreError> {
        match self.next("get_cart") {
            Expectation::GetCart { user_id: expected, response } => {
                assert_eq!(user_id, expected, "get_cart called for the wrong user");
                response
            }
            other => panic!("Expectation mismatch: got get_cart, expected {:?}", other),
        }
    }

    async fn ping(&self) -> bool {
        match self.next("ping") {
            Expectation::Ping(alive) => alive,
            other => panic!("Expectation mismatch: got ping, expected {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_with_expectations() {
        let mock = MockCartStore::new();
        mock.expect_add_item("user_1").return_ok(());
        mock.expect_get_cart("user_1").return_ok(Cart::with_item(
            "user_1",
            crate::model::CartItem::new("p1", 2),
        ));
        mock.expect_ping(false);

        mock.add_item("user_1", "p1", 2).await.unwrap();
        let cart = mock.get_cart("user_1").await.unwrap();
        assert_eq!(cart.quantity_of("p1"), Some(2));
        assert!(!mock.ping().await);

        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected call")]
    async fn test_unexpected_call_panics() {
        let mock = MockCartStore::new();
        let _ = mock.empty_cart("user_1").await;
    }
}
