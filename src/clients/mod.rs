//! Type-safe wrappers around the call-dispatch chain.

pub mod cart_client;

pub use cart_client::*;
