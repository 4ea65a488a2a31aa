//! Pure data structures shared by the store, the service and the clients.

pub mod cart;

pub use cart::*;
