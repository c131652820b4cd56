//! Public surface for the `apishape-demo` crate.
//!
//! Exposes the router builder and config types so that external crates
//! (e.g. the conformance suite) can start an in-process service.

pub mod config;
pub mod handlers;
pub mod model;
pub mod router;
pub mod store;
pub mod transformers;

pub use config::{DemoConfig, DemoConfigError};
pub use router::build_router;
pub use store::{memory::MemoryStore, Store, StoreError};
