//! Core types, trait definitions and services for the Stride activity log.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; storage backends plug in through the traits
//! in [`store`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod log;
pub mod profile;
pub mod registry;
pub mod resolve;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use log::SessionLog;
pub use registry::{ProfileLookup, ProfileRegistry, ProfileService};
