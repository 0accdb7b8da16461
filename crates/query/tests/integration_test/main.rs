//! Integration tests for the rill-query crate.
//!
//! These exercise the public API end to end: building a base, stamping out
//! windows and executing them against the in-memory store.

mod memory;
mod windows;
