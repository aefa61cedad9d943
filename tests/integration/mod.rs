//! Integration tests for browserkit
//!
//! Every test drives the same in-process scaffold application through the
//! public `Connector` API. No network and no real framework install are
//! involved; the scaffold fakes just enough of a dispatch pipeline to
//! exercise request translation, hooks, sessions and error rendering.
//!
//! Run with: cargo test --test integration

mod helpers;

mod cookies;
mod error_handling;
