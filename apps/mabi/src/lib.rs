//! # mabi
//!
//! Library half of the mabi binary: upstream client, search service, HTTP
//! API and CLI. Exposed as a library so integration tests can drive the
//! router and service directly.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod service;
