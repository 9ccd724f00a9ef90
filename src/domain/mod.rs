//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Rich domain types
//! - `wire.rs`: Parsing of raw API responses
//! - `state.rs`: State containers with update methods
//! - `client.rs`: Sub-client with fetch and caching logic

pub mod price_history;
