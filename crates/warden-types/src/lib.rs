//! Warden Types - Shared domain types
//!
//! This crate contains domain types used across the Warden workspace:
//! - Account and todo identifiers
//! - The verified identity published by the authorization guard
//! - Request and response bodies of the HTTP API

pub mod account;
pub mod api;
pub mod identity;
pub mod todo;

pub use account::*;
pub use api::*;
pub use identity::*;
pub use todo::*;
