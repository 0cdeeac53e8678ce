//! REST API handlers

pub mod auth;
pub mod health;
pub mod todos;
pub mod users;

pub use auth::*;
pub use health::*;
pub use todos::*;
pub use users::*;
