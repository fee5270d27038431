//! Route handlers.
//!
//! Each handler reads only its own request and writes only its own response.

pub mod auth;
pub mod delay;
pub mod headers;
pub mod simulated;
pub mod system;
pub mod upload;
pub mod users;
