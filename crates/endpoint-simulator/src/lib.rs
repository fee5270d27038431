//! HTTP endpoint simulator for exercising API clients.
//!
//! Every route is a stateless mapping from request to response: echo routes,
//! authentication outcomes, upload acknowledgment, delayed responses and
//! simulated error statuses.

pub mod body;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod types;

pub use config::SimulatorConfig;
pub use error::SimulatorError;
pub use router::{route_request, Route};
pub use server::SimulatorServer;
