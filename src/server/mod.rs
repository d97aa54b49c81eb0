//! HTTP server for the query guard

pub mod listener;
pub mod routes;

pub use listener::{start_test_server, GuardServer, ServerError, ServerHandle};
pub use routes::{build_router, ProcessResponse};
