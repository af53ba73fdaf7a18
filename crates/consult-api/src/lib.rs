//! # consult-api
//!
//! HTTP API built with Axum, plus the process wiring that mounts the
//! presence gateway on the same listener.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
