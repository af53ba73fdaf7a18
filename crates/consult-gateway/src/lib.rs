//! # consult-gateway
//!
//! WebSocket presence gateway: roster presence, room groups, and transcript
//! relay over JSON text frames.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_router, GatewayState};
