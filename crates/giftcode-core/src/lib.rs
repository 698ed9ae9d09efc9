//! Shared service plumbing: health endpoints, request-id middleware,
//! serde helpers, and tracing initialization.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
