//! Identity types shared across gift-code services.
//!
//! The identity provider itself is external; the gateway validates its
//! signed claims and injects the result as headers. This crate provides
//! the `Identity` extractor for those headers.

pub mod identity;
