//! Domain types for the gift-code lifecycle service.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod code;
pub mod id;
pub mod lockout;
pub mod pagination;
