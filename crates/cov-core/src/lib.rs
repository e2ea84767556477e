//! # cov-core
//!
//! Core types shared across all Covenant crates:
//! - Entity structs for the mirrored directory (profiles, organizations,
//!   memberships)
//! - The internal [`enums::Role`] enum and its external-role mapping
//! - [`identity::AuthIdentity`] for cross-crate passing of a validated session
//! - The [`token::TokenSource`] capability consumed by the scoped-client factory
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod token;
