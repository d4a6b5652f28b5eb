//! Kiteform Core
//!
//! Core types and abstractions for managing CI pipelines as code.
//!
//! This crate contains:
//! - Domain types: pipelines, team access levels and grants
//! - DTOs: wire shapes of the remote GraphQL protocol
//! - Configuration errors raised at the typed configuration boundary

pub mod domain;
pub mod dto;
pub mod error;

pub use error::ConfigError;
