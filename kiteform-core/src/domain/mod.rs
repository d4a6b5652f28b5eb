//! Domain types
//!
//! Core business entities shared by the client, the provider and the CLI.

pub mod pipeline;
pub mod team;
