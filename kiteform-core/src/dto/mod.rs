//! Data Transfer Objects for the remote GraphQL protocol
//!
//! These mirror the shapes the remote sends and accepts. Domain types are
//! produced from them through `From` conversions so the rest of the
//! workspace never handles wire field names.

pub mod organization;
pub mod pipeline;
pub mod team;
