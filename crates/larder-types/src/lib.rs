//! Shared domain types for Larder.
//!
//! This crate contains the recipe draft aggregate and everything it is built
//! from (containers, ingredient additions, instruction steps), the read-only
//! catalog, the authoring step enumeration, configuration, and the error
//! taxonomy shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod authoring;
pub mod catalog;
pub mod config;
pub mod error;
pub mod quantity;
pub mod recipe;
