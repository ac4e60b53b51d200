//! Infrastructure layer for Larder.
//!
//! Contains implementations of the port traits defined in `larder-core`:
//! the HTTP persistence gateway and media uploader, an in-memory gateway for
//! offline use, SQLite storage for autosaved sessions, plus config, catalog
//! and data-directory helpers.

pub mod catalog;
pub mod config;
pub mod filesystem;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod secret;
pub mod sqlite;
