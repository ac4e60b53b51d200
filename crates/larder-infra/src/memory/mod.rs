//! In-process adapters for offline use.

pub mod gateway;
