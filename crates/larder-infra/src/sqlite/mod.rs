//! SQLite storage layer.
//!
//! Local autosave of authoring sessions, backed by SQLite with WAL mode and
//! split read/write connection pools.

pub mod pool;
pub mod session_draft;
