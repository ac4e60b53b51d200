//! Port traits implemented by `larder-infra`.
//!
//! Every async trait here uses RPITIT (return position `impl Trait` in
//! traits), so no `async_trait` macro is needed.

pub mod gateway;
pub mod media;
pub mod session_draft;
