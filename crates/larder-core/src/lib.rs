//! Recipe authoring workflow and port trait definitions for Larder.
//!
//! This crate holds the authoring core (draft store, step sequencer,
//! ingredient assembly engine, instruction compiler) and the "ports" the
//! infrastructure layer implements: the persistence gateway, the media
//! uploader and the local session draft store. It depends only on
//! `larder-types` -- never on `larder-infra` or any HTTP/database crate.

pub mod authoring;
pub mod repository;
