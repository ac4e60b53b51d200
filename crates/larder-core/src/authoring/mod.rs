//! Recipe authoring core.
//!
//! The session owns one draft and drives it through the five authoring
//! steps. Components:
//!
//! - [`draft::DraftStore`]: sole owner of the draft, atomic validated patches
//! - [`sequencer::StepSequencer`]: linear step navigation and per-step gates
//! - [`assembly::IngredientAssembler`]: two-phase ingredient placement and
//!   container edits
//! - [`instruction::InstructionCompiler`]: narrative and structured
//!   instructions kept in sync
//! - [`session::AuthoringSession`]: ties them together with the gateway

pub mod assembly;
pub mod draft;
pub mod instruction;
pub mod sequencer;
pub mod session;
