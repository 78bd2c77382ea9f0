//! Escalation agents
//!
//! Standalone capabilities invoked by events rather than by transaction
//! flow: containment consumes deep-lane escalations, deception consumes
//! probe verdicts from the API layer.

pub mod decoy;
pub mod hunter;

pub use decoy::DeceptionAgent;
pub use hunter::ContainmentAgent;
