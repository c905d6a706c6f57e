//! Orchestration domain
//!
//! Phases of a run and the immutable results each phase produces.

pub mod entities;
pub mod value_objects;
