//! Gate compilation for qshift.
//!
//! Decomposes gates that an evaluation backend or a gradient rule cannot use
//! directly into sequences of simpler gates. Currently this covers
//! singly-controlled rotations, see [`compile_controlled_rotation`].

pub mod controlled;
pub mod error;

pub use controlled::{compile_controlled_rotation, default_angles};
pub use error::{CompileError, CompileResult};
