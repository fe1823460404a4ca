//! Core modules for Purview's policy index and resolution engine.
//!
//! All shared primitives live here: the snapshot index, the precedence
//! walk, the override gate, and the ambient CLI surfaces around them.

pub mod assets;
pub mod check;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gate;
pub mod graph;
pub mod index;
pub mod output;
pub mod resolve;
pub mod scaffold;
