//! Rendering engine that walks template ASTs against context data
//!
//! This module takes a linked AST and a context value and produces the
//! rendered text, with HTML escaping applied to plain interpolations.

pub mod engine;
pub mod value;

pub use engine::render;
pub use value::{ContextError, Value};
