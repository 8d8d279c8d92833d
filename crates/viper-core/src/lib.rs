//! Core types shared by the viper crates.
//!
//! - [`Span`] - source locations attached to AST nodes
//! - [`CodegenError`] - every failure the code generator can report

mod error;
mod span;

pub use error::{CodegenError, Result};
pub use span::Span;
