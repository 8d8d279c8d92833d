//! Viper code generator.
//!
//! Lowers a [`viper_ast`] tree into a linear, unoptimized instruction
//! sequence for a stack-based virtual machine.
//!
//! ## Architecture
//!
//! - **Emission**: the [`CodegenVisitor`] walks one unit's AST and appends
//!   instructions and label markers to an [`Emitter`]. Jumps name symbolic
//!   labels, which may be placed before or after the jump.
//! - **Resolution**: [`Emitter::resolve`] replaces every label reference with
//!   the element index of that label's marker, producing a
//!   [`FinalizedSequence`](bytecode::FinalizedSequence).
//!
//! Function definitions are compiled as separate units and stored in the
//! enclosing unit's constant pool.
//!
//! ## Modules
//!
//! - [`bytecode`]: opcodes, instructions, finalized sequences, operand pools
//! - [`emit`]: the emitter and its label bookkeeping
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use viper_ast::AstBuilder;
//! use viper_compiler::compile_module;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//!
//! // 1 if 2 else 3
//! let module = b.module(&[b.expr_stmt(b.if_exp(b.int(1, 1), b.int(2, 1), b.int(3, 1), 1))]);
//! let unit = compile_module(&module)?;
//!
//! assert_eq!(unit.code().jump_target(2), Some(5));
//! assert_eq!(unit.code().jump_target(4), Some(7));
//! # Ok::<(), viper_compiler::CodegenError>(())
//! ```

pub mod bytecode;
mod config;
pub mod emit;
mod expr;
mod stmt;
mod unit;
mod visitor;

#[cfg(test)]
mod test_utils;

pub use config::CodegenConfig;
pub use emit::{Checkpoint, Emitter, Origin};
pub use unit::{CodeUnit, Compiler, MODULE_UNIT_NAME, UnitKind, compile_module};
pub use visitor::CodegenVisitor;

// Re-export core types for convenience
pub use viper_core::{CodegenError, Result, Span};
