//! Viper: code generation for a Python-like bytecode compiler.
//!
//! This crate ties the workspace together:
//!
//! - [`ast`] - arena-allocated syntax tree and its builder
//! - [`bytecode`] - opcodes, finalized sequences and operand pools
//! - [`emit`] - the instruction emitter with symbolic labels
//!
//! Most users only need [`compile_module`] or a configured [`Compiler`].
//!
//! ```
//! use viper::prelude::*;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let module = b.module(&[b.assign(&[b.name("x", 1)], b.int(1, 1), 1)]);
//!
//! let unit = compile_module(&module)?;
//! assert_eq!(unit.name(), "<module>");
//! assert_eq!(unit.code().instruction_count(), 3);
//! # Ok::<(), CodegenError>(())
//! ```

pub use viper_ast as ast;
pub use viper_compiler::{bytecode, emit};

pub use viper_compiler::{
    CodeUnit, CodegenConfig, CodegenVisitor, Compiler, Emitter, MODULE_UNIT_NAME, UnitKind,
    compile_module,
};
pub use viper_core::{CodegenError, Result, Span};

/// Common imports for building and compiling trees.
pub mod prelude {
    pub use crate::ast::{AstBuilder, BinaryOp, BoolOp, CmpOp, Module, UnaryOp};
    pub use crate::bytecode::{Element, FinalizedSequence, Instruction, OpCode, Oparg};
    pub use crate::{
        CodeUnit, CodegenConfig, CodegenError, Compiler, Span, UnitKind, compile_module,
    };
    pub use bumpalo::Bump;
}
