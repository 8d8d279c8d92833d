//! `return` statements.

use viper_ast::ReturnStmt;
use viper_core::{CodegenError, Result};

use crate::bytecode::{Constant, OpCode};
use crate::unit::UnitKind;
use crate::visitor::CodegenVisitor;

/// Compile `return`.
///
/// Iterators of enclosing `for` loops are still on the stack and are popped
/// first. A returned value is kept on top by swapping it below each one.
pub fn compile_return(compiler: &mut CodegenVisitor<'_>, stmt: &ReturnStmt<'_>) -> Result<()> {
    if compiler.kind() != UnitKind::Function {
        return Err(CodegenError::ReturnOutsideFunction { span: stmt.span });
    }

    let line = Some(stmt.span.line);
    let iterators = compiler.loops().for_loop_depth();

    match stmt.value {
        Some(value) => {
            compiler.visit_expr(value)?;
            for _ in 0..iterators {
                compiler.emitter().emit_arg(OpCode::Swap, 2, line)?;
                compiler.emitter().emit_op(OpCode::PopTop, line)?;
            }
            compiler.emitter().emit_op(OpCode::ReturnValue, line)
        }
        None => {
            for _ in 0..iterators {
                compiler.emitter().emit_op(OpCode::PopTop, line)?;
            }
            let none = compiler.const_index(Constant::None);
            compiler.emitter().emit_arg(OpCode::ReturnConst, none, line)
        }
    }
}
