//! Short-circuit `and` / `or`.

use viper_ast::{BoolOp, BoolOpExpr};
use viper_core::{CodegenError, Result};

use crate::bytecode::OpCode;
use crate::visitor::CodegenVisitor;

/// Compile `a and b and c` (or `or`).
///
/// Every operand but the last is tested with its value kept on the stack:
///
/// ```text
///     <a>
///     COPY 1
///     POP_JUMP_IF_FALSE end     (POP_JUMP_IF_TRUE for `or`)
///     POP_TOP
///     <b>
/// end:
/// ```
pub fn compile_bool_op(compiler: &mut CodegenVisitor<'_>, expr: &BoolOpExpr<'_>) -> Result<()> {
    let line = Some(expr.span.line);
    let jump = match expr.op {
        BoolOp::And => OpCode::PopJumpIfFalse,
        BoolOp::Or => OpCode::PopJumpIfTrue,
    };

    let Some((last, rest)) = expr.values.split_last() else {
        return Err(CodegenError::UnsupportedConstruct {
            kind: "empty boolean operation",
            span: expr.span,
        });
    };

    let end = compiler.label("boolean operation", expr.span);
    for value in rest {
        compiler.visit_expr(value)?;
        let emitter = compiler.emitter();
        emitter.emit_arg(OpCode::Copy, 1, line)?;
        emitter.emit_jump(jump, end, line)?;
        emitter.emit_op(OpCode::PopTop, line)?;
    }
    compiler.visit_expr(last)?;
    compiler.emitter().place(end)
}
