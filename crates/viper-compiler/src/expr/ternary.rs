//! Conditional expressions: `body if test else orelse`.

use viper_ast::IfExpExpr;
use viper_core::Result;

use crate::bytecode::OpCode;
use crate::visitor::CodegenVisitor;

/// Compile a conditional expression.
///
/// Only one branch is evaluated at runtime. The jump over the false branch
/// is bookkeeping and carries no line.
///
/// ```text
///     <test>
///     POP_JUMP_IF_FALSE else
///     <body>
///     JUMP end
/// else:
///     <orelse>
/// end:
/// ```
pub fn compile_if_exp(compiler: &mut CodegenVisitor<'_>, expr: &IfExpExpr<'_>) -> Result<()> {
    let line = Some(expr.span.line);
    let orelse = compiler.label("if expression", expr.span);
    let end = compiler.label("if expression", expr.span);

    // 1. Condition; skip the true branch when false
    compiler.visit_expr(expr.test)?;
    compiler
        .emitter()
        .emit_jump(OpCode::PopJumpIfFalse, orelse, line)?;

    // 2. True branch, then jump over the false branch
    compiler.visit_expr(expr.body)?;
    compiler.emitter().emit_jump(OpCode::Jump, end, None)?;

    // 3. False branch
    compiler.emitter().place(orelse)?;
    compiler.visit_expr(expr.orelse)?;

    compiler.emitter().place(end)
}
