//! If statement compilation.
//!
//! `elif` chains arrive as an `if` nested in the `orelse` branch.

use viper_ast::IfStmt;
use viper_core::Result;

use crate::bytecode::OpCode;
use crate::visitor::CodegenVisitor;

/// Compile an if statement.
///
/// ```text
///     <test>
///     POP_JUMP_IF_FALSE next
///     <body>
///     JUMP end            (only with an else branch)
/// next:
///     <orelse>
/// end:
/// ```
pub fn compile_if(compiler: &mut CodegenVisitor<'_>, stmt: &IfStmt<'_>) -> Result<()> {
    let next = compiler.label("if statement", stmt.span);

    compiler.visit_expr(stmt.test)?;
    compiler
        .emitter()
        .emit_jump(OpCode::PopJumpIfFalse, next, Some(stmt.span.line))?;
    compiler.visit_body(stmt.body)?;

    if stmt.orelse.is_empty() {
        return compiler.emitter().place(next);
    }

    let end = compiler.label("if statement", stmt.span);
    compiler.emitter().emit_jump(OpCode::Jump, end, None)?;
    compiler.emitter().place(next)?;
    compiler.visit_body(stmt.orelse)?;
    compiler.emitter().place(end)
}
