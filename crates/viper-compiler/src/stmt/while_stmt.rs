//! While loop compilation.

use viper_ast::WhileStmt;
use viper_core::Result;

use crate::bytecode::OpCode;
use crate::emit::LoopKind;
use crate::visitor::CodegenVisitor;

/// Compile a while loop.
///
/// ```text
/// loop:
///     <test>
///     POP_JUMP_IF_FALSE anchor
///     <body>
///     JUMP loop
/// anchor:
///     <orelse>
/// end:                    (only if the body breaks)
/// ```
///
/// `continue` jumps to `loop`; `break` jumps to `end`, skipping `orelse`.
pub fn compile_while(compiler: &mut CodegenVisitor<'_>, stmt: &WhileStmt<'_>) -> Result<()> {
    let head = compiler.label("while loop", stmt.span);
    let anchor = compiler.label("while loop", stmt.span);

    compiler.emitter().place(head)?;
    compiler.visit_expr(stmt.test)?;
    compiler
        .emitter()
        .emit_jump(OpCode::PopJumpIfFalse, anchor, Some(stmt.span.line))?;

    compiler.loops().enter_loop(LoopKind::While, head);
    compiler.visit_body(stmt.body)?;
    let end = compiler.loops().exit_loop();

    compiler.emitter().emit_jump(OpCode::Jump, head, None)?;
    compiler.emitter().place(anchor)?;
    compiler.visit_body(stmt.orelse)?;

    if let Some(end) = end {
        compiler.emitter().place(end)?;
    }
    Ok(())
}
