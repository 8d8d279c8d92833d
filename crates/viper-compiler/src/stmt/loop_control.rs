//! `break` and `continue`.

use viper_ast::{BreakStmt, ContinueStmt};
use viper_core::{CodegenError, Result};

use crate::bytecode::OpCode;
use crate::emit::LoopKind;
use crate::visitor::CodegenVisitor;

/// Compile `break`: leave the innermost loop, skipping its `else` branch.
///
/// Breaking out of a `for` loop first pops the loop's iterator. The loop's
/// exit label is created by the first `break` that needs it.
pub fn compile_break(compiler: &mut CodegenVisitor<'_>, stmt: &BreakStmt) -> Result<()> {
    let line = Some(stmt.span.line);

    let (loops, emitter) = compiler.loops_and_emitter();
    let Some((kind, end)) = loops.break_target(|| emitter.new_label_for("break", stmt.span)) else {
        return Err(CodegenError::OutsideLoop {
            keyword: "break",
            span: stmt.span,
        });
    };

    if kind == LoopKind::For {
        emitter.emit_op(OpCode::PopTop, line)?;
    }
    emitter.emit_jump(OpCode::Jump, end, line)
}

/// Compile `continue`: jump back to the innermost loop's head.
pub fn compile_continue(compiler: &mut CodegenVisitor<'_>, stmt: &ContinueStmt) -> Result<()> {
    let Some((_, head)) = compiler.loops().continue_target() else {
        return Err(CodegenError::OutsideLoop {
            keyword: "continue",
            span: stmt.span,
        });
    };
    compiler
        .emitter()
        .emit_jump(OpCode::Jump, head, Some(stmt.span.line))
}
