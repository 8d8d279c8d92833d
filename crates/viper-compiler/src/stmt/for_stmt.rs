//! For loop compilation.
//!
//! The iterator stays on the stack while the body runs. `FOR_ITER` pushes
//! the next item, or jumps to the cleanup label when the iterator is
//! exhausted, where `END_FOR` discards it.

use viper_ast::ForStmt;
use viper_core::Result;

use crate::bytecode::OpCode;
use crate::emit::LoopKind;
use crate::visitor::CodegenVisitor;

use super::assignment::store_target;

/// Compile a for loop.
///
/// ```text
///     <iter>
///     GET_ITER
/// loop:
///     FOR_ITER cleanup
///     <store target>
///     <body>
///     JUMP loop
/// cleanup:
///     END_FOR
///     <orelse>
/// end:                    (only if the body breaks)
/// ```
///
/// The back edge and `END_FOR` are bookkeeping and carry no line.
pub fn compile_for(compiler: &mut CodegenVisitor<'_>, stmt: &ForStmt<'_>) -> Result<()> {
    let line = Some(stmt.span.line);
    let head = compiler.label("for loop", stmt.span);
    let cleanup = compiler.label("for loop", stmt.span);

    // 1. Evaluate the iterable once and turn it into an iterator
    compiler.visit_expr(stmt.iter)?;
    compiler.emitter().emit_op(OpCode::GetIter, line)?;

    // 2. Loop head: fetch the next item into the target
    compiler.emitter().place(head)?;
    compiler
        .emitter()
        .emit_jump(OpCode::ForIter, cleanup, line)?;
    store_target(compiler, stmt.target)?;

    // 3. Body
    compiler.loops().enter_loop(LoopKind::For, head);
    compiler.visit_body(stmt.body)?;
    let end = compiler.loops().exit_loop();
    compiler.emitter().emit_jump(OpCode::Jump, head, None)?;

    // 4. Exhausted: drop the iterator, run the else branch
    compiler.emitter().place(cleanup)?;
    compiler.emitter().emit_op(OpCode::EndFor, None)?;
    compiler.visit_body(stmt.orelse)?;

    if let Some(end) = end {
        compiler.emitter().place(end)?;
    }
    Ok(())
}
