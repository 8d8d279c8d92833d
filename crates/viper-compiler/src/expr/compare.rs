//! Comparisons, including chains such as `a < b < c`.

use viper_ast::{CmpOp, CompareExpr};
use viper_core::{CodegenError, Result};

use crate::bytecode::OpCode;
use crate::visitor::CodegenVisitor;

/// Opcode and operand for a comparison operator.
pub fn compare_instruction(op: CmpOp) -> (OpCode, u32) {
    match op {
        CmpOp::Lt => (OpCode::CompareOp, 0),
        CmpOp::LtE => (OpCode::CompareOp, 1),
        CmpOp::Eq => (OpCode::CompareOp, 2),
        CmpOp::NotEq => (OpCode::CompareOp, 3),
        CmpOp::Gt => (OpCode::CompareOp, 4),
        CmpOp::GtE => (OpCode::CompareOp, 5),
        CmpOp::Is => (OpCode::IsOp, 0),
        CmpOp::IsNot => (OpCode::IsOp, 1),
        CmpOp::In => (OpCode::ContainsOp, 0),
        CmpOp::NotIn => (OpCode::ContainsOp, 1),
    }
}

/// Compile a comparison.
///
/// A single comparison is `<left> <right> CMP`. A chain evaluates each
/// middle operand once and stops at the first false link:
///
/// ```text
///     <left>
///     <c0>  SWAP 2  COPY 2  CMP0
///     COPY 1  POP_JUMP_IF_FALSE cleanup  POP_TOP
///     ...
///     <cn>  CMPn
///     JUMP end
/// cleanup:
///     SWAP 2  POP_TOP
/// end:
/// ```
pub fn compile_compare(compiler: &mut CodegenVisitor<'_>, expr: &CompareExpr<'_>) -> Result<()> {
    let line = Some(expr.span.line);

    if expr.ops.is_empty() || expr.ops.len() != expr.comparators.len() {
        return Err(CodegenError::UnsupportedConstruct {
            kind: "malformed comparison",
            span: expr.span,
        });
    }

    compiler.visit_expr(expr.left)?;

    let last = expr.ops.len() - 1;
    if last == 0 {
        compiler.visit_expr(&expr.comparators[0])?;
        return emit_compare(compiler, expr.ops[0], line);
    }

    let cleanup = compiler.label("comparison", expr.span);
    let end = compiler.label("comparison", expr.span);

    for (op, comparator) in expr.ops[..last].iter().zip(&expr.comparators[..last]) {
        compiler.visit_expr(comparator)?;
        let emitter = compiler.emitter();
        emitter.emit_arg(OpCode::Swap, 2, line)?;
        emitter.emit_arg(OpCode::Copy, 2, line)?;
        emit_compare(compiler, *op, line)?;
        let emitter = compiler.emitter();
        emitter.emit_arg(OpCode::Copy, 1, line)?;
        emitter.emit_jump(OpCode::PopJumpIfFalse, cleanup, line)?;
        emitter.emit_op(OpCode::PopTop, line)?;
    }

    compiler.visit_expr(&expr.comparators[last])?;
    emit_compare(compiler, expr.ops[last], line)?;

    let emitter = compiler.emitter();
    emitter.emit_jump(OpCode::Jump, end, None)?;
    emitter.place(cleanup)?;
    emitter.emit_arg(OpCode::Swap, 2, None)?;
    emitter.emit_op(OpCode::PopTop, None)?;
    emitter.place(end)
}

fn emit_compare(compiler: &mut CodegenVisitor<'_>, op: CmpOp, line: Option<u32>) -> Result<()> {
    let (opcode, arg) = compare_instruction(op);
    compiler.emitter().emit_arg(opcode, arg, line)
}
