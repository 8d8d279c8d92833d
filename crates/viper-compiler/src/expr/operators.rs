//! Arithmetic, bitwise and unary operators.
//!
//! Binary operators share one opcode, `BINARY_OP`, whose operand selects the
//! operation. In-place forms used by augmented assignment add
//! [`INPLACE_OFFSET`] to the plain code.

use viper_ast::{BinaryExpr, BinaryOp, UnaryExpr, UnaryOp};
use viper_core::Result;

use crate::bytecode::OpCode;
use crate::visitor::CodegenVisitor;

/// Added to a `BINARY_OP` code to select the in-place variant.
pub const INPLACE_OFFSET: u32 = 13;

/// The `BINARY_OP` operand for an operator.
pub fn binary_op_code(op: BinaryOp) -> u32 {
    match op {
        BinaryOp::Add => 0,
        BinaryOp::BitAnd => 1,
        BinaryOp::FloorDiv => 2,
        BinaryOp::LShift => 3,
        BinaryOp::MatMul => 4,
        BinaryOp::Mul => 5,
        BinaryOp::Mod => 6,
        BinaryOp::BitOr => 7,
        BinaryOp::Pow => 8,
        BinaryOp::RShift => 9,
        BinaryOp::Sub => 10,
        BinaryOp::Div => 11,
        BinaryOp::BitXor => 12,
    }
}

fn unary_opcode(op: UnaryOp) -> OpCode {
    match op {
        UnaryOp::Not => OpCode::UnaryNot,
        UnaryOp::Neg => OpCode::UnaryNegative,
        UnaryOp::Pos => OpCode::UnaryPositive,
        UnaryOp::Invert => OpCode::UnaryInvert,
    }
}

/// Compile `left op right`: both operands, then `BINARY_OP`.
pub fn compile_binary(compiler: &mut CodegenVisitor<'_>, expr: &BinaryExpr<'_>) -> Result<()> {
    compiler.visit_expr(expr.left)?;
    compiler.visit_expr(expr.right)?;
    let arg = binary_op_code(expr.op);
    compiler
        .emitter()
        .emit_arg(OpCode::BinaryOp, arg, Some(expr.span.line))
}

/// Compile a unary operation: the operand, then the operator's opcode.
pub fn compile_unary(compiler: &mut CodegenVisitor<'_>, expr: &UnaryExpr<'_>) -> Result<()> {
    compiler.visit_expr(expr.operand)?;
    compiler
        .emitter()
        .emit_op(unary_opcode(expr.op), Some(expr.span.line))
}
