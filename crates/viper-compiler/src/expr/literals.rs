//! Literal constants.

use viper_ast::{ConstantExpr, Literal};
use viper_core::Result;

use crate::bytecode::Constant;
use crate::visitor::CodegenVisitor;

/// Compile a literal: `LOAD_CONST` of its pooled value.
pub fn compile_constant(compiler: &mut CodegenVisitor<'_>, expr: &ConstantExpr<'_>) -> Result<()> {
    compiler.load_const(literal_constant(&expr.value), expr.span.line)
}

fn literal_constant(literal: &Literal<'_>) -> Constant {
    match *literal {
        Literal::None => Constant::None,
        Literal::Bool(value) => Constant::Bool(value),
        Literal::Int(value) => Constant::Int(value),
        Literal::Float(value) => Constant::Float(value),
        Literal::Str(value) => Constant::Str(value.to_string()),
    }
}
