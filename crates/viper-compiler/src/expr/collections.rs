//! List and tuple displays.

use viper_ast::SequenceExpr;
use viper_core::Result;

use crate::bytecode::OpCode;
use crate::visitor::CodegenVisitor;

/// Compile `[a, b, ...]`.
pub fn compile_list(compiler: &mut CodegenVisitor<'_>, expr: &SequenceExpr<'_>) -> Result<()> {
    compile_sequence(compiler, expr, OpCode::BuildList)
}

/// Compile `(a, b, ...)`.
pub fn compile_tuple(compiler: &mut CodegenVisitor<'_>, expr: &SequenceExpr<'_>) -> Result<()> {
    compile_sequence(compiler, expr, OpCode::BuildTuple)
}

fn compile_sequence(
    compiler: &mut CodegenVisitor<'_>,
    expr: &SequenceExpr<'_>,
    build: OpCode,
) -> Result<()> {
    for elt in expr.elts {
        compiler.visit_expr(elt)?;
    }
    compiler
        .emitter()
        .emit_arg(build, expr.elts.len() as u32, Some(expr.span.line))
}
