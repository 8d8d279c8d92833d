//! Name references.

use viper_ast::NameExpr;
use viper_core::Result;

use crate::bytecode::OpCode;
use crate::visitor::CodegenVisitor;

/// Compile a name read: `LOAD_NAME`.
pub fn compile_name(compiler: &mut CodegenVisitor<'_>, expr: &NameExpr<'_>) -> Result<()> {
    compiler.emit_named(OpCode::LoadName, expr.id, expr.span.line)
}
