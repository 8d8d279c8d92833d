//! Function definitions.

use std::sync::Arc;

use tracing::debug;
use viper_ast::FunctionDef;
use viper_core::Result;

use crate::bytecode::{Constant, OpCode};
use crate::unit::{UnitKind, compile_unit};
use crate::visitor::CodegenVisitor;

/// Compile `def name(params): body`.
///
/// The body becomes a separate unit with its own emitter and pools. The
/// enclosing unit only sees the finished code object:
///
/// ```text
///     LOAD_CONST <code name>
///     MAKE_FUNCTION
///     STORE_NAME name
/// ```
///
/// Loops of the enclosing unit are not visible inside the body.
pub fn compile_function_def(
    compiler: &mut CodegenVisitor<'_>,
    def: &FunctionDef<'_>,
) -> Result<()> {
    let line = def.span.line;
    let unit = compile_unit(
        def.name,
        UnitKind::Function,
        def.params,
        line,
        def.body,
        compiler.config(),
    )?;
    debug!(function = def.name, line, "nested unit ready");

    compiler.load_const(Constant::Code(Arc::new(unit)), line)?;
    compiler
        .emitter()
        .emit_op(OpCode::MakeFunction, Some(line))?;
    compiler.emit_named(OpCode::StoreName, def.name, line)
}
