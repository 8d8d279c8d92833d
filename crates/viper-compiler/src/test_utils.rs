//! Test utilities shared by the unit tests.

use viper_ast::{Expr, Stmt};
use viper_core::Result;

use crate::bytecode::{ConstantPool, FinalizedSequence, NamePool};
use crate::config::CodegenConfig;
use crate::emit::Emitter;
use crate::unit::UnitKind;
use crate::visitor::CodegenVisitor;

/// Initialize tracing subscriber for tests with DEBUG level.
///
/// Call this at the start of tests where you want to see logging output.
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    // Try to initialize, ignore error if already initialized
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A unit's finalized code and pools.
pub struct Compiled {
    pub code: FinalizedSequence,
    pub constants: ConstantPool,
    pub names: NamePool,
}

/// Compile module-level statements without the entry marker.
pub fn compile_stmts(body: &[Stmt<'_>]) -> Result<Compiled> {
    compile_with(UnitKind::Module, |v| v.visit_body(body))
}

/// Compile function-body statements without entry marker or implicit return.
pub fn compile_function_body(body: &[Stmt<'_>]) -> Result<Compiled> {
    compile_with(UnitKind::Function, |v| v.visit_body(body))
}

/// Compile a single expression.
pub fn compile_expr(expr: &Expr<'_>) -> Result<Compiled> {
    compile_with(UnitKind::Module, |v| v.visit_expr(expr))
}

fn compile_with(
    kind: UnitKind,
    f: impl FnOnce(&mut CodegenVisitor<'_>) -> Result<()>,
) -> Result<Compiled> {
    init_test_logging();
    let config = CodegenConfig::default();
    let mut emitter = Emitter::new();
    let mut constants = ConstantPool::new();
    let mut names = NamePool::new();
    {
        let mut visitor =
            CodegenVisitor::new(&mut emitter, &mut constants, &mut names, kind, &config);
        f(&mut visitor)?;
    }
    Ok(Compiled {
        code: emitter.resolve(&config)?,
        constants,
        names,
    })
}
