//! The code generation visitor.
//!
//! [`CodegenVisitor`] walks one unit's AST and drives an [`Emitter`]. Its
//! behavior is split by node family: expression lowering lives in
//! `crate::expr`, statement lowering in `crate::stmt`, each adding an `impl`
//! block and a set of `compile_*` functions.
//!
//! Every statement is compiled atomically: if it fails, the emitter, pools
//! and loop stack are rolled back to where they stood before it began.

use viper_ast::{Module, Stmt};
use viper_core::{Result, Span};

use crate::bytecode::{Constant, ConstantPool, Label, NamePool, OpCode};
use crate::config::CodegenConfig;
use crate::emit::{Checkpoint, Emitter, LoopStack};
use crate::unit::UnitKind;

/// Translates AST nodes of one unit into emitter calls.
///
/// Borrows the unit's emitter and pools exclusively, so independent units
/// can be compiled on separate threads without coordination.
pub struct CodegenVisitor<'a> {
    /// Instruction emitter for this unit
    emitter: &'a mut Emitter,
    /// Constant pool for this unit
    constants: &'a mut ConstantPool,
    /// Name pool for this unit
    names: &'a mut NamePool,
    /// Enclosing loops, innermost last
    loops: LoopStack,
    /// Module or function body
    kind: UnitKind,
    config: &'a CodegenConfig,
}

/// Everything a failed statement must restore.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StmtCheckpoint {
    emitter: Checkpoint,
    constants: usize,
    names: usize,
    loop_depth: usize,
}

impl<'a> CodegenVisitor<'a> {
    /// Create a visitor over a unit's emitter and pools.
    pub fn new(
        emitter: &'a mut Emitter,
        constants: &'a mut ConstantPool,
        names: &'a mut NamePool,
        kind: UnitKind,
        config: &'a CodegenConfig,
    ) -> Self {
        Self {
            emitter,
            constants,
            names,
            loops: LoopStack::new(),
            kind,
            config,
        }
    }

    /// Compile a whole module: the entry marker, then each statement.
    pub fn visit_module(&mut self, module: &Module<'_>) -> Result<()> {
        self.emit_entry()?;
        self.visit_body(module.body())
    }

    /// Compile statements in order, stopping at the first failure.
    pub fn visit_body(&mut self, body: &[Stmt<'_>]) -> Result<()> {
        for stmt in body {
            self.visit_stmt(stmt)?;
        }
        Ok(())
    }

    /// Emit the unit's `RESUME` marker, if enabled.
    pub fn emit_entry(&mut self) -> Result<()> {
        if self.config.emit_resume {
            self.emitter.emit_op(OpCode::Resume, Some(0))?;
        }
        Ok(())
    }

    /// Emit the trailing `RETURN_CONST None` of a function body, if enabled.
    pub fn emit_implicit_return(&mut self) -> Result<()> {
        if self.kind == UnitKind::Function && self.config.implicit_return {
            let none = self.constants.intern(Constant::None);
            self.emitter.emit_arg(OpCode::ReturnConst, none, None)?;
        }
        Ok(())
    }

    // ==========================================================================
    // Accessors for the expr/stmt modules
    // ==========================================================================

    pub(crate) fn emitter(&mut self) -> &mut Emitter {
        &mut *self.emitter
    }

    pub(crate) fn loops(&mut self) -> &mut LoopStack {
        &mut self.loops
    }

    pub(crate) fn loops_and_emitter(&mut self) -> (&mut LoopStack, &mut Emitter) {
        (&mut self.loops, &mut *self.emitter)
    }

    pub(crate) fn kind(&self) -> UnitKind {
        self.kind
    }

    pub(crate) fn config(&self) -> &CodegenConfig {
        self.config
    }

    /// Create a label attributed to the construct at `span`.
    pub(crate) fn label(&mut self, construct: &'static str, span: Span) -> Label {
        self.emitter.new_label_for(construct, span)
    }

    /// Intern a name, returning its pool index.
    pub(crate) fn name_index(&mut self, name: &str) -> u32 {
        self.names.intern(name)
    }

    /// Intern a constant, returning its pool index.
    pub(crate) fn const_index(&mut self, constant: Constant) -> u32 {
        self.constants.intern(constant)
    }

    /// Emit `LOAD_CONST` for `constant`.
    pub(crate) fn load_const(&mut self, constant: Constant, line: u32) -> Result<()> {
        let index = self.constants.intern(constant);
        self.emitter.emit_arg(OpCode::LoadConst, index, Some(line))
    }

    /// Emit a name-indexed opcode (`LOAD_NAME`, `STORE_ATTR`, ...).
    pub(crate) fn emit_named(&mut self, opcode: OpCode, name: &str, line: u32) -> Result<()> {
        let index = self.names.intern(name);
        self.emitter.emit_arg(opcode, index, Some(line))
    }

    pub(crate) fn checkpoint(&self) -> StmtCheckpoint {
        StmtCheckpoint {
            emitter: self.emitter.checkpoint(),
            constants: self.constants.len(),
            names: self.names.len(),
            loop_depth: self.loops.loop_depth(),
        }
    }

    pub(crate) fn rollback(&mut self, checkpoint: StmtCheckpoint) {
        self.emitter.rollback(checkpoint.emitter);
        self.constants.truncate(checkpoint.constants);
        self.names.truncate(checkpoint.names);
        self.loops
            .rollback(checkpoint.loop_depth, checkpoint.emitter.label_count());
    }
}
