//! Compilation units and the compiler entry point.
//!
//! A unit is one independently compiled body: the module itself or a
//! function definition. Each unit owns its emitter and pools for the whole
//! of its compilation; a function nested in another unit is compiled to its
//! own [`CodeUnit`] and stored in the parent's constant pool.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};
use viper_ast::{Module, Stmt};
use viper_core::Result;

use crate::bytecode::{
    Constant, ConstantPool, Element, FinalizedSequence, NamePool, OpFlags, Oparg,
};
use crate::config::CodegenConfig;
use crate::emit::Emitter;
use crate::visitor::CodegenVisitor;

/// Name given to the module unit.
pub const MODULE_UNIT_NAME: &str = "<module>";

/// What kind of body a unit compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Top level of a source file.
    Module,
    /// Body of a `def`.
    Function,
}

impl UnitKind {
    /// Lowercase name used in listings.
    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::Module => "module",
            UnitKind::Function => "function",
        }
    }
}

/// A fully compiled unit.
///
/// Immutable once built. Everything it holds is owned data, so units can be
/// shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeUnit {
    name: String,
    kind: UnitKind,
    params: Vec<String>,
    first_line: u32,
    code: FinalizedSequence,
    constants: ConstantPool,
    names: NamePool,
}

impl CodeUnit {
    /// Unit name: the function name, or `<module>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Parameter names, in declaration order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Line of the construct that opened the unit.
    pub fn first_line(&self) -> u32 {
        self.first_line
    }

    /// The finalized instruction sequence.
    pub fn code(&self) -> &FinalizedSequence {
        &self.code
    }

    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }

    pub fn names(&self) -> &NamePool {
        &self.names
    }

    /// Units of functions defined directly in this one, in definition order.
    pub fn nested(&self) -> impl Iterator<Item = &CodeUnit> + '_ {
        self.constants
            .iter()
            .filter_map(Constant::as_code)
            .map(|code| code.as_ref())
    }

    /// Find a directly nested unit by name.
    pub fn nested_unit(&self, name: &str) -> Option<&CodeUnit> {
        self.nested().find(|unit| unit.name == name)
    }

    /// Maximum operand-stack depth of this unit's code.
    pub fn max_stack_depth(&self) -> Result<u32> {
        self.code.max_stack_depth()
    }

    /// Human-readable operand annotation: the constant or name an
    /// instruction refers to.
    fn annotation(&self, element: &Element) -> Option<String> {
        let instr = element.as_instruction()?;
        let flags = instr.opcode.flags();
        match instr.oparg {
            Oparg::Arg(index) if flags.contains(OpFlags::CONST_ARG) => {
                self.constants.get(index).map(ToString::to_string)
            }
            Oparg::Arg(index) if flags.contains(OpFlags::NAME_ARG) => {
                self.names.get(index).map(str::to_string)
            }
            Oparg::Target(index) => self
                .code
                .get(index)
                .and_then(Element::as_label)
                .map(|label| format!("to {}", label)),
            _ => None,
        }
    }
}

impl fmt::Display for CodeUnit {
    /// Disassembly listing of this unit followed by its nested units.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Disassembly of {} ({}, line {}):",
            self.name,
            self.kind.as_str(),
            self.first_line
        )?;

        for (index, element) in self.code.elements().iter().enumerate() {
            match element {
                Element::Label(label) => writeln!(f, "{:>4}  {}:", index, label)?,
                Element::Instr(instr) => {
                    let line = instr.line.map(|l| l.to_string()).unwrap_or_default();
                    let arg = match instr.oparg {
                        Oparg::None => String::new(),
                        Oparg::Arg(arg) => arg.to_string(),
                        Oparg::Target(target) => target.to_string(),
                    };
                    let name = instr.opcode.name();
                    write!(f, "{:>4} {:>5}    {:<20}{:>6}", index, line, name, arg)?;
                    match self.annotation(element) {
                        Some(note) => writeln!(f, "  ({})", note)?,
                        None => writeln!(f)?,
                    }
                }
            }
        }

        for unit in self.nested() {
            writeln!(f)?;
            write!(f, "{}", unit)?;
        }
        Ok(())
    }
}

/// Compile one unit's body with a fresh emitter and pools.
///
/// Parameters are interned into the name pool before anything else so they
/// take the first name indices.
#[cfg_attr(feature = "profiling", profiling::function)]
#[instrument(level = "debug", skip_all, fields(unit = name, kind = kind.as_str()))]
pub(crate) fn compile_unit(
    name: &str,
    kind: UnitKind,
    params: &[&str],
    first_line: u32,
    body: &[Stmt<'_>],
    config: &CodegenConfig,
) -> Result<CodeUnit> {
    let mut emitter = Emitter::new();
    let mut constants = ConstantPool::new();
    let mut names = NamePool::new();
    for param in params {
        names.intern(param);
    }

    {
        let mut visitor =
            CodegenVisitor::new(&mut emitter, &mut constants, &mut names, kind, config);
        visitor.emit_entry()?;
        visitor.visit_body(body)?;
        visitor.emit_implicit_return()?;
    }

    let code = emitter.finish(config)?;
    debug!(
        elements = code.len(),
        constants = constants.len(),
        names = names.len(),
        "compiled unit"
    );

    Ok(CodeUnit {
        name: name.to_string(),
        kind,
        params: params.iter().map(|p| p.to_string()).collect(),
        first_line,
        code,
        constants,
        names,
    })
}

/// Compiles modules to [`CodeUnit`]s under one configuration.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use viper_ast::AstBuilder;
/// use viper_compiler::{CodegenConfig, Compiler};
/// use viper_compiler::bytecode::OpCode;
///
/// let arena = Bump::new();
/// let b = AstBuilder::new(&arena);
/// let module = b.module(&[b.assign(&[b.name("x", 1)], b.int(1, 1), 1)]);
///
/// let compiler = Compiler::new(CodegenConfig::new().with_emit_resume(false));
/// let unit = compiler.compile_module(&module).unwrap();
/// unit.code().assert_opcodes(&[OpCode::LoadConst, OpCode::StoreName]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CodegenConfig,
}

impl Compiler {
    pub fn new(config: CodegenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Compile a module and every function defined in it.
    pub fn compile_module(&self, module: &Module<'_>) -> Result<CodeUnit> {
        compile_unit(
            MODULE_UNIT_NAME,
            UnitKind::Module,
            &[],
            module.span().line,
            module.body(),
            &self.config,
        )
    }

    /// Compile a module into a shareable unit.
    pub fn compile_module_shared(&self, module: &Module<'_>) -> Result<Arc<CodeUnit>> {
        self.compile_module(module).map(Arc::new)
    }
}

/// Compile a module with the default configuration.
pub fn compile_module(module: &Module<'_>) -> Result<CodeUnit> {
    Compiler::default().compile_module(module)
}
