//! Statement AST nodes.
//!
//! Provides nodes for:
//! - Expression statements and assignments
//! - Control flow (if, while, for, break, continue, pass)
//! - Function definitions and returns
//! - Statement kinds the code generator declares but does not translate
//!   (class, with, try, import, global)

use crate::expr::Expr;
use crate::ops::BinaryOp;
use viper_core::Span;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// Expression evaluated for its side effects
    Expr(ExprStmt<'ast>),
    /// Assignment to one or more targets
    Assign(&'ast AssignStmt<'ast>),
    /// Augmented assignment (`x += 1`)
    AugAssign(&'ast AugAssignStmt<'ast>),
    /// If statement (elif chains nest in `orelse`)
    If(&'ast IfStmt<'ast>),
    /// While loop
    While(&'ast WhileStmt<'ast>),
    /// For loop
    For(&'ast ForStmt<'ast>),
    /// Break statement
    Break(BreakStmt),
    /// Continue statement
    Continue(ContinueStmt),
    /// Pass statement
    Pass(PassStmt),
    /// Return statement
    Return(ReturnStmt<'ast>),
    /// Function definition
    FunctionDef(&'ast FunctionDef<'ast>),
    /// Class definition
    ClassDef(&'ast ClassDef<'ast>),
    /// With statement
    With(&'ast WithStmt<'ast>),
    /// Try statement
    Try(&'ast TryStmt<'ast>),
    /// Import statement
    Import(ImportStmt<'ast>),
    /// Global declaration
    Global(GlobalStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(s) => s.span,
            Self::Assign(s) => s.span,
            Self::AugAssign(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::For(s) => s.span,
            Self::Break(s) => s.span,
            Self::Continue(s) => s.span,
            Self::Pass(s) => s.span,
            Self::Return(s) => s.span,
            Self::FunctionDef(s) => s.span,
            Self::ClassDef(s) => s.span,
            Self::With(s) => s.span,
            Self::Try(s) => s.span,
            Self::Import(s) => s.span,
            Self::Global(s) => s.span,
        }
    }

    /// Human-readable node kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Expr(_) => "expression statement",
            Self::Assign(_) => "assignment",
            Self::AugAssign(_) => "augmented assignment",
            Self::If(_) => "if statement",
            Self::While(_) => "while loop",
            Self::For(_) => "for loop",
            Self::Break(_) => "break",
            Self::Continue(_) => "continue",
            Self::Pass(_) => "pass",
            Self::Return(_) => "return",
            Self::FunctionDef(_) => "function definition",
            Self::ClassDef(_) => "class definition",
            Self::With(_) => "with statement",
            Self::Try(_) => "try statement",
            Self::Import(_) => "import",
            Self::Global(_) => "global declaration",
        }
    }
}

/// An expression statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    /// The expression
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// An assignment: `t1 = t2 = value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    /// Targets, left to right
    pub targets: &'ast [Expr<'ast>],
    /// Assigned value
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// An augmented assignment: `target op= value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AugAssignStmt<'ast> {
    /// Target (name, attribute or subscript)
    pub target: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right-hand side
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// An if statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    /// Condition
    pub test: &'ast Expr<'ast>,
    /// Statements run when the condition holds
    pub body: &'ast [Stmt<'ast>],
    /// `else` branch (an `elif` is a nested if here); empty when absent
    pub orelse: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// A while loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    /// Loop condition
    pub test: &'ast Expr<'ast>,
    /// Loop body
    pub body: &'ast [Stmt<'ast>],
    /// `else` branch, run when the loop ends without `break`
    pub orelse: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// A for loop: `for target in iter: body`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForStmt<'ast> {
    /// Loop target
    pub target: &'ast Expr<'ast>,
    /// Iterated expression
    pub iter: &'ast Expr<'ast>,
    /// Loop body
    pub body: &'ast [Stmt<'ast>],
    /// `else` branch, run when the iterator is exhausted
    pub orelse: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// A break statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakStmt {
    /// Source location
    pub span: Span,
}

/// A continue statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinueStmt {
    /// Source location
    pub span: Span,
}

/// A pass statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassStmt {
    /// Source location
    pub span: Span,
}

/// A return statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    /// Returned value, if any
    pub value: Option<&'ast Expr<'ast>>,
    /// Source location
    pub span: Span,
}

/// A function definition with positional parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDef<'ast> {
    /// Function name
    pub name: &'ast str,
    /// Parameter names in declaration order
    pub params: &'ast [&'ast str],
    /// Function body
    pub body: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// A class definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDef<'ast> {
    /// Class name
    pub name: &'ast str,
    /// Base class expressions
    pub bases: &'ast [Expr<'ast>],
    /// Class body
    pub body: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// A with statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithStmt<'ast> {
    /// Context manager expression
    pub context: &'ast Expr<'ast>,
    /// Optional `as` target
    pub target: Option<&'ast Expr<'ast>>,
    /// Body
    pub body: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// A try statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TryStmt<'ast> {
    /// Guarded body
    pub body: &'ast [Stmt<'ast>],
    /// Handler bodies
    pub handlers: &'ast [&'ast [Stmt<'ast>]],
    /// `finally` body
    pub finalbody: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// An import statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportStmt<'ast> {
    /// Dotted module names
    pub names: &'ast [&'ast str],
    /// Source location
    pub span: Span,
}

/// A global declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalStmt<'ast> {
    /// Declared names
    pub names: &'ast [&'ast str],
    /// Source location
    pub span: Span,
}
