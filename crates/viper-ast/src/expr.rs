//! Expression AST nodes.
//!
//! Compound nodes are stored behind `&'ast` references into the arena so that
//! [`Expr`] stays small and `Copy`.

use crate::ops::{BinaryOp, BoolOp, CmpOp, UnaryOp};
use viper_core::Span;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal constant
    Constant(ConstantExpr<'ast>),
    /// Name reference
    Name(NameExpr<'ast>),
    /// Binary arithmetic/bitwise operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Short-circuit `and`/`or` over two or more operands
    BoolOp(&'ast BoolOpExpr<'ast>),
    /// Comparison, possibly chained (`a < b < c`)
    Compare(&'ast CompareExpr<'ast>),
    /// Conditional expression (`body if test else orelse`)
    IfExp(&'ast IfExpExpr<'ast>),
    /// Function or method call
    Call(&'ast CallExpr<'ast>),
    /// Attribute access (`value.attr`)
    Attribute(&'ast AttributeExpr<'ast>),
    /// Subscript (`value[index]`)
    Subscript(&'ast SubscriptExpr<'ast>),
    /// List display (`[a, b]`)
    List(SequenceExpr<'ast>),
    /// Tuple display (`(a, b)`)
    Tuple(SequenceExpr<'ast>),
    /// Lambda expression
    Lambda(&'ast LambdaExpr<'ast>),
    /// `yield` expression
    Yield(&'ast YieldExpr<'ast>),
    /// `await` expression
    Await(&'ast AwaitExpr<'ast>),
    /// Starred expression (`*args`)
    Starred(&'ast StarredExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Constant(e) => e.span,
            Self::Name(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::BoolOp(e) => e.span,
            Self::Compare(e) => e.span,
            Self::IfExp(e) => e.span,
            Self::Call(e) => e.span,
            Self::Attribute(e) => e.span,
            Self::Subscript(e) => e.span,
            Self::List(e) => e.span,
            Self::Tuple(e) => e.span,
            Self::Lambda(e) => e.span,
            Self::Yield(e) => e.span,
            Self::Await(e) => e.span,
            Self::Starred(e) => e.span,
        }
    }

    /// Get the source line this expression starts on.
    pub fn line(&self) -> u32 {
        self.span().line
    }

    /// Human-readable node kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Constant(_) => "constant",
            Self::Name(_) => "name",
            Self::Binary(_) => "binary operation",
            Self::Unary(_) => "unary operation",
            Self::BoolOp(_) => "boolean operation",
            Self::Compare(_) => "comparison",
            Self::IfExp(_) => "if expression",
            Self::Call(_) => "call",
            Self::Attribute(_) => "attribute",
            Self::Subscript(_) => "subscript",
            Self::List(_) => "list display",
            Self::Tuple(_) => "tuple display",
            Self::Lambda(_) => "lambda",
            Self::Yield(_) => "yield expression",
            Self::Await(_) => "await expression",
            Self::Starred(_) => "starred expression",
        }
    }
}

/// A literal value as written in source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'ast> {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    Str(&'ast str),
}

/// A literal constant expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantExpr<'ast> {
    /// The literal value
    pub value: Literal<'ast>,
    /// Source location
    pub span: Span,
}

/// A name reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameExpr<'ast> {
    /// The identifier
    pub id: &'ast str,
    /// Source location
    pub span: Span,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A unary prefix operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    /// Operator
    pub op: UnaryOp,
    /// Operand
    pub operand: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A short-circuit boolean operation.
///
/// `a and b and c` is a single node with three values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoolOpExpr<'ast> {
    /// Operator
    pub op: BoolOp,
    /// Operands, at least two
    pub values: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A comparison chain: `left op0 c0 op1 c1 ...`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareExpr<'ast> {
    /// Leftmost operand
    pub left: &'ast Expr<'ast>,
    /// Operators, one per comparator
    pub ops: &'ast [CmpOp],
    /// Right-hand operands
    pub comparators: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A conditional expression (`body if test else orelse`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfExpExpr<'ast> {
    /// Condition
    pub test: &'ast Expr<'ast>,
    /// Value when the condition is true
    pub body: &'ast Expr<'ast>,
    /// Value when the condition is false
    pub orelse: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A call expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// The callee (any expression)
    pub func: &'ast Expr<'ast>,
    /// Positional arguments in source order
    pub args: &'ast [Expr<'ast>],
    /// Keyword arguments in source order
    pub keywords: &'ast [Keyword<'ast>],
    /// Source location
    pub span: Span,
}

/// A keyword argument (`name=value`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyword<'ast> {
    /// Parameter name
    pub arg: &'ast str,
    /// Argument value
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// Attribute access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeExpr<'ast> {
    /// Object expression
    pub value: &'ast Expr<'ast>,
    /// Attribute name
    pub attr: &'ast str,
    /// Source location
    pub span: Span,
}

/// Subscript access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubscriptExpr<'ast> {
    /// Container expression
    pub value: &'ast Expr<'ast>,
    /// Index expression
    pub index: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A list or tuple display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceExpr<'ast> {
    /// Elements in source order
    pub elts: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A lambda expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaExpr<'ast> {
    /// Parameter names
    pub params: &'ast [&'ast str],
    /// Body expression
    pub body: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A `yield` expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldExpr<'ast> {
    /// Yielded value, if any
    pub value: Option<&'ast Expr<'ast>>,
    /// Source location
    pub span: Span,
}

/// An `await` expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AwaitExpr<'ast> {
    /// Awaited value
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A starred expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarredExpr<'ast> {
    /// Unpacked value
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}
