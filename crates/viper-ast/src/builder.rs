//! Arena builder for AST nodes.
//!
//! Stands in for the parser: every constructor allocates its children in the
//! arena and stamps the node with a line-only [`Span`].

use bumpalo::Bump;
use viper_core::Span;

use crate::Module;
use crate::expr::*;
use crate::ops::{BinaryOp, BoolOp, CmpOp, UnaryOp};
use crate::stmt::*;

/// Builds AST nodes inside an arena.
#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
}

impl<'ast> AstBuilder<'ast> {
    /// Create a builder allocating into `arena`.
    pub fn new(arena: &'ast Bump) -> Self {
        Self { arena }
    }

    /// The arena nodes are allocated in.
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    fn alloc<T>(&self, value: T) -> &'ast T {
        self.arena.alloc(value)
    }

    fn exprs(&self, exprs: &[Expr<'ast>]) -> &'ast [Expr<'ast>] {
        self.arena.alloc_slice_copy(exprs)
    }

    fn stmts(&self, stmts: &[Stmt<'ast>]) -> &'ast [Stmt<'ast>] {
        self.arena.alloc_slice_copy(stmts)
    }

    fn strs(&self, names: &[&str]) -> &'ast [&'ast str] {
        let arena = self.arena;
        arena.alloc_slice_fill_iter(names.iter().map(|name| &*arena.alloc_str(name)))
    }

    // =========================================================================
    // Module
    // =========================================================================

    /// Build a module from top-level statements.
    pub fn module(&self, body: &[Stmt<'ast>]) -> Module<'ast> {
        let span = body
            .first()
            .map(Stmt::span)
            .unwrap_or_else(|| Span::line(1));
        Module::new(self.stmts(body), span)
    }

    // =========================================================================
    // Literals and names
    // =========================================================================

    /// `None`
    pub fn none(&self, line: u32) -> Expr<'ast> {
        self.constant(Literal::None, line)
    }

    /// `True` / `False`
    pub fn bool_(&self, value: bool, line: u32) -> Expr<'ast> {
        self.constant(Literal::Bool(value), line)
    }

    /// Integer literal.
    pub fn int(&self, value: i64, line: u32) -> Expr<'ast> {
        self.constant(Literal::Int(value), line)
    }

    /// Float literal.
    pub fn float(&self, value: f64, line: u32) -> Expr<'ast> {
        self.constant(Literal::Float(value), line)
    }

    /// String literal.
    pub fn str_(&self, value: &str, line: u32) -> Expr<'ast> {
        let value = &*self.arena.alloc_str(value);
        self.constant(Literal::Str(value), line)
    }

    fn constant(&self, value: Literal<'ast>, line: u32) -> Expr<'ast> {
        Expr::Constant(ConstantExpr {
            value,
            span: Span::line(line),
        })
    }

    /// Name reference.
    pub fn name(&self, id: &str, line: u32) -> Expr<'ast> {
        Expr::Name(NameExpr {
            id: self.arena.alloc_str(id),
            span: Span::line(line),
        })
    }

    // =========================================================================
    // Operators
    // =========================================================================

    /// `left op right`
    pub fn binary(
        &self,
        left: Expr<'ast>,
        op: BinaryOp,
        right: Expr<'ast>,
        line: u32,
    ) -> Expr<'ast> {
        Expr::Binary(self.alloc(BinaryExpr {
            left: self.alloc(left),
            op,
            right: self.alloc(right),
            span: Span::line(line),
        }))
    }

    /// `op operand`
    pub fn unary(&self, op: UnaryOp, operand: Expr<'ast>, line: u32) -> Expr<'ast> {
        Expr::Unary(self.alloc(UnaryExpr {
            op,
            operand: self.alloc(operand),
            span: Span::line(line),
        }))
    }

    /// `v0 op v1 op ...`
    pub fn bool_op(&self, op: BoolOp, values: &[Expr<'ast>], line: u32) -> Expr<'ast> {
        Expr::BoolOp(self.alloc(BoolOpExpr {
            op,
            values: self.exprs(values),
            span: Span::line(line),
        }))
    }

    /// `left op0 c0 op1 c1 ...`
    pub fn compare(&self, left: Expr<'ast>, rest: &[(CmpOp, Expr<'ast>)], line: u32) -> Expr<'ast> {
        let ops = self
            .arena
            .alloc_slice_fill_iter(rest.iter().map(|(op, _)| *op));
        let comparators = self
            .arena
            .alloc_slice_fill_iter(rest.iter().map(|(_, expr)| *expr));
        Expr::Compare(self.alloc(CompareExpr {
            left: self.alloc(left),
            ops,
            comparators,
            span: Span::line(line),
        }))
    }

    /// `body if test else orelse`
    pub fn if_exp(
        &self,
        test: Expr<'ast>,
        body: Expr<'ast>,
        orelse: Expr<'ast>,
        line: u32,
    ) -> Expr<'ast> {
        Expr::IfExp(self.alloc(IfExpExpr {
            test: self.alloc(test),
            body: self.alloc(body),
            orelse: self.alloc(orelse),
            span: Span::line(line),
        }))
    }

    // =========================================================================
    // Calls, access and displays
    // =========================================================================

    /// `func(args...)`
    pub fn call(&self, func: Expr<'ast>, args: &[Expr<'ast>], line: u32) -> Expr<'ast> {
        self.call_kw(func, args, &[], line)
    }

    /// `func(args..., name=value...)`
    pub fn call_kw(
        &self,
        func: Expr<'ast>,
        args: &[Expr<'ast>],
        keywords: &[(&str, Expr<'ast>)],
        line: u32,
    ) -> Expr<'ast> {
        let arena = self.arena;
        let keywords = arena.alloc_slice_fill_iter(keywords.iter().map(|(arg, value)| Keyword {
            arg: arena.alloc_str(arg),
            value: arena.alloc(*value),
            span: value.span(),
        }));
        Expr::Call(self.alloc(CallExpr {
            func: self.alloc(func),
            args: self.exprs(args),
            keywords,
            span: Span::line(line),
        }))
    }

    /// `value.attr`
    pub fn attribute(&self, value: Expr<'ast>, attr: &str, line: u32) -> Expr<'ast> {
        Expr::Attribute(self.alloc(AttributeExpr {
            value: self.alloc(value),
            attr: self.arena.alloc_str(attr),
            span: Span::line(line),
        }))
    }

    /// `value[index]`
    pub fn subscript(&self, value: Expr<'ast>, index: Expr<'ast>, line: u32) -> Expr<'ast> {
        Expr::Subscript(self.alloc(SubscriptExpr {
            value: self.alloc(value),
            index: self.alloc(index),
            span: Span::line(line),
        }))
    }

    /// `[elts...]`
    pub fn list(&self, elts: &[Expr<'ast>], line: u32) -> Expr<'ast> {
        Expr::List(SequenceExpr {
            elts: self.exprs(elts),
            span: Span::line(line),
        })
    }

    /// `(elts...)`
    pub fn tuple(&self, elts: &[Expr<'ast>], line: u32) -> Expr<'ast> {
        Expr::Tuple(SequenceExpr {
            elts: self.exprs(elts),
            span: Span::line(line),
        })
    }

    // =========================================================================
    // Expression kinds without a translation
    // =========================================================================

    /// `lambda params: body`
    pub fn lambda(&self, params: &[&str], body: Expr<'ast>, line: u32) -> Expr<'ast> {
        Expr::Lambda(self.alloc(LambdaExpr {
            params: self.strs(params),
            body: self.alloc(body),
            span: Span::line(line),
        }))
    }

    /// `yield [value]`
    pub fn yield_(&self, value: Option<Expr<'ast>>, line: u32) -> Expr<'ast> {
        Expr::Yield(self.alloc(YieldExpr {
            value: value.map(|v| self.alloc(v)),
            span: Span::line(line),
        }))
    }

    /// `await value`
    pub fn await_(&self, value: Expr<'ast>, line: u32) -> Expr<'ast> {
        Expr::Await(self.alloc(AwaitExpr {
            value: self.alloc(value),
            span: Span::line(line),
        }))
    }

    /// `*value`
    pub fn starred(&self, value: Expr<'ast>, line: u32) -> Expr<'ast> {
        Expr::Starred(self.alloc(StarredExpr {
            value: self.alloc(value),
            span: Span::line(line),
        }))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Expression statement, on the expression's line.
    pub fn expr_stmt(&self, value: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            value: self.alloc(value),
            span: value.span(),
        })
    }

    /// `targets[0] = targets[1] = ... = value`
    pub fn assign(&self, targets: &[Expr<'ast>], value: Expr<'ast>, line: u32) -> Stmt<'ast> {
        Stmt::Assign(self.alloc(AssignStmt {
            targets: self.exprs(targets),
            value: self.alloc(value),
            span: Span::line(line),
        }))
    }

    /// `target op= value`
    pub fn aug_assign(
        &self,
        target: Expr<'ast>,
        op: BinaryOp,
        value: Expr<'ast>,
        line: u32,
    ) -> Stmt<'ast> {
        Stmt::AugAssign(self.alloc(AugAssignStmt {
            target: self.alloc(target),
            op,
            value: self.alloc(value),
            span: Span::line(line),
        }))
    }

    /// `if test: body else: orelse`
    pub fn if_(
        &self,
        test: Expr<'ast>,
        body: &[Stmt<'ast>],
        orelse: &[Stmt<'ast>],
        line: u32,
    ) -> Stmt<'ast> {
        Stmt::If(self.alloc(IfStmt {
            test: self.alloc(test),
            body: self.stmts(body),
            orelse: self.stmts(orelse),
            span: Span::line(line),
        }))
    }

    /// `while test: body else: orelse`
    pub fn while_(
        &self,
        test: Expr<'ast>,
        body: &[Stmt<'ast>],
        orelse: &[Stmt<'ast>],
        line: u32,
    ) -> Stmt<'ast> {
        Stmt::While(self.alloc(WhileStmt {
            test: self.alloc(test),
            body: self.stmts(body),
            orelse: self.stmts(orelse),
            span: Span::line(line),
        }))
    }

    /// `for target in iter: body else: orelse`
    pub fn for_(
        &self,
        target: Expr<'ast>,
        iter: Expr<'ast>,
        body: &[Stmt<'ast>],
        orelse: &[Stmt<'ast>],
        line: u32,
    ) -> Stmt<'ast> {
        Stmt::For(self.alloc(ForStmt {
            target: self.alloc(target),
            iter: self.alloc(iter),
            body: self.stmts(body),
            orelse: self.stmts(orelse),
            span: Span::line(line),
        }))
    }

    /// `break`
    pub fn break_(&self, line: u32) -> Stmt<'ast> {
        Stmt::Break(BreakStmt {
            span: Span::line(line),
        })
    }

    /// `continue`
    pub fn continue_(&self, line: u32) -> Stmt<'ast> {
        Stmt::Continue(ContinueStmt {
            span: Span::line(line),
        })
    }

    /// `pass`
    pub fn pass(&self, line: u32) -> Stmt<'ast> {
        Stmt::Pass(PassStmt {
            span: Span::line(line),
        })
    }

    /// `return [value]`
    pub fn return_(&self, value: Option<Expr<'ast>>, line: u32) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            value: value.map(|v| self.alloc(v)),
            span: Span::line(line),
        })
    }

    /// `def name(params): body`
    pub fn function_def(
        &self,
        name: &str,
        params: &[&str],
        body: &[Stmt<'ast>],
        line: u32,
    ) -> Stmt<'ast> {
        Stmt::FunctionDef(self.alloc(FunctionDef {
            name: self.arena.alloc_str(name),
            params: self.strs(params),
            body: self.stmts(body),
            span: Span::line(line),
        }))
    }

    /// `class name(bases): body`
    pub fn class_def(
        &self,
        name: &str,
        bases: &[Expr<'ast>],
        body: &[Stmt<'ast>],
        line: u32,
    ) -> Stmt<'ast> {
        Stmt::ClassDef(self.alloc(ClassDef {
            name: self.arena.alloc_str(name),
            bases: self.exprs(bases),
            body: self.stmts(body),
            span: Span::line(line),
        }))
    }

    /// `with context [as target]: body`
    pub fn with_(
        &self,
        context: Expr<'ast>,
        target: Option<Expr<'ast>>,
        body: &[Stmt<'ast>],
        line: u32,
    ) -> Stmt<'ast> {
        Stmt::With(self.alloc(WithStmt {
            context: self.alloc(context),
            target: target.map(|t| self.alloc(t)),
            body: self.stmts(body),
            span: Span::line(line),
        }))
    }

    /// `try: body except: handlers... finally: finalbody`
    pub fn try_(
        &self,
        body: &[Stmt<'ast>],
        handlers: &[&[Stmt<'ast>]],
        finalbody: &[Stmt<'ast>],
        line: u32,
    ) -> Stmt<'ast> {
        let handlers = self
            .arena
            .alloc_slice_fill_iter(handlers.iter().map(|handler| self.stmts(handler)));
        Stmt::Try(self.alloc(TryStmt {
            body: self.stmts(body),
            handlers,
            finalbody: self.stmts(finalbody),
            span: Span::line(line),
        }))
    }

    /// `import names...`
    pub fn import(&self, names: &[&str], line: u32) -> Stmt<'ast> {
        Stmt::Import(ImportStmt {
            names: self.strs(names),
            span: Span::line(line),
        })
    }

    /// `global names...`
    pub fn global(&self, names: &[&str], line: u32) -> Stmt<'ast> {
        Stmt::Global(GlobalStmt {
            names: self.strs(names),
            span: Span::line(line),
        })
    }
}
