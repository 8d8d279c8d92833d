//! Statement lowering.
//!
//! Statements leave the stack as they found it, with one exception: a `for`
//! loop keeps its iterator on the stack for the duration of its body.
//!
//! [`CodegenVisitor::visit_stmt`] is atomic: a statement that fails leaves no
//! instructions, labels, or pool entries behind.

mod assignment;
mod for_stmt;
mod function_def;
mod if_stmt;
mod loop_control;
mod return_stmt;
mod while_stmt;

use tracing::trace;
use viper_ast::{ExprStmt, Stmt};
use viper_core::{CodegenError, Result};

use crate::bytecode::OpCode;
use crate::visitor::CodegenVisitor;

impl<'a> CodegenVisitor<'a> {
    /// Compile a statement.
    ///
    /// On failure everything the statement emitted is discarded before the
    /// error is returned.
    pub fn visit_stmt(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        let checkpoint = self.checkpoint();
        let enclosing = self.emitter().origin();
        self.emitter().set_origin(stmt.kind(), stmt.span());

        let result = self.compile_stmt(stmt);
        match &result {
            Ok(()) => self.emitter().restore_origin(enclosing),
            Err(err) => {
                trace!(kind = stmt.kind(), line = stmt.span().line, %err, "rolling back statement");
                self.rollback(checkpoint);
            }
        }
        result
    }

    fn compile_stmt(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match stmt {
            Stmt::Expr(expr) => compile_expr_stmt(self, expr),
            Stmt::Assign(assign) => assignment::compile_assign(self, assign),
            Stmt::AugAssign(aug) => assignment::compile_aug_assign(self, aug),
            Stmt::If(if_stmt) => if_stmt::compile_if(self, if_stmt),
            Stmt::While(while_stmt) => while_stmt::compile_while(self, while_stmt),
            Stmt::For(for_stmt) => for_stmt::compile_for(self, for_stmt),
            Stmt::Break(brk) => loop_control::compile_break(self, brk),
            Stmt::Continue(cont) => loop_control::compile_continue(self, cont),
            Stmt::Pass(pass) => self.emitter().emit_op(OpCode::Nop, Some(pass.span.line)),
            Stmt::Return(ret) => return_stmt::compile_return(self, ret),
            Stmt::FunctionDef(def) => function_def::compile_function_def(self, def),
            Stmt::ClassDef(_)
            | Stmt::With(_)
            | Stmt::Try(_)
            | Stmt::Import(_)
            | Stmt::Global(_) => Err(CodegenError::UnsupportedConstruct {
                kind: stmt.kind(),
                span: stmt.span(),
            }),
        }
    }
}

/// Compile an expression statement: the value, then a line-less `POP_TOP`.
fn compile_expr_stmt(compiler: &mut CodegenVisitor<'_>, stmt: &ExprStmt<'_>) -> Result<()> {
    compiler.visit_expr(stmt.value)?;
    compiler.emitter().emit_op(OpCode::PopTop, None)
}
