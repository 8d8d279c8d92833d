//! Expression lowering.
//!
//! Every expression leaves exactly one value on the stack. Operands are
//! evaluated left to right; only `and`, `or`, comparison chains and
//! conditional expressions branch.
//!
//! Expression kinds with no translation (lambda, yield, await, starred)
//! fail with [`CodegenError::UnsupportedConstruct`] before emitting anything.

mod boolean;
mod calls;
mod collections;
mod compare;
mod identifiers;
mod literals;
mod member;
pub(crate) mod operators;
mod ternary;

use viper_ast::Expr;
use viper_core::{CodegenError, Result};

use crate::visitor::CodegenVisitor;

impl<'a> CodegenVisitor<'a> {
    /// Compile an expression, leaving its value on the stack.
    pub fn visit_expr(&mut self, expr: &Expr<'_>) -> Result<()> {
        match expr {
            Expr::Constant(constant) => literals::compile_constant(self, constant),
            Expr::Name(name) => identifiers::compile_name(self, name),
            Expr::Binary(binary) => operators::compile_binary(self, binary),
            Expr::Unary(unary) => operators::compile_unary(self, unary),
            Expr::BoolOp(bool_op) => boolean::compile_bool_op(self, bool_op),
            Expr::Compare(compare) => compare::compile_compare(self, compare),
            Expr::IfExp(if_exp) => ternary::compile_if_exp(self, if_exp),
            Expr::Call(call) => calls::compile_call(self, call),
            Expr::Attribute(attr) => member::compile_attribute(self, attr),
            Expr::Subscript(subscript) => member::compile_subscript(self, subscript),
            Expr::List(list) => collections::compile_list(self, list),
            Expr::Tuple(tuple) => collections::compile_tuple(self, tuple),
            Expr::Lambda(_) | Expr::Yield(_) | Expr::Await(_) | Expr::Starred(_) => {
                Err(CodegenError::UnsupportedConstruct {
                    kind: expr.kind(),
                    span: expr.span(),
                })
            }
        }
    }
}
