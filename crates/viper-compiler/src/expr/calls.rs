//! Call expressions.
//!
//! The stack layout before `CALL n` is `callable, self_or_null, arg1..argn`.
//! Method calls (`obj.m(...)`) get the callable and `self` from
//! `LOAD_METHOD`; everything else pairs the callable with a null.

use viper_ast::{CallExpr, Expr};
use viper_core::Result;

use crate::bytecode::{Constant, OpCode};
use crate::visitor::CodegenVisitor;

/// Compile a call: callee, positional arguments left to right, keyword
/// values left to right, then `CALL` (or `CALL_KW` with a tuple of keyword
/// names).
pub fn compile_call(compiler: &mut CodegenVisitor<'_>, expr: &CallExpr<'_>) -> Result<()> {
    let line = expr.span.line;

    // 1. Callable and self-or-null
    match expr.func {
        Expr::Name(name) => {
            compiler.emitter().emit_op(OpCode::PushNull, Some(line))?;
            compiler.emit_named(OpCode::LoadName, name.id, name.span.line)?;
        }
        Expr::Attribute(attr) => {
            compiler.visit_expr(attr.value)?;
            compiler.emit_named(OpCode::LoadMethod, attr.attr, attr.span.line)?;
        }
        func => {
            compiler.visit_expr(func)?;
            compiler.emitter().emit_op(OpCode::PushNull, Some(line))?;
        }
    }

    // 2. Arguments
    for arg in expr.args {
        compiler.visit_expr(arg)?;
    }
    for keyword in expr.keywords {
        compiler.visit_expr(keyword.value)?;
    }

    // 3. The call
    let argc = (expr.args.len() + expr.keywords.len()) as u32;
    if expr.keywords.is_empty() {
        compiler.emitter().emit_arg(OpCode::Call, argc, Some(line))
    } else {
        let kwnames = Constant::str_tuple(expr.keywords.iter().map(|kw| kw.arg));
        compiler.load_const(kwnames, line)?;
        compiler
            .emitter()
            .emit_arg(OpCode::CallKw, argc, Some(line))
    }
}
