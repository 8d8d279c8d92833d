//! Assignment and augmented assignment.

use viper_ast::{AssignStmt, AugAssignStmt, Expr};
use viper_core::{CodegenError, Result};

use crate::bytecode::OpCode;
use crate::expr::operators::{INPLACE_OFFSET, binary_op_code};
use crate::visitor::CodegenVisitor;

/// Compile `t1 = t2 = ... = value`.
///
/// The value is evaluated once, duplicated for every target but the last,
/// and stored to the targets left to right.
pub fn compile_assign(compiler: &mut CodegenVisitor<'_>, stmt: &AssignStmt<'_>) -> Result<()> {
    let line = Some(stmt.span.line);
    compiler.visit_expr(stmt.value)?;

    let Some((last, rest)) = stmt.targets.split_last() else {
        return compiler.emitter().emit_op(OpCode::PopTop, None);
    };
    for target in rest {
        compiler.emitter().emit_arg(OpCode::Copy, 1, line)?;
        store_target(compiler, target)?;
    }
    store_target(compiler, last)
}

/// Pop the top of stack into `target`.
pub(crate) fn store_target(compiler: &mut CodegenVisitor<'_>, target: &Expr<'_>) -> Result<()> {
    match target {
        Expr::Name(name) => compiler.emit_named(OpCode::StoreName, name.id, name.span.line),
        Expr::Attribute(attr) => {
            compiler.visit_expr(attr.value)?;
            compiler.emit_named(OpCode::StoreAttr, attr.attr, attr.span.line)
        }
        Expr::Subscript(subscript) => {
            compiler.visit_expr(subscript.value)?;
            compiler.visit_expr(subscript.index)?;
            compiler
                .emitter()
                .emit_op(OpCode::StoreSubscr, Some(subscript.span.line))
        }
        Expr::Tuple(seq) | Expr::List(seq) => {
            compiler.emitter().emit_arg(
                OpCode::UnpackSequence,
                seq.elts.len() as u32,
                Some(seq.span.line),
            )?;
            for elt in seq.elts {
                store_target(compiler, elt)?;
            }
            Ok(())
        }
        Expr::Starred(_) => Err(CodegenError::UnsupportedConstruct {
            kind: target.kind(),
            span: target.span(),
        }),
        _ => Err(CodegenError::InvalidTarget {
            kind: target.kind(),
            span: target.span(),
        }),
    }
}

/// Compile `target op= value`.
///
/// The target's container and key are evaluated once:
///
/// ```text
/// name:       LOAD_NAME x   <value> BINARY_OP  STORE_NAME x
/// attribute:  <obj> COPY 1 LOAD_ATTR a  <value> BINARY_OP  SWAP 2 STORE_ATTR a
/// subscript:  <obj> <key> COPY 2 COPY 2 BINARY_SUBSCR  <value> BINARY_OP
///             SWAP 3 SWAP 2 STORE_SUBSCR
/// ```
pub fn compile_aug_assign(
    compiler: &mut CodegenVisitor<'_>,
    stmt: &AugAssignStmt<'_>,
) -> Result<()> {
    let line = Some(stmt.span.line);
    let op_code = binary_op_code(stmt.op) + INPLACE_OFFSET;

    match stmt.target {
        Expr::Name(name) => {
            compiler.emit_named(OpCode::LoadName, name.id, name.span.line)?;
            compiler.visit_expr(stmt.value)?;
            compiler
                .emitter()
                .emit_arg(OpCode::BinaryOp, op_code, line)?;
            compiler.emit_named(OpCode::StoreName, name.id, name.span.line)
        }
        Expr::Attribute(attr) => {
            compiler.visit_expr(attr.value)?;
            compiler.emitter().emit_arg(OpCode::Copy, 1, line)?;
            compiler.emit_named(OpCode::LoadAttr, attr.attr, attr.span.line)?;
            compiler.visit_expr(stmt.value)?;
            let emitter = compiler.emitter();
            emitter.emit_arg(OpCode::BinaryOp, op_code, line)?;
            emitter.emit_arg(OpCode::Swap, 2, line)?;
            compiler.emit_named(OpCode::StoreAttr, attr.attr, attr.span.line)
        }
        Expr::Subscript(subscript) => {
            compiler.visit_expr(subscript.value)?;
            compiler.visit_expr(subscript.index)?;
            let emitter = compiler.emitter();
            emitter.emit_arg(OpCode::Copy, 2, line)?;
            emitter.emit_arg(OpCode::Copy, 2, line)?;
            emitter.emit_op(OpCode::BinarySubscr, Some(subscript.span.line))?;
            compiler.visit_expr(stmt.value)?;
            let emitter = compiler.emitter();
            emitter.emit_arg(OpCode::BinaryOp, op_code, line)?;
            emitter.emit_arg(OpCode::Swap, 3, line)?;
            emitter.emit_arg(OpCode::Swap, 2, line)?;
            emitter.emit_op(OpCode::StoreSubscr, Some(subscript.span.line))
        }
        target => Err(CodegenError::InvalidTarget {
            kind: target.kind(),
            span: target.span(),
        }),
    }
}
