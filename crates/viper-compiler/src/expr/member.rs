//! Attribute and subscript reads.

use viper_ast::{AttributeExpr, SubscriptExpr};
use viper_core::Result;

use crate::bytecode::OpCode;
use crate::visitor::CodegenVisitor;

/// Compile `value.attr`: the object, then `LOAD_ATTR`.
pub fn compile_attribute(
    compiler: &mut CodegenVisitor<'_>,
    expr: &AttributeExpr<'_>,
) -> Result<()> {
    compiler.visit_expr(expr.value)?;
    compiler.emit_named(OpCode::LoadAttr, expr.attr, expr.span.line)
}

/// Compile `value[index]`: container, index, then `BINARY_SUBSCR`.
pub fn compile_subscript(
    compiler: &mut CodegenVisitor<'_>,
    expr: &SubscriptExpr<'_>,
) -> Result<()> {
    compiler.visit_expr(expr.value)?;
    compiler.visit_expr(expr.index)?;
    compiler
        .emitter()
        .emit_op(OpCode::BinarySubscr, Some(expr.span.line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::compile_expr;
    use bumpalo::Bump;
    use viper_ast::AstBuilder;

    #[test]
    fn attribute_chain() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let expr = b.attribute(b.attribute(b.name("os", 1), "path", 1), "sep", 1);
        let unit = compile_expr(&expr).unwrap();

        unit.code
            .assert_opcodes(&[OpCode::LoadName, OpCode::LoadAttr, OpCode::LoadAttr]);
        assert_eq!(unit.names.names(), ["os", "path", "sep"]);
    }

    #[test]
    fn subscript() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let unit = compile_expr(&b.subscript(b.name("d", 1), b.str_("k", 1), 1)).unwrap();
        unit.code
            .assert_opcodes(&[OpCode::LoadName, OpCode::LoadConst, OpCode::BinarySubscr]);
        assert_eq!(unit.code.max_stack_depth(), Ok(2));
    }
}
