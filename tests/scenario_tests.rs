//! End-to-end code generation tests.
//!
//! Each test builds a module with the AST builder, compiles it through the
//! public entry point and checks the finalized sequence element by element.

use viper::bytecode::{Constant, ConstantPool};
use viper::emit::Emitter;
use viper::prelude::*;

/// A finalized element in a form that is easy to write out by hand.
#[derive(Debug, PartialEq)]
enum Row {
    Op(&'static str, Oparg, Option<u32>),
    Label(u32),
}

fn rows(code: &FinalizedSequence) -> Vec<Row> {
    code.elements()
        .iter()
        .map(|element| match element {
            Element::Instr(instr) => Row::Op(instr.opcode.name(), instr.oparg, instr.line),
            Element::Label(label) => Row::Label(label.id()),
        })
        .collect()
}

// =============================================================================
// Conditional expression
// =============================================================================

#[test]
fn test_conditional_expression() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    // 42 if True else 24
    let module = b.module(&[b.expr_stmt(b.if_exp(
        b.bool_(true, 1),
        b.int(42, 1),
        b.int(24, 1),
        1,
    ))]);
    let unit = compile_module(&module).unwrap();

    assert_eq!(
        rows(unit.code()),
        [
            Row::Op("RESUME", Oparg::None, Some(0)),
            Row::Op("LOAD_CONST", Oparg::Arg(0), Some(1)),
            Row::Op("POP_JUMP_IF_FALSE", Oparg::Target(5), Some(1)),
            Row::Op("LOAD_CONST", Oparg::Arg(1), Some(1)),
            Row::Op("JUMP", Oparg::Target(7), None),
            Row::Label(0),
            Row::Op("LOAD_CONST", Oparg::Arg(2), Some(1)),
            Row::Label(1),
            Row::Op("POP_TOP", Oparg::None, None),
        ]
    );
    assert_eq!(
        unit.constants().constants(),
        [Constant::Bool(true), Constant::Int(42), Constant::Int(24)]
    );
    assert!(unit.names().is_empty());
}

// =============================================================================
// For loop
// =============================================================================

#[test]
fn test_for_loop() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    // for x in l:
    //     print(x)
    let print = b.call(b.name("print", 2), &[b.name("x", 2)], 2);
    let body = [b.expr_stmt(print)];
    let module = b.module(&[b.for_(b.name("x", 1), b.name("l", 1), &body, &[], 1)]);
    let unit = compile_module(&module).unwrap();

    assert_eq!(
        rows(unit.code()),
        [
            Row::Op("RESUME", Oparg::None, Some(0)),
            Row::Op("LOAD_NAME", Oparg::Arg(0), Some(1)),
            Row::Op("GET_ITER", Oparg::None, Some(1)),
            Row::Label(0),
            Row::Op("FOR_ITER", Oparg::Target(12), Some(1)),
            Row::Op("STORE_NAME", Oparg::Arg(1), Some(1)),
            Row::Op("PUSH_NULL", Oparg::None, Some(2)),
            Row::Op("LOAD_NAME", Oparg::Arg(2), Some(2)),
            Row::Op("LOAD_NAME", Oparg::Arg(1), Some(2)),
            Row::Op("CALL", Oparg::Arg(1), Some(2)),
            Row::Op("POP_TOP", Oparg::None, None),
            Row::Op("JUMP", Oparg::Target(3), None),
            Row::Label(1),
            Row::Op("END_FOR", Oparg::None, None),
        ]
    );
    assert_eq!(unit.names().names(), ["l", "x", "print"]);
    assert!(unit.constants().is_empty());
    assert_eq!(unit.max_stack_depth(), Ok(4));
}

// =============================================================================
// Unsupported constructs
// =============================================================================

#[test]
fn test_unsupported_construct_leaves_no_partial_code() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    // x = 1
    // f = lambda: 0
    let module = b.module(&[
        b.assign(&[b.name("x", 1)], b.int(1, 1), 1),
        b.assign(&[b.name("f", 2)], b.lambda(&[], b.int(0, 2), 2), 2),
    ]);
    let err = compile_module(&module).unwrap_err();

    assert_eq!(
        err,
        CodegenError::UnsupportedConstruct {
            kind: "lambda",
            span: Span::line(2),
        }
    );
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_unsupported_statement_in_function_body() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    let module = b.module(&[
        b.function_def("ok", &[], &[b.pass(2)], 1),
        b.function_def("bad", &[], &[b.import(&["os"], 4)], 3),
    ]);
    let err = compile_module(&module).unwrap_err();
    assert_eq!(
        err,
        CodegenError::UnsupportedConstruct {
            kind: "import",
            span: Span::line(4),
        }
    );
    assert_eq!(err.line(), Some(4));
}

// =============================================================================
// Labels
// =============================================================================

#[test]
fn test_duplicate_placement() {
    let mut emitter = Emitter::new();
    let label = emitter.new_label();
    emitter.place(label).unwrap();

    let err = emitter.place(label).unwrap_err();
    assert!(matches!(err, CodegenError::DuplicatePlacement { label: 0, .. }));
}

#[test]
fn test_unresolved_label_is_named() {
    let mut emitter = Emitter::new();
    let _placed = emitter.new_label();
    let dangling = emitter.new_label();
    emitter
        .emit_jump(OpCode::Jump, dangling, Some(1))
        .unwrap();

    let err = emitter.resolve(&CodegenConfig::default()).unwrap_err();
    assert!(matches!(err, CodegenError::UnresolvedLabel { label: 1, .. }));
    assert!(err.to_string().contains("L1"));
}

// =============================================================================
// Pools
// =============================================================================

#[test]
fn test_constant_interning() {
    let mut pool = ConstantPool::new();
    let a = pool.intern(Constant::Int(42));
    let b = pool.intern(Constant::Int(42));
    let c = pool.intern(Constant::Str("42".into()));

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(pool.len(), 2);
}

// =============================================================================
// Larger programs
// =============================================================================

#[test]
fn test_function_with_loop_and_early_return() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    // def find(items, wanted):
    //     for item in items:
    //         if item == wanted:
    //             return item
    //     return None
    // hit = find(xs, 3)
    let body = [
        b.for_(
            b.name("item", 2),
            b.name("items", 2),
            &[b.if_(
                b.compare(b.name("item", 3), &[(CmpOp::Eq, b.name("wanted", 3))], 3),
                &[b.return_(Some(b.name("item", 4)), 4)],
                &[],
                3,
            )],
            &[],
            2,
        ),
        b.return_(Some(b.none(5)), 5),
    ];
    let module = b.module(&[
        b.function_def("find", &["items", "wanted"], &body, 1),
        b.assign(
            &[b.name("hit", 6)],
            b.call(b.name("find", 6), &[b.name("xs", 6), b.int(3, 6)], 6),
            6,
        ),
    ]);
    let unit = compile_module(&module).unwrap();

    let find = unit.nested_unit("find").unwrap();
    assert_eq!(find.params(), ["items", "wanted"]);
    assert_eq!(&find.names().names()[..3], ["items", "wanted", "item"]);
    find.code().assert_contains_opcodes(&[
        OpCode::LoadName,
        OpCode::Swap,
        OpCode::PopTop,
        OpCode::ReturnValue,
    ]);
    assert_eq!(find.max_stack_depth(), Ok(3));
    assert_eq!(unit.max_stack_depth(), Ok(4));

    unit.code().assert_contains_opcodes(&[
        OpCode::LoadConst,
        OpCode::MakeFunction,
        OpCode::StoreName,
    ]);
}

#[test]
fn test_while_with_break_and_else() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    // while n > 0:
    //     n -= 1
    //     if n == 5:
    //         break
    // else:
    //     done = True
    let module = b.module(&[b.while_(
        b.compare(b.name("n", 1), &[(CmpOp::Gt, b.int(0, 1))], 1),
        &[
            b.aug_assign(b.name("n", 2), BinaryOp::Sub, b.int(1, 2), 2),
            b.if_(
                b.compare(b.name("n", 3), &[(CmpOp::Eq, b.int(5, 3))], 3),
                &[b.break_(4)],
                &[],
                3,
            ),
        ],
        &[b.assign(&[b.name("done", 6)], b.bool_(true, 6), 6)],
        1,
    )]);
    let unit = compile_module(&module).unwrap();
    let code = unit.code();

    // The break jumps past the else branch to the final label
    let last = code.len() - 1;
    assert!(matches!(code.get(last), Some(Element::Label(_))));
    let break_jump = code
        .elements()
        .iter()
        .position(|e| {
            e.as_instruction()
                .is_some_and(|i| i.opcode == OpCode::Jump && i.line == Some(4))
        })
        .unwrap();
    assert_eq!(code.jump_target(break_jump), Some(last));
    assert_eq!(unit.max_stack_depth(), Ok(2));
}

#[test]
fn test_disassembly_lists_nested_units() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    let body = [b.return_(Some(b.name("a", 2)), 2)];
    let module = b.module(&[b.function_def("f", &["a"], &body, 1)]);
    let listing = compile_module(&module).unwrap().to_string();

    assert!(listing.contains("Disassembly of <module> (module, line 1):"));
    assert!(listing.contains("Disassembly of f (function, line 1):"));
    assert!(listing.contains("(<code f>)"));
}
