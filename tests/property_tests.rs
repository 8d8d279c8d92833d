//! Whole-program properties of the code generator.
//!
//! These run a handful of representative modules through the compiler and
//! check invariants that must hold for any input: determinism, jump targets
//! that land on label markers, balanced stacks, and unit independence.

use viper::bytecode::{Constant, ConstantPool, NamePool};
use viper::prelude::*;

/// Build a module exercising every supported construct family.
fn sample_module<'ast>(b: &AstBuilder<'ast>) -> Module<'ast> {
    b.module(&[
        // total = 0
        b.assign(&[b.name("total", 1)], b.int(0, 1), 1),
        // def scale(v, k):
        //     return v * k if k else v
        b.function_def(
            "scale",
            &["v", "k"],
            &[b.return_(
                Some(b.if_exp(
                    b.name("k", 3),
                    b.binary(b.name("v", 3), BinaryOp::Mul, b.name("k", 3), 3),
                    b.name("v", 3),
                    3,
                )),
                3,
            )],
            2,
        ),
        // for i, v in pairs:
        //     if v is None or i < 0 < limit:
        //         continue
        //     total += scale(v, k=2)
        // else:
        //     log.info("done", total)
        b.for_(
            b.tuple(&[b.name("i", 4), b.name("v", 4)], 4),
            b.name("pairs", 4),
            &[
                b.if_(
                    b.bool_op(
                        BoolOp::Or,
                        &[
                            b.compare(b.name("v", 5), &[(CmpOp::Is, b.none(5))], 5),
                            b.compare(
                                b.name("i", 5),
                                &[(CmpOp::Lt, b.int(0, 5)), (CmpOp::Lt, b.name("limit", 5))],
                                5,
                            ),
                        ],
                        5,
                    ),
                    &[b.continue_(6)],
                    &[],
                    5,
                ),
                b.aug_assign(
                    b.name("total", 7),
                    BinaryOp::Add,
                    b.call_kw(
                        b.name("scale", 7),
                        &[b.name("v", 7)],
                        &[("k", b.int(2, 7))],
                        7,
                    ),
                    7,
                ),
            ],
            &[b.expr_stmt(b.call(
                b.attribute(b.name("log", 9), "info", 9),
                &[b.str_("done", 9), b.name("total", 9)],
                9,
            ))],
            4,
        ),
        // table[key] = [total, -total, not total]
        b.assign(
            &[b.subscript(b.name("table", 10), b.name("key", 10), 10)],
            b.list(
                &[
                    b.name("total", 10),
                    b.unary(UnaryOp::Neg, b.name("total", 10), 10),
                    b.unary(UnaryOp::Not, b.name("total", 10), 10),
                ],
                10,
            ),
            10,
        ),
        // while True:
        //     break
        b.while_(b.bool_(true, 11), &[b.break_(12)], &[], 11),
    ])
}

/// Every unit in the tree, depth first.
fn all_units(unit: &CodeUnit) -> Vec<&CodeUnit> {
    let mut out = vec![unit];
    for nested in unit.nested() {
        out.extend(all_units(nested));
    }
    out
}

#[test]
fn test_compilation_is_deterministic() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let module = sample_module(&b);

    let first = compile_module(&module).unwrap();
    let second = compile_module(&module).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.code().fingerprint(), second.code().fingerprint());
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_different_programs_have_different_fingerprints() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    let a = compile_module(&b.module(&[b.assign(&[b.name("x", 1)], b.int(1, 1), 1)])).unwrap();
    let c = compile_module(&b.module(&[b.assign(&[b.name("x", 2)], b.int(1, 2), 2)])).unwrap();
    assert_ne!(a.code().fingerprint(), c.code().fingerprint());
}

#[test]
fn test_every_jump_lands_on_a_label() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = compile_module(&sample_module(&b)).unwrap();

    for unit in all_units(&unit) {
        let code = unit.code();
        for (index, element) in code.elements().iter().enumerate() {
            let Some(instr) = element.as_instruction() else {
                continue;
            };
            if let Some(target) = instr.oparg.target() {
                assert!(instr.opcode.is_jump(), "{} has a target", instr.opcode);
                assert!(
                    matches!(code.get(target), Some(Element::Label(_))),
                    "jump at {} in {} lands on {:?}",
                    index,
                    unit.name(),
                    code.get(target)
                );
            }
        }
    }
}

#[test]
fn test_every_operand_indexes_its_pool() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = compile_module(&sample_module(&b)).unwrap();

    for unit in all_units(&unit) {
        for instr in unit.code().instructions() {
            let Oparg::Arg(index) = instr.oparg else {
                continue;
            };
            match instr.opcode {
                OpCode::LoadConst | OpCode::ReturnConst => {
                    assert!(unit.constants().get(index).is_some())
                }
                OpCode::LoadName
                | OpCode::StoreName
                | OpCode::LoadAttr
                | OpCode::StoreAttr
                | OpCode::LoadMethod => assert!(unit.names().get(index).is_some()),
                _ => {}
            }
        }
    }
}

#[test]
fn test_stack_is_balanced() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = compile_module(&sample_module(&b)).unwrap();

    for unit in all_units(&unit) {
        assert!(
            unit.max_stack_depth().is_ok(),
            "unbalanced stack in {}:\n{}",
            unit.name(),
            unit
        );
    }
}

#[test]
fn test_call_argument_order() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    // f(a, g(b), c)
    let module = b.module(&[b.expr_stmt(b.call(
        b.name("f", 1),
        &[
            b.name("a", 1),
            b.call(b.name("g", 1), &[b.name("b", 1)], 1),
            b.name("c", 1),
        ],
        1,
    ))]);
    let unit = compile_module(&module).unwrap();

    let loads: Vec<_> = unit
        .code()
        .instructions()
        .filter(|i| i.opcode == OpCode::LoadName)
        .filter_map(|i| i.oparg.arg())
        .filter_map(|index| unit.names().get(index))
        .collect();
    assert_eq!(loads, ["f", "a", "g", "b", "c"]);
    unit.code().assert_opcodes(&[
        OpCode::Resume,
        OpCode::PushNull,
        OpCode::LoadName,
        OpCode::LoadName,
        OpCode::PushNull,
        OpCode::LoadName,
        OpCode::LoadName,
        OpCode::Call,
        OpCode::LoadName,
        OpCode::Call,
        OpCode::PopTop,
    ]);
}

#[test]
fn test_pool_stability() {
    let mut constants = ConstantPool::new();
    let mut names = NamePool::new();
    let values = [
        Constant::Int(1),
        Constant::Float(1.0),
        Constant::Bool(true),
        Constant::Str("1".into()),
        Constant::None,
        Constant::str_tuple(["a", "b"]),
    ];

    let first: Vec<_> = values.iter().map(|c| constants.intern(c.clone())).collect();
    let again: Vec<_> = values.iter().map(|c| constants.intern(c.clone())).collect();
    assert_eq!(first, again);
    assert_eq!(first, [0, 1, 2, 3, 4, 5]);

    let ids: Vec<_> = ["x", "y", "x", "z", "y"].iter().map(|n| names.intern(n)).collect();
    assert_eq!(ids, [0, 1, 0, 2, 1]);
}

#[test]
fn test_units_compile_independently_across_threads() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let module = sample_module(&b);
    let expected = compile_module(&module).unwrap();

    // The arena is not Sync, so each thread builds its own tree.
    let results: Vec<CodeUnit> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let arena = Bump::new();
                    let b = AstBuilder::new(&arena);
                    compile_module(&sample_module(&b)).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for unit in &results {
        assert_eq!(unit, &expected);
    }
}

#[test]
fn test_unused_labels_can_be_dropped() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let module = sample_module(&b);

    let kept = compile_module(&module).unwrap();
    let dropped = Compiler::new(CodegenConfig::new().with_retain_unused_labels(false))
        .compile_module(&module)
        .unwrap();

    for unit in all_units(&dropped) {
        let code = unit.code();
        let targets = code.instructions().filter_map(|i| i.oparg.target());
        let referenced: Vec<usize> = targets.collect();
        for (index, element) in code.elements().iter().enumerate() {
            if element.as_label().is_some() {
                assert!(
                    referenced.contains(&index),
                    "unused label kept at {}",
                    index
                );
            }
        }
        assert!(unit.max_stack_depth().is_ok());
    }
    assert!(dropped.code().len() <= kept.code().len());
    assert_eq!(
        dropped.code().instruction_count(),
        kept.code().instruction_count()
    );
}

#[test]
fn test_without_resume_or_implicit_return() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    let module = b.module(&[b.function_def("f", &[], &[b.pass(2)], 1)]);
    let config = CodegenConfig::new()
        .with_emit_resume(false)
        .with_implicit_return(false);
    let unit = Compiler::new(config).compile_module(&module).unwrap();

    unit.code()
        .assert_opcodes(&[OpCode::LoadConst, OpCode::MakeFunction, OpCode::StoreName]);
    unit.nested_unit("f")
        .unwrap()
        .code()
        .assert_opcodes(&[OpCode::Nop]);
}

#[test]
fn test_control_flow_errors_carry_lines() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    let cases = [
        (b.module(&[b.pass(1), b.break_(2)]), 2),
        (b.module(&[b.continue_(3)]), 3),
        (b.module(&[b.return_(None, 4)]), 4),
        (b.module(&[b.assign(&[b.int(1, 5)], b.int(2, 5), 5)]), 5),
    ];
    for (module, line) in cases {
        let err = compile_module(&module).unwrap_err();
        assert_eq!(err.line(), Some(line), "{}", err);
        assert!(!err.is_label_error());
    }
}
