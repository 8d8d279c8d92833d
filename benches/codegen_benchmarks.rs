//! Performance benchmarks for viper code generation.
//!
//! Modules are built directly with the AST builder so the numbers cover code
//! generation and label resolution only:
//! - Size-based: flat modules from 10 to 5000 statements
//! - Shape-specific: deep loop nesting, many small functions, long chains
//!
//! ## Profiling with Puffin
//!
//! Run with the `profile-with-puffin` feature to collect per-function timings:
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

#![allow(clippy::collapsible_if)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use viper::prelude::*;

#[cfg(feature = "profile-with-puffin")]
use std::collections::HashMap;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

/// Initialize puffin profiler.
#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

/// Call at the end of each benchmark iteration to flush profiling data.
#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// Recursively collect all scopes (including nested ones)
#[cfg(feature = "profile-with-puffin")]
fn collect_scopes_recursive(
    stream: &puffin::Stream,
    scope: &puffin::Scope,
    scope_collection: &puffin::ScopeCollection,
    scope_timings: &mut HashMap<String, i64>,
) {
    use puffin::Reader;

    if let Some(details) = scope_collection.fetch_by_id(&scope.id) {
        let name = details.name().to_string();
        *scope_timings.entry(name).or_insert(0) += scope.record.duration_ns;
    }

    if scope.child_begin_position < scope.child_end_position {
        if let Ok(reader) = Reader::with_offset(stream, scope.child_begin_position) {
            if let Ok(children) = reader.read_top_scopes() {
                for child in children {
                    collect_scopes_recursive(stream, &child, scope_collection, scope_timings);
                }
            }
        }
    }
}

/// Print average time per scope across all recorded frames.
#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    use puffin::Reader;

    let Some(frame_view) = FRAME_VIEW.get() else {
        println!("Profiler not initialized");
        return;
    };

    let view = frame_view.lock();
    let scope_collection = view.scope_collection();

    let mut scope_timings: HashMap<String, i64> = HashMap::new();
    let mut frame_count = 0i64;

    for frame in view.recent_frames() {
        frame_count += 1;
        let Ok(unpacked) = frame.unpacked() else {
            continue;
        };
        for (_thread_info, stream_info) in unpacked.thread_streams.iter() {
            let reader = Reader::from_start(&stream_info.stream);
            if let Ok(scopes) = reader.read_top_scopes() {
                for scope in scopes {
                    collect_scopes_recursive(
                        &stream_info.stream,
                        &scope,
                        scope_collection,
                        &mut scope_timings,
                    );
                }
            }
        }
    }

    println!("\n=== Profiling Summary ({} frames) ===", frame_count);
    let mut entries: Vec<_> = scope_timings.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1));
    for (name, ns) in &entries {
        let avg_ns = if frame_count > 0 { **ns / frame_count } else { **ns };
        println!(
            "  {:30} {:>10.2?} avg",
            name,
            std::time::Duration::from_nanos(avg_ns as u64)
        );
    }
    println!("=====================================\n");
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

// =============================================================================
// Workloads
// =============================================================================

/// `n` statements cycling through assignment, call, conditional and loop.
fn flat_module<'ast>(b: &AstBuilder<'ast>, n: u32) -> Module<'ast> {
    let body: Vec<_> = (1..=n)
        .map(|line| match line % 4 {
            0 => {
                let step = b.int(line as i64, line);
                let sum = b.binary(b.name("x", line), BinaryOp::Add, step, line);
                b.assign(&[b.name("x", line)], sum, line)
            }
            1 => b.expr_stmt(b.call(b.name("print", line), &[b.name("x", line)], line)),
            2 => {
                let test = b.compare(b.name("x", line), &[(CmpOp::Lt, b.int(10, line))], line);
                let pick = b.if_exp(b.name("x", line), b.int(1, line), b.int(2, line), line);
                let then = [b.assign(&[b.name("y", line)], pick, line)];
                b.if_(test, &then, &[b.pass(line)], line)
            }
            _ => {
                let total = b.name("total", line);
                let loop_body = [b.aug_assign(total, BinaryOp::Add, b.name("i", line), line)];
                let items = b.name("items", line);
                b.for_(b.name("i", line), items, &loop_body, &[], line)
            }
        })
        .collect();
    b.module(&body)
}

/// `depth` nested while loops, each with a break and a continue.
fn nested_loops<'ast>(b: &AstBuilder<'ast>, depth: u32) -> Module<'ast> {
    let mut body = vec![b.break_(depth + 1)];
    for line in (1..=depth).rev() {
        body = vec![
            b.if_(b.name("skip", line), &[b.continue_(line)], &[], line),
            b.while_(b.name("go", line), &body, &[], line),
            b.break_(line),
        ];
        body = vec![b.while_(b.bool_(true, line), &body, &[], line)];
    }
    b.module(&body)
}

/// `n` small function definitions.
fn many_functions<'ast>(b: &AstBuilder<'ast>, n: u32) -> Module<'ast> {
    let names: Vec<String> = (0..n).map(|i| format!("f{}", i)).collect();
    let body: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let line = i as u32 + 1;
            let product = b.binary(b.name("a", line), BinaryOp::Mul, b.name("b", line), line);
            let fn_body = [b.return_(Some(product), line)];
            b.function_def(name, &["a", "b"], &fn_body, line)
        })
        .collect();
    b.module(&body)
}

fn size_based_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("codegen/module_sizes");

    for n in [10u32, 100, 1000, 5000] {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let module = flat_module(&b, n);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &module, |bench, module| {
            bench.iter(|| {
                let unit = compile_module(black_box(module)).unwrap();
                end_profiling_frame();
                black_box(unit.code().len())
            });
        });
    }

    group.finish();
    print_profiling_stats();
}

fn shape_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("codegen/shapes");

    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    let loops = nested_loops(&b, 64);
    group.bench_function("nested_loops_64", |bench| {
        bench.iter(|| black_box(compile_module(black_box(&loops)).unwrap()));
    });

    let functions = many_functions(&b, 500);
    group.bench_function("functions_500", |bench| {
        bench.iter(|| black_box(compile_module(black_box(&functions)).unwrap()));
    });

    let no_labels = Compiler::new(CodegenConfig::new().with_retain_unused_labels(false));
    let flat = flat_module(&b, 1000);
    group.bench_function("drop_unused_labels_1000", |bench| {
        bench.iter(|| black_box(no_labels.compile_module(black_box(&flat)).unwrap()));
    });

    group.finish();
    print_profiling_stats();
}

fn verification_benchmarks(c: &mut Criterion) {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = compile_module(&flat_module(&b, 5000)).unwrap();

    let mut group = c.benchmark_group("codegen/verification");
    group.bench_function("max_stack_depth_5000", |bench| {
        bench.iter(|| black_box(unit.max_stack_depth().unwrap()));
    });
    group.bench_function("fingerprint_5000", |bench| {
        bench.iter(|| black_box(unit.code().fingerprint()));
    });
    group.finish();
}

criterion_group!(
    benches,
    size_based_benchmarks,
    shape_benchmarks,
    verification_benchmarks
);
criterion_main!(benches);
