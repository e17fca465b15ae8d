//! Performance benchmarks for the Fleaux front end.
//!
//! - Parsing the programs under `test_scripts/`
//! - Parsing generated programs of increasing size
//! - Full compilation (parse, resolve, materialize, emit) of an import graph

use bumpalo::Bump;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fleaux::{CompilerOptions, MemoryLoader, Parser, Session, emit_python};
use std::hint::black_box;

/// A program with `n` definitions, each piping into the previous one.
fn chained_program(n: usize) -> String {
    let mut source = String::from("let Step0(x: Number): Number :: (x, 1) -> Add;\n");
    for i in 1..n {
        source.push_str(&format!(
            "let Step{i}(x: Number): Number :: ((x * 2 + 1, {i}) -> Add) -> Step{};\n",
            i - 1
        ));
    }
    source.push_str(&format!("(1) -> Step{} -> Println;\n", n - 1));
    source
}

fn script_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/scripts");

    let scripts = [
        ("hello", include_str!("../test_scripts/Hello.fleaux")),
        ("operators", include_str!("../test_scripts/Operators.fleaux")),
        ("sequences", include_str!("../test_scripts/Sequences.fleaux")),
        ("shapes", include_str!("../test_scripts/Shapes.fleaux")),
    ];

    for (name, source) in scripts {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let arena = Bump::new();
                let program = Parser::parse(black_box(source), &arena).unwrap();
                black_box(program.statements().len())
            });
        });
    }

    group.finish();
}

fn size_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/definitions");

    for n in [10, 100, 1000] {
        let source = chained_program(n);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &source, |b, source| {
            b.iter(|| {
                let arena = Bump::new();
                let program = Parser::parse(black_box(source), &arena).unwrap();
                black_box(program.statements().len())
            });
        });
    }

    group.finish();
}

fn compile_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("compiler/session");

    for n in [10, 100] {
        let loader = MemoryLoader::new()
            .with("Main", "import Chain;\n(1) -> Chain.Step0 -> Println;")
            .with("Chain", chained_program(n));
        group.bench_with_input(BenchmarkId::new("compile_and_emit", n), &loader, |b, loader| {
            b.iter(|| {
                let mut session = Session::new(CompilerOptions::default(), Box::new(loader.clone()));
                session.compile_root("Main").unwrap();
                let emitted: usize = session.modules().iter().map(|m| emit_python(m).len()).sum();
                black_box(emitted)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, script_benchmarks, size_benchmarks, compile_benchmarks);
criterion_main!(benches);
