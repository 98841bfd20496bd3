mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nectar::eval::Scope;

fn bench_evaluator(c: &mut Criterion) {
    for (label, source) in common::workloads() {
        let program = common::parse_program(&source);

        c.bench_function(&format!("evaluator_run_{label}"), |b| {
            b.iter(|| {
                let mut scope = Scope::new();
                let value = black_box(&program).eval(&mut scope).expect("eval");
                black_box(value);
            })
        });

        c.bench_function(&format!("evaluator_full_pipeline_{label}"), |b| {
            b.iter(|| {
                let program = common::parse_program(black_box(&source));
                let mut scope = Scope::new();
                let value = program.eval(&mut scope).expect("eval");
                black_box(value);
            })
        });
    }
}

criterion_group!(benches, bench_evaluator);
criterion_main!(benches);
