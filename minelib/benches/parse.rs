use std::fmt::Write;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use minelib::{
    parser::{parse_cpit, parse_precedence, PrecedenceInput},
    PrecedenceDag,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A layered pit: every block below the surface depends on up to four blocks
/// of the layer above.
fn synthetic_precedence(rng: &mut StdRng, layers: usize, width: usize) -> String {
    let mut contents = String::new();

    for layer in 0..layers {
        for column in 0..width {
            let block = layer * width + column;
            if layer == 0 {
                writeln!(contents, "{block} 0").unwrap();
                continue;
            }

            let count = rng.gen_range(1..=4usize.min(width));
            let predecessors: Vec<String> = (0..count)
                .map(|_| ((layer - 1) * width + rng.gen_range(0..width)).to_string())
                .collect();
            writeln!(contents, "{block} {count} {}", predecessors.join(" ")).unwrap();
        }
    }

    contents
}

fn synthetic_cpit(rng: &mut StdRng, blocks: usize, periods: usize, resources: usize) -> String {
    let mut contents = String::new();

    writeln!(contents, "NAME: synthetic").unwrap();
    writeln!(contents, "TYPE: CPIT").unwrap();
    writeln!(contents, "NBLOCKS: {blocks}").unwrap();
    writeln!(contents, "NPERIODS: {periods}").unwrap();
    writeln!(contents, "NRESOURCE_SIDE_CONSTRAINTS: {resources}").unwrap();
    writeln!(contents, "DISCOUNT_RATE: 0.08").unwrap();

    writeln!(contents, "OBJECTIVE_FUNCTION:").unwrap();
    for block in 0..blocks {
        writeln!(contents, "{block} {:.2}", rng.gen_range(-500.0..1500.0)).unwrap();
    }

    writeln!(contents, "RESOURCE_CONSTRAINT_LIMITS:").unwrap();
    for resource in 0..resources {
        for period in 0..periods {
            writeln!(contents, "{resource} {period} L {:.1}", rng.gen_range(1e4..1e5)).unwrap();
        }
    }

    writeln!(contents, "RESOURCE_CONSTRAINT_COEFFICIENTS:").unwrap();
    for block in 0..blocks {
        for resource in 0..resources {
            writeln!(contents, "{block} {resource} {:.1}", rng.gen_range(0.0..200.0)).unwrap();
        }
    }
    writeln!(contents, "EOF").unwrap();

    contents
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);

    let mut group = c.benchmark_group("parse");
    group.sample_size(20);

    for blocks in [1_000, 10_000, 50_000] {
        let cpit = synthetic_cpit(&mut rng, blocks, 10, 2);
        let precedence = synthetic_precedence(&mut rng, blocks / 100, 100);

        group.throughput(Throughput::Bytes(cpit.len() as u64));
        group.bench_with_input(BenchmarkId::new("cpit", blocks), &cpit, |b, cpit| {
            b.iter(|| parse_cpit(cpit.as_bytes(), PrecedenceInput::None).unwrap())
        });

        group.throughput(Throughput::Bytes(precedence.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("precedence", blocks),
            &precedence,
            |b, precedence| b.iter(|| parse_precedence(precedence.as_bytes()).unwrap()),
        );

        let graph = parse_precedence(precedence.as_bytes()).unwrap();
        group.bench_with_input(BenchmarkId::new("extraction_ranks", blocks), &graph, |b, graph| {
            b.iter(|| PrecedenceDag::new(graph).extraction_ranks())
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
