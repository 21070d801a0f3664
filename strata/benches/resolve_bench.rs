use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use strata::resolver::fold_modifications;
use strata::{BubblingResolver, ConfigurationResolver, ListKey, ListModification, MemorySource, ScalarKey};

const SETTING: ScalarKey<i64> = ScalarKey::new("setting");
const VALUES: ListKey<i64> = ListKey::new("values");

/// Builds a chain of `depth` scopes, each adding four values and removing one,
/// with only the farthest scope setting the scalar.
fn chain(depth: usize) -> BubblingResolver {
    (0..depth)
        .fold(BubblingResolver::builder(), |builder, i| {
            let base = i64::try_from(i).unwrap() * 2;
            let mut source = MemorySource::new(format!("scope-{i}"))
                .add("values", base)
                .add("values", base + 1)
                .add("values", base + 2)
                .add("values", base + 3)
                .remove("values", base + 4);
            source = if i + 1 == depth {
                source.set("setting", 1_i64)
            } else {
                source.suggest("setting", 0_i64)
            };
            builder.with_source(source)
        })
        .build()
}

fn bench_resolve_scalar(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_scalar");

    for depth in [1, 4, 16] {
        let resolver = chain(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &resolver, |b, r| {
            b.iter(|| r.resolve(black_box(&SETTING)));
        });
    }

    group.finish();
}

fn bench_resolve_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_list");

    for depth in [1, 4, 16] {
        let resolver = chain(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &resolver, |b, r| {
            b.iter(|| r.resolve(black_box(&VALUES)));
        });
    }

    group.finish();
}

fn bench_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold_modifications");

    // Worst case for the linear dedupe: every value distinct
    group.bench_function("distinct_adds_256", |b| {
        b.iter(|| {
            fold_modifications((0..256_i64).map(|v| ListModification::<i64>::added(black_box(v))))
        });
    });

    // Heavy churn over a small set of values
    group.bench_function("churn_256", |b| {
        b.iter(|| {
            fold_modifications((0..256_i64).map(|v| {
                if v % 3 == 0 {
                    ListModification::<i64>::removed(black_box(v % 8))
                } else {
                    ListModification::<i64>::added(black_box(v % 8))
                }
            }))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resolve_scalar, bench_resolve_list, bench_fold);
criterion_main!(benches);
