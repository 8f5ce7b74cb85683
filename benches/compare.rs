use std::time::Duration;

use criterion::{
    black_box, criterion_group, criterion_main, measurement::WallTime, BatchSize, BenchmarkGroup,
    Criterion, SamplingMode,
};
use pathname::path::{compare_raw, sort_paths, Pathname};
use pathname::{Pattern, Value};

const PATHS: &[&str] = &[
    "/usr/local/lib/python3.11/site-packages/numpy/core/__init__.py",
    "/usr/local/lib/python3.11/site-packages/numpy-1.26.dist-info/RECORD",
    "/usr/local/lib/python3.11/site-packages/numpy/core",
    "/usr/local/lib/python3.11/site-packages",
    "/usr/local/lib",
    "/usr/lib/x86_64-linux-gnu/libc.so.6",
    "/etc/hosts",
    "/etc/hosts.allow",
];

fn compare_bench(c: &mut Criterion) {
    let mut group: BenchmarkGroup<WallTime> = c.benchmark_group("path::compare");
    group.sampling_mode(SamplingMode::Auto);

    group.bench_function("compare_raw shared prefix", |b| {
        b.iter(|| compare_raw(black_box(PATHS[0].as_bytes()), black_box(PATHS[1].as_bytes())))
    });

    let lhs = Pathname::new(PATHS[0]);
    let rhs = Value::from(Pathname::new(PATHS[2]));
    group.bench_function("Pathname::compare", |b| {
        b.iter(|| black_box(lhs.compare(black_box(&rhs))).unwrap())
    });

    group.bench_function("sort_paths", |b| {
        b.iter_batched(
            || PATHS.iter().copied().map(Pathname::from).collect::<Vec<_>>(),
            |mut paths| sort_paths(black_box(&mut paths)).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn sub_bench(c: &mut Criterion) {
    let mut group: BenchmarkGroup<WallTime> = c.benchmark_group("path::sub");
    group.sampling_mode(SamplingMode::Auto);

    let path = Pathname::new("/usr/bin/perl");
    group.bench_function("literal", |b| {
        b.iter(|| black_box(path.sub("perl", "ruby")).unwrap())
    });

    let pattern = Pattern::regex(r"(\w+)/(\w+)$").unwrap();
    group.bench_function("regex backreferences", |b| {
        b.iter_batched(
            || pattern.clone(),
            |pattern| black_box(path.sub(pattern, r"\2/\1")).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5));
    targets = compare_bench, sub_bench
);
criterion_main!(benches);
