use corrtree::comm::SingleProcess;
use corrtree::types::{CorrelationType, ResampleScheme};
use corrtree::{partition, resample, PointSet, TreeBuilder, TreeOptions};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use rand::SeedableRng;

fn sky(npoints: usize) -> PointSet {
    let mut range = StdRng::seed_from_u64(0);
    let ra = rand::distributions::Uniform::from(0.0..360.0);
    let dec = rand::distributions::Uniform::from(-60.0..60.0);
    let mut set = PointSet::new(2);
    for _ in 0..npoints {
        set.push(&[ra.sample(&mut range), dec.sample(&mut range)], 1.0);
    }
    set
}

pub fn tree_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree");
    group.sample_size(20);

    let mut options = TreeOptions::new(CorrelationType::AutoAngular);
    options.set_resampling(ResampleScheme::Jackknife, 64, 64);

    for npoints in [10_000, 100_000] {
        let points = sky(npoints);
        let mask = resample(&options, Some(&points), &SingleProcess).unwrap();
        let builder = TreeBuilder::new(&options, &mask);

        group.bench_function(format!("Resampling mask over {npoints} points"), |b| {
            b.iter(|| black_box(resample(&options, Some(&points), &SingleProcess).unwrap()))
        });
        group.bench_function(format!("Tree over {npoints} points"), |b| {
            b.iter(|| black_box(builder.build(points.clone()).unwrap()))
        });

        let tree = builder.build(points.clone()).unwrap();
        group.bench_function(format!("Partition of {npoints} points over 24 workers"), |b| {
            b.iter(|| black_box(partition(&tree, tree.root(), 24)))
        });
    }
    group.finish();
}

criterion_group!(benches, tree_benchmark);
criterion_main!(benches);
