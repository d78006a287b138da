use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mini_inference::config::{Canvas, MetropolisConfig, VariationalConfig};
use mini_inference::density::{GaussianMixture, Point, TargetDensity};
use mini_inference::metropolis::MetropolisSampler;
use mini_inference::variational::VariationalOptimizer;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("density eval", |b| {
        let target = GaussianMixture::<f64>::default();
        b.iter(|| target.density(black_box(Point::new(173.0, 142.0))))
    });

    c.bench_function("mcmc step", |b| {
        let mut sampler = MetropolisSampler::new(
            GaussianMixture::<f64>::default(),
            Canvas::default(),
            MetropolisConfig::default(),
        )
        .set_seed(42);
        b.iter(|| sampler.step())
    });

    c.bench_function("vi step", |b| {
        let mut optimizer = VariationalOptimizer::new(
            GaussianMixture::<f64>::default(),
            VariationalConfig::default(),
        );
        b.iter(|| optimizer.step())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
