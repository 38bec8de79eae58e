use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fftw_age::{Direction, Options, Planner, Rigour, Transform};

fn measure_vs_wisdom(c: &mut Criterion) {
    let dir = std::env::temp_dir().join(format!("fftw-age-bench-{}", std::process::id()));
    let mut group = c.benchmark_group("Planning, in-place c2c 3D");
    group.sample_size(10);
    for size in (3..6).map(|x| 2usize.pow(x)) {
        let transform = Transform::in_place_c2c(Direction::Forward, Rigour::Measure, [size; 3]);
        let report = fftw_age::generate(&transform, &dir, &Options::default()).unwrap();

        let mut planner = Planner::lock().unwrap();

        // Measured from scratch
        group.bench_with_input(BenchmarkId::new("Measure", size), &transform, |b, t| {
            b.iter(|| {
                planner.forget();
                planner.plan(t, 1).unwrap();
            })
        });

        // Loaded from the wisdom file
        group.bench_with_input(BenchmarkId::new("Wisdom", size), &transform, |b, t| {
            b.iter(|| {
                planner.forget();
                planner.import(&report.path).unwrap();
                assert!(planner.probe(t, 1).unwrap().is_some());
            })
        });
    }
    group.finish();
    let _ = std::fs::remove_dir_all(&dir);
}

criterion_group!(benches, measure_vs_wisdom);
criterion_main!(benches);
