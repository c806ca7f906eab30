use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glowgpu_pp::bloom::{Axis, Kernel};

pub fn kernel(c: &mut Criterion) {
    let step = Axis::Horizontal.step((960, 540));
    let mut group = c.benchmark_group("kernel");
    for taps in [3, 15, 63] {
        group.bench_with_input(BenchmarkId::from_parameter(taps), &taps, |b, &taps| {
            b.iter(|| Kernel::compute(black_box(4.0), taps, step).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, kernel);
criterion_main!(benches);
