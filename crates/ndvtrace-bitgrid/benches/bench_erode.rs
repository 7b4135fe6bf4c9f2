use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndvtrace_bitgrid::BitGrid;
use std::hint::black_box;

// a disc with a ragged border, so erosion has work to do on every row
fn sample_grid(width: usize, height: usize) -> BitGrid {
    let mut grid = BitGrid::new(width, height).expect("grid allocation");
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = width.min(height) as f64 * 0.4;
    for y in 0..height {
        for x in 0..width {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let jitter = ((x * 31 + y * 17) % 7) as f64;
            grid.set(x, y, (dx * dx + dy * dy).sqrt() + jitter < radius);
        }
    }
    grid
}

fn bench_erode(c: &mut Criterion) {
    let mut group = c.benchmark_group("Erode");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);
        let grid = sample_grid(*width, *height);

        group.bench_with_input(
            BenchmarkId::new("erode", &parameter_string),
            &grid,
            |b, grid| {
                b.iter_batched(
                    || grid.clone(),
                    |mut grid| black_box(grid.erode()),
                    criterion::BatchSize::LargeInput,
                )
            },
        );

        group.bench_with_input(
            BenchmarkId::new("centroid", &parameter_string),
            &grid,
            |b, grid| b.iter(|| black_box(grid.centroid())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_erode);
criterion_main!(benches);
