//! GPU benchmarks for the SSYMM kernel family.
//!
//! This benchmark compares:
//! - The one-shot API (upload, launch, download)
//! - Device-resident launches for hardware vs software scheduling

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ssymm::{select_variant, Schedule, Side, SsymmOptions, SsymmParams, Uplo};
use ssymm_cuda::{launch_ssymm, ssymm_gpu, CudaContext, GpuMatrix};

/// Check if CUDA is available
fn cuda_available() -> bool {
    CudaContext::new().is_ok()
}

fn random_matrix(rng: &mut StdRng, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

/// Benchmark the one-shot API including transfers
fn bench_one_shot(c: &mut Criterion) {
    if !cuda_available() {
        println!("CUDA not available, skipping GPU benchmarks");
        return;
    }

    let mut group = c.benchmark_group("GPU_OneShot");
    group.sample_size(20);
    let mut rng = StdRng::seed_from_u64(42);

    for size in [256, 512, 1024, 2048].iter() {
        let n = *size;
        let a = random_matrix(&mut rng, n * n);
        let b = random_matrix(&mut rng, n * n);
        let mut out = vec![0.0f32; n * n];

        group.throughput(Throughput::Elements((2 * n * n * n) as u64));
        group.bench_with_input(BenchmarkId::new("Left_Upper", n), &n, |bench, &n| {
            bench.iter(|| {
                ssymm_gpu(Side::Left, Uplo::Upper, n, n, 1.0, &a, n, &b, n, 0.0, &mut out, n)
                    .unwrap();
                black_box(&out);
            });
        });
    }

    group.finish();
}

/// Benchmark kernel launches on device-resident operands
fn bench_schedules(c: &mut Criterion) {
    let ctx = match CudaContext::new() {
        Ok(ctx) => ctx,
        Err(_) => return,
    };

    let mut group = c.benchmark_group("GPU_Schedule");
    group.sample_size(20);
    let mut rng = StdRng::seed_from_u64(7);

    for size in [512, 1024, 2048].iter() {
        let n = *size;
        let a_gpu = GpuMatrix::from_host(&ctx, &random_matrix(&mut rng, n * n), n, n).unwrap();
        let b_gpu = GpuMatrix::from_host(&ctx, &random_matrix(&mut rng, n * n), n, n).unwrap();
        let mut c_gpu = GpuMatrix::alloc(&ctx, n, n).unwrap();
        let params = SsymmParams::new(Side::Right, Uplo::Lower, n, n);

        group.throughput(Throughput::Elements((2 * n * n * n) as u64));

        for schedule in [Schedule::Hardware, Schedule::Software] {
            let options = SsymmOptions {
                schedule: Some(schedule),
                ..SsymmOptions::default()
            };
            let variant = select_variant(&params, &options);
            group.bench_with_input(BenchmarkId::new(variant.name(), n), &n, |bench, _| {
                bench.iter(|| {
                    launch_ssymm(&ctx, variant, &params, &a_gpu, &b_gpu, &mut c_gpu).unwrap();
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_one_shot, bench_schedules);
criterion_main!(benches);
