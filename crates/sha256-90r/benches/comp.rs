//! Mode and backend comparison benchmarks.

use core::{hint::black_box, time::Duration};

use criterion::{BenchmarkId, Criterion, SamplingMode, Throughput, criterion_group, criterion_main};
use sha256_90r::{Backend, Mode, Sha256_90r, hash_with_mode, parallel::tree_hash};

fn pseudo_random_bytes(len: usize, mut seed: u64) -> Vec<u8> {
  let mut out = Vec::with_capacity(len);
  while out.len() < len {
    seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    out.extend_from_slice(&seed.to_le_bytes());
  }
  out.truncate(len);
  out
}

fn sized_inputs() -> Vec<(usize, Vec<u8>)> {
  [64usize, 256, 1024, 16 * 1024, 256 * 1024]
    .iter()
    .map(|&len| (len, pseudo_random_bytes(len, 0x90A1_57E5_90A1_57E5 ^ len as u64)))
    .collect()
}

fn oneshot_by_mode(c: &mut Criterion) {
  let inputs = sized_inputs();
  let mut group = c.benchmark_group("sha256_90r/oneshot");
  group.sample_size(40);
  group.warm_up_time(Duration::from_secs(2));
  group.measurement_time(Duration::from_secs(4));
  group.sampling_mode(SamplingMode::Flat);

  for (len, data) in &inputs {
    group.throughput(Throughput::Bytes(*len as u64));

    group.bench_with_input(BenchmarkId::new("fast", len), data, |b, d| {
      b.iter(|| black_box(hash_with_mode(black_box(d), Mode::Fast)))
    });

    group.bench_with_input(BenchmarkId::new("accel", len), data, |b, d| {
      b.iter(|| black_box(hash_with_mode(black_box(d), Mode::Accel)))
    });

    // The constant-time path pays one compression per byte; bench the small
    // sizes only, the large ones are off the chart by design.
    if *len <= 1024 {
      group.bench_with_input(BenchmarkId::new("secure", len), data, |b, d| {
        b.iter(|| black_box(hash_with_mode(black_box(d), Mode::Secure)))
      });
    }
  }

  group.finish();
}

fn oneshot_by_backend(c: &mut Criterion) {
  let data = pseudo_random_bytes(64 * 1024, 0xB4CE_57A7_E901_0001);
  let mut group = c.benchmark_group("sha256_90r/backend");
  group.sample_size(30);
  group.warm_up_time(Duration::from_secs(2));
  group.measurement_time(Duration::from_secs(4));
  group.throughput(Throughput::Bytes(data.len() as u64));

  for &backend in &[Backend::Scalar, Backend::Simd, Backend::ShaExt, Backend::Jit] {
    group.bench_with_input(BenchmarkId::new(backend.as_str(), data.len()), &data, |b, d| {
      b.iter(|| {
        let mut h = Sha256_90r::with_backend(backend);
        h.update(black_box(d));
        black_box(h.finalize())
      })
    });
  }

  group.finish();
}

fn fpga_model(c: &mut Criterion) {
  // The pipeline model is a behavioral reference; bench one block so its
  // fixed 179-clock latency shows up as a per-block cost.
  let data = pseudo_random_bytes(64, 0xF96A_0001);
  let mut group = c.benchmark_group("sha256_90r/fpga-model");
  group.sample_size(20);
  group.throughput(Throughput::Bytes(data.len() as u64));

  group.bench_function("one-block", |b| {
    b.iter(|| {
      let mut h = Sha256_90r::with_backend(Backend::Fpga);
      h.update(black_box(&data));
      black_box(h.finalize())
    })
  });

  group.finish();
}

fn tree(c: &mut Criterion) {
  let data = pseudo_random_bytes(4 * 1024 * 1024, 0x7EEE_0001);
  let mut group = c.benchmark_group("sha256_90r/tree");
  group.sample_size(20);
  group.warm_up_time(Duration::from_secs(2));
  group.measurement_time(Duration::from_secs(6));
  group.throughput(Throughput::Bytes(data.len() as u64));

  for threads in [1usize, 2, 4] {
    group.bench_with_input(BenchmarkId::new("workers", threads), &data, |b, d| {
      b.iter(|| black_box(tree_hash(black_box(d), 64 * 1024, threads, Mode::Fast).unwrap()))
    });
  }

  group.finish();
}

criterion_group!(benches, oneshot_by_mode, oneshot_by_backend, fpga_model, tree);
criterion_main!(benches);
