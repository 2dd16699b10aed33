//! Benchmarks for the discrete weighted transform
//!
//! Measures forward and inverse transforms on both arithmetic variants at a
//! production ring degree, plus the full NTT-accelerated negacyclic
//! multiplication.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_complex::Complex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use he_dwt::modular::{is_prime, Modulus};
use he_dwt::poly::{negacyclic_multiply, Polynomial};
use he_dwt::tables::{FftTables, NttTables};

const LOG_N: usize = 12;

fn find_ntt_prime(bits: u32, log_n: usize) -> u64 {
    let two_n = 1u64 << (log_n + 1);
    let mut candidate = ((1u64 << bits) - 1) / two_n * two_n + 1;
    while candidate > two_n {
        if is_prime(candidate) {
            return candidate;
        }
        candidate -= two_n;
    }
    panic!("no NTT prime of {} bits", bits);
}

fn bench_ntt(c: &mut Criterion) {
    let mut group = c.benchmark_group("ntt_4096");
    let mut rng = ChaCha20Rng::seed_from_u64(42);

    let q = find_ntt_prime(60, LOG_N);
    let tables = NttTables::new(LOG_N, Modulus::new(q).unwrap()).unwrap();
    let values: Vec<u64> = (0..tables.size()).map(|_| rng.gen_range(0..q)).collect();

    group.bench_function("forward_lazy", |b| {
        b.iter_batched(
            || values.clone(),
            |mut v| {
                tables.forward_lazy(&mut v).unwrap();
                black_box(v)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    let mut transformed = values.clone();
    tables.forward(&mut transformed).unwrap();
    group.bench_function("inverse_lazy", |b| {
        b.iter_batched(
            || transformed.clone(),
            |mut v| {
                tables.inverse_lazy(&mut v).unwrap();
                black_box(v)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_negacyclic_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("negacyclic_4096");
    let mut rng = ChaCha20Rng::seed_from_u64(43);

    let q = find_ntt_prime(60, LOG_N);
    let tables = NttTables::new(LOG_N, Modulus::new(q).unwrap()).unwrap();
    let n = tables.size();

    let a = Polynomial {
        coeffs: (0..n).map(|_| rng.gen_range(0..q)).collect(),
    };
    let b = Polynomial {
        coeffs: (0..n).map(|_| rng.gen_range(0..q)).collect(),
    };

    group.bench_function("multiply", |bench| {
        bench.iter(|| negacyclic_multiply(black_box(&a), black_box(&b), &tables).unwrap())
    });

    group.finish();
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft_4096");
    let mut rng = ChaCha20Rng::seed_from_u64(44);

    let tables = FftTables::new(LOG_N).unwrap();
    let values: Vec<Complex<f64>> = (0..tables.size())
        .map(|_| Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();

    group.bench_function("forward", |b| {
        b.iter_batched(
            || values.clone(),
            |mut v| {
                tables.forward(&mut v).unwrap();
                black_box(v)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_ntt, bench_negacyclic_multiply, bench_fft);
criterion_main!(benches);
