//! Tests for root-table construction, ordering invariants and end-to-end
//! transform properties on both arithmetic variants.

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::*;

/// Finds a prime of roughly `bits` bits congruent to 1 modulo 2n.
fn find_ntt_prime(bits: u32, log_n: usize) -> u64 {
    let two_n = 1u64 << (log_n + 1);
    let mut candidate = ((1u64 << bits) - 1) / two_n * two_n + 1;
    while candidate > two_n {
        if is_prime(candidate) {
            return candidate;
        }
        candidate -= two_n;
    }
    panic!("no NTT prime of {} bits for log_n = {}", bits, log_n);
}

#[test]
fn test_reverse_bits() {
    let reversed: Vec<usize> = (0..8).map(|i| reverse_bits(i, 3)).collect();
    assert_eq!(reversed, vec![0, 4, 2, 6, 1, 5, 3, 7]);

    assert_eq!(reverse_bits(0, 0), 0);
    assert_eq!(reverse_bits(1, 1), 1);
    assert_eq!(reverse_bits(0b0011, 4), 0b1100);
    assert_eq!(reverse_bits(1, 17), 1 << 16);
}

#[test]
fn test_rejects_bad_parameters() {
    let q = Modulus::new(3329 * 7).unwrap();
    assert!(NttTables::new(4, q).is_err(), "composite modulus accepted");

    // 23 is prime but 22 is not divisible by 2n = 8.
    let q = Modulus::new(23).unwrap();
    assert!(NttTables::new(2, q).is_err());

    let q = Modulus::new(12289).unwrap();
    assert!(NttTables::new(MAX_LOG_N + 1, q).is_err());
    assert!(NttTables::new(2, q).is_ok());
}

#[test]
fn test_root_is_primitive() {
    for (log_n, q) in [(0usize, 17u64), (2, 17), (8, 12289), (10, 8380417)] {
        let tables = NttTables::new(log_n, Modulus::new(q).unwrap()).unwrap();
        let m = tables.modulus();
        let n = tables.size() as u64;
        // psi^n = -1 pins the order to exactly 2n.
        assert_eq!(m.pow(tables.root(), n), q - 1);
        assert_eq!(m.mul(tables.root(), tables.inv_root()), 1);
    }
}

#[test]
fn test_forward_table_is_bit_reversed_powers() {
    let modulus = Modulus::new(12289).unwrap();
    let log_n = 6;
    let tables = NttTables::new(log_n, modulus).unwrap();
    let psi = tables.root();

    for i in 1..tables.size() {
        let expected = modulus.pow(psi, reverse_bits(i, log_n) as u64);
        assert_eq!(tables.root_powers()[i].operand(), expected, "slot {}", i);
    }
}

#[test]
fn test_inverse_table_is_scrambled_inverse_powers() {
    let modulus = Modulus::new(12289).unwrap();
    let log_n = 6;
    let tables = NttTables::new(log_n, modulus).unwrap();
    let inv_psi = tables.inv_root();

    // Slot reverse_bits(i - 1) + 1 holds psi^-i.
    for i in 1..tables.size() {
        let slot = reverse_bits(i - 1, log_n) + 1;
        let expected = modulus.pow(inv_psi, i as u64);
        assert_eq!(tables.inv_root_powers()[slot].operand(), expected, "i = {}", i);
    }
}

#[test]
fn test_size_four_worked_example() {
    // q = 17 with a primitive 8th root: the forward transform evaluates the
    // input polynomial at the odd powers of psi, in bit-reversed order.
    let modulus = Modulus::new(17).unwrap();
    let tables = NttTables::new(2, modulus).unwrap();
    let psi = tables.root();

    let coeffs = [3u64, 7, 11, 2];
    let eval = |x: u64| {
        coeffs
            .iter()
            .rev()
            .fold(0u64, |acc, &c| modulus.add(modulus.mul(acc, x), c))
    };

    let mut values = coeffs;
    tables.forward(&mut values).unwrap();

    for j in 0..4 {
        let exponent = 2 * reverse_bits(j, 2) as u64 + 1;
        assert_eq!(values[j], eval(modulus.pow(psi, exponent)), "output {}", j);
    }
}

#[test]
fn test_ntt_roundtrip_all_sizes() {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    for log_n in 0..=13 {
        let q = find_ntt_prime(50, log_n);
        let tables = NttTables::new(log_n, Modulus::new(q).unwrap()).unwrap();

        let original: Vec<u64> = (0..tables.size()).map(|_| rng.gen_range(0..q)).collect();
        let mut values = original.clone();

        tables.forward(&mut values).unwrap();
        if log_n > 0 {
            assert_ne!(values, original);
        }
        tables.inverse(&mut values).unwrap();
        assert_eq!(values, original, "roundtrip failed at log_n = {}", log_n);
    }
}

#[test]
fn test_ntt_lazy_output_bounds() {
    let mut rng = ChaCha20Rng::seed_from_u64(43);
    let q = find_ntt_prime(60, 8);
    let tables = NttTables::new(8, Modulus::new(q).unwrap()).unwrap();

    let mut values: Vec<u64> = (0..256).map(|_| rng.gen_range(0..q)).collect();
    tables.forward_lazy(&mut values).unwrap();
    assert!(values.iter().all(|&v| v < 4 * q));

    for v in values.iter_mut() {
        *v = tables.modulus().reduce(*v);
    }
    tables.inverse_lazy(&mut values).unwrap();
    assert!(values.iter().all(|&v| v < 2 * q));
}

#[test]
fn test_ntt_linearity() {
    let mut rng = ChaCha20Rng::seed_from_u64(44);
    let q = find_ntt_prime(48, 6);
    let modulus = Modulus::new(q).unwrap();
    let tables = NttTables::new(6, modulus).unwrap();
    let n = tables.size();

    let x: Vec<u64> = (0..n).map(|_| rng.gen_range(0..q)).collect();
    let y: Vec<u64> = (0..n).map(|_| rng.gen_range(0..q)).collect();
    let (a, b) = (rng.gen_range(1..q), rng.gen_range(1..q));

    let mut combined: Vec<u64> = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| modulus.add(modulus.mul(a, xi), modulus.mul(b, yi)))
        .collect();
    tables.forward(&mut combined).unwrap();

    let mut fx = x;
    let mut fy = y;
    tables.forward(&mut fx).unwrap();
    tables.forward(&mut fy).unwrap();
    let recombined: Vec<u64> = fx
        .iter()
        .zip(fy.iter())
        .map(|(&xi, &yi)| modulus.add(modulus.mul(a, xi), modulus.mul(b, yi)))
        .collect();

    assert_eq!(combined, recombined);
}

#[test]
fn test_scalar_fusion_matches_separate_pass() {
    let mut rng = ChaCha20Rng::seed_from_u64(45);
    let q = find_ntt_prime(52, 5);
    let modulus = Modulus::new(q).unwrap();
    let tables = NttTables::new(5, modulus).unwrap();
    let n = tables.size();

    let input: Vec<u64> = (0..n).map(|_| rng.gen_range(0..q)).collect();

    // Fused: 1/n folded into the last inverse stage.
    let mut fused = input.clone();
    tables.inverse(&mut fused).unwrap();

    // Separate: unnormalized inverse, then an elementwise multiply by 1/n.
    let mut separate = input;
    tables
        .handler()
        .transform_from_rev(&mut separate, tables.log_n(), tables.inv_root_powers(), None);
    let inv_degree = tables.inv_degree();
    for v in separate.iter_mut() {
        *v = modulus.reduce(inv_degree.mul_lazy(*v, q));
    }

    assert_eq!(fused, separate);
}

proptest! {
    #[test]
    fn prop_ntt_roundtrip(values in proptest::collection::vec(0u64..12289, 256)) {
        let tables = NttTables::new(8, Modulus::new(12289).unwrap()).unwrap();
        let mut buf = values.clone();
        tables.forward(&mut buf).unwrap();
        tables.inverse(&mut buf).unwrap();
        prop_assert_eq!(buf, values);
    }
}

#[cfg(feature = "std")]
mod fft {
    use super::*;
    use num_complex::Complex;

    fn random_vector(rng: &mut ChaCha20Rng, n: usize) -> Vec<Complex<f64>> {
        (0..n)
            .map(|_| Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect()
    }

    fn max_distance(a: &[Complex<f64>], b: &[Complex<f64>]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_fft_tables_hold_unit_roots() {
        let log_n = 3;
        let tables = FftTables::new(log_n).unwrap();
        let n = tables.size();
        let angle = core::f64::consts::PI / n as f64;

        for i in 1..n {
            let expected = Complex::from_polar(1.0, angle * reverse_bits(i, log_n) as f64);
            assert!((tables.root_powers()[i] - expected).norm() < 1e-15);

            let slot = reverse_bits(i - 1, log_n) + 1;
            let expected = Complex::from_polar(1.0, -angle * i as f64);
            assert!((tables.inv_root_powers()[slot] - expected).norm() < 1e-15);
        }
    }

    #[test]
    fn test_fft_roundtrip_all_sizes() {
        let mut rng = ChaCha20Rng::seed_from_u64(46);
        for log_n in 0..=12 {
            let tables = FftTables::new(log_n).unwrap();
            let original = random_vector(&mut rng, tables.size());
            let mut values = original.clone();

            tables.forward(&mut values).unwrap();
            tables.inverse(&mut values).unwrap();

            assert!(
                max_distance(&values, &original) < 1e-8,
                "roundtrip error too large at log_n = {}",
                log_n
            );
        }
    }

    #[test]
    fn test_fft_linearity() {
        let mut rng = ChaCha20Rng::seed_from_u64(47);
        let tables = FftTables::new(7).unwrap();
        let n = tables.size();

        let x = random_vector(&mut rng, n);
        let y = random_vector(&mut rng, n);
        let a = Complex::new(0.75, -0.5);
        let b = Complex::new(-1.25, 0.3);

        let mut combined: Vec<Complex<f64>> = x
            .iter()
            .zip(y.iter())
            .map(|(&xi, &yi)| a * xi + b * yi)
            .collect();
        tables.forward(&mut combined).unwrap();

        let mut fx = x;
        let mut fy = y;
        tables.forward(&mut fx).unwrap();
        tables.forward(&mut fy).unwrap();
        let recombined: Vec<Complex<f64>> = fx
            .iter()
            .zip(fy.iter())
            .map(|(&xi, &yi)| a * xi + b * yi)
            .collect();

        assert!(max_distance(&combined, &recombined) < 1e-10);
    }

    #[test]
    fn test_fft_scalar_fusion_matches_separate_pass() {
        let mut rng = ChaCha20Rng::seed_from_u64(48);
        let tables = FftTables::new(6).unwrap();
        let input = random_vector(&mut rng, tables.size());

        let mut fused = input.clone();
        tables.inverse(&mut fused).unwrap();

        let mut separate = input;
        tables.handler().transform_from_rev(
            &mut separate,
            tables.log_n(),
            tables.inv_root_powers(),
            None,
        );
        let scale = 1.0 / tables.size() as f64;
        for v in separate.iter_mut() {
            *v *= scale;
        }

        assert!(max_distance(&fused, &separate) < 1e-12);
    }
}
