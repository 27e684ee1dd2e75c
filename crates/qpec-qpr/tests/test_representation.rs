//! Integration and property tests for `OperationRepresentation`.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qpec_ir::{Circuit, QubitId};
use qpec_qpr::{NoisyOperation, OperationRepresentation};

/// Build a representation with the given coefficients, one distinct
/// rotation fragment per term.
fn representation_with(coeffs: &[f64]) -> OperationRepresentation {
    let ideal = Circuit::with_size("id", 1, 0);
    let terms = coeffs
        .iter()
        .enumerate()
        .map(|(i, &eta)| {
            let mut c = Circuit::with_size(format!("rz{i}"), 1, 0);
            c.rz(0.05 + 0.1 * i as f64, QubitId(0)).unwrap();
            (NoisyOperation::new(c, None).unwrap(), eta)
        })
        .collect();
    OperationRepresentation::new(ideal, terms)
}

#[test]
fn sample_sequence_is_reproducible_across_runs() {
    let rep = representation_with(&[1.4, -0.2, -0.2]);

    let sequence = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..100)
            .map(|_| {
                let (op, sign, eta) = rep.sample(&mut rng).unwrap();
                (op.circuit().name().to_string(), sign, eta)
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(sequence(0), sequence(0));
    assert_ne!(sequence(0), sequence(1));
}

#[test]
fn sampled_operations_come_from_the_expansion() {
    let rep = representation_with(&[0.9, 0.3, -0.2]);
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let (op, _, eta) = rep.sample(&mut rng).unwrap();
        assert!(
            rep.terms()
                .iter()
                .any(|(candidate, candidate_eta)| candidate == op && *candidate_eta == eta)
        );
    }
}

fn nonzero_coeff() -> impl Strategy<Value = f64> {
    prop_oneof![0.01f64..2.0, -2.0f64..-0.01]
}

proptest! {
    #[test]
    fn distribution_always_sums_to_one(coeffs in prop::collection::vec(nonzero_coeff(), 1..8)) {
        let rep = representation_with(&coeffs);
        let total: f64 = rep.distribution().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn norm_is_sum_of_magnitudes(coeffs in prop::collection::vec(nonzero_coeff(), 1..8)) {
        let rep = representation_with(&coeffs);
        let expected: f64 = coeffs.iter().map(|c| c.abs()).sum();
        prop_assert!((rep.norm() - expected).abs() < 1e-12);
    }

    #[test]
    fn sampled_sign_tracks_coefficient(
        coeffs in prop::collection::vec(nonzero_coeff(), 1..8),
        seed in 0u64..1024,
    ) {
        let rep = representation_with(&coeffs);
        let mut rng = StdRng::seed_from_u64(seed);
        let (_, sign, eta) = rep.sample(&mut rng).unwrap();
        prop_assert_eq!(sign, eta.signum());
    }
}
