//! Tests for the minimum one-norm representation solver.

use ndarray::Array2;
use num_complex::Complex64;

use qpec_ir::{Circuit, QubitId};
use qpec_qpr::solver::{find_representation, find_representation_of_channel};
use qpec_qpr::{NoisyBasis, NoisyOperation, QprError, SolverOptions, SuperOp};

fn fragment(name: &str, build: impl FnOnce(&mut Circuit)) -> Circuit {
    let mut c = Circuit::with_size(name, 1, 0);
    build(&mut c);
    c
}

fn noiseless(circuit: Circuit) -> NoisyOperation {
    let channel = SuperOp::from_circuit(&circuit).unwrap();
    NoisyOperation::new(circuit, Some(channel)).unwrap()
}

/// Basis element whose channel is the fragment unitary followed by a
/// depolarizing channel.
fn depolarized(circuit: Circuit, p: f64) -> NoisyOperation {
    let channel = SuperOp::depolarizing(p)
        .compose(&SuperOp::from_circuit(&circuit).unwrap())
        .unwrap();
    NoisyOperation::new(circuit, Some(channel)).unwrap()
}

fn hadamard_pauli_fragments() -> Vec<Circuit> {
    vec![
        fragment("h", |c| {
            c.h(QubitId(0)).unwrap();
        }),
        fragment("hx", |c| {
            c.h(QubitId(0)).unwrap().x(QubitId(0)).unwrap();
        }),
        fragment("hy", |c| {
            c.h(QubitId(0)).unwrap().y(QubitId(0)).unwrap();
        }),
        fragment("hz", |c| {
            c.h(QubitId(0)).unwrap().z(QubitId(0)).unwrap();
        }),
    ]
}

// ---------------------------------------------------------------------------
// Trivial and exact cases
// ---------------------------------------------------------------------------

#[test]
fn exact_basis_element_gives_one_term() {
    let ideal = fragment("h", |c| {
        c.h(QubitId(0)).unwrap();
    });
    let basis = NoisyBasis::new([
        noiseless(ideal.clone()),
        noiseless(fragment("x", |c| {
            c.x(QubitId(0)).unwrap();
        })),
    ]);

    let rep = find_representation(&ideal, &basis, &SolverOptions::default()).unwrap();
    assert_eq!(rep.num_terms(), 1);
    assert!((rep.norm() - 1.0).abs() < 1e-6);
    assert_eq!(rep.terms()[0].0.circuit(), &ideal);
    assert!((rep.terms()[0].1 - 1.0).abs() < 1e-6);
}

#[test]
fn noiseless_identity_basis_is_trivial() {
    let ideal = fragment("id", |c| {
        c.id(QubitId(0)).unwrap();
    });
    let basis = NoisyBasis::new([NoisyOperation::new(
        ideal.clone(),
        Some(SuperOp::identity(1)),
    )
    .unwrap()]);

    let rep = find_representation(&ideal, &basis, &SolverOptions::default()).unwrap();
    assert!((rep.norm() - 1.0).abs() < 1e-6);
    assert_eq!(rep.num_terms(), 1);
}

// ---------------------------------------------------------------------------
// Depolarizing Hadamard basis
// ---------------------------------------------------------------------------

#[test]
fn depolarizing_hadamard_basis_needs_four_terms() {
    let ideal = fragment("h", |c| {
        c.h(QubitId(0)).unwrap();
    });
    let basis = NoisyBasis::new(
        hadamard_pauli_fragments()
            .into_iter()
            .map(|c| depolarized(c, 0.2)),
    );

    let rep = find_representation(&ideal, &basis, &SolverOptions::default()).unwrap();
    assert_eq!(rep.num_terms(), 4);
    assert!(rep.norm() > 1.0);
    assert!((rep.coeffs().iter().sum::<f64>() - 1.0).abs() < 1e-6);
}

#[test]
fn solved_coefficients_reconstruct_the_target() {
    let ideal = fragment("h", |c| {
        c.h(QubitId(0)).unwrap();
    });
    let basis = NoisyBasis::new(
        hadamard_pauli_fragments()
            .into_iter()
            .map(|c| depolarized(c, 0.2)),
    );

    let rep = find_representation(&ideal, &basis, &SolverOptions::default()).unwrap();

    let target = SuperOp::from_circuit(&ideal).unwrap();
    let mut reconstructed: Array2<Complex64> = Array2::zeros((4, 4));
    for (op, eta) in rep.terms() {
        reconstructed = reconstructed
            + op.channel()
                .unwrap()
                .matrix()
                .mapv(|z| z * Complex64::new(*eta, 0.0));
    }
    for (a, b) in reconstructed.iter().zip(target.matrix().iter()) {
        assert!((a - b).norm() < 1e-6, "reconstruction mismatch: {a} vs {b}");
    }
}

#[test]
fn solve_is_deterministic() {
    let ideal = fragment("h", |c| {
        c.h(QubitId(0)).unwrap();
    });
    let basis = NoisyBasis::new(
        hadamard_pauli_fragments()
            .into_iter()
            .map(|c| depolarized(c, 0.1)),
    );

    let rep1 = find_representation(&ideal, &basis, &SolverOptions::default()).unwrap();
    let rep2 = find_representation(&ideal, &basis, &SolverOptions::default()).unwrap();
    assert_eq!(rep1.coeffs(), rep2.coeffs());
}

#[test]
fn round_trip_manual_construction_is_equal() {
    let ideal = fragment("h", |c| {
        c.h(QubitId(0)).unwrap();
    });
    let basis = NoisyBasis::new(
        hadamard_pauli_fragments()
            .into_iter()
            .map(|c| depolarized(c, 0.2)),
    );

    let solved = find_representation(&ideal, &basis, &SolverOptions::default()).unwrap();
    let manual = qpec_qpr::OperationRepresentation::new(
        solved.ideal().clone(),
        solved.terms().to_vec(),
    );
    assert_eq!(solved, manual);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn out_of_span_ideal_is_not_found() {
    let ideal = fragment("x", |c| {
        c.x(QubitId(0)).unwrap();
    });
    // The identity alone cannot express X.
    let basis = NoisyBasis::new([noiseless(fragment("id", |c| {
        c.id(QubitId(0)).unwrap();
    }))]);

    let err = find_representation(&ideal, &basis, &SolverOptions::default()).unwrap_err();
    assert!(matches!(err, QprError::RepresentationNotFound));
}

#[test]
fn empty_basis_is_not_found() {
    let ideal = fragment("x", |c| {
        c.x(QubitId(0)).unwrap();
    });
    let err =
        find_representation(&ideal, &NoisyBasis::default(), &SolverOptions::default()).unwrap_err();
    assert!(matches!(err, QprError::RepresentationNotFound));
}

#[test]
fn basis_element_without_channel_is_rejected() {
    let ideal = fragment("x", |c| {
        c.x(QubitId(0)).unwrap();
    });
    let basis = NoisyBasis::new([NoisyOperation::new(ideal.clone(), None).unwrap()]);

    let err = find_representation(&ideal, &basis, &SolverOptions::default()).unwrap_err();
    assert!(matches!(err, QprError::MissingChannel(_)));
}

#[test]
fn explicit_target_channel_is_honoured() {
    // Represent the depolarizing channel itself over the Pauli superops:
    // D = (1−2p/3)·I + (p/3)(X + Y + Z) in channel space.
    let p = 0.3;
    let target = SuperOp::depolarizing(p);
    let ideal = fragment("id", |c| {
        c.id(QubitId(0)).unwrap();
    });
    let basis = NoisyBasis::new([
        noiseless(fragment("id", |c| {
            c.id(QubitId(0)).unwrap();
        })),
        noiseless(fragment("x", |c| {
            c.x(QubitId(0)).unwrap();
        })),
        noiseless(fragment("y", |c| {
            c.y(QubitId(0)).unwrap();
        })),
        noiseless(fragment("z", |c| {
            c.z(QubitId(0)).unwrap();
        })),
    ]);

    let rep =
        find_representation_of_channel(&ideal, &target, &basis, &SolverOptions::default()).unwrap();
    // A mixture of unitaries: all coefficients nonnegative, γ = 1.
    assert!((rep.norm() - 1.0).abs() < 1e-6);
    assert!(rep.coeffs().iter().all(|&eta| eta > -1e-9));
}
