//! Monte-Carlo circuit realization sampling.
//!
//! One draw walks the input circuit operation by operation. Every gate with
//! a matching representation is replaced by a noisy fragment drawn from the
//! representation's quasi-probability distribution; the fragment's local
//! qubits are remapped onto the gate's operands. Gates without a
//! representation, measurements, and barriers pass through unchanged.
//!
//! Matching is by gate content (kind and angles). A representation
//! participates when its ideal fragment is a single gate instruction; the
//! same representation then covers that gate wherever it occurs, which
//! assumes gate noise does not depend on qubit placement.

use rand::Rng;
use rustc_hash::FxHashMap;

use qpec_ir::{Circuit, Gate, Instruction, QubitId};
use qpec_qpr::OperationRepresentation;

use crate::error::RunResult;

/// One Monte-Carlo draw: a full noisy realization of a circuit together
/// with the signs and coefficient magnitudes accumulated while sampling it.
#[derive(Debug, Clone)]
pub struct CircuitSample {
    /// The realized noisy circuit.
    pub circuit: Circuit,
    /// Product of per-operation signs, ±1.
    pub sign: f64,
    /// Product of per-operation coefficient magnitudes |η|.
    pub weight: f64,
    /// Per-operation (sign, coefficient) draws, in circuit order.
    pub draws: Vec<(f64, f64)>,
}

/// Gate-keyed lookup from the ideal operations to their representations.
pub(crate) type RepLookup<'a> = FxHashMap<&'a Gate, &'a OperationRepresentation>;

/// Index representations by the single gate their ideal fragment applies.
///
/// Representations whose ideal fragment is not a single gate instruction
/// never match and are skipped. The first representation for a gate wins.
pub(crate) fn build_lookup(representations: &[OperationRepresentation]) -> RepLookup<'_> {
    let mut lookup = RepLookup::default();
    for rep in representations {
        if let [instruction] = rep.ideal().instructions() {
            if let Some(gate) = instruction.as_gate() {
                lookup.entry(gate).or_insert(rep);
            }
        }
    }
    lookup
}

/// Draw one noisy realization of `circuit`.
///
/// Identical RNG state yields an identical realization; the sampler
/// consumes entropy only for gates that have a representation.
pub fn sample_circuit<R: Rng>(
    circuit: &Circuit,
    representations: &[OperationRepresentation],
    rng: &mut R,
) -> RunResult<CircuitSample> {
    let lookup = build_lookup(representations);
    sample_with_lookup(circuit, &lookup, rng)
}

pub(crate) fn sample_with_lookup<R: Rng>(
    circuit: &Circuit,
    lookup: &RepLookup<'_>,
    rng: &mut R,
) -> RunResult<CircuitSample> {
    let mut realized = Circuit::with_size(
        format!("{}-sampled", circuit.name()),
        circuit.num_qubits(),
        circuit.num_clbits(),
    );
    let mut sign = 1.0;
    let mut weight = 1.0;
    let mut draws = Vec::new();

    for instruction in circuit.instructions() {
        let rep = instruction.as_gate().and_then(|gate| lookup.get(gate));
        match rep {
            Some(rep) => {
                let (op, op_sign, eta) = rep.sample(rng)?;
                if op.circuit().num_qubits() as usize > instruction.qubits.len() {
                    return Err(crate::error::RunError::Configuration(format!(
                        "noisy fragment '{}' acts on {} qubits but replaces a {}-qubit gate",
                        op.circuit().name(),
                        op.circuit().num_qubits(),
                        instruction.qubits.len()
                    )));
                }
                for fragment_instruction in op.circuit().instructions() {
                    realized.append(remap(fragment_instruction, &instruction.qubits))?;
                }
                sign *= op_sign;
                weight *= eta.abs();
                draws.push((op_sign, eta));
            }
            None => {
                realized.append(instruction.clone())?;
            }
        }
    }

    Ok(CircuitSample {
        circuit: realized,
        sign,
        weight,
        draws,
    })
}

/// Remap a fragment instruction's local qubits onto the operands of the
/// ideal gate it replaces (local qubit i → i-th operand).
fn remap(instruction: &Instruction, operands: &[QubitId]) -> Instruction {
    let mut mapped = instruction.clone();
    for qubit in &mut mapped.qubits {
        *qubit = operands[qubit.0 as usize];
    }
    mapped
}
