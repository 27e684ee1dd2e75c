//! Noisy implementable operations and bases.
//!
//! A [`NoisyOperation`] pairs a circuit fragment with the channel matrix it
//! implements on the real device. A [`NoisyBasis`] is a content-unique
//! collection of such operations used as the dictionary of building blocks
//! for a quasi-probability decomposition.

use std::hash::{Hash, Hasher};

use qpec_ir::{Circuit, Instruction, QubitId};

use crate::error::{QprError, QprResult};
use crate::superop::SuperOp;

/// A circuit fragment together with the channel it implements on hardware.
///
/// The channel may be absent when the caller supplies decomposition
/// coefficients manually. Equality and hashing are by fragment content so
/// operations can key maps and dedup sets; the channel never participates.
#[derive(Debug, Clone)]
pub struct NoisyOperation {
    circuit: Circuit,
    channel: Option<SuperOp>,
}

impl NoisyOperation {
    /// Construct from a fragment and an optional channel matrix.
    ///
    /// When a channel is given, its dimension must equal 4^(fragment qubits).
    pub fn new(circuit: Circuit, channel: Option<SuperOp>) -> QprResult<Self> {
        if let Some(ch) = &channel {
            let expected = 1usize << (2 * circuit.num_qubits() as usize);
            if ch.dim() != expected {
                return Err(QprError::Dimension {
                    expected,
                    got: ch.dim(),
                });
            }
        }
        Ok(Self { circuit, channel })
    }

    /// The circuit fragment.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// The channel matrix, if one was supplied.
    pub fn channel(&self) -> Option<&SuperOp> {
        self.channel.as_ref()
    }

    /// Number of qubits the fragment acts on.
    pub fn num_qubits(&self) -> u32 {
        self.circuit.num_qubits()
    }
}

impl PartialEq for NoisyOperation {
    fn eq(&self, other: &Self) -> bool {
        self.circuit == other.circuit
    }
}

impl Eq for NoisyOperation {}

impl Hash for NoisyOperation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.circuit.hash(state);
    }
}

/// A content-unique collection of noisy operations.
///
/// Iteration order is insertion order with duplicates dropped, and is the
/// stable order every representation built over this basis inherits.
#[derive(Debug, Clone, Default)]
pub struct NoisyBasis {
    elements: Vec<NoisyOperation>,
}

impl NoisyBasis {
    /// Build a basis, dropping content-duplicate operations.
    pub fn new(operations: impl IntoIterator<Item = NoisyOperation>) -> Self {
        let mut elements: Vec<NoisyOperation> = vec![];
        for op in operations {
            if !elements.contains(&op) {
                elements.push(op);
            }
        }
        Self { elements }
    }

    /// The basis elements in stable order.
    pub fn elements(&self) -> &[NoisyOperation] {
        &self.elements
    }

    /// Iterate over the basis elements.
    pub fn iter(&self) -> impl Iterator<Item = &NoisyOperation> {
        self.elements.iter()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the basis has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get an element by index.
    pub fn get(&self, index: usize) -> Option<&NoisyOperation> {
        self.elements.get(index)
    }

    /// The basis for the tensor composition of two independent bases.
    ///
    /// The result has cardinality `self.len() * other.len()`. Each element's
    /// fragment is the concatenation of the factor fragments, with the right
    /// factor's qubits shifted past the left factor's width; each element's
    /// channel is the Kronecker product of the factor channels (absent if
    /// either factor has no channel).
    pub fn combine(&self, other: &NoisyBasis) -> QprResult<NoisyBasis> {
        let mut elements = Vec::with_capacity(self.len() * other.len());
        for a in &self.elements {
            for b in &other.elements {
                let width = a.num_qubits() + b.num_qubits();
                let clbits = a.circuit().num_clbits() + b.circuit().num_clbits();
                let name = format!("{}-{}", a.circuit().name(), b.circuit().name());
                let mut fragment = Circuit::with_size(name, width, clbits);
                fragment.extend(a.circuit())?;
                for instruction in b.circuit().instructions() {
                    fragment.append(shift_instruction(
                        instruction,
                        a.num_qubits(),
                        a.circuit().num_clbits(),
                    ))?;
                }
                let channel = match (a.channel(), b.channel()) {
                    (Some(ca), Some(cb)) => Some(ca.kron(cb)),
                    _ => None,
                };
                elements.push(NoisyOperation::new(fragment, channel)?);
            }
        }
        Ok(NoisyBasis::new(elements))
    }
}

impl FromIterator<NoisyOperation> for NoisyBasis {
    fn from_iter<T: IntoIterator<Item = NoisyOperation>>(iter: T) -> Self {
        Self::new(iter)
    }
}

fn shift_instruction(instruction: &Instruction, dq: u32, dc: u32) -> Instruction {
    let mut shifted = instruction.clone();
    for qubit in &mut shifted.qubits {
        *qubit = QubitId(qubit.0 + dq);
    }
    for clbit in &mut shifted.clbits {
        *clbit = qpec_ir::ClbitId(clbit.0 + dc);
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(name: &str, build: impl FnOnce(&mut Circuit)) -> Circuit {
        let mut c = Circuit::with_size(name, 1, 0);
        build(&mut c);
        c
    }

    #[test]
    fn test_channel_dimension_checked() {
        let frag = fragment("h", |c| {
            c.h(QubitId(0)).unwrap();
        });
        // 16-dimensional channel on a 1-qubit fragment must be rejected.
        let err = NoisyOperation::new(frag, Some(SuperOp::identity(2))).unwrap_err();
        assert!(matches!(
            err,
            QprError::Dimension {
                expected: 4,
                got: 16
            }
        ));
    }

    #[test]
    fn test_channel_may_be_absent() {
        let frag = fragment("x", |c| {
            c.x(QubitId(0)).unwrap();
        });
        let op = NoisyOperation::new(frag, None).unwrap();
        assert!(op.channel().is_none());
    }

    #[test]
    fn test_equality_ignores_channel() {
        let frag = fragment("x", |c| {
            c.x(QubitId(0)).unwrap();
        });
        let with_channel =
            NoisyOperation::new(frag.clone(), Some(SuperOp::identity(1))).unwrap();
        let without = NoisyOperation::new(frag, None).unwrap();
        assert_eq!(with_channel, without);
    }

    #[test]
    fn test_basis_dedups_by_content() {
        let a = NoisyOperation::new(
            fragment("x1", |c| {
                c.x(QubitId(0)).unwrap();
            }),
            None,
        )
        .unwrap();
        let b = NoisyOperation::new(
            fragment("x2", |c| {
                c.x(QubitId(0)).unwrap();
            }),
            None,
        )
        .unwrap();
        let c = NoisyOperation::new(
            fragment("z", |c| {
                c.z(QubitId(0)).unwrap();
            }),
            None,
        )
        .unwrap();

        let basis = NoisyBasis::new([a, b, c]);
        assert_eq!(basis.len(), 2);
    }

    #[test]
    fn test_combine_cardinality_and_width() {
        let make = |g: fn(&mut Circuit)| {
            NoisyOperation::new(fragment("f", g), Some(SuperOp::identity(1))).unwrap()
        };
        let left = NoisyBasis::new([
            make(|c| {
                c.x(QubitId(0)).unwrap();
            }),
            make(|c| {
                c.y(QubitId(0)).unwrap();
            }),
        ]);
        let right = NoisyBasis::new([
            make(|c| {
                c.z(QubitId(0)).unwrap();
            }),
            make(|c| {
                c.h(QubitId(0)).unwrap();
            }),
        ]);

        let combined = left.combine(&right).unwrap();
        assert_eq!(combined.len(), 4);
        for op in combined.iter() {
            assert_eq!(op.num_qubits(), 2);
            assert_eq!(op.channel().unwrap().dim(), 16);
            assert_eq!(op.circuit().num_gates(), 2);
            // The right factor's gate lands on the shifted qubit.
            assert_eq!(op.circuit().instructions()[1].qubits, vec![QubitId(1)]);
        }
    }
}
