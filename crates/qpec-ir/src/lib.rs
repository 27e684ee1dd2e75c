//! QPEC circuit intermediate representation.
//!
//! This crate provides the core data structures for representing quantum
//! circuits in QPEC. Circuits are ordered instruction sequences — the
//! error-cancellation core consumes a circuit operation by operation and
//! splices sampled replacement fragments back in, so no DAG layer is needed.
//!
//! # Example: building a fragment
//!
//! ```rust
//! use qpec_ir::{Circuit, QubitId};
//!
//! let mut fragment = Circuit::with_size("hx", 1, 0);
//! fragment.h(QubitId(0)).unwrap().x(QubitId(0)).unwrap();
//!
//! assert_eq!(fragment.num_gates(), 2);
//! ```
//!
//! Gates carry their exact unitary matrices ([`Gate::unitary`]) so channel
//! construction and simulation share a single source of truth.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod unitary;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::Gate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
