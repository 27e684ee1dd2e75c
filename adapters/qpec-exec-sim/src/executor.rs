//! Executor implementation backed by the density-matrix engine.

use async_trait::async_trait;
use ndarray::Array2;
use num_complex::Complex64;
use tracing::trace;

use qpec_ir::Circuit;
use qpec_run::{ExecutionLog, Executor, ExecutorOutput, RawResult, RunError, RunResult};

use crate::density::DensityMatrix;

/// What the executor hands back after simulating a circuit.
#[derive(Debug, Clone)]
enum OutputMode {
    /// The raw final density matrix (reduce with an observable).
    Density,
    /// A ready expectation value of a fixed Hermitian observable.
    Expectation(Array2<Complex64>),
}

/// A noisy density-matrix simulator.
///
/// Every gate is followed by an independent single-qubit depolarizing
/// channel of probability `noise` on each of its operand qubits, which is
/// the noise model a basis built from per-gate depolarized channels
/// describes. Measurements and barriers are ignored by the simulation (the
/// full state is available either way).
#[derive(Debug, Clone)]
pub struct DensityMatrixExecutor {
    noise: f64,
    mode: OutputMode,
    log: Option<ExecutionLog>,
}

impl DensityMatrixExecutor {
    /// Create a noiseless executor returning raw density matrices.
    pub fn new() -> Self {
        Self {
            noise: 0.0,
            mode: OutputMode::Density,
            log: None,
        }
    }

    /// Set the per-gate depolarizing probability.
    #[must_use]
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    /// Return scalar expectation values of the given observable matrix
    /// instead of raw density matrices.
    #[must_use]
    pub fn returning_expectation(mut self, observable: Array2<Complex64>) -> Self {
        self.mode = OutputMode::Expectation(observable);
        self
    }

    /// Record every executed circuit into the given log.
    #[must_use]
    pub fn with_log(mut self, log: ExecutionLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Simulate one circuit to its final density matrix.
    pub fn simulate(&self, circuit: &Circuit) -> DensityMatrix {
        let mut state = DensityMatrix::new(circuit.num_qubits());
        for instruction in circuit.instructions() {
            if let Some(gate) = instruction.as_gate() {
                state.apply_gate(gate, &instruction.qubits);
                if self.noise > 0.0 {
                    for &qubit in &instruction.qubits {
                        state.apply_depolarizing(self.noise, qubit);
                    }
                }
            }
        }
        trace!(circuit = circuit.name(), noise = self.noise, "simulated circuit");
        state
    }
}

impl Default for DensityMatrixExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Executor for DensityMatrixExecutor {
    async fn run(&self, circuit: &Circuit) -> RunResult<ExecutorOutput> {
        if let Some(log) = &self.log {
            log.record(circuit);
        }
        let state = self.simulate(circuit);
        match &self.mode {
            OutputMode::Density => Ok(ExecutorOutput::Raw(RawResult::DensityMatrix(
                state.matrix().clone(),
            ))),
            OutputMode::Expectation(observable) => {
                if observable.nrows() != state.matrix().nrows() {
                    return Err(RunError::execution(
                        circuit,
                        format!(
                            "observable dimension {} does not match state dimension {}",
                            observable.nrows(),
                            state.matrix().nrows()
                        ),
                    ));
                }
                Ok(ExecutorOutput::Expectation(state.expectation(observable)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qpec_ir::{Gate, QubitId};

    #[tokio::test]
    async fn test_noiseless_expectation_mode() {
        let mut circuit = Circuit::with_size("h", 1, 0);
        circuit.h(QubitId(0)).unwrap();

        let executor = DensityMatrixExecutor::new().returning_expectation(Gate::X.unitary());
        let output = executor.run(&circuit).await.unwrap();
        match output {
            ExecutorOutput::Expectation(value) => assert!((value - 1.0).abs() < 1e-12),
            other => panic!("expected a scalar, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_observable_dimension_mismatch() {
        let circuit = Circuit::with_size("wide", 2, 0);
        let executor = DensityMatrixExecutor::new().returning_expectation(Gate::X.unitary());
        assert!(matches!(
            executor.run(&circuit).await,
            Err(RunError::Execution { .. })
        ));
    }

    #[tokio::test]
    async fn test_log_records_runs() {
        let log = ExecutionLog::new();
        let executor = DensityMatrixExecutor::new().with_log(log.clone());
        let mut circuit = Circuit::with_size("x", 1, 0);
        circuit.x(QubitId(0)).unwrap();

        executor.run(&circuit).await.unwrap();
        executor.run(&circuit).await.unwrap();
        assert_eq!(log.len(), 2);
    }
}
