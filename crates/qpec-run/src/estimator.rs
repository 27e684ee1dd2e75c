//! The error-cancelled expectation-value estimator.
//!
//! For a circuit whose ideal operations carry quasi-probability
//! representations, each Monte-Carlo draw replaces every represented
//! operation by a sampled noisy fragment, executes the realization, and
//! scales the measured value by `sign × γ_total`. Averaged over the
//! sampling distribution this cancels the noise bias exactly; the residual
//! statistical error shrinks as `1/√num_samples`.

use futures::future;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use qpec_ir::Circuit;
use qpec_qpr::OperationRepresentation;

use crate::error::{RunError, RunResult};
use crate::executor::{Executor, ExecutorOutput, Observable};
use crate::sampler::{CircuitSample, build_lookup, sample_with_lookup};

/// Default target precision (one standard error) when `num_samples` is not
/// given explicitly.
pub const DEFAULT_PRECISION: f64 = 0.03;

/// Full data bundle of one estimation run.
///
/// `num_samples`, `unbiased_estimators` and `pec_error` are the load-bearing
/// keys consumers rely on (e.g. for external bootstrap); the rest supports
/// post-hoc analysis and auditing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PecData {
    /// The error-cancelled expectation value (mean of the estimators).
    pub pec_value: f64,
    /// Number of Monte-Carlo draws.
    pub num_samples: usize,
    /// Per-shot unbiased estimators, in draw order.
    pub unbiased_estimators: Vec<f64>,
    /// Sample standard deviation of the estimators (n − 1 denominator;
    /// 0.0 for a single draw).
    pub pec_std: f64,
    /// Standard error: `pec_std / √num_samples`.
    pub pec_error: f64,
    /// Every executed circuit realization, in draw order.
    pub sampled_circuits: Vec<Circuit>,
}

/// Estimator of noise-cancelled expectation values.
///
/// ```rust,ignore
/// let data = PecEstimator::new(&executor)
///     .with_observable(&observable)
///     .with_precision(0.05)
///     .with_seed(7)
///     .run(&circuit, &representations)
///     .await?;
/// println!("{} ± {}", data.pec_value, data.pec_error);
/// ```
pub struct PecEstimator<'a, E: Executor + ?Sized> {
    executor: &'a E,
    observable: Option<&'a dyn Observable>,
    num_samples: Option<usize>,
    precision: f64,
    seed: Option<u64>,
}

impl<'a, E: Executor + ?Sized> PecEstimator<'a, E> {
    /// Create an estimator over the given executor.
    pub fn new(executor: &'a E) -> Self {
        Self {
            executor,
            observable: None,
            num_samples: None,
            precision: DEFAULT_PRECISION,
            seed: None,
        }
    }

    /// Reduce raw executor results with this observable.
    ///
    /// Required whenever the executor returns raw results instead of ready
    /// expectation values.
    #[must_use]
    pub fn with_observable(mut self, observable: &'a dyn Observable) -> Self {
        self.observable = Some(observable);
        self
    }

    /// Fix the number of Monte-Carlo draws, overriding the precision target.
    #[must_use]
    pub fn with_num_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = Some(num_samples);
        self
    }

    /// Set the target precision (one standard error).
    ///
    /// When `num_samples` is not fixed, the draw count resolves to
    /// `ceil((γ_total / precision)²)` — a larger total norm demands
    /// quadratically more samples for the same target.
    #[must_use]
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Seed the sampling RNG for reproducible runs.
    ///
    /// All draws are taken from the seeded stream before any executor call
    /// is dispatched, so the realized circuits are identical for a given
    /// seed regardless of how concurrently the executor runs them.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the estimation and return the scalar corrected value.
    pub async fn value(
        &self,
        circuit: &Circuit,
        representations: &[OperationRepresentation],
    ) -> RunResult<f64> {
        Ok(self.run(circuit, representations).await?.pec_value)
    }

    /// Run the estimation and return the full data bundle.
    ///
    /// Operations without a representation pass through as noiseless —
    /// a documented leniency, not an error. A failed executor call aborts
    /// the whole run; partially accumulated statistics are discarded, never
    /// folded into a misleading mean.
    pub async fn run(
        &self,
        circuit: &Circuit,
        representations: &[OperationRepresentation],
    ) -> RunResult<PecData> {
        let lookup = build_lookup(representations);

        // γ_total: product of norms over every represented occurrence.
        let gamma_total: f64 = circuit
            .instructions()
            .iter()
            .filter_map(|instruction| instruction.as_gate())
            .filter_map(|gate| lookup.get(gate))
            .map(|rep| rep.norm())
            .product();

        let num_samples = self.resolve_num_samples(gamma_total)?;
        debug!(
            gamma_total,
            num_samples,
            n_representations = representations.len(),
            circuit = circuit.name(),
            "starting error-cancellation run"
        );

        // Pre-split the random stream: draw every realization sequentially
        // so the sampled sequence is fixed by the seed alone.
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let samples = self.draw_samples(circuit, &lookup, num_samples, &mut rng)?;

        // Independent draws execute concurrently; output order follows
        // draw order.
        let outputs = future::try_join_all(
            samples.iter().map(|sample| self.executor.run(&sample.circuit)),
        )
        .await?;

        let mut unbiased_estimators = Vec::with_capacity(num_samples);
        for (sample, output) in samples.iter().zip(outputs) {
            let measured = self.reduce(sample, output)?;
            unbiased_estimators.push(sample.sign * gamma_total * measured);
        }

        let pec_value = mean(&unbiased_estimators);
        let pec_std = sample_std(&unbiased_estimators, pec_value);
        let pec_error = pec_std / (num_samples as f64).sqrt();
        debug!(pec_value, pec_std, pec_error, "error-cancellation run finished");

        Ok(PecData {
            pec_value,
            num_samples,
            unbiased_estimators,
            pec_std,
            pec_error,
            sampled_circuits: samples.into_iter().map(|s| s.circuit).collect(),
        })
    }

    fn draw_samples<R: Rng>(
        &self,
        circuit: &Circuit,
        lookup: &crate::sampler::RepLookup<'_>,
        num_samples: usize,
        rng: &mut R,
    ) -> RunResult<Vec<CircuitSample>> {
        let mut samples = Vec::with_capacity(num_samples);
        for _ in 0..num_samples {
            samples.push(sample_with_lookup(circuit, lookup, rng)?);
        }
        Ok(samples)
    }

    fn reduce(&self, sample: &CircuitSample, output: ExecutorOutput) -> RunResult<f64> {
        match output {
            ExecutorOutput::Expectation(value) => Ok(value),
            ExecutorOutput::Raw(raw) => match self.observable {
                Some(observable) => observable
                    .expectation(&raw)
                    .map_err(|err| RunError::execution(&sample.circuit, err.to_string())),
                None => Err(RunError::execution(
                    &sample.circuit,
                    "executor returned a raw result but no observable was supplied",
                )),
            },
        }
    }

    fn resolve_num_samples(&self, gamma_total: f64) -> RunResult<usize> {
        if let Some(num_samples) = self.num_samples {
            if num_samples == 0 {
                return Err(RunError::Configuration(
                    "num_samples must be positive".into(),
                ));
            }
            return Ok(num_samples);
        }
        if !self.precision.is_finite() || self.precision <= 0.0 {
            return Err(RunError::Configuration(format!(
                "precision must be positive and finite, got {}",
                self.precision
            )));
        }
        let resolved = (gamma_total / self.precision).powi(2).ceil();
        if !resolved.is_finite() || resolved < 1.0 {
            return Err(RunError::Configuration(format!(
                "precision {} and total norm {} resolve to zero samples",
                self.precision, gamma_total
            )));
        }
        Ok(resolved as usize)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_std_matches_n_minus_one() {
        let values = [0.8, 0.82, 0.78, 0.81, 0.79];
        let m = mean(&values);
        let std = sample_std(&values, m);
        assert!((m - 0.8).abs() < 1e-12);
        assert!((std * std - 0.00025).abs() < 1e-10);
    }

    #[test]
    fn test_sample_std_single_value_is_zero() {
        assert_eq!(sample_std(&[1.5], 1.5), 0.0);
    }
}
