//! Automated `(C, gamma)` search for the RBF kernel.
//!
//! Brute force over `C = 2^c` and `gamma = 2^g`, scoring each pair by k-fold
//! cross-validation accuracy. Both exponent lists are shuffled before the
//! search, so with the early stop below the visited subset differs between
//! unseeded runs.
//!
//! To bound cost the search runs on a random subsample of at most
//! `max_examples` training vectors, and stops as soon as a pair reaches
//! `accuracy_threshold` or `max_iterations` pairs have been evaluated. The
//! result is the best pair seen so far, which may be a local optimum.

use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::SeedableRng;
use rayon::prelude::*;
use std::borrow::Cow;

use crate::config::GridSearchConfig;
use crate::error::Result;
use crate::models::solver::{SvmParameter, SvmProblem, SvmSolver};

/// Best pair found by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearchOutcome {
    pub c: f64,
    pub gamma: f64,
    /// Cross-validation accuracy of the chosen pair.
    pub accuracy: f64,
    /// Number of pairs whose accuracy entered the comparison.
    pub evaluations: usize,
}

/// One `(c, g)` exponent pair of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub c_exponent: i32,
    pub gamma_exponent: i32,
}

impl Candidate {
    pub fn c(&self) -> f64 {
        2f64.powi(self.c_exponent)
    }

    pub fn gamma(&self) -> f64 {
        2f64.powi(self.gamma_exponent)
    }
}

#[derive(Debug, Clone)]
pub struct GridSearch {
    config: GridSearchConfig,
}

impl GridSearch {
    pub fn new(config: GridSearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(GridSearch { config })
    }

    pub fn config(&self) -> &GridSearchConfig {
        &self.config
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Cross product of the independently shuffled exponent lists, C outer.
    pub fn candidates(&self, rng: &mut StdRng) -> Vec<Candidate> {
        let mut c_values = self.config.c_exponents.exponents();
        let mut gamma_values = self.config.gamma_exponents.exponents();
        c_values.shuffle(rng);
        gamma_values.shuffle(rng);

        c_values
            .iter()
            .flat_map(|&c_exponent| {
                gamma_values.iter().map(move |&gamma_exponent| Candidate {
                    c_exponent,
                    gamma_exponent,
                })
            })
            .collect()
    }

    /// Random subsample of at most `max_examples` rows, kept in row order.
    fn capped<'a>(&self, problem: &'a SvmProblem, rng: &mut StdRng) -> Cow<'a, SvmProblem> {
        if problem.len() <= self.config.max_examples {
            return Cow::Borrowed(problem);
        }
        let mut rows = index::sample(rng, problem.len(), self.config.max_examples).into_vec();
        rows.sort_unstable();
        log::debug!(
            "Grid search restricted to {} of {} training vectors",
            rows.len(),
            problem.len()
        );
        Cow::Owned(problem.select(&rows))
    }

    /// Fraction of examples whose cross-validated prediction lands on the
    /// same side of 0.5 as its label. Solver failures score 0.
    fn accuracy<S: SvmSolver>(
        &self,
        solver: &S,
        problem: &SvmProblem,
        params: &SvmParameter,
    ) -> f64 {
        if problem.is_empty() {
            return 0.0;
        }
        match solver.cross_validate(problem, params, self.config.folds) {
            Ok(predictions) => {
                let correct = predictions
                    .iter()
                    .zip(&problem.labels)
                    .filter(|(&predicted, &label)| (predicted > 0.5) == (label > 0.5))
                    .count();
                correct as f64 / problem.len() as f64
            }
            Err(e) => {
                log::warn!(
                    "Cross-validation failed for C={} gamma={}: {}",
                    params.c,
                    params.gamma,
                    e
                );
                0.0
            }
        }
    }

    /// Run the search. Returns `None` only when the grid is empty.
    pub fn search<S: SvmSolver>(
        &self,
        solver: &S,
        problem: &SvmProblem,
        base: &SvmParameter,
    ) -> Option<GridSearchOutcome> {
        let mut rng = self.rng();
        let candidates = self.candidates(&mut rng);
        let problem = self.capped(problem, &mut rng);

        let batch_size = if self.config.parallel {
            rayon::current_num_threads().max(1)
        } else {
            1
        };

        let mut best: Option<GridSearchOutcome> = None;
        let mut evaluations = 0;

        for batch in candidates.chunks(batch_size) {
            let budget = self.config.max_iterations - evaluations;
            let batch = &batch[..batch.len().min(budget)];

            let evaluate = |candidate: &Candidate| {
                let params = base.with_c_gamma(candidate.c(), candidate.gamma());
                self.accuracy(solver, &problem, &params)
            };
            let accuracies: Vec<f64> = if self.config.parallel {
                batch.par_iter().map(evaluate).collect()
            } else {
                batch.iter().map(evaluate).collect()
            };

            // reduce in candidate order so early stopping matches a serial run
            for (candidate, accuracy) in batch.iter().zip(accuracies) {
                evaluations += 1;
                log::trace!(
                    "C=2^{} gamma=2^{}: accuracy {:.4}",
                    candidate.c_exponent,
                    candidate.gamma_exponent,
                    accuracy
                );

                let improved = best.as_ref().map_or(true, |b| accuracy > b.accuracy);
                if improved {
                    best = Some(GridSearchOutcome {
                        c: candidate.c(),
                        gamma: candidate.gamma(),
                        accuracy,
                        evaluations,
                    });
                }

                let best_accuracy = best.as_ref().map_or(0.0, |b| b.accuracy);
                if best_accuracy >= self.config.accuracy_threshold
                    || evaluations >= self.config.max_iterations
                {
                    return best.map(|b| self.finish(b, evaluations));
                }
            }
        }

        best.map(|b| self.finish(b, evaluations))
    }

    fn finish(&self, mut outcome: GridSearchOutcome, evaluations: usize) -> GridSearchOutcome {
        outcome.evaluations = evaluations;
        log::info!(
            "Grid search picked C={} gamma={} (accuracy {:.4}) after {} evaluations",
            outcome.c,
            outcome.gamma,
            outcome.accuracy,
            evaluations
        );
        outcome
    }
}
