//! Data-parallel execution engine.
//!
//! Units of work are dispatched to a dedicated rayon pool. A unit that fails
//! is retried on the spot until it succeeds or its attempt budget runs out;
//! an exhausted unit fails the whole run. Work functions must therefore be
//! idempotent.

use std::fmt::Display;

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::warn;

/// Output of a unit of work together with the attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed<T> {
    pub value: T,
    pub attempts: usize,
}

/// A unit of work that kept failing.
#[derive(Debug)]
pub struct Exhausted<U, E> {
    pub unit: U,
    pub attempts: usize,
    /// Error from the final attempt.
    pub error: E,
}

/// Worker pool plus retry policy.
pub struct Engine {
    pool: ThreadPool,
    max_attempts: usize,
}

impl Engine {
    /// Builds a pool of `num_workers` threads (0 = one per core).
    ///
    /// `max_attempts` is clamped to at least 1.
    pub fn new(num_workers: usize, max_attempts: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .thread_name(|index| format!("enrich-worker-{index}"))
            .build()?;
        Ok(Self {
            pool,
            max_attempts: max_attempts.max(1),
        })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Runs `work` over every unit in parallel.
    ///
    /// `work` receives the unit and the 1-based attempt number. Results come
    /// back in unit order. The first unit to exhaust its attempts is
    /// returned as the error.
    pub fn run<U, T, E, F>(&self, units: &[U], work: F) -> Result<Vec<Completed<T>>, Exhausted<U, E>>
    where
        U: Clone + Display + Sync + Send,
        T: Send,
        E: Display + Send,
        F: Fn(&U, usize) -> Result<T, E> + Sync,
    {
        self.pool.install(|| {
            units
                .par_iter()
                .map(|unit| self.run_unit(unit, &work))
                .collect()
        })
    }

    fn run_unit<U, T, E, F>(&self, unit: &U, work: &F) -> Result<Completed<T>, Exhausted<U, E>>
    where
        U: Clone + Display,
        E: Display,
        F: Fn(&U, usize) -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match work(unit, attempt) {
                Ok(value) => {
                    return Ok(Completed {
                        value,
                        attempts: attempt,
                    });
                }
                Err(error) if attempt >= self.max_attempts => {
                    return Err(Exhausted {
                        unit: unit.clone(),
                        attempts: attempt,
                        error,
                    });
                }
                Err(error) => {
                    warn!(
                        unit = %unit,
                        attempt,
                        max_attempts = self.max_attempts,
                        %error,
                        "unit of work failed; retrying"
                    );
                    attempt += 1;
                }
            }
        }
    }
}
