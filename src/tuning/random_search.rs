//! Seeded random hyperparameter search over continuous ranges.

use crate::tuning::cv::TuningError;
use log::debug;
use nanorand::{Rng, WyRand};

/// A continuous parameter range to sample from, linearly or log-uniformly.
#[derive(Debug, Clone)]
pub struct ParamRange {
    pub name: String,
    pub low: f64,
    pub high: f64,
    pub log_scale: bool,
}

impl ParamRange {
    /// Uniform sampling over [low, high].
    pub fn linear(name: impl Into<String>, low: f64, high: f64) -> Result<Self, TuningError> {
        if !(low < high) {
            return Err(TuningError::InvalidRange { low, high });
        }
        Ok(Self {
            name: name.into(),
            low,
            high,
            log_scale: false,
        })
    }

    /// Log-uniform sampling over [low, high]. Bounds must be positive.
    pub fn log(name: impl Into<String>, low: f64, high: f64) -> Result<Self, TuningError> {
        if !(low < high) {
            return Err(TuningError::InvalidRange { low, high });
        }
        if low <= 0.0 {
            return Err(TuningError::NonPositiveLogRange { low, high });
        }
        Ok(Self {
            name: name.into(),
            low,
            high,
            log_scale: true,
        })
    }

    fn sample(&self, rng: &mut WyRand) -> f64 {
        let u = rng.generate::<f64>();
        if self.log_scale {
            let (lo, hi) = (self.low.ln(), self.high.ln());
            (lo + u * (hi - lo)).exp()
        } else {
            self.low + u * (self.high - self.low)
        }
    }
}

/// One evaluated parameter set. The objective is minimized.
#[derive(Debug, Clone)]
pub struct Trial {
    pub index: usize,
    /// Sampled values, in range-declaration order.
    pub params: Vec<f64>,
    pub objective: f64,
}

/// Outcome of a [`RandomSearch`] run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Every evaluated trial, in run order.
    pub trials: Vec<Trial>,
    /// The trial with the lowest objective. Ties keep the earliest trial.
    pub best: Trial,
}

/// Random scan over parameter ranges driving an arbitrary objective,
/// typically the CV RMSE of a model built from the sampled values.
///
/// ```no_run
/// use stepreg::tuning::{ParamRange, RandomSearch, TuningError};
/// # fn demo() -> Result<(), TuningError> {
/// let search = RandomSearch::new(
///     vec![ParamRange::log("lambda", 1e-4, 1e2)?],
///     50,
/// )
/// .seed(42);
/// let outcome = search.run(|params| Ok(params[0].powi(2)))?;
/// println!("best lambda: {}", outcome.best.params[0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RandomSearch {
    ranges: Vec<ParamRange>,
    n_trials: usize,
    seed: Option<u64>,
}

impl RandomSearch {
    /// Create a search sampling `n_trials` points from the given ranges.
    pub fn new(ranges: Vec<ParamRange>, n_trials: usize) -> Self {
        Self {
            ranges,
            n_trials,
            seed: None,
        }
    }

    /// Fix the random seed for reproducible sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Evaluate the objective on every sampled point. Objective failures
    /// abort the search.
    pub fn run<F>(&self, mut objective: F) -> Result<SearchOutcome, TuningError>
    where
        F: FnMut(&[f64]) -> Result<f64, TuningError>,
    {
        if self.n_trials == 0 {
            return Err(TuningError::NoTrials);
        }
        if self.ranges.is_empty() {
            return Err(TuningError::EmptyGrid);
        }

        let mut rng = match self.seed {
            Some(seed) => WyRand::new_seed(seed),
            None => WyRand::new(),
        };

        let mut trials = Vec::with_capacity(self.n_trials);
        let mut best: Option<Trial> = None;

        for index in 0..self.n_trials {
            let params: Vec<f64> = self.ranges.iter().map(|r| r.sample(&mut rng)).collect();
            let value = objective(&params)?;
            debug!("trial {}: params = {:?}, objective = {:.6}", index, params, value);

            let trial = Trial {
                index,
                params,
                objective: value,
            };
            let improves = match &best {
                None => true,
                Some(b) => value < b.objective,
            };
            if improves {
                best = Some(trial.clone());
            }
            trials.push(trial);
        }

        // n_trials >= 1, so a best trial exists.
        let best = best.ok_or(TuningError::NoTrials)?;
        Ok(SearchOutcome { trials, best })
    }
}
