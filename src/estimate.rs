//! Sequential estimation of the expected distance of random pairs.
//!
//! Pairs are sampled one by one until the running estimate is precise enough,
//! or until `k_max` samples were taken. Once started the loops never fail:
//! callers judge the quality of an estimate from its `sample_size` and
//! `sample_variance`. An algorithm that cannot reach the end of the sampled
//! pairs is rejected up front.
use clap::{Parser, ValueEnum};
use derive_more::AddAssign;
use log::{debug, trace};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::{aligners::EditDistance, generate::PairSource};

/// Mean and unbiased variance of a sample, fixed once sampling stopped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleEstimates {
    pub sample_size: usize,
    pub sample_mean: f64,
    pub sample_variance: f64,
}

impl SampleEstimates {
    /// Standard error of the mean.
    pub fn standard_error(&self) -> f64 {
        (self.sample_variance / self.sample_size as f64).sqrt()
    }
}

/// Count, sum and sum of squares of the samples seen so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, AddAssign)]
pub struct RunningStats {
    pub count: usize,
    pub sum: f64,
    pub sum_sq: f64,
}

impl RunningStats {
    pub fn push(&mut self, x: f64) {
        *self += RunningStats {
            count: 1,
            sum: x,
            sum_sq: x * x,
        };
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.;
        }
        self.sum / self.count as f64
    }

    /// Unbiased variance; 0 for fewer than two samples.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            return 0.;
        }
        let n = self.count as f64;
        ((self.sum_sq - self.sum * self.sum / n) / (n - 1.)).max(0.)
    }

    pub fn estimates(&self) -> SampleEstimates {
        assert!(self.count >= 1, "No samples were taken.");
        SampleEstimates {
            sample_size: self.count,
            sample_mean: self.mean(),
            sample_variance: self.variance(),
        }
    }
}

/// Mean and variance of a non-empty sample of any numeric type.
pub fn estimates_from_samples<T: AsPrimitive<f64>>(samples: &[T]) -> SampleEstimates {
    let mut stats = RunningStats::default();
    for x in samples {
        stats.push(x.as_());
    }
    stats.estimates()
}

/// When `relative_error_estimates` stops.
#[derive(ValueEnum, Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelStoppingRule {
    /// Stop once the confidence interval of the mean lies within
    /// `precision·e_model` of the model.
    #[default]
    Converged,
    /// Keep sampling while `|mean - e_model| < z·se`. The threshold shrinks
    /// with the standard error, so this stops once the mean is
    /// significantly away from the model. `precision` is not used. Kept for
    /// reproducing older estimates.
    AsCoded,
}

impl ModelStoppingRule {
    /// Whether sampling stops at `est`, with `e_model` the model value.
    pub fn stops(self, est: &SampleEstimates, e_model: f64, precision: f64, z: f64) -> bool {
        let d = (est.sample_mean - e_model).abs();
        let se = est.standard_error();
        match self {
            ModelStoppingRule::Converged => d + z * se < precision * e_model,
            ModelStoppingRule::AsCoded => d >= z * se,
        }
    }
}

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[clap(next_help_heading = "Estimator")]
pub struct EstimatorParams {
    /// Minimal number of samples before the stopping rule is checked
    #[clap(long, default_value_t = 16)]
    pub k_min: usize,

    /// Hard cap on the number of samples
    #[clap(long, default_value_t = 10000)]
    pub k_max: usize,

    /// Target precision.
    ///
    /// Absolute half-width of the confidence interval for the error bounded
    /// estimator, a fraction of the model value for the relative one, and a
    /// fraction of the difference of the two means for the difference
    /// bounded one.
    #[clap(long, default_value_t = 0.5)]
    pub precision: f64,

    /// Critical value of the confidence interval
    #[clap(short, long, default_value_t = 1.96)]
    pub z: f64,

    /// Stopping rule used when estimating against a model value
    #[clap(long, value_enum, default_value_t, hide_short_help = true)]
    pub rule: ModelStoppingRule,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            k_min: 16,
            k_max: 10000,
            precision: 0.5,
            z: 1.96,
            rule: ModelStoppingRule::default(),
        }
    }
}

impl EstimatorParams {
    fn check(&self) {
        assert!(self.k_min >= 1, "k_min must be at least 1.");
        assert!(self.k_max >= 1, "k_max must be at least 1.");
        assert!(self.precision > 0., "precision must be positive.");
    }
}

/// Panics when `alg` can not align pairs of the lengths `source` draws, since
/// every sample would be a sentinel instead of a distance.
fn check_reaches(source: &impl PairSource, alg: &impl EditDistance) {
    let (n, m) = source.lengths();
    assert!(
        alg.reaches(n, m),
        "{} can not align sequences of length {n} and {m}.",
        alg.name()
    );
}

fn sample_once(
    source: &mut impl PairSource,
    alg: &mut impl EditDistance,
    stats: &mut RunningStats,
) {
    let (a, b) = source.next_pair();
    let d = alg.calculate(a, b);
    trace!("Sample {}: {d}", stats.count + 1);
    stats.push(d as f64);
}

/// Sample until `count > k_min` and `variance·z² < count·precision²`, i.e. the
/// confidence interval of the mean has half-width below `precision`, or until
/// `k_max` samples.
pub fn error_bounded_estimates(
    source: &mut impl PairSource,
    alg: &mut impl EditDistance,
    params: &EstimatorParams,
) -> SampleEstimates {
    params.check();
    check_reaches(&*source, &*alg);
    let EstimatorParams {
        k_min,
        k_max,
        precision,
        z,
        ..
    } = *params;
    let mut stats = RunningStats::default();
    loop {
        sample_once(source, alg, &mut stats);
        if stats.count >= k_max {
            break;
        }
        if stats.count > k_min
            && stats.variance() * z * z < stats.count as f64 * precision * precision
        {
            break;
        }
    }
    let est = stats.estimates();
    debug!(
        "{}: stopped after {} samples, mean {:.3} variance {:.3}",
        alg.name(),
        est.sample_size,
        est.sample_mean,
        est.sample_variance
    );
    est
}

/// Sample until the running mean is judged against `e_model` by `params.rule`,
/// testing only once `count >= k_min`, or until `k_max` samples.
pub fn relative_error_estimates(
    source: &mut impl PairSource,
    alg: &mut impl EditDistance,
    e_model: f64,
    params: &EstimatorParams,
) -> SampleEstimates {
    params.check();
    check_reaches(&*source, &*alg);
    let EstimatorParams {
        k_min,
        k_max,
        precision,
        z,
        rule,
    } = *params;
    let mut stats = RunningStats::default();
    loop {
        sample_once(source, alg, &mut stats);
        if stats.count >= k_max {
            break;
        }
        if stats.count >= k_min && rule.stops(&stats.estimates(), e_model, precision, z) {
            break;
        }
    }
    let est = stats.estimates();
    debug!(
        "{} vs model {e_model}: stopped after {} samples ({rule:?}), mean {:.3}",
        alg.name(),
        est.sample_size,
        est.sample_mean
    );
    est
}

/// Joint estimates at two lengths, usually `n/2` and `n`, drawing one pair
/// from each source per round.
///
/// Stops when `count > k_min` and the confidence interval of
/// `mean(full) - mean(half)` has half-width below `precision` times that
/// difference, or after `k_max` rounds. A difference that is not positive
/// never satisfies the bound.
pub fn difference_bounded_estimates(
    half: &mut impl PairSource,
    full: &mut impl PairSource,
    alg: &mut impl EditDistance,
    params: &EstimatorParams,
) -> [SampleEstimates; 2] {
    params.check();
    check_reaches(&*half, &*alg);
    check_reaches(&*full, &*alg);
    let EstimatorParams {
        k_min,
        k_max,
        precision,
        z,
        ..
    } = *params;
    let mut stats = [RunningStats::default(); 2];
    loop {
        sample_once(half, alg, &mut stats[0]);
        sample_once(full, alg, &mut stats[1]);
        let count = stats[1].count;
        if count >= k_max {
            break;
        }
        if count > k_min {
            let diff = stats[1].mean() - stats[0].mean();
            let var = (stats[0].variance() + stats[1].variance()) / count as f64;
            if diff > 0. && var * z * z < (precision * diff).powi(2) {
                break;
            }
        }
    }
    let est = stats.map(|s| s.estimates());
    debug!(
        "{}: difference stopped after {} rounds, means {:.3} and {:.3}",
        alg.name(),
        est[1].sample_size,
        est[0].sample_mean,
        est[1].sample_mean
    );
    est
}
