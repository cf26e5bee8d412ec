//! Compares the banded approximation against the exact distance on the same
//! random pairs, and searches for a bandwidth that is accurate enough.
use clap::Parser;
use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    cmp::{max, min},
    collections::BTreeMap,
};

use crate::{
    aligners::{
        band::{EditDistanceBandApprox, EditDistanceBandApproxLinSpace},
        lin_space::EditDistanceLinSpace,
        wf::EditDistanceWF,
        EditDistance,
    },
    cost_model::CostVector,
    edit_info::EditDistanceInfo,
    generate::PairSource,
    Cost, Sequence,
};

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[clap(next_help_heading = "Comparison")]
pub struct CompareArgs {
    /// Number of sampled pairs
    #[clap(short = 'k', long, default_value_t = 10)]
    pub samples: usize,

    /// Bandwidths to compare. Defaults to powers of two up to n/2. 0 is the
    /// exact baseline, which is always reported.
    #[clap(short = 'T', long, value_delimiter = ',')]
    pub bandwidths: Vec<usize>,

    /// Target relative error of a bandwidth search
    #[clap(long, default_value_t = 0.01)]
    pub precision: f64,

    /// First bandwidth tried by a bandwidth search
    #[clap(long, default_value_t = 1)]
    pub t_min: usize,
}

impl Default for CompareArgs {
    fn default() -> Self {
        Self {
            samples: 10,
            bandwidths: vec![],
            precision: 0.01,
            t_min: 1,
        }
    }
}

impl CompareArgs {
    pub fn bandwidths(&self, n: usize) -> Vec<usize> {
        if self.bandwidths.is_empty() {
            default_bandwidths(n)
        } else {
            self.bandwidths.iter().copied().filter(|&t| t > 0).collect()
        }
    }
}

/// `1, 2, 4, …` up to `n/2`.
pub fn default_bandwidths(n: usize) -> Vec<usize> {
    std::iter::successors(Some(1usize), |t| t.checked_mul(2))
        .take_while(|&t| t <= n / 2)
        .collect()
}

/// `(approx - exact) / exact`, with the denominator at least 1.
pub fn relative_error(approx: Cost, exact: Cost) -> f64 {
    (approx as f64 - exact as f64) / max(exact, 1) as f64
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandedResult {
    /// The sentinel when no alignment lies within the band.
    pub distance: Cost,
    /// `None` when no alignment lies within the band.
    pub info: Option<EditDistanceInfo>,
    /// Seconds.
    pub time: f64,
}

/// The exact and banded results of one pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmComparisonResult {
    pub exact: EditDistanceInfo,
    pub exact_distance: Cost,
    pub exact_time: f64,
    pub banded: BTreeMap<usize, BandedResult>,
}

/// For `k` pairs, backtrack the exact alignment and the banded alignment at
/// every bandwidth in `bandwidths`. Bandwidth 0 is skipped, since summaries
/// report the exact baseline as bandwidth 0.
pub fn compare_edit_distance_algorithms(
    source: &mut impl PairSource,
    k: usize,
    bandwidths: &[usize],
) -> Vec<AlgorithmComparisonResult> {
    let (n, m) = source.lengths();
    let mut exact = EditDistanceWF::unit(n, m);
    let mut band = EditDistanceBandApprox::unit(n, m, 0);
    (0..k)
        .map(|_| {
            let (a, b) = source.next_pair();

            let start = instant::Instant::now();
            let exact_distance = exact.calculate(a, b);
            let exact_info = exact.backtrack();
            let exact_time = start.elapsed().as_secs_f64();

            let banded = bandwidths
                .iter()
                .filter(|&&t| t > 0)
                .map(|&t| {
                    band.set_bandwidth(t);
                    let start = instant::Instant::now();
                    let distance = band.calculate(a, b);
                    let info = band.backtrack();
                    let time = start.elapsed().as_secs_f64();
                    (t, BandedResult { distance, info, time })
                })
                .collect();
            AlgorithmComparisonResult {
                exact: exact_info,
                exact_distance,
                exact_time,
                banded,
            }
        })
        .collect()
}

/// Averages over all pairs for one bandwidth. Bandwidth 0 with `exact` set is
/// the exact baseline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandwidthSummary {
    pub bandwidth: usize,
    pub exact: bool,
    pub samples: usize,
    /// Pairs without an alignment inside the band. They are left out of the
    /// averages below.
    pub unreachable: usize,
    pub mean_distance: f64,
    pub mean_sub: f64,
    pub mean_del: f64,
    pub mean_ins: f64,
    pub mean_relative_error: f64,
    pub mean_time: f64,
}

/// One pair's numbers for one bandwidth.
struct Row<'a> {
    distance: Cost,
    exact: Cost,
    info: &'a EditDistanceInfo,
    time: f64,
}

impl BandwidthSummary {
    fn new(bandwidth: usize, exact: bool, rows: &[Row], unreachable: usize) -> Self {
        let cnt = max(rows.len(), 1) as f64;
        let mean = |f: fn(&Row) -> f64| rows.iter().map(f).sum::<f64>() / cnt;
        Self {
            bandwidth,
            exact,
            samples: rows.len() + unreachable,
            unreachable,
            mean_distance: mean(|r| r.distance as f64),
            mean_sub: mean(|r| r.info.n_sub as f64),
            mean_del: mean(|r| r.info.n_del as f64),
            mean_ins: mean(|r| r.info.n_ins as f64),
            mean_relative_error: mean(|r| relative_error(r.distance, r.exact)),
            mean_time: mean(|r| r.time),
        }
    }
}

/// One summary row for the exact baseline, then one per bandwidth.
pub fn summarize(results: &[AlgorithmComparisonResult]) -> Vec<BandwidthSummary> {
    let exact_rows = results
        .iter()
        .map(|r| Row {
            distance: r.exact_distance,
            exact: r.exact_distance,
            info: &r.exact,
            time: r.exact_time,
        })
        .collect_vec();
    let mut summaries = vec![BandwidthSummary::new(0, true, &exact_rows, 0)];

    let bandwidths = results
        .iter()
        .flat_map(|r| r.banded.keys().copied())
        .sorted()
        .dedup()
        .collect_vec();
    for t in bandwidths {
        let mut unreachable = 0;
        let mut rows = vec![];
        for r in results {
            match r.banded.get(&t) {
                Some(BandedResult {
                    distance,
                    info: Some(info),
                    time,
                }) => rows.push(Row {
                    distance: *distance,
                    exact: r.exact_distance,
                    info,
                    time: *time,
                }),
                Some(_) => unreachable += 1,
                None => {}
            }
        }
        summaries.push(BandwidthSummary::new(t, false, &rows, unreachable));
    }
    summaries
}

fn draw_pairs(source: &mut impl PairSource, k: usize) -> Vec<(Sequence, Sequence)> {
    (0..k)
        .map(|_| {
            let (a, b) = source.next_pair();
            (a.to_vec(), b.to_vec())
        })
        .collect()
}

fn next_bandwidth(t: usize, limit: usize) -> usize {
    min(max(2 * t, 1), limit)
}

/// The first bandwidth, doubling from `t_min`, at which the mean relative
/// error against the exact distance over `k` pairs is below `precision`.
///
/// Never exceeds `max(n, m)`, where the band covers the whole matrix.
pub fn optimal_bandwidth_exact(source: &mut impl PairSource, precision: f64, k: usize, t_min: usize) -> usize {
    assert!(k >= 1, "At least one sample is needed.");
    let (n, m) = source.lengths();
    let limit = max(n, m);
    let pairs = draw_pairs(source, k);
    let mut exact = EditDistanceLinSpace::unit();
    let exact_distances = pairs.iter().map(|(a, b)| exact.calculate(a, b)).collect_vec();

    let mut band = EditDistanceBandApproxLinSpace::new(limit, limit, 0, CostVector::unit());
    let mut t = min(t_min, limit);
    loop {
        let error = pairs
            .iter()
            .zip(&exact_distances)
            .map(|((a, b), &d)| relative_error(band.calculate_with_band(a, b, t), d))
            .sum::<f64>()
            / k as f64;
        debug!("Bandwidth {t}: mean relative error {error:.5}");
        if error < precision || t >= limit {
            info!("Optimal bandwidth {t} with mean relative error {error:.5}");
            return t;
        }
        t = next_bandwidth(t, limit);
    }
}

/// Doubles `t` from `t_min` until the mean relative improvement of bandwidth
/// `2t` over bandwidth `t` on `k` pairs is below `precision`, and returns `t`.
///
/// Needs no exact distances. While the end of the matrix is outside the wider
/// band the search continues.
pub fn optimal_bandwidth(source: &mut impl PairSource, precision: f64, k: usize, t_min: usize) -> usize {
    assert!(k >= 1, "At least one sample is needed.");
    let (n, m) = source.lengths();
    let limit = max(n, m);
    let pairs = draw_pairs(source, k);
    let mut band = EditDistanceBandApproxLinSpace::new(limit, limit, 0, CostVector::unit());
    let mut t = min(t_min, limit);
    loop {
        if t >= limit {
            return t;
        }
        let wider = next_bandwidth(t, limit);
        let mut improvement = 0.;
        for (a, b) in &pairs {
            let narrow = band.calculate_with_band(a, b, t);
            let wide = band.calculate_with_band(a, b, wider);
            if band.is_unreachable(wide) {
                improvement = f64::INFINITY;
                break;
            }
            improvement += relative_error(narrow, wide);
        }
        improvement /= k as f64;
        debug!("Bandwidth {t} vs {wider}: mean relative improvement {improvement:.5}");
        if improvement < precision {
            info!("Optimal bandwidth {t}");
            return t;
        }
        t = wider;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::IidPairGenerator;
    use bio::alphabets::Alphabet;

    fn gen(n: usize, m: usize) -> IidPairGenerator {
        IidPairGenerator::new(n, m, &Alphabet::new(b"ACGT"), 2024)
    }

    #[test]
    fn bandwidth_defaults() {
        assert_eq!(default_bandwidths(16), vec![1, 2, 4, 8]);
        assert_eq!(default_bandwidths(10), vec![1, 2, 4]);
        assert!(default_bandwidths(1).is_empty());
    }

    #[test]
    fn banded_never_below_exact() {
        let results = compare_edit_distance_algorithms(&mut gen(32, 32), 5, &default_bandwidths(32));
        assert_eq!(results.len(), 5);
        for r in &results {
            assert_eq!(r.exact.distance(), r.exact_distance as usize);
            let mut last = Cost::MAX;
            for b in r.banded.values() {
                assert!(b.distance >= r.exact_distance);
                assert!(b.distance <= last);
                last = b.distance;
                let info = b.info.as_ref().unwrap();
                assert_eq!(info.distance(), b.distance as usize);
            }
        }
        let summary = summarize(&results);
        assert_eq!(summary.len(), 1 + 5);
        assert!(summary[0].exact);
        assert_eq!(summary[0].mean_relative_error, 0.);
        assert!(summary.iter().all(|s| s.mean_relative_error >= 0.));
    }

    #[test]
    fn unreachable_band_is_counted() {
        let results = compare_edit_distance_algorithms(&mut gen(20, 10), 3, &[2, 20]);
        let summary = summarize(&results);
        assert_eq!(summary[1].bandwidth, 2);
        assert_eq!(summary[1].unreachable, 3);
        assert_eq!(summary[2].unreachable, 0);
        assert_eq!(summary[2].mean_relative_error, 0.);
    }

    #[test]
    fn zero_bandwidth_is_the_exact_row() {
        let args = CompareArgs {
            bandwidths: vec![0, 2],
            ..CompareArgs::default()
        };
        assert_eq!(args.bandwidths(20), vec![2]);
        let results = compare_edit_distance_algorithms(&mut gen(20, 20), 3, &[0, 2]);
        assert!(results.iter().all(|r| r.banded.keys().eq([&2])));
        let summary = summarize(&results);
        assert_eq!(summary.iter().map(|s| (s.bandwidth, s.exact)).collect_vec(), vec![(0, true), (2, false)]);
    }

    #[test]
    fn exact_search_reaches_precision() {
        let t = optimal_bandwidth_exact(&mut gen(40, 40), 1e-9, 5, 1);
        assert!(t <= 40);
        // Searching from the answer stops immediately.
        assert_eq!(optimal_bandwidth_exact(&mut gen(40, 40), 1e-9, 5, t), t);
        // A band covering everything is always accurate.
        assert_eq!(optimal_bandwidth_exact(&mut gen(10, 10), 1e-9, 3, 100), 10);
    }

    #[test]
    fn search_skips_unreachable_bands() {
        // |n - m| = 12, so bandwidths below 12 cannot reach the end.
        let t = optimal_bandwidth(&mut gen(30, 18), 0.01, 4, 1);
        assert!(t >= 12);
        let t = optimal_bandwidth_exact(&mut gen(30, 18), 0.01, 4, 1);
        assert!(t >= 12);
    }
}
