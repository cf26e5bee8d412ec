//! Fixed-size sampling of distances and operation counts, and the
//! distributions derived from them.
use bio::alphabets::Alphabet;
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    aligners::{info_lin_space::EditDistanceInfoLinSpace, lin_space::EditDistanceLinSpace, wf::EditDistanceWF, EditDistance},
    edit_info::EditDistanceInfo,
    estimate::{estimates_from_samples, SampleEstimates},
    generate::{alphabet_symbols, FixedStringGenerator, PairSource},
    grid::Grid,
    traceback::accumulate_path,
    Cost, Sequence,
};

/// `k` distances of fresh pairs computed by `alg`.
pub fn sample_distances(source: &mut impl PairSource, alg: &mut impl EditDistance, k: usize) -> Vec<Cost> {
    (0..k)
        .map(|_| {
            let (a, b) = source.next_pair();
            alg.calculate(a, b)
        })
        .collect()
}

/// `k` backtracked infos, computed on the full matrix.
pub fn sample_infos(source: &mut impl PairSource, k: usize) -> Vec<EditDistanceInfo> {
    let (n, m) = source.lengths();
    let mut wf = EditDistanceWF::unit(n, m);
    (0..k)
        .map(|_| {
            let (a, b) = source.next_pair();
            wf.calculate_info(a, b)
        })
        .collect()
}

/// `k` infos computed in linear space. When given, every computed cell is
/// added to `acc`, which must have at least `(n+1) × (m+1)` cells.
pub fn sample_infos_lin_space(
    source: &mut impl PairSource,
    k: usize,
    mut acc: Option<&mut Grid<EditDistanceInfo>>,
) -> Vec<EditDistanceInfo> {
    let mut alg = EditDistanceInfoLinSpace::unit();
    (0..k)
        .map(|_| {
            let (a, b) = source.next_pair();
            match acc.as_deref_mut() {
                Some(acc) => alg.calculate_accumulate(a, b, acc),
                None => alg.calculate_info(a, b),
            }
        })
        .collect()
}

/// Estimates of the number of substitutions, deletions and insertions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationEstimates {
    pub sub: SampleEstimates,
    pub del: SampleEstimates,
    pub ins: SampleEstimates,
}

pub fn operation_estimates(infos: &[EditDistanceInfo]) -> OperationEstimates {
    let column = |f: fn(&EditDistanceInfo) -> usize| infos.iter().map(f).collect_vec();
    OperationEstimates {
        sub: estimates_from_samples(&column(|x| x.n_sub)),
        del: estimates_from_samples(&column(|x| x.n_del)),
        ins: estimates_from_samples(&column(|x| x.n_ins)),
    }
}

/// Normalized histogram of `samples` over `0..=max`.
///
/// Samples above `max` are not counted, but still weigh in the normalization.
pub fn distance_distribution(samples: &[Cost], max: usize) -> Vec<f64> {
    let mut pdf = vec![0.; max + 1];
    if samples.is_empty() {
        return pdf;
    }
    let mut dropped = 0;
    for &d in samples {
        match pdf.get_mut(d as usize) {
            Some(p) => *p += 1.,
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!("{dropped} samples exceed the maximum distance {max}");
    }
    let total = samples.len() as f64;
    pdf.iter_mut().for_each(|p| *p /= total);
    pdf
}

/// Adds to `freq[(i, j)]` the number of backtracked paths through `(i, j)`
/// over `k` samples. When `scripts` is given, the scripts are appended to it.
pub fn script_distribution_matrix(
    source: &mut impl PairSource,
    k: usize,
    freq: &mut Grid<u64>,
    mut scripts: Option<&mut Vec<String>>,
) {
    let (n, m) = source.lengths();
    assert!(
        freq.rows() > n && freq.cols() > m,
        "Frequency matrix {}x{} is too small for {}x{}",
        freq.rows(),
        freq.cols(),
        n + 1,
        m + 1
    );
    let mut wf = EditDistanceWF::unit(n, m);
    for _ in 0..k {
        let (a, b) = source.next_pair();
        let info = wf.calculate_info(a, b);
        accumulate_path(&info.edit_script, freq);
        if let Some(scripts) = scripts.as_deref_mut() {
            scripts.push(info.edit_script.to_string());
        }
    }
}

/// All `σ^n` sequences of length `n`, in lexicographic order of `symbols`.
fn all_sequences(n: usize, symbols: &[u8]) -> Vec<Sequence> {
    let mut out = vec![Sequence::new()];
    for _ in 0..n {
        out = out
            .into_iter()
            .cartesian_product(symbols.iter())
            .map(|(mut s, &c)| {
                s.push(c);
                s
            })
            .collect();
    }
    out
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExhaustiveResult {
    pub n: usize,
    pub pairs: usize,
    pub mean: f64,
    /// `distribution[d]` is the fraction of pairs at distance `d`.
    pub distribution: Vec<f64>,
}

/// The exact mean unit cost distance over all pairs of length `n` sequences.
///
/// Enumerates `σ^(2n)` pairs, so only feasible for small `n`.
pub fn exhaustive_average(n: usize, alphabet: &Alphabet) -> ExhaustiveResult {
    let symbols = alphabet_symbols(alphabet);
    let pairs = symbols
        .len()
        .checked_pow(2 * n as u32)
        .unwrap_or_else(|| panic!("Too many pairs for n = {n}"));
    debug!("Enumerating {pairs} pairs of length {n}");
    let seqs = all_sequences(n, &symbols);
    let mut alg = EditDistanceLinSpace::unit();
    let mut counts = vec![0usize; n + 1];
    let mut total = 0u64;
    for a in &seqs {
        for b in &seqs {
            let d = alg.calculate(a, b);
            counts[d as usize] += 1;
            total += d as u64;
        }
    }
    ExhaustiveResult {
        n,
        pairs,
        mean: total as f64 / pairs as f64,
        distribution: counts.iter().map(|&c| c as f64 / pairs as f64).collect(),
    }
}

/// `k` distances between random length `n` sequences and `fixed`.
pub fn fixed_string_samples(n: usize, k: usize, fixed: Sequence, alphabet: &Alphabet, seed: u64) -> Vec<Cost> {
    let mut source = FixedStringGenerator::new(n, fixed, alphabet, seed);
    sample_distances(&mut source, &mut EditDistanceLinSpace::unit(), k)
}
