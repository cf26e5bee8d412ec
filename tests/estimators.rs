use bio::alphabets::Alphabet;
use edit_estimator::{
    compare::{compare_edit_distance_algorithms, default_bandwidths, summarize},
    estimate::{error_bounded_estimates, relative_error_estimates},
    prelude::*,
    sampling::{exhaustive_average, sample_distances},
};

fn dna() -> Alphabet {
    Alphabet::new(b"ACGT")
}

#[test]
fn estimate_matches_exhaustive_mean() {
    let exhaustive = exhaustive_average(3, &dna());
    assert_eq!(exhaustive.distribution.len(), 4);
    assert!((exhaustive.distribution.iter().sum::<f64>() - 1.).abs() < 1e-9);

    let params = EstimatorParams {
        k_min: 16,
        k_max: 2000,
        precision: 0.5,
        ..EstimatorParams::default()
    };
    let mut gen = IidPairGenerator::new(3, 3, &dna(), 1);
    let est = relative_error_estimates(&mut gen, &mut EditDistanceLinSpace::unit(), exhaustive.mean, &params);
    assert!(est.sample_size < params.k_max);
    assert!((est.sample_mean - exhaustive.mean).abs() < 0.5 * exhaustive.mean);
}

#[test]
fn banded_estimate_is_not_below_exact() {
    let params = EstimatorParams {
        k_min: 16,
        k_max: 200,
        precision: 0.5,
        ..EstimatorParams::default()
    };
    let exact = error_bounded_estimates(
        &mut IidPairGenerator::new(50, 50, &dna(), 9),
        &mut EditDistanceLinSpace::unit(),
        &params,
    );
    let mut band = EditDistanceBandApproxLinSpace::unit(50, 50, 2);
    let banded = error_bounded_estimates(&mut IidPairGenerator::new(50, 50, &dna(), 9), &mut band, &params);
    assert!(exact.sample_size <= params.k_max);
    // Same pairs for the common prefix of the samples.
    let k = exact.sample_size.min(banded.sample_size);
    let d_exact = sample_distances(&mut IidPairGenerator::new(50, 50, &dna(), 9), &mut EditDistanceLinSpace::unit(), k);
    let d_band = sample_distances(&mut IidPairGenerator::new(50, 50, &dna(), 9), &mut band, k);
    for (e, b) in d_exact.iter().zip(&d_band) {
        assert!(b >= e);
    }
}

#[test]
fn comparison_summary() {
    let mut gen = IidPairGenerator::new(24, 24, &dna(), 3);
    let results = compare_edit_distance_algorithms(&mut gen, 4, &default_bandwidths(24));
    let summary = summarize(&results);
    assert_eq!(summary.iter().map(|s| s.bandwidth).collect::<Vec<_>>(), vec![0, 1, 2, 4, 8]);
    for w in summary[1..].windows(2) {
        assert!(w[0].mean_distance >= w[1].mean_distance);
    }
    assert!(summary.iter().all(|s| s.samples == 4 && s.unreachable == 0));
}
