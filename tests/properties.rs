use edit_estimator::{generate::random_sequence, prelude::*, seq_to_string};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn pairs() -> impl Iterator<Item = (Sequence, Sequence)> {
    let alphabet = bio::alphabets::Alphabet::new(b"ACGT");
    let mut rng = ChaCha8Rng::seed_from_u64(31415);
    let mut out = vec![];
    for n in [0, 1, 2, 5, 13, 40, 100] {
        for m in [0, 1, 3, 13, 40, 101] {
            for _ in 0..3 {
                out.push((
                    random_sequence(n, &alphabet, &mut rng),
                    random_sequence(m, &alphabet, &mut rng),
                ));
            }
        }
    }
    out.into_iter()
}

#[test]
fn exact_matches_reference() {
    let mut wf = EditDistanceWF::unit(0, 0);
    let mut lin = EditDistanceLinSpace::unit();
    let mut info = EditDistanceInfoLinSpace::unit();
    for (a, b) in pairs() {
        let reference = triple_accel::levenshtein_exp(&a, &b);
        assert_eq!(bio::alignment::distance::levenshtein(&a, &b), reference);
        assert_eq!(wf.calculate(&a, &b), reference, "{}\n{}", seq_to_string(&a), seq_to_string(&b));
        assert_eq!(lin.calculate(&a, &b), reference);
        assert_eq!(info.calculate(&a, &b), reference);
    }
}

#[test]
fn identity() {
    let mut wf = EditDistanceWF::unit(0, 0);
    for (a, _) in pairs() {
        assert_eq!(wf.calculate(&a, &a), 0);
        let info = wf.backtrack();
        assert_eq!(info.edit_script.len(), a.len());
        assert!(info.edit_script.iter().all(|op| op == EditOp::Match));
    }
}

#[test]
fn triangle_inequality() {
    let mut lin = EditDistanceLinSpace::unit();
    let seqs = pairs().flat_map(|(a, b)| [a, b]).take(30).collect::<Vec<_>>();
    for s1 in &seqs {
        for s2 in &seqs {
            for s3 in &seqs {
                let d13 = lin.calculate(s1, s3);
                let d12 = lin.calculate(s1, s2);
                let d23 = lin.calculate(s2, s3);
                assert!(d13 <= d12 + d23);
            }
        }
    }
}

#[test]
fn full_equals_linear_with_costs() {
    for cm in [CostVector::unit(), CostVector::new(2, 1, 3), CostVector::linear(3, 1)] {
        let mut wf = EditDistanceWF::new(0, 0, cm);
        let mut lin = EditDistanceLinSpace::new(cm);
        let mut info = EditDistanceInfoLinSpace::new(cm);
        for (a, b) in pairs() {
            let d = wf.calculate(&a, &b);
            assert_eq!(lin.calculate(&a, &b), d);
            assert_eq!(info.calculate(&a, &b), d);
        }
    }
}

#[test]
fn counts_equal_distance() {
    let mut wf = EditDistanceWF::unit(0, 0);
    let mut info = EditDistanceInfoLinSpace::unit();
    for (a, b) in pairs() {
        let d = wf.calculate(&a, &b) as usize;
        let x = wf.backtrack();
        assert_eq!(x.n_sub + x.n_del + x.n_ins, d);
        assert!(x.edit_script.is_valid_for(&a, &b));
        assert_eq!(x, EditDistanceInfo::from_script(x.edit_script.clone()));
        assert_eq!(info.calculate_info(&a, &b).distance(), d);
    }
}

#[test]
fn wide_band_is_exact() {
    let mut lin = EditDistanceLinSpace::unit();
    for (a, b) in pairs() {
        let t = a.len().max(b.len());
        let exact = lin.calculate(&a, &b);
        let mut band = EditDistanceBandApproxLinSpace::unit(a.len(), b.len(), t);
        assert_eq!(band.calculate(&a, &b), exact);
        let mut full = EditDistanceBandApprox::unit(a.len(), b.len(), t);
        assert_eq!(full.calculate(&a, &b), exact);
        assert_eq!(full.backtrack().unwrap().distance(), exact as usize);
    }
}

#[test]
fn band_is_monotone() {
    let mut lin = EditDistanceLinSpace::unit();
    for (a, b) in pairs() {
        let exact = lin.calculate(&a, &b);
        let l = a.len().max(b.len());
        let mut band = EditDistanceBandApproxLinSpace::unit(l, l, 0);
        let mut full = EditDistanceBandApprox::unit(l, l, 0);
        let mut last = Cost::MAX;
        let mut t = 0;
        loop {
            let d = band.calculate_with_band(&a, &b, t);
            full.set_bandwidth(t);
            assert_eq!(full.calculate(&a, &b), d, "T = {t}");
            assert!(d <= last);
            assert!(d >= exact);
            if !band.is_unreachable(d) {
                let info = full.backtrack().unwrap();
                assert_eq!(info.distance(), d as usize);
                assert!(info.edit_script.is_valid_for(&a, &b));
                assert!(info.edit_script.path().all(|(i, j)| i.abs_diff(j) <= t));
            }
            last = d;
            if t >= l {
                break;
            }
            // Bands beyond the capacity `(l, l)` would be rejected.
            t = (2 * t).max(1).min(l);
        }
        assert_eq!(last, exact);
    }
}
