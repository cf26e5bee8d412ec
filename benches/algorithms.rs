use criterion::{criterion_group, criterion_main, Criterion};
use edit_estimator::{generate::random_sequence, prelude::*};
use instant::Duration;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench(c: &mut Criterion) {
    let alphabet = bio::alphabets::Alphabet::new(b"ACGT");
    let rng = &mut ChaCha8Rng::seed_from_u64(0);
    for n in [100, 1000, 4000] {
        let c = &mut c.benchmark_group(&format!("{}", n));
        let a = &random_sequence(n, &alphabet, rng);
        let b = &random_sequence(n, &alphabet, rng);
        let mut test = |name: &str, alg: &mut dyn EditDistance| {
            c.bench_function(name, |bb| bb.iter(|| alg.calculate(a, b)));
        };
        test("wf", &mut EditDistanceWF::unit(n, n));
        test("linear", &mut EditDistanceLinSpace::unit());
        test("linear_info", &mut EditDistanceInfoLinSpace::unit());
        for t in [8, n / 8] {
            test(&format!("band_{t}"), &mut EditDistanceBandApproxLinSpace::unit(n, n, t));
        }
    }
}

criterion_group!(
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_millis(500)).warm_up_time(Duration::from_millis(100));
    targets = bench
);
criterion_main!(benches);
