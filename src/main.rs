use edit_estimator::{
    aligners::EditDistance,
    cli::{Cli, Command},
    compare::{compare_edit_distance_algorithms, optimal_bandwidth, optimal_bandwidth_exact, summarize},
    estimate::{
        difference_bounded_estimates, error_bounded_estimates, estimates_from_samples, relative_error_estimates,
        SampleEstimates,
    },
    generate::{GenerateArgs, IidPairGenerator},
    grid::Grid,
    sampling::{
        distance_distribution, exhaustive_average, operation_estimates, sample_distances, sample_infos,
        script_distribution_matrix, OperationEstimates,
    },
    Cost,
};

use bio::alphabets::Alphabet;
use clap::Parser;
use log::{error, info};
use serde::Serialize;

#[derive(Serialize)]
struct SampleOutput {
    algorithm: String,
    seed: u64,
    distances: Vec<Cost>,
    estimates: Option<SampleEstimates>,
    distribution: Vec<f64>,
    operations: Option<OperationEstimates>,
    density: Option<Vec<Vec<u64>>>,
}

#[derive(Serialize)]
struct EstimateOutput {
    algorithm: String,
    seed: u64,
    model: Option<f64>,
    estimates: SampleEstimates,
}

#[derive(Serialize)]
struct DifferenceOutput {
    algorithm: String,
    seed: u64,
    lengths: [(usize, usize); 2],
    estimates: [SampleEstimates; 2],
}

#[derive(Serialize)]
struct BandwidthOutput {
    seed: u64,
    exact: bool,
    bandwidth: usize,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match out {
        Ok(s) => println!("{s}"),
        Err(e) => {
            error!("Could not serialize the output: {e}");
            std::process::exit(1);
        }
    }
}

/// Exits when `alg` only returns sentinels for one of `lengths`.
fn check_reaches(alg: &dyn EditDistance, lengths: &[(usize, usize)]) {
    for &(n, m) in lengths {
        if !alg.reaches(n, m) {
            error!(
                "{} can not align sequences of length {n} and {m}; use a bandwidth of at least {}",
                alg.name(),
                n.abs_diff(m)
            );
            std::process::exit(1);
        }
    }
}

/// A generator per call, all producing the same pairs.
fn generators(generate: &GenerateArgs) -> (u64, impl Fn() -> IidPairGenerator) {
    let seed = generate.seed();
    let (n, m) = generate.lengths();
    let alphabet: Alphabet = generate.alphabet();
    (seed, move || IidPairGenerator::new(n, m, &alphabet, seed))
}

fn main() {
    env_logger::init();
    let Cli { command, pretty } = Cli::parse();

    match command {
        Command::Sample {
            generate,
            algorithm,
            samples,
            operations,
            density,
        } => {
            let (n, m) = generate.lengths();
            let (seed, gen) = generators(&generate);
            let mut alg = algorithm.build(n, m);
            check_reaches(&*alg, &[(n, m)]);
            let distances = sample_distances(&mut gen(), &mut alg, samples);
            let max = distances.iter().copied().max().unwrap_or(0) as usize;
            let operations = operations.then(|| operation_estimates(&sample_infos(&mut gen(), samples)));
            let density = density.then(|| {
                let mut freq = Grid::new(n + 1, m + 1, 0u64);
                script_distribution_matrix(&mut gen(), samples, &mut freq, None);
                (0..=n).map(|i| freq.row(i).to_vec()).collect()
            });
            print_json(
                &SampleOutput {
                    algorithm: alg.name(),
                    seed,
                    estimates: (!distances.is_empty()).then(|| estimates_from_samples(&distances)),
                    distribution: distance_distribution(&distances, max),
                    distances,
                    operations,
                    density,
                },
                pretty,
            );
        }
        Command::Estimate {
            generate,
            algorithm,
            estimator,
            model,
        } => {
            let (n, m) = generate.lengths();
            let (seed, gen) = generators(&generate);
            let mut alg = algorithm.build(n, m);
            check_reaches(&*alg, &[(n, m)]);
            let estimates = match model {
                Some(e_model) => relative_error_estimates(&mut gen(), &mut alg, e_model, &estimator),
                None => error_bounded_estimates(&mut gen(), &mut alg, &estimator),
            };
            print_json(
                &EstimateOutput {
                    algorithm: alg.name(),
                    seed,
                    model,
                    estimates,
                },
                pretty,
            );
        }
        Command::Difference {
            generate,
            algorithm,
            estimator,
        } => {
            let (n, m) = generate.lengths();
            let lengths = [(n / 2, m / 2), (n, m)];
            let seed = generate.seed();
            let alphabet = generate.alphabet();
            let mut half = IidPairGenerator::new(n / 2, m / 2, &alphabet, seed);
            let mut full = IidPairGenerator::new(n, m, &alphabet, seed.wrapping_add(1));
            let mut alg = algorithm.build(n, m);
            check_reaches(&*alg, &lengths);
            let estimates = difference_bounded_estimates(&mut half, &mut full, &mut alg, &estimator);
            print_json(
                &DifferenceOutput {
                    algorithm: alg.name(),
                    seed,
                    lengths,
                    estimates,
                },
                pretty,
            );
        }
        Command::Compare {
            generate,
            compare,
            pairs,
        } => {
            let (n, _) = generate.lengths();
            let (_, gen) = generators(&generate);
            let results = compare_edit_distance_algorithms(&mut gen(), compare.samples, &compare.bandwidths(n));
            if pairs {
                print_json(&results, pretty);
            } else {
                print_json(&summarize(&results), pretty);
            }
        }
        Command::Bandwidth {
            generate,
            compare,
            exact,
        } => {
            let (seed, gen) = generators(&generate);
            let bandwidth = if exact {
                optimal_bandwidth_exact(&mut gen(), compare.precision, compare.samples, compare.t_min)
            } else {
                optimal_bandwidth(&mut gen(), compare.precision, compare.samples, compare.t_min)
            };
            print_json(&BandwidthOutput { seed, exact, bandwidth }, pretty);
        }
        Command::Exhaustive { length, alphabet } => {
            info!("Enumerating all pairs of length {length}");
            print_json(&exhaustive_average(length, &Alphabet::new(alphabet.as_bytes())), pretty);
        }
    }
}
