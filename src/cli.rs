//! Command line arguments of the `edit-estimator` binary.
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::{
    aligners::{
        band::EditDistanceBandApproxLinSpace, info_lin_space::EditDistanceInfoLinSpace,
        lin_space::EditDistanceLinSpace, wf::EditDistanceWF, EditDistance,
    },
    compare::CompareArgs,
    cost_model::CostVector,
    estimate::EstimatorParams,
    generate::GenerateArgs,
    Cost,
};

#[derive(Debug, PartialEq, Eq, Default, Clone, Copy, ValueEnum, Serialize, Deserialize)]
pub enum Algorithm {
    /// Wagner–Fischer on the full matrix.
    Wf,
    /// Wagner–Fischer with two rows.
    #[default]
    Linear,
    /// Two rows of operation counts.
    Info,
    /// Diagonal band of half-width --bandwidth.
    Band,
}

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[clap(next_help_heading = "Costs")]
pub struct CostArgs {
    /// Cost of a substitution
    #[clap(long, default_value_t = 1, display_order = 20)]
    pub sub: Cost,
    /// Cost of a deletion
    #[clap(long, default_value_t = 1, display_order = 21)]
    pub del: Cost,
    /// Cost of an insertion
    #[clap(long, default_value_t = 1, display_order = 22)]
    pub ins: Cost,
}

impl CostArgs {
    pub fn cost_vector(&self) -> CostVector {
        CostVector::new(self.sub, self.del, self.ins)
    }
}

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[clap(next_help_heading = "Algorithm")]
pub struct AlgorithmArgs {
    #[clap(long, default_value_t, value_enum, display_order = 10)]
    pub algorithm: Algorithm,

    /// Half-width of the band. Implies --algorithm band.
    #[clap(short = 'T', long, display_order = 11)]
    pub bandwidth: Option<usize>,

    #[clap(flatten)]
    pub costs: CostArgs,
}

impl AlgorithmArgs {
    pub fn algorithm(&self) -> Algorithm {
        if self.bandwidth.is_some() {
            Algorithm::Band
        } else {
            self.algorithm
        }
    }

    /// An instance of the chosen algorithm for sequences of length `n` and `m`.
    pub fn build(&self, n: usize, m: usize) -> Box<dyn EditDistance> {
        let cm = self.costs.cost_vector();
        match self.algorithm() {
            Algorithm::Wf => Box::new(EditDistanceWF::new(n, m, cm)),
            Algorithm::Linear => Box::new(EditDistanceLinSpace::new(cm)),
            Algorithm::Info => Box::new(EditDistanceInfoLinSpace::new(cm)),
            Algorithm::Band => Box::new(EditDistanceBandApproxLinSpace::new(
                n,
                m,
                self.bandwidth.unwrap_or(n / 2),
                cm,
            )),
        }
    }
}

#[derive(Subcommand, Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Distances of a fixed number of random pairs.
    Sample {
        #[clap(flatten)]
        generate: GenerateArgs,
        #[clap(flatten)]
        algorithm: AlgorithmArgs,
        /// Number of sampled pairs
        #[clap(short = 'k', long, default_value_t = 100)]
        samples: usize,
        /// Also report operation counts. Backtracks the full matrix.
        #[clap(long)]
        operations: bool,
        /// Also report how often backtracked paths cross each cell.
        #[clap(long, hide_short_help = true)]
        density: bool,
    },
    /// Sample until the mean distance is precise enough.
    Estimate {
        #[clap(flatten)]
        generate: GenerateArgs,
        #[clap(flatten)]
        algorithm: AlgorithmArgs,
        #[clap(flatten)]
        estimator: EstimatorParams,
        /// Expected distance predicted by a model. Switches to the relative
        /// stopping rule.
        #[clap(long)]
        model: Option<f64>,
    },
    /// Joint estimates at lengths n/2 and n, until their difference is
    /// precise enough.
    Difference {
        #[clap(flatten)]
        generate: GenerateArgs,
        #[clap(flatten)]
        algorithm: AlgorithmArgs,
        #[clap(flatten)]
        estimator: EstimatorParams,
    },
    /// Exact against banded distances at several bandwidths.
    Compare {
        #[clap(flatten)]
        generate: GenerateArgs,
        #[clap(flatten)]
        compare: CompareArgs,
        /// Print one result per pair instead of the summary.
        #[clap(long)]
        pairs: bool,
    },
    /// Search the smallest sufficiently accurate bandwidth.
    Bandwidth {
        #[clap(flatten)]
        generate: GenerateArgs,
        #[clap(flatten)]
        compare: CompareArgs,
        /// Compare against exact distances instead of the doubled bandwidth.
        #[clap(long)]
        exact: bool,
    },
    /// Mean distance over all pairs of length n. Exponential in n.
    Exhaustive {
        #[clap(short = 'n', long)]
        length: usize,
        #[clap(short, long, default_value = "ACGT")]
        alphabet: String,
    },
}

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,

    /// Pretty-print the JSON output.
    #[clap(long, global = true)]
    pub pretty: bool,
}
