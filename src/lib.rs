//! Edit distance between pairs of sequences, computed exactly, in linear
//! space, or approximately within a diagonal band, and a sequential
//! Monte-Carlo estimator of the expected edit distance of random pairs.
//!
//! The algorithms are alphabet agnostic and work on byte slices. Every
//! algorithm instance owns its dynamic programming buffer and reuses it
//! between calls to `calculate`.

pub mod aligners;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compare;
pub mod cost_model;
pub mod edit_info;
pub mod estimate;
pub mod generate;
pub mod grid;
pub mod sampling;
pub mod traceback;

/// Type for storing costs and distances.
pub type Cost = u32;

/// An owned sequence.
pub type Sequence = Vec<u8>;
/// A sequence slice.
pub type Seq<'a> = &'a [u8];

pub mod prelude {
    pub use crate::aligners::{
        band::{EditDistanceBandApprox, EditDistanceBandApproxLinSpace},
        info_lin_space::EditDistanceInfoLinSpace,
        lin_space::EditDistanceLinSpace,
        wf::EditDistanceWF,
        EditDistance,
    };
    pub use crate::cost_model::CostVector;
    pub use crate::edit_info::{EditDistanceInfo, EditOp, EditScript};
    pub use crate::estimate::{EstimatorParams, ModelStoppingRule, SampleEstimates};
    pub use crate::generate::{FixedStringGenerator, IidPairGenerator, PairSource};
    pub use crate::grid::{Grid, TwoRows};
    pub use crate::{Cost, Seq, Sequence};
}

/// Convert a sequence to a `String` for printing.
pub fn seq_to_string(seq: Seq) -> String {
    String::from_utf8_lossy(seq).into_owned()
}
