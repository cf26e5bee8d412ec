//! Edit distance algorithms.
//!
//! - `wf`: Wagner–Fischer on the full matrix, with traceback.
//! - `lin_space`: the same recurrence with two rows, distance only.
//! - `info_lin_space`: two rows of `EditDistanceInfo`, with operation counts.
//! - `band`: only the diagonal band `|i-j| <= T`, in linear space or on the full matrix.
//!
//! Note that deletions are characters of `s1` missing from `s2`, and
//! insertions are characters of `s2` missing from `s1`.

use crate::{Cost, Seq};

pub mod band;
pub mod info_lin_space;
pub mod lin_space;
pub mod wf;

/// An algorithm computing the (possibly approximate) distance of two sequences.
///
/// Implementations reuse their internal buffer, so one instance should be
/// used per thread.
pub trait EditDistance {
    /// A short name used when printing results.
    fn name(&self) -> String;

    /// Computes the distance between `s1` and `s2`. Overwrites any state of
    /// the previous call.
    fn calculate(&mut self, s1: Seq, s2: Seq) -> Cost;

    /// Whether an alignment of sequences of length `n` and `m` can be found
    /// at all. Only banded algorithms return `false`, when `(n, m)` lies
    /// outside the band and `calculate` returns a sentinel.
    fn reaches(&self, _n: usize, _m: usize) -> bool {
        true
    }
}

impl<A: EditDistance + ?Sized> EditDistance for Box<A> {
    fn name(&self) -> String {
        (**self).name()
    }
    fn calculate(&mut self, s1: Seq, s2: Seq) -> Cost {
        (**self).calculate(s1, s2)
    }
    fn reaches(&self, n: usize, m: usize) -> bool {
        (**self).reaches(n, m)
    }
}
