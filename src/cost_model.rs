//! This module contains the `CostVector` cost model.
use serde::{Deserialize, Serialize};
use std::cmp::{max, min};

use crate::Cost;

/// Linear costs for substitutions, deletions and insertions.
///
/// A deletion removes a character of `s1` and moves down in the DP matrix, an
/// insertion adds a character of `s2` and moves right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostVector {
    pub sub: Cost,
    pub del: Cost,
    pub ins: Cost,
}

impl Default for CostVector {
    fn default() -> Self {
        Self::unit()
    }
}

impl CostVector {
    pub fn new(sub: Cost, del: Cost, ins: Cost) -> Self {
        Self { sub, del, ins }
    }

    pub fn unit() -> Self {
        Self::new(1, 1, 1)
    }

    pub fn linear(sub: Cost, indel: Cost) -> Self {
        Self::new(sub, indel, indel)
    }

    pub fn max_cost(&self) -> Cost {
        max(self.sub, max(self.del, self.ins))
    }

    /// A value larger than any distance between sequences of length `n` and `m`.
    ///
    /// Never 0, so that it differs from the distance of two empty sequences
    /// even when all costs are 0. Saturates at `Cost::MAX - max_cost`, so that
    /// adding one more step to it cannot overflow.
    pub fn infinity(&self, n: usize, m: usize) -> Cost {
        let steps = (n as u64).saturating_add(m as u64).saturating_add(1);
        let inf = (2 * self.max_cost() as u64).saturating_mul(steps);
        let limit = (Cost::MAX - self.max_cost()) as u64;
        max(min(inf, limit), 1) as Cost
    }

    /// The cost of a diagonal step between characters `ca` and `cb`.
    #[inline]
    pub fn delta(&self, ca: u8, cb: u8) -> Cost {
        if ca == cb {
            0
        } else {
            self.sub
        }
    }
}
