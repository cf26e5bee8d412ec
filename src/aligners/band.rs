//! Approximate edit distance restricted to the diagonal band `|i-j| <= T`.
//!
//! Cells outside the band are treated as unreachable: the neighbours of the
//! band that the recurrence reads hold `CostVector::infinity(n, m)`, which is
//! larger than any real distance. When `T < |n-m|` the end `(n, m)` is outside
//! the band and the sentinel itself is returned. Use `is_unreachable` to test
//! for it.
//!
//! The banded distance is never smaller than the exact distance, and does not
//! increase when `T` grows. For `T >= max(n, m)` it equals the exact distance.
use log::warn;
use std::{
    cmp::{max, min},
    ops::RangeInclusive,
};

use super::EditDistance;
use crate::{
    cost_model::CostVector, edit_info::EditDistanceInfo, grid::Grid, grid::TwoRows,
    traceback::closest_to_diagonal_backtrack, Cost, Seq,
};

/// The columns `j >= 1` of row `i >= 1` inside the band.
#[inline]
fn band_range(i: usize, t: usize, m: usize) -> RangeInclusive<usize> {
    max(1, i.saturating_sub(t))..=min(m, i.saturating_add(t))
}

#[inline]
fn end_in_band(n: usize, m: usize, t: usize) -> bool {
    n.abs_diff(m) <= t
}

/// Banded Wagner–Fischer in linear space.
///
/// Rows are stored densely, so memory is `O(max(n, m))` regardless of `T`.
pub struct EditDistanceBandApproxLinSpace {
    cm: CostVector,
    rows: TwoRows<Cost>,
    bandwidth: usize,
    /// The sequence lengths the buffer was sized for. Bounds `change_bandwidth`.
    capacity: (usize, usize),
    /// The sentinel used in the last `calculate`.
    inf: Cost,
}

impl EditDistanceBandApproxLinSpace {
    /// Allocates rows for sequences of length up to `n` and `m`, with band
    /// half-width `t`. `t` itself is not checked against the capacity.
    pub fn new(n: usize, m: usize, t: usize, cm: CostVector) -> Self {
        Self {
            cm,
            rows: TwoRows::new(max(n, m) + 1, 0),
            bandwidth: t,
            capacity: (n, m),
            inf: cm.infinity(n, m),
        }
    }

    pub fn unit(n: usize, m: usize, t: usize) -> Self {
        Self::new(n, m, t, CostVector::unit())
    }

    pub fn bandwidth(&self) -> usize {
        self.bandwidth
    }

    pub fn capacity(&self) -> (usize, usize) {
        self.capacity
    }

    /// Changes the bandwidth without reallocating.
    ///
    /// Fails and keeps the current bandwidth when `new_band` exceeds the
    /// smaller allocated dimension. This only checks the capacity, not the
    /// lengths of the next input.
    pub fn change_bandwidth(&mut self, new_band: usize) -> bool {
        if new_band > min(self.capacity.0, self.capacity.1) {
            return false;
        }
        self.bandwidth = new_band;
        true
    }

    /// Computes the distance with bandwidth `band` for this call only.
    ///
    /// When `band` is rejected by `change_bandwidth`, the current bandwidth is
    /// used instead. The previous bandwidth is always restored afterwards,
    /// even when it exceeds the capacity itself.
    pub fn calculate_with_band(&mut self, s1: Seq, s2: Seq, band: usize) -> Cost {
        let old_band = self.bandwidth;
        if !self.change_bandwidth(band) {
            warn!(
                "Bandwidth {band} exceeds capacity {:?}; using bandwidth {old_band}",
                self.capacity
            );
        }
        let result = self.calculate(s1, s2);
        self.bandwidth = old_band;
        result
    }

    /// Whether `cost` is the sentinel of the last `calculate`, i.e. no
    /// alignment within the band was found.
    pub fn is_unreachable(&self, cost: Cost) -> bool {
        cost >= self.inf
    }
}

impl EditDistance for EditDistanceBandApproxLinSpace {
    fn name(&self) -> String {
        format!("band-{}", self.bandwidth)
    }

    fn calculate(&mut self, s1: Seq, s2: Seq) -> Cost {
        let (n, m) = (s1.len(), s2.len());
        let t = self.bandwidth;
        let cm = self.cm;
        let inf = cm.infinity(n, m);
        self.inf = inf;
        if !end_in_band(n, m, t) {
            return inf;
        }
        if n > self.capacity.0 || m > self.capacity.1 {
            self.capacity = (max(n, self.capacity.0), max(m, self.capacity.1));
            self.rows.ensure_len(max(self.capacity.0, self.capacity.1) + 1, 0);
        }

        {
            let (_, first) = self.rows.split();
            first[0] = 0;
            for j in 1..=min(t, m) {
                first[j] = first[j - 1] + cm.ins;
            }
        }

        for (i0, &ca) in s1.iter().enumerate() {
            let i = i0 + 1;
            self.rows.swap();
            // (i-1, i+T) is just right of the band in the previous row.
            if i + t <= m {
                self.rows.prev_mut()[i + t] = inf;
            }
            let (prev, next) = self.rows.split();
            next[0] = if i <= t { prev[0] + cm.del } else { inf };
            // (i, i-T-1) is just left of the band in this row.
            if i > t {
                next[i - t - 1] = inf;
            }
            for j in band_range(i, t, m) {
                next[j] = min(
                    prev[j - 1] + cm.delta(ca, s2[j - 1]),
                    min(prev[j] + cm.del, next[j - 1] + cm.ins),
                );
            }
        }
        self.rows.cur()[m]
    }

    fn reaches(&self, n: usize, m: usize) -> bool {
        end_in_band(n, m, self.bandwidth)
    }
}

/// Banded Wagner–Fischer on the full matrix, so that banded alignments can be
/// backtracked.
pub struct EditDistanceBandApprox {
    cm: CostVector,
    dp: Grid<Cost>,
    bandwidth: usize,
    n: usize,
    m: usize,
    inf: Cost,
}

impl EditDistanceBandApprox {
    pub fn new(n: usize, m: usize, t: usize, cm: CostVector) -> Self {
        Self {
            cm,
            dp: Grid::new(n + 1, m + 1, 0),
            bandwidth: t,
            n: 0,
            m: 0,
            inf: cm.infinity(n, m),
        }
    }

    pub fn unit(n: usize, m: usize, t: usize) -> Self {
        Self::new(n, m, t, CostVector::unit())
    }

    pub fn bandwidth(&self) -> usize {
        self.bandwidth
    }

    /// The full matrix has no capacity constraint on the bandwidth.
    pub fn set_bandwidth(&mut self, t: usize) {
        self.bandwidth = t;
    }

    pub fn is_unreachable(&self, cost: Cost) -> bool {
        cost >= self.inf
    }

    /// Closest-to-diagonal backtrack of the last computed matrix, or `None`
    /// when `(n, m)` was not reachable within the band.
    pub fn backtrack(&self) -> Option<EditDistanceInfo> {
        if !end_in_band(self.n, self.m, self.bandwidth) || self.is_unreachable(self.dp[(self.n, self.m)])
        {
            return None;
        }
        Some(closest_to_diagonal_backtrack(self.n, self.m, &self.dp))
    }

    /// `calculate` followed by `backtrack`.
    pub fn calculate_info(&mut self, s1: Seq, s2: Seq) -> Option<EditDistanceInfo> {
        self.calculate(s1, s2);
        self.backtrack()
    }
}

impl EditDistance for EditDistanceBandApprox {
    fn name(&self) -> String {
        format!("band-full-{}", self.bandwidth)
    }

    fn calculate(&mut self, s1: Seq, s2: Seq) -> Cost {
        let (n, m) = (s1.len(), s2.len());
        let t = self.bandwidth;
        let cm = self.cm;
        let inf = cm.infinity(n, m);
        self.n = n;
        self.m = m;
        self.inf = inf;
        self.dp.ensure_shape(n + 1, m + 1, inf);
        if !end_in_band(n, m, t) {
            return inf;
        }
        // Every cell outside the band is a sentinel, so a backtrack never leaves it.
        self.dp.fill(inf);
        self.dp[(0, 0)] = 0;
        for j in 1..=min(t, m) {
            self.dp[(0, j)] = self.dp[(0, j - 1)] + cm.ins;
        }
        for i in 1..=min(t, n) {
            self.dp[(i, 0)] = self.dp[(i - 1, 0)] + cm.del;
        }
        for (i0, &ca) in s1.iter().enumerate() {
            let i = i0 + 1;
            let (prev, next) = self.dp.row_pair_mut(i);
            for j in band_range(i, t, m) {
                next[j] = min(
                    prev[j - 1] + cm.delta(ca, s2[j - 1]),
                    min(prev[j] + cm.del, next[j - 1] + cm.ins),
                );
            }
        }
        self.dp[(n, m)]
    }

    fn reaches(&self, n: usize, m: usize) -> bool {
        end_in_band(n, m, self.bandwidth)
    }
}
