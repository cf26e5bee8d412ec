use std::cmp::min;

use super::EditDistance;
use crate::{
    cost_model::CostVector, edit_info::EditDistanceInfo, grid::Grid,
    traceback::closest_to_diagonal_backtrack, Cost, Seq,
};

/// Wagner–Fischer: fills the full `(n+1) × (m+1)` matrix.
///
/// The matrix of the last `calculate` is kept so it can be backtracked.
pub struct EditDistanceWF {
    cm: CostVector,
    dp: Grid<Cost>,
    /// Lengths of the last computed pair.
    n: usize,
    m: usize,
}

impl EditDistanceWF {
    /// Allocates a matrix for sequences of length up to `n` and `m`.
    /// Longer inputs grow the matrix.
    pub fn new(n: usize, m: usize, cm: CostVector) -> Self {
        Self {
            cm,
            dp: Grid::new(n + 1, m + 1, 0),
            n: 0,
            m: 0,
        }
    }

    pub fn unit(n: usize, m: usize) -> Self {
        Self::new(n, m, CostVector::unit())
    }

    /// The border: `M[i][0] = i·del`, `M[0][j] = j·ins`.
    fn init(&mut self) {
        self.dp[(0, 0)] = 0;
        for i in 1..=self.n {
            self.dp[(i, 0)] = self.dp[(i - 1, 0)] + self.cm.del;
        }
        for j in 1..=self.m {
            self.dp[(0, j)] = self.dp[(0, j - 1)] + self.cm.ins;
        }
    }

    /// Backtrack the last computed matrix, preferring paths close to the diagonal.
    pub fn backtrack(&self) -> EditDistanceInfo {
        closest_to_diagonal_backtrack(self.n, self.m, &self.dp)
    }

    /// `calculate` followed by `backtrack`.
    pub fn calculate_info(&mut self, s1: Seq, s2: Seq) -> EditDistanceInfo {
        self.calculate(s1, s2);
        self.backtrack()
    }
}

impl EditDistance for EditDistanceWF {
    fn name(&self) -> String {
        "wf".into()
    }

    fn calculate(&mut self, s1: Seq, s2: Seq) -> Cost {
        self.n = s1.len();
        self.m = s2.len();
        self.dp.ensure_shape(self.n + 1, self.m + 1, 0);
        self.init();
        let cm = self.cm;
        for (i0, &ca) in s1.iter().enumerate() {
            // Convert to 1 based index.
            let i = i0 + 1;
            let (prev, next) = self.dp.row_pair_mut(i);
            for (j0, &cb) in s2.iter().enumerate() {
                let j = j0 + 1;
                next[j] = min(
                    prev[j - 1] + cm.delta(ca, cb),
                    min(prev[j] + cm.del, next[j - 1] + cm.ins),
                );
            }
        }
        self.dp[(self.n, self.m)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(a: &[u8], b: &[u8]) -> (Cost, EditDistanceInfo) {
        let mut wf = EditDistanceWF::unit(a.len(), b.len());
        let d = wf.calculate(a, b);
        (d, wf.backtrack())
    }

    #[test]
    fn identical() {
        let (d, info) = info(b"AAAA", b"AAAA");
        assert_eq!(d, 0);
        assert_eq!(info.edit_script.to_string(), "MMMM");
    }

    #[test]
    fn single_substitution() {
        let (d, info) = info(b"AC", b"AG");
        assert_eq!(d, 1);
        assert_eq!((info.n_sub, info.n_del, info.n_ins), (1, 0, 0));
        assert_eq!(info.edit_script.to_string(), "MS");
    }

    #[test]
    fn single_deletion() {
        let (d, info) = info(b"ACGT", b"ACT");
        assert_eq!(d, 1);
        assert_eq!((info.n_sub, info.n_del, info.n_ins), (0, 1, 0));
        assert_eq!(info.edit_script.to_string(), "MMDM");
    }

    #[test]
    fn empty_first() {
        let (d, info) = info(b"", b"AC");
        assert_eq!(d, 2);
        assert_eq!((info.n_sub, info.n_del, info.n_ins), (0, 0, 2));
        assert_eq!(info.edit_script.to_string(), "II");
    }

    #[test]
    fn reuse_with_larger_input() {
        let mut wf = EditDistanceWF::unit(2, 2);
        assert_eq!(wf.calculate(b"AC", b"AG"), 1);
        assert_eq!(wf.calculate(b"ACGTACGT", b"CGTACGTA"), 2);
        assert_eq!(wf.calculate(b"A", b"A"), 0);
        assert_eq!(wf.backtrack().edit_script.to_string(), "M");
    }

    #[test]
    fn weighted_costs() {
        // Substitution is more expensive than a deletion plus an insertion.
        let mut wf = EditDistanceWF::new(2, 2, CostVector::new(3, 1, 1));
        assert_eq!(wf.calculate(b"AC", b"AG"), 2);
        let mut wf = EditDistanceWF::new(2, 2, CostVector::new(1, 2, 5));
        assert_eq!(wf.calculate(b"ACG", b""), 6);
        assert_eq!(wf.calculate(b"", b"ACG"), 15);
    }
}
