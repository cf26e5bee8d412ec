use super::EditDistance;
use crate::{
    cost_model::CostVector,
    edit_info::{EditDistanceInfo, EditOp},
    grid::{Grid, TwoRows},
    Cost, Seq,
};

/// Linear space Wagner–Fischer keeping an `EditDistanceInfo` per cell.
///
/// Each cell picks its predecessor locally: the diagonal (match or
/// substitution) wins every tie it is part of, and a deletion beats an
/// insertion. The infos hold operation counts only, no scripts.
pub struct EditDistanceInfoLinSpace {
    cm: CostVector,
    rows: TwoRows<EditDistanceInfo>,
}

impl EditDistanceInfoLinSpace {
    pub fn new(cm: CostVector) -> Self {
        Self {
            cm,
            rows: TwoRows::new(0, EditDistanceInfo::default()),
        }
    }

    pub fn unit() -> Self {
        Self::new(CostVector::unit())
    }

    /// The operation counts of an optimal alignment of `s1` and `s2`.
    pub fn calculate_info(&mut self, s1: Seq, s2: Seq) -> EditDistanceInfo {
        self.run(s1, s2, None)
    }

    /// As `calculate_info`, and adds the info of every cell `(i, j)` to
    /// `acc[(i, j)]`. `acc` is owned by the caller and typically shared
    /// between many samples.
    pub fn calculate_accumulate(
        &mut self,
        s1: Seq,
        s2: Seq,
        acc: &mut Grid<EditDistanceInfo>,
    ) -> EditDistanceInfo {
        assert!(
            acc.rows() > s1.len() && acc.cols() > s2.len(),
            "Accumulation matrix {}x{} is too small for {}x{}",
            acc.rows(),
            acc.cols(),
            s1.len() + 1,
            s2.len() + 1
        );
        self.run(s1, s2, Some(acc))
    }

    fn run(
        &mut self,
        s1: Seq,
        s2: Seq,
        mut acc: Option<&mut Grid<EditDistanceInfo>>,
    ) -> EditDistanceInfo {
        let cm = self.cm;
        let m = s2.len();
        self.rows.ensure_len(m + 1, EditDistanceInfo::default());

        {
            let (_, first) = self.rows.split();
            first[0].reset();
            for j in 1..=m {
                first[j] = first[j - 1].clone();
                first[j].count_op(EditOp::Ins);
            }
            if let Some(acc) = acc.as_deref_mut() {
                for j in 0..=m {
                    acc[(0, j)] += first[j].clone();
                }
            }
        }

        for (i0, &ca) in s1.iter().enumerate() {
            let i = i0 + 1;
            self.rows.swap();
            let (prev, next) = self.rows.split();
            next[0] = prev[0].clone();
            next[0].count_op(EditOp::Del);
            for (j0, &cb) in s2.iter().enumerate() {
                let j = j0 + 1;
                let diag = prev[j - 1].weighted_cost(&cm) + cm.delta(ca, cb);
                let del = prev[j].weighted_cost(&cm) + cm.del;
                let ins = next[j - 1].weighted_cost(&cm) + cm.ins;
                let (mut cell, op) = if diag <= del && diag <= ins {
                    let op = if ca == cb { EditOp::Match } else { EditOp::Sub };
                    (prev[j - 1].clone(), op)
                } else if del <= ins {
                    (prev[j].clone(), EditOp::Del)
                } else {
                    (next[j - 1].clone(), EditOp::Ins)
                };
                cell.count_op(op);
                next[j] = cell;
            }
            if let Some(acc) = acc.as_deref_mut() {
                for j in 0..=m {
                    acc[(i, j)] += next[j].clone();
                }
            }
        }
        self.rows.cur()[m].clone()
    }
}

impl EditDistance for EditDistanceInfoLinSpace {
    fn name(&self) -> String {
        "linear-info".into()
    }

    fn calculate(&mut self, s1: Seq, s2: Seq) -> Cost {
        let cm = self.cm;
        self.calculate_info(s1, s2).weighted_cost(&cm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        let mut alg = EditDistanceInfoLinSpace::unit();
        assert_eq!(alg.calculate_info(b"AC", b"AG"), EditDistanceInfo::counts(1, 0, 0));
        assert_eq!(alg.calculate_info(b"ACGT", b"ACT"), EditDistanceInfo::counts(0, 1, 0));
        assert_eq!(alg.calculate_info(b"", b"AC"), EditDistanceInfo::counts(0, 0, 2));
        assert_eq!(alg.calculate_info(b"AAAA", b"AAAA").distance(), 0);
    }

    #[test]
    fn substitution_beats_indel_pair() {
        // "AC" -> "CA" costs 2 either way; the local rule prefers substitutions.
        let mut alg = EditDistanceInfoLinSpace::unit();
        assert_eq!(alg.calculate_info(b"AC", b"CA"), EditDistanceInfo::counts(2, 0, 0));
    }

    #[test]
    fn accumulate_over_samples() {
        let mut alg = EditDistanceInfoLinSpace::unit();
        let mut acc = Grid::new(3, 3, EditDistanceInfo::default());
        alg.calculate_accumulate(b"AC", b"AG", &mut acc);
        alg.calculate_accumulate(b"AC", b"AG", &mut acc);
        assert_eq!(acc[(2, 2)], EditDistanceInfo::counts(2, 0, 0));
        assert_eq!(acc[(0, 2)], EditDistanceInfo::counts(0, 0, 4));
        assert_eq!(acc[(2, 0)], EditDistanceInfo::counts(0, 4, 0));
        assert_eq!(acc[(1, 1)], EditDistanceInfo::default());
    }
}
