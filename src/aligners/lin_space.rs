use std::cmp::min;

use super::EditDistance;
use crate::{cost_model::CostVector, grid::TwoRows, Cost, Seq};

/// Wagner–Fischer with two rolling rows. Computes the distance only.
pub struct EditDistanceLinSpace {
    cm: CostVector,
    rows: TwoRows<Cost>,
}

impl EditDistanceLinSpace {
    pub fn new(cm: CostVector) -> Self {
        Self {
            cm,
            rows: TwoRows::new(0, 0),
        }
    }

    pub fn unit() -> Self {
        Self::new(CostVector::unit())
    }
}

impl EditDistance for EditDistanceLinSpace {
    fn name(&self) -> String {
        "linear".into()
    }

    fn calculate(&mut self, s1: Seq, s2: Seq) -> Cost {
        // Rows run along the shorter sequence. Transposing the matrix swaps
        // the roles of deletions and insertions.
        let (a, b, del, ins) = if s2.len() <= s1.len() {
            (s1, s2, self.cm.del, self.cm.ins)
        } else {
            (s2, s1, self.cm.ins, self.cm.del)
        };
        let sub = self.cm.sub;
        self.rows.ensure_len(b.len() + 1, 0);

        {
            let (_, first) = self.rows.split();
            first[0] = 0;
            for j in 1..=b.len() {
                first[j] = first[j - 1] + ins;
            }
        }
        for &ca in a {
            self.rows.swap();
            let (prev, next) = self.rows.split();
            next[0] = prev[0] + del;
            for (j0, &cb) in b.iter().enumerate() {
                let j = j0 + 1;
                let delta = if ca == cb { 0 } else { sub };
                next[j] = min(prev[j - 1] + delta, min(prev[j] + del, next[j - 1] + ins));
            }
        }
        self.rows.cur()[b.len()]
    }
}
