//! Backtracking a filled DP matrix into an edit script.
use crate::{
    edit_info::{EditDistanceInfo, EditOp, EditScript},
    grid::Grid,
    Cost,
};

/// Backtrack from `(n, m)` to `(0, 0)` through `dp`, keeping the path as close
/// to the main diagonal as ties allow.
///
/// The choice at each cell only compares the three predecessors `a` (diagonal),
/// `b` (up) and `c` (left) with each other and with the current value `d`, so
/// the resulting counts add up to the distance under unit costs. Out-of-band
/// cells of a banded matrix hold a sentinel and are never chosen.
pub fn closest_to_diagonal_backtrack(n: usize, m: usize, dp: &Grid<Cost>) -> EditDistanceInfo {
    let mut info = EditDistanceInfo::default();
    // Ops are pushed back to front and reversed at the end.
    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        let op = closest_to_diagonal_step(
            i,
            j,
            dp[(i - 1, j - 1)],
            dp[(i - 1, j)],
            dp[(i, j - 1)],
            dp[(i, j)],
        );
        let (di, dj) = op.delta();
        i -= di;
        j -= dj;
        ops.push(op);
    }
    ops.extend(std::iter::repeat(EditOp::Del).take(i));
    ops.extend(std::iter::repeat(EditOp::Ins).take(j));
    ops.reverse();
    for &op in &ops {
        info.count_op(op);
    }
    info.edit_script = EditScript(ops);
    info
}

/// The operation chosen at cell `(i, j)` with diagonal, up, left and current
/// values `a`, `b`, `c` and `d`.
#[inline]
pub fn closest_to_diagonal_step(i: usize, j: usize, a: Cost, b: Cost, c: Cost, d: Cost) -> EditOp {
    use EditOp::*;
    if a == d && a <= b && a <= c {
        return Match;
    }
    if a < b && a < c {
        return Sub;
    }
    if b < a && b < c {
        return Del;
    }
    if c < a && c < b {
        return Ins;
    }
    // Ties on the minimum.
    if a == b && b == c {
        return match i.cmp(&j) {
            std::cmp::Ordering::Less => Ins,
            std::cmp::Ordering::Equal => Sub,
            std::cmp::Ordering::Greater => Del,
        };
    }
    if a == b {
        // a == b < c
        if i > j {
            Del
        } else {
            Sub
        }
    } else if a == c {
        // a == c < b
        if i < j {
            Ins
        } else {
            Sub
        }
    } else {
        // b == c < a
        if j <= i {
            Del
        } else {
            Ins
        }
    }
}

/// Add one to every cell on the path of `script` in `freq`.
pub fn accumulate_path(script: &EditScript, freq: &mut Grid<u64>) {
    for (i, j) in script.path() {
        freq[(i, j)] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EditOp::*;

    #[test]
    fn single_minimum() {
        assert_eq!(closest_to_diagonal_step(2, 2, 0, 1, 1, 0), Match);
        assert_eq!(closest_to_diagonal_step(2, 2, 0, 1, 1, 1), Sub);
        assert_eq!(closest_to_diagonal_step(2, 2, 1, 0, 2, 1), Del);
        assert_eq!(closest_to_diagonal_step(2, 2, 1, 2, 0, 1), Ins);
    }

    #[test]
    fn ties_move_towards_diagonal() {
        // Three-way ties.
        assert_eq!(closest_to_diagonal_step(1, 3, 2, 2, 2, 3), Ins);
        assert_eq!(closest_to_diagonal_step(3, 3, 2, 2, 2, 3), Sub);
        assert_eq!(closest_to_diagonal_step(3, 1, 2, 2, 2, 3), Del);
        // Substitution against deletion.
        assert_eq!(closest_to_diagonal_step(3, 1, 2, 2, 5, 3), Del);
        assert_eq!(closest_to_diagonal_step(2, 2, 2, 2, 5, 3), Sub);
        // Substitution against insertion.
        assert_eq!(closest_to_diagonal_step(1, 3, 2, 5, 2, 3), Ins);
        assert_eq!(closest_to_diagonal_step(2, 2, 2, 5, 2, 3), Sub);
        // Deletion against insertion.
        assert_eq!(closest_to_diagonal_step(2, 2, 5, 2, 2, 3), Del);
        assert_eq!(closest_to_diagonal_step(1, 2, 5, 2, 2, 3), Ins);
    }

    #[test]
    fn borders_are_indels() {
        let dp = Grid::new(3, 1, 0);
        let info = closest_to_diagonal_backtrack(2, 0, &dp);
        assert_eq!(info.edit_script.to_string(), "DD");
        assert_eq!(info.n_del, 2);
    }
}
