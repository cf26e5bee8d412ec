//! Decomposition of an edit distance into substitutions, deletions and
//! insertions, optionally with the edit script of one optimal alignment.
use derive_more::{Add, AddAssign, Mul};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, ops};

use crate::{cost_model::CostVector, Cost};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EditOp {
    Match,
    Sub,
    Del,
    Ins,
}

impl EditOp {
    pub fn to_char(self) -> char {
        match self {
            EditOp::Match => 'M',
            EditOp::Sub => 'S',
            EditOp::Del => 'D',
            EditOp::Ins => 'I',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'M' => EditOp::Match,
            'S' => EditOp::Sub,
            'D' => EditOp::Del,
            'I' => EditOp::Ins,
            _ => return None,
        })
    }

    /// The move `(di, dj)` in the DP matrix.
    pub fn delta(self) -> (usize, usize) {
        match self {
            EditOp::Match | EditOp::Sub => (1, 1),
            EditOp::Del => (1, 0),
            EditOp::Ins => (0, 1),
        }
    }
}

/// A sequence of edit operations, left to right.
///
/// Addition concatenates and multiplication by `k` repeats the script `k` times.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EditScript(pub Vec<EditOp>);

impl EditScript {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EditOp> + '_ {
        self.0.iter().copied()
    }

    pub fn count(&self, op: EditOp) -> usize {
        self.iter().filter(|&o| o == op).count()
    }

    /// The cells `(i, j)` visited by the path, starting at `(0, 0)`.
    pub fn path(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        std::iter::once((0, 0)).chain(self.iter().scan((0, 0), |(i, j), op| {
            let (di, dj) = op.delta();
            *i += di;
            *j += dj;
            Some((*i, *j))
        }))
    }

    /// Check that the script aligns `a` to `b`: matches are on equal
    /// characters, substitutions on different ones, and all characters are used.
    pub fn is_valid_for(&self, a: &[u8], b: &[u8]) -> bool {
        let (mut i, mut j) = (0, 0);
        for op in self.iter() {
            match op {
                EditOp::Match | EditOp::Sub => {
                    let (Some(ca), Some(cb)) = (a.get(i), b.get(j)) else {
                        return false;
                    };
                    if (ca == cb) != (op == EditOp::Match) {
                        return false;
                    }
                }
                EditOp::Del if i >= a.len() => return false,
                EditOp::Ins if j >= b.len() => return false,
                _ => {}
            }
            let (di, dj) = op.delta();
            i += di;
            j += dj;
        }
        i == a.len() && j == b.len()
    }
}

impl fmt::Display for EditScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in self.iter() {
            write!(f, "{}", op.to_char())?;
        }
        Ok(())
    }
}

impl std::str::FromStr for EditScript {
    type Err = char;

    /// Parses a string of `MSDI` tags. Returns the first invalid character.
    fn from_str(s: &str) -> Result<Self, char> {
        s.chars()
            .map(|c| EditOp::from_char(c).ok_or(c))
            .collect::<Result<_, _>>()
            .map(EditScript)
    }
}

impl ops::Add for EditScript {
    type Output = EditScript;
    fn add(mut self, rhs: EditScript) -> EditScript {
        self.0.extend(rhs.0);
        self
    }
}

impl ops::AddAssign for EditScript {
    fn add_assign(&mut self, rhs: EditScript) {
        self.0.extend(rhs.0);
    }
}

impl ops::Mul<usize> for EditScript {
    type Output = EditScript;
    fn mul(self, k: usize) -> EditScript {
        EditScript(self.0.repeat(k))
    }
}

/// How an edit distance splits into substitutions, deletions and insertions.
///
/// `distance()` is the number of operations, which equals the edit distance
/// under unit costs. Matches do not count but are kept in `edit_script`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Add, AddAssign, Mul, Serialize, Deserialize)]
pub struct EditDistanceInfo {
    pub n_sub: usize,
    pub n_del: usize,
    pub n_ins: usize,
    /// Empty when no script was recorded.
    pub edit_script: EditScript,
}

pub const INFO_UNIT_SUB: EditDistanceInfo = EditDistanceInfo::counts(1, 0, 0);
pub const INFO_UNIT_DEL: EditDistanceInfo = EditDistanceInfo::counts(0, 1, 0);
pub const INFO_UNIT_INS: EditDistanceInfo = EditDistanceInfo::counts(0, 0, 1);

impl EditDistanceInfo {
    /// Operation counts without a script.
    pub const fn counts(n_sub: usize, n_del: usize, n_ins: usize) -> Self {
        Self {
            n_sub,
            n_del,
            n_ins,
            edit_script: EditScript(Vec::new()),
        }
    }

    /// Counts taken from the script.
    pub fn from_script(edit_script: EditScript) -> Self {
        Self {
            n_sub: edit_script.count(EditOp::Sub),
            n_del: edit_script.count(EditOp::Del),
            n_ins: edit_script.count(EditOp::Ins),
            edit_script,
        }
    }

    pub fn distance(&self) -> usize {
        self.n_sub + self.n_del + self.n_ins
    }

    /// The cost of the operations under `cm`.
    pub fn weighted_cost(&self, cm: &CostVector) -> Cost {
        (self.n_sub as Cost) * cm.sub + (self.n_del as Cost) * cm.del + (self.n_ins as Cost) * cm.ins
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn count_op(&mut self, op: EditOp) {
        match op {
            EditOp::Match => {}
            EditOp::Sub => self.n_sub += 1,
            EditOp::Del => self.n_del += 1,
            EditOp::Ins => self.n_ins += 1,
        }
    }
}

impl PartialOrd for EditDistanceInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered by `distance()`; the remaining fields only break ties.
impl Ord for EditDistanceInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance()
            .cmp(&other.distance())
            .then(self.n_sub.cmp(&other.n_sub))
            .then(self.n_del.cmp(&other.n_del))
            .then(self.n_ins.cmp(&other.n_ins))
            .then_with(|| self.edit_script.cmp(&other.edit_script))
    }
}

impl fmt::Display for EditDistanceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.n_sub, self.n_del, self.n_ins)?;
        if !self.edit_script.is_empty() {
            write!(f, " {}", self.edit_script)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(s: &str) -> EditScript {
        s.parse().unwrap()
    }

    #[test]
    fn add_and_scale() {
        let x = EditDistanceInfo::from_script(script("MSD"));
        let y = EditDistanceInfo::from_script(script("I"));
        let sum = x.clone() + y;
        assert_eq!(sum.edit_script.to_string(), "MSDI");
        assert_eq!((sum.n_sub, sum.n_del, sum.n_ins), (1, 1, 1));

        let triple = x.clone() * 3usize;
        assert_eq!(triple, x.clone() + x.clone() + x);
        assert_eq!(triple.distance(), 6);
        assert_eq!(triple.edit_script.len(), 9);
    }

    #[test]
    fn ordered_by_distance() {
        let a = EditDistanceInfo::counts(3, 0, 0);
        let b = EditDistanceInfo::counts(0, 2, 2);
        assert!(a < b);
        assert_eq!(INFO_UNIT_SUB.distance(), INFO_UNIT_INS.distance());
        assert_ne!(INFO_UNIT_SUB, INFO_UNIT_DEL);
    }

    #[test]
    fn validate_script() {
        assert!(script("MS").is_valid_for(b"AC", b"AG"));
        assert!(!script("MM").is_valid_for(b"AC", b"AG"));
        assert!(script("II").is_valid_for(b"", b"AC"));
        assert!(!script("I").is_valid_for(b"", b"AC"));
        assert_eq!(
            script("MDI").path().collect::<Vec<_>>(),
            vec![(0, 0), (1, 1), (2, 1), (2, 2)]
        );
        assert_eq!("MX".parse::<EditScript>(), Err('X'));
    }

    #[test]
    fn weighted() {
        let cm = CostVector::new(2, 3, 5);
        assert_eq!(EditDistanceInfo::counts(1, 1, 1).weighted_cost(&cm), 10);
    }
}
