//! Owned buffers for dynamic programming.
//!
//! `Grid` is a dense row-major `(rows × cols)` matrix in a single allocation.
//! `TwoRows` holds the previous and current row of a linear space algorithm;
//! swapping them only flips an index.
use std::ops::{Index, IndexMut};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Reshape to at least `rows × cols`, keeping the allocation when it is
    /// large enough. Contents are unspecified afterwards.
    pub fn ensure_shape(&mut self, rows: usize, cols: usize, value: T) {
        if rows <= self.rows && cols <= self.cols {
            return;
        }
        self.rows = rows.max(self.rows);
        self.cols = cols.max(self.cols);
        self.data.clear();
        self.data.resize(self.rows * self.cols, value);
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row `i-1` and row `i`, the latter mutable.
    pub fn row_pair_mut(&mut self, i: usize) -> (&[T], &mut [T]) {
        assert!(i > 0);
        let (prev, next) = self.data.split_at_mut(i * self.cols);
        (&prev[(i - 1) * self.cols..], &mut next[..self.cols])
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        debug_assert!(i < self.rows && j < self.cols, "({i}, {j}) out of bounds");
        &self.data[i * self.cols + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        debug_assert!(i < self.rows && j < self.cols, "({i}, {j}) out of bounds");
        &mut self.data[i * self.cols + j]
    }
}

/// The two rows of a linear space DP.
#[derive(Clone, Debug)]
pub struct TwoRows<T> {
    rows: [Vec<T>; 2],
    /// Index of the current row.
    cur: usize,
}

impl<T: Clone> TwoRows<T> {
    pub fn new(len: usize, value: T) -> Self {
        Self {
            rows: [vec![value.clone(); len], vec![value; len]],
            cur: 1,
        }
    }

    /// Grow both rows to at least `len`.
    pub fn ensure_len(&mut self, len: usize, value: T) {
        for row in &mut self.rows {
            if row.len() < len {
                row.resize(len, value.clone());
            }
        }
    }
}

impl<T> TwoRows<T> {
    pub fn len(&self) -> usize {
        self.rows[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn prev(&self) -> &[T] {
        &self.rows[1 - self.cur]
    }

    pub fn prev_mut(&mut self) -> &mut [T] {
        &mut self.rows[1 - self.cur]
    }

    pub fn cur(&self) -> &[T] {
        &self.rows[self.cur]
    }

    /// The previous row, and the current row for writing.
    pub fn split(&mut self) -> (&[T], &mut [T]) {
        let [r0, r1] = &mut self.rows;
        if self.cur == 1 {
            (&r0[..], &mut r1[..])
        } else {
            (&r1[..], &mut r0[..])
        }
    }

    /// The current row becomes the previous row.
    #[inline]
    pub fn swap(&mut self) {
        self.cur = 1 - self.cur;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_layout() {
        let mut g = Grid::new(2, 3, 0u32);
        g[(1, 2)] = 7;
        assert_eq!(g.row(1), &[0, 0, 7]);
        let (prev, next) = g.row_pair_mut(1);
        next[0] = prev[0] + 1;
        assert_eq!(g[(1, 0)], 1);
    }

    #[test]
    fn swap_does_not_copy() {
        let mut r = TwoRows::new(3, 0u32);
        r.split().1[0] = 5;
        r.swap();
        assert_eq!(r.prev()[0], 5);
        r.split().1[0] = 6;
        assert_eq!(r.cur()[0], 6);
        assert_eq!(r.prev()[0], 5);
    }
}
