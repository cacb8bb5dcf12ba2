use std::ops::{Index, IndexMut};

/// Row-major `rows x cols` table indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Array2<T> {
    cells: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Clone> Array2<T> {
    pub fn from_elem((rows, cols): (usize, usize), value: T) -> Self {
        Array2 {
            cells: vec![value; rows * cols],
            rows,
            cols,
        }
    }
}

impl<T> Array2<T> {
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// All cells, row after row.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        debug_assert!(row < self.rows, "row {} out of {}", row, self.rows);
        row * self.cols..(row + 1) * self.cols
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let range = self.row_range(row);
        &self.cells[range]
    }

    pub fn row_slice_mut(&mut self, row: usize) -> &mut [T] {
        let range = self.row_range(row);
        &mut self.cells[range]
    }

    /// Same-shaped table with `f` applied to every cell.
    pub fn mapv<U>(&self, f: impl FnMut(&T) -> U) -> Array2<U> {
        Array2 {
            cells: self.cells.iter().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(col < self.cols, "column {} out of {}", col, self.cols);
        &self.row_slice(row)[col]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(col < self.cols, "column {} out of {}", col, self.cols);
        &mut self.row_slice_mut(row)[col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_stored_row_major() {
        let mut m = Array2::from_elem((2, 3), 0u32);
        m[(1, 0)] = 4;
        m[(0, 2)] = 3;
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.as_slice(), &[0, 0, 3, 4, 0, 0]);
        assert_eq!(m.row_slice(1), &[4, 0, 0]);
    }

    #[test]
    fn row_slice_mut_touches_one_row() {
        let mut m = Array2::from_elem((3, 2), 1usize);
        for cell in m.row_slice_mut(2) {
            *cell *= 5;
        }
        assert_eq!(m.as_slice(), &[1, 1, 1, 1, 5, 5]);
    }

    #[test]
    fn mapv_keeps_the_shape() {
        let mut m = Array2::from_elem((2, 2), 2u64);
        m[(0, 1)] = 6;
        let halves = m.mapv(|&v| v as f64 / 2.0);
        assert_eq!(halves[(0, 1)], 3.0);
        assert_eq!(halves.row_slice(1), &[1.0, 1.0]);
    }
}
