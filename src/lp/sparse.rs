//! 按列压缩存储的 LP 问题，实现 [`LinearProgram`]，并提供读回与解向量校验。
use std::collections::BTreeMap;

use crate::lp::{Bound, LinearProgram, LpError};

/// 检查赋值是否满足行列界时允许的误差。
pub const FEASIBILITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseLp {
    columns: Vec<BTreeMap<usize, f64>>,
    col_bounds: Vec<Bound>,
    row_bounds: Vec<Bound>,
}

impl SparseLp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coefficient(&self, row: usize, col: usize) -> f64 {
        self.columns
            .get(col)
            .and_then(|column| column.get(&row))
            .copied()
            .unwrap_or(0.0)
    }

    /// `col` 中已存储的项，按行号升序，包括显式的零。
    pub fn column(&self, col: usize) -> impl Iterator<Item = (usize, f64)> {
        self.columns
            .get(col)
            .into_iter()
            .flat_map(|column| column.iter().map(|(&row, &value)| (row, value)))
    }

    /// `row` 中已存储的项，按列号升序。
    pub fn row(&self, row: usize) -> Vec<(usize, f64)> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(col, column)| column.get(&row).map(|&value| (col, value)))
            .collect()
    }

    pub fn row_bounds(&self, row: usize) -> Option<Bound> {
        self.row_bounds.get(row).copied()
    }

    pub fn col_bounds(&self, col: usize) -> Option<Bound> {
        self.col_bounds.get(col).copied()
    }

    pub fn nonzeros(&self) -> usize {
        self.columns.iter().map(BTreeMap::len).sum()
    }

    /// `Σ a[row][j] * x[j]`; columns past the end of `x` count as zero.
    pub fn row_activity(&self, row: usize, x: &[f64]) -> f64 {
        self.columns
            .iter()
            .zip(x)
            .filter_map(|(column, value)| column.get(&row).map(|coef| coef * value))
            .sum()
    }

    pub fn violated_rows(&self, x: &[f64]) -> Vec<usize> {
        let mut activity = vec![0.0; self.row_bounds.len()];
        for (column, value) in self.columns.iter().zip(x) {
            for (&row, coef) in column {
                activity[row] += coef * value;
            }
        }
        activity
            .into_iter()
            .zip(&self.row_bounds)
            .enumerate()
            .filter(|(_, (value, bound))| !bound.contains(*value, FEASIBILITY_TOLERANCE))
            .map(|(row, _)| row)
            .collect()
    }

    /// `x`（每列一个值）是否满足所有行界与列界。
    pub fn is_satisfied_by(&self, x: &[f64]) -> bool {
        x.len() == self.columns.len()
            && x
                .iter()
                .zip(&self.col_bounds)
                .all(|(value, bound)| bound.contains(*value, FEASIBILITY_TOLERANCE))
            && self.violated_rows(x).is_empty()
    }

    fn check_row(&self, row: usize) -> Result<(), LpError> {
        if row >= self.row_bounds.len() {
            return Err(LpError::RowOutOfBounds {
                row,
                rows: self.row_bounds.len(),
            });
        }
        Ok(())
    }

    fn check_col(&self, col: usize) -> Result<(), LpError> {
        if col >= self.columns.len() {
            return Err(LpError::ColumnOutOfBounds {
                col,
                cols: self.columns.len(),
            });
        }
        Ok(())
    }

    fn collect_entries(
        indices: &[usize],
        values: &[f64],
        mut check: impl FnMut(usize) -> Result<(), LpError>,
    ) -> Result<BTreeMap<usize, f64>, LpError> {
        if indices.len() != values.len() {
            return Err(LpError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }
        let mut entries = BTreeMap::new();
        for (&index, &value) in indices.iter().zip(values) {
            check(index)?;
            if entries.insert(index, value).is_some() {
                return Err(LpError::DuplicateIndex(index));
            }
        }
        Ok(entries)
    }
}

impl LinearProgram for SparseLp {
    fn create() -> Option<Self> {
        Some(Self::new())
    }

    fn copy(&self) -> Self {
        self.clone()
    }

    fn num_rows(&self) -> usize {
        self.row_bounds.len()
    }

    fn num_cols(&self) -> usize {
        self.columns.len()
    }

    fn add_rows(&mut self, count: usize) -> usize {
        let first = self.row_bounds.len();
        self.row_bounds.resize(first + count, Bound::Free);
        first
    }

    fn add_cols(&mut self, count: usize) -> usize {
        let first = self.columns.len();
        self.columns.resize_with(first + count, BTreeMap::new);
        self.col_bounds.resize(first + count, Bound::Lower(0.0));
        first
    }

    fn set_mat_col(&mut self, col: usize, rows: &[usize], values: &[f64]) -> Result<(), LpError> {
        self.check_col(col)?;
        let entries = Self::collect_entries(rows, values, |row| self.check_row(row))?;
        self.columns[col] = entries;
        Ok(())
    }

    fn set_mat_row(&mut self, row: usize, cols: &[usize], values: &[f64]) -> Result<(), LpError> {
        self.check_row(row)?;
        let entries = Self::collect_entries(cols, values, |col| self.check_col(col))?;
        for column in self.columns.iter_mut() {
            column.remove(&row);
        }
        for (col, value) in entries {
            self.columns[col].insert(row, value);
        }
        Ok(())
    }

    fn set_row_bounds(&mut self, row: usize, bound: Bound) -> Result<(), LpError> {
        self.check_row(row)?;
        self.row_bounds[row] = bound.validate()?;
        Ok(())
    }

    fn set_col_bounds(&mut self, col: usize, bound: Bound) -> Result<(), LpError> {
        self.check_col(col)?;
        self.col_bounds[col] = bound.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> SparseLp {
        let mut lp = SparseLp::new();
        lp.add_rows(2);
        lp.add_cols(2);
        lp
    }

    #[test]
    fn add_returns_first_new_index() {
        let mut lp = SparseLp::create().unwrap();
        assert_eq!(lp.add_rows(3), 0);
        assert_eq!(lp.add_rows(2), 3);
        assert_eq!(lp.add_cols(1), 0);
        assert_eq!(lp.num_rows(), 5);
        assert_eq!(lp.num_cols(), 1);
        assert_eq!(lp.row_bounds(4), Some(Bound::Free));
        assert_eq!(lp.col_bounds(0), Some(Bound::Lower(0.0)));
    }

    #[test]
    fn set_row_replaces_only_that_row() {
        let mut lp = two_by_two();
        lp.set_mat_col(0, &[0, 1], &[1.0, 2.0]).unwrap();
        lp.set_mat_col(1, &[0], &[3.0]).unwrap();
        lp.set_mat_row(1, &[1], &[-4.0]).unwrap();

        assert_eq!(lp.row(0), vec![(0, 1.0), (1, 3.0)]);
        assert_eq!(lp.row(1), vec![(1, -4.0)]);
        assert_eq!(lp.coefficient(1, 0), 0.0);
        assert_eq!(lp.nonzeros(), 3);
    }

    #[test]
    fn malformed_sparse_vectors_are_rejected() {
        let mut lp = two_by_two();
        assert_eq!(
            lp.set_mat_col(0, &[0, 1], &[1.0]),
            Err(LpError::LengthMismatch {
                indices: 2,
                values: 1
            })
        );
        assert_eq!(
            lp.set_mat_col(0, &[2], &[1.0]),
            Err(LpError::RowOutOfBounds { row: 2, rows: 2 })
        );
        assert_eq!(
            lp.set_mat_row(0, &[1, 1], &[1.0, 1.0]),
            Err(LpError::DuplicateIndex(1))
        );
        assert_eq!(
            lp.set_row_bounds(5, Bound::Free),
            Err(LpError::RowOutOfBounds { row: 5, rows: 2 })
        );
        assert_eq!(lp.nonzeros(), 0);
    }

    #[test]
    fn copy_is_independent() {
        let mut lp = two_by_two();
        lp.set_mat_col(0, &[0], &[1.0]).unwrap();
        let mut copy = lp.copy();
        copy.set_mat_col(0, &[1], &[7.0]).unwrap();
        copy.add_rows(1);

        assert_eq!(lp.column(0).collect::<Vec<_>>(), vec![(0, 1.0)]);
        assert_eq!(lp.num_rows(), 2);
        assert_eq!(copy.column(0).collect::<Vec<_>>(), vec![(1, 7.0)]);
    }

    #[test]
    fn assignment_checks_rows_and_columns() {
        let mut lp = two_by_two();
        lp.set_mat_row(0, &[0, 1], &[1.0, -1.0]).unwrap();
        lp.set_row_bounds(0, Bound::Lower(0.0)).unwrap();
        lp.set_row_bounds(1, Bound::Upper(10.0)).unwrap();

        assert!(lp.is_satisfied_by(&[2.0, 1.0]));
        assert_eq!(lp.row_activity(0, &[2.0, 1.0]), 1.0);
        assert_eq!(lp.violated_rows(&[1.0, 2.0]), vec![0]);
        assert!(!lp.is_satisfied_by(&[-1.0, -2.0]));
        assert!(!lp.is_satisfied_by(&[1.0]));
    }
}
