//! 线性规划能力接口。
//!
//! 本 crate 不求解 LP，只负责把网结构写成稀疏矩阵与行界；求解器通过实现
//! [`LinearProgram`] 接入。行列下标从 0 开始，0 号行列由调用方约定为保留位。
use thiserror::Error;

pub mod sparse;

pub use sparse::SparseLp;

#[derive(Debug, Error, PartialEq)]
pub enum LpError {
    #[error("row {row} is out of bounds ({rows} rows)")]
    RowOutOfBounds { row: usize, rows: usize },
    #[error("column {col} is out of bounds ({cols} columns)")]
    ColumnOutOfBounds { col: usize, cols: usize },
    #[error("sparse vector has {indices} indices but {values} values")]
    LengthMismatch { indices: usize, values: usize },
    #[error("index {0} appears twice in one sparse vector")]
    DuplicateIndex(usize),
    #[error("invalid bounds [{lower}, {upper}]")]
    InvalidBounds { lower: f64, upper: f64 },
}

/// 行或列的界类型，无穷界以 `f64::INFINITY` 表示。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Bound {
    #[default]
    Free,
    Lower(f64),
    Upper(f64),
    Double(f64, f64),
    Fixed(f64),
}

impl Bound {
    pub fn lower(self) -> f64 {
        match self {
            Bound::Lower(lb) | Bound::Double(lb, _) | Bound::Fixed(lb) => lb,
            Bound::Free | Bound::Upper(_) => f64::NEG_INFINITY,
        }
    }

    pub fn upper(self) -> f64 {
        match self {
            Bound::Upper(ub) | Bound::Double(_, ub) | Bound::Fixed(ub) => ub,
            Bound::Free | Bound::Lower(_) => f64::INFINITY,
        }
    }

    pub fn contains(self, value: f64, tolerance: f64) -> bool {
        value >= self.lower() - tolerance && value <= self.upper() + tolerance
    }

    fn validate(self) -> Result<Self, LpError> {
        let (lower, upper) = (self.lower(), self.upper());
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(LpError::InvalidBounds { lower, upper });
        }
        Ok(self)
    }
}

/// 求解器侧的问题句柄。
///
/// `set_mat_col`/`set_mat_row` 以「下标表 + 数值表」给出稀疏向量，并整体替换
/// 该列/行原有的非零项。
pub trait LinearProgram: Sized {
    /// 分配一个空问题；后端无法分配时返回 `None`。
    fn create() -> Option<Self>;

    /// 深拷贝，此后与 `self` 互不影响。
    fn copy(&self) -> Self;

    fn num_rows(&self) -> usize;

    fn num_cols(&self) -> usize;

    /// 追加 `count` 个无界行，返回第一行的编号。
    fn add_rows(&mut self, count: usize) -> usize;

    /// 追加 `count` 个下界为零的列，返回第一列的编号。
    fn add_cols(&mut self, count: usize) -> usize;

    fn set_mat_col(&mut self, col: usize, rows: &[usize], values: &[f64]) -> Result<(), LpError>;

    fn set_mat_row(&mut self, row: usize, cols: &[usize], values: &[f64]) -> Result<(), LpError>;

    fn set_row_bounds(&mut self, row: usize, bound: Bound) -> Result<(), LpError>;

    fn set_col_bounds(&mut self, col: usize, bound: Bound) -> Result<(), LpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_bound_reports_infinite_side() {
        let bound = Bound::Lower(-3.0);
        assert_eq!(bound.lower(), -3.0);
        assert_eq!(bound.upper(), f64::INFINITY);
        assert!(bound.contains(1e12, 0.0));
        assert!(!bound.contains(-3.5, 1e-9));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(Bound::Double(1.0, 2.0).validate().is_ok());
        assert_eq!(
            Bound::Double(2.0, 1.0).validate(),
            Err(LpError::InvalidBounds {
                lower: 2.0,
                upper: 1.0
            })
        );
    }
}
