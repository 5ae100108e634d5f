//! 匹配求解器的输入错误
//!
//! 这类错误意味着调用方（调度器）构造了非法矩阵，属于编程错误而非运行时条件。

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    /// 第 `row` 行长度与行数不一致
    #[error("weight matrix is not square: row {row} has {len} entries, expected {n}")]
    NotSquare { row: usize, len: usize, n: usize },
    #[error("weight matrix has a negative entry {weight} at ({row}, {col})")]
    NegativeWeight { row: usize, col: usize, weight: i64 },
}
