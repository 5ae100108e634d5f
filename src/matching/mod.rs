//! 二分图匹配（Assignment problem）
//!
//! 提供原生的 Kuhn-Munkres（匈牙利算法）实现：给定 n×n 非负权重矩阵，
//! 返回权重和最大的完美匹配。纯函数、无共享状态，可在多个线程的仿真中并行复用。

// 子模块声明
mod error;
mod hungarian;
mod result;

// 重新导出公共接口
pub use error::MatchingError;
pub use hungarian::max_weight_matching;
pub use result::Matching;
