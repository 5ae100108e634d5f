//! 在线统计
//!
//! 只保存各观测量的滑动均值和样本数，不保存历史，内存占用与运行时长无关。

// 子模块声明
mod aggregator;
mod running_mean;

// 重新导出公共接口
pub use aggregator::{NoSamples, Sample, StatsAggregator, Summary};
pub use running_mean::RunningMean;
