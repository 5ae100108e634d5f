//! 统计聚合器
//!
//! 从预热阈值 `warmup` 对应的时隙开始，把每个时隙的样本折叠进五个滑动均值。
//! 阈值之前的样本直接丢弃（系统尚未进入稳态）。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::running_mean::RunningMean;

/// 单个时隙的观测量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// 总队列长度 `size`
    pub queue_length: u64,
    /// 调度权重（被服务 VOQ 出队前长度之和）
    pub schedule_weight: u64,
    pub non_empty_queues: u64,
    /// max(最大行和, 最大列和)
    pub clearing_time: u64,
    /// 最长单个 VOQ
    pub max_voq_length: u64,
}

/// 五个观测量的稳态均值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub mean_queue_length: f64,
    pub mean_schedule_weight: f64,
    pub mean_non_empty_queues: f64,
    pub mean_clearing_time: f64,
    #[serde(rename = "meanMaxVOQLength")]
    pub mean_max_voq_length: f64,
}

/// 预热后没有任何样本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no samples collected after warm-up (warmup={warmup}); lengthen the run or lower the warm-up")]
pub struct NoSamples {
    pub warmup: u64,
}

#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    warmup: u64,
    queue_length: RunningMean,
    schedule_weight: RunningMean,
    non_empty_queues: RunningMean,
    clearing_time: RunningMean,
    max_voq_length: RunningMean,
}

impl StatsAggregator {
    pub fn new(warmup: u64) -> Self {
        Self {
            warmup,
            ..Self::default()
        }
    }

    pub fn warmup(&self) -> u64 {
        self.warmup
    }

    /// 已折叠的样本数
    pub fn count(&self) -> u64 {
        self.queue_length.count()
    }

    /// 记录时隙 `slot` 的样本；`slot < warmup` 时丢弃并返回 `false`。
    pub fn observe(&mut self, slot: u64, sample: &Sample) -> bool {
        if slot < self.warmup {
            return false;
        }
        self.queue_length.push(sample.queue_length as f64);
        self.schedule_weight.push(sample.schedule_weight as f64);
        self.non_empty_queues.push(sample.non_empty_queues as f64);
        self.clearing_time.push(sample.clearing_time as f64);
        self.max_voq_length.push(sample.max_voq_length as f64);
        true
    }

    pub fn summary(&self) -> Result<Summary, NoSamples> {
        let no_samples = NoSamples {
            warmup: self.warmup,
        };
        Ok(Summary {
            mean_queue_length: self.queue_length.mean().ok_or(no_samples)?,
            mean_schedule_weight: self.schedule_weight.mean().ok_or(no_samples)?,
            mean_non_empty_queues: self.non_empty_queues.mean().ok_or(no_samples)?,
            mean_clearing_time: self.clearing_time.mean().ok_or(no_samples)?,
            mean_max_voq_length: self.max_voq_length.mean().ok_or(no_samples)?,
        })
    }
}
