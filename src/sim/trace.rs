//! 逐时隙轨迹记录（用于离线画 q(t)、W(t) 等曲线或逐步检查调度）
//!
//! 统计聚合器本身不保存历史；需要时间序列时挂一个 `SlotTrace` 观察者，
//! 可以用 `limit` 限制记录的时隙数，避免长时间运行占用过多内存。

use serde::Serialize;

use crate::stats::Sample;
use crate::switch::VoqState;

use super::driver::{SlotObserver, SlotRecord};

/// 一个时隙的轨迹记录（JSON）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotEvent {
    pub slot: u64,
    pub arrivals: u64,
    /// 是否进行了调度
    pub scheduled: bool,
    /// input -> output；未调度时省略
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching: Option<Vec<usize>>,
    pub served: u64,
    #[serde(flatten)]
    pub sample: Sample,
    /// 服务之后的 VOQ 矩阵
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voq: Option<Vec<Vec<u64>>>,
}

/// 一个简单的轨迹收集器（存内存，运行结束写 JSON 文件）
#[derive(Debug, Default)]
pub struct SlotTrace {
    pub events: Vec<SlotEvent>,
    limit: Option<usize>,
    with_matrix: bool,
}

impl SlotTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只记录前 `limit` 个时隙
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// 每条记录附带完整的 VOQ 矩阵
    pub fn with_matrix(mut self, with_matrix: bool) -> Self {
        self.with_matrix = with_matrix;
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}

impl SlotObserver for SlotTrace {
    fn on_slot(&mut self, record: &SlotRecord, voq: &VoqState) {
        if self.limit.is_some_and(|limit| self.events.len() >= limit) {
            return;
        }
        self.events.push(SlotEvent {
            slot: record.slot,
            arrivals: record.arrivals,
            scheduled: record.service.attempted,
            matching: record
                .service
                .matching
                .as_ref()
                .map(|m| m.assignment().to_vec()),
            served: record.service.served,
            sample: record.sample,
            voq: self.with_matrix.then(|| voq.rows()),
        });
    }
}
