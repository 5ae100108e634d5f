//! Max-Weight Matching 调度器
//!
//! 交换机非空且服务试验 Bernoulli(μ) 成功时，在当前 VOQ 矩阵上求最大权完美匹配，
//! 然后对每个匹配对 (i, j)：若 `Q[i][j] > 0` 则出队一个 packet，并把出队前的长度
//! 计入本时隙的调度权重；`Q[i][j] == 0` 的匹配对直接跳过。
//! 因此实际并行服务数为“匹配中非空 VOQ 的个数”，不会被完美匹配强制为 n。

use rand::Rng;
use rand::distributions::{Bernoulli, BernoulliError, Distribution};
use serde::Serialize;
use tracing::trace;

use crate::matching::{Matching, MatchingError, max_weight_matching};

use super::voq::VoqState;

/// 一个时隙的服务结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Service {
    /// 本时隙是否真正进行了调度（交换机非空且服务试验成功）
    pub attempted: bool,
    /// 求解得到的匹配；未调度时为 `None`
    pub matching: Option<Matching>,
    /// 被服务 VOQ 的出队前长度之和
    pub weight: u64,
    /// 出队的 packet 数
    pub served: u64,
}

impl Service {
    pub fn idle() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MaxWeightScheduler {
    mu: f64,
    trial: Bernoulli,
}

impl MaxWeightScheduler {
    /// `mu` 为服务试验成功概率，必须在 [0, 1] 内。
    pub fn new(mu: f64) -> Result<Self, BernoulliError> {
        Ok(Self {
            mu,
            trial: Bernoulli::new(mu)?,
        })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// 执行一个时隙的服务。
    ///
    /// 交换机为空时直接返回，不消耗随机数，也不调用匹配求解器。
    pub fn serve<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        voq: &mut VoqState,
    ) -> Result<Service, MatchingError> {
        if voq.is_empty() || !self.trial.sample(rng) {
            return Ok(Service::idle());
        }

        let matching = max_weight_matching(&voq.weight_matrix())?;

        let mut weight = 0u64;
        let mut served = 0u64;
        for (input, output) in matching.pairs() {
            if let Some(before) = voq.dequeue(input, output) {
                trace!(input, output, before, "服务 VOQ");
                weight = weight.saturating_add(before);
                served += 1;
            }
        }

        Ok(Service {
            attempted: true,
            matching: Some(matching),
            weight,
            served,
        })
    }
}
