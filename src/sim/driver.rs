//! 仿真驱动
//!
//! 每个时隙严格按顺序执行：到达 → 服务（Max-Weight 调度）→ 采样（预热之后）。
//! 随机数流由种子显式构造，同一配置总是得到逐位相同的轨迹。

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::stats::{NoSamples, Sample, StatsAggregator, Summary};
use crate::switch::{BernoulliArrivals, MaxWeightScheduler, Service, VoqState};

use super::error::SimError;
use super::params::{RunConfig, TrafficParams};

/// 一个时隙发生的事情
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotRecord {
    pub slot: u64,
    pub arrivals: u64,
    pub service: Service,
    /// 服务之后的观测量
    pub sample: Sample,
}

/// 时隙回调：每个时隙结束后调用，可用于逐时隙记录。
pub trait SlotObserver {
    fn on_slot(&mut self, record: &SlotRecord, voq: &VoqState);
}

struct NoObserver;

impl SlotObserver for NoObserver {
    fn on_slot(&mut self, _record: &SlotRecord, _voq: &VoqState) {}
}

/// 单个交换机的运行状态：VOQ、到达过程、调度器和随机数流。
#[derive(Debug, Clone)]
pub struct SwitchSim {
    params: TrafficParams,
    voq: VoqState,
    arrivals: BernoulliArrivals,
    scheduler: MaxWeightScheduler,
    rng: StdRng,
    next_slot: u64,
}

impl SwitchSim {
    pub fn new(params: TrafficParams, seed: u64) -> Result<Self, SimError> {
        let arrivals = BernoulliArrivals::new(params.lambda()).map_err(|_| {
            SimError::invalid("lambda", params.lambda(), "arrival probability out of range")
        })?;
        let scheduler = MaxWeightScheduler::new(params.mu()).map_err(|_| {
            SimError::invalid("mu", params.mu(), "service probability out of range")
        })?;
        Ok(Self {
            params,
            voq: VoqState::new(params.n()),
            arrivals,
            scheduler,
            rng: StdRng::seed_from_u64(seed),
            next_slot: 0,
        })
    }

    pub fn params(&self) -> &TrafficParams {
        &self.params
    }

    pub fn voq(&self) -> &VoqState {
        &self.voq
    }

    /// 下一个要执行的时隙编号（即已执行的时隙数）
    pub fn next_slot(&self) -> u64 {
        self.next_slot
    }

    /// 执行一个时隙。
    pub fn step(&mut self) -> Result<SlotRecord, SimError> {
        let slot = self.next_slot;
        let arrivals = self.arrivals.arrive(&mut self.rng, &mut self.voq);
        let service = self.scheduler.serve(&mut self.rng, &mut self.voq)?;
        let sample = self.voq.sample(service.weight);
        self.next_slot += 1;

        debug!(
            slot,
            arrivals,
            served = service.served,
            weight = service.weight,
            size = sample.queue_length,
            "时隙完成"
        );

        Ok(SlotRecord {
            slot,
            arrivals,
            service,
            sample,
        })
    }
}

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub n: usize,
    pub rho: f64,
    pub mu: f64,
    pub seed: u64,
    pub slots: u64,
    pub warmup: u64,
    /// 折叠进均值的样本数
    pub samples: u64,
    #[serde(flatten)]
    pub summary: Summary,
    /// 运行结束时的 VOQ 矩阵（诊断用）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub final_voq: Vec<Vec<u64>>,
}

/// 按配置执行一次完整运行。
pub fn run(config: &RunConfig) -> Result<RunReport, SimError> {
    run_observed(config, &mut NoObserver)
}

/// 同 [`run`]，但每个时隙结束后回调 `observer`。
#[tracing::instrument(skip(config, observer), fields(n = config.n, rho = config.rho, seed = config.seed))]
pub fn run_observed(
    config: &RunConfig,
    observer: &mut dyn SlotObserver,
) -> Result<RunReport, SimError> {
    let (params, warmup) = config.validate()?;
    if warmup >= config.slots {
        // 预热覆盖整个运行，不可能有样本
        return Err(NoSamples { warmup }.into());
    }
    let mut stats = StatsAggregator::new(warmup);

    let mut sim = SwitchSim::new(params, config.seed)?;

    info!(
        lambda = params.lambda(),
        mu = params.mu(),
        slots = config.slots,
        warmup,
        "▶️  开始运行仿真"
    );

    for _ in 0..config.slots {
        let record = sim.step()?;
        stats.observe(record.slot, &record.sample);
        observer.on_slot(&record, sim.voq());
    }

    let summary = stats.summary()?;

    info!(
        samples = stats.count(),
        mean_queue_length = summary.mean_queue_length,
        mean_schedule_weight = summary.mean_schedule_weight,
        final_size = sim.voq().size(),
        "✅ 仿真完成"
    );

    Ok(RunReport {
        n: params.n(),
        rho: params.rho(),
        mu: params.mu(),
        seed: config.seed,
        slots: config.slots,
        warmup,
        samples: stats.count(),
        summary,
        final_voq: sim.voq().rows(),
    })
}
