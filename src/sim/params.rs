//! 运行参数
//!
//! `TrafficParams` 是经过校验的 (n, ρ, μ)；`RunConfig` 是一次运行的完整配置，
//! 可由 JSON 反序列化（缺省字段取默认值），也可由命令行拼装。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::SimError;

pub const DEFAULT_MU: f64 = 1.0;
pub const DEFAULT_SLOTS: u64 = 10_000;

/// 校验过的流量参数，单次运行期间不可变。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficParams {
    n: usize,
    rho: f64,
    mu: f64,
}

impl TrafficParams {
    /// 要求 `n ≥ 1`，`ρ ∈ [0, 1)`，`μ ∈ [0, 1]`。
    pub fn new(n: usize, rho: f64, mu: f64) -> Result<Self, SimError> {
        if n == 0 {
            return Err(SimError::invalid("n", n, "switch size must be at least 1"));
        }
        if !(rho.is_finite() && (0.0..1.0).contains(&rho)) {
            return Err(SimError::invalid(
                "rho",
                rho,
                "traffic intensity must lie in [0, 1)",
            ));
        }
        if !(mu.is_finite() && (0.0..=1.0).contains(&mu)) {
            return Err(SimError::invalid(
                "mu",
                mu,
                "service probability must lie in [0, 1]",
            ));
        }
        Ok(Self { n, rho, mu })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// 每个 VOQ 的到达概率 λ = ρ / n。
    ///
    /// 每行、每列的期望到达率都是 nλ = ρ < 1（双次随机）。
    pub fn lambda(&self) -> f64 {
        self.rho / self.n as f64
    }
}

/// 预热（稳态前）时隙数的取法
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WarmupPolicy {
    /// 固定的时隙数
    Fixed(u64),
    /// `ceil(scale · n² / (1 − ρ)²)`
    Heuristic { scale: f64 },
}

impl Default for WarmupPolicy {
    fn default() -> Self {
        WarmupPolicy::Heuristic { scale: 1.0 }
    }
}

impl WarmupPolicy {
    /// 对给定 (n, ρ) 求出预热时隙数。
    pub fn resolve(&self, n: usize, rho: f64) -> Result<u64, SimError> {
        match *self {
            WarmupPolicy::Fixed(k) => Ok(k),
            WarmupPolicy::Heuristic { scale } => {
                if !(scale.is_finite() && scale >= 0.0) {
                    return Err(SimError::invalid(
                        "warmup",
                        self,
                        "heuristic scale must be finite and non-negative",
                    ));
                }
                let n = n as f64;
                let gap = 1.0 - rho;
                let k = (scale * n * n / (gap * gap)).ceil();
                // 超出 u64 范围时按饱和处理
                Ok(if k >= u64::MAX as f64 { u64::MAX } else { k as u64 })
            }
        }
    }
}

impl fmt::Display for WarmupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarmupPolicy::Fixed(k) => write!(f, "{k}"),
            WarmupPolicy::Heuristic { scale } if *scale == 1.0 => write!(f, "auto"),
            WarmupPolicy::Heuristic { scale } => write!(f, "auto:{scale}"),
        }
    }
}

/// 命令行写法：整数、`auto` 或 `auto:<scale>`
impl FromStr for WarmupPolicy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "auto" {
            return Ok(WarmupPolicy::default());
        }
        if let Some(scale) = s.strip_prefix("auto:") {
            let scale: f64 = scale
                .parse()
                .map_err(|_| SimError::invalid("warmup", s, "expected auto:<scale>"))?;
            return Ok(WarmupPolicy::Heuristic { scale });
        }
        s.parse::<u64>().map(WarmupPolicy::Fixed).map_err(|_| {
            SimError::invalid("warmup", s, "expected a slot count, auto or auto:<scale>")
        })
    }
}

/// 单次运行的配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub n: usize,
    pub rho: f64,
    #[serde(default = "default_mu")]
    pub mu: f64,
    #[serde(default = "default_slots")]
    pub slots: u64,
    #[serde(default)]
    pub warmup: WarmupPolicy,
    #[serde(default)]
    pub seed: u64,
}

fn default_mu() -> f64 {
    DEFAULT_MU
}

fn default_slots() -> u64 {
    DEFAULT_SLOTS
}

impl RunConfig {
    pub fn new(n: usize, rho: f64) -> Self {
        Self {
            n,
            rho,
            mu: DEFAULT_MU,
            slots: DEFAULT_SLOTS,
            warmup: WarmupPolicy::default(),
            seed: 0,
        }
    }

    pub fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    pub fn with_slots(mut self, slots: u64) -> Self {
        self.slots = slots;
        self
    }

    pub fn with_warmup(mut self, warmup: WarmupPolicy) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// 校验并返回流量参数与预热时隙数。
    pub fn validate(&self) -> Result<(TrafficParams, u64), SimError> {
        let params = TrafficParams::new(self.n, self.rho, self.mu)?;
        if self.slots == 0 {
            return Err(SimError::invalid(
                "slots",
                self.slots,
                "total slot count must be positive",
            ));
        }
        let warmup = self.warmup.resolve(params.n(), params.rho())?;
        Ok((params, warmup))
    }
}
