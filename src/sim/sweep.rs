//! 参数扫描
//!
//! 对一组 (n, ρ) 网格点各做一次独立运行。不同网格点之间没有共享状态，
//! 按可用核数并行执行；结果表按网格下标索引，返回时保持网格顺序。
//!
//! 每个网格点的种子由基础种子和网格下标混合得到，与线程调度无关，
//! 因此并行与串行执行得到相同的结果。

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::driver::{RunReport, run};
use super::error::SimError;
use super::params::{DEFAULT_MU, DEFAULT_SLOTS, RunConfig, TrafficParams, WarmupPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub n: usize,
    pub rho: f64,
}

/// 有序的网格点序列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SweepGrid {
    points: Vec<GridPoint>,
}

impl SweepGrid {
    pub fn from_points(points: Vec<GridPoint>) -> Self {
        Self { points }
    }

    /// 固定 ρ，扫描交换机规模
    pub fn sizes(ns: impl IntoIterator<Item = usize>, rho: f64) -> Self {
        Self::from_points(ns.into_iter().map(|n| GridPoint { n, rho }).collect())
    }

    /// 固定 n，扫描流量强度
    pub fn intensities(n: usize, rhos: impl IntoIterator<Item = f64>) -> Self {
        Self::from_points(rhos.into_iter().map(|rho| GridPoint { n, rho }).collect())
    }

    /// n 为外层、ρ 为内层的笛卡尔积
    pub fn cartesian(ns: &[usize], rhos: &[f64]) -> Self {
        let points = ns
            .iter()
            .flat_map(|&n| rhos.iter().map(move |&rho| GridPoint { n, rho }))
            .collect();
        Self::from_points(points)
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 所有网格点共享的运行参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_mu")]
    pub mu: f64,
    #[serde(default = "default_slots")]
    pub slots: u64,
    #[serde(default)]
    pub warmup: WarmupPolicy,
    /// 基础种子
    #[serde(default)]
    pub seed: u64,
    /// 工作线程数，0 表示使用全部可用核
    #[serde(default)]
    pub threads: usize,
    /// 某个网格点失败后是否继续
    #[serde(default)]
    pub keep_going: bool,
    /// 结果中是否保留最终 VOQ 矩阵
    #[serde(default)]
    pub keep_matrix: bool,
}

fn default_mu() -> f64 {
    DEFAULT_MU
}

fn default_slots() -> u64 {
    DEFAULT_SLOTS
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            mu: DEFAULT_MU,
            slots: DEFAULT_SLOTS,
            warmup: WarmupPolicy::default(),
            seed: 0,
            threads: 0,
            keep_going: false,
            keep_matrix: false,
        }
    }
}

impl SweepConfig {
    /// 第 `index` 个网格点的运行配置
    pub fn run_config(&self, index: usize, point: GridPoint) -> RunConfig {
        RunConfig::new(point.n, point.rho)
            .with_mu(self.mu)
            .with_slots(self.slots)
            .with_warmup(self.warmup)
            .with_seed(point_seed(self.seed, index))
    }

    fn workers(&self, points: usize) -> usize {
        let available = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let wanted = if self.threads == 0 {
            available
        } else {
            self.threads
        };
        wanted.clamp(1, points.max(1))
    }
}

/// 扫描描述文件：`sizes × rhos` 的笛卡尔积，或显式列出 `points`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub schema_version: u32,
    #[serde(default)]
    pub sizes: Vec<usize>,
    #[serde(default)]
    pub rhos: Vec<f64>,
    #[serde(default)]
    pub points: Vec<GridPoint>,
    #[serde(flatten)]
    pub config: SweepConfig,
}

impl SweepSpec {
    pub fn grid(&self) -> SweepGrid {
        if self.points.is_empty() {
            SweepGrid::cartesian(&self.sizes, &self.rhos)
        } else {
            SweepGrid::from_points(self.points.clone())
        }
    }
}

/// 一个网格点的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SweepEntry {
    pub index: usize,
    pub point: GridPoint,
    pub seed: u64,
    pub outcome: Result<RunReport, SimError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepOutcome {
    /// 按网格顺序排列的已完成网格点
    pub entries: Vec<SweepEntry>,
    /// 是否因外部停止信号提前结束
    pub interrupted: bool,
}

impl SweepOutcome {
    pub fn reports(&self) -> impl Iterator<Item = &RunReport> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&SweepEntry, &SimError)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (e, err)))
    }
}

/// 网格点种子：splitmix64(base ⊕ index·φ)
pub fn point_seed(base: u64, index: usize) -> u64 {
    mix64(base ^ (index as u64).wrapping_mul(0x9E3779B97F4A7C15))
}

/// 执行扫描。
///
/// `stop` 在两次运行之间检查；置位后不再开始新的网格点，已完成的结果原样返回。
/// 未开启 `keep_going` 时，任意网格点失败会停止分发新任务，并返回网格顺序上
/// 第一个失败的错误；所有网格点的参数在开始前统一校验。
#[tracing::instrument(skip_all, fields(points = grid.len(), seed = config.seed))]
pub fn run_sweep(
    grid: &SweepGrid,
    config: &SweepConfig,
    stop: Option<&AtomicBool>,
) -> Result<SweepOutcome, SimError> {
    if !config.keep_going {
        for point in grid.points() {
            TrafficParams::new(point.n, point.rho, config.mu)?;
        }
    }

    let workers = config.workers(grid.len());
    info!(workers, "开始参数扫描");

    let cursor = AtomicUsize::new(0);
    let abort = AtomicBool::new(false);
    let table: Mutex<BTreeMap<usize, SweepEntry>> = Mutex::new(BTreeMap::new());

    std::thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| {
                loop {
                    if abort.load(Ordering::Relaxed)
                        || stop.is_some_and(|flag| flag.load(Ordering::Relaxed))
                    {
                        break;
                    }
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(&point) = grid.points().get(index) else {
                        break;
                    };

                    let run_cfg = config.run_config(index, point);
                    let outcome = run(&run_cfg).map(|mut report| {
                        if !config.keep_matrix {
                            report.final_voq.clear();
                        }
                        report
                    });

                    match &outcome {
                        Ok(report) => info!(
                            n = point.n,
                            rho = point.rho,
                            mean_queue_length = report.summary.mean_queue_length,
                            "网格点完成"
                        ),
                        Err(err) if config.keep_going => {
                            warn!(n = point.n, rho = point.rho, %err, "网格点失败，继续")
                        }
                        Err(_) => abort.store(true, Ordering::Relaxed),
                    }

                    table
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .insert(
                            index,
                            SweepEntry {
                                index,
                                point,
                                seed: run_cfg.seed,
                                outcome,
                            },
                        );
                }
            });
        }
    });

    let entries: Vec<SweepEntry> = table
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .into_values()
        .collect();

    if !config.keep_going {
        if let Some(err) = entries.iter().find_map(|e| e.outcome.as_ref().err()) {
            return Err(err.clone());
        }
    }

    let interrupted = entries.len() < grid.len();
    if interrupted {
        warn!(completed = entries.len(), total = grid.len(), "参数扫描被中断");
    }
    Ok(SweepOutcome {
        entries,
        interrupted,
    })
}

/// 一个简单、确定性的 64-bit mixing（splitmix64）。
fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
