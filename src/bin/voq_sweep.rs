//! 参数扫描：对多个 (n, ρ) 网格点并行运行交换机仿真
//!
//! 每行输出一个网格点的稳态均值（CSV），可选写出完整 JSON 结果表。

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use voq_sim::sim::{SweepConfig, SweepGrid, SweepSpec, WarmupPolicy, run_sweep};

/// `2..10`（左闭右开）、`2..=10` 或 `2,4,8`
#[derive(Debug, Clone)]
struct SizeList(Vec<usize>);

impl FromStr for SizeList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |_| format!("invalid size list: {s}");
        if let Some((lo, hi)) = s.split_once("..=") {
            let lo: usize = lo.trim().parse().map_err(bad)?;
            let hi: usize = hi.trim().parse().map_err(bad)?;
            return Ok(SizeList((lo..=hi).collect()));
        }
        if let Some((lo, hi)) = s.split_once("..") {
            let lo: usize = lo.trim().parse().map_err(bad)?;
            let hi: usize = hi.trim().parse().map_err(bad)?;
            return Ok(SizeList((lo..hi).collect()));
        }
        s.split(',')
            .map(|x| x.trim().parse::<usize>().map_err(bad))
            .collect::<Result<Vec<_>, _>>()
            .map(SizeList)
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "voq-sweep",
    about = "VOQ 交换机参数扫描：按 (n, ρ) 网格并行运行 Max-Weight 调度仿真"
)]
struct Args {
    /// 扫描描述 JSON（sizes/rhos/points 及运行参数），命令行参数优先
    #[arg(long)]
    grid: Option<PathBuf>,
    /// 交换机规模：2..10、2..=10 或 2,4,8
    #[arg(long)]
    sizes: Option<SizeList>,
    /// 流量强度，可逗号分隔多个
    #[arg(long = "rho", value_delimiter = ',')]
    rhos: Vec<f64>,
    #[arg(long)]
    mu: Option<f64>,
    #[arg(long)]
    slots: Option<u64>,
    /// 预热时隙数：整数、auto 或 auto:<scale>
    #[arg(long)]
    warmup: Option<WarmupPolicy>,
    /// 基础种子（每个网格点由它派生独立的种子）
    #[arg(long)]
    seed: Option<u64>,
    /// 工作线程数，0 表示全部可用核
    #[arg(long)]
    threads: Option<usize>,
    /// 某个网格点失败后继续其余网格点
    #[arg(long)]
    keep_going: bool,
    /// JSON 结果中保留最终 VOQ 矩阵
    #[arg(long)]
    keep_matrix: bool,
    /// 输出 JSON 结果表
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    // 初始化 tracing（日志走 stderr，stdout 只输出结果）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let (mut grid, mut config) = match &args.grid {
        Some(path) => {
            let raw = fs::read_to_string(path).expect("read grid");
            let spec: SweepSpec = serde_json::from_str(&raw).expect("parse grid");
            (spec.grid(), spec.config)
        }
        // 默认：n ∈ [2, 10)，ρ = 0.7
        None => (SweepGrid::sizes(2..10, 0.7), SweepConfig::default()),
    };

    if args.sizes.is_some() || !args.rhos.is_empty() {
        let sizes = match &args.sizes {
            Some(SizeList(sizes)) => sizes.clone(),
            None => grid.points().iter().map(|p| p.n).fold(Vec::new(), |mut acc, n| {
                if !acc.contains(&n) {
                    acc.push(n);
                }
                acc
            }),
        };
        let rhos = if args.rhos.is_empty() {
            vec![0.7]
        } else {
            args.rhos.clone()
        };
        grid = SweepGrid::cartesian(&sizes, &rhos);
    }
    if let Some(mu) = args.mu {
        config.mu = mu;
    }
    if let Some(slots) = args.slots {
        config.slots = slots;
    }
    if let Some(warmup) = args.warmup {
        config.warmup = warmup;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    config.keep_going |= args.keep_going;
    config.keep_matrix |= args.keep_matrix;

    let outcome = match run_sweep(&grid, &config, None) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "n,rho,seed,warmup,samples,mean_queue_length,mean_schedule_weight,mean_non_empty_queues,mean_clearing_time,mean_max_voq_length"
    );
    for r in outcome.reports() {
        println!(
            "{},{},{},{},{},{:.6},{:.6},{:.6},{:.6},{:.6}",
            r.n,
            r.rho,
            r.seed,
            r.warmup,
            r.samples,
            r.summary.mean_queue_length,
            r.summary.mean_schedule_weight,
            r.summary.mean_non_empty_queues,
            r.summary.mean_clearing_time,
            r.summary.mean_max_voq_length
        );
    }
    for (entry, err) in outcome.failures() {
        eprintln!("failed n={} rho={}: {err}", entry.point.n, entry.point.rho);
    }

    if let Some(path) = args.out {
        let reports: Vec<_> = outcome.reports().collect();
        let json = serde_json::to_string_pretty(&reports).expect("serialize sweep");
        fs::write(&path, json).expect("write sweep json");
    }
}
