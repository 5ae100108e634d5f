//! 单个 n×n 交换机仿真
//!
//! 运行一次 Max-Weight 调度的 VOQ 交换机仿真，打印稳态统计量。

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use voq_sim::sim::{RunConfig, SlotTrace, WarmupPolicy, run, run_observed};

#[derive(Debug, Parser)]
#[command(
    name = "voq-switch",
    about = "VOQ 交换机仿真：Max-Weight Matching 调度，输出稳态均值"
)]
struct Args {
    /// 运行配置 JSON（字段与命令行参数同名），命令行参数优先
    #[arg(long)]
    config: Option<PathBuf>,
    /// 交换机规模 n
    #[arg(short, long)]
    n: Option<usize>,
    /// 流量强度 ρ ∈ [0, 1)
    #[arg(long)]
    rho: Option<f64>,
    /// 服务试验成功概率 μ ∈ [0, 1]
    #[arg(long)]
    mu: Option<f64>,
    /// 总时隙数
    #[arg(long)]
    slots: Option<u64>,
    /// 预热时隙数：整数、auto 或 auto:<scale>
    #[arg(long)]
    warmup: Option<WarmupPolicy>,
    #[arg(long)]
    seed: Option<u64>,
    /// 输出运行结果 JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// 输出逐时隙轨迹 JSON
    #[arg(long)]
    trace_json: Option<PathBuf>,
    /// 轨迹最多记录的时隙数
    #[arg(long)]
    trace_limit: Option<usize>,
    /// 轨迹中附带每个时隙的 VOQ 矩阵
    #[arg(long)]
    trace_matrix: bool,
    /// 打印最终 VOQ 矩阵
    #[arg(long)]
    show_matrix: bool,
}

fn main() {
    // 初始化 tracing（日志走 stderr，stdout 只输出结果）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path).expect("read config");
            serde_json::from_str::<RunConfig>(&raw).expect("parse config")
        }
        None => RunConfig::new(15, 0.7),
    };
    if let Some(n) = args.n {
        config.n = n;
    }
    if let Some(rho) = args.rho {
        config.rho = rho;
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

    // 只有需要输出轨迹时才记录逐时隙数据
    let mut trace = args.trace_json.as_ref().map(|_| {
        let trace = SlotTrace::new().with_matrix(args.trace_matrix);
        match args.trace_limit {
            Some(limit) => trace.with_limit(limit),
            None => trace,
        }
    });

    let result = match trace.as_mut() {
        Some(trace) => run_observed(&config, trace),
        None => run(&config),
    };
    let report = match result {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    println!("n={}", report.n);
    println!("rho={}", report.rho);
    println!("mu={}", report.mu);
    println!("slots={}", report.slots);
    println!("warmup={}", report.warmup);
    println!("samples={}", report.samples);
    println!("mean_queue_length={:.6}", report.summary.mean_queue_length);
    println!("mean_schedule_weight={:.6}", report.summary.mean_schedule_weight);
    println!("mean_non_empty_queues={:.6}", report.summary.mean_non_empty_queues);
    println!("mean_clearing_time={:.6}", report.summary.mean_clearing_time);
    println!("mean_max_voq_length={:.6}", report.summary.mean_max_voq_length);

    if args.show_matrix {
        for row in &report.final_voq {
            let cells: Vec<String> = row.iter().map(|x| x.to_string()).collect();
            println!("{}", cells.join(" "));
        }
    }

    if let Some(path) = args.json {
        let json = serde_json::to_string_pretty(&report).expect("serialize report");
        fs::write(&path, json).expect("write report json");
    }

    if let (Some(path), Some(trace)) = (args.trace_json, trace) {
        let json = trace.to_json().expect("serialize trace");
        fs::write(&path, json).expect("write trace json");
        eprintln!("wrote {} slot events to {}", trace.events.len(), path.display());
    }
}
