//! 仿真核心模块
//!
//! 此模块包含时隙驱动仿真的核心组件：参数校验、单次运行驱动、逐时隙轨迹与参数扫描。

// 子模块声明
mod driver;
mod error;
mod params;
mod sweep;
mod trace;

// 重新导出公共接口
pub use driver::{RunReport, SlotObserver, SlotRecord, SwitchSim, run, run_observed};
pub use error::SimError;
pub use params::{DEFAULT_MU, DEFAULT_SLOTS, RunConfig, TrafficParams, WarmupPolicy};
pub use sweep::{
    GridPoint, SweepConfig, SweepEntry, SweepGrid, SweepOutcome, SweepSpec, point_seed, run_sweep,
};
pub use trace::{SlotEvent, SlotTrace};
