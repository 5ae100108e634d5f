//! 输入排队交换机（Input-queued switch）
//!
//! n×n crossbar：每个输入端口维护 n 个 VOQ（每个输出端口一个）。
//! 每个时隙先处理到达，再由 Max-Weight 调度器选出无冲突的输入-输出匹配并服务。

// 子模块声明
mod arrival;
mod scheduler;
mod voq;

// 重新导出公共接口
pub use arrival::BernoulliArrivals;
pub use scheduler::{MaxWeightScheduler, Service};
pub use voq::VoqState;
