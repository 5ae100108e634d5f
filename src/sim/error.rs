//! 仿真错误
//!
//! 所有错误都是配置或编程错误的确定性结果，不做重试。

use thiserror::Error;

use crate::matching::MatchingError;
use crate::stats::NoSamples;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// 参数越界，在创建任何状态之前报告
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error(transparent)]
    Matching(#[from] MatchingError),
    #[error(transparent)]
    NoSamples(#[from] NoSamples),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        SimError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
