//! Bernoulli 到达过程
//!
//! 每个时隙对 n×n 网格中的每个 VOQ 做一次独立的 Bernoulli(λ) 试验，
//! 成功则该 VOQ 到达一个 packet。试验按行主序进行，保证同一随机流下结果可复现。

use rand::Rng;
use rand::distributions::{Bernoulli, BernoulliError, Distribution};
use tracing::trace;

use super::voq::VoqState;

#[derive(Debug, Clone, Copy)]
pub struct BernoulliArrivals {
    lambda: f64,
    trial: Bernoulli,
}

impl BernoulliArrivals {
    /// `lambda` 必须在 [0, 1] 内。
    pub fn new(lambda: f64) -> Result<Self, BernoulliError> {
        Ok(Self {
            lambda,
            trial: Bernoulli::new(lambda)?,
        })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// 执行一个时隙的到达，返回到达的 packet 数。
    pub fn arrive<R: Rng + ?Sized>(&self, rng: &mut R, voq: &mut VoqState) -> u64 {
        let n = voq.n();
        let mut arrivals = 0u64;
        for input in 0..n {
            for output in 0..n {
                if self.trial.sample(rng) {
                    voq.enqueue(input, output);
                    arrivals += 1;
                }
            }
        }
        trace!(arrivals, size = voq.size(), "到达处理完成");
        arrivals
    }
}
