//! VOQ 状态
//!
//! n×n 的队列长度矩阵 `Q[i][j]`：输入 i 上发往输出 j 的单位长度 packet 数。
//! `size` 增量维护，任何时候都等于矩阵元素之和。

use serde::Serialize;

use crate::stats::Sample;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoqState {
    n: usize,
    /// 行主序存储，`q[i * n + j]`
    q: Vec<u64>,
    size: u64,
}

impl VoqState {
    /// 创建一个全空的 n×n 交换机。
    pub fn new(n: usize) -> Self {
        Self {
            n,
            q: vec![0; n.saturating_mul(n)],
            size: 0,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// 所有 VOQ 的总长度
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, input: usize, output: usize) -> u64 {
        self.q[self.idx(input, output)]
    }

    /// 一个 packet 到达 VOQ (input, output)。
    pub fn enqueue(&mut self, input: usize, output: usize) {
        let idx = self.idx(input, output);
        self.q[idx] = self.q[idx].saturating_add(1);
        self.size = self.size.saturating_add(1);
    }

    /// 从 VOQ (input, output) 服务一个 packet。
    ///
    /// 队列非空时返回出队前的长度；空队列不做任何修改，返回 `None`。
    pub fn dequeue(&mut self, input: usize, output: usize) -> Option<u64> {
        let idx = self.idx(input, output);
        let before = self.q[idx];
        if before == 0 {
            return None;
        }
        self.q[idx] = before - 1;
        self.size -= 1;
        Some(before)
    }

    /// 清空所有 VOQ（新一次运行开始时调用）。
    pub fn reset(&mut self) {
        self.q.fill(0);
        self.size = 0;
    }

    /// 每个输入端口的积压 `R[i]`
    pub fn row_sums(&self) -> Vec<u64> {
        if self.n == 0 {
            return Vec::new();
        }
        self.q.chunks(self.n).map(|row| row.iter().sum()).collect()
    }

    /// 每个输出端口的积压 `C[j]`
    pub fn col_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.n];
        if self.n == 0 {
            return sums;
        }
        for row in self.q.chunks(self.n) {
            for (s, &x) in sums.iter_mut().zip(row) {
                *s += x;
            }
        }
        sums
    }

    pub fn non_empty_queues(&self) -> u64 {
        self.q.iter().filter(|&&x| x > 0).count() as u64
    }

    pub fn max_voq_length(&self) -> u64 {
        self.q.iter().copied().max().unwrap_or(0)
    }

    /// 清空时间：最大行和与最大列和中的较大者。
    pub fn clearing_time(&self) -> u64 {
        let max_row = self.row_sums().into_iter().max().unwrap_or(0);
        let max_col = self.col_sums().into_iter().max().unwrap_or(0);
        max_row.max(max_col)
    }

    /// 采样本时隙的五个观测量。
    pub fn sample(&self, schedule_weight: u64) -> Sample {
        Sample {
            queue_length: self.size,
            schedule_weight,
            non_empty_queues: self.non_empty_queues(),
            clearing_time: self.clearing_time(),
            max_voq_length: self.max_voq_length(),
        }
    }

    /// 重新求和（用于校验 `size` 的增量维护）。
    pub fn recount(&self) -> u64 {
        self.q.iter().sum()
    }

    /// 供匹配求解器使用的权重矩阵。
    pub fn weight_matrix(&self) -> Vec<Vec<i64>> {
        self.rows()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|x| i64::try_from(x).unwrap_or(i64::MAX))
                    .collect()
            })
            .collect()
    }

    /// 以二维矩阵形式返回当前状态（诊断/输出用）。
    pub fn rows(&self) -> Vec<Vec<u64>> {
        if self.n == 0 {
            return Vec::new();
        }
        self.q.chunks(self.n).map(|row| row.to_vec()).collect()
    }

    fn idx(&self, input: usize, output: usize) -> usize {
        debug_assert!(input < self.n && output < self.n);
        input * self.n + output
    }
}
