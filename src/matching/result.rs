//! 匹配结果
//!
//! 一个完美匹配：输入端口 i 被分配到输出端口 `assignment[i]`，构成 {0..n-1} 上的置换。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matching {
    /// input -> output
    assignment: Vec<usize>,
    /// 该匹配在求解时权重矩阵上的总权重
    weight: i64,
}

impl Matching {
    pub(crate) fn new(assignment: Vec<usize>, weight: i64) -> Self {
        Self { assignment, weight }
    }

    pub fn n(&self) -> usize {
        self.assignment.len()
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn output_of(&self, input: usize) -> Option<usize> {
        self.assignment.get(input).copied()
    }

    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    /// 按输入端口顺序返回 (input, output) 对。
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.assignment.iter().copied().enumerate()
    }

    /// 是否为 {0..n-1} 上的双射（每个输出恰好被一个输入占用）。
    pub fn is_permutation(&self) -> bool {
        let n = self.assignment.len();
        let mut seen = vec![false; n];
        for &out in &self.assignment {
            if out >= n || seen[out] {
                return false;
            }
            seen[out] = true;
        }
        true
    }
}
