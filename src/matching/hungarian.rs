//! Kuhn-Munkres（匈牙利算法），O(n³)
//!
//! 对代价矩阵 `-W` 做最小化：维护行/列势 `u`、`v`，每次加入一行后在
//! “紧边”（约化代价为 0 的边）构成的相等子图上搜索增广路；找不到时按最小
//! 松弛量 `delta` 调整势，扩大相等子图。
//!
//! 平局处理是确定性的：同一输入矩阵总是返回同一个置换（列按下标从小到大扫描，
//! 只有严格更小的松弛量才替换当前候选）。

use tracing::trace;

use super::error::MatchingError;
use super::result::Matching;

/// 求最大权完美匹配。
///
/// `weights` 必须是 n×n 且所有元素非负；空矩阵返回空匹配。
/// 即使大量元素为 0，也总是返回完整的置换。
pub fn max_weight_matching(weights: &[Vec<i64>]) -> Result<Matching, MatchingError> {
    validate(weights)?;
    let n = weights.len();
    if n == 0 {
        return Ok(Matching::new(Vec::new(), 0));
    }

    // 内部用 i128 计算，势的累加不会溢出
    const INF: i128 = i128::MAX / 4;
    let cost = |i: usize, j: usize| -> i128 { -(weights[i][j] as i128) };

    // 1-based：下标 0 是虚拟列，用来挂起当前正在插入的行
    let mut u = vec![0i128; n + 1];
    let mut v = vec![0i128; n + 1];
    // p[j]：列 j 当前匹配到的行（0 表示未匹配）
    let mut p = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];
    let mut minv = vec![INF; n + 1];
    let mut used = vec![false; n + 1];

    for row in 1..=n {
        p[0] = row;
        let mut j0 = 0usize;
        minv.fill(INF);
        used.fill(false);

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = INF;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // 沿 way 回溯，翻转增广路
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
        trace!(row = row - 1, "行已加入匹配");
    }

    let mut assignment = vec![0usize; n];
    for j in 1..=n {
        assignment[p[j] - 1] = j - 1;
    }
    let weight = assignment
        .iter()
        .enumerate()
        .fold(0i64, |acc, (i, &j)| acc.saturating_add(weights[i][j]));

    Ok(Matching::new(assignment, weight))
}

fn validate(weights: &[Vec<i64>]) -> Result<(), MatchingError> {
    let n = weights.len();
    for (row, r) in weights.iter().enumerate() {
        if r.len() != n {
            return Err(MatchingError::NotSquare {
                row,
                len: r.len(),
                n,
            });
        }
        if let Some((col, &weight)) = r.iter().enumerate().find(|&(_, &w)| w < 0) {
            return Err(MatchingError::NegativeWeight { row, col, weight });
        }
    }
    Ok(())
}
