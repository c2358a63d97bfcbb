// crates/st_physics/src/parallel.rs

//! 逐单元并行循环
//!
//! 闭合计算的所有遍历都是"每个输出点只写自己"的形式：
//! 内核读取只读输入场，返回一个标量写到输出场的同一位置。
//! 因此串行与并行路径的结果逐位相同，不需要着色或归约。
//!
//! 并行路径借助 ndarray 的 `Zip::par_for_each`（rayon 后端）。

use ndarray::Zip;
use st_config::ExecutionPolicy;
use st_core::{Field3, IndexBox, IntVect, Scalar};
use std::time::{Duration, Instant};

use crate::error::PhysicsResult;

// ============================================================
// 性能指标
// ============================================================

/// 闭合计算的性能指标
#[derive(Debug, Clone, Default)]
pub struct ClosureMetrics {
    /// 总计算次数（按分块计）
    pub total_calls: usize,
    /// 并行计算次数
    pub parallel_calls: usize,
    /// 串行计算次数
    pub sequential_calls: usize,
    /// 总计算时间
    pub total_duration: Duration,
    /// 处理的单元总数
    pub total_cells: usize,
}

impl ClosureMetrics {
    /// 记录一次计算
    pub fn record(&mut self, n_cells: usize, is_parallel: bool, duration: Duration) {
        self.total_calls += 1;
        self.total_cells += n_cells;
        self.total_duration += duration;
        if is_parallel {
            self.parallel_calls += 1;
        } else {
            self.sequential_calls += 1;
        }
    }

    /// 平均每单元计算时间
    pub fn avg_time_per_cell(&self) -> Duration {
        if self.total_cells > 0 {
            Duration::from_secs_f64(self.total_duration.as_secs_f64() / self.total_cells as f64)
        } else {
            Duration::ZERO
        }
    }
}

// ============================================================
// 循环
// ============================================================

/// 对分块内每个索引调用 `kernel`，结果写入 `out` 的同一索引
///
/// 返回是否走了并行路径。分块必须位于 `out` 的存储区域内。
pub fn parallel_for<S, F>(
    out: &mut Field3<S>,
    tile: &IndexBox,
    policy: ExecutionPolicy,
    kernel: F,
) -> PhysicsResult<bool>
where
    S: Scalar,
    F: Fn(IntVect) -> S + Sync + Send,
{
    let is_parallel = policy.is_parallel(tile.num_points());
    let lo = tile.lo;
    let view = out.region_mut(tile)?;

    let write = |(i, j, k): (usize, usize, usize), value: &mut S| {
        *value = kernel(lo.offset([i as i32, j as i32, k as i32]));
    };

    let zip = Zip::indexed(view);
    if is_parallel {
        zip.par_for_each(write);
    } else {
        zip.for_each(write);
    }
    Ok(is_parallel)
}

/// 带计时的 [`parallel_for`]，结果记入 `metrics`
pub fn timed_parallel_for<S, F>(
    out: &mut Field3<S>,
    tile: &IndexBox,
    policy: ExecutionPolicy,
    metrics: &mut ClosureMetrics,
    kernel: F,
) -> PhysicsResult<()>
where
    S: Scalar,
    F: Fn(IntVect) -> S + Sync + Send,
{
    let start = Instant::now();
    let is_parallel = parallel_for(out, tile, policy, kernel)?;
    metrics.record(tile.num_points(), is_parallel, start.elapsed());
    Ok(())
}
