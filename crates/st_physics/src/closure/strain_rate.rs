// crates/st_physics/src/closure/strain_rate.rs

//! 交错网格上的应变率分量
//!
//! # 离散
//!
//! 速度 u_a 位于法向为 a 的面上。记 e_a 为沿 a 的单位偏移，Δ_a 为网格间距。
//!
//! 对角分量 (eqn == dir) 位于单元中心，由两个相对面的差分给出：
//!
//! ```text
//! Next: S_aa = (u_a(i + e_a) - u_a(i)) / Δ_a
//! Prev: S_aa = (u_a(i) - u_a(i - e_a)) / Δ_a
//! ```
//!
//! 非对角分量 (a ≠ b) 位于 a-b 棱上。取棱点 q（Prev 为 i，Next 为 i + e_b）：
//!
//! ```text
//! S_ab(q) = ½ [ (u_a(q) - u_a(q - e_b)) / Δ_b + (u_b(q) - u_b(q - e_a)) / Δ_a ]
//! ```
//!
//! 两个偏导数在同一棱点求值，所以同一棱点上 S_ab 与 S_ba 逐位相等。
//! 注意 Next 侧的棱点取决于 dir：`(iv, Next, a, b)` 与 `(iv + e_b, Prev, b, a)`
//! 是同一棱点，而 `(iv, Next, b, a)` 落在 `iv + e_a` 上。
//!
//! # 模板
//!
//! 单元 i 的 Prev/Next 两侧共读取 `i - 1 ..= i + 1` 范围内的面值，
//! 要求速度场在单元盒外至少有一层光晕。

use st_core::{Axis, IntVect, OffsetSense, Scalar, StaggeredField};

use super::{DiffusionDir, MomentumEqn};

/// 单侧偏导数 ∂u_eqn/∂x_dir，在面 `iv` 与 `iv - e_dir` 之间求差
///
/// eqn == dir 时等于 Prev 侧的对角应变率。
#[inline]
pub fn velocity_derivative<S: Scalar>(
    iv: IntVect,
    vel: &StaggeredField<S>,
    eqn: MomentumEqn,
    dir: DiffusionDir,
    cell_size: &[S; 3],
) -> S {
    let u = vel.component(eqn);
    (u.get(iv) - u.get(iv.shifted(dir, -1))) / cell_size[dir.index()]
}

/// 应变率分量 S_{eqn,dir}
///
/// `sense` 选择单元 `iv` 的哪一侧（见模块文档）。
#[inline]
pub fn strain_rate<S: Scalar>(
    iv: IntVect,
    vel: &StaggeredField<S>,
    sense: OffsetSense,
    eqn: MomentumEqn,
    dir: DiffusionDir,
    cell_size: &[S; 3],
) -> S {
    if eqn == dir {
        let u = vel.component(eqn);
        let (hi, lo) = match sense {
            OffsetSense::Next => (iv.shifted(eqn, 1), iv),
            OffsetSense::Prev => (iv, iv.shifted(eqn, -1)),
        };
        (u.get(hi) - u.get(lo)) / cell_size[eqn.index()]
    } else {
        let q = match sense {
            OffsetSense::Next => iv.shifted(dir, 1),
            OffsetSense::Prev => iv,
        };
        edge_strain_rate(q, vel, eqn, dir, cell_size)
    }
}

/// 棱点 `q` 上的 S_ab，交换 a 与 b 结果逐位不变
#[inline]
fn edge_strain_rate<S: Scalar>(
    q: IntVect,
    vel: &StaggeredField<S>,
    a: Axis,
    b: Axis,
    cell_size: &[S; 3],
) -> S {
    S::HALF
        * (velocity_derivative(q, vel, a, b, cell_size)
            + velocity_derivative(q, vel, b, a, cell_size))
}

/// 把 a-b 棱上的非对角应变率平均到单元中心
///
/// 对 {iv, iv + e_eqn} × {iv, iv + e_dir} 四个棱点取平均。
/// 棱点按轴序 (lo, hi) = (min, max) 固定求和顺序，
/// 因此 (eqn, dir) 与 (dir, eqn) 的结果逐位相等。
#[inline]
pub(crate) fn edge_average<S: Scalar>(
    iv: IntVect,
    vel: &StaggeredField<S>,
    eqn: MomentumEqn,
    dir: DiffusionDir,
    cell_size: &[S; 3],
) -> S {
    let (lo, hi) = if eqn <= dir { (eqn, dir) } else { (dir, eqn) };
    let edge = |q: IntVect| edge_strain_rate(q, vel, lo, hi, cell_size);
    S::QUARTER
        * (edge(iv)
            + edge(iv.shifted(lo, 1))
            + edge(iv.shifted(hi, 1))
            + edge(iv.shifted(lo, 1).shifted(hi, 1)))
}

/// 单元中心处的散度 ∇·u（三个 Next 对角分量之和）
pub fn divergence<S: Scalar>(iv: IntVect, vel: &StaggeredField<S>, cell_size: &[S; 3]) -> S {
    Axis::ALL
        .iter()
        .map(|&a| strain_rate(iv, vel, OffsetSense::Next, a, a, cell_size))
        .fold(S::ZERO, |acc, s| acc + s)
}
