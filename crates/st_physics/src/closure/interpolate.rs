// crates/st_physics/src/closure/interpolate.rs

//! 涡粘性从单元中心插值到应力位置
//!
//! 动量方程 eqn 在方向 dir 的粘性应力需要 ν_t 位于：
//!
//! - eqn == dir：动量面两侧的单元中心，直接取单元值（权重 1）
//! - eqn ≠ dir：eqn-dir 棱上，取周围四个单元的平均（权重 ¼）
//!
//! 18 种 (eqn, dir, sense) 组合对应一张编译期常量表 [`STENCILS`]，
//! 运行时只做查表，不做分支。偏移量相对于动量面索引 `iv` 给出
//! （面 `iv` 位于单元 `iv - e_eqn` 与 `iv` 之间）。

use st_config::ExecutionPolicy;
use st_core::{Axis, Centering, Field3, IndexBox, IntVect, OffsetSense, Scalar};

use super::{DiffusionDir, MomentumEqn};
use crate::error::{PhysicsError, PhysicsResult};
use crate::parallel::parallel_for;

/// 插值模板：若干单元偏移与统一权重
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViscosityStencil {
    /// 相对动量面索引的单元偏移（按求和顺序）
    pub offsets: &'static [[i32; 3]],
    /// 求和后的权重
    pub weight: f64,
}

const fn center(offsets: &'static [[i32; 3]]) -> ViscosityStencil {
    ViscosityStencil { offsets, weight: 1.0 }
}

const fn edge(offsets: &'static [[i32; 3]]) -> ViscosityStencil {
    ViscosityStencil { offsets, weight: 0.25 }
}

/// 插值模板表，索引为 `[eqn][dir][sense]`，sense 顺序为 [Next, Prev]
pub static STENCILS: [[[ViscosityStencil; 2]; 3]; 3] = [
    // eqn = x
    [
        [center(&[[0, 0, 0]]), center(&[[-1, 0, 0]])],
        [
            edge(&[[-1, 0, 0], [0, 0, 0], [-1, 1, 0], [0, 1, 0]]),
            edge(&[[-1, 0, 0], [0, 0, 0], [-1, -1, 0], [0, -1, 0]]),
        ],
        [
            edge(&[[-1, 0, 0], [0, 0, 0], [-1, 0, 1], [0, 0, 1]]),
            edge(&[[-1, 0, 0], [0, 0, 0], [-1, 0, -1], [0, 0, -1]]),
        ],
    ],
    // eqn = y
    [
        [
            edge(&[[0, -1, 0], [0, 0, 0], [1, -1, 0], [1, 0, 0]]),
            edge(&[[0, -1, 0], [0, 0, 0], [-1, -1, 0], [-1, 0, 0]]),
        ],
        [center(&[[0, 0, 0]]), center(&[[0, -1, 0]])],
        [
            edge(&[[0, -1, 0], [0, 0, 0], [0, -1, 1], [0, 0, 1]]),
            edge(&[[0, -1, 0], [0, 0, 0], [0, -1, -1], [0, 0, -1]]),
        ],
    ],
    // eqn = z
    [
        [
            edge(&[[0, 0, -1], [0, 0, 0], [1, 0, -1], [1, 0, 0]]),
            edge(&[[0, 0, -1], [0, 0, 0], [-1, 0, -1], [-1, 0, 0]]),
        ],
        [
            edge(&[[0, 0, -1], [0, 0, 0], [0, 1, -1], [0, 1, 0]]),
            edge(&[[0, 0, -1], [0, 0, 0], [0, -1, -1], [0, -1, 0]]),
        ],
        [center(&[[0, 0, 0]]), center(&[[0, 0, -1]])],
    ],
];

impl ViscosityStencil {
    /// 查表
    #[inline]
    pub fn lookup(eqn: MomentumEqn, dir: DiffusionDir, sense: OffsetSense) -> &'static Self {
        &STENCILS[eqn.index()][dir.index()][sense.index()]
    }

    /// 在动量面 `iv` 处求值
    #[inline]
    pub fn apply<S: Scalar>(&self, iv: IntVect, nut: &Field3<S>) -> S {
        let sum = self
            .offsets
            .iter()
            .map(|&o| nut.get(iv.offset(o)))
            .fold(S::ZERO, |acc, v| acc + v);
        S::from_config(self.weight) * sum
    }

    /// 偏移量的逐分量 (最小值, 最大值)
    pub fn extent(&self) -> ([i32; 3], [i32; 3]) {
        let mut lo = [0i32; 3];
        let mut hi = [0i32; 3];
        for o in self.offsets {
            for d in 0..3 {
                lo[d] = lo[d].min(o[d]);
                hi[d] = hi[d].max(o[d]);
            }
        }
        (lo, hi)
    }

    /// 在面盒 `faces` 上求值时需要读取的单元区域
    pub fn support(&self, faces: &IndexBox) -> IndexBox {
        let (lo, hi) = self.extent();
        IndexBox {
            lo: faces.lo.offset(lo),
            hi: faces.hi.offset(hi),
        }
    }
}

/// 把单元中心的 ν_t 插值到动量面 `iv` 的 (eqn, dir, sense) 应力位置
#[inline]
pub fn interpolate<S: Scalar>(
    iv: IntVect,
    eqn: MomentumEqn,
    dir: DiffusionDir,
    sense: OffsetSense,
    nut: &Field3<S>,
) -> S {
    ViscosityStencil::lookup(eqn, dir, sense).apply(iv, nut)
}

/// 在 eqn 方向的全部有效动量面上插值，返回无光晕的面心场
///
/// `nut` 必须是单元中心场，且光晕足以覆盖模板（边界面需要一层光晕）。
pub fn interpolate_to_faces<S: Scalar>(
    nut: &Field3<S>,
    eqn: MomentumEqn,
    dir: DiffusionDir,
    sense: OffsetSense,
    policy: ExecutionPolicy,
) -> PhysicsResult<Field3<S>> {
    if nut.centering() != Centering::Cell {
        return Err(PhysicsError::CenteringMismatch {
            field: "nut",
            expected: Centering::Cell,
            actual: nut.centering(),
        });
    }

    let stencil = ViscosityStencil::lookup(eqn, dir, sense);
    let mut out = Field3::face_centered(nut.valid_box(), eqn, 0, S::ZERO);
    let faces = out.valid_box();
    let required = stencil.support(&faces);
    if !nut.allocated_box().contains_box(&required) {
        return Err(PhysicsError::InsufficientHalo {
            field: "nut",
            required,
            available: nut.allocated_box(),
        });
    }

    parallel_for(&mut out, &faces, policy, |iv| stencil.apply(iv, nut))?;
    Ok(out)
}

/// 某个 (eqn, dir) 组合是否为对角（单元中心）位置
#[inline]
pub fn is_cell_centered(eqn: MomentumEqn, dir: DiffusionDir) -> bool {
    eqn == dir
}

/// 所有 18 种组合
pub fn all_locations() -> impl Iterator<Item = (Axis, Axis, OffsetSense)> {
    Axis::ALL.into_iter().flat_map(|eqn| {
        Axis::ALL
            .into_iter()
            .flat_map(move |dir| OffsetSense::ALL.into_iter().map(move |s| (eqn, dir, s)))
    })
}
