// crates/st_physics/src/problem.rs

//! 初始场
//!
//! 均匀密度，基础风速叠加 u 的线性切变，参考高度以下叠加均匀分布的随机扰动。
//! 随机数按 u、v、w 的顺序、每个分量内 i 最快串行抽取，
//! 同一种子在任意线程数下给出相同的初始场。
//!
//! 只写有效区域，光晕由调用方随后填充。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use st_config::{GridConfig, ProblemConfig};
use st_core::{Axis, Field3, IndexBox, Scalar, StaggeredField};

use crate::error::PhysicsResult;

/// 初始状态（原始变量）
#[derive(Debug, Clone)]
pub struct InitialState<S: Scalar> {
    /// 单元中心密度
    pub density: Field3<S>,
    /// 面心速度
    pub velocity: StaggeredField<S>,
}

/// 网格配置对应的单元盒
pub fn domain_box(grid: &GridConfig) -> PhysicsResult<IndexBox> {
    Ok(IndexBox::from_extent(grid.n_cell)?)
}

/// 在 [-mag, mag] 内抽取扰动；mag 为 0 时不消耗随机数
fn perturbation(rng: &mut StdRng, mag: f64) -> f64 {
    if mag == 0.0 {
        return 0.0;
    }
    (rng.gen::<f64>() * 2.0 - 1.0) * mag
}

/// 构造初始场
pub fn initialize<S: Scalar>(
    problem: &ProblemConfig,
    grid: &GridConfig,
) -> PhysicsResult<InitialState<S>> {
    let domain = domain_box(grid)?;
    let n_grow = grid.n_grow;
    let dx = grid.cell_size();
    let lo = grid.prob_lo;
    let mut rng = StdRng::seed_from_u64(problem.seed);

    let density = Field3::cell_centered(domain, n_grow, S::from_config(problem.rho_0));
    let mut velocity = StaggeredField::new(domain, n_grow, S::ZERO);

    let z_center = |k: i32| lo[2] + (k as f64 + 0.5) * dx[2];

    let u = velocity.component_mut(Axis::X);
    for iv in u.valid_box().iter() {
        let z = z_center(iv.k());
        let mut value = problem.u_0 + problem.shear_rate * z;
        if z <= problem.pert_ref_height {
            value += perturbation(&mut rng, problem.u_pert_mag);
        }
        u.set(iv, S::from_config(value));
    }

    let v = velocity.component_mut(Axis::Y);
    for iv in v.valid_box().iter() {
        let z = z_center(iv.k());
        let mut value = problem.v_0;
        if z <= problem.pert_ref_height {
            value += perturbation(&mut rng, problem.v_pert_mag);
        }
        v.set(iv, S::from_config(value));
    }

    // 上下边界面不穿透
    let (k_bottom, k_top) = (domain.lo.k(), domain.hi.k() + 1);
    let w = velocity.component_mut(Axis::Z);
    for iv in w.valid_box().iter() {
        let value = if iv.k() == k_bottom || iv.k() == k_top {
            0.0
        } else {
            let z = lo[2] + iv.k() as f64 * dx[2];
            let mut value = problem.w_0;
            if z <= problem.pert_ref_height {
                value += perturbation(&mut rng, problem.w_pert_mag);
            }
            value
        };
        w.set(iv, S::from_config(value));
    }

    tracing::debug!(
        cells = domain.num_points(),
        seed = problem.seed,
        "初始场构造完成"
    );
    Ok(InitialState { density, velocity })
}
