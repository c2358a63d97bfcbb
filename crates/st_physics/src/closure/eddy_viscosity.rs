// crates/st_physics/src/closure/eddy_viscosity.rs

//! Smagorinsky 亚格子涡粘性
//!
//! # 模型
//!
//! ```text
//! μ_t = 2 (C_s Δ)² ρ |S|,   Δ = (Δx Δy Δz)^(1/3),   |S| = √(2 S_mn S_mn)
//! ```
//!
//! 即 `nut = 2 · Cs² · (ΔxΔyΔz)^(2/3) · ρ · √(2 S_mn S_mn)`。
//! 输出的是动力涡粘性（已乘密度），前导因子 2 与动量方程中
//! `∂/∂x_j (2 μ_t S_ij)` 的写法配套，保持不变。
//!
//! # 前置条件
//!
//! 计算分块 `tile` 时：
//!
//! - 每个速度分量的存储区域包含 `tile.grow(1)` 的面盒
//! - 密度与输出场的存储区域包含 `tile`
//!
//! 检查在进入并行循环前一次完成，逐单元内核不做边界判断。

use st_config::{ExecutionPolicy, LesModel, SolverConfig};
use st_core::{Axis, Centering, Field3, IndexBox, IntVect, Scalar, StaggeredField};
use std::time::Instant;

use super::tensor::strain_rate_tensor;
use super::traits::TurbulenceClosure;
use crate::error::{PhysicsError, PhysicsResult};
use crate::parallel::{parallel_for, timed_parallel_for, ClosureMetrics};

/// 默认分块尺寸：x 方向不切分，y/z 方向 16
pub const DEFAULT_TILE_SIZE: [i32; 3] = [1024, 16, 16];

/// Smagorinsky 预计算参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmagorinskyParams<S: Scalar> {
    /// Smagorinsky 常数 C_s
    pub cs: S,
    /// C_s² (ΔxΔyΔz)^(2/3)
    pub cs_delta_sqr: S,
}

impl<S: Scalar> SmagorinskyParams<S> {
    /// 由常数和网格间距构造
    pub fn new(cs: S, cell_size: &[S; 3]) -> Self {
        let volume = cell_size[0] * cell_size[1] * cell_size[2];
        let two_thirds = S::from_config(2.0 / 3.0);
        Self {
            cs,
            cs_delta_sqr: cs * cs * volume.powf(two_thirds),
        }
    }
}

/// 涡粘性模型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EddyViscosityModel<S: Scalar> {
    /// 不计算亚格子粘性，输出 0
    Disabled,
    /// Smagorinsky 模型
    Smagorinsky(SmagorinskyParams<S>),
    /// 常数运动涡粘性 ν，输出 ρ ν
    Constant {
        /// 运动涡粘性 [m²/s]
        nu: S,
    },
}

impl<S: Scalar> EddyViscosityModel<S> {
    /// 由配置构造
    pub fn from_config(model: &LesModel, cell_size: &[S; 3]) -> Self {
        match *model {
            LesModel::None => Self::Disabled,
            LesModel::Smagorinsky { cs } => {
                if cs == 0.0 {
                    tracing::warn!("Smagorinsky 常数为 0，涡粘性将恒为 0");
                }
                Self::smagorinsky(S::from_config(cs), cell_size)
            }
            LesModel::Constant { nu } => Self::Constant { nu: S::from_config(nu) },
        }
    }

    /// Smagorinsky 模型
    pub fn smagorinsky(cs: S, cell_size: &[S; 3]) -> Self {
        Self::Smagorinsky(SmagorinskyParams::new(cs, cell_size))
    }

    /// 模型名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Disabled => "none",
            Self::Smagorinsky(_) => "smagorinsky",
            Self::Constant { .. } => "constant",
        }
    }

    /// 是否产生非零粘性
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    fn needs_velocity(&self) -> bool {
        matches!(self, Self::Smagorinsky(_))
    }
}

/// 单元 `iv` 处的动力涡粘性
#[inline]
pub fn eddy_viscosity_at<S: Scalar>(
    iv: IntVect,
    vel: &StaggeredField<S>,
    density: &Field3<S>,
    cell_size: &[S; 3],
    model: &EddyViscosityModel<S>,
) -> S {
    match model {
        EddyViscosityModel::Disabled => S::ZERO,
        EddyViscosityModel::Constant { nu } => density.get(iv) * *nu,
        EddyViscosityModel::Smagorinsky(params) => {
            let s = strain_rate_tensor(iv, vel, cell_size);
            let rho = density.get(iv);
            S::TWO * params.cs_delta_sqr * rho * (S::TWO * s.contraction()).sqrt()
        }
    }
}

/// 检查输入场能否支撑分块 `tile` 上的计算
pub fn check_stencil_support<S: Scalar>(
    vel: &StaggeredField<S>,
    density: &Field3<S>,
    nut: &Field3<S>,
    tile: &IndexBox,
    model: &EddyViscosityModel<S>,
) -> PhysicsResult<()> {
    if nut.centering() != Centering::Cell {
        return Err(PhysicsError::CenteringMismatch {
            field: "nut",
            expected: Centering::Cell,
            actual: nut.centering(),
        });
    }
    if !nut.allocated_box().contains_box(tile) {
        return Err(PhysicsError::TileOutsideField {
            field: "nut",
            tile: *tile,
            available: nut.allocated_box(),
        });
    }
    if model.is_active() && !density.allocated_box().contains_box(tile) {
        return Err(PhysicsError::InsufficientHalo {
            field: "density",
            required: *tile,
            available: density.allocated_box(),
        });
    }
    if model.needs_velocity() {
        let halo = tile.grow(1);
        for axis in Axis::ALL {
            let required = halo.surrounding_nodes(axis);
            let available = vel.component(axis).allocated_box();
            if !available.contains_box(&required) {
                return Err(PhysicsError::InsufficientHalo {
                    field: velocity_name(axis),
                    required,
                    available,
                });
            }
        }
    }
    Ok(())
}

fn velocity_name(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "u",
        Axis::Y => "v",
        Axis::Z => "w",
    }
}

/// 在分块 `tile` 上计算涡粘性，写入 `nut`
///
/// 返回是否走了并行路径。
pub fn compute_eddy_viscosity<S: Scalar>(
    vel: &StaggeredField<S>,
    density: &Field3<S>,
    nut: &mut Field3<S>,
    tile: &IndexBox,
    cell_size: &[S; 3],
    model: &EddyViscosityModel<S>,
    policy: ExecutionPolicy,
) -> PhysicsResult<bool> {
    check_stencil_support(vel, density, nut, tile, model)?;
    parallel_for(nut, tile, policy, |iv| {
        eddy_viscosity_at(iv, vel, density, cell_size, model)
    })
}

// ============================================================
// 求解器
// ============================================================

/// 分块涡粘性求解器
///
/// 把输出场的有效区域切分为分块，逐块检查模板并执行逐单元循环。
#[derive(Debug, Clone)]
pub struct EddyViscositySolver<S: Scalar> {
    model: EddyViscosityModel<S>,
    cell_size: [S; 3],
    policy: ExecutionPolicy,
    tile_size: [i32; 3],
    metrics: ClosureMetrics,
}

impl<S: Scalar> EddyViscositySolver<S> {
    /// 创建求解器
    pub fn new(model: EddyViscosityModel<S>, cell_size: [S; 3], policy: ExecutionPolicy) -> Self {
        Self {
            model,
            cell_size,
            policy,
            tile_size: DEFAULT_TILE_SIZE,
            metrics: ClosureMetrics::default(),
        }
    }

    /// 由求解器配置构造
    pub fn from_config(config: &SolverConfig) -> PhysicsResult<Self> {
        config.validate()?;
        let cell_size = config.grid.cell_size().map(S::from_config);
        let model = EddyViscosityModel::from_config(&config.closure.model, &cell_size);
        let tile_size = config
            .execution
            .tile_size
            .map(|t| i32::try_from(t).unwrap_or(i32::MAX));
        Ok(Self::new(model, cell_size, config.execution.policy).with_tile_size(tile_size))
    }

    /// 设置分块尺寸
    pub fn with_tile_size(mut self, tile_size: [i32; 3]) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// 模型
    pub fn model(&self) -> &EddyViscosityModel<S> {
        &self.model
    }

    /// 网格间距
    pub fn cell_size(&self) -> &[S; 3] {
        &self.cell_size
    }

    /// 性能指标
    pub fn metrics(&self) -> &ClosureMetrics {
        &self.metrics
    }

    /// 在单个分块上计算
    pub fn compute_tile(
        &mut self,
        vel: &StaggeredField<S>,
        density: &Field3<S>,
        nut: &mut Field3<S>,
        tile: &IndexBox,
    ) -> PhysicsResult<()> {
        check_stencil_support(vel, density, nut, tile, &self.model)?;
        let (model, cell_size) = (&self.model, &self.cell_size);
        timed_parallel_for(nut, tile, self.policy, &mut self.metrics, |iv| {
            eddy_viscosity_at(iv, vel, density, cell_size, model)
        })
    }

    /// 在 `nut` 的整个有效区域上计算
    pub fn compute(
        &mut self,
        vel: &StaggeredField<S>,
        density: &Field3<S>,
        nut: &mut Field3<S>,
    ) -> PhysicsResult<()> {
        let start = Instant::now();
        let tiles = nut.valid_box().tiles(self.tile_size)?;
        for tile in &tiles {
            self.compute_tile(vel, density, nut, tile)?;
        }
        tracing::debug!(
            model = self.model.name(),
            tiles = tiles.len(),
            cells = nut.valid_box().num_points(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "涡粘性计算完成"
        );
        Ok(())
    }
}

impl<S: Scalar> TurbulenceClosure<S> for EddyViscositySolver<S> {
    fn name(&self) -> &'static str {
        self.model.name()
    }

    fn update(
        &mut self,
        velocity: &StaggeredField<S>,
        density: &Field3<S>,
        nut: &mut Field3<S>,
    ) -> PhysicsResult<()> {
        self.compute(velocity, density, nut)
    }

    fn is_enabled(&self) -> bool {
        self.model.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cells() -> IndexBox {
        IndexBox::from_extent([4, 4, 4]).unwrap()
    }

    fn shear_flow(rate: f64, dz: f64) -> StaggeredField<f64> {
        let mut vel = StaggeredField::new(cells(), 1, 0.0);
        vel.u.fill_with(|iv| rate * (iv.k() as f64 + 0.5) * dz);
        vel
    }

    #[test]
    fn test_params_filter_width() {
        let p = SmagorinskyParams::new(0.1, &[1.0, 1.0, 8.0]);
        // (1·1·8)^(2/3) = 4
        assert_relative_eq!(p.cs_delta_sqr, 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_model_from_config() {
        let dx = [1.0f64, 1.0, 1.0];
        assert_eq!(EddyViscosityModel::from_config(&LesModel::None, &dx), EddyViscosityModel::Disabled);
        let m = EddyViscosityModel::from_config(&LesModel::Constant { nu: 0.5 }, &dx);
        assert_eq!(m, EddyViscosityModel::Constant { nu: 0.5 });
        let m = EddyViscosityModel::<f32>::from_config(&LesModel::Smagorinsky { cs: 0.2 }, &[1.0; 3]);
        assert_eq!(m.name(), "smagorinsky");
        assert!(m.is_active());
    }

    #[test]
    fn test_pure_shear_value() {
        let (rate, dz) = (0.5, 2.0);
        let vel = shear_flow(rate, dz);
        let rho = Field3::cell_centered(cells(), 1, 1.2);
        let dx = [1.0, 1.0, dz];
        let model = EddyViscosityModel::smagorinsky(0.15, &dx);
        let iv = IntVect::new(1, 1, 1);
        // S13 = rate/2，S_mn S_mn = 2 (rate/2)² ，|S| = rate
        let expected = 2.0 * 0.15 * 0.15 * 2.0_f64.powf(2.0 / 3.0) * 1.2 * rate;
        assert_relative_eq!(eddy_viscosity_at(iv, &vel, &rho, &dx, &model), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_and_disabled() {
        let vel = StaggeredField::new(cells(), 0, 0.0);
        let rho = Field3::cell_centered(cells(), 0, 2.0);
        let mut nut = Field3::cell_centered(cells(), 0, -1.0);
        let dx = [1.0; 3];

        let constant = EddyViscosityModel::Constant { nu: 0.25 };
        compute_eddy_viscosity(&vel, &rho, &mut nut, &cells(), &dx, &constant, ExecutionPolicy::Serial)
            .unwrap();
        assert_eq!(nut.min_max(&cells()), (0.5, 0.5));

        compute_eddy_viscosity(
            &vel,
            &rho,
            &mut nut,
            &cells(),
            &dx,
            &EddyViscosityModel::Disabled,
            ExecutionPolicy::Serial,
        )
        .unwrap();
        assert_eq!(nut.min_max(&cells()), (0.0, 0.0));
    }

    #[test]
    fn test_missing_velocity_halo() {
        let vel = StaggeredField::new(cells(), 0, 0.0);
        let rho = Field3::cell_centered(cells(), 0, 1.0);
        let mut nut = Field3::cell_centered(cells(), 0, 0.0);
        let model = EddyViscosityModel::smagorinsky(0.15, &[1.0; 3]);
        let err = compute_eddy_viscosity(&vel, &rho, &mut nut, &cells(), &[1.0; 3], &model, ExecutionPolicy::Serial);
        assert!(matches!(err, Err(PhysicsError::InsufficientHalo { field: "u", .. })));
    }

    #[test]
    fn test_solver_tiles_and_metrics() {
        let vel = shear_flow(1.0, 1.0);
        let rho = Field3::cell_centered(cells(), 1, 1.0);
        let mut nut = Field3::cell_centered(cells(), 1, 0.0);
        let model = EddyViscosityModel::smagorinsky(0.1, &[1.0; 3]);
        let mut solver =
            EddyViscositySolver::new(model, [1.0; 3], ExecutionPolicy::Serial).with_tile_size([4, 2, 2]);
        solver.update(&vel, &rho, &mut nut).unwrap();

        assert_eq!(solver.metrics().total_calls, 4);
        assert_eq!(solver.metrics().total_cells, 64);
        assert!(solver.is_enabled());
        assert_eq!(TurbulenceClosure::name(&solver), "smagorinsky");
        // 纯剪切：|S| = 1
        let (lo, hi) = nut.min_max(&cells());
        assert_relative_eq!(lo, 2.0 * 0.01, epsilon = 1e-12);
        assert_relative_eq!(hi, 2.0 * 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_solver_from_config() {
        let mut config = SolverConfig::default();
        config.grid.n_cell = [8, 8, 4];
        config.grid.prob_hi = [8.0, 8.0, 4.0];
        let solver = EddyViscositySolver::<f64>::from_config(&config).unwrap();
        assert_eq!(solver.cell_size(), &[1.0, 1.0, 1.0]);
        assert_eq!(solver.model().name(), config.closure.model.name());
    }
}
