// crates/st_physics/src/closure/mod.rs

//! 亚格子湍流闭合
//!
//! - [`strain_rate`]: 交错网格上的应变率分量
//! - [`tensor`]: 单元中心的对称应变率张量
//! - [`eddy_viscosity`]: Smagorinsky 涡粘性与分块求解器
//! - [`interpolate`]: 涡粘性到应力位置的插值
//! - [`traits`]: 闭合模型 trait

pub mod eddy_viscosity;
pub mod interpolate;
pub mod strain_rate;
pub mod tensor;
pub mod traits;

use st_core::Axis;

/// 动量方程分量（被扩散的速度分量）
pub type MomentumEqn = Axis;

/// 扩散方向（求导方向）
pub type DiffusionDir = Axis;

pub use eddy_viscosity::{
    compute_eddy_viscosity, eddy_viscosity_at, EddyViscosityModel, EddyViscositySolver,
    SmagorinskyParams,
};
pub use interpolate::{interpolate, interpolate_to_faces, ViscosityStencil, STENCILS};
pub use strain_rate::{divergence, strain_rate, velocity_derivative};
pub use tensor::{strain_rate_tensor, strain_rate_tensor_via, AssemblyPath, StrainRateTensor};
pub use traits::TurbulenceClosure;
