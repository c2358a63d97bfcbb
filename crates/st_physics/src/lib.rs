// crates/st_physics/src/lib.rs

//! Stratus 物理层 (Layer 3)
//!
//! 交错网格 (Arakawa C) 上的亚格子湍流闭合：
//!
//! - [`closure`]: 应变率、Smagorinsky 涡粘性、涡粘性插值
//! - [`parallel`]: 逐单元并行循环与性能指标
//! - [`boundary`]: 单盒域的光晕填充
//! - [`velocity`]: 动量与速度之间的转换
//! - [`problem`]: 初始场
//! - [`error`]: 物理层错误类型
//!
//! # 数据流
//!
//! ```text
//! 速度 (u,v,w) ──► 应变率 ──► 涡粘性 ν_t（单元中心）
//!                                   │
//!                    插值 ◄─────────┘
//!                     │
//!                     ▼
//!           应力位置上的 ν_t（扩散通量）
//! ```
//!
//! 所有内核对标量类型 `S: Scalar` 泛型，配置层的 f64 参数在构造时转换。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod closure;
pub mod error;
pub mod parallel;
pub mod problem;
pub mod velocity;

pub use boundary::{fill_halo, fill_halo_staggered};
pub use closure::{
    compute_eddy_viscosity, eddy_viscosity_at, interpolate, interpolate_to_faces,
    strain_rate, strain_rate_tensor, strain_rate_tensor_via, velocity_derivative,
    AssemblyPath, DiffusionDir, EddyViscosityModel, EddyViscositySolver, MomentumEqn,
    SmagorinskyParams, StrainRateTensor, TurbulenceClosure, ViscosityStencil,
};
pub use error::{PhysicsError, PhysicsResult};
pub use parallel::{parallel_for, ClosureMetrics};
pub use problem::{domain_box, initialize, InitialState};
pub use velocity::{momentum_to_velocity, velocity_to_momentum};
