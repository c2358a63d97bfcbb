// crates/st_core/src/lib.rs

//! Stratus 核心抽象层
//!
//! 提供整个项目的基础抽象，包括：
//! - [`scalar`]: 统一标量 trait（f32/f64 零成本切换）
//! - [`axis`]: 坐标轴与偏移方向（闭合枚举）
//! - [`index_box`]: 整数索引向量与索引盒（含分块）
//! - [`field`]: 交错网格上带光晕层的三维场
//! - [`error`]: 核心错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 4: st_cli      ─> 精度分发、日志、驱动
//! Layer 3: st_physics  ─> 湍流闭合内核（全泛型）
//! Layer 2: st_config   ─> SolverConfig（全 f64）
//! Layer 1: st_core     ─> Scalar, Axis, IndexBox, Field3 (本层)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod axis;
pub mod error;
pub mod field;
pub mod index_box;
pub mod scalar;

// 统一导出
pub use axis::{Axis, OffsetSense};
pub use error::{CoreError, CoreResult};
pub use field::{Centering, Field3, StaggeredField};
pub use index_box::{IndexBox, IntVect};
pub use scalar::Scalar;
