// crates/st_config/src/lib.rs

//! Stratus Config Layer (Layer 2)
//!
//! 配置层，提供精度选择和求解器配置。
//! 本层完全无泛型，使用 `Precision` 枚举进行运行时精度分发。
//!
//! # 模块概览
//!
//! - [`precision`]: Precision 枚举（F32/F64）
//! - [`solver_config`]: SolverConfig 求解器配置（全 f64，JSON）
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 4: st_cli      ─> uses SolverConfig
//! Layer 3: st_physics  ─> 把 f64 配置转换为 S: Scalar
//! Layer 2: st_config   ─> Precision, SolverConfig (本层)
//! Layer 1: st_core
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod precision;
pub mod solver_config;

// 重导出核心类型
pub use error::ConfigError;
pub use precision::Precision;
pub use solver_config::{
    ClosureConfig, ExecutionConfig, ExecutionPolicy, GridConfig, HaloKind, LesModel,
    OutputConfig, ProblemConfig, SolverConfig, DEFAULT_SMAGORINSKY_CONSTANT,
};
