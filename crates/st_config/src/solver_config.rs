// crates/st_config/src/solver_config.rs

//! SolverConfig - 求解器配置（全 f64）
//!
//! 所有数值以 f64 存储，便于 JSON 序列化；物理层在构建闭合时
//! 按 [`Precision`] 转换到运行时标量。
//!
//! ```json
//! {
//!   "precision": "f64",
//!   "grid": { "n_cell": [32, 32, 16], "prob_lo": [0, 0, 0], "prob_hi": [1000, 1000, 500] },
//!   "closure": { "model": { "type": "smagorinsky", "cs": 0.15 } },
//!   "execution": { "policy": { "type": "auto", "min_parallel_cells": 4096 } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::precision::Precision;

/// Smagorinsky 常数的默认值
pub const DEFAULT_SMAGORINSKY_CONSTANT: f64 = 0.15;

/// 求解器配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    /// 计算精度
    #[serde(default)]
    pub precision: Precision,

    /// 网格
    #[serde(default)]
    pub grid: GridConfig,

    /// 亚格子闭合
    #[serde(default)]
    pub closure: ClosureConfig,

    /// 初始场
    #[serde(default)]
    pub problem: ProblemConfig,

    /// 执行策略
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// 输出
    #[serde(default)]
    pub output: OutputConfig,
}

// ============================================================
// 网格
// ============================================================

/// 光晕层填充方式（单盒区域）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HaloKind {
    /// 周期边界：从对侧复制
    #[default]
    Periodic,
    /// 一阶外推：复制最近的有效值
    Extrapolate,
}

/// 结构化网格配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// 各方向单元数
    #[serde(default = "default_n_cell")]
    pub n_cell: [usize; 3],

    /// 区域下界 [m]
    #[serde(default)]
    pub prob_lo: [f64; 3],

    /// 区域上界 [m]
    #[serde(default = "default_prob_hi")]
    pub prob_hi: [f64; 3],

    /// 光晕层数（闭合模板需要 ≥ 1）
    #[serde(default = "default_n_grow")]
    pub n_grow: usize,

    /// 各方向的光晕填充方式
    #[serde(default)]
    pub halo: [HaloKind; 3],
}

fn default_n_cell() -> [usize; 3] { [16, 16, 16] }
fn default_prob_hi() -> [f64; 3] { [1600.0, 1600.0, 800.0] }
fn default_n_grow() -> usize { 1 }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            n_cell: default_n_cell(),
            prob_lo: [0.0; 3],
            prob_hi: default_prob_hi(),
            n_grow: default_n_grow(),
            halo: [HaloKind::default(); 3],
        }
    }
}

impl GridConfig {
    /// 单元尺寸 [Δx, Δy, Δz]
    pub fn cell_size(&self) -> [f64; 3] {
        let mut dx = [0.0; 3];
        for d in 0..3 {
            dx[d] = (self.prob_hi[d] - self.prob_lo[d]) / self.n_cell[d] as f64;
        }
        dx
    }

    /// 单元总数
    pub fn n_cells(&self) -> usize {
        self.n_cell.iter().product()
    }
}

// ============================================================
// 闭合
// ============================================================

/// LES 亚格子模型
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LesModel {
    /// 不计算涡粘性（全零）
    None,
    /// Smagorinsky-Lilly 模型
    Smagorinsky {
        /// Smagorinsky 常数 Cs ≥ 0
        cs: f64,
    },
    /// 常数运动涡粘性 ν [m²/s]，动力粘性 = ρν
    Constant {
        /// 运动涡粘性
        nu: f64,
    },
}

impl Default for LesModel {
    fn default() -> Self {
        Self::Smagorinsky { cs: DEFAULT_SMAGORINSKY_CONSTANT }
    }
}

impl LesModel {
    /// 模型名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Smagorinsky { .. } => "smagorinsky",
            Self::Constant { .. } => "constant",
        }
    }
}

/// 闭合配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClosureConfig {
    /// 亚格子模型
    #[serde(default)]
    pub model: LesModel,
}

// ============================================================
// 初始场
// ============================================================

/// 初始场配置
///
/// 均匀密度 + 基础风速 + 线性切变 + 参考高度以下的随机扰动。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// 参考密度 [kg/m³]
    #[serde(default = "default_rho_0")]
    pub rho_0: f64,

    /// 基础风速 u [m/s]
    #[serde(default)]
    pub u_0: f64,

    /// 基础风速 v [m/s]
    #[serde(default)]
    pub v_0: f64,

    /// 基础风速 w [m/s]
    #[serde(default)]
    pub w_0: f64,

    /// 线性切变率 ∂u/∂z [1/s]
    #[serde(default)]
    pub shear_rate: f64,

    /// u 扰动幅值 [m/s]
    #[serde(default)]
    pub u_pert_mag: f64,

    /// v 扰动幅值 [m/s]
    #[serde(default)]
    pub v_pert_mag: f64,

    /// w 扰动幅值 [m/s]
    #[serde(default)]
    pub w_pert_mag: f64,

    /// 扰动参考高度 [m]，其上不加扰动
    #[serde(default = "default_pert_ref_height")]
    pub pert_ref_height: f64,

    /// 随机种子
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_rho_0() -> f64 { 1.16 }
fn default_pert_ref_height() -> f64 { 100.0 }
fn default_seed() -> u64 { 1024 }

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            rho_0: default_rho_0(),
            u_0: 0.0,
            v_0: 0.0,
            w_0: 0.0,
            shear_rate: 0.0,
            u_pert_mag: 0.0,
            v_pert_mag: 0.0,
            w_pert_mag: 0.0,
            pert_ref_height: default_pert_ref_height(),
            seed: default_seed(),
        }
    }
}

// ============================================================
// 执行
// ============================================================

/// 逐单元循环的执行策略
///
/// 串行与并行结果逐位相同：每个单元只写自己的输出，不做跨单元归约。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionPolicy {
    /// 单线程
    Serial,
    /// rayon 线程池
    Parallel,
    /// 分块单元数 ≥ 阈值时并行
    Auto {
        /// 并行阈值
        min_parallel_cells: usize,
    },
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self::Auto { min_parallel_cells: 4096 }
    }
}

impl ExecutionPolicy {
    /// 给定单元数时是否走并行路径
    pub fn is_parallel(&self, n_cells: usize) -> bool {
        match *self {
            Self::Serial => false,
            Self::Parallel => true,
            Self::Auto { min_parallel_cells } => n_cells >= min_parallel_cells,
        }
    }
}

/// 执行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// 执行策略
    #[serde(default)]
    pub policy: ExecutionPolicy,

    /// 分块尺寸
    #[serde(default = "default_tile_size")]
    pub tile_size: [usize; 3],

    /// 线程数（None 表示 rayon 默认）
    #[serde(default)]
    pub num_threads: Option<usize>,
}

fn default_tile_size() -> [usize; 3] { [1024, 16, 16] }

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            policy: ExecutionPolicy::default(),
            tile_size: default_tile_size(),
            num_threads: None,
        }
    }
}

// ============================================================
// 输出
// ============================================================

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// 是否写出涡粘性 CSV
    #[serde(default)]
    pub write_csv: bool,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            write_csv: false,
        }
    }
}

// ============================================================
// 加载与验证
// ============================================================

impl SolverConfig {
    /// 从 JSON 文件加载并验证
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: SolverConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存为格式化 JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_grid()?;
        self.validate_closure()?;
        self.validate_problem()?;
        self.validate_execution()
    }

    fn validate_grid(&self) -> Result<(), ConfigError> {
        let g = &self.grid;
        for d in 0..3 {
            if g.n_cell[d] == 0 {
                return Err(ConfigError::invalid(
                    &format!("grid.n_cell[{d}]"),
                    g.n_cell[d],
                    "单元数必须 ≥ 1",
                ));
            }
            if !(g.prob_hi[d] > g.prob_lo[d]) {
                return Err(ConfigError::invalid(
                    &format!("grid.prob_hi[{d}]"),
                    g.prob_hi[d],
                    "上界必须大于下界",
                ));
            }
        }
        if g.n_grow < 1 {
            return Err(ConfigError::invalid("grid.n_grow", g.n_grow, "闭合模板需要至少 1 层光晕"));
        }
        Ok(())
    }

    fn validate_closure(&self) -> Result<(), ConfigError> {
        match self.closure.model {
            LesModel::Smagorinsky { cs } if !(cs >= 0.0) || !cs.is_finite() => Err(
                ConfigError::invalid("closure.model.cs", cs, "Smagorinsky 常数必须为非负有限值"),
            ),
            LesModel::Constant { nu } if !(nu >= 0.0) || !nu.is_finite() => Err(
                ConfigError::invalid("closure.model.nu", nu, "涡粘性必须为非负有限值"),
            ),
            _ => Ok(()),
        }
    }

    fn validate_problem(&self) -> Result<(), ConfigError> {
        let p = &self.problem;
        if !(p.rho_0 > 0.0) {
            return Err(ConfigError::invalid("problem.rho_0", p.rho_0, "密度必须为正"));
        }
        for (key, mag) in [
            ("problem.u_pert_mag", p.u_pert_mag),
            ("problem.v_pert_mag", p.v_pert_mag),
            ("problem.w_pert_mag", p.w_pert_mag),
        ] {
            if !(mag >= 0.0) {
                return Err(ConfigError::invalid(key, mag, "扰动幅值不能为负"));
            }
        }
        if !(p.pert_ref_height > 0.0) {
            return Err(ConfigError::invalid(
                "problem.pert_ref_height",
                p.pert_ref_height,
                "参考高度必须为正",
            ));
        }
        Ok(())
    }

    fn validate_execution(&self) -> Result<(), ConfigError> {
        let e = &self.execution;
        if e.tile_size.iter().any(|&t| t == 0) {
            return Err(ConfigError::invalid(
                "execution.tile_size",
                format!("{:?}", e.tile_size),
                "分块尺寸必须 ≥ 1",
            ));
        }
        if e.num_threads == Some(0) {
            return Err(ConfigError::invalid("execution.num_threads", 0, "线程数必须 ≥ 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.precision, Precision::F64);
        assert_eq!(config.closure.model, LesModel::Smagorinsky { cs: 0.15 });
    }

    #[test]
    fn test_cell_size() {
        let grid = GridConfig {
            n_cell: [4, 8, 16],
            prob_lo: [0.0, -4.0, 0.0],
            prob_hi: [4.0, 4.0, 4.0],
            ..GridConfig::default()
        };
        assert_eq!(grid.cell_size(), [1.0, 1.0, 0.25]);
        assert_eq!(grid.n_cells(), 512);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = SolverConfig::default();
        config.closure.model = LesModel::Smagorinsky { cs: -0.1 };
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.grid.n_grow = 0;
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.problem.rho_0 = 0.0;
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.grid.prob_hi[2] = config.grid.prob_lo[2];
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.execution.tile_size = [8, 0, 8];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_cs_rejected() {
        let mut config = SolverConfig::default();
        config.closure.model = LesModel::Smagorinsky { cs: f64::NAN };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "grid": { "n_cell": [8, 8, 4] },
            "closure": { "model": { "type": "constant", "nu": 2.5 } },
            "execution": { "policy": { "type": "serial" } }
        }"#;
        let config: SolverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.grid.n_cell, [8, 8, 4]);
        assert_eq!(config.grid.n_grow, 1);
        assert_eq!(config.closure.model, LesModel::Constant { nu: 2.5 });
        assert_eq!(config.execution.policy, ExecutionPolicy::Serial);
        assert_eq!(config.execution.tile_size, [1024, 16, 16]);
    }

    #[test]
    fn test_execution_policy_threshold() {
        let auto = ExecutionPolicy::Auto { min_parallel_cells: 100 };
        assert!(!auto.is_parallel(99));
        assert!(auto.is_parallel(100));
        assert!(!ExecutionPolicy::Serial.is_parallel(usize::MAX));
        assert!(ExecutionPolicy::Parallel.is_parallel(1));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stratus.json");

        let mut config = SolverConfig::default();
        config.precision = Precision::F32;
        config.grid.halo = [HaloKind::Periodic, HaloKind::Periodic, HaloKind::Extrapolate];
        config.save_to_file(&path).unwrap();

        let loaded = SolverConfig::from_file(&path).unwrap();
        assert_eq!(loaded.precision, Precision::F32);
        assert_eq!(loaded.grid.halo[2], HaloKind::Extrapolate);
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "problem": { "rho_0": -1.0 } }"#).unwrap();
        assert!(matches!(
            SolverConfig::from_file(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
