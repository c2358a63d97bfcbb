// apps/st_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 先按 `SolverConfig::validate` 检查硬性错误，再给出经验性警告。

use anyhow::{bail, Result};
use clap::Args;
use st_config::{HaloKind, LesModel, SolverConfig};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== Stratus 配置验证 ===");

    let Some(path) = &args.config else {
        println!("用法: stratus validate --config <配置文件> [--strict]");
        return Ok(());
    };

    println!("\n检查配置文件: {}", path.display());
    let mut result = ValidationResult::default();
    match SolverConfig::from_file(path) {
        Ok(config) => {
            println!("  ✓ 配置文件格式有效");
            check_recommendations(&config, &mut result);
        }
        Err(e) => result.add_error(e.to_string()),
    }

    print_validation_result(&result, args.strict)
}

fn check_recommendations(config: &SolverConfig, result: &mut ValidationResult) {
    match config.closure.model {
        LesModel::Smagorinsky { cs } if cs == 0.0 => {
            result.add_warning("Smagorinsky 常数为 0，涡粘性恒为 0")
        }
        LesModel::Smagorinsky { cs } if !(0.05..=0.3).contains(&cs) => {
            result.add_warning(format!("Smagorinsky 常数 {cs} 超出常用范围 0.05-0.3"))
        }
        _ => {}
    }

    let dx = config.grid.cell_size();
    let (min_dx, max_dx) = dx
        .iter()
        .fold((f64::MAX, 0.0_f64), |(lo, hi), &d| (lo.min(d), hi.max(d)));
    if max_dx > 10.0 * min_dx {
        result.add_warning(format!("网格纵横比 {:.1} 较大，滤波宽度 (ΔxΔyΔz)^(1/3) 可能失真", max_dx / min_dx));
    }

    for (d, kind) in config.grid.halo.iter().enumerate() {
        if *kind == HaloKind::Periodic && config.grid.n_cell[d] < 2 {
            result.add_warning(format!("方向 {d} 周期边界只有 {} 个单元", config.grid.n_cell[d]));
        }
    }

    if config.problem.pert_ref_height > config.grid.prob_hi[2] {
        result.add_warning("扰动参考高度高于计算域顶部，整个区域都会加扰动");
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        let mut result = ValidationResult::default();
        check_recommendations(&SolverConfig::default(), &mut result);
        assert!(result.is_ok_strict(), "{:?}", result.warnings);
    }

    #[test]
    fn test_zero_cs_warns() {
        let mut config = SolverConfig::default();
        config.closure.model = LesModel::Smagorinsky { cs: 0.0 };
        let mut result = ValidationResult::default();
        check_recommendations(&config, &mut result);
        assert!(result.is_ok());
        assert!(!result.is_ok_strict());
    }

    #[test]
    fn test_invalid_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"grid": {"n_cell": [0, 4, 4]}}"#).unwrap();
        let args = ValidateArgs { config: Some(path), strict: false };
        assert!(execute(args).is_err());
    }
}
