// apps/st_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示系统信息、默认配置和插值模板。

use anyhow::{Context, Result};
use clap::Args;
use st_config::SolverConfig;
use st_core::{Axis, OffsetSense};
use st_physics::ViscosityStencil;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示系统信息
    #[arg(long)]
    pub system: bool,

    /// 显示默认配置
    #[arg(long)]
    pub defaults: bool,

    /// 显示插值模板：动量方程轴与扩散方向轴（0=x, 1=y, 2=z）
    #[arg(long, num_args = 2, value_names = ["EQN", "DIR"])]
    pub stencil: Option<Vec<u8>>,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== Stratus 信息 ===");

    if args.system {
        print_system_info();
    }

    if args.defaults {
        print_default_config()?;
    }

    if let Some(codes) = &args.stencil {
        print_stencils(codes)?;
    }

    if !args.system && !args.defaults && args.stencil.is_none() {
        print_system_info();
        println!();
        print_default_config()?;
    }

    Ok(())
}

fn print_system_info() {
    println!("=== 系统信息 ===");
    println!("Stratus CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);
    println!("rayon 线程数: {}", rayon::current_num_threads());

    println!("\n可用精度:");
    println!("  - f32 (单精度): ✓");
    println!("  - f64 (双精度): ✓");
}

fn print_default_config() -> Result<()> {
    println!("=== 默认配置 ===");
    let config = SolverConfig::default();
    let json = serde_json::to_string_pretty(&config).context("无法序列化默认配置")?;
    println!("{json}");
    Ok(())
}

fn print_stencils(codes: &[u8]) -> Result<()> {
    let (eqn, dir) = match codes {
        [e, d] => (
            Axis::try_from(*e).context("无效的动量方程轴")?,
            Axis::try_from(*d).context("无效的扩散方向轴")?,
        ),
        _ => anyhow::bail!("--stencil 需要两个轴编码"),
    };

    println!("=== 插值模板 eqn={eqn}, dir={dir} ===");
    for sense in OffsetSense::ALL {
        let stencil = ViscosityStencil::lookup(eqn, dir, sense);
        let offsets: Vec<String> = stencil
            .offsets
            .iter()
            .map(|o| format!("({}, {}, {})", o[0], o[1], o[2]))
            .collect();
        println!("  {sense}: {} × [{}]", stencil.weight, offsets.join(" + "));
    }
    Ok(())
}
