// apps/st_cli/src/main.rs

//! Stratus 命令行界面
//!
//! 驱动交错网格亚格子湍流闭合的计算。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 4: Application**：
//! - 只接触 `SolverConfig` 和 `Precision`
//! - 精度分发在 `run` 命令内部完成，一次单态化到 f32 或 f64

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Stratus 亚格子湍流闭合命令行工具
#[derive(Parser)]
#[command(name = "stratus")]
#[command(author = "Stratus Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Stratus staggered-grid Smagorinsky closure", long_about = None)]
struct Cli {
    /// 日志级别
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

/// 日志级别，未知值由 clap 拒绝
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// 初始化流场并计算涡粘性
    Run(commands::run::RunArgs),
    /// 显示信息
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
