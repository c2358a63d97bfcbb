// apps/st_cli/src/commands/run.rs

//! 运行闭合计算命令
//!
//! 流程：初始场 → 光晕填充 → 动量/速度往返 → 分块涡粘性 →
//! 涡粘性光晕 → 18 种应力位置插值 → 统计与可选 CSV 输出。

use anyhow::{Context, Result};
use clap::Args;
use st_config::{ExecutionPolicy, Precision, SolverConfig};
use st_core::{Field3, IndexBox, Scalar, StaggeredField};
use st_physics::closure::interpolate::all_locations;
use st_physics::{
    domain_box, fill_halo, fill_halo_staggered, initialize, interpolate_to_faces,
    momentum_to_velocity, velocity_to_momentum, ClosureMetrics, EddyViscositySolver,
    TurbulenceClosure,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// 运行参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径（缺省使用默认配置）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出目录
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 使用 f32 精度
    #[arg(long)]
    pub f32: bool,

    /// 线程数
    #[arg(long)]
    pub threads: Option<usize>,

    /// 强制串行执行
    #[arg(long)]
    pub serial: bool,

    /// 写出涡粘性 CSV
    #[arg(long)]
    pub csv: bool,
}

/// 运行统计
struct RunSummary {
    nut_min: f64,
    nut_max: f64,
    nut_mean: f64,
    face_points: usize,
    metrics: ClosureMetrics,
    csv_path: Option<PathBuf>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== Stratus 闭合计算启动 ===");

    let mut config = match &args.config {
        Some(path) => SolverConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件: {}", path.display()))?,
        None => SolverConfig::default(),
    };
    if args.f32 {
        config.precision = Precision::F32;
    }
    if let Some(dir) = args.output {
        config.output.directory = dir;
    }
    if args.threads.is_some() {
        config.execution.num_threads = args.threads;
    }
    if args.serial {
        config.execution.policy = ExecutionPolicy::Serial;
    }
    if args.csv {
        config.output.write_csv = true;
    }
    config.validate().context("配置无效")?;

    if let Some(n) = config.execution.num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("无法初始化线程池")?;
    }

    info!("使用精度: {}", config.precision);
    info!(
        "网格: {:?} 单元, 间距 {:?} m, 光晕 {} 层",
        config.grid.n_cell,
        config.grid.cell_size(),
        config.grid.n_grow
    );
    info!(
        "模型: {}, 执行策略: {:?}, 线程: {}",
        config.closure.model.name(),
        config.execution.policy,
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let summary = match config.precision {
        Precision::F32 => run_closure::<f32>(&config)?,
        Precision::F64 => run_closure::<f64>(&config)?,
    };
    let elapsed = start.elapsed();

    info!("=== 计算完成 ===");
    info!(
        "涡粘性: min={:.6e}, max={:.6e}, mean={:.6e}",
        summary.nut_min, summary.nut_max, summary.nut_mean
    );
    info!("插值面点数: {}", summary.face_points);
    info!(
        "分块: {} (并行 {}, 串行 {}), 平均每单元 {:?}",
        summary.metrics.total_calls,
        summary.metrics.parallel_calls,
        summary.metrics.sequential_calls,
        summary.metrics.avg_time_per_cell()
    );
    info!("总耗时: {:.3} s", elapsed.as_secs_f64());
    if let Some(path) = summary.csv_path {
        info!("已写出: {}", path.display());
    }

    Ok(())
}

fn run_closure<S: Scalar>(config: &SolverConfig) -> Result<RunSummary> {
    let grid = &config.grid;
    let policy = config.execution.policy;
    let domain = domain_box(grid)?;

    let mut state = initialize::<S>(&config.problem, grid).context("初始场构造失败")?;
    fill_halo(&mut state.density, &domain, &grid.halo)?;
    fill_halo_staggered(&mut state.velocity, &domain, &grid.halo)?;

    // 初始场以守恒变量交给闭合前，先转回原始变量
    let mut momentum = StaggeredField::new(domain, grid.n_grow, S::ZERO);
    velocity_to_momentum(&state.velocity, &state.density, &mut momentum, policy)?;
    momentum_to_velocity(&momentum, &state.density, &mut state.velocity, policy)?;
    fill_halo_staggered(&mut state.velocity, &domain, &grid.halo)?;

    let mut solver = EddyViscositySolver::<S>::from_config(config)?;
    let mut nut = Field3::cell_centered(domain, grid.n_grow, S::ZERO);
    if !solver.is_enabled() {
        info!("亚格子模型已关闭，涡粘性为 0");
    }
    solver.update(&state.velocity, &state.density, &mut nut)?;
    fill_halo(&mut nut, &domain, &grid.halo)?;

    let mut face_points = 0;
    for (eqn, dir, sense) in all_locations() {
        let faces = interpolate_to_faces(&nut, eqn, dir, sense, policy)?;
        let valid = faces.valid_box();
        let (lo, hi) = faces.min_max(&valid);
        debug!(
            eqn = %eqn,
            dir = %dir,
            sense = %sense,
            min = lo.to_f64(),
            max = hi.to_f64(),
            "应力位置涡粘性"
        );
        face_points += valid.num_points();
    }

    let (nut_min, nut_max) = nut.min_max(&domain);
    let nut_sum: f64 = nut.values_in(&domain).map(Scalar::to_f64).sum();

    let csv_path = if config.output.write_csv {
        Some(write_csv(&config.output.directory, &nut, &domain)?)
    } else {
        None
    };

    Ok(RunSummary {
        nut_min: nut_min.to_f64(),
        nut_max: nut_max.to_f64(),
        nut_mean: nut_sum / domain.num_points() as f64,
        face_points,
        metrics: solver.metrics().clone(),
        csv_path,
    })
}

fn write_csv<S: Scalar>(dir: &Path, nut: &Field3<S>, domain: &IndexBox) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("无法创建输出目录: {}", dir.display()))?;
    let path = dir.join("nut.csv");
    let file = File::create(&path).with_context(|| format!("无法创建文件: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "i,j,k,nut")?;
    for iv in domain.iter() {
        writeln!(writer, "{},{},{},{:e}", iv.i(), iv.j(), iv.k(), nut.get(iv).to_f64())?;
    }
    writer.flush()?;
    Ok(path)
}
