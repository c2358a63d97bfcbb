// crates/st_physics/src/closure/traits.rs

//! 湍流闭合 trait

use st_core::{Field3, Scalar, StaggeredField};

use crate::error::PhysicsResult;

/// 湍流闭合模型
///
/// 实现者根据当前速度和密度更新单元中心的动力涡粘性 μ_t = ρ ν_t。
pub trait TurbulenceClosure<S: Scalar>: Send + Sync {
    /// 模型名称
    fn name(&self) -> &'static str;

    /// 更新涡粘性场 `nut` 的有效区域
    fn update(
        &mut self,
        velocity: &StaggeredField<S>,
        density: &Field3<S>,
        nut: &mut Field3<S>,
    ) -> PhysicsResult<()>;

    /// 是否启用
    fn is_enabled(&self) -> bool {
        true
    }
}
