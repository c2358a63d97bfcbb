// crates/st_physics/src/error.rs

//! 物理层错误类型
//!
//! 逐单元内核本身没有失败路径；这里的错误都在进入并行循环之前、
//! 对整个分块做一次前置检查时产生。

use st_config::ConfigError;
use st_core::{Centering, CoreError, IndexBox};

/// 物理层错误
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// 核心层错误
    #[error(transparent)]
    Core(#[from] CoreError),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 输入场的光晕层不足以支撑模板
    #[error("场 '{field}' 的光晕层不足: 模板需要 {required}, 可用 {available}")]
    InsufficientHalo {
        /// 场名称
        field: &'static str,
        /// 模板需要读取的区域
        required: IndexBox,
        /// 场的存储区域
        available: IndexBox,
    },

    /// 输出分块超出输出场的存储区域
    #[error("分块 {tile} 超出输出场 '{field}' 的存储区域 {available}")]
    TileOutsideField {
        /// 场名称
        field: &'static str,
        /// 分块
        tile: IndexBox,
        /// 场的存储区域
        available: IndexBox,
    },

    /// 场的定位方式不符合要求
    #[error("场 '{field}' 定位方式错误: 期望 {expected:?}, 实际 {actual:?}")]
    CenteringMismatch {
        /// 场名称
        field: &'static str,
        /// 期望定位
        expected: Centering,
        /// 实际定位
        actual: Centering,
    },
}

/// 物理层结果类型
pub type PhysicsResult<T> = Result<T, PhysicsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use st_core::IntVect;

    #[test]
    fn test_halo_error_display() {
        let b = IndexBox::new(IntVect::ZERO, IntVect::new(3, 3, 3)).unwrap();
        let err = PhysicsError::InsufficientHalo {
            field: "u",
            required: b.grow(1),
            available: b,
        };
        let msg = err.to_string();
        assert!(msg.contains("'u'"));
        assert!(msg.contains("(-1, -1, -1)"));
    }

    #[test]
    fn test_core_error_converts() {
        let err: PhysicsError = CoreError::InvalidAxis(9).into();
        assert!(matches!(err, PhysicsError::Core(CoreError::InvalidAxis(9))));
    }
}
