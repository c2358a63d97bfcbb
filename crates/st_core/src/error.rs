// crates/st_core/src/error.rs

//! 核心层错误类型

use crate::index_box::IndexBox;

/// 核心错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// 无法识别的坐标轴编码
    #[error("无法识别的坐标轴编码: {0}（期望 0, 1, 2）")]
    InvalidAxis(u8),

    /// 空索引盒
    #[error("空索引盒: {0}")]
    EmptyBox(IndexBox),

    /// 网格尺寸超出 i32 索引范围
    #[error("网格尺寸 {0} 超出 i32 索引范围")]
    ExtentTooLarge(usize),

    /// 无效分块尺寸
    #[error("无效分块尺寸 {0:?}: 每个方向必须 ≥ 1")]
    InvalidTileSize([i32; 3]),

    /// 场的存储区域不匹配
    #[error("场区域不匹配: 期望 {expected}, 实际 {actual}")]
    BoxMismatch {
        /// 期望区域
        expected: IndexBox,
        /// 实际区域
        actual: IndexBox,
    },
}

/// 核心结果类型
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_display() {
        let err = CoreError::InvalidAxis(7);
        assert!(err.to_string().contains('7'));
    }
}
