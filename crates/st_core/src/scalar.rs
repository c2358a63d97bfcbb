// crates/st_core/src/scalar.rs

//! 统一标量类型抽象
//!
//! 闭合内核在 f32 与 f64 之间零成本切换的唯一接口。
//!
//! # 使用示例
//!
//! ```
//! use st_core::Scalar;
//!
//! fn filter_width<S: Scalar>(dx: S, dy: S, dz: S) -> S {
//!     (dx * dy * dz).cbrt()
//! }
//!
//! let w32 = filter_width(1.0f32, 1.0, 8.0);
//! let w64 = filter_width(1.0f64, 1.0, 8.0);
//! assert!((w32 - 2.0).abs() < 1e-6);
//! assert!((w64 - 2.0).abs() < 1e-12);
//! ```

use std::fmt::{Debug, Display};
use std::iter::Sum;

use num_traits::{Float, FromPrimitive, NumAssign};

// 密封trait，禁止外部实现
mod private {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// 统一标量类型约束
///
/// 所有场数据和闭合内核都以此 trait 为泛型边界。
///
/// - `f32`: 大网格、内存占用减半
/// - `f64`: 默认精度，用于验证
pub trait Scalar:
    private::Sealed
    + Float
    + FromPrimitive
    + NumAssign
    + Debug
    + Display
    + Send
    + Sync
    + Sum
    + Default
    + 'static
{
    /// 零值: `0.0`
    const ZERO: Self;

    /// 单位值: `1.0`
    const ONE: Self;

    /// 二: `2.0`
    const TWO: Self;

    /// 一半: `0.5`
    const HALF: Self;

    /// 四分之一: `0.25`，四点平均的权重
    const QUARTER: Self;

    /// 从配置层 f64 转换到运行层标量（f32 时可能丢失精度）
    fn from_config(v: f64) -> Self;

    /// 转换回 f64（用于输出和统计）
    fn to_f64(self) -> f64;
}

impl Scalar for f32 {
    const ZERO: f32 = 0.0;
    const ONE: f32 = 1.0;
    const TWO: f32 = 2.0;
    const HALF: f32 = 0.5;
    const QUARTER: f32 = 0.25;

    #[inline]
    fn from_config(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for f64 {
    const ZERO: f64 = 0.0;
    const ONE: f64 = 1.0;
    const TWO: f64 = 2.0;
    const HALF: f64 = 0.5;
    const QUARTER: f64 = 0.25;

    #[inline]
    fn from_config(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}
