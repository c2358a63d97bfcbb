// crates/st_core/src/axis.rs

//! 坐标轴与偏移方向
//!
//! 动量方程、差分方向共用 [`Axis`]；面的高/低侧由 [`OffsetSense`] 选择。
//! 两者都是闭合枚举，非法组合在类型层面无法构造。
//! 只有从原始整数解码（如外部配置）时才可能失败。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// 坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// x 方向
    X,
    /// y 方向
    Y,
    /// z 方向
    Z,
}

impl Axis {
    /// 全部坐标轴（按 x, y, z 顺序）
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// 数组下标
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// 单位向量 e_axis
    #[inline]
    pub const fn unit(self) -> [i32; 3] {
        match self {
            Axis::X => [1, 0, 0],
            Axis::Y => [0, 1, 0],
            Axis::Z => [0, 0, 1],
        }
    }

    /// 小写名称
    pub const fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl TryFrom<u8> for Axis {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            other => Err(CoreError::InvalidAxis(other)),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 沿差分方向选择单元的高侧面或低侧面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetSense {
    /// 高侧（+1/2）
    Next,
    /// 低侧（-1/2）
    Prev,
}

impl OffsetSense {
    /// 两种偏移（Next 在前）
    pub const ALL: [OffsetSense; 2] = [OffsetSense::Next, OffsetSense::Prev];

    /// 查找表下标
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            OffsetSense::Next => 0,
            OffsetSense::Prev => 1,
        }
    }
}

impl fmt::Display for OffsetSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffsetSense::Next => f.write_str("next"),
            OffsetSense::Prev => f.write_str("prev"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_decode() {
        assert_eq!(Axis::try_from(0u8).unwrap(), Axis::X);
        assert_eq!(Axis::try_from(2u8).unwrap(), Axis::Z);
        assert!(matches!(Axis::try_from(3u8), Err(CoreError::InvalidAxis(3))));
    }

    #[test]
    fn test_axis_unit_matches_index() {
        for axis in Axis::ALL {
            let unit = axis.unit();
            assert_eq!(unit[axis.index()], 1);
            assert_eq!(unit.iter().sum::<i32>(), 1);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Axis::Y).unwrap();
        assert_eq!(json, "\"y\"");
        let sense: OffsetSense = serde_json::from_str("\"prev\"").unwrap();
        assert_eq!(sense, OffsetSense::Prev);
    }
}
