// crates/st_config/src/precision.rs

//! 运行时精度选择
//!
//! 应用层通过 `Precision` 选择场数据的标量类型，配置层本身不带泛型。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 运行时精度枚举
///
/// ```rust
/// use st_config::Precision;
///
/// let precision: Precision = "single".parse().unwrap();
/// assert_eq!(precision, Precision::F32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 单精度 (f32)，大网格时内存减半
    F32,
    /// 双精度 (f64)，默认
    #[default]
    F64,
}

impl Precision {
    /// 精度名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 精度解析错误
#[derive(Debug, Clone, thiserror::Error)]
#[error("无效的精度值: '{0}', 期望 'f32' 或 'f64'")]
pub struct PrecisionParseError(String);

impl FromStr for Precision {
    type Err = PrecisionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f32" | "float" | "single" | "float32" => Ok(Self::F32),
            "f64" | "double" | "float64" => Ok(Self::F64),
            _ => Err(PrecisionParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_default() {
        assert_eq!(Precision::default(), Precision::F64);
    }

    #[test]
    fn test_precision_parse() {
        assert_eq!("f32".parse::<Precision>().unwrap(), Precision::F32);
        assert_eq!("F64".parse::<Precision>().unwrap(), Precision::F64);
        assert!("half".parse::<Precision>().is_err());
    }
}
