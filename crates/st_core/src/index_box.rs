// crates/st_core/src/index_box.rs

//! 整数索引向量与索引盒
//!
//! 结构化网格上的 (i, j, k) 索引。索引可以为负，用于表示光晕层。
//! [`IndexBox`] 的上下界都是闭区间，与单元/面的编号方式一致：
//!
//! ```text
//! 单元盒 [lo, hi]        面盒（沿 x）[lo, hi + e_x]
//!   lo ... hi              lo ... hi+1
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::axis::Axis;
use crate::error::{CoreError, CoreResult};

/// 三维整数索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IntVect(pub [i32; 3]);

impl IntVect {
    /// 原点
    pub const ZERO: Self = Self([0, 0, 0]);

    /// 创建索引
    #[inline]
    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        Self([i, j, k])
    }

    /// i 分量
    #[inline]
    pub const fn i(self) -> i32 {
        self.0[0]
    }

    /// j 分量
    #[inline]
    pub const fn j(self) -> i32 {
        self.0[1]
    }

    /// k 分量
    #[inline]
    pub const fn k(self) -> i32 {
        self.0[2]
    }

    /// 沿某轴的分量
    #[inline]
    pub const fn get(self, axis: Axis) -> i32 {
        self.0[axis.index()]
    }

    /// 沿某轴平移 n 个单元
    #[inline]
    pub fn shifted(self, axis: Axis, n: i32) -> Self {
        let mut v = self.0;
        v[axis.index()] += n;
        Self(v)
    }

    /// 按偏移量平移
    #[inline]
    pub fn offset(self, d: [i32; 3]) -> Self {
        Self([self.0[0] + d[0], self.0[1] + d[1], self.0[2] + d[2]])
    }
}

impl Add for IntVect {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.offset(rhs.0)
    }
}

impl Sub for IntVect {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self([self.0[0] - rhs.0[0], self.0[1] - rhs.0[1], self.0[2] - rhs.0[2]])
    }
}

impl From<[i32; 3]> for IntVect {
    fn from(v: [i32; 3]) -> Self {
        Self(v)
    }
}

impl fmt::Display for IntVect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

/// 闭区间索引盒 [lo, hi]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexBox {
    /// 下界（含）
    pub lo: IntVect,
    /// 上界（含）
    pub hi: IntVect,
}

impl IndexBox {
    /// 创建索引盒，任一方向 hi < lo 时报错
    pub fn new(lo: IntVect, hi: IntVect) -> CoreResult<Self> {
        let b = Self { lo, hi };
        if b.is_empty() {
            return Err(CoreError::EmptyBox(b));
        }
        Ok(b)
    }

    /// 以原点为下界、各方向 n 个单元的索引盒
    pub fn from_extent(n: [usize; 3]) -> CoreResult<Self> {
        let mut hi = [0i32; 3];
        for (h, &len) in hi.iter_mut().zip(&n) {
            *h = i32::try_from(len).map_err(|_| CoreError::ExtentTooLarge(len))? - 1;
        }
        Self::new(IntVect::ZERO, IntVect(hi))
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|d| self.hi.0[d] < self.lo.0[d])
    }

    /// 各方向长度
    #[inline]
    pub fn length(&self) -> [usize; 3] {
        let mut n = [0usize; 3];
        for (d, len) in n.iter_mut().enumerate() {
            *len = (self.hi.0[d] - self.lo.0[d] + 1).max(0) as usize;
        }
        n
    }

    /// 单元（或面）总数
    #[inline]
    pub fn num_points(&self) -> usize {
        let n = self.length();
        n[0] * n[1] * n[2]
    }

    /// 是否包含索引
    #[inline]
    pub fn contains(&self, iv: IntVect) -> bool {
        (0..3).all(|d| iv.0[d] >= self.lo.0[d] && iv.0[d] <= self.hi.0[d])
    }

    /// 是否完整包含另一索引盒
    #[inline]
    pub fn contains_box(&self, other: &IndexBox) -> bool {
        self.contains(other.lo) && self.contains(other.hi)
    }

    /// 各方向向外扩展 n 层
    pub fn grow(&self, n: i32) -> Self {
        Self {
            lo: self.lo.offset([-n, -n, -n]),
            hi: self.hi.offset([n, n, n]),
        }
    }

    /// 单元盒 → 沿 axis 的面盒（上界 +1）
    pub fn surrounding_nodes(&self, axis: Axis) -> Self {
        Self {
            lo: self.lo,
            hi: self.hi.shifted(axis, 1),
        }
    }

    /// 按分块尺寸切分（最后一块可能更小）
    pub fn tiles(&self, tile_size: [i32; 3]) -> CoreResult<Vec<IndexBox>> {
        if tile_size.iter().any(|&t| t < 1) {
            return Err(CoreError::InvalidTileSize(tile_size));
        }
        let mut starts: [Vec<(i32, i32)>; 3] = Default::default();
        for d in 0..3 {
            let mut s = self.lo.0[d];
            while s <= self.hi.0[d] {
                let e = (s + tile_size[d] - 1).min(self.hi.0[d]);
                starts[d].push((s, e));
                s = e + 1;
            }
        }

        let mut tiles = Vec::with_capacity(starts[0].len() * starts[1].len() * starts[2].len());
        for &(k0, k1) in &starts[2] {
            for &(j0, j1) in &starts[1] {
                for &(i0, i1) in &starts[0] {
                    tiles.push(IndexBox {
                        lo: IntVect::new(i0, j0, k0),
                        hi: IntVect::new(i1, j1, k1),
                    });
                }
            }
        }
        Ok(tiles)
    }

    /// 按 i 最快、k 最慢的顺序遍历所有索引
    pub fn iter(&self) -> impl Iterator<Item = IntVect> + '_ {
        let (lo, hi) = (self.lo, self.hi);
        (lo.k()..=hi.k()).flat_map(move |k| {
            (lo.j()..=hi.j()).flat_map(move |j| (lo.i()..=hi.i()).map(move |i| IntVect::new(i, j, k)))
        })
    }
}

impl fmt::Display for IndexBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.lo, self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(n: i32) -> IndexBox {
        IndexBox::new(IntVect::ZERO, IntVect::new(n - 1, n - 1, n - 1)).unwrap()
    }

    #[test]
    fn test_empty_box_rejected() {
        let err = IndexBox::new(IntVect::new(0, 0, 0), IntVect::new(3, -1, 3));
        assert!(matches!(err, Err(CoreError::EmptyBox(_))));
    }

    #[test]
    fn test_from_extent_rejects_oversized() {
        let huge = i32::MAX as usize + 1;
        assert_eq!(
            IndexBox::from_extent([4, huge, 4]),
            Err(CoreError::ExtentTooLarge(huge))
        );
        assert!(matches!(IndexBox::from_extent([0, 4, 4]), Err(CoreError::EmptyBox(_))));
        let max = IndexBox::from_extent([i32::MAX as usize, 1, 1]).unwrap();
        assert_eq!(max.hi.i(), i32::MAX - 1);
    }

    #[test]
    fn test_grow_and_nodes() {
        let b = unit_box(4);
        assert_eq!(b.num_points(), 64);

        let g = b.grow(1);
        assert_eq!(g.lo, IntVect::new(-1, -1, -1));
        assert_eq!(g.hi, IntVect::new(4, 4, 4));

        let fx = b.surrounding_nodes(Axis::X);
        assert_eq!(fx.length(), [5, 4, 4]);
        assert!(fx.contains(IntVect::new(4, 3, 3)));
        assert!(!fx.contains(IntVect::new(4, 4, 3)));
    }

    #[test]
    fn test_tiles_cover_box_exactly_once() {
        let b = IndexBox::new(IntVect::new(-2, 0, 1), IntVect::new(6, 4, 3)).unwrap();
        let tiles = b.tiles([4, 3, 8]).unwrap();

        let total: usize = tiles.iter().map(|t| t.num_points()).sum();
        assert_eq!(total, b.num_points());

        for iv in b.iter() {
            let hits = tiles.iter().filter(|t| t.contains(iv)).count();
            assert_eq!(hits, 1, "{iv} covered {hits} times");
        }
    }

    #[test]
    fn test_invalid_tile_size() {
        assert!(unit_box(4).tiles([0, 4, 4]).is_err());
    }

    #[test]
    fn test_iter_order_i_fastest() {
        let b = IndexBox::new(IntVect::ZERO, IntVect::new(1, 1, 0)).unwrap();
        let v: Vec<IntVect> = b.iter().collect();
        assert_eq!(
            v,
            vec![
                IntVect::new(0, 0, 0),
                IntVect::new(1, 0, 0),
                IntVect::new(0, 1, 0),
                IntVect::new(1, 1, 0)
            ]
        );
    }
}
