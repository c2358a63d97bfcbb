// crates/st_core/src/field.rs

//! 交错网格上的三维场
//!
//! - [`Field3`]: 单个标量场，存储区域 = 有效区域 + `n_grow` 层光晕
//! - [`StaggeredField`]: 三个面心分量 (u, v, w)，Arakawa C 型布局
//!
//! # 存储布局
//!
//! ```text
//! 单元中心场: 有效区域 = 单元盒 [lo, hi]
//! x 面心场:   有效区域 = [lo, hi + e_x]（每个单元的低 x 面编号与单元相同）
//! 存储区域:   有效区域.grow(n_grow)
//! ```
//!
//! 光晕层的填充由外部负责（见 `st_physics::boundary`），本模块只负责存储和索引。

use ndarray::{s, Array3, ArrayViewMut3};
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::{CoreError, CoreResult};
use crate::index_box::{IndexBox, IntVect};
use crate::scalar::Scalar;

/// 场的定位方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Centering {
    /// 单元中心（密度、涡粘性）
    Cell,
    /// 法向为 axis 的面中心（速度、动量分量）
    Face(Axis),
}

/// 带光晕层的三维标量场
#[derive(Debug, Clone, PartialEq)]
pub struct Field3<S: Scalar> {
    centering: Centering,
    valid: IndexBox,
    allocated: IndexBox,
    n_grow: usize,
    data: Array3<S>,
}

impl<S: Scalar> Field3<S> {
    /// 在单元盒上创建单元中心场
    pub fn cell_centered(cells: IndexBox, n_grow: usize, init: S) -> Self {
        Self::with_valid(Centering::Cell, cells, n_grow, init)
    }

    /// 在单元盒上创建法向为 `axis` 的面心场
    pub fn face_centered(cells: IndexBox, axis: Axis, n_grow: usize, init: S) -> Self {
        Self::with_valid(Centering::Face(axis), cells.surrounding_nodes(axis), n_grow, init)
    }

    fn with_valid(centering: Centering, valid: IndexBox, n_grow: usize, init: S) -> Self {
        let allocated = valid.grow(n_grow as i32);
        let [nx, ny, nz] = allocated.length();
        Self {
            centering,
            valid,
            allocated,
            n_grow,
            data: Array3::from_elem((nx, ny, nz), init),
        }
    }

    /// 定位方式
    #[inline]
    pub fn centering(&self) -> Centering {
        self.centering
    }

    /// 有效区域（不含光晕）
    #[inline]
    pub fn valid_box(&self) -> IndexBox {
        self.valid
    }

    /// 存储区域（含光晕）
    #[inline]
    pub fn allocated_box(&self) -> IndexBox {
        self.allocated
    }

    /// 光晕层数
    #[inline]
    pub fn n_grow(&self) -> usize {
        self.n_grow
    }

    /// 该场对应的单元盒
    pub fn cell_box(&self) -> IndexBox {
        match self.centering {
            Centering::Cell => self.valid,
            Centering::Face(axis) => IndexBox {
                lo: self.valid.lo,
                hi: self.valid.hi.shifted(axis, -1),
            },
        }
    }

    #[inline]
    fn local(&self, iv: IntVect) -> [usize; 3] {
        let d = iv - self.allocated.lo;
        [d.0[0] as usize, d.0[1] as usize, d.0[2] as usize]
    }

    /// 读取值，索引在存储区域外返回 None
    #[inline]
    pub fn try_get(&self, iv: IntVect) -> Option<S> {
        if self.allocated.contains(iv) {
            Some(self.data[self.local(iv)])
        } else {
            None
        }
    }

    /// 读取值
    ///
    /// # Panics
    ///
    /// 索引超出存储区域时 panic（调用方的模板越界属于逻辑错误）。
    #[inline]
    pub fn get(&self, iv: IntVect) -> S {
        match self.try_get(iv) {
            Some(v) => v,
            None => panic!("索引 {iv} 超出场存储区域 {}", self.allocated),
        }
    }

    /// 按 (i, j, k) 读取
    #[inline]
    pub fn at(&self, i: i32, j: i32, k: i32) -> S {
        self.get(IntVect::new(i, j, k))
    }

    /// 写入值
    ///
    /// # Panics
    ///
    /// 索引超出存储区域时 panic。
    #[inline]
    pub fn set(&mut self, iv: IntVect, value: S) {
        assert!(
            self.allocated.contains(iv),
            "索引 {iv} 超出场存储区域 {}",
            self.allocated
        );
        let idx = self.local(iv);
        self.data[idx] = value;
    }

    /// 整个存储区域填充常数
    pub fn fill(&mut self, value: S) {
        self.data.fill(value);
    }

    /// 用索引函数填充整个存储区域
    pub fn fill_with<F: FnMut(IntVect) -> S>(&mut self, mut f: F) {
        let lo = self.allocated.lo;
        for ((i, j, k), v) in self.data.indexed_iter_mut() {
            *v = f(lo.offset([i as i32, j as i32, k as i32]));
        }
    }

    /// 子区域的可变视图（供并行循环使用）
    pub fn region_mut(&mut self, region: &IndexBox) -> CoreResult<ArrayViewMut3<'_, S>> {
        if !self.allocated.contains_box(region) {
            return Err(CoreError::BoxMismatch {
                expected: *region,
                actual: self.allocated,
            });
        }
        let a = self.local(region.lo);
        let b = self.local(region.hi);
        Ok(self
            .data
            .slice_mut(s![a[0]..=b[0], a[1]..=b[1], a[2]..=b[2]]))
    }

    /// 遍历子区域的值（i 最快）
    pub fn values_in<'a>(&'a self, region: &'a IndexBox) -> impl Iterator<Item = S> + 'a {
        region.iter().map(move |iv| self.get(iv))
    }

    /// 子区域上的 (最小值, 最大值)
    pub fn min_max(&self, region: &IndexBox) -> (S, S) {
        self.values_in(region).fold(
            (S::infinity(), S::neg_infinity()),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        )
    }

    /// 底层数组（含光晕）
    pub fn as_array(&self) -> &Array3<S> {
        &self.data
    }
}

/// 交错矢量场：u 在 x 面、v 在 y 面、w 在 z 面
///
/// 速度和动量都使用此布局。
#[derive(Debug, Clone, PartialEq)]
pub struct StaggeredField<S: Scalar> {
    /// x 分量（x 面心）
    pub u: Field3<S>,
    /// y 分量（y 面心）
    pub v: Field3<S>,
    /// z 分量（z 面心）
    pub w: Field3<S>,
}

impl<S: Scalar> StaggeredField<S> {
    /// 在单元盒上创建三个分量
    pub fn new(cells: IndexBox, n_grow: usize, init: S) -> Self {
        Self {
            u: Field3::face_centered(cells, Axis::X, n_grow, init),
            v: Field3::face_centered(cells, Axis::Y, n_grow, init),
            w: Field3::face_centered(cells, Axis::Z, n_grow, init),
        }
    }

    /// 由三个分量组装，检查定位方式和单元盒一致
    pub fn from_components(u: Field3<S>, v: Field3<S>, w: Field3<S>) -> CoreResult<Self> {
        let cells = u.cell_box();
        for (axis, f) in [(Axis::X, &u), (Axis::Y, &v), (Axis::Z, &w)] {
            if f.centering() != Centering::Face(axis) || f.cell_box() != cells {
                return Err(CoreError::BoxMismatch {
                    expected: cells.surrounding_nodes(axis),
                    actual: f.valid_box(),
                });
            }
        }
        Ok(Self { u, v, w })
    }

    /// 按轴取分量
    #[inline]
    pub fn component(&self, axis: Axis) -> &Field3<S> {
        match axis {
            Axis::X => &self.u,
            Axis::Y => &self.v,
            Axis::Z => &self.w,
        }
    }

    /// 按轴取可变分量
    #[inline]
    pub fn component_mut(&mut self, axis: Axis) -> &mut Field3<S> {
        match axis {
            Axis::X => &mut self.u,
            Axis::Y => &mut self.v,
            Axis::Z => &mut self.w,
        }
    }

    /// 单元盒
    pub fn cell_box(&self) -> IndexBox {
        self.u.cell_box()
    }

    /// 三个分量中最小的光晕层数
    pub fn n_grow(&self) -> usize {
        self.u.n_grow().min(self.v.n_grow()).min(self.w.n_grow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells() -> IndexBox {
        IndexBox::from_extent([4, 3, 2]).unwrap()
    }

    #[test]
    fn test_cell_field_boxes() {
        let f = Field3::<f64>::cell_centered(cells(), 1, 0.0);
        assert_eq!(f.valid_box(), cells());
        assert_eq!(f.allocated_box().lo, IntVect::new(-1, -1, -1));
        assert_eq!(f.allocated_box().hi, IntVect::new(4, 3, 2));
        assert_eq!(f.as_array().dim(), (6, 5, 4));
    }

    #[test]
    fn test_face_field_boxes() {
        let f = Field3::<f32>::face_centered(cells(), Axis::Y, 1, 0.0);
        assert_eq!(f.valid_box().hi, IntVect::new(3, 3, 1));
        assert_eq!(f.cell_box(), cells());
        assert_eq!(f.centering(), Centering::Face(Axis::Y));
    }

    #[test]
    fn test_get_set_with_negative_index() {
        let mut f = Field3::<f64>::cell_centered(cells(), 1, 0.0);
        f.set(IntVect::new(-1, -1, -1), 3.5);
        assert_eq!(f.at(-1, -1, -1), 3.5);
        assert_eq!(f.try_get(IntVect::new(-2, 0, 0)), None);
    }

    #[test]
    #[should_panic]
    fn test_get_outside_halo_panics() {
        let f = Field3::<f64>::cell_centered(cells(), 1, 0.0);
        f.at(5, 0, 0);
    }

    #[test]
    fn test_fill_with_and_min_max() {
        let mut f = Field3::<f64>::cell_centered(cells(), 0, 0.0);
        f.fill_with(|iv| (iv.i() + 10 * iv.j() + 100 * iv.k()) as f64);
        assert_eq!(f.at(3, 2, 1), 123.0);
        assert_eq!(f.min_max(&cells()), (0.0, 123.0));
    }

    #[test]
    fn test_region_mut_checks_bounds() {
        let mut f = Field3::<f64>::cell_centered(cells(), 1, 0.0);
        assert!(f.region_mut(&cells().grow(1)).is_ok());
        assert!(f.region_mut(&cells().grow(2)).is_err());

        let mut view = f.region_mut(&cells()).unwrap();
        view[[0, 0, 0]] = 7.0;
        assert_eq!(f.at(0, 0, 0), 7.0);
    }

    #[test]
    fn test_staggered_from_components() {
        let b = cells();
        let ok = StaggeredField::from_components(
            Field3::<f64>::face_centered(b, Axis::X, 1, 0.0),
            Field3::face_centered(b, Axis::Y, 1, 0.0),
            Field3::face_centered(b, Axis::Z, 1, 0.0),
        );
        assert!(ok.is_ok());

        let swapped = StaggeredField::from_components(
            Field3::<f64>::face_centered(b, Axis::Y, 1, 0.0),
            Field3::face_centered(b, Axis::X, 1, 0.0),
            Field3::face_centered(b, Axis::Z, 1, 0.0),
        );
        assert!(swapped.is_err());
    }
}
