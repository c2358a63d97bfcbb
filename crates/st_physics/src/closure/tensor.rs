// crates/st_physics/src/closure/tensor.rs

//! 单元中心的对称应变率张量
//!
//! 对角分量直接取 Next 侧差分；非对角分量把四个棱点平均到单元中心。
//! [`AssemblyPath`] 控制非对角分量用 (a, b) 还是 (b, a) 顺序求值。
//! 两条路径访问同一组四个棱点，求和顺序按轴序固定，结果逐位相等。

use st_core::{Axis, IntVect, OffsetSense, Scalar, StaggeredField};

use super::strain_rate::{edge_average, strain_rate};

/// 非对角分量的求值顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssemblyPath {
    /// (X,Y), (X,Z), (Y,Z)
    #[default]
    Primary,
    /// (Y,X), (Z,X), (Z,Y)
    Transposed,
}

impl AssemblyPath {
    fn order(self, a: Axis, b: Axis) -> (Axis, Axis) {
        match self {
            Self::Primary => (a, b),
            Self::Transposed => (b, a),
        }
    }
}

/// 对称应变率张量（6 个独立分量）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrainRateTensor<S: Scalar> {
    /// S_xx
    pub s11: S,
    /// S_yy
    pub s22: S,
    /// S_zz
    pub s33: S,
    /// S_xy
    pub s12: S,
    /// S_xz
    pub s13: S,
    /// S_yz
    pub s23: S,
}

impl<S: Scalar> StrainRateTensor<S> {
    /// 按轴取分量，S_ab == S_ba
    pub fn get(&self, a: Axis, b: Axis) -> S {
        match (a, b) {
            (Axis::X, Axis::X) => self.s11,
            (Axis::Y, Axis::Y) => self.s22,
            (Axis::Z, Axis::Z) => self.s33,
            (Axis::X, Axis::Y) | (Axis::Y, Axis::X) => self.s12,
            (Axis::X, Axis::Z) | (Axis::Z, Axis::X) => self.s13,
            (Axis::Y, Axis::Z) | (Axis::Z, Axis::Y) => self.s23,
        }
    }

    /// 双点积 S_mn S_mn
    #[inline]
    pub fn contraction(&self) -> S {
        self.s11 * self.s11
            + self.s22 * self.s22
            + self.s33 * self.s33
            + S::TWO * self.s12 * self.s12
            + S::TWO * self.s13 * self.s13
            + S::TWO * self.s23 * self.s23
    }

    /// 应变率模 |S| = √(2 S_mn S_mn)
    #[inline]
    pub fn magnitude(&self) -> S {
        (S::TWO * self.contraction()).sqrt()
    }

    /// 迹（等于散度）
    #[inline]
    pub fn trace(&self) -> S {
        self.s11 + self.s22 + self.s33
    }
}

/// 在单元 `iv` 组装应变率张量
#[inline]
pub fn strain_rate_tensor<S: Scalar>(
    iv: IntVect,
    vel: &StaggeredField<S>,
    cell_size: &[S; 3],
) -> StrainRateTensor<S> {
    strain_rate_tensor_via(AssemblyPath::Primary, iv, vel, cell_size)
}

/// 按指定求值顺序组装应变率张量
pub fn strain_rate_tensor_via<S: Scalar>(
    path: AssemblyPath,
    iv: IntVect,
    vel: &StaggeredField<S>,
    cell_size: &[S; 3],
) -> StrainRateTensor<S> {
    let diag = |a: Axis| strain_rate(iv, vel, OffsetSense::Next, a, a, cell_size);
    let edge = |a: Axis, b: Axis| {
        let (eqn, dir) = path.order(a, b);
        edge_average(iv, vel, eqn, dir, cell_size)
    };

    StrainRateTensor {
        s11: diag(Axis::X),
        s22: diag(Axis::Y),
        s33: diag(Axis::Z),
        s12: edge(Axis::X, Axis::Y),
        s13: edge(Axis::X, Axis::Z),
        s23: edge(Axis::Y, Axis::Z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use st_core::IndexBox;

    fn cells() -> IndexBox {
        IndexBox::from_extent([4, 4, 4]).unwrap()
    }

    fn wavy_field() -> StaggeredField<f64> {
        let mut vel = StaggeredField::new(cells(), 1, 0.0);
        vel.u.fill_with(|iv| (0.3 * iv.i() as f64 + 0.7 * iv.j() as f64).sin() + 0.1 * iv.k() as f64);
        vel.v.fill_with(|iv| (0.5 * iv.k() as f64 - 0.2 * iv.i() as f64).cos());
        vel.w.fill_with(|iv| 0.05 * (iv.i() * iv.j()) as f64 - 0.3 * iv.k() as f64);
        vel
    }

    #[test]
    fn test_get_is_symmetric() {
        let t = StrainRateTensor { s11: 1.0, s22: 2.0, s33: 3.0, s12: 4.0, s13: 5.0, s23: 6.0 };
        for a in Axis::ALL {
            for b in Axis::ALL {
                assert_eq!(t.get(a, b), t.get(b, a));
            }
        }
        assert_eq!(t.get(Axis::Z, Axis::Y), 6.0);
        assert_eq!(t.trace(), 6.0);
    }

    #[test]
    fn test_contraction_and_magnitude() {
        let t = StrainRateTensor { s11: 1.0, s22: 0.0, s33: 0.0, s12: 1.0, s13: 0.0, s23: 0.0 };
        assert_relative_eq!(t.contraction(), 3.0);
        assert_relative_eq!(t.magnitude(), 6.0_f64.sqrt());
    }

    #[test]
    fn test_paths_agree() {
        let vel = wavy_field();
        let dx = [1.0, 0.5, 2.0];
        for iv in cells().iter() {
            let p = strain_rate_tensor_via(AssemblyPath::Primary, iv, &vel, &dx);
            let t = strain_rate_tensor_via(AssemblyPath::Transposed, iv, &vel, &dx);
            assert_eq!(p, t, "{iv}");
            assert_eq!(p.contraction().to_bits(), t.contraction().to_bits());
        }
    }

    #[test]
    fn test_uniform_flow_has_zero_strain() {
        let mut vel = StaggeredField::new(cells(), 1, 0.0);
        vel.u.fill(3.0);
        vel.v.fill(-1.0);
        vel.w.fill(0.5);
        let t = strain_rate_tensor(IntVect::new(2, 1, 3), &vel, &[1.0, 1.0, 1.0]);
        assert_eq!(t, StrainRateTensor::default());
    }
}
