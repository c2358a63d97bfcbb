// crates/st_physics/src/boundary.rs

//! 光晕层填充
//!
//! 按 x、y、z 顺序逐轴填充，后处理的轴会复制前面轴已填好的光晕，
//! 因此棱角处的光晕也得到定义。
//!
//! - [`HaloKind::Periodic`]: 沿该轴按单元周期取模。面心场沿法向的
//!   上边界面 (hi + 1) 与下边界面是同一个面，会被下边界面的值覆盖
//! - [`HaloKind::Extrapolate`]: 零梯度外推，取最近的有效值

use st_config::HaloKind;
use st_core::{Axis, CoreError, Field3, IndexBox, Scalar, StaggeredField};

use crate::error::PhysicsResult;

/// 填充单个场的光晕层
///
/// `domain` 为单元盒，必须与场的单元盒一致。
pub fn fill_halo<S: Scalar>(
    field: &mut Field3<S>,
    domain: &IndexBox,
    kinds: &[HaloKind; 3],
) -> PhysicsResult<()> {
    if field.cell_box() != *domain {
        return Err(CoreError::BoxMismatch {
            expected: *domain,
            actual: field.cell_box(),
        }
        .into());
    }

    let allocated = field.allocated_box();
    let valid = field.valid_box();
    for axis in Axis::ALL {
        let d = axis.index();
        let (dlo, dhi) = (domain.lo.0[d], domain.hi.0[d]);
        let (vlo, vhi) = (valid.lo.0[d], valid.hi.0[d]);
        let period = dhi - dlo + 1;

        for iv in allocated.iter() {
            let x = iv.0[d];
            let source = match kinds[d] {
                HaloKind::Periodic if x < dlo || x > dhi => dlo + (x - dlo).rem_euclid(period),
                HaloKind::Extrapolate if x < vlo || x > vhi => x.clamp(vlo, vhi),
                _ => continue,
            };
            let mut src = iv;
            src.0[d] = source;
            let value = field.get(src);
            field.set(iv, value);
        }
    }
    Ok(())
}

/// 填充交错矢量场三个分量的光晕层
pub fn fill_halo_staggered<S: Scalar>(
    field: &mut StaggeredField<S>,
    domain: &IndexBox,
    kinds: &[HaloKind; 3],
) -> PhysicsResult<()> {
    for axis in Axis::ALL {
        fill_halo(field.component_mut(axis), domain, kinds)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_core::IntVect;

    const PERIODIC: [HaloKind; 3] = [HaloKind::Periodic; 3];
    const EXTRAPOLATE: [HaloKind; 3] = [HaloKind::Extrapolate; 3];

    fn domain() -> IndexBox {
        IndexBox::from_extent([4, 3, 2]).unwrap()
    }

    fn indexed(f: &mut Field3<f64>) {
        let valid = f.valid_box();
        f.fill_with(|iv| {
            if valid.contains(iv) {
                (iv.i() + 10 * iv.j() + 100 * iv.k()) as f64
            } else {
                f64::NAN
            }
        });
    }

    #[test]
    fn test_periodic_cell_field() {
        let mut f = Field3::cell_centered(domain(), 1, 0.0);
        indexed(&mut f);
        fill_halo(&mut f, &domain(), &PERIODIC).unwrap();

        assert_eq!(f.at(-1, 0, 0), 3.0);
        assert_eq!(f.at(4, 2, 1), 120.0);
        // 角点
        assert_eq!(f.at(-1, -1, -1), 123.0);
        assert!(f.as_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_periodic_face_field_wraps_hi_face() {
        let mut u = Field3::face_centered(domain(), Axis::X, 1, 0.0);
        indexed(&mut u);
        u.set(IntVect::new(4, 1, 1), 999.0);
        fill_halo(&mut u, &domain(), &PERIODIC).unwrap();

        assert_eq!(u.at(4, 1, 1), u.at(0, 1, 1));
        assert_eq!(u.at(5, 1, 1), u.at(1, 1, 1));
        assert_eq!(u.at(-1, 1, 1), u.at(3, 1, 1));
    }

    #[test]
    fn test_extrapolate() {
        let mut w = Field3::face_centered(domain(), Axis::Z, 1, 0.0);
        indexed(&mut w);
        fill_halo(&mut w, &domain(), &EXTRAPOLATE).unwrap();

        // z 面心的有效区域为 k = 0..=2
        assert_eq!(w.at(0, 0, -1), 0.0);
        assert_eq!(w.at(0, 0, 3), 200.0);
        assert_eq!(w.at(-1, 3, 2), 220.0);
        assert!(w.as_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_mixed_kinds() {
        let mut f = Field3::cell_centered(domain(), 2, 0.0);
        indexed(&mut f);
        let kinds = [HaloKind::Periodic, HaloKind::Periodic, HaloKind::Extrapolate];
        fill_halo(&mut f, &domain(), &kinds).unwrap();
        assert_eq!(f.at(-2, 0, 0), 2.0);
        assert_eq!(f.at(0, 0, 3), 100.0);
        assert_eq!(f.at(5, 4, -2), 11.0);
    }

    #[test]
    fn test_domain_mismatch() {
        let mut f = Field3::<f64>::cell_centered(domain(), 1, 0.0);
        let other = IndexBox::from_extent([4, 3, 3]).unwrap();
        assert!(fill_halo(&mut f, &other, &PERIODIC).is_err());
    }

    #[test]
    fn test_staggered() {
        let mut vel = StaggeredField::new(domain(), 1, 0.0);
        for axis in Axis::ALL {
            indexed(vel.component_mut(axis));
        }
        fill_halo_staggered(&mut vel, &domain(), &PERIODIC).unwrap();
        assert!(vel.v.as_array().iter().all(|v| v.is_finite()));
    }
}
