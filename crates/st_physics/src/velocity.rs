// crates/st_physics/src/velocity.rs

//! 守恒变量与原始变量之间的转换
//!
//! 面 `iv`（法向 a）上的密度取相邻两个单元的算术平均：
//!
//! ```text
//! ρ_face = ½ (ρ(iv) + ρ(iv - e_a))
//! u_a    = 2 m_a / (ρ(iv) + ρ(iv - e_a))
//! ```
//!
//! 边界面 (lo 与 hi + 1) 会读到单元盒外的密度，密度场需要至少一层光晕。

use st_config::ExecutionPolicy;
use st_core::{Axis, Field3, IndexBox, Scalar, StaggeredField};

use crate::error::{PhysicsError, PhysicsResult};
use crate::parallel::parallel_for;

fn check_face_density<S: Scalar>(density: &Field3<S>, faces: &IndexBox, axis: Axis) -> PhysicsResult<()> {
    let required = IndexBox {
        lo: faces.lo.shifted(axis, -1),
        hi: faces.hi,
    };
    if !density.allocated_box().contains_box(&required) {
        return Err(PhysicsError::InsufficientHalo {
            field: "density",
            required,
            available: density.allocated_box(),
        });
    }
    Ok(())
}

fn check_same_faces<S: Scalar>(source: &Field3<S>, faces: &IndexBox, name: &'static str) -> PhysicsResult<()> {
    if !source.allocated_box().contains_box(faces) {
        return Err(PhysicsError::TileOutsideField {
            field: name,
            tile: *faces,
            available: source.allocated_box(),
        });
    }
    Ok(())
}

/// 由动量和密度计算面上的速度，写入 `velocity` 各分量的有效区域
pub fn momentum_to_velocity<S: Scalar>(
    momentum: &StaggeredField<S>,
    density: &Field3<S>,
    velocity: &mut StaggeredField<S>,
    policy: ExecutionPolicy,
) -> PhysicsResult<()> {
    for axis in Axis::ALL {
        let faces = velocity.component(axis).valid_box();
        check_face_density(density, &faces, axis)?;
        let m = momentum.component(axis);
        check_same_faces(m, &faces, "momentum")?;

        parallel_for(velocity.component_mut(axis), &faces, policy, |iv| {
            S::TWO * m.get(iv) / (density.get(iv) + density.get(iv.shifted(axis, -1)))
        })?;
    }
    Ok(())
}

/// 由速度和密度计算面上的动量，写入 `momentum` 各分量的有效区域
pub fn velocity_to_momentum<S: Scalar>(
    velocity: &StaggeredField<S>,
    density: &Field3<S>,
    momentum: &mut StaggeredField<S>,
    policy: ExecutionPolicy,
) -> PhysicsResult<()> {
    for axis in Axis::ALL {
        let faces = momentum.component(axis).valid_box();
        check_face_density(density, &faces, axis)?;
        let u = velocity.component(axis);
        check_same_faces(u, &faces, "velocity")?;

        parallel_for(momentum.component_mut(axis), &faces, policy, |iv| {
            S::HALF * (density.get(iv) + density.get(iv.shifted(axis, -1))) * u.get(iv)
        })?;
    }
    Ok(())
}
