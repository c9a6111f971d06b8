//! Host-side evaluation of the reduce kernels.
//!
//! Runs the same strided walk as the generated C, so a [`ReducePlan`] can be
//! checked against plain `f32` data without a wasm runtime.

use tessera::graph::ReduceKind;

use crate::reduce::{PlanError, ReducePlan};

pub fn evaluate_reduce(plan: &ReducePlan, kind: ReduceKind, x: &[f32]) -> Result<Vec<f32>, PlanError> {
    let mut y = Vec::with_capacity(plan.max_gid);
    for gid in 0..plan.max_gid {
        let mut x_index = 0usize;
        for d in 0..plan.d {
            x_index += ((gid / plan.y_stride[d]) % plan.y_shape[d]) * plan.x_stride[d];
        }

        let mut acc = kind.identity();
        for _ in 0..plan.n {
            let value = *x.get(x_index).ok_or(PlanError::InputTooShort {
                index: x_index,
                len: x.len(),
            })?;
            acc = kind.combine(acc, value);
            x_index += plan.x_target_axis_stride;
        }
        y.push(acc);
    }
    Ok(y)
}
