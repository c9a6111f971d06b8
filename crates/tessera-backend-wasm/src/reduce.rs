use log::debug;
use tessera::codegen::{CodegenError, CodegenResult, Kernel, KernelContext};
use tessera::graph::{Axis, NodeId, OperatorKind, ReduceKind, Variable};
use thiserror::Error;

use crate::kernels::reduce::{
    buffer_name, reduce_template, D, MAX_GID, N, X, X_STRIDE, X_TARGET_AXIS_STRIDE, Y, Y_SHAPE,
    Y_STRIDE,
};

/// Slot names a reduce operator binds.
pub const INPUT_SLOT: &str = "x";
pub const OUTPUT_SLOT: &str = "y";
/// Parameter selecting the reduced axis.
pub const AXIS_PARAMETER: &str = "axis";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("input has no {axis} axis to reduce")]
    MissingReducedAxis { axis: Axis },
    #[error("output extent along the reduced axis {axis} is {extent}, expected 1")]
    OutputNotReduced { axis: Axis, extent: usize },
    #[error("output axis {axis} is missing from the input")]
    MissingOutputAxis { axis: Axis },
    #[error("input holds {len} elements but the plan reads index {index}")]
    InputTooShort { index: usize, len: usize },
}

/// Static indexing metadata of one strided reduction.
///
/// Every vector is indexed by the output's axes in the output's order, so
/// `x` and `y` may use unrelated layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducePlan {
    pub axis: Axis,
    pub y_stride: Vec<usize>,
    pub y_shape: Vec<usize>,
    /// Stride of `x` along each of the output's axes.
    pub x_stride: Vec<usize>,
    pub d: usize,
    /// Extent of `x` along the reduced axis.
    pub n: usize,
    pub max_gid: usize,
    pub x_target_axis_stride: usize,
}

impl ReducePlan {
    /// `y` either keeps the reduced axis with extent 1 or drops it.
    pub fn new(x: &Variable, y: &Variable, axis: Axis) -> Result<Self, PlanError> {
        let n = x
            .shape_of(axis)
            .ok_or(PlanError::MissingReducedAxis { axis })?;
        let x_target_axis_stride = x
            .stride_of(axis)
            .ok_or(PlanError::MissingReducedAxis { axis })?;
        if let Some(extent) = y.shape_of(axis) {
            if extent != 1 {
                return Err(PlanError::OutputNotReduced { axis, extent });
            }
        }

        let x_stride = y
            .order()
            .axes()
            .iter()
            .map(|&out_axis| {
                x.stride_of(out_axis)
                    .ok_or(PlanError::MissingOutputAxis { axis: out_axis })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            axis,
            y_stride: y.strides().to_vec(),
            y_shape: y.shape().to_vec(),
            x_stride,
            d: y.ndim(),
            n,
            max_gid: y.size(),
            x_target_axis_stride,
        })
    }

    pub fn from_operator(ctx: &KernelContext<'_>, op: NodeId) -> CodegenResult<Self> {
        let x = ctx.input(op, INPUT_SLOT)?;
        let y = ctx.output(op, OUTPUT_SLOT)?;
        let axis = ctx.parameter_axis(op, AXIS_PARAMETER)?;
        Self::new(ctx.variable(x)?, ctx.variable(y)?, axis).map_err(|err| {
            CodegenError::InvalidParameter {
                operator: op,
                name: AXIS_PARAMETER.to_string(),
                reason: err.to_string(),
            }
        })
    }
}

fn reduce_kind(ctx: &KernelContext<'_>, op: NodeId) -> CodegenResult<ReduceKind> {
    match ctx.operator(op)?.kind() {
        OperatorKind::Reduce(kind) => Ok(*kind),
        other => Err(CodegenError::InvalidParameter {
            operator: op,
            name: "kind".to_string(),
            reason: format!("`{other}` is not a reduction"),
        }),
    }
}

/// Handler for every [`ReduceKind`].
pub fn reduce_handler(ctx: &KernelContext<'_>, op: NodeId) -> CodegenResult<Vec<Kernel>> {
    let kind = reduce_kind(ctx, op)?;
    let plan = ReducePlan::from_operator(ctx, op)?;
    let x = ctx.input(op, INPUT_SLOT)?;
    let y = ctx.output(op, OUTPUT_SLOT)?;

    let mut injector = ctx.buffer_injector();
    injector.register_buffer(buffer_name(kind, X), x, ctx.buffers())?;
    injector.register_buffer(buffer_name(kind, Y), y, ctx.buffers())?;
    injector.register(buffer_name(kind, Y_STRIDE), plan.y_stride.clone())?;
    injector.register(buffer_name(kind, Y_SHAPE), plan.y_shape.clone())?;
    injector.register(buffer_name(kind, X_STRIDE), plan.x_stride.clone())?;
    injector.register(buffer_name(kind, D), plan.d)?;
    injector.register(buffer_name(kind, N), plan.n)?;
    injector.register(buffer_name(kind, MAX_GID), plan.max_gid)?;
    injector.register(buffer_name(kind, X_TARGET_AXIS_STRIDE), plan.x_target_axis_stride)?;

    let namer = ctx.name_injector(kind.label());
    let source = injector.inject(&reduce_template(kind))?;
    let source = namer.inject(&source)?;
    debug!(
        "{} over {} for {op:?}: N={}, MAX_GID={}",
        namer.name(),
        plan.axis,
        plan.n,
        plan.max_gid
    );
    Ok(vec![Kernel::from_injector(namer.name(), source, &injector)?])
}
