use tessera::graph::ReduceKind;

/// Names the reduce template loads, suffixed onto the kind label
/// (`prod_X`, `sum_y_stride`, ...).
pub const X: &str = "X";
pub const Y: &str = "Y";
pub const Y_STRIDE: &str = "y_stride";
pub const Y_SHAPE: &str = "y_shape";
pub const X_STRIDE: &str = "x_stride";
pub const D: &str = "D";
pub const N: &str = "N";
pub const MAX_GID: &str = "MAX_GID";
pub const X_TARGET_AXIS_STRIDE: &str = "x_target_axis_stride";

pub fn buffer_name(kind: ReduceKind, name: &str) -> String {
    format!("{}_{name}", kind.label())
}

fn identity(kind: ReduceKind) -> &'static str {
    match kind {
        ReduceKind::Prod => "1.0f",
        ReduceKind::Sum => "0.0f",
        ReduceKind::Max => "-INFINITY",
        ReduceKind::Min => "INFINITY",
    }
}

/// Headers the identity literal depends on.
fn includes(kind: ReduceKind) -> &'static str {
    match kind {
        ReduceKind::Max | ReduceKind::Min => "#include <math.h>\n\n",
        ReduceKind::Prod | ReduceKind::Sum => "",
    }
}

fn combine(kind: ReduceKind) -> &'static str {
    match kind {
        ReduceKind::Prod => "y *= x;",
        ReduceKind::Sum => "y += x;",
        ReduceKind::Max => "if (x > y) y = x;",
        ReduceKind::Min => "if (x < y) y = x;",
    }
}

/// Strided single-axis reduction.
///
/// Each output index is decomposed through `y_stride`/`y_shape` into a base
/// offset of `X`, then `N` elements are combined walking
/// `x_target_axis_stride`.
pub fn reduce_template(kind: ReduceKind) -> String {
    let label = kind.label();
    let header = includes(kind);
    let init = identity(kind);
    let update = combine(kind);
    format!(
        r#"{header}void %%FUNC_NAME%%(const int * %%META_BUFFER%%)
{{
    const float * X = %%LOAD_BUFFER({label}_X)%%;
    float * Y = %%LOAD_BUFFER({label}_Y)%%;
    const int * y_stride = %%LOAD_BUFFER({label}_y_stride)%%;
    const int * y_shape = %%LOAD_BUFFER({label}_y_shape)%%;
    const int * x_stride = %%LOAD_BUFFER({label}_x_stride)%%;
    const int D = %%LOAD_BUFFER({label}_D)%%;
    const int N = %%LOAD_BUFFER({label}_N)%%;
    const int MAX_GID = %%LOAD_BUFFER({label}_MAX_GID)%%;
    const int x_target_axis_stride = %%LOAD_BUFFER({label}_x_target_axis_stride)%%;

    for (int gid = 0; gid < MAX_GID; gid++) {{
        int x_index = 0;
        for (int d = 0; d < D; d++) {{
            x_index += ((gid / y_stride[d]) % y_shape[d]) * x_stride[d];
        }}

        float y = {init};
        for (int i = 0; i < N; i++) {{
            const float x = X[x_index];
            {update}
            x_index += x_target_axis_stride;
        }}

        Y[gid] = y;
    }}
}}
"#
    )
}
