use serde::{Deserialize, Serialize};

use super::error::{GraphError, GraphResult};
use super::order::{Axis, Order};

/// Static description of a tensor value.
///
/// Strides are row-major over the variable's own order: the last axis of the
/// order has stride 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    shape: Vec<usize>,
    order: Order,
    strides: Vec<usize>,
}

impl Variable {
    pub fn new(shape: Vec<usize>, order: Order) -> GraphResult<Self> {
        if shape.len() != order.ndim() {
            return Err(GraphError::RankMismatch {
                shape_rank: shape.len(),
                order_rank: order.ndim(),
                order: order.to_string(),
            });
        }
        let strides = row_major_strides(&shape);
        Ok(Self {
            shape,
            order,
            strides,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total element count.
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Extent along `axis`, if the variable has that axis.
    pub fn shape_of(&self, axis: Axis) -> Option<usize> {
        self.order.position(axis).map(|pos| self.shape[pos])
    }

    /// Linear-index multiplier along `axis`, if the variable has that axis.
    pub fn stride_of(&self, axis: Axis) -> Option<usize> {
        self.order.position(axis).map(|pos| self.strides[pos])
    }
}

fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for idx in (0..shape.len().saturating_sub(1)).rev() {
        strides[idx] = strides[idx + 1] * shape[idx + 1];
    }
    strides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_follow_the_variable_order() {
        let nc = Variable::new(vec![2, 3], Order::nc()).expect("nc variable");
        assert_eq!(nc.strides(), &[3, 1]);
        assert_eq!(nc.stride_of(Axis::N), Some(3));
        assert_eq!(nc.stride_of(Axis::C), Some(1));

        let cn = Variable::new(vec![3, 2], Order::cn()).expect("cn variable");
        assert_eq!(cn.strides(), &[2, 1]);
        assert_eq!(cn.stride_of(Axis::N), Some(1));
        assert_eq!(cn.stride_of(Axis::C), Some(2));
        assert_eq!(cn.shape_of(Axis::C), Some(3));
        assert_eq!(cn.size(), 6);
    }

    #[test]
    fn rank_mismatch_is_rejected() {
        let err = Variable::new(vec![1, 2, 3], Order::nc()).expect_err("rank mismatch");
        assert!(matches!(err, GraphError::RankMismatch { shape_rank: 3, .. }));
    }

    #[test]
    fn scalar_variable_has_unit_size() {
        let scalar = Variable::new(vec![], Order::new(vec![]).expect("empty order"))
            .expect("scalar variable");
        assert_eq!(scalar.size(), 1);
        assert!(scalar.strides().is_empty());
    }
}
