//! Semantic axes and axis orders.
//!
//! A variable's shape is positional; its [`Order`] says which semantic axis
//! sits at each position. Handlers index by axis rather than by position, so
//! the same kernel works for `N,C` and `C,N` layouts alike.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{GraphError, GraphResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    N,
    C,
    H,
    W,
    T,
}

impl Axis {
    pub const fn label(self) -> &'static str {
        match self {
            Axis::N => "N",
            Axis::C => "C",
            Axis::H => "H",
            Axis::W => "W",
            Axis::T => "T",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered list of distinct axes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    axes: Vec<Axis>,
}

impl Order {
    pub fn new(axes: Vec<Axis>) -> GraphResult<Self> {
        for (idx, axis) in axes.iter().enumerate() {
            if axes[..idx].contains(axis) {
                return Err(GraphError::DuplicateAxis { axis: *axis });
            }
        }
        Ok(Self { axes })
    }

    fn from_static(axes: &[Axis]) -> Self {
        Self {
            axes: axes.to_vec(),
        }
    }

    pub fn c() -> Self {
        Self::from_static(&[Axis::C])
    }

    pub fn nc() -> Self {
        Self::from_static(&[Axis::N, Axis::C])
    }

    pub fn cn() -> Self {
        Self::from_static(&[Axis::C, Axis::N])
    }

    pub fn nchw() -> Self {
        Self::from_static(&[Axis::N, Axis::C, Axis::H, Axis::W])
    }

    pub fn nhwc() -> Self {
        Self::from_static(&[Axis::N, Axis::H, Axis::W, Axis::C])
    }

    pub fn tnc() -> Self {
        Self::from_static(&[Axis::T, Axis::N, Axis::C])
    }

    pub fn ntc() -> Self {
        Self::from_static(&[Axis::N, Axis::T, Axis::C])
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Position of `axis` in this order.
    pub fn position(&self, axis: Axis) -> Option<usize> {
        self.axes.iter().position(|candidate| *candidate == axis)
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.position(axis).is_some()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, axis) in self.axes.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{axis}")?;
        }
        Ok(())
    }
}
