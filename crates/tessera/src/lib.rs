//! Middle end of a tensor compiler: an operator graph with boundary-aware
//! traversal, and a template injection engine that turns operators into
//! dispatch-ready kernels.
//!
//! Backends supply templates and register handlers; see the
//! `tessera-backend-wasm` crate for the reduction kernels.

pub mod codegen;
pub mod graph;

pub use codegen::{CodegenError, CodegenResult, Kernel, KernelGenerator};
pub use graph::{Graph, GraphError, GraphResult, NodeArena, NodeId};
