//! WebAssembly backend for tessera.
//!
//! Kernels are emitted as C source meant to be compiled to wasm. Buffers are
//! addressed as offsets into the static and dynamic arenas; values only known
//! at dispatch are read from the per-kernel meta buffer.

pub mod kernels;
pub mod reduce;
pub mod reference;

use tessera::codegen::HandlerRegistry;
use tessera::graph::{OperatorKind, ReduceKind};

pub use reduce::{reduce_handler, PlanError, ReducePlan};

pub fn register_handlers(registry: &mut HandlerRegistry) {
    for kind in ReduceKind::ALL {
        registry.register(OperatorKind::Reduce(kind), reduce_handler);
    }
}

pub fn default_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    register_handlers(&mut registry);
    registry
}
