//! Template injection and kernel generation.
//!
//! Handlers fill backend templates through a [`BufferInjector`] and a
//! [`KernelNameInjector`] and wrap the result in a [`Kernel`]. The
//! [`KernelGenerator`] dispatches every operator of a graph to the handler
//! registered for its kind.

mod buffer;
mod buffer_injector;
mod error;
mod generator;
mod kernel;
mod name_injector;
mod options;
mod registry;
mod template;

pub use buffer::{BufferBinding, BufferDescriptor, BufferLookup, BufferRegion, MemoryLayout};
pub use buffer_injector::{
    BufferInjector, MetaInt, MetaValue, UnresolvedValue, LOAD_BUFFER_TAG, META_BUFFER_TAG,
};
pub use error::{CodegenError, CodegenResult};
pub use generator::KernelGenerator;
pub use kernel::Kernel;
pub use name_injector::{sanitize_symbol, KernelNameInjector, SymbolCounter, FUNC_NAME_TAG};
pub use options::{CodegenOptions, DUMP_KERNELS_ENV};
pub use registry::{HandlerRegistry, KernelContext, KernelHandler};
pub use template::{Placeholder, Segment, Template};
