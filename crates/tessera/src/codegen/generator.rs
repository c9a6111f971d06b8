use log::debug;

use super::buffer::BufferLookup;
use super::error::{CodegenError, CodegenResult};
use super::kernel::Kernel;
use super::name_injector::SymbolCounter;
use super::options::CodegenOptions;
use super::registry::{HandlerRegistry, KernelContext};
use crate::graph::{listup_operators, Graph, NodeArena};

/// Drives handlers over every operator of a graph.
///
/// Owns the symbol counter, so kernel names stay unique across every
/// `generate` call made through the same generator.
#[derive(Debug)]
pub struct KernelGenerator {
    registry: HandlerRegistry,
    options: CodegenOptions,
    counter: SymbolCounter,
}

impl KernelGenerator {
    /// Generator with default options plus environment overrides.
    pub fn new(registry: HandlerRegistry) -> Self {
        Self::with_options(registry, CodegenOptions::from_env())
    }

    pub fn with_options(registry: HandlerRegistry, options: CodegenOptions) -> Self {
        Self {
            registry,
            options,
            counter: SymbolCounter::new(),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    /// Kernels for the operators of `graph`, in traversal order.
    pub fn generate(
        &self,
        arena: &NodeArena,
        graph: &Graph,
        buffers: &dyn BufferLookup,
    ) -> CodegenResult<Vec<Kernel>> {
        let ctx = KernelContext::new(arena, buffers, &self.counter, &self.options);
        let mut kernels = Vec::new();
        for op in listup_operators(arena, graph) {
            let kind = arena.operator(op)?.kind();
            let handler = self
                .registry
                .get(kind)
                .ok_or_else(|| CodegenError::MissingHandler { kind: kind.clone() })?;
            for kernel in handler(&ctx, op)? {
                debug!(
                    "generated kernel `{}` for {op:?} ({kind}): {} buffer(s), {} meta slot(s)",
                    kernel.entry(),
                    kernel.buffers().len(),
                    kernel.unresolved_values().len()
                );
                if self.options.dump_kernels {
                    debug!("kernel `{}` source:\n{}", kernel.entry(), kernel.entry_source());
                }
                kernels.push(kernel);
            }
        }
        Ok(kernels)
    }
}
