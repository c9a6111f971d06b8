use std::collections::HashMap;
use std::fmt;

use log::warn;

use super::buffer::{BufferDescriptor, BufferLookup};
use super::buffer_injector::BufferInjector;
use super::error::{CodegenError, CodegenResult};
use super::kernel::Kernel;
use super::name_injector::{KernelNameInjector, SymbolCounter};
use super::options::CodegenOptions;
use crate::graph::{Axis, NodeArena, NodeId, Operator, OperatorKind, Parameter, Variable};

/// Turns one operator into kernels. Handlers read static graph metadata only.
pub type KernelHandler = fn(&KernelContext<'_>, NodeId) -> CodegenResult<Vec<Kernel>>;

#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<OperatorKind, KernelHandler>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, returning the handler it replaced.
    pub fn register(&mut self, kind: OperatorKind, handler: KernelHandler) -> Option<KernelHandler> {
        let previous = self.handlers.insert(kind.clone(), handler);
        if previous.is_some() {
            warn!("replacing kernel handler for operator kind `{kind}`");
        }
        previous
    }

    pub fn get(&self, kind: &OperatorKind) -> Option<KernelHandler> {
        self.handlers.get(kind).copied()
    }

    pub fn contains(&self, kind: &OperatorKind) -> bool {
        self.handlers.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Everything a handler may consult while generating one operator.
#[derive(Clone, Copy)]
pub struct KernelContext<'a> {
    arena: &'a NodeArena,
    buffers: &'a dyn BufferLookup,
    counter: &'a SymbolCounter,
    options: &'a CodegenOptions,
}

impl<'a> KernelContext<'a> {
    pub fn new(
        arena: &'a NodeArena,
        buffers: &'a dyn BufferLookup,
        counter: &'a SymbolCounter,
        options: &'a CodegenOptions,
    ) -> Self {
        Self {
            arena,
            buffers,
            counter,
            options,
        }
    }

    pub fn arena(&self) -> &'a NodeArena {
        self.arena
    }

    pub fn buffers(&self) -> &'a dyn BufferLookup {
        self.buffers
    }

    pub fn options(&self) -> &'a CodegenOptions {
        self.options
    }

    pub fn operator(&self, op: NodeId) -> CodegenResult<&'a Operator> {
        Ok(self.arena.operator(op)?)
    }

    pub fn variable(&self, variable: NodeId) -> CodegenResult<&'a Variable> {
        Ok(self.arena.variable(variable)?)
    }

    pub fn input(&self, op: NodeId, slot: &str) -> CodegenResult<NodeId> {
        self.operator(op)?
            .input(slot)
            .ok_or_else(|| CodegenError::MissingSlot {
                operator: op,
                slot: slot.to_string(),
            })
    }

    pub fn output(&self, op: NodeId, slot: &str) -> CodegenResult<NodeId> {
        self.operator(op)?
            .output(slot)
            .ok_or_else(|| CodegenError::MissingSlot {
                operator: op,
                slot: slot.to_string(),
            })
    }

    pub fn buffer_of(&self, variable: NodeId) -> CodegenResult<BufferDescriptor> {
        self.buffers
            .buffer_of(variable)
            .ok_or(CodegenError::MissingBuffer { variable })
    }

    pub fn parameter_axis(&self, op: NodeId, name: &str) -> CodegenResult<Axis> {
        match self.operator(op)?.parameter(name) {
            Some(Parameter::Axis(axis)) => Ok(*axis),
            Some(other) => Err(CodegenError::InvalidParameter {
                operator: op,
                name: name.to_string(),
                reason: format!("expected an axis, found {other:?}"),
            }),
            None => Err(CodegenError::MissingParameter {
                operator: op,
                name: name.to_string(),
            }),
        }
    }

    /// Fresh injector configured with this compile's buffer names.
    pub fn buffer_injector(&self) -> BufferInjector {
        BufferInjector::new(self.options)
    }

    pub fn name_injector(&self, label: &str) -> KernelNameInjector {
        KernelNameInjector::new(label, self.counter)
    }
}
