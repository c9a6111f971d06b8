use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::buffer_injector::MetaInt;
use crate::graph::NodeId;

/// Which runtime allocation a buffer lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferRegion {
    /// Planned ahead of time; offsets are usually known constants.
    Static,
    /// Allocated per dispatch; offsets may only be known at run time.
    Dynamic,
}

/// Placement of one variable's storage, as reported by the memory planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferDescriptor {
    pub region: BufferRegion,
    /// Element offset into the region.
    pub offset: MetaInt,
    pub size_bytes: usize,
}

impl BufferDescriptor {
    pub fn fixed(region: BufferRegion, offset: usize, size_bytes: usize) -> Self {
        Self {
            region,
            offset: MetaInt::from(offset),
            size_bytes,
        }
    }

    pub fn deferred(region: BufferRegion, symbol: impl Into<String>, size_bytes: usize) -> Self {
        Self {
            region,
            offset: MetaInt::symbol(symbol),
            size_bytes,
        }
    }
}

/// A buffer registered with an injector under a template name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferBinding {
    pub name: String,
    pub variable: NodeId,
    pub descriptor: BufferDescriptor,
}

/// Read-only view of the memory plan consulted by handlers.
pub trait BufferLookup {
    fn buffer_of(&self, variable: NodeId) -> Option<BufferDescriptor>;
}

/// In-memory memory plan keyed by variable.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayout {
    buffers: HashMap<NodeId, BufferDescriptor>,
}

impl MemoryLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: NodeId, descriptor: BufferDescriptor) -> Option<BufferDescriptor> {
        self.buffers.insert(variable, descriptor)
    }

    pub fn with(mut self, variable: NodeId, descriptor: BufferDescriptor) -> Self {
        self.insert(variable, descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl BufferLookup for MemoryLayout {
    fn buffer_of(&self, variable: NodeId) -> Option<BufferDescriptor> {
        self.buffers.get(&variable).cloned()
    }
}
