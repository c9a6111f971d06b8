//! `%%LOAD_BUFFER(name)%%` and `%%META_BUFFER%%` substitution.

use std::collections::HashMap;

use log::trace;
use serde::{Deserialize, Serialize};

use super::buffer::{BufferBinding, BufferLookup, BufferRegion};
use super::error::{CodegenError, CodegenResult};
use super::options::CodegenOptions;
use super::template::{malformed, Template};
use crate::graph::NodeId;

pub const LOAD_BUFFER_TAG: &str = "LOAD_BUFFER";
pub const META_BUFFER_TAG: &str = "META_BUFFER";

/// An integer that is either known at compile time or deferred to dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaInt {
    Const(i64),
    /// Resolved at dispatch through a meta buffer slot.
    Symbol(String),
}

impl MetaInt {
    pub fn symbol(name: impl Into<String>) -> Self {
        MetaInt::Symbol(name.into())
    }

    pub fn is_const(&self) -> bool {
        matches!(self, MetaInt::Const(_))
    }
}

impl From<i64> for MetaInt {
    fn from(value: i64) -> Self {
        MetaInt::Const(value)
    }
}

/// Extents above `i64::MAX` cannot be addressed by a kernel and saturate.
impl From<usize> for MetaInt {
    fn from(value: usize) -> Self {
        MetaInt::Const(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

/// A value bound to a template name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaValue {
    Int(MetaInt),
    Ints(Vec<MetaInt>),
    Buffer(BufferBinding),
}

impl From<MetaInt> for MetaValue {
    fn from(value: MetaInt) -> Self {
        MetaValue::Int(value)
    }
}

impl From<usize> for MetaValue {
    fn from(value: usize) -> Self {
        MetaValue::Int(value.into())
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Int(value.into())
    }
}

impl From<Vec<usize>> for MetaValue {
    fn from(values: Vec<usize>) -> Self {
        MetaValue::Ints(values.into_iter().map(MetaInt::from).collect())
    }
}

impl From<Vec<MetaInt>> for MetaValue {
    fn from(values: Vec<MetaInt>) -> Self {
        MetaValue::Ints(values)
    }
}

/// A dispatch-time value and the meta buffer slot it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedValue {
    pub slot: usize,
    pub symbol: String,
}

/// Registry of template names for one kernel.
///
/// Unresolved symbols get meta buffer slots in first-registration order, one
/// slot per distinct symbol. Injection reads the registry only, so injecting
/// the same template twice yields identical text.
#[derive(Debug, Clone)]
pub struct BufferInjector {
    meta_buffer_name: String,
    static_buffer_name: String,
    dynamic_buffer_name: String,
    entries: Vec<(String, MetaValue)>,
    index: HashMap<String, usize>,
    unresolved: Vec<UnresolvedValue>,
    slots: HashMap<String, usize>,
}

impl Default for BufferInjector {
    fn default() -> Self {
        Self::new(&CodegenOptions::default())
    }
}

impl BufferInjector {
    pub fn new(options: &CodegenOptions) -> Self {
        Self {
            meta_buffer_name: options.meta_buffer_name.clone(),
            static_buffer_name: options.static_buffer_name.clone(),
            dynamic_buffer_name: options.dynamic_buffer_name.clone(),
            entries: Vec::new(),
            index: HashMap::new(),
            unresolved: Vec::new(),
            slots: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, value: impl Into<MetaValue>) -> CodegenResult<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(CodegenError::DuplicateBufferName { name });
        }
        let value = value.into();
        match &value {
            MetaValue::Int(int) => self.claim_slot(int),
            MetaValue::Ints(ints) => ints.iter().for_each(|int| self.claim_slot(int)),
            MetaValue::Buffer(binding) => self.claim_slot(&binding.descriptor.offset),
        }
        trace!("registered `{name}` as {value:?}");
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        Ok(())
    }

    /// Registers the storage of `variable` under `name`.
    pub fn register_buffer(
        &mut self,
        name: impl Into<String>,
        variable: NodeId,
        lookup: &dyn BufferLookup,
    ) -> CodegenResult<()> {
        let name = name.into();
        let descriptor = lookup
            .buffer_of(variable)
            .ok_or(CodegenError::MissingBuffer { variable })?;
        let binding = BufferBinding {
            name: name.clone(),
            variable,
            descriptor,
        };
        self.register(name, MetaValue::Buffer(binding))
    }

    fn claim_slot(&mut self, int: &MetaInt) {
        if let MetaInt::Symbol(symbol) = int {
            if !self.slots.contains_key(symbol) {
                let slot = self.unresolved.len();
                self.slots.insert(symbol.clone(), slot);
                self.unresolved.push(UnresolvedValue {
                    slot,
                    symbol: symbol.clone(),
                });
            }
        }
    }

    pub fn value(&self, name: &str) -> Option<&MetaValue> {
        self.index.get(name).map(|idx| &self.entries[*idx].1)
    }

    /// Registered buffers in registration order.
    pub fn buffers(&self) -> Vec<BufferBinding> {
        self.entries
            .iter()
            .filter_map(|(_, value)| match value {
                MetaValue::Buffer(binding) => Some(binding.clone()),
                _ => None,
            })
            .collect()
    }

    /// Dispatch-time values ordered by meta buffer slot.
    pub fn unresolved_values(&self) -> &[UnresolvedValue] {
        &self.unresolved
    }

    /// Rewrites the buffer placeholders of `template`, leaving other tags in
    /// place.
    pub fn inject(&self, template: &str) -> CodegenResult<String> {
        let parsed = Template::parse(template)?;
        parsed.render(|placeholder| match (placeholder.name, placeholder.arg) {
            (META_BUFFER_TAG, None) => Ok(Some(self.meta_buffer_name.clone())),
            (LOAD_BUFFER_TAG, Some(name)) => {
                let value = self
                    .value(name)
                    .ok_or_else(|| CodegenError::UnknownBufferName {
                        name: name.to_string(),
                    })?;
                self.render_value(value).map(Some)
            }
            (LOAD_BUFFER_TAG, None) => Err(malformed(
                placeholder.offset,
                "LOAD_BUFFER requires a buffer name",
            )),
            (META_BUFFER_TAG, Some(_)) => Err(malformed(
                placeholder.offset,
                "META_BUFFER takes no argument",
            )),
            _ => Ok(None),
        })
    }

    fn render_int(&self, int: &MetaInt) -> CodegenResult<String> {
        match int {
            MetaInt::Const(value) => Ok(value.to_string()),
            MetaInt::Symbol(symbol) => {
                let slot = self
                    .slots
                    .get(symbol)
                    .ok_or_else(|| CodegenError::UnresolvedSymbol {
                        symbol: symbol.clone(),
                    })?;
                Ok(format!("{}[{slot}]", self.meta_buffer_name))
            }
        }
    }

    fn render_value(&self, value: &MetaValue) -> CodegenResult<String> {
        match value {
            MetaValue::Int(int) => self.render_int(int),
            MetaValue::Ints(ints) if ints.is_empty() => Ok("((const int *)0)".to_string()),
            MetaValue::Ints(ints) => {
                let items = ints
                    .iter()
                    .map(|int| self.render_int(int))
                    .collect::<CodegenResult<Vec<_>>>()?;
                Ok(format!("((const int[]){{{}}})", items.join(", ")))
            }
            MetaValue::Buffer(binding) => {
                let base = match binding.descriptor.region {
                    BufferRegion::Static => &self.static_buffer_name,
                    BufferRegion::Dynamic => &self.dynamic_buffer_name,
                };
                let offset = self.render_int(&binding.descriptor.offset)?;
                Ok(format!("({base} + {offset})"))
            }
        }
    }
}
