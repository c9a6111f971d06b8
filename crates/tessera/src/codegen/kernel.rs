use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::buffer::BufferBinding;
use super::buffer_injector::{BufferInjector, UnresolvedValue};
use super::error::{CodegenError, CodegenResult};
use super::template::Template;

/// Dispatch-ready output of one operator handler.
///
/// `unresolved` is ordered by meta buffer slot; the dispatcher must fill the
/// meta buffer in exactly that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kernel {
    sources: BTreeMap<String, String>,
    entry: String,
    buffers: Vec<BufferBinding>,
    unresolved: Vec<UnresolvedValue>,
}

impl Kernel {
    pub fn new(
        sources: BTreeMap<String, String>,
        entry: impl Into<String>,
        buffers: Vec<BufferBinding>,
        unresolved: Vec<UnresolvedValue>,
    ) -> CodegenResult<Self> {
        let entry = entry.into();
        if !sources.contains_key(&entry) {
            return Err(CodegenError::MissingEntry { symbol: entry });
        }
        for (symbol, source) in &sources {
            let template = Template::parse(source)?;
            let leftover = template
                .placeholders()
                .next()
                .map(|placeholder| placeholder.raw.to_string());
            if let Some(placeholder) = leftover {
                return Err(CodegenError::UnresolvedPlaceholder {
                    symbol: symbol.clone(),
                    placeholder,
                });
            }
        }
        Ok(Self {
            sources,
            entry,
            buffers,
            unresolved,
        })
    }

    /// Single-source kernel taking its buffers and slots from `injector`.
    pub fn from_injector(
        entry: impl Into<String>,
        source: String,
        injector: &BufferInjector,
    ) -> CodegenResult<Self> {
        let entry = entry.into();
        let mut sources = BTreeMap::new();
        sources.insert(entry.clone(), source);
        Self::new(
            sources,
            entry,
            injector.buffers(),
            injector.unresolved_values().to_vec(),
        )
    }

    pub fn sources(&self) -> &BTreeMap<String, String> {
        &self.sources
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn entry_source(&self) -> &str {
        self.sources
            .get(&self.entry)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn buffers(&self) -> &[BufferBinding] {
        &self.buffers
    }

    pub fn unresolved_values(&self) -> &[UnresolvedValue] {
        &self.unresolved
    }

    /// Builds the meta buffer for one dispatch, asking `resolve` for each
    /// unresolved symbol in slot order.
    pub fn populate_meta_buffer<F>(&self, mut resolve: F) -> CodegenResult<Vec<i32>>
    where
        F: FnMut(&str) -> Option<i32>,
    {
        self.unresolved
            .iter()
            .map(|value| {
                resolve(&value.symbol).ok_or_else(|| CodegenError::UnresolvedSymbol {
                    symbol: value.symbol.clone(),
                })
            })
            .collect()
    }
}
