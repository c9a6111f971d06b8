use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::CodegenResult;
use super::template::Template;

pub const FUNC_NAME_TAG: &str = "FUNC_NAME";

/// Source of kernel symbol suffixes for one compile.
///
/// Shared by reference between handlers; each call to [`next`](Self::next)
/// returns a value never returned before by this counter.
#[derive(Debug, Default)]
pub struct SymbolCounter {
    next: AtomicUsize,
}

impl SymbolCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of suffixes handed out so far.
    pub fn issued(&self) -> usize {
        self.next.load(Ordering::Relaxed)
    }
}

/// Picks a unique entry symbol for one operator instance and writes it into
/// `%%FUNC_NAME%%`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelNameInjector {
    name: String,
}

impl KernelNameInjector {
    pub fn new(label: &str, counter: &SymbolCounter) -> Self {
        Self {
            name: format!("{}_{}", sanitize_symbol(label), counter.next()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inject(&self, template: &str) -> CodegenResult<String> {
        Template::parse(template)?.render(|placeholder| {
            Ok((placeholder.name == FUNC_NAME_TAG && placeholder.arg.is_none())
                .then(|| self.name.clone()))
        })
    }
}

/// Maps an arbitrary label onto a C identifier.
pub fn sanitize_symbol(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 1);
    for (idx, ch) in value.chars().enumerate() {
        if idx == 0 && ch.is_ascii_digit() {
            out.push('_');
        }
        out.push(if ch.is_ascii_alphanumeric() || ch == '_' {
            ch
        } else {
            '_'
        });
    }
    if out.is_empty() {
        out.push_str("kernel");
    }
    out
}
