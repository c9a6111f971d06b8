use std::env;

use serde::{Deserialize, Serialize};

/// Environment variable that turns on kernel source dumping.
pub const DUMP_KERNELS_ENV: &str = "TESSERA_DUMP_KERNELS";

/// Names and switches shared by every handler of one compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenOptions {
    /// Parameter name of the per-dispatch metadata buffer.
    pub meta_buffer_name: String,
    pub static_buffer_name: String,
    pub dynamic_buffer_name: String,
    /// Log every generated kernel source at debug level.
    pub dump_kernels: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            meta_buffer_name: "meta_buffer".to_string(),
            static_buffer_name: "static_buffer".to_string(),
            dynamic_buffer_name: "dynamic_buffer".to_string(),
            dump_kernels: false,
        }
    }
}

impl CodegenOptions {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    pub fn with_env(mut self) -> Self {
        if let Ok(value) = env::var(DUMP_KERNELS_ENV) {
            if !value.trim().is_empty() {
                self.dump_kernels = parse_bool(&value);
            }
        }
        self
    }
}

fn parse_bool(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for value in ["1", "true", " YES ", "On"] {
            assert!(parse_bool(value), "{value}");
        }
        for value in ["0", "false", "off", "maybe"] {
            assert!(!parse_bool(value), "{value}");
        }
    }
}
