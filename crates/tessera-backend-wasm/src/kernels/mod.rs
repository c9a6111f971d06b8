//! Kernel templates for the WebAssembly target.

pub mod reduce;

pub use reduce::reduce_template;
