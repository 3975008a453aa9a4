pub mod content;
pub mod evaluator;
#[cfg(test)]
pub mod memory;
pub mod metrics;
pub mod nonce;
pub mod renderer;
pub mod sanitizer;
pub mod settings;
