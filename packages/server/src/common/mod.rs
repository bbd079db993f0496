// Common types shared across the kernel and domain layers

pub mod types;

pub use types::*;
