/// Error types for core
pub mod error;
pub use error::*;

/// Gpu abstraction
pub mod gpu;
pub use gpu::*;

pub mod buffer;
pub use buffer::*;

pub mod pipeline;
pub use pipeline::*;

pub mod render_pass;
pub use render_pass::*;

pub mod texture;
pub use texture::*;
