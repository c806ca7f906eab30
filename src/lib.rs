#![allow(clippy::module_name_repetitions)]

mod graphics;
pub use graphics::*;

pub mod prelude;

/// Export wgpu crate
pub use wgpu;

pub(crate) mod macros;
