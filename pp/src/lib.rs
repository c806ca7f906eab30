//! Post processing built on glowgpu.
//!
//! Currently a single effect: [`Bloom`], a four pass bloom made of a
//! threshold extract, a separable gaussian blur and a combine with the
//! original scene.

pub mod bloom;
pub use bloom::{Bloom, BloomBuilder, BloomConfig, BloomSettings, Destination};

mod error;
pub use error::*;

use glowgpu::wgpu;

glowgpu::pub_const_flag!(SAMPLED_ATTACHMENT: wgpu::TextureUsages = RENDER_ATTACHMENT | TEXTURE_BINDING);
