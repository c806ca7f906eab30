use glowgpu::prelude::*;
use tracing::{debug, info};

use crate::{BloomError, SAMPLED_ATTACHMENT};

/// Size of the intermediate surfaces for an output of `output` pixels.
/// # Errors
/// Errors when either side truncates to zero.
pub fn surface_size(output: D2, scale: f32) -> Result<D2, BloomError> {
    let (width, height) = output;
    let size = (
        (width as f32 * scale) as u32,
        (height as f32 * scale) as u32,
    );
    if size.0 == 0 || size.1 == 0 || !scale.is_finite() {
        return Err(BloomError::InvalidSurfaceDimensions {
            width,
            height,
            scale,
        });
    }
    Ok(size)
}

/// The two ping-pong render targets of the blur chain.
/// Both always share one size and format; they are created and released together.
pub struct BloomSurfaces {
    gpu: GpuHandle,
    format: TextureFormat,
    scale: f32,
    output: D2,
    surfaces: Option<[Texture<D2>; 2]>,
}

impl BloomSurfaces {
    pub fn setup(
        gpu: &GpuHandle,
        output: D2,
        format: TextureFormat,
        scale: f32,
    ) -> Result<Self, BloomError> {
        let mut surfaces = Self {
            gpu: gpu.clone(),
            format,
            scale,
            output,
            surfaces: None,
        };
        surfaces.allocate(surface_size(output, scale)?);
        Ok(surfaces)
    }

    fn allocate(&mut self, size: D2) {
        info!(
            "Allocating bloom surfaces at {:?} for output {:?} (scale {})",
            size, self.output, self.scale
        );
        let create = |label| {
            self.gpu
                .new_texture(label)
                .with_format(self.format)
                .with_usage(SAMPLED_ATTACHMENT)
                .create_empty(size)
        };
        self.surfaces = Some([create("Bloom surface A"), create("Bloom surface B")]);
    }

    /// Reallocates for a new output size or scale.
    /// Returns whether the surfaces were recreated; an unchanged size keeps them.
    pub fn reconfigure(&mut self, output: D2, scale: f32) -> Result<bool, BloomError> {
        let size = surface_size(output, scale)?;
        self.output = output;
        self.scale = scale;
        if self.size() == Some(size) {
            debug!("Bloom surfaces already {:?}", size);
            return Ok(false);
        }
        self.allocate(size);
        Ok(true)
    }

    /// Releases both surfaces. Calling it again does nothing.
    pub fn teardown(&mut self) {
        if self.surfaces.take().is_some() {
            info!("Released bloom surfaces");
        }
    }

    pub fn is_released(&self) -> bool {
        self.surfaces.is_none()
    }

    /// Both surfaces, `[A, B]`.
    pub fn pair(&self) -> Result<&[Texture<D2>; 2], BloomError> {
        self.surfaces.as_ref().ok_or(BloomError::SurfacesReleased)
    }

    pub fn surface_a(&self) -> Result<&Texture<D2>, BloomError> {
        Ok(&self.pair()?[0])
    }

    pub fn surface_b(&self) -> Result<&Texture<D2>, BloomError> {
        Ok(&self.pair()?[1])
    }

    pub fn size(&self) -> Option<D2> {
        self.surfaces.as_ref().map(|[a, _]| a.size)
    }

    pub fn output(&self) -> D2 {
        self.output
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }
}
