use glowgpu::wgpu;
use glowgpu::GpuError;

/// Which of the three bloom programs an error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProgramKind {
    Extract,
    Blur,
    Combine,
}

impl std::fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ProgramKind::Extract => "extract",
            ProgramKind::Blur => "blur",
            ProgramKind::Combine => "combine",
        })
    }
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum BloomError {
    #[error("{program} shader does not declare `{parameter}`")]
    MissingShaderParameter {
        program: ProgramKind,
        parameter: &'static str,
    },
    #[error("{program} shader parameter `{parameter}` has the wrong shape: {reason}")]
    ShaderParameterMismatch {
        program: ProgramKind,
        parameter: &'static str,
        reason: String,
    },
    #[error("{program} shader failed to parse: {message}")]
    ShaderParse {
        program: ProgramKind,
        message: String,
    },
    #[error("bloom surfaces for {width}x{height} at scale {scale} would be empty")]
    InvalidSurfaceDimensions { width: u32, height: u32, scale: f32 },
    #[error("blur amount must be positive and finite, got {0}")]
    InvalidBlurAmount(f32),
    #[error("kernel sample count must be odd and at least 1, got {0}")]
    InvalidSampleCount(usize),
    #[error("bloom surfaces were released by teardown")]
    SurfacesReleased,
    #[error("destination format {actual:?} does not match the bloom target format {expected:?}")]
    FormatMismatch {
        expected: wgpu::TextureFormat,
        actual: wgpu::TextureFormat,
    },
    #[error(transparent)]
    Gpu(#[from] GpuError),
}
