#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter was found")]
    AdapterNone,
    #[error("wgpu rejected {0}: {1}")]
    Validation(String, String),
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("buffer could not be mapped")]
    BufferAsync,
    #[error("texture format {0:?} cannot be read back")]
    UnsupportedFormat(wgpu::TextureFormat),
}

/// Generic error type for any error.
/// Recommended to use with terminal errors only, which are expected to be displayed and not handled.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
