use futures::executor::block_on;
use tracing::info;

use crate::graphics::{Gpu, GpuError, GpuHandle};

#[derive(Clone)]
/// Builder for `Gpu`.
/// By default this is initialized with sensible values for our use case.
pub struct GpuBuilder {
    /// The backends that wgpu should use.
    /// By default, this is only the PRIMARY backends, which have first-class support.
    /// Headless tests widen this to `Backends::all()` so GL software adapters count too.
    backends: wgpu::Backends,
    /// The power preference for the adapter.
    power_preference: wgpu::PowerPreference,
}
impl Default for GpuBuilder {
    fn default() -> Self {
        Self::new()
    }
}
impl GpuBuilder {
    /// Create a `GpuBuilder` with sensible defaults.
    pub fn new() -> Self {
        Self {
            backends: wgpu::Backends::PRIMARY,
            power_preference: wgpu::PowerPreference::HighPerformance,
        }
    }

    /// Sets the backends that wgpu should use.
    pub fn with_backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    /// Sets the power preference for the adapter.
    pub fn with_power_preference(mut self, power_preference: wgpu::PowerPreference) -> Self {
        self.power_preference = power_preference;
        self
    }

    /// Blocking version of `build_impl()` without a presentation surface.
    /// # Errors
    /// Errors when the inner build fails.
    pub fn build_headless(self) -> Result<GpuHandle, GpuError> {
        block_on(self.build_impl())
    }

    /// Build the `Gpu` from the builder.
    /// # Errors
    /// Errors when a connection to the GPU could not be established.
    pub async fn build_impl(self) -> Result<GpuHandle, GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: self.backends,
            ..Default::default()
        });

        // Initialize the adapter (physical device).
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: self.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::AdapterNone)?;

        let adapter_info = adapter.get_info();
        info!(
            "Using adapter {} ({:?})",
            adapter_info.name, adapter_info.backend
        );

        // Create the `device` (and get the handle for the command queue `queue`)
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                },
                None,
            )
            .await?;

        let gpu = Gpu {
            instance,
            adapter,
            device,
            queue,
        };

        Ok(gpu.into_handle())
    }
}
