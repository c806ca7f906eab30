mod builder;
pub use builder::GpuBuilder;

pub use wgpu::Backends;
pub use wgpu::PowerPreference;

use crate::{BindGroup, Binding, BufferBuilder, PipelineBuilder, SamplerBuilder, TextureBuilder};
use core::mem::ManuallyDrop;
use std::{
    ops::{Deref, DerefMut},
    rc::Rc,
};

/// The HW GPU context which contains all wgpu context info.
/// This is meant as an easier and more ergonomic way to pass around wgpu info.
/// You can manually construct this with fields but it is recommended to use the [builder].
///
/// [builder]: Gpu::builder()
pub struct Gpu {
    /// This is the instance for wgpu itself. We shouldn't need more than 1 in the
    /// life of a program.
    pub instance: wgpu::Instance,
    /// This is the adapter, representing the physical device.
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}
impl Gpu {
    /// An alias for `GpuBuilder::new()`
    #[must_use]
    pub fn builder() -> GpuBuilder {
        GpuBuilder::new()
    }

    /// Converts the Gpu into a `GpuHandle` which can be passed around by clone
    #[must_use]
    pub fn into_handle(self) -> GpuHandle {
        GpuHandle {
            context: Rc::new(self),
        }
    }
}
impl Deref for Gpu {
    type Target = wgpu::Device;
    fn deref(&self) -> &Self::Target {
        &self.device
    }
}

/// A struct that wraps over `Rc<Gpu>` which can be passed around by clone.
/// Because this is a `Rc`, it will automatically be freed when there are no
/// more references to it. It follows that any struct with a `GpuHandle` will be
/// always be guaranteed a valid reference to the `Gpu`.
#[derive(Clone)]
pub struct GpuHandle {
    context: Rc<Gpu>,
}
impl GpuHandle {
    #[must_use]
    pub fn new_buffer<'a>(&self, label: &'a str) -> BufferBuilder<'a> {
        BufferBuilder::new(self.clone(), label)
    }

    #[must_use]
    pub fn new_pipeline<'a>(&self, label: &'a str) -> PipelineBuilder<'a> {
        PipelineBuilder::new(self.clone(), label)
    }

    #[must_use]
    pub fn new_texture<'a>(&self, label: &'a str) -> TextureBuilder<'a> {
        TextureBuilder::new(self.clone(), label)
    }

    // Named new_sampler so not to shadow create_sampler
    #[must_use]
    pub fn new_sampler<'a>(&self, label: &'a str) -> SamplerBuilder<'a> {
        SamplerBuilder::new(self.clone(), label)
    }

    pub fn create_bind_group(&self, label: &str, bindings: &[Binding]) -> BindGroup {
        BindGroup::new(&self.device, label, bindings)
    }

    pub fn create_command_encoder(&self, label: &str) -> CommandEncoder {
        let inner = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
        CommandEncoder {
            inner: ManuallyDrop::new(inner),
            gpu: self.clone(),
            finished: false,
        }
    }
}

impl Deref for GpuHandle {
    type Target = Gpu;
    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// A command encoder that submits itself to the queue when dropped.
/// Call `finish()` instead to take the command buffer and submit it yourself.
pub struct CommandEncoder {
    inner: ManuallyDrop<wgpu::CommandEncoder>,
    pub(crate) gpu: GpuHandle,
    /// Set once `inner` has been taken, so `Drop` leaves it alone
    finished: bool,
}
impl CommandEncoder {
    pub fn finish(mut self) -> wgpu::CommandBuffer {
        self.finished = true;
        // SAFETY: `finished` is set, so `drop` will not take `inner` a second time
        unsafe { ManuallyDrop::take(&mut self.inner) }.finish()
    }

    /// Submits the recorded commands now rather than at the end of the scope.
    pub fn submit(self) {
        drop(self);
    }

    pub fn gpu(&self) -> &GpuHandle {
        &self.gpu
    }
}
impl Deref for CommandEncoder {
    type Target = wgpu::CommandEncoder;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl DerefMut for CommandEncoder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Drop for CommandEncoder {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // SAFETY: this is the only place `inner` is taken when `finished` is unset
        let inner = unsafe { ManuallyDrop::take(&mut self.inner) };
        self.gpu.queue.submit([inner.finish()]);
    }
}
