use bytemuck::Pod;
use wgpu::util::DeviceExt;

use crate::{Buffer, GpuHandle};

pub enum BufferInitContent<'a> {
    /// The buffer will be initialized with the given data
    Data(&'a [u8]),
    /// The buffer will be initialized with the given size
    Size(u64),
}

pub struct BufferBuilder<'a> {
    pub gpu: GpuHandle,
    pub label: Option<&'a str>,
    pub content: BufferInitContent<'a>,
    pub usage: wgpu::BufferUsages,
}
impl<'a> BufferBuilder<'a> {
    #[must_use]
    pub fn new(gpu: GpuHandle, label: &'a str) -> Self {
        BufferBuilder {
            gpu,
            label: Some(label),
            content: BufferInitContent::Size(0),
            usage: wgpu::BufferUsages::empty(),
        }
    }

    /// The buffer will be initialized with this size
    /// Mutually exclusive to `with_data`
    pub fn with_size(mut self, size: u64) -> Self {
        self.content = BufferInitContent::Size(size);
        self
    }

    /// The buffer will be initialized with the contents of the given slice
    /// Mutually exclusive to `with_size`
    pub fn with_data<T>(mut self, data: &'a [T]) -> Self
    where
        T: Pod,
    {
        self.content = BufferInitContent::Data(bytemuck::cast_slice(data));
        self
    }

    /// Allow a buffer to be a `BufferBindingType::Uniform` inside a bind group.
    pub fn as_uniform_buffer(mut self) -> Self {
        self.usage |= wgpu::BufferUsages::UNIFORM;
        self
    }

    /// See [`wgpu::BufferUsages::MAP_READ`]
    pub fn allow_map_read(mut self) -> Self {
        self.usage |= wgpu::BufferUsages::MAP_READ;
        self
    }

    /// See [`wgpu::BufferUsages::COPY_SRC`]
    pub fn allow_copy_from(mut self) -> Self {
        self.usage |= wgpu::BufferUsages::COPY_SRC;
        self
    }

    /// See [`wgpu::BufferUsages::COPY_DST`]
    pub fn allow_copy_to(mut self) -> Self {
        self.usage |= wgpu::BufferUsages::COPY_DST;
        self
    }

    /// Creates the buffer
    #[must_use]
    pub fn build(&self) -> Buffer {
        let (inner, size) = match self.content {
            BufferInitContent::Data(data) => (
                self.gpu
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: self.label,
                        usage: self.usage,
                        contents: data,
                    }),
                data.len() as u64,
            ),
            BufferInitContent::Size(size) => (
                self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
                    label: self.label,
                    size,
                    usage: self.usage,
                    mapped_at_creation: false,
                }),
                size,
            ),
        };

        Buffer {
            inner,
            gpu: self.gpu.clone(),
            size,
        }
    }
}
