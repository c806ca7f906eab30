mod builder;
pub use builder::*;

mod binding;
pub use binding::*;

use futures::{channel::oneshot, executor::block_on};

use crate::{CommandEncoder, GpuError, GpuHandle};
use std::ops::Deref;

pub struct Buffer {
    pub(crate) gpu: GpuHandle,
    pub(crate) inner: wgpu::Buffer,
    pub size: u64,
}
/// Allows you to use this as a reference to the inner `wgpu::Buffer`
impl Deref for Buffer {
    type Target = wgpu::Buffer;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl Buffer {
    /// Maps the whole buffer for reading and blocks until its contents are available.
    /// The buffer must have been created with `allow_map_read()`.
    /// # Errors
    /// Errors with [`GpuError::BufferAsync`] when the mapping fails.
    pub fn download(&self) -> Result<Vec<u8>, GpuError> {
        let slice = self.inner.slice(..);
        let (sender, receiver) = oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            // The receiver only disappears if download() already returned
            let _ = sender.send(result);
        });
        self.gpu.device.poll(wgpu::Maintain::Wait);
        block_on(receiver)
            .map_err(|_| GpuError::BufferAsync)?
            .map_err(|_| GpuError::BufferAsync)?;

        let data = slice.get_mapped_range().to_vec();
        self.inner.unmap();
        Ok(data)
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Records a copy of `data` to the start of this buffer into `encoder`.
    ///
    /// Unlike `Queue::write_buffer`, which lands before everything in the next
    /// submit, the new contents are only seen by commands recorded after this
    /// one. The buffer must have been created with `allow_copy_to()`.
    pub fn write_in<T>(&self, encoder: &mut CommandEncoder, data: &[T])
    where
        T: bytemuck::Pod,
    {
        let staging = self
            .gpu
            .new_buffer("Staging buffer")
            .with_data(data)
            .allow_copy_from()
            .build();
        encoder.copy_buffer_to_buffer(&staging, 0, &self.inner, 0, staging.size);
    }
}

#[cfg(test)]
mod tests {
    use crate::{Backends, Gpu, PowerPreference};

    #[test]
    fn recorded_writes_follow_encoder_order() {
        let gpu = match Gpu::builder()
            .with_backends(Backends::all())
            .with_power_preference(PowerPreference::LowPower)
            .build_headless()
        {
            Ok(gpu) => gpu,
            Err(err) => {
                eprintln!("skipping recorded_writes_follow_encoder_order: {}", err);
                return;
            }
        };
        let target = gpu
            .new_buffer("write target")
            .with_size(16)
            .allow_copy_to()
            .allow_copy_from()
            .build();
        let snapshot = gpu
            .new_buffer("snapshot")
            .with_size(16)
            .allow_copy_to()
            .allow_map_read()
            .build();
        let readback = gpu
            .new_buffer("readback")
            .with_size(16)
            .allow_copy_to()
            .allow_map_read()
            .build();

        let mut encoder = gpu.create_command_encoder("write order test");
        target.write_in(&mut encoder, &[1_u32, 2, 3, 4]);
        encoder.copy_buffer_to_buffer(&target, 0, &snapshot, 0, 16);
        target.write_in(&mut encoder, &[5_u32, 6, 7, 8]);
        encoder.copy_buffer_to_buffer(&target, 0, &readback, 0, 16);
        encoder.submit();

        let words = |bytes: Vec<u8>| -> Vec<u32> {
            bytes
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned)
                .collect()
        };
        let first = words(snapshot.download().unwrap());
        let second = words(readback.download().unwrap());
        assert_eq!(first, [1, 2, 3, 4]);
        assert_eq!(second, [5, 6, 7, 8]);
    }
}
