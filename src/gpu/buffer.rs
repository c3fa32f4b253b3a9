//! Accelerator-resident halves of mirrored arrays
//!
//! Each logical matrix array exists as an independent host/device pair;
//! [`DeviceArray`] is the device half, with explicit, named synchronization
//! operations (`upload` host→device, `download` device→host). Content on the
//! two sides is only guaranteed identical after one of those completes.

use super::GpuDevice;
use anyhow::{ensure, Context, Result};
use std::marker::PhantomData;

/// One accelerator-resident typed buffer of fixed element count
///
/// Bound as read-only storage by accelerator kernels; the host side reads it
/// back through a staging buffer. Element count is fixed at creation — the
/// mirror discipline never resizes, it reallocates.
#[derive(Debug)]
pub struct DeviceArray<T> {
    buffer: wgpu::Buffer,
    len: usize,
    label: &'static str,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> DeviceArray<T> {
    const USAGES: wgpu::BufferUsages = wgpu::BufferUsages::STORAGE
        .union(wgpu::BufferUsages::COPY_DST)
        .union(wgpu::BufferUsages::COPY_SRC);

    /// Allocate a zero-filled device array of `len` elements
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation exceeds the device budget.
    pub fn zeroed(device: &GpuDevice, label: &'static str, len: usize) -> Result<Self> {
        let size = (len * std::mem::size_of::<T>()) as u64;
        let buffer = device
            .create_buffer(label, size, Self::USAGES)
            .with_context(|| format!("allocating device array `{label}`"))?;
        Ok(Self {
            buffer,
            len,
            label,
            _marker: PhantomData,
        })
    }

    /// Allocate a device array initialized with `host` content
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation exceeds the device budget.
    pub fn from_slice(device: &GpuDevice, label: &'static str, host: &[T]) -> Result<Self> {
        let buffer = device
            .create_buffer_init(label, bytemuck::cast_slice(host), Self::USAGES)
            .with_context(|| format!("allocating device array `{label}`"))?;
        Ok(Self {
            buffer,
            len: host.len(),
            label,
            _marker: PhantomData,
        })
    }

    /// Synchronize host→device: overwrite device content with `host`
    ///
    /// Blocking with respect to later reads of the buffer: the write is
    /// queued and submitted before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` does not match the array's element count.
    pub fn upload(&self, device: &GpuDevice, host: &[T]) -> Result<()> {
        ensure!(
            host.len() == self.len,
            "upload of {} elements into device array `{}` of {} elements",
            host.len(),
            self.label,
            self.len
        );
        device
            .queue()
            .write_buffer(&self.buffer, 0, bytemuck::cast_slice(host));
        device.queue().submit(std::iter::empty());
        Ok(())
    }

    /// Synchronize device→host: read the device content back
    ///
    /// Copies through a staging buffer and waits for the map to complete, so
    /// the returned vector reflects every previously submitted write.
    ///
    /// # Errors
    ///
    /// Returns an error if staging allocation or buffer mapping fails.
    pub async fn download(&self, device: &GpuDevice) -> Result<Vec<T>> {
        if self.len == 0 {
            return Ok(Vec::new());
        }

        let size = (self.len * std::mem::size_of::<T>()) as u64;
        let staging = device.create_buffer(
            "readback staging",
            size,
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        )?;

        let mut encoder = device
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        encoder.copy_buffer_to_buffer(&self.buffer, 0, &staging, 0, size);
        device.queue().submit(Some(encoder.finish()));

        let buffer_slice = staging.slice(..);
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();

        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        device.device().poll(wgpu::Maintain::Wait);
        rx.receive()
            .await
            .context("Failed to receive map result")?
            .with_context(|| format!("mapping device array `{}` failed", self.label))?;

        let data = buffer_slice.get_mapped_range();
        let host: Vec<T> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging.unmap();

        Ok(host)
    }

    /// Element count
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The underlying wgpu buffer, for binding into an accelerator kernel
    #[must_use]
    pub const fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}
