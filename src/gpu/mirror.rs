//! Host+device mirrored compressed matrix
//!
//! [`CsrMirror`] owns a [`CsrMatrix`] (host half) and one [`DeviceArray`]
//! per matrix array (device half). Build and copy end with a host→device
//! upload of all three arrays, so an accelerator kernel always observes the
//! same matrix the reference traversal reads on the host.

use super::{DeviceArray, GpuDevice};
use crate::storage::CsrMatrix;
use anyhow::{Context, Result};
use std::fmt;

/// Compressed sparse matrix mirrored between host and accelerator memory
///
/// The two halves are independent storage: mutating one never affects the
/// other until an explicit synchronization (`build`/`copy_from` upload,
/// [`download`](Self::download)) runs. The mirror exclusively owns both
/// halves; deep copies allocate entirely fresh buffers on both sides.
///
/// Like the host matrix, the device `indices`/`values` buffers are only
/// allocated at build time, when the entry count becomes known.
#[derive(Debug)]
pub struct CsrMirror<T> {
    host: CsrMatrix<T>,
    d_offsets: DeviceArray<u32>,
    d_indices: Option<DeviceArray<u32>>,
    d_values: Option<DeviceArray<T>>,
}

impl<T: bytemuck::Pod> CsrMirror<T> {
    /// Create an empty mirrored matrix with fixed dimensions
    ///
    /// Allocates the offset array on both host and device; the entry arrays
    /// wait for [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// Returns an error if the device allocation exceeds the device budget.
    pub fn create(device: &GpuDevice, rows: usize, cols: usize) -> Result<Self> {
        let host = CsrMatrix::new(rows, cols);
        let d_offsets = DeviceArray::from_slice(device, "csr offsets", host.offsets())?;
        Ok(Self {
            host,
            d_offsets,
            d_indices: None,
            d_values: None,
        })
    }

    /// Convert a COO edge list and synchronize the result to the device
    ///
    /// Runs the host-side counting-sort conversion, allocates the device
    /// entry arrays, then uploads all three arrays. After this returns, both
    /// halves hold the same matrix.
    ///
    /// # Errors
    ///
    /// Returns the host conversion errors (coordinate bounds, edge-count
    /// mismatch) or a device allocation failure.
    pub fn build(
        &mut self,
        device: &GpuDevice,
        row_ind: &[u32],
        col_ind: &[u32],
        values: &[T],
    ) -> Result<()> {
        self.host
            .build(row_ind, col_ind, values)
            .context("COO conversion failed")?;

        self.d_indices = Some(DeviceArray::from_slice(
            device,
            "csr indices",
            self.host.indices(),
        )?);
        self.d_values = Some(DeviceArray::from_slice(
            device,
            "csr values",
            self.host.values(),
        )?);
        self.d_offsets.upload(device, self.host.offsets())?;
        Ok(())
    }

    /// Deep-copy another mirror's contents, host and device
    ///
    /// Destination buffers are freshly allocated on both sides; nothing is
    /// shared with the source afterwards.
    ///
    /// # Errors
    ///
    /// Returns a dimension mismatch if the compressed dimensions differ, or
    /// a device allocation failure.
    pub fn copy_from(&mut self, device: &GpuDevice, source: &Self) -> Result<()> {
        self.host
            .copy_from(source.host())
            .context("deep copy failed")?;

        self.d_offsets = DeviceArray::from_slice(device, "csr offsets", self.host.offsets())?;
        self.d_indices = Some(DeviceArray::from_slice(
            device,
            "csr indices",
            self.host.indices(),
        )?);
        self.d_values = Some(DeviceArray::from_slice(
            device,
            "csr values",
            self.host.values(),
        )?);
        Ok(())
    }

    /// Synchronize device→host: refresh the host half from the device
    ///
    /// Reads back whichever arrays exist on the device (entry arrays only
    /// after a build) and replaces the host content with them.
    ///
    /// # Errors
    ///
    /// Returns an error if a readback fails.
    pub async fn download(&mut self, device: &GpuDevice) -> Result<()> {
        let offsets = self
            .d_offsets
            .download(device)
            .await
            .context("offsets readback failed")?;
        let indices = match &self.d_indices {
            Some(array) => array.download(device).await.context("indices readback failed")?,
            None => Vec::new(),
        };
        let values = match &self.d_values {
            Some(array) => array.download(device).await.context("values readback failed")?,
            None => Vec::new(),
        };
        self.host.overwrite(offsets, indices, values);
        Ok(())
    }

    /// Host half, as consumed by the reference traversal
    #[must_use]
    pub fn host(&self) -> &CsrMatrix<T> {
        &self.host
    }

    /// Device offset array
    #[must_use]
    pub const fn device_offsets(&self) -> &DeviceArray<u32> {
        &self.d_offsets
    }

    /// Device index array (present after a build)
    #[must_use]
    pub const fn device_indices(&self) -> Option<&DeviceArray<u32>> {
        self.d_indices.as_ref()
    }

    /// Device value array (present after a build)
    #[must_use]
    pub const fn device_values(&self) -> Option<&DeviceArray<T>> {
        self.d_values.as_ref()
    }
}

impl<T: bytemuck::Pod + fmt::Display> CsrMirror<T> {
    /// Render the device-side matrix as a dense grid
    ///
    /// Refreshes the host half from the device, then renders up to the
    /// first 20×20 entries the same way the host preview does. Confirms
    /// what an accelerator kernel would actually observe.
    ///
    /// # Errors
    ///
    /// Returns an error if the readback fails.
    pub async fn render_dense_from_device(
        &mut self,
        device: &GpuDevice,
        show_values: bool,
    ) -> Result<String> {
        self.download(device).await?;
        Ok(self.host.render_dense(show_values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_allocates_offsets_only() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_create_allocates_offsets_only: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let mirror: CsrMirror<f32> = CsrMirror::create(&device, 3, 3).unwrap();

        assert_eq!(mirror.device_offsets().len(), 4);
        assert!(mirror.device_indices().is_none());
        assert!(mirror.device_values().is_none());
    }

    #[tokio::test]
    async fn test_build_mirrors_all_three_arrays() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_build_mirrors_all_three_arrays: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let mut mirror = CsrMirror::create(&device, 3, 3).unwrap();
        mirror
            .build(&device, &[0, 0, 1], &[1, 2, 2], &[1.0_f32, 2.0, 3.0])
            .unwrap();

        // Read every device array back and compare against the host half
        let offsets = mirror.device_offsets().download(&device).await.unwrap();
        assert_eq!(offsets, mirror.host().offsets());

        let indices = mirror
            .device_indices()
            .unwrap()
            .download(&device)
            .await
            .unwrap();
        assert_eq!(indices, mirror.host().indices());

        let values = mirror
            .device_values()
            .unwrap()
            .download(&device)
            .await
            .unwrap();
        assert_eq!(values, mirror.host().values());
    }

    #[tokio::test]
    async fn test_download_refreshes_host() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_download_refreshes_host: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let mut mirror = CsrMirror::create(&device, 2, 2).unwrap();
        mirror
            .build(&device, &[0, 1], &[1, 0], &[1.0_f32, 2.0])
            .unwrap();

        let before = mirror.host().clone();
        mirror.download(&device).await.unwrap();

        assert_eq!(mirror.host().offsets(), before.offsets());
        assert_eq!(mirror.host().indices(), before.indices());
        assert_eq!(mirror.host().values(), before.values());
    }

    #[tokio::test]
    async fn test_copy_from_is_deep() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_copy_from_is_deep: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let mut source = CsrMirror::create(&device, 2, 2).unwrap();
        source
            .build(&device, &[0, 1], &[1, 0], &[1.0_f32, 2.0])
            .unwrap();

        let mut copy = CsrMirror::create(&device, 2, 2).unwrap();
        copy.copy_from(&device, &source).unwrap();
        assert_eq!(copy.host().indices(), source.host().indices());

        // Rebuilding the copy must leave the source's halves untouched
        copy.build(&device, &[0], &[0], &[9.0_f32]).unwrap();
        assert_eq!(source.host().nnz(), 2);
        let src_values = source
            .device_values()
            .unwrap()
            .download(&device)
            .await
            .unwrap();
        assert_eq!(src_values, vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn test_copy_from_rejects_row_mismatch() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_copy_from_rejects_row_mismatch: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let mut source = CsrMirror::create(&device, 3, 3).unwrap();
        source.build(&device, &[0], &[1], &[1.0_f32]).unwrap();

        let mut dest: CsrMirror<f32> = CsrMirror::create(&device, 2, 3).unwrap();
        assert!(dest.copy_from(&device, &source).is_err());
    }

    #[tokio::test]
    async fn test_render_dense_from_device() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_render_dense_from_device: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let mut mirror = CsrMirror::create(&device, 2, 2).unwrap();
        mirror
            .build(&device, &[0, 1], &[1, 0], &[1.5_f32, 2.5])
            .unwrap();

        let rendered = mirror.render_dense_from_device(&device, false).await.unwrap();
        assert_eq!(rendered, "0 x \nx 0 \n");
    }
}
