//! GPU device initialization and management
//!
//! Handles wgpu device creation, adapter selection, and buffer allocation
//! for the accelerator halves of mirrored matrices.

use thiserror::Error;
use wgpu::util::DeviceExt;

/// GPU device errors
#[derive(Debug, Error)]
pub enum GpuDeviceError {
    /// No compatible GPU adapter found
    #[error("No compatible GPU adapter found")]
    NoAdapter,

    /// Failed to request GPU device
    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(String),

    /// Requested device allocation exceeds what the adapter can provide
    #[error("Device allocation of {requested} bytes exceeds buffer limit of {limit} bytes")]
    OutOfMemory {
        /// Size of the rejected allocation
        requested: u64,
        /// The adapter's maximum buffer size
        limit: u64,
    },
}

/// GPU device wrapper for mirrored matrix storage
///
/// # Example
///
/// ```ignore
/// # use frontera_graph::gpu::GpuDevice;
/// let device = GpuDevice::new().await?;
/// assert!(device.is_available());
/// ```
#[derive(Debug)]
pub struct GpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter: wgpu::Adapter,
}

impl GpuDevice {
    /// Check if a GPU is available without keeping a device
    ///
    /// Lets tests skip gracefully on machines without an adapter.
    pub async fn is_gpu_available() -> bool {
        Self::new().await.is_ok()
    }

    /// Initialize GPU device with default settings
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError` if no compatible adapter is found or the
    /// device request fails.
    pub async fn new() -> Result<Self, GpuDeviceError> {
        Self::new_with_backend(wgpu::Backends::all()).await
    }

    /// Initialize GPU device with a specific backend
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError` if device initialization fails
    pub async fn new_with_backend(backends: wgpu::Backends) -> Result<Self, GpuDeviceError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuDeviceError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("frontera-graph GPU device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| GpuDeviceError::DeviceRequest(e.to_string()))?;

        Ok(Self {
            device,
            queue,
            adapter,
        })
    }

    /// Check if GPU is available
    #[must_use]
    pub fn is_available(&self) -> bool {
        true // If we constructed successfully, GPU is available
    }

    /// Get adapter info (GPU name, backend, etc.)
    #[must_use]
    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Largest single allocation this device accepts
    #[must_use]
    pub fn max_buffer_size(&self) -> u64 {
        self.device.limits().max_buffer_size
    }

    fn check_budget(&self, requested: u64) -> Result<(), GpuDeviceError> {
        let limit = self.max_buffer_size();
        if requested > limit {
            return Err(GpuDeviceError::OutOfMemory { requested, limit });
        }
        Ok(())
    }

    /// Create GPU buffer with initial data
    ///
    /// # Errors
    ///
    /// Returns [`GpuDeviceError::OutOfMemory`] if the data exceeds the
    /// adapter's buffer limit.
    pub fn create_buffer_init(
        &self,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Result<wgpu::Buffer, GpuDeviceError> {
        self.check_budget(contents.len() as u64)?;
        Ok(self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            }))
    }

    /// Create empty GPU buffer
    ///
    /// # Errors
    ///
    /// Returns [`GpuDeviceError::OutOfMemory`] if `size` exceeds the
    /// adapter's buffer limit.
    pub fn create_buffer(
        &self,
        label: &str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<wgpu::Buffer, GpuDeviceError> {
        self.check_budget(size)?;
        Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        }))
    }

    /// Get device reference
    #[must_use]
    pub const fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Get queue reference
    #[must_use]
    pub const fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gpu_device_creation() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_gpu_device_creation: GPU not available");
            return;
        }

        let device = GpuDevice::new().await;
        assert!(device.is_ok(), "Failed to create GPU device");

        let device = device.unwrap();
        assert!(device.is_available());
        assert!(device.max_buffer_size() > 0);
    }

    #[tokio::test]
    async fn test_gpu_adapter_info() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_gpu_adapter_info: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let info = device.info();

        assert!(!info.name.is_empty(), "Adapter name should not be empty");
    }

    #[tokio::test]
    async fn test_gpu_device_with_invalid_backend() {
        let device = GpuDevice::new_with_backend(wgpu::Backends::empty()).await;
        assert!(
            device.is_err(),
            "Device creation should fail with empty backends"
        );
    }

    #[test]
    fn test_gpu_device_error_display() {
        let err = GpuDeviceError::NoAdapter;
        assert_eq!(err.to_string(), "No compatible GPU adapter found");

        let err = GpuDeviceError::OutOfMemory {
            requested: 100,
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "Device allocation of 100 bytes exceeds buffer limit of 10 bytes"
        );
    }

    #[tokio::test]
    async fn test_create_buffer_init() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_create_buffer_init: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let data: Vec<u32> = vec![1, 2, 3, 4];

        let buffer = device
            .create_buffer_init(
                "test_init",
                bytemuck::cast_slice(&data),
                wgpu::BufferUsages::STORAGE,
            )
            .unwrap();

        assert_eq!(buffer.size(), (data.len() * 4) as u64);
    }

    #[tokio::test]
    async fn test_create_buffer_rejects_absurd_size() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_create_buffer_rejects_absurd_size: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let result = device.create_buffer("too_big", u64::MAX, wgpu::BufferUsages::STORAGE);

        assert!(matches!(
            result,
            Err(GpuDeviceError::OutOfMemory { .. })
        ));
    }
}
