//! GPU device bundle: `wgpu` instance, adapter, device, and queue.
//!
//! Deliberately window-free — surface attachment and presentation live on
//! [`WgpuMeshBackend`](crate::gpu::WgpuMeshBackend), the only place they
//! are consumed. Tests and off-screen rendering construct this headless.

use thiserror::Error;
use wgpu::{
    Adapter, Device, DeviceDescriptor, Instance, InstanceDescriptor, Queue,
    RequestAdapterOptions, Surface,
};

#[derive(Error, Debug)]
pub enum GpuError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface creation failed: {0}")]
    Surface(String),
    #[error("no surface attached (headless backend)")]
    NoSurface,
    #[error("frame acquisition failed: {0}")]
    Frame(#[from] wgpu::SurfaceError),
}

/// Instance, adapter, and device/queue in one bundle.
pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Request an adapter and device with no surface requirement.
    pub async fn new_headless() -> Result<Self, GpuError> {
        let instance = Instance::new(&InstanceDescriptor::default());
        Self::from_instance(instance, None).await
    }

    /// Request an adapter on an existing instance, compatible with
    /// `surface` when one is given, then a device and queue on it.
    pub async fn from_instance(
        instance: Instance,
        surface: Option<&Surface<'_>>,
    ) -> Result<Self, GpuError> {
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("glyphmesh-device"),
                    ..Default::default()
                },
                None,
            )
            .await?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_construction() {
        // May fail in CI without a GPU — skip gracefully then.
        if let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) {
            let limits = gpu.device.limits();
            assert!(limits.max_bind_groups >= 2);
        }
    }
}
