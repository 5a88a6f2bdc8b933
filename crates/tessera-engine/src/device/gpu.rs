use anyhow::{Context, Result};

/// Headless device parameters.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends wgpu may pick an adapter from.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Go straight to the software adapter.
    pub force_fallback_adapter: bool,

    /// Retry with the software adapter when no hardware adapter is found
    /// (CI machines, containers).
    pub allow_fallback: bool,

    /// The renderer needs none; kept for hosts sharing the device.
    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            allow_fallback: true,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

/// wgpu device and queue without a surface; frames render into an
/// [`OffscreenTarget`](super::OffscreenTarget).
pub struct Gpu {
    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Gpu {
    /// Acquires an adapter and device without a window.
    pub async fn new_headless(init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let preference = init.power_preference;
        let adapter = match request_adapter(&instance, preference, init.force_fallback_adapter).await {
            Ok(adapter) => adapter,
            Err(err) if init.allow_fallback && !init.force_fallback_adapter => {
                log::warn!("no hardware adapter ({err:#}); trying the fallback adapter");
                request_adapter(&instance, preference, true)
                    .await
                    .context("failed to find a fallback GPU adapter")?
            }
            Err(err) => return Err(err).context("failed to find a suitable GPU adapter"),
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessera-engine device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let info = adapter.get_info();
        log::info!("using adapter '{}' ({:?})", info.name, info.backend);

        Ok(Gpu { _instance: instance, adapter, device, queue })
    }

    /// Blocking wrapper over [`new_headless`](Self::new_headless).
    pub fn new_headless_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new_headless(init))
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn create_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    /// Submits recorded commands.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

async fn request_adapter(
    instance: &wgpu::Instance,
    power_preference: wgpu::PowerPreference,
    force_fallback_adapter: bool,
) -> Result<wgpu::Adapter> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference,
            compatible_surface: None,
            force_fallback_adapter,
        })
        .await?;
    Ok(adapter)
}
