/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only
/// when a concrete platform or scene requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and synchronizes presentation with the
    /// display, which is what a cooperative single-threaded loop wants.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported
    /// mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    pub desired_maximum_frame_latency: u32,

    /// Depth attachment format, or `None` for color-only scenes.
    ///
    /// When set, the device owns a depth texture matched to the surface
    /// size and every scene pass clears and tests against it.
    pub depth_format: Option<wgpu::TextureFormat>,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            depth_format: None,
        }
    }
}

impl GpuInit {
    /// Enables a depth attachment with the widely supported 24-bit format.
    pub fn with_depth(mut self) -> Self {
        self.depth_format = Some(wgpu::TextureFormat::Depth24Plus);
        self
    }
}
