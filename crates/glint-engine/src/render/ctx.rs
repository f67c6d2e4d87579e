/// Resource-facing context (device/queue + target formats + viewport).
///
/// This is intentionally small and stable: every GPU resource constructor
/// takes it instead of reaching for ambient global state.
pub struct GraphicsContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,

    /// Format of the color target pipelines render into.
    pub surface_format: wgpu::TextureFormat,

    /// Depth attachment format, or `None` when depth testing is disabled
    /// for the session. Pipelines must agree with the pass they draw in.
    pub depth_format: Option<wgpu::TextureFormat>,

    /// Current framebuffer size in physical pixels, `(width, height)`.
    pub viewport: (u32, u32),
}

impl<'a> GraphicsContext<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
        viewport: (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            depth_format,
            viewport,
        }
    }

    /// Width / height ratio of the current viewport, for projection math.
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.viewport;
        w.max(1) as f32 / h.max(1) as f32
    }
}
