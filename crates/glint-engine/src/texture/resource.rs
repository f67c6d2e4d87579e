use crate::error::RenderError;
use crate::render::GraphicsContext;

use super::mipmap;
use super::PixelBuffer;

/// Texture coordinate wrapping behavior outside [0, 1].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
}

impl WrapMode {
    fn address_mode(self) -> wgpu::AddressMode {
        match self {
            Self::Repeat => wgpu::AddressMode::Repeat,
            Self::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        }
    }
}

/// Sampling filter configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FilterMode {
    Nearest,
    Linear,
    /// Trilinear: linear filtering across a generated mip chain.
    LinearMipmapLinear,
}

impl FilterMode {
    /// Whether this filter requires a mip chain at build time.
    pub fn wants_mipmaps(self) -> bool {
        matches!(self, Self::LinearMipmapLinear)
    }

    fn min_mag_filter(self) -> wgpu::FilterMode {
        match self {
            Self::Nearest => wgpu::FilterMode::Nearest,
            Self::Linear | Self::LinearMipmapLinear => wgpu::FilterMode::Linear,
        }
    }

    fn mipmap_filter(self) -> wgpu::MipmapFilterMode {
        match self {
            Self::LinearMipmapLinear => wgpu::MipmapFilterMode::Linear,
            _ => wgpu::MipmapFilterMode::Nearest,
        }
    }
}

/// A GPU 2D texture + sampler built from decoded pixels.
///
/// Built once during scene setup. After construction the CPU-side pixel
/// buffer is no longer needed by the engine. Released on Drop or through
/// [`TextureResource::destroy`], exactly once either way.
pub struct TextureResource {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    width: u32,
    height: u32,
    wrap_mode: WrapMode,
    filter_mode: FilterMode,
    has_mipmaps: bool,
}

impl TextureResource {
    /// Allocates the texture, uploads the pixels, and — only when the
    /// filter requests mipmapping — generates and uploads the mip chain.
    pub fn new(
        gfx: &GraphicsContext<'_>,
        label: &str,
        pixels: PixelBuffer,
        wrap_mode: WrapMode,
        filter_mode: FilterMode,
    ) -> Result<Self, RenderError> {
        let pixels = pixels.into_uploadable();
        let (width, height) = (pixels.width(), pixels.height());
        let channels = pixels.channels();

        let has_mipmaps = filter_mode.wants_mipmaps();
        let mip_level_count = if has_mipmaps {
            mipmap::mip_level_count(width, height)
        } else {
            1
        };

        let texture = gfx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(channels),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        write_level(gfx.queue, &texture, 0, pixels.data(), width, height, channels);

        if has_mipmaps {
            let chain = mipmap::build_chain(pixels.data(), width, height, channels);
            for (i, level) in chain.iter().enumerate() {
                write_level(
                    gfx.queue,
                    &texture,
                    i as u32 + 1,
                    &level.data,
                    level.width,
                    level.height,
                    channels,
                );
            }
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = gfx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wrap_mode.address_mode(),
            address_mode_v: wrap_mode.address_mode(),
            address_mode_w: wrap_mode.address_mode(),
            mag_filter: filter_mode.min_mag_filter(),
            min_filter: filter_mode.min_mag_filter(),
            mipmap_filter: filter_mode.mipmap_filter(),
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
            width,
            height,
            wrap_mode,
            filter_mode,
            has_mipmaps,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn has_mipmaps(&self) -> bool {
        self.has_mipmaps
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Releases the GPU handle immediately instead of waiting for Drop.
    pub fn destroy(self) {
        self.texture.destroy();
    }
}

/// Upload format by channel count.
///
/// Color-space convention: 3/4-channel images are color and sampled as
/// sRGB; 1/2-channel images are non-color data (masks, heightfields,
/// packed vectors) and stay linear.
fn texture_format(channels: u32) -> wgpu::TextureFormat {
    match channels {
        1 => wgpu::TextureFormat::R8Unorm,
        2 => wgpu::TextureFormat::Rg8Unorm,
        // 3-channel data was expanded to RGBA before upload.
        _ => wgpu::TextureFormat::Rgba8UnormSrgb,
    }
}

fn write_level(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    mip_level: u32,
    data: &[u8],
    width: u32,
    height: u32,
    channels: u32,
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * channels),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_trilinear_wants_mipmaps() {
        assert!(!FilterMode::Nearest.wants_mipmaps());
        assert!(!FilterMode::Linear.wants_mipmaps());
        assert!(FilterMode::LinearMipmapLinear.wants_mipmaps());
    }

    #[test]
    fn filter_mapping() {
        assert_eq!(
            FilterMode::Nearest.min_mag_filter(),
            wgpu::FilterMode::Nearest
        );
        assert_eq!(
            FilterMode::LinearMipmapLinear.mipmap_filter(),
            wgpu::MipmapFilterMode::Linear
        );
        assert_eq!(
            FilterMode::Linear.mipmap_filter(),
            wgpu::MipmapFilterMode::Nearest
        );
    }

    #[test]
    fn format_from_channel_count() {
        assert_eq!(texture_format(1), wgpu::TextureFormat::R8Unorm);
        assert_eq!(texture_format(2), wgpu::TextureFormat::Rg8Unorm);
        assert_eq!(texture_format(4), wgpu::TextureFormat::Rgba8UnormSrgb);
    }
}
