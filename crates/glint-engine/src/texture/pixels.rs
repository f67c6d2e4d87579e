use crate::error::RenderError;

/// A decoded CPU-side image: `width × height × channels` unsigned bytes,
/// row-major, top row first unless the session flip policy says otherwise.
///
/// After a texture upload the buffer is no longer needed by the engine;
/// releasing it is the caller's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Validates dimensions against the data length.
    pub fn new(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidPixelData(format!(
                "zero-sized image {width}x{height}"
            )));
        }
        if !(1..=4).contains(&channels) {
            return Err(RenderError::InvalidPixelData(format!(
                "unsupported channel count {channels}"
            )));
        }

        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(RenderError::InvalidPixelData(format!(
                "{width}x{height}x{channels} needs {expected} bytes, got {}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reverses the row order in place.
    ///
    /// Hook for the session-wide flip policy: decoders with a bottom-up
    /// origin call this once per image, before the texture is built.
    pub fn flip_vertical(&mut self) {
        let row = self.width as usize * self.channels as usize;
        let half = self.height as usize / 2;
        for y in 0..half {
            let top = y * row;
            let bottom = (self.height as usize - 1 - y) * row;
            for x in 0..row {
                self.data.swap(top + x, bottom + x);
            }
        }
    }

    /// Returns an RGBA copy of 3-channel data, `self` otherwise.
    ///
    /// wgpu has no 3-channel 8-bit texture format, so RGB sources gain an
    /// opaque alpha channel at upload time.
    pub(crate) fn into_uploadable(self) -> Self {
        if self.channels != 3 {
            return self;
        }

        let mut rgba = Vec::with_capacity(self.data.len() / 3 * 4);
        for px in self.data.chunks_exact(3) {
            rgba.extend_from_slice(px);
            rgba.push(0xff);
        }

        Self {
            width: self.width,
            height: self.height,
            channels: 4,
            data: rgba,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_must_match_dimensions() {
        assert!(PixelBuffer::new(2, 2, 4, vec![0; 16]).is_ok());
        assert!(PixelBuffer::new(2, 2, 4, vec![0; 15]).is_err());
        assert!(PixelBuffer::new(0, 2, 4, vec![]).is_err());
        assert!(PixelBuffer::new(2, 2, 5, vec![0; 20]).is_err());
    }

    #[test]
    fn flip_vertical_reverses_rows() {
        let mut px = PixelBuffer::new(2, 2, 1, vec![1, 2, 3, 4]).unwrap();
        px.flip_vertical();
        assert_eq!(px.data(), &[3, 4, 1, 2]);

        // Odd heights keep the middle row in place.
        let mut px = PixelBuffer::new(1, 3, 1, vec![1, 2, 3]).unwrap();
        px.flip_vertical();
        assert_eq!(px.data(), &[3, 2, 1]);
    }

    #[test]
    fn rgb_expands_to_opaque_rgba() {
        let px = PixelBuffer::new(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let rgba = px.into_uploadable();
        assert_eq!(rgba.channels(), 4);
        assert_eq!(rgba.data(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn non_rgb_is_passed_through() {
        let px = PixelBuffer::new(2, 1, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(px.clone().into_uploadable(), px);
    }
}
