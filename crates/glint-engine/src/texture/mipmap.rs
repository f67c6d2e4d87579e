//! CPU mip chain generation.
//!
//! Levels are box-filtered on the CPU and uploaded individually, which
//! keeps the chain deterministic and testable without a device. Non
//! power-of-two dimensions round down per level, clamping at 1.

/// Number of mip levels for a full chain over a `width x height` image.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// One generated mip level.
pub(crate) struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Builds levels 1.. from the base image (level 0 is not included).
pub(crate) fn build_chain(
    base: &[u8],
    width: u32,
    height: u32,
    channels: u32,
) -> Vec<MipLevel> {
    let mut levels = Vec::new();
    let mut prev = base.to_vec();
    let (mut w, mut h) = (width, height);

    while w > 1 || h > 1 {
        let level = downsample(&prev, w, h, channels);
        w = level.width;
        h = level.height;
        prev = level.data.clone();
        levels.push(level);
    }

    levels
}

/// Averages each 2x2 block of `src` into one output texel.
///
/// For odd dimensions the right/bottom sample clamps to the edge.
fn downsample(src: &[u8], width: u32, height: u32, channels: u32) -> MipLevel {
    let out_w = (width / 2).max(1);
    let out_h = (height / 2).max(1);
    let ch = channels as usize;

    let mut data = vec![0u8; out_w as usize * out_h as usize * ch];

    for y in 0..out_h {
        for x in 0..out_w {
            let x0 = 2 * x;
            let y0 = 2 * y;
            let x1 = (x0 + 1).min(width - 1);
            let y1 = (y0 + 1).min(height - 1);

            for c in 0..ch {
                let sample = |sx: u32, sy: u32| {
                    src[(sy as usize * width as usize + sx as usize) * ch + c] as u32
                };
                let sum = sample(x0, y0) + sample(x1, y0) + sample(x0, y1) + sample(x1, y1);
                data[(y as usize * out_w as usize + x as usize) * ch + c] = (sum / 4) as u8;
            }
        }
    }

    MipLevel {
        width: out_w,
        height: out_h,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_count_is_log2_plus_one() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(256, 64), 9);
        assert_eq!(mip_level_count(640, 480), 10);
    }

    #[test]
    fn downsample_averages_blocks() {
        // 2x2 single-channel image collapses to the mean.
        let level = downsample(&[0, 100, 100, 200], 2, 2, 1);
        assert_eq!((level.width, level.height), (1, 1));
        assert_eq!(level.data, vec![100]);
    }

    #[test]
    fn downsample_clamps_odd_edges() {
        // 3x1: output is 1x1 sampling columns {0,1} twice over one row.
        let level = downsample(&[10, 30, 90], 3, 1, 1);
        assert_eq!((level.width, level.height), (1, 1));
        assert_eq!(level.data, vec![20]);
    }

    #[test]
    fn chain_ends_at_one_by_one() {
        let base = vec![128u8; 8 * 4 * 4];
        let chain = build_chain(&base, 8, 4, 4);
        // 8x4 -> 4x2 -> 2x1 -> 1x1
        assert_eq!(chain.len(), 3);
        assert_eq!((chain[0].width, chain[0].height), (4, 2));
        assert_eq!((chain[2].width, chain[2].height), (1, 1));
        assert_eq!(chain.len() as u32 + 1, mip_level_count(8, 4));
        assert!(chain[2].data.iter().all(|&b| b == 128));
    }
}
