//! Procedural demo assets: a checkerboard texture and a unit cube.
//!
//! Pixels are generated top row first, which is the orientation the
//! engine uploads, so no vertical flip is needed here. A decoder with a
//! bottom-up origin would call `PixelBuffer::flip_vertical` once per
//! image instead.

use glint_engine::error::RenderError;
use glint_engine::texture::PixelBuffer;

/// An RGB checkerboard, `size` pixels square with `cell`-pixel squares.
///
/// Deliberately 3-channel so the upload path's RGBA expansion runs.
pub fn checkerboard(size: u32, cell: u32) -> Result<PixelBuffer, RenderError> {
    const DARK: [u8; 3] = [38, 44, 58];
    const LIGHT: [u8; 3] = [222, 168, 62];

    let cell = cell.max(1);
    let mut data = Vec::with_capacity((size * size * 3) as usize);
    for y in 0..size {
        for x in 0..size {
            let even = ((x / cell) + (y / cell)) % 2 == 0;
            data.extend_from_slice(if even { &DARK } else { &LIGHT });
        }
    }

    PixelBuffer::new(size, size, 3, data)
}

/// Unit cube centered on the origin, interleaved `position3 | uv2`.
///
/// Four vertices per face so each face gets full 0..1 texture coverage.
pub fn cube_vertices() -> Vec<f32> {
    #[rustfmt::skip]
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // (origin corner, u edge, v edge) per face
        ([-0.5, -0.5,  0.5], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), // front  (+Z)
        ([ 0.5, -0.5, -0.5], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), // back   (-Z)
        ([ 0.5, -0.5,  0.5], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]), // right  (+X)
        ([-0.5, -0.5, -0.5], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]), // left   (-X)
        ([-0.5,  0.5,  0.5], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]), // top    (+Y)
        ([-0.5, -0.5, -0.5], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]), // bottom (-Y)
    ];

    let mut vertices = Vec::with_capacity(6 * 4 * 5);
    for (origin, u_edge, v_edge) in faces {
        for (u, v) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            for i in 0..3 {
                vertices.push(origin[i] + u * u_edge[i] + v * v_edge[i]);
            }
            vertices.push(u);
            vertices.push(v);
        }
    }
    vertices
}

/// Index list matching [`cube_vertices`]: two CCW triangles per face.
pub fn cube_indices() -> Vec<u32> {
    let mut indices = Vec::with_capacity(36);
    for face in 0..6u32 {
        let base = face * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}
