use crate::error::RenderError;

/// Scalar type of one vertex attribute component.
///
/// All supported components are 4 bytes wide because the vertex wire
/// format is a flat sequence of 32-bit values.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ComponentType {
    Float32,
    Sint32,
    Uint32,
}

impl ComponentType {
    /// Size of one component in bytes.
    pub const fn size(self) -> u32 {
        4
    }
}

/// One slot of per-vertex data consumed by the vertex stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Attribute {
    /// Shader input location (`@location(n)` in WGSL).
    pub location: u32,

    /// Number of components, 1 through 4.
    pub component_count: u32,

    pub component_type: ComponentType,

    /// Integer-to-float normalization flag.
    ///
    /// Part of the layout contract, but rejected at validation time:
    /// wgpu has no normalized 32-bit vertex formats.
    pub normalized: bool,

    /// Byte offset of this attribute within one vertex.
    pub byte_offset: u32,
}

impl Attribute {
    /// Size of the whole attribute in bytes.
    pub fn byte_size(&self) -> u32 {
        self.component_count * self.component_type.size()
    }
}

/// Ordered description of how raw vertex floats map to shader inputs.
///
/// Immutable once a [`super::GeometryBuffer`] is built from it; the
/// stride is derived, never caller-supplied:
/// `stride = Σ component_count_i × component_size_i`.
#[derive(Debug, Clone)]
pub struct AttributeLayout {
    attributes: Vec<Attribute>,
    stride: u32,
    // Cached so `buffer_layout` can hand out a borrowed slice.
    wgpu_attributes: Vec<wgpu::VertexAttribute>,
}

impl AttributeLayout {
    /// Validates and builds a layout from explicit attributes.
    pub fn new(attributes: Vec<Attribute>) -> Result<Self, RenderError> {
        if attributes.is_empty() {
            return Err(RenderError::InvalidLayout(
                "layout has no attributes".to_string(),
            ));
        }

        let stride: u32 = attributes.iter().map(Attribute::byte_size).sum();

        let mut wgpu_attributes = Vec::with_capacity(attributes.len());
        for (i, attr) in attributes.iter().enumerate() {
            if !(1..=4).contains(&attr.component_count) {
                return Err(RenderError::InvalidLayout(format!(
                    "attribute {i}: component count {} outside 1..=4",
                    attr.component_count
                )));
            }
            if attr.normalized {
                return Err(RenderError::InvalidLayout(format!(
                    "attribute {i}: normalized 32-bit components are not supported"
                )));
            }
            if attr.byte_offset % 4 != 0 {
                return Err(RenderError::InvalidLayout(format!(
                    "attribute {i}: byte offset {} is not 4-byte aligned",
                    attr.byte_offset
                )));
            }
            if attr.byte_offset + attr.byte_size() > stride {
                return Err(RenderError::InvalidLayout(format!(
                    "attribute {i}: [{}, {}) exceeds stride {stride}",
                    attr.byte_offset,
                    attr.byte_offset + attr.byte_size()
                )));
            }
            if attributes[..i].iter().any(|a| a.location == attr.location) {
                return Err(RenderError::InvalidLayout(format!(
                    "attribute {i}: duplicate location {}",
                    attr.location
                )));
            }

            wgpu_attributes.push(wgpu::VertexAttribute {
                format: vertex_format(attr.component_type, attr.component_count),
                offset: attr.byte_offset as u64,
                shader_location: attr.location,
            });
        }

        Ok(Self {
            attributes,
            stride,
            wgpu_attributes,
        })
    }

    /// Builds a tightly packed layout: offsets are derived from the
    /// declaration order, e.g. `[(0, 3, Float32), (1, 2, Float32)]` for
    /// interleaved position + texcoord.
    pub fn packed(parts: &[(u32, u32, ComponentType)]) -> Result<Self, RenderError> {
        let mut offset = 0;
        let mut attributes = Vec::with_capacity(parts.len());
        for &(location, component_count, component_type) in parts {
            attributes.push(Attribute {
                location,
                component_count,
                component_type,
                normalized: false,
                byte_offset: offset,
            });
            offset += component_count * component_type.size();
        }
        Self::new(attributes)
    }

    /// Byte distance between consecutive vertices.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Number of `f32` values one vertex occupies in the wire format.
    pub fn floats_per_vertex(&self) -> u32 {
        self.stride / 4
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The wgpu-side description this layout bakes into a pipeline.
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.wgpu_attributes,
        }
    }
}

fn vertex_format(ty: ComponentType, count: u32) -> wgpu::VertexFormat {
    use wgpu::VertexFormat as F;
    match (ty, count) {
        (ComponentType::Float32, 1) => F::Float32,
        (ComponentType::Float32, 2) => F::Float32x2,
        (ComponentType::Float32, 3) => F::Float32x3,
        (ComponentType::Float32, 4) => F::Float32x4,
        (ComponentType::Sint32, 1) => F::Sint32,
        (ComponentType::Sint32, 2) => F::Sint32x2,
        (ComponentType::Sint32, 3) => F::Sint32x3,
        (ComponentType::Sint32, 4) => F::Sint32x4,
        (ComponentType::Uint32, 1) => F::Uint32,
        (ComponentType::Uint32, 2) => F::Uint32x2,
        (ComponentType::Uint32, 3) => F::Uint32x3,
        (ComponentType::Uint32, 4) => F::Uint32x4,
        // Counts are validated in AttributeLayout::new before this runs.
        _ => unreachable!("component count validated to 1..=4"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos_uv() -> AttributeLayout {
        AttributeLayout::packed(&[
            (0, 3, ComponentType::Float32),
            (1, 2, ComponentType::Float32),
        ])
        .unwrap()
    }

    #[test]
    fn stride_is_sum_of_component_sizes() {
        let layout = pos_uv();
        assert_eq!(layout.stride(), 20);
        assert_eq!(layout.floats_per_vertex(), 5);
        assert_eq!(layout.attributes()[1].byte_offset, 12);
    }

    #[test]
    fn attribute_intervals_stay_within_stride() {
        let layout = pos_uv();
        for attr in layout.attributes() {
            assert!(attr.byte_offset + attr.byte_size() <= layout.stride());
        }
    }

    #[test]
    fn offset_past_stride_is_rejected() {
        let err = AttributeLayout::new(vec![Attribute {
            location: 0,
            component_count: 2,
            component_type: ComponentType::Float32,
            normalized: false,
            byte_offset: 4,
        }])
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidLayout(_)));
    }

    #[test]
    fn duplicate_locations_are_rejected() {
        let err = AttributeLayout::packed(&[
            (0, 3, ComponentType::Float32),
            (0, 2, ComponentType::Float32),
        ])
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidLayout(_)));
    }

    #[test]
    fn normalized_flag_is_rejected_for_32bit_components() {
        let err = AttributeLayout::new(vec![Attribute {
            location: 0,
            component_count: 4,
            component_type: ComponentType::Uint32,
            normalized: true,
            byte_offset: 0,
        }])
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidLayout(_)));
    }

    #[test]
    fn wgpu_layout_mirrors_attributes() {
        let layout = pos_uv();
        let wl = layout.buffer_layout();
        assert_eq!(wl.array_stride, 20);
        assert_eq!(wl.attributes.len(), 2);
        assert_eq!(wl.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(wl.attributes[1].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(wl.attributes[1].offset, 12);
        assert_eq!(wl.attributes[1].shader_location, 1);
    }
}
