//! Vertex layout description for the interleaved buffer.
//!
//! The geometry pipeline emits a single interleaved vertex buffer; the
//! layout tells the backend how to bind each attribute at draw time.
//! Attribute slot locations come from the render state binding, so the
//! layout is rebuilt per draw rather than shared.

/// Format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
}

impl VertexAttributeFormat {
    /// Size in bytes of this format.
    pub fn size(&self) -> u32 {
        match self {
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
        }
    }

    /// Number of float components.
    pub fn len(&self) -> u32 {
        match self {
            Self::Float2 => 2,
            Self::Float3 => 3,
            Self::Float4 => 4,
        }
    }
}

/// A single vertex attribute binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Shader attribute slot location.
    pub location: u32,
    /// Data format.
    pub format: VertexAttributeFormat,
    /// Byte offset within one vertex.
    pub offset: u32,
}

impl VertexAttribute {
    /// Create a new vertex attribute.
    pub fn new(location: u32, format: VertexAttributeFormat, offset: u32) -> Self {
        Self {
            location,
            format,
            offset,
        }
    }
}

/// Describes one interleaved vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexLayout {
    stride: u32,
    attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Create a layout with the given stride and no attributes.
    pub fn new(stride: u32) -> Self {
        Self {
            stride,
            attributes: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: VertexAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Stride in bytes between consecutive vertices.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// The attribute bindings.
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Check that every attribute fits within the stride.
    pub fn validate(&self) -> Result<(), String> {
        for attr in &self.attributes {
            if attr.offset + attr.format.size() > self.stride {
                return Err(format!(
                    "attribute at location {} ends at byte {} but stride is {}",
                    attr.location,
                    attr.offset + attr.format.size(),
                    self.stride
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sizes() {
        assert_eq!(VertexAttributeFormat::Float2.size(), 8);
        assert_eq!(VertexAttributeFormat::Float3.size(), 12);
        assert_eq!(VertexAttributeFormat::Float4.size(), 16);
        assert_eq!(VertexAttributeFormat::Float3.len(), 3);
    }

    #[test]
    fn test_layout_validation() {
        let layout = VertexLayout::new(24)
            .with_attribute(VertexAttribute::new(0, VertexAttributeFormat::Float3, 0))
            .with_attribute(VertexAttribute::new(1, VertexAttributeFormat::Float3, 12));
        assert!(layout.validate().is_ok());

        let overflowing = VertexLayout::new(24)
            .with_attribute(VertexAttribute::new(2, VertexAttributeFormat::Float3, 16));
        assert!(overflowing.validate().is_err());
    }
}
