//! Texture collaborator types.
//!
//! The geometry pipeline never uploads or samples textures itself. It only
//! reads the bound texture's [`TextureTarget`] to decide whether texture
//! coordinates are two or three floats wide. Pixel decoding happens
//! upstream; [`Texture`] consumes already-decoded bytes.

use crate::error::GraphicsError;

/// What kind of texture a render state binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureTarget {
    /// Standard 2D texture, sampled with (u, v).
    #[default]
    D2,
    /// Cube map, sampled with a 3-component direction.
    CubeMap,
}

impl TextureTarget {
    /// Number of float components a texture coordinate needs for this target.
    pub fn uv_len(&self) -> u32 {
        match self {
            Self::D2 => 2,
            Self::CubeMap => 3,
        }
    }
}

/// Pixel format of decoded texture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    /// 8-bit RGB, three channels.
    Rgb8,
    /// 8-bit RGBA, four channels.
    #[default]
    Rgba8,
}

impl TextureFormat {
    /// Number of color channels.
    pub fn channel_count(&self) -> u32 {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Size in bytes of one pixel.
    pub fn bytes_per_pixel(&self) -> u32 {
        self.channel_count()
    }
}

/// A decoded texture consumed by the render state.
#[derive(Debug, Clone)]
pub struct Texture {
    label: Option<String>,
    target: TextureTarget,
    format: TextureFormat,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Texture {
    /// Create a 2D texture from decoded pixel bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the data length does not match
    /// `width * height * channels` or a dimension is zero.
    pub fn new_2d(
        width: u32,
        height: u32,
        format: TextureFormat,
        data: Vec<u8>,
    ) -> Result<Self, GraphicsError> {
        Self::new(TextureTarget::D2, width, height, format, data)
    }

    /// Create a cube-map texture from decoded pixel bytes of one face.
    pub fn new_cube_map(
        width: u32,
        height: u32,
        format: TextureFormat,
        data: Vec<u8>,
    ) -> Result<Self, GraphicsError> {
        Self::new(TextureTarget::CubeMap, width, height, format, data)
    }

    fn new(
        target: TextureTarget,
        width: u32,
        height: u32,
        format: TextureFormat,
        data: Vec<u8>,
    ) -> Result<Self, GraphicsError> {
        if width == 0 || height == 0 {
            return Err(GraphicsError::InvalidParameter(
                "texture dimensions cannot be zero".to_string(),
            ));
        }
        let expected = width as usize * height as usize * format.bytes_per_pixel() as usize;
        if data.len() != expected {
            return Err(GraphicsError::InvalidParameter(format!(
                "texture data is {} bytes, expected {} for {}x{} {:?}",
                data.len(),
                expected,
                width,
                height,
                format
            )));
        }
        Ok(Self {
            label: None,
            target,
            format,
            width,
            height,
            data,
        })
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the texture target.
    pub fn target(&self) -> TextureTarget {
        self.target
    }

    /// Get the pixel format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Get the number of color channels (3 or 4).
    pub fn channel_count(&self) -> u32 {
        self.format.channel_count()
    }

    /// Whether the format carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.format == TextureFormat::Rgba8
    }

    /// Texture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw decoded pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_uv_len() {
        assert_eq!(TextureTarget::D2.uv_len(), 2);
        assert_eq!(TextureTarget::CubeMap.uv_len(), 3);
    }

    #[test]
    fn test_format_channels() {
        assert_eq!(TextureFormat::Rgb8.channel_count(), 3);
        assert_eq!(TextureFormat::Rgba8.channel_count(), 4);
    }

    #[test]
    fn test_texture_creation() {
        let data = vec![255u8; 2 * 2 * 4];
        let texture = Texture::new_2d(2, 2, TextureFormat::Rgba8, data)
            .unwrap()
            .with_label("checker");
        assert_eq!(texture.target(), TextureTarget::D2);
        assert!(texture.has_alpha());
        assert_eq!(texture.label(), Some("checker"));
    }

    #[test]
    fn test_texture_size_mismatch() {
        let result = Texture::new_2d(4, 4, TextureFormat::Rgb8, vec![0u8; 10]);
        assert!(result.is_err());
    }

    #[test]
    fn test_texture_zero_dimension() {
        let result = Texture::new_2d(0, 4, TextureFormat::Rgb8, Vec::new());
        assert!(result.is_err());
    }
}
