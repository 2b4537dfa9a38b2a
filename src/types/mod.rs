//! Shared type definitions for GPU resources.

mod buffer;
mod texture;

pub use buffer::{BufferDescriptor, BufferUsage};
pub use texture::{Texture, TextureFormat, TextureTarget};
