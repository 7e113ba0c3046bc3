//! Binding cache, driver seam and the object wrappers built on them.

mod binding;
mod buffer;
mod context;
#[cfg(not(target_arch = "wasm32"))]
pub mod debug;
mod program;
#[cfg(test)]
pub(crate) mod recording;
mod target;
mod texture;
mod vertex_array;

pub use binding::{BindingCache, MAX_TEXTURE_UNITS};
pub use buffer::{BufferId, BufferInfo, as_bytes};
pub use context::{GraphicsContext, UniformLocation};
pub use program::{ProgramId, ProgramInfo, ShaderStage, UniformValue};
pub use target::{BufferTarget, ObjectCategory, ObjectHandle, TextureTarget};
pub(crate) use target::TextureDimensions;
pub use texture::{ImageData, TextureId, TextureInfo, TextureStorage};
pub use vertex_array::{VertexArrayId, VertexArrayInfo, VertexAttribute};
