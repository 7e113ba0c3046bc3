//! Thin OpenGL object wrappers over a client-side binding cache.
//!
//! [`Bindery`] remembers which buffer, texture, vertex array and program is bound where, so that
//! redundant bind calls never reach the driver. Objects are created, bound and deleted through
//! it; the driver is reached through [`GraphicsContext`], implemented for [`glow::Context`].

mod bindery;
pub mod config;
pub mod error;
pub mod gl;

pub use bindery::Bindery;
pub use config::{BinderyConfig, GlVersion, Profile};
pub use error::Error;
pub use gl::{
    BindingCache, BufferId, BufferTarget, GraphicsContext, ImageData, ObjectCategory,
    ObjectHandle, ProgramId, ShaderStage, TextureId, TextureStorage, TextureTarget, UniformValue,
    VertexArrayId, VertexAttribute,
};
