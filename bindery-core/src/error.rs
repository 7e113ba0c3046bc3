//! Error type shared by every wrapper.

use crate::{config::GlVersion, gl::ObjectHandle};

/// Error categories for the object wrappers.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Version parsing, validation, or feature gating errors.
    #[error("Version error: {0}")]
    Version(String),

    /// Shader compilation, linking, or program creation errors.
    #[error("Shader error: {0}")]
    Shader(String),

    /// GL resource creation or management errors.
    #[error("Resource error: {0}")]
    Resource(String),

    /// An id that doesn't name a live object of the expected kind.
    #[error("Unknown {kind} object {handle}")]
    UnknownObject {
        /// Object kind, e.g. "buffer".
        kind: &'static str,
        /// The offending handle.
        handle: ObjectHandle,
    },
}

impl Error {
    // Version errors
    pub(crate) fn version_missing() -> Self {
        Self::Version("no OpenGL version given".to_string())
    }

    pub(crate) fn invalid_version(encoded: u32) -> Self {
        Self::Version(format!("{encoded} is not a valid OpenGL version"))
    }

    pub(crate) fn version_above_max(encoded: u32) -> Self {
        Self::Version(format!(
            "{encoded} is above the newest supported OpenGL version ({})",
            GlVersion::MAX
        ))
    }

    pub(crate) fn version_below_min(encoded: u32) -> Self {
        Self::Version(format!(
            "{encoded} is below the oldest supported OpenGL version ({})",
            GlVersion::MIN
        ))
    }

    pub(crate) fn unparsable_version(input: &str) -> Self {
        Self::Version(format!("cannot parse OpenGL version from {input:?}"))
    }

    pub(crate) fn unknown_profile(input: &str) -> Self {
        Self::Version(format!("unknown OpenGL profile {input:?}"))
    }

    pub(crate) fn version_too_low(what: &str, required: GlVersion, configured: GlVersion) -> Self {
        Self::Version(format!(
            "{what} requires OpenGL {required}, but the context is OpenGL {configured}"
        ))
    }

    // Shader errors
    pub(crate) fn shader_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader creation failed: {detail}"))
    }

    pub(crate) fn shader_compile_failed(stage: &str, log: &str) -> Self {
        Self::Shader(format!("{stage} shader compilation failed: {log}"))
    }

    pub(crate) fn shader_program_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader program creation failed: {detail}"))
    }

    pub(crate) fn shader_link_failed(log: String) -> Self {
        Self::Shader(format!("Shader linking failed: {log}"))
    }

    pub(crate) fn program_not_linked(handle: ObjectHandle) -> Self {
        Self::Shader(format!("Shader program {handle} has not been linked"))
    }

    // Resource errors
    pub(crate) fn buffer_creation_failed(detail: &str) -> Self {
        Self::Resource(format!("Failed to create buffer: {detail}"))
    }

    pub(crate) fn vertex_array_creation_failed(detail: &str) -> Self {
        Self::Resource(format!("Failed to create vertex array object: {detail}"))
    }

    pub(crate) fn texture_creation_failed(detail: &str) -> Self {
        Self::Resource(format!("Failed to create texture: {detail}"))
    }

    pub(crate) fn uniform_location_failed(name: &str) -> Self {
        Self::Resource(format!("Failed to get uniform location: {name}"))
    }

    pub(crate) fn texture_unit_out_of_range(unit: u32, max: u32) -> Self {
        Self::Resource(format!("Texture unit {unit} is out of range (max {max})"))
    }

    pub(crate) fn unsupported_texture_operation(operation: &str, target: u32) -> Self {
        Self::Resource(format!(
            "{operation} is not supported for texture target 0x{target:04X}"
        ))
    }

    pub(crate) fn invalid_image_data(expected: usize, actual: usize) -> Self {
        Self::Resource(format!(
            "Image data holds {actual} bytes, but its dimensions require at least {expected}"
        ))
    }

    pub(crate) fn image_size_overflow(width: i32, height: i32, channels: u8) -> Self {
        Self::Resource(format!(
            "Image of {width}x{height} pixels with {channels} channels is too large to address"
        ))
    }

    // Registry errors
    pub(crate) fn unknown_object(kind: &'static str, handle: ObjectHandle) -> Self {
        Self::UnknownObject { kind, handle }
    }
}
