use std::fmt;

use crate::config::GlVersion;

/// Opaque driver-side object name. Zero is the "no object" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(u32);

impl ObjectHandle {
    /// The "nothing bound" handle.
    pub const NONE: Self = Self(0);

    /// Wraps a raw object name.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw object name.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether this is the reserved name 0.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Object categories with their own binding slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    /// Buffer objects, one slot per [`BufferTarget`].
    Buffer,
    /// Textures, one slot per [`TextureTarget`] on each texture unit.
    Texture,
    /// Vertex array objects, a single slot.
    VertexArray,
    /// Shader programs, a single slot for the program in use.
    ShaderProgram,
}

/// Buffer binding points, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// `ARRAY_BUFFER`
    Array,
    /// `ELEMENT_ARRAY_BUFFER`, stored as vertex array state
    ElementArray,
    /// `UNIFORM_BUFFER`
    Uniform,
    /// `SHADER_STORAGE_BUFFER`
    ShaderStorage,
    /// `PIXEL_PACK_BUFFER`
    PixelPack,
    /// `PIXEL_UNPACK_BUFFER`
    PixelUnpack,
    /// `COPY_READ_BUFFER`
    CopyRead,
    /// `COPY_WRITE_BUFFER`
    CopyWrite,
    /// `DISPATCH_INDIRECT_BUFFER`
    DispatchIndirect,
    /// `DRAW_INDIRECT_BUFFER`
    DrawIndirect,
    /// `QUERY_BUFFER`
    Query,
    /// `TEXTURE_BUFFER`
    Texture,
    /// `TRANSFORM_FEEDBACK_BUFFER`
    TransformFeedback,
    /// `ATOMIC_COUNTER_BUFFER`
    AtomicCounter,
}

impl BufferTarget {
    /// All buffer targets in enumeration order.
    pub const ALL: [Self; 14] = [
        Self::Array,
        Self::ElementArray,
        Self::Uniform,
        Self::ShaderStorage,
        Self::PixelPack,
        Self::PixelUnpack,
        Self::CopyRead,
        Self::CopyWrite,
        Self::DispatchIndirect,
        Self::DrawIndirect,
        Self::Query,
        Self::Texture,
        Self::TransformFeedback,
        Self::AtomicCounter,
    ];

    pub(crate) const COUNT: usize = Self::ALL.len();

    /// Slot index into the binding table; matches the position in [`Self::ALL`].
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// The GL binding point enumerator.
    #[must_use]
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Array => glow::ARRAY_BUFFER,
            Self::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
            Self::Uniform => glow::UNIFORM_BUFFER,
            Self::ShaderStorage => glow::SHADER_STORAGE_BUFFER,
            Self::PixelPack => glow::PIXEL_PACK_BUFFER,
            Self::PixelUnpack => glow::PIXEL_UNPACK_BUFFER,
            Self::CopyRead => glow::COPY_READ_BUFFER,
            Self::CopyWrite => glow::COPY_WRITE_BUFFER,
            Self::DispatchIndirect => glow::DISPATCH_INDIRECT_BUFFER,
            Self::DrawIndirect => glow::DRAW_INDIRECT_BUFFER,
            Self::Query => glow::QUERY_BUFFER,
            Self::Texture => glow::TEXTURE_BUFFER,
            Self::TransformFeedback => glow::TRANSFORM_FEEDBACK_BUFFER,
            Self::AtomicCounter => glow::ATOMIC_COUNTER_BUFFER,
        }
    }

    /// Maps a raw GL enumerator back to a buffer target, `None` if it isn't one.
    #[must_use]
    pub const fn from_gl(target: u32) -> Option<Self> {
        Some(match target {
            glow::ARRAY_BUFFER => Self::Array,
            glow::ELEMENT_ARRAY_BUFFER => Self::ElementArray,
            glow::UNIFORM_BUFFER => Self::Uniform,
            glow::SHADER_STORAGE_BUFFER => Self::ShaderStorage,
            glow::PIXEL_PACK_BUFFER => Self::PixelPack,
            glow::PIXEL_UNPACK_BUFFER => Self::PixelUnpack,
            glow::COPY_READ_BUFFER => Self::CopyRead,
            glow::COPY_WRITE_BUFFER => Self::CopyWrite,
            glow::DISPATCH_INDIRECT_BUFFER => Self::DispatchIndirect,
            glow::DRAW_INDIRECT_BUFFER => Self::DrawIndirect,
            glow::QUERY_BUFFER => Self::Query,
            glow::TEXTURE_BUFFER => Self::Texture,
            glow::TRANSFORM_FEEDBACK_BUFFER => Self::TransformFeedback,
            glow::ATOMIC_COUNTER_BUFFER => Self::AtomicCounter,
            _ => return None,
        })
    }

    /// Oldest OpenGL version in which this target can be bound.
    #[must_use]
    pub const fn min_version(self) -> GlVersion {
        match self {
            Self::Uniform | Self::CopyRead | Self::CopyWrite | Self::Texture => GlVersion::V3_1,
            Self::DrawIndirect => GlVersion::V4_0,
            Self::AtomicCounter => GlVersion::V4_2,
            Self::DispatchIndirect | Self::ShaderStorage => GlVersion::V4_3,
            Self::Query => GlVersion::V4_4,
            _ => GlVersion::V2_0,
        }
    }
}

/// How storage is allocated and images are uploaded for a texture target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextureDimensions {
    /// `*Storage1D`, `*Image1D`
    One,
    /// `*Storage2D`, `*Image2D`
    Two,
    /// `*Storage3D`, `*Image3D`
    Three,
    /// `*Storage2DMultisample`
    TwoMultisample,
    /// `*Storage3DMultisample`
    ThreeMultisample,
    /// buffer textures have no storage of their own
    Buffer,
}

/// Texture binding points, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    /// `TEXTURE_1D`
    Texture1D,
    /// `TEXTURE_2D`
    Texture2D,
    /// `TEXTURE_3D`
    Texture3D,
    /// `TEXTURE_1D_ARRAY`
    Texture1DArray,
    /// `TEXTURE_2D_ARRAY`
    Texture2DArray,
    /// `TEXTURE_RECTANGLE`
    Rectangle,
    /// `TEXTURE_CUBE_MAP`
    CubeMap,
    /// `TEXTURE_CUBE_MAP_ARRAY`
    CubeMapArray,
    /// `TEXTURE_BUFFER`
    Buffer,
    /// `TEXTURE_2D_MULTISAMPLE`
    Texture2DMultisample,
    /// `TEXTURE_2D_MULTISAMPLE_ARRAY`
    Texture2DMultisampleArray,
}

impl TextureTarget {
    /// All texture targets in enumeration order.
    pub const ALL: [Self; 11] = [
        Self::Texture1D,
        Self::Texture2D,
        Self::Texture3D,
        Self::Texture1DArray,
        Self::Texture2DArray,
        Self::Rectangle,
        Self::CubeMap,
        Self::CubeMapArray,
        Self::Buffer,
        Self::Texture2DMultisample,
        Self::Texture2DMultisampleArray,
    ];

    pub(crate) const COUNT: usize = Self::ALL.len();

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// The GL texture target enumerator.
    #[must_use]
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Texture1D => glow::TEXTURE_1D,
            Self::Texture2D => glow::TEXTURE_2D,
            Self::Texture3D => glow::TEXTURE_3D,
            Self::Texture1DArray => glow::TEXTURE_1D_ARRAY,
            Self::Texture2DArray => glow::TEXTURE_2D_ARRAY,
            Self::Rectangle => glow::TEXTURE_RECTANGLE,
            Self::CubeMap => glow::TEXTURE_CUBE_MAP,
            Self::CubeMapArray => glow::TEXTURE_CUBE_MAP_ARRAY,
            Self::Buffer => glow::TEXTURE_BUFFER,
            Self::Texture2DMultisample => glow::TEXTURE_2D_MULTISAMPLE,
            Self::Texture2DMultisampleArray => glow::TEXTURE_2D_MULTISAMPLE_ARRAY,
        }
    }

    /// Maps a raw GL enumerator back to a texture target, `None` if it isn't one.
    #[must_use]
    pub const fn from_gl(target: u32) -> Option<Self> {
        Some(match target {
            glow::TEXTURE_1D => Self::Texture1D,
            glow::TEXTURE_2D => Self::Texture2D,
            glow::TEXTURE_3D => Self::Texture3D,
            glow::TEXTURE_1D_ARRAY => Self::Texture1DArray,
            glow::TEXTURE_2D_ARRAY => Self::Texture2DArray,
            glow::TEXTURE_RECTANGLE => Self::Rectangle,
            glow::TEXTURE_CUBE_MAP => Self::CubeMap,
            glow::TEXTURE_CUBE_MAP_ARRAY => Self::CubeMapArray,
            glow::TEXTURE_BUFFER => Self::Buffer,
            glow::TEXTURE_2D_MULTISAMPLE => Self::Texture2DMultisample,
            glow::TEXTURE_2D_MULTISAMPLE_ARRAY => Self::Texture2DMultisampleArray,
            _ => return None,
        })
    }

    /// Oldest OpenGL version in which this target can be bound.
    #[must_use]
    pub const fn min_version(self) -> GlVersion {
        match self {
            Self::Texture2DMultisample | Self::Texture2DMultisampleArray => GlVersion::V3_2,
            Self::Rectangle | Self::Buffer => GlVersion::V3_1,
            Self::CubeMapArray => GlVersion::V4_0,
            _ => GlVersion::V2_0,
        }
    }

    pub(crate) const fn dimensions(self) -> TextureDimensions {
        match self {
            Self::Texture1D => TextureDimensions::One,
            Self::Texture2D | Self::Rectangle | Self::CubeMap | Self::Texture1DArray => {
                TextureDimensions::Two
            },
            Self::Texture3D | Self::Texture2DArray | Self::CubeMapArray => {
                TextureDimensions::Three
            },
            Self::Texture2DMultisample => TextureDimensions::TwoMultisample,
            Self::Texture2DMultisampleArray => TextureDimensions::ThreeMultisample,
            Self::Buffer => TextureDimensions::Buffer,
        }
    }
}
