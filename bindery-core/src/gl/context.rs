//! The narrow set of driver calls the wrappers issue.
//!
//! Everything that changes bindings or object lifetimes goes through [`GraphicsContext`], so the
//! binding cache can stay in step with the driver. Implementations must only be used on the
//! thread owning the current OpenGL context.

use crate::gl::{ObjectHandle, UniformValue};

/// Location of a uniform within a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Driver entry points used by [`crate::Bindery`].
///
/// Handles are plain object names; [`ObjectHandle::NONE`] unbinds when passed to a bind call.
/// Creation calls report driver failures as strings, as `glow` does.
pub trait GraphicsContext {
    // buffers
    /// `glGenBuffers`
    fn create_buffer(&self) -> Result<ObjectHandle, String>;
    /// `glCreateBuffers`, OpenGL 4.5
    fn create_named_buffer(&self) -> Result<ObjectHandle, String>;
    /// `glBindBuffer`
    fn bind_buffer(&self, target: u32, buffer: ObjectHandle);
    /// `glDeleteBuffers`; ignores [`ObjectHandle::NONE`].
    fn delete_buffer(&self, buffer: ObjectHandle);
    /// `glBufferData` on the buffer bound to `target`.
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    /// `glBufferSubData` on the buffer bound to `target`.
    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]);
    /// `glNamedBufferData`, OpenGL 4.5
    fn named_buffer_data(&self, buffer: ObjectHandle, data: &[u8], usage: u32);
    /// `glNamedBufferSubData`, OpenGL 4.5
    fn named_buffer_sub_data(&self, buffer: ObjectHandle, offset: i32, data: &[u8]);

    // textures
    /// `glGenTextures`
    fn create_texture(&self) -> Result<ObjectHandle, String>;
    /// `glCreateTextures`, OpenGL 4.5
    fn create_named_texture(&self, target: u32) -> Result<ObjectHandle, String>;
    /// `glActiveTexture`; `unit` is the GL enumerator, i.e. `TEXTURE0 + n`.
    fn active_texture(&self, unit: u32);
    /// `glBindTexture` on the active unit.
    fn bind_texture(&self, target: u32, texture: ObjectHandle);
    /// `glDeleteTextures`; the driver unbinds it from every unit.
    fn delete_texture(&self, texture: ObjectHandle);
    /// `glTexStorage1D`
    fn tex_storage_1d(&self, target: u32, levels: i32, internal_format: u32, width: i32);
    /// `glTexStorage2D`
    fn tex_storage_2d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    );
    /// `glTexStorage3D`
    #[allow(clippy::too_many_arguments)]
    fn tex_storage_3d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
    );
    /// `glTexStorage2DMultisample`
    #[allow(clippy::too_many_arguments)]
    fn tex_storage_2d_multisample(
        &self,
        target: u32,
        samples: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        fixed_sample_locations: bool,
    );
    /// `glTextureStorage2D`, OpenGL 4.5
    fn texture_storage_2d(
        &self,
        texture: ObjectHandle,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    );
    /// `glTextureStorage3D`, OpenGL 4.5
    #[allow(clippy::too_many_arguments)]
    fn texture_storage_3d(
        &self,
        texture: ObjectHandle,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
    );
    /// `glTexImage1D` for level 0.
    #[allow(clippy::too_many_arguments)]
    fn tex_image_1d(
        &self,
        target: u32,
        internal_format: i32,
        width: i32,
        format: u32,
        ty: u32,
        pixels: &[u8],
    );
    /// `glTexImage2D` for level 0.
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &[u8],
    );
    /// `glTexSubImage2D` over the whole of level 0.
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_2d(
        &self,
        target: u32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &[u8],
    );
    /// `glTexParameteri`
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    /// `glTexParameterf`
    fn tex_parameter_f32(&self, target: u32, parameter: u32, value: f32);
    /// `glTextureParameteri`, OpenGL 4.5
    fn texture_parameter_i32(&self, texture: ObjectHandle, parameter: u32, value: i32);
    /// `glGetTexParameteriv` on the texture bound to `target`.
    fn get_tex_parameter_i32(&self, target: u32, parameter: u32) -> i32;
    /// `glGetTexParameterfv` on the texture bound to `target`.
    fn get_tex_parameter_f32(&self, target: u32, parameter: u32) -> f32;
    /// `glGenerateMipmap`
    fn generate_mipmap(&self, target: u32);
    /// `glGenerateTextureMipmap`, OpenGL 4.5
    fn generate_texture_mipmap(&self, texture: ObjectHandle);

    // vertex arrays
    /// `glGenVertexArrays`
    fn create_vertex_array(&self) -> Result<ObjectHandle, String>;
    /// `glBindVertexArray`
    fn bind_vertex_array(&self, vertex_array: ObjectHandle);
    /// `glDeleteVertexArrays`
    fn delete_vertex_array(&self, vertex_array: ObjectHandle);
    /// `glEnableVertexAttribArray` on the bound vertex array.
    fn enable_vertex_attrib_array(&self, index: u32);
    /// `glVertexAttribPointer`, sourcing from the bound `ARRAY_BUFFER`.
    #[allow(clippy::too_many_arguments)]
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );

    // programs and shaders
    /// `glCreateProgram`
    fn create_program(&self) -> Result<ObjectHandle, String>;
    /// `glUseProgram`
    fn use_program(&self, program: ObjectHandle);
    /// `glDeleteProgram`
    fn delete_program(&self, program: ObjectHandle);
    /// `glCreateShader`
    fn create_shader(&self, shader_type: u32) -> Result<ObjectHandle, String>;
    /// `glShaderSource`
    fn shader_source(&self, shader: ObjectHandle, source: &str);
    /// `glCompileShader`
    fn compile_shader(&self, shader: ObjectHandle);
    /// `GL_COMPILE_STATUS` of the shader.
    fn get_shader_compile_status(&self, shader: ObjectHandle) -> bool;
    /// `glGetShaderInfoLog`
    fn get_shader_info_log(&self, shader: ObjectHandle) -> String;
    /// `glAttachShader`
    fn attach_shader(&self, program: ObjectHandle, shader: ObjectHandle);
    /// `glDetachShader`
    fn detach_shader(&self, program: ObjectHandle, shader: ObjectHandle);
    /// `glDeleteShader`
    fn delete_shader(&self, shader: ObjectHandle);
    /// `glLinkProgram`
    fn link_program(&self, program: ObjectHandle);
    /// `GL_LINK_STATUS` of the program.
    fn get_program_link_status(&self, program: ObjectHandle) -> bool;
    /// `glGetProgramInfoLog`
    fn get_program_info_log(&self, program: ObjectHandle) -> String;
    /// `glGetUniformLocation`; `None` if the program has no active uniform `name`.
    fn get_uniform_location(&self, program: ObjectHandle, name: &str) -> Option<UniformLocation>;
    /// Sets a uniform of the program currently in use.
    fn uniform(&self, location: UniformLocation, value: &UniformValue);
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::num::NonZeroU32;

    use glow::{HasContext, PixelUnpackData};

    use super::{GraphicsContext, UniformLocation};
    use crate::gl::{ObjectHandle, UniformValue};

    fn name(handle: ObjectHandle) -> Option<NonZeroU32> {
        NonZeroU32::new(handle.raw())
    }

    fn buffer(handle: ObjectHandle) -> Option<glow::NativeBuffer> {
        name(handle).map(glow::NativeBuffer)
    }

    fn texture(handle: ObjectHandle) -> Option<glow::NativeTexture> {
        name(handle).map(glow::NativeTexture)
    }

    fn vertex_array(handle: ObjectHandle) -> Option<glow::NativeVertexArray> {
        name(handle).map(glow::NativeVertexArray)
    }

    fn program(handle: ObjectHandle) -> Option<glow::NativeProgram> {
        name(handle).map(glow::NativeProgram)
    }

    fn shader(handle: ObjectHandle) -> Option<glow::NativeShader> {
        name(handle).map(glow::NativeShader)
    }

    fn created(raw: NonZeroU32) -> ObjectHandle {
        ObjectHandle::new(raw.get())
    }

    impl GraphicsContext for glow::Context {
        fn create_buffer(&self) -> Result<ObjectHandle, String> {
            unsafe { HasContext::create_buffer(self) }.map(|b| created(b.0))
        }

        fn create_named_buffer(&self) -> Result<ObjectHandle, String> {
            unsafe { HasContext::create_named_buffer(self) }.map(|b| created(b.0))
        }

        fn bind_buffer(&self, target: u32, handle: ObjectHandle) {
            unsafe { HasContext::bind_buffer(self, target, buffer(handle)) };
        }

        fn delete_buffer(&self, handle: ObjectHandle) {
            if let Some(b) = buffer(handle) {
                unsafe { HasContext::delete_buffer(self, b) };
            }
        }

        fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
            unsafe { self.buffer_data_u8_slice(target, data, usage) };
        }

        fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
            unsafe { self.buffer_sub_data_u8_slice(target, offset, data) };
        }

        fn named_buffer_data(&self, handle: ObjectHandle, data: &[u8], usage: u32) {
            if let Some(b) = buffer(handle) {
                unsafe { self.named_buffer_data_u8_slice(b, data, usage) };
            }
        }

        fn named_buffer_sub_data(&self, handle: ObjectHandle, offset: i32, data: &[u8]) {
            if let Some(b) = buffer(handle) {
                unsafe { self.named_buffer_sub_data_u8_slice(b, offset, data) };
            }
        }

        fn create_texture(&self) -> Result<ObjectHandle, String> {
            unsafe { HasContext::create_texture(self) }.map(|t| created(t.0))
        }

        fn create_named_texture(&self, target: u32) -> Result<ObjectHandle, String> {
            unsafe { HasContext::create_named_texture(self, target) }.map(|t| created(t.0))
        }

        fn active_texture(&self, unit: u32) {
            unsafe { HasContext::active_texture(self, unit) };
        }

        fn bind_texture(&self, target: u32, handle: ObjectHandle) {
            unsafe { HasContext::bind_texture(self, target, texture(handle)) };
        }

        fn delete_texture(&self, handle: ObjectHandle) {
            if let Some(t) = texture(handle) {
                unsafe { HasContext::delete_texture(self, t) };
            }
        }

        fn tex_storage_1d(&self, target: u32, levels: i32, internal_format: u32, width: i32) {
            unsafe { HasContext::tex_storage_1d(self, target, levels, internal_format, width) };
        }

        fn tex_storage_2d(
            &self,
            target: u32,
            levels: i32,
            internal_format: u32,
            width: i32,
            height: i32,
        ) {
            unsafe {
                HasContext::tex_storage_2d(self, target, levels, internal_format, width, height);
            };
        }

        fn tex_storage_3d(
            &self,
            target: u32,
            levels: i32,
            internal_format: u32,
            width: i32,
            height: i32,
            depth: i32,
        ) {
            unsafe {
                HasContext::tex_storage_3d(
                    self,
                    target,
                    levels,
                    internal_format,
                    width,
                    height,
                    depth,
                );
            };
        }

        fn tex_storage_2d_multisample(
            &self,
            target: u32,
            samples: i32,
            internal_format: u32,
            width: i32,
            height: i32,
            fixed_sample_locations: bool,
        ) {
            unsafe {
                HasContext::tex_storage_2d_multisample(
                    self,
                    target,
                    samples,
                    internal_format,
                    width,
                    height,
                    fixed_sample_locations,
                );
            };
        }

        fn texture_storage_2d(
            &self,
            handle: ObjectHandle,
            levels: i32,
            internal_format: u32,
            width: i32,
            height: i32,
        ) {
            if let Some(t) = texture(handle) {
                unsafe {
                    HasContext::texture_storage_2d(self, t, levels, internal_format, width, height);
                };
            }
        }

        fn texture_storage_3d(
            &self,
            handle: ObjectHandle,
            levels: i32,
            internal_format: u32,
            width: i32,
            height: i32,
            depth: i32,
        ) {
            if let Some(t) = texture(handle) {
                unsafe {
                    HasContext::texture_storage_3d(
                        self,
                        t,
                        levels,
                        internal_format,
                        width,
                        height,
                        depth,
                    );
                };
            }
        }

        fn tex_image_1d(
            &self,
            target: u32,
            internal_format: i32,
            width: i32,
            format: u32,
            ty: u32,
            pixels: &[u8],
        ) {
            unsafe {
                HasContext::tex_image_1d(
                    self,
                    target,
                    0, // level
                    internal_format,
                    width,
                    0, // border
                    format,
                    ty,
                    PixelUnpackData::Slice(Some(pixels)),
                );
            };
        }

        fn tex_image_2d(
            &self,
            target: u32,
            internal_format: i32,
            width: i32,
            height: i32,
            format: u32,
            ty: u32,
            pixels: &[u8],
        ) {
            unsafe {
                HasContext::tex_image_2d(
                    self,
                    target,
                    0, // level
                    internal_format,
                    width,
                    height,
                    0, // border
                    format,
                    ty,
                    PixelUnpackData::Slice(Some(pixels)),
                );
            };
        }

        fn tex_sub_image_2d(
            &self,
            target: u32,
            width: i32,
            height: i32,
            format: u32,
            ty: u32,
            pixels: &[u8],
        ) {
            unsafe {
                HasContext::tex_sub_image_2d(
                    self,
                    target,
                    0,    // level
                    0, 0, // offset
                    width,
                    height,
                    format,
                    ty,
                    PixelUnpackData::Slice(Some(pixels)),
                );
            };
        }

        fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
            unsafe { HasContext::tex_parameter_i32(self, target, parameter, value) };
        }

        fn tex_parameter_f32(&self, target: u32, parameter: u32, value: f32) {
            unsafe { HasContext::tex_parameter_f32(self, target, parameter, value) };
        }

        fn texture_parameter_i32(&self, handle: ObjectHandle, parameter: u32, value: i32) {
            if let Some(t) = texture(handle) {
                unsafe { HasContext::texture_parameter_i32(self, t, parameter, value) };
            }
        }

        fn get_tex_parameter_i32(&self, target: u32, parameter: u32) -> i32 {
            unsafe { HasContext::get_tex_parameter_i32(self, target, parameter) }
        }

        fn get_tex_parameter_f32(&self, target: u32, parameter: u32) -> f32 {
            unsafe { HasContext::get_tex_parameter_f32(self, target, parameter) }
        }

        fn generate_mipmap(&self, target: u32) {
            unsafe { HasContext::generate_mipmap(self, target) };
        }

        fn generate_texture_mipmap(&self, handle: ObjectHandle) {
            if let Some(t) = texture(handle) {
                unsafe { HasContext::generate_texture_mipmap(self, t) };
            }
        }

        fn create_vertex_array(&self) -> Result<ObjectHandle, String> {
            unsafe { HasContext::create_vertex_array(self) }.map(|v| created(v.0))
        }

        fn bind_vertex_array(&self, handle: ObjectHandle) {
            unsafe { HasContext::bind_vertex_array(self, vertex_array(handle)) };
        }

        fn delete_vertex_array(&self, handle: ObjectHandle) {
            if let Some(v) = vertex_array(handle) {
                unsafe { HasContext::delete_vertex_array(self, v) };
            }
        }

        fn enable_vertex_attrib_array(&self, index: u32) {
            unsafe { HasContext::enable_vertex_attrib_array(self, index) };
        }

        fn vertex_attrib_pointer_f32(
            &self,
            index: u32,
            size: i32,
            data_type: u32,
            normalized: bool,
            stride: i32,
            offset: i32,
        ) {
            unsafe {
                HasContext::vertex_attrib_pointer_f32(
                    self, index, size, data_type, normalized, stride, offset,
                );
            };
        }

        fn create_program(&self) -> Result<ObjectHandle, String> {
            unsafe { HasContext::create_program(self) }.map(|p| created(p.0))
        }

        fn use_program(&self, handle: ObjectHandle) {
            unsafe { HasContext::use_program(self, program(handle)) };
        }

        fn delete_program(&self, handle: ObjectHandle) {
            if let Some(p) = program(handle) {
                unsafe { HasContext::delete_program(self, p) };
            }
        }

        fn create_shader(&self, shader_type: u32) -> Result<ObjectHandle, String> {
            unsafe { HasContext::create_shader(self, shader_type) }.map(|s| created(s.0))
        }

        fn shader_source(&self, handle: ObjectHandle, source: &str) {
            if let Some(s) = shader(handle) {
                unsafe { HasContext::shader_source(self, s, source) };
            }
        }

        fn compile_shader(&self, handle: ObjectHandle) {
            if let Some(s) = shader(handle) {
                unsafe { HasContext::compile_shader(self, s) };
            }
        }

        fn get_shader_compile_status(&self, handle: ObjectHandle) -> bool {
            shader(handle)
                .is_some_and(|s| unsafe { HasContext::get_shader_compile_status(self, s) })
        }

        fn get_shader_info_log(&self, handle: ObjectHandle) -> String {
            shader(handle)
                .map(|s| unsafe { HasContext::get_shader_info_log(self, s) })
                .unwrap_or_default()
        }

        fn attach_shader(&self, program_handle: ObjectHandle, shader_handle: ObjectHandle) {
            if let (Some(p), Some(s)) = (program(program_handle), shader(shader_handle)) {
                unsafe { HasContext::attach_shader(self, p, s) };
            }
        }

        fn detach_shader(&self, program_handle: ObjectHandle, shader_handle: ObjectHandle) {
            if let (Some(p), Some(s)) = (program(program_handle), shader(shader_handle)) {
                unsafe { HasContext::detach_shader(self, p, s) };
            }
        }

        fn delete_shader(&self, handle: ObjectHandle) {
            if let Some(s) = shader(handle) {
                unsafe { HasContext::delete_shader(self, s) };
            }
        }

        fn link_program(&self, handle: ObjectHandle) {
            if let Some(p) = program(handle) {
                unsafe { HasContext::link_program(self, p) };
            }
        }

        fn get_program_link_status(&self, handle: ObjectHandle) -> bool {
            program(handle).is_some_and(|p| unsafe { HasContext::get_program_link_status(self, p) })
        }

        fn get_program_info_log(&self, handle: ObjectHandle) -> String {
            program(handle)
                .map(|p| unsafe { HasContext::get_program_info_log(self, p) })
                .unwrap_or_default()
        }

        fn get_uniform_location(
            &self,
            handle: ObjectHandle,
            name: &str,
        ) -> Option<UniformLocation> {
            let p = program(handle)?;
            unsafe { HasContext::get_uniform_location(self, p, name) }.map(|l| UniformLocation(l.0))
        }

        fn uniform(&self, location: UniformLocation, value: &UniformValue) {
            let loc = glow::NativeUniformLocation(location.0);
            let loc = Some(&loc);
            unsafe {
                match value {
                    UniformValue::I32(v) => self.uniform_1_i32(loc, *v),
                    UniformValue::F32(v) => self.uniform_1_f32(loc, *v),
                    UniformValue::Vec2([x, y]) => self.uniform_2_f32(loc, *x, *y),
                    UniformValue::Vec3([x, y, z]) => self.uniform_3_f32(loc, *x, *y, *z),
                    UniformValue::Vec4([x, y, z, w]) => self.uniform_4_f32(loc, *x, *y, *z, *w),
                    UniformValue::Mat3 { data, transpose } => {
                        self.uniform_matrix_3_f32_slice(loc, *transpose, data);
                    },
                    UniformValue::Mat4 { data, transpose } => {
                        self.uniform_matrix_4_f32_slice(loc, *transpose, data);
                    },
                }
            }
        }
    }
}
