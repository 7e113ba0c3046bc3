use compact_str::CompactString;
use rustc_hash::FxHashMap;

use crate::{
    Bindery,
    config::GlVersion,
    error::Error,
    gl::{GraphicsContext, ObjectCategory, ObjectHandle, UniformLocation},
};

/// Id of a shader program owned by a [`Bindery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub(crate) ObjectHandle);

impl ProgramId {
    /// Driver name of the program.
    #[must_use]
    pub fn handle(self) -> ObjectHandle {
        self.0
    }
}

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// `VERTEX_SHADER`
    Vertex,
    /// `FRAGMENT_SHADER`
    Fragment,
    /// `GEOMETRY_SHADER`, OpenGL 3.2
    Geometry,
    /// `TESS_CONTROL_SHADER`, OpenGL 4.0
    TessControl,
    /// `TESS_EVALUATION_SHADER`, OpenGL 4.0
    TessEvaluation,
    /// `COMPUTE_SHADER`, OpenGL 4.3
    Compute,
}

impl ShaderStage {
    /// The GL shader type enumerator.
    #[must_use]
    pub const fn to_gl(self) -> u32 {
        use ShaderStage::*;

        match self {
            Vertex => glow::VERTEX_SHADER,
            Fragment => glow::FRAGMENT_SHADER,
            Geometry => glow::GEOMETRY_SHADER,
            TessControl => glow::TESS_CONTROL_SHADER,
            TessEvaluation => glow::TESS_EVALUATION_SHADER,
            Compute => glow::COMPUTE_SHADER,
        }
    }

    /// Oldest context that can compile this stage.
    #[must_use]
    pub const fn min_version(self) -> GlVersion {
        match self {
            Self::Vertex | Self::Fragment => GlVersion::V2_0,
            Self::Geometry => GlVersion::V3_2,
            Self::TessControl | Self::TessEvaluation => GlVersion::V4_0,
            Self::Compute => GlVersion::V4_3,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Geometry => "geometry",
            Self::TessControl => "tessellation control",
            Self::TessEvaluation => "tessellation evaluation",
            Self::Compute => "compute",
        }
    }
}

/// A value for [`Bindery::set_uniform`]. Matrices are column-major unless `transpose` is set.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// `int` or `sampler*`
    I32(i32),
    /// `float`
    F32(f32),
    /// `vec2`
    Vec2([f32; 2]),
    /// `vec3`
    Vec3([f32; 3]),
    /// `vec4`
    Vec4([f32; 4]),
    /// `mat3`
    Mat3 {
        /// 3x3 components.
        data: [f32; 9],
        /// Whether `data` is row-major.
        transpose: bool,
    },
    /// `mat4`
    Mat4 {
        /// 4x4 components.
        data: [f32; 16],
        /// Whether `data` is row-major.
        transpose: bool,
    },
}

/// Bookkeeping for a live shader program.
#[derive(Debug, Default)]
pub struct ProgramInfo {
    /// Driver name of the program.
    pub handle: ObjectHandle,
    /// Whether the last link attempt succeeded.
    pub linked: bool,
    /// Compiled shaders attached since the last successful link.
    shaders: Vec<ObjectHandle>,
    uniforms: FxHashMap<CompactString, UniformLocation>,
}

impl ProgramInfo {
    /// Number of compiled shaders waiting for the next link.
    #[must_use]
    pub fn pending_shaders(&self) -> usize {
        self.shaders.len()
    }
}

impl Bindery {
    /// Creates an empty shader program.
    ///
    /// # Errors
    /// Returns [`Error::Shader`] if the driver fails to create the program.
    pub fn create_program<G: GraphicsContext>(&mut self, gl: &G) -> Result<ProgramId, Error> {
        let handle = gl
            .create_program()
            .map_err(|e| Error::shader_program_creation_failed(&e))?;

        tracing::debug!(%handle, "created shader program");
        self.programs
            .insert(handle, ProgramInfo { handle, ..ProgramInfo::default() });
        Ok(ProgramId(handle))
    }

    /// Bookkeeping for a live program, `None` once deleted.
    #[must_use]
    pub fn program(&self, id: ProgramId) -> Option<&ProgramInfo> {
        self.programs.get(&id.0)
    }

    /// Compiles `source` as a `stage` shader and attaches it to the program.
    ///
    /// # Errors
    /// Returns [`Error::Shader`] with the driver's info log if compilation fails; the failed
    /// shader is deleted and nothing is attached.
    pub fn attach_shader_source<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: ProgramId,
        stage: ShaderStage,
        source: &str,
    ) -> Result<(), Error> {
        self.version()
            .require(stage.min_version(), &format!("{} shaders", stage.name()))?;
        let program = self
            .programs
            .get_mut(&id.0)
            .ok_or(Error::unknown_object("shader program", id.0))?;

        let shader = gl
            .create_shader(stage.to_gl())
            .map_err(|e| Error::shader_creation_failed(&e))?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            tracing::error!(stage = stage.name(), %log, "shader compilation failed");
            return Err(Error::shader_compile_failed(stage.name(), &log));
        }

        gl.attach_shader(program.handle, shader);
        program.shaders.push(shader);
        Ok(())
    }

    /// Links the program. On success the attached shaders are released and the uniform
    /// location cache is reset.
    ///
    /// # Errors
    /// Returns [`Error::Shader`] with the driver's info log if linking fails. Attached shaders
    /// stay attached so more stages can be added before relinking.
    pub fn link_program<G: GraphicsContext>(&mut self, gl: &G, id: ProgramId) -> Result<(), Error> {
        let program = self
            .programs
            .get_mut(&id.0)
            .ok_or(Error::unknown_object("shader program", id.0))?;

        gl.link_program(program.handle);
        program.uniforms.clear();

        if !gl.get_program_link_status(program.handle) {
            program.linked = false;
            return Err(Error::shader_link_failed(gl.get_program_info_log(program.handle)));
        }

        // shaders are no longer needed after linking
        for shader in program.shaders.drain(..) {
            gl.detach_shader(program.handle, shader);
            gl.delete_shader(shader);
        }
        program.linked = true;

        tracing::debug!(handle = %program.handle, "linked shader program");
        Ok(())
    }

    /// Makes the program current, skipping the driver call if it already is.
    ///
    /// # Errors
    /// Returns [`Error::Shader`] if the program hasn't been linked.
    pub fn bind_program<G: GraphicsContext>(&mut self, gl: &G, id: ProgramId) -> Result<(), Error> {
        let program = self
            .programs
            .get(&id.0)
            .ok_or(Error::unknown_object("shader program", id.0))?;
        if !program.linked {
            return Err(Error::program_not_linked(id.0));
        }

        self.use_program_handle(gl, id.0);
        Ok(())
    }

    /// Makes no program current.
    pub fn unbind_program<G: GraphicsContext>(&mut self, gl: &G) {
        self.use_program_handle(gl, ObjectHandle::NONE);
    }

    fn use_program_handle<G: GraphicsContext>(&mut self, gl: &G, handle: ObjectHandle) {
        if self.cache.current_shader_program() == handle {
            return;
        }

        gl.use_program(handle);
        self.cache.set_program(handle);
    }

    /// Sets a uniform on the program, making it current first.
    ///
    /// Locations are looked up once per name and cached until the program is relinked.
    ///
    /// # Errors
    /// Returns [`Error::Resource`] if the program has no active uniform called `name`.
    pub fn set_uniform<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: ProgramId,
        name: &str,
        value: &UniformValue,
    ) -> Result<(), Error> {
        self.bind_program(gl, id)?;

        let program = self
            .programs
            .get_mut(&id.0)
            .ok_or(Error::unknown_object("shader program", id.0))?;

        let location = match program.uniforms.get(name) {
            Some(&location) => location,
            None => {
                let location = gl
                    .get_uniform_location(program.handle, name)
                    .ok_or_else(|| Error::uniform_location_failed(name))?;
                program.uniforms.insert(CompactString::from(name), location);
                location
            },
        };

        gl.uniform(location, value);
        Ok(())
    }

    /// Deletes the program. If it is current, the driver is first told to use no program.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] if the program was already deleted.
    pub fn delete_program<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: ProgramId,
    ) -> Result<(), Error> {
        if !self.programs.contains_key(&id.0) {
            return Err(Error::unknown_object("shader program", id.0));
        }
        self.release_program(gl, id.0);
        Ok(())
    }

    pub(crate) fn release_program<G: GraphicsContext>(&mut self, gl: &G, handle: ObjectHandle) {
        if self.cache.on_delete(ObjectCategory::ShaderProgram, handle) {
            gl.use_program(ObjectHandle::NONE);
        }

        if let Some(program) = self.programs.get_mut(&handle) {
            for shader in program.shaders.drain(..) {
                gl.delete_shader(shader);
            }
        }

        gl.delete_program(handle);
        self.programs.remove(&handle);
        tracing::debug!(%handle, "deleted shader program");
    }
}
