use rustc_hash::FxHashMap;

use crate::{
    config::{BinderyConfig, GlVersion},
    gl::{
        BindingCache, BufferInfo, GraphicsContext, ObjectHandle, ProgramInfo, TextureInfo,
        VertexArrayInfo,
    },
};

/// Owns the binding cache and every object created through it.
///
/// All operations take the graphics context explicitly and must run on the thread owning it.
/// Objects must be released with [`Bindery::terminate`] before the context goes away; dropping a
/// `Bindery` leaks them.
#[derive(Debug)]
#[must_use = "call `terminate(gl)` to release GPU objects"]
pub struct Bindery {
    config: BinderyConfig,
    pub(crate) cache: BindingCache,
    pub(crate) buffers: FxHashMap<ObjectHandle, BufferInfo>,
    pub(crate) textures: FxHashMap<ObjectHandle, TextureInfo>,
    pub(crate) vertex_arrays: FxHashMap<ObjectHandle, VertexArrayInfo>,
    pub(crate) programs: FxHashMap<ObjectHandle, ProgramInfo>,
    /// Element array binding of vertex array 0.
    pub(crate) default_element_buffer: ObjectHandle,
}

impl Bindery {
    /// Sets up an empty cache for a freshly made-current context.
    pub fn new(config: BinderyConfig) -> Self {
        tracing::debug!(
            version = %config.version,
            profile = %config.profile,
            dsa = config.version.supports_dsa(),
            "bindery initialized"
        );

        Self {
            config,
            cache: BindingCache::new(),
            buffers: FxHashMap::default(),
            textures: FxHashMap::default(),
            vertex_arrays: FxHashMap::default(),
            programs: FxHashMap::default(),
            default_element_buffer: ObjectHandle::NONE,
        }
    }

    /// Settings this instance was created with.
    #[must_use]
    pub fn config(&self) -> &BinderyConfig {
        &self.config
    }

    /// Configured OpenGL version; gates every wrapper call.
    #[must_use]
    pub fn version(&self) -> GlVersion {
        self.config.version
    }

    /// What the cache believes is bound right now.
    #[must_use]
    pub fn cache(&self) -> &BindingCache {
        &self.cache
    }

    /// Number of live objects across all registries.
    #[must_use]
    pub fn live_objects(&self) -> usize {
        self.buffers.len() + self.textures.len() + self.vertex_arrays.len() + self.programs.len()
    }

    /// Deletes every live object and forgets all bindings.
    ///
    /// Programs go first, then vertex arrays, textures and buffers.
    pub fn terminate<G: GraphicsContext>(&mut self, gl: &G) {
        let released = self.live_objects();

        for handle in self.programs.keys().copied().collect::<Vec<_>>() {
            self.release_program(gl, handle);
        }
        for handle in self.vertex_arrays.keys().copied().collect::<Vec<_>>() {
            self.release_vertex_array(gl, handle);
        }
        for handle in self.textures.keys().copied().collect::<Vec<_>>() {
            self.release_texture(gl, handle);
        }
        for handle in self.buffers.keys().copied().collect::<Vec<_>>() {
            self.release_buffer(gl, handle);
        }

        self.cache.reset();
        self.default_element_buffer = ObjectHandle::NONE;
        tracing::debug!(released, "bindery terminated");
    }
}
