use crate::{
    Bindery,
    config::GlVersion,
    error::Error,
    gl::{BufferId, BufferTarget, GraphicsContext, ObjectCategory, ObjectHandle},
};

/// Id of a vertex array owned by a [`Bindery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub(crate) ObjectHandle);

impl VertexArrayId {
    /// Driver name of the vertex array.
    #[must_use]
    pub fn handle(self) -> ObjectHandle {
        self.0
    }
}

/// Layout of one vertex attribute sourced from a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute location in the shader.
    pub index: u32,
    /// Components per vertex, 1 to 4.
    pub size: i32,
    /// Component type, e.g. `glow::FLOAT`.
    pub data_type: u32,
    /// Whether fixed-point components are normalized to [0, 1] or [-1, 1].
    pub normalized: bool,
    /// Bytes between consecutive vertices; 0 means tightly packed.
    pub stride: i32,
    /// Byte offset of the first component.
    pub offset: i32,
}

impl VertexAttribute {
    /// Tightly packed, non-normalized `f32` components.
    #[must_use]
    pub const fn float(index: u32, size: i32) -> Self {
        Self {
            index,
            size,
            data_type: glow::FLOAT,
            normalized: false,
            stride: 0,
            offset: 0,
        }
    }

    /// Sets the byte stride and offset.
    #[must_use]
    pub const fn with_layout(self, stride: i32, offset: i32) -> Self {
        Self { stride, offset, ..self }
    }
}

/// Bookkeeping for a live vertex array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexArrayInfo {
    /// Driver name of the vertex array.
    pub handle: ObjectHandle,
    /// Buffer bound to `ELEMENT_ARRAY_BUFFER` while this vertex array was current.
    pub element_buffer: ObjectHandle,
}

impl Bindery {
    /// Creates a vertex array object.
    ///
    /// # Errors
    /// Requires OpenGL 3.0. Returns [`Error::Resource`] if the driver fails to create it.
    pub fn create_vertex_array<G: GraphicsContext>(
        &mut self,
        gl: &G,
    ) -> Result<VertexArrayId, Error> {
        self.version()
            .require(GlVersion::V3_0, "vertex array objects")?;

        let handle = gl
            .create_vertex_array()
            .map_err(|e| Error::vertex_array_creation_failed(&e))?;

        tracing::debug!(%handle, "created vertex array");
        self.vertex_arrays
            .insert(handle, VertexArrayInfo { handle, element_buffer: ObjectHandle::NONE });
        Ok(VertexArrayId(handle))
    }

    /// Bookkeeping for a live vertex array, `None` once deleted.
    #[must_use]
    pub fn vertex_array(&self, id: VertexArrayId) -> Option<&VertexArrayInfo> {
        self.vertex_arrays.get(&id.0)
    }

    /// Makes the vertex array current, skipping the driver call if it already is.
    ///
    /// The cached element array binding follows, since it is part of vertex array state.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] for a deleted vertex array.
    pub fn bind_vertex_array<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: VertexArrayId,
    ) -> Result<(), Error> {
        if !self.vertex_arrays.contains_key(&id.0) {
            return Err(Error::unknown_object("vertex array", id.0));
        }
        self.bind_vertex_array_handle(gl, id.0);
        Ok(())
    }

    /// Binds vertex array 0 and reloads its element array binding.
    pub fn unbind_vertex_array<G: GraphicsContext>(&mut self, gl: &G) {
        self.bind_vertex_array_handle(gl, ObjectHandle::NONE);
    }

    fn bind_vertex_array_handle<G: GraphicsContext>(&mut self, gl: &G, handle: ObjectHandle) {
        if self.cache.current_vertex_array() == handle {
            return;
        }

        gl.bind_vertex_array(handle);
        self.cache.set_vertex_array(handle);
        self.cache
            .set_buffer(BufferTarget::ElementArray, self.element_buffer_of(handle));
    }

    /// Points attribute `attribute.index` of `vertex_array` at `buffer` and enables it.
    ///
    /// Both objects are bound for the call; previous bindings are restored afterwards.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] if either object was deleted.
    pub fn specify_vertex_data<G: GraphicsContext>(
        &mut self,
        gl: &G,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        attribute: &VertexAttribute,
    ) -> Result<(), Error> {
        if !self.vertex_arrays.contains_key(&vertex_array.0) {
            return Err(Error::unknown_object("vertex array", vertex_array.0));
        }
        if !self.buffers.contains_key(&buffer.0) {
            return Err(Error::unknown_object("buffer", buffer.0));
        }

        let previous_vertex_array = self.cache.current_vertex_array();
        let previous_buffer = self.cache.buffer_at(BufferTarget::Array);
        self.bind_vertex_array_handle(gl, vertex_array.0);
        self.bind_buffer_handle(gl, BufferTarget::Array, buffer.0);

        let VertexAttribute { index, size, data_type, normalized, stride, offset } = *attribute;
        gl.vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset);
        gl.enable_vertex_attrib_array(index);

        self.bind_buffer_handle(gl, BufferTarget::Array, previous_buffer);
        self.bind_vertex_array_handle(gl, previous_vertex_array);
        Ok(())
    }

    /// Attaches `buffer` as the index buffer of `vertex_array`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] if either object was deleted.
    pub fn set_element_buffer<G: GraphicsContext>(
        &mut self,
        gl: &G,
        vertex_array: VertexArrayId,
        buffer: BufferId,
    ) -> Result<(), Error> {
        if !self.vertex_arrays.contains_key(&vertex_array.0) {
            return Err(Error::unknown_object("vertex array", vertex_array.0));
        }

        let previous = self.cache.current_vertex_array();
        self.bind_vertex_array_handle(gl, vertex_array.0);
        let bound = self.bind_buffer(gl, buffer, BufferTarget::ElementArray);
        self.bind_vertex_array_handle(gl, previous);
        bound
    }

    /// Deletes the vertex array. If it was current, vertex array 0 becomes current again.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] if the vertex array was already deleted.
    pub fn delete_vertex_array<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: VertexArrayId,
    ) -> Result<(), Error> {
        if !self.vertex_arrays.contains_key(&id.0) {
            return Err(Error::unknown_object("vertex array", id.0));
        }
        self.release_vertex_array(gl, id.0);
        Ok(())
    }

    pub(crate) fn release_vertex_array<G: GraphicsContext>(
        &mut self,
        gl: &G,
        handle: ObjectHandle,
    ) {
        if self.cache.on_delete(ObjectCategory::VertexArray, handle) {
            self.cache
                .set_buffer(BufferTarget::ElementArray, self.default_element_buffer);
        }
        gl.delete_vertex_array(handle);
        self.vertex_arrays.remove(&handle);
        tracing::debug!(%handle, "deleted vertex array");
    }

    /// Remembers an element array binding in the current vertex array.
    pub(crate) fn record_element_buffer(&mut self, buffer: ObjectHandle) {
        let current = self.cache.current_vertex_array();
        if current.is_none() {
            self.default_element_buffer = buffer;
        } else if let Some(info) = self.vertex_arrays.get_mut(&current) {
            info.element_buffer = buffer;
        }
    }

    /// Called when `buffer` is deleted: the driver detaches it from the current vertex array only.
    pub(crate) fn forget_element_buffer(&mut self, buffer: ObjectHandle) {
        let current = self.cache.current_vertex_array();
        if self.element_buffer_of(current) == buffer
            && self.cache.buffer_at(BufferTarget::ElementArray) != buffer
        {
            self.record_element_buffer(ObjectHandle::NONE);
        }
    }

    fn element_buffer_of(&self, vertex_array: ObjectHandle) -> ObjectHandle {
        if vertex_array.is_none() {
            self.default_element_buffer
        } else {
            self.vertex_arrays
                .get(&vertex_array)
                .map_or(ObjectHandle::NONE, |info| info.element_buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BinderyConfig,
        gl::recording::{Call, RecordingContext},
    };

    fn setup() -> (RecordingContext, Bindery) {
        (RecordingContext::new(), Bindery::new(BinderyConfig::default()))
    }

    #[test]
    fn test_requires_3_0() {
        let gl = RecordingContext::new();
        let mut bindery = Bindery::new(BinderyConfig::default().with_version(GlVersion::V2_0));

        assert!(matches!(bindery.create_vertex_array(&gl), Err(Error::Version(_))));
    }

    #[test]
    fn test_bind_is_elided_when_current() {
        let (gl, mut bindery) = setup();
        let vao = bindery.create_vertex_array(&gl).unwrap();
        gl.clear_calls();

        bindery.bind_vertex_array(&gl, vao).unwrap();
        bindery.bind_vertex_array(&gl, vao).unwrap();

        assert_eq!(gl.calls(), vec![Call::BindVertexArray(vao.handle())]);
    }

    #[test]
    fn test_specify_vertex_data_restores_bindings() {
        let (gl, mut bindery) = setup();
        let vao = bindery.create_vertex_array(&gl).unwrap();
        let vbo = bindery.create_buffer(&gl).unwrap();
        gl.clear_calls();

        let attribute = VertexAttribute::float(1, 2).with_layout(16, 8);
        bindery.specify_vertex_data(&gl, vao, vbo, &attribute).unwrap();

        assert_eq!(gl.calls(), vec![
            Call::BindVertexArray(vao.handle()),
            Call::BindBuffer(glow::ARRAY_BUFFER, vbo.handle()),
            Call::VertexAttribPointer { index: 1, size: 2, stride: 16, offset: 8 },
            Call::EnableVertexAttribArray(1),
            Call::BindBuffer(glow::ARRAY_BUFFER, ObjectHandle::NONE),
            Call::BindVertexArray(ObjectHandle::NONE),
        ]);
        assert_eq!(bindery.cache().current_vertex_array(), ObjectHandle::NONE);
    }

    #[test]
    fn test_element_buffer_follows_vertex_array() {
        let (gl, mut bindery) = setup();
        let a = bindery.create_vertex_array(&gl).unwrap();
        let b = bindery.create_vertex_array(&gl).unwrap();
        let ibo = bindery.create_buffer(&gl).unwrap();

        bindery.set_element_buffer(&gl, a, ibo).unwrap();
        assert_eq!(bindery.vertex_array(a).unwrap().element_buffer, ibo.handle());
        assert_eq!(bindery.cache().buffer_at(BufferTarget::ElementArray), ObjectHandle::NONE);

        bindery.bind_vertex_array(&gl, a).unwrap();
        assert_eq!(bindery.cache().buffer_at(BufferTarget::ElementArray), ibo.handle());

        bindery.bind_vertex_array(&gl, b).unwrap();
        assert_eq!(bindery.cache().buffer_at(BufferTarget::ElementArray), ObjectHandle::NONE);

        // rebinding the index buffer on the current vertex array needs no driver call
        bindery.bind_vertex_array(&gl, a).unwrap();
        gl.clear_calls();
        bindery.bind_buffer(&gl, ibo, BufferTarget::ElementArray).unwrap();
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn test_deleting_current_vertex_array_restores_default_state() {
        let (gl, mut bindery) = setup();
        let ibo = bindery.create_buffer(&gl).unwrap();
        let vao = bindery.create_vertex_array(&gl).unwrap();
        bindery.bind_buffer(&gl, ibo, BufferTarget::ElementArray).unwrap();
        bindery.bind_vertex_array(&gl, vao).unwrap();
        gl.clear_calls();

        bindery.delete_vertex_array(&gl, vao).unwrap();

        assert_eq!(gl.calls(), vec![Call::DeleteVertexArray(vao.handle())]);
        assert_eq!(bindery.cache().current_vertex_array(), ObjectHandle::NONE);
        assert_eq!(bindery.cache().buffer_at(BufferTarget::ElementArray), ibo.handle());
    }

    #[test]
    fn test_cache_is_cleared_before_driver_delete() {
        let (gl, mut bindery) = setup();
        let vao = bindery.create_vertex_array(&gl).unwrap();
        bindery.bind_vertex_array(&gl, vao).unwrap();
        gl.clear_calls();

        gl.with_binding_events(|| bindery.delete_vertex_array(&gl, vao))
            .unwrap();

        assert_eq!(gl.calls(), vec![
            Call::BindingCleared(vao.handle()),
            Call::DeleteVertexArray(vao.handle()),
        ]);
    }

    #[test]
    fn test_deleting_bound_index_buffer_detaches_it() {
        let (gl, mut bindery) = setup();
        let vao = bindery.create_vertex_array(&gl).unwrap();
        let ibo = bindery.create_buffer(&gl).unwrap();
        bindery.bind_vertex_array(&gl, vao).unwrap();
        bindery.bind_buffer(&gl, ibo, BufferTarget::ElementArray).unwrap();

        bindery.delete_buffer(&gl, ibo).unwrap();

        assert_eq!(bindery.vertex_array(vao).unwrap().element_buffer, ObjectHandle::NONE);
        assert_eq!(bindery.cache().buffer_at(BufferTarget::ElementArray), ObjectHandle::NONE);
    }

    #[test]
    fn test_unknown_buffer_is_rejected() {
        let (gl, mut bindery) = setup();
        let vao = bindery.create_vertex_array(&gl).unwrap();
        let vbo = bindery.create_buffer(&gl).unwrap();
        bindery.delete_buffer(&gl, vbo).unwrap();
        gl.clear_calls();

        let err = bindery.specify_vertex_data(&gl, vao, vbo, &VertexAttribute::float(0, 3));

        assert!(matches!(err, Err(Error::UnknownObject { kind: "buffer", .. })));
        assert!(gl.calls().is_empty());
    }
}
