use std::slice;

use crate::{
    Bindery,
    error::Error,
    gl::{BufferTarget, GraphicsContext, ObjectCategory, ObjectHandle},
};

/// Id of a buffer owned by a [`Bindery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub(crate) ObjectHandle);

impl BufferId {
    /// Driver name of the buffer.
    #[must_use]
    pub fn handle(self) -> ObjectHandle {
        self.0
    }
}

/// Bookkeeping for a live buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferInfo {
    /// Driver name of the buffer.
    pub handle: ObjectHandle,
    /// Target the buffer was last bound to; used when data is uploaded without DSA.
    pub target: BufferTarget,
    /// Whether a data store has been allocated.
    pub data_set: bool,
    /// Size of the data store in bytes.
    pub data_size: usize,
}

impl BufferInfo {
    fn new(handle: ObjectHandle) -> Self {
        Self {
            handle,
            target: BufferTarget::Array,
            data_set: false,
            data_size: 0,
        }
    }
}

/// Views a slice of plain values as raw bytes for upload.
///
/// # Safety
/// Requires that T:
/// - Has a stable memory layout (use #[repr(C)] or #[repr(transparent)])
/// - Contains only copy types
/// - Has no padding bytes
pub unsafe fn as_bytes<T: Copy>(data: &[T]) -> &[u8] {
    unsafe { slice::from_raw_parts(data.as_ptr() as *const u8, size_of_val(data)) }
}

impl Bindery {
    /// Creates a buffer object. Its initial target is [`BufferTarget::Array`].
    ///
    /// # Errors
    /// Returns [`Error::Resource`] if the driver fails to create the buffer.
    pub fn create_buffer<G: GraphicsContext>(&mut self, gl: &G) -> Result<BufferId, Error> {
        let handle = if self.version().supports_dsa() {
            gl.create_named_buffer()
        } else {
            gl.create_buffer()
        }
        .map_err(|e| Error::buffer_creation_failed(&e))?;

        tracing::debug!(%handle, "created buffer");
        self.buffers.insert(handle, BufferInfo::new(handle));
        Ok(BufferId(handle))
    }

    /// Bookkeeping for a live buffer, `None` once deleted.
    #[must_use]
    pub fn buffer(&self, id: BufferId) -> Option<&BufferInfo> {
        self.buffers.get(&id.0)
    }

    /// Binds `id` to `target`, skipping the driver call if it is already bound there.
    ///
    /// # Errors
    /// Returns [`Error::Version`] if the target needs a newer context, and
    /// [`Error::UnknownObject`] for a deleted buffer.
    pub fn bind_buffer<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: BufferId,
        target: BufferTarget,
    ) -> Result<(), Error> {
        self.version()
            .require(target.min_version(), &format!("{target:?} buffer binding"))?;

        let record = self
            .buffers
            .get_mut(&id.0)
            .ok_or(Error::unknown_object("buffer", id.0))?;
        record.target = target;

        self.bind_buffer_handle(gl, target, id.0);
        Ok(())
    }

    /// Unbinds whatever buffer is bound to `target`.
    pub fn unbind_buffer<G: GraphicsContext>(&mut self, gl: &G, target: BufferTarget) {
        self.bind_buffer_handle(gl, target, ObjectHandle::NONE);
    }

    pub(crate) fn bind_buffer_handle<G: GraphicsContext>(
        &mut self,
        gl: &G,
        target: BufferTarget,
        handle: ObjectHandle,
    ) {
        if self.cache.buffer_at(target) == handle {
            return;
        }

        gl.bind_buffer(target.to_gl(), handle);
        self.cache.set_buffer(target, handle);

        if target == BufferTarget::ElementArray {
            self.record_element_buffer(handle);
        }
    }

    /// Uploads `data` into the buffer.
    ///
    /// The data store is reallocated when nothing was uploaded before or the size changed;
    /// otherwise the existing store is overwritten in place. Without DSA the buffer is bound to
    /// its current target for the upload and the previous binding is restored afterwards.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] for a deleted buffer.
    pub fn set_buffer_data<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: BufferId,
        data: &[u8],
        usage: u32,
    ) -> Result<(), Error> {
        let record = self
            .buffers
            .get(&id.0)
            .ok_or(Error::unknown_object("buffer", id.0))?;
        let (handle, target) = (record.handle, record.target);
        let reallocate = !record.data_set || record.data_size != data.len();

        if self.version().supports_dsa() {
            if reallocate {
                gl.named_buffer_data(handle, data, usage);
            } else {
                gl.named_buffer_sub_data(handle, 0, data);
            }
        } else {
            let previous = self.cache.buffer_at(target);
            self.bind_buffer_handle(gl, target, handle);

            if reallocate {
                gl.buffer_data(target.to_gl(), data, usage);
            } else {
                gl.buffer_sub_data(target.to_gl(), 0, data);
            }

            self.bind_buffer_handle(gl, target, previous);
        }

        if let Some(record) = self.buffers.get_mut(&handle) {
            record.data_set = true;
            record.data_size = data.len();
        }
        Ok(())
    }

    /// Deletes the buffer, clearing its cached binding before the driver call.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] if the buffer was already deleted.
    pub fn delete_buffer<G: GraphicsContext>(&mut self, gl: &G, id: BufferId) -> Result<(), Error> {
        if !self.buffers.contains_key(&id.0) {
            return Err(Error::unknown_object("buffer", id.0));
        }
        self.release_buffer(gl, id.0);
        Ok(())
    }

    pub(crate) fn release_buffer<G: GraphicsContext>(&mut self, gl: &G, handle: ObjectHandle) {
        // the driver unbinds it from every target, the cache clears one slot per call
        while self.cache.on_delete(ObjectCategory::Buffer, handle) {}
        self.forget_element_buffer(handle);
        gl.delete_buffer(handle);
        self.buffers.remove(&handle);
        tracing::debug!(%handle, "deleted buffer");
    }
}
