//! Client-side record of which object is bound where.
//!
//! The cache is a pure state container: it never talks to the driver and never decides whether
//! a bind call can be skipped. Wrappers consult it before issuing a bind, write it after issuing
//! one, and clear it before deleting an object. As long as every bind and delete goes through
//! those wrappers, each slot holds exactly what the driver would report for that binding point.
//!
//! Lookups with an unrecognized target enumerator report [`ObjectHandle::NONE`], the same value
//! as "nothing bound".

use crate::gl::{BufferTarget, ObjectCategory, ObjectHandle, TextureTarget};

/// Number of texture image units tracked by the cache.
pub const MAX_TEXTURE_UNITS: u32 = 32;

type TextureSlots = [ObjectHandle; TextureTarget::COUNT];

/// Bound-object state for one graphics context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingCache {
    buffers: [ObjectHandle; BufferTarget::COUNT],
    textures: [TextureSlots; MAX_TEXTURE_UNITS as usize],
    active_texture_unit: u32,
    vertex_array: ObjectHandle,
    program: ObjectHandle,
}

impl Default for BindingCache {
    fn default() -> Self {
        Self {
            buffers: [ObjectHandle::NONE; BufferTarget::COUNT],
            textures: [[ObjectHandle::NONE; TextureTarget::COUNT]; MAX_TEXTURE_UNITS as usize],
            active_texture_unit: 0,
            vertex_array: ObjectHandle::NONE,
            program: ObjectHandle::NONE,
        }
    }
}

impl BindingCache {
    /// Creates a cache with every slot empty, matching a freshly created context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle cached for a raw target enumerator.
    ///
    /// Texture targets are looked up on the active texture unit. The vertex array and shader
    /// program categories have a single slot each and ignore `target`.
    #[must_use]
    pub fn current_at(&self, category: ObjectCategory, target: u32) -> ObjectHandle {
        match category {
            ObjectCategory::Buffer => BufferTarget::from_gl(target)
                .map_or(ObjectHandle::NONE, |t| self.buffer_at(t)),
            ObjectCategory::Texture => TextureTarget::from_gl(target)
                .map_or(ObjectHandle::NONE, |t| self.texture_at(t)),
            ObjectCategory::VertexArray => self.vertex_array,
            ObjectCategory::ShaderProgram => self.program,
        }
    }

    /// Buffer bound to `target`.
    #[must_use]
    pub fn buffer_at(&self, target: BufferTarget) -> ObjectHandle {
        self.buffers[target.index()]
    }

    /// Texture bound to `target` on the active texture unit.
    #[must_use]
    pub fn texture_at(&self, target: TextureTarget) -> ObjectHandle {
        self.texture_at_unit(self.active_texture_unit, target)
    }

    /// Texture bound to `target` on `unit`; units out of range report nothing bound.
    #[must_use]
    pub fn texture_at_unit(&self, unit: u32, target: TextureTarget) -> ObjectHandle {
        self.textures
            .get(unit as usize)
            .map_or(ObjectHandle::NONE, |slots| slots[target.index()])
    }

    /// Vertex array currently bound.
    #[must_use]
    pub fn current_vertex_array(&self) -> ObjectHandle {
        self.vertex_array
    }

    /// Program currently in use.
    #[must_use]
    pub fn current_shader_program(&self) -> ObjectHandle {
        self.program
    }

    /// Zero-based active texture unit.
    #[must_use]
    pub fn active_texture_unit(&self) -> u32 {
        self.active_texture_unit
    }

    /// Finds the slot currently holding `handle`.
    ///
    /// Returns the target enumerator of that slot, or `None` if the handle isn't bound anywhere
    /// in the category. Should a handle be cached under several targets, the first target in
    /// enumeration order wins ([`BufferTarget::ALL`], [`TextureTarget::ALL`]); texture units
    /// are searched in ascending order before targets are compared.
    ///
    /// The single-slot categories report `VERTEX_ARRAY_BINDING` and `CURRENT_PROGRAM`.
    #[must_use]
    pub fn handle_owning_slot(
        &self,
        category: ObjectCategory,
        handle: ObjectHandle,
    ) -> Option<u32> {
        if handle.is_none() {
            return None;
        }

        match category {
            ObjectCategory::Buffer => {
                first_buffer_slot(&self.buffers, handle).map(BufferTarget::to_gl)
            },
            ObjectCategory::Texture => self
                .textures
                .iter()
                .find_map(|slots| first_texture_slot(slots, handle))
                .map(TextureTarget::to_gl),
            ObjectCategory::VertexArray => {
                (self.vertex_array == handle).then_some(glow::VERTEX_ARRAY_BINDING)
            },
            ObjectCategory::ShaderProgram => {
                (self.program == handle).then_some(glow::CURRENT_PROGRAM)
            },
        }
    }

    /// Records `handle` as bound to `target`.
    ///
    /// Unrecognized buffer or texture targets have no slot and leave the cache untouched.
    pub fn bind(&mut self, category: ObjectCategory, target: u32, handle: ObjectHandle) {
        match category {
            ObjectCategory::Buffer => match BufferTarget::from_gl(target) {
                Some(t) => self.set_buffer(t, handle),
                None => tracing::trace!(gl_target = target, "no buffer slot for target"),
            },
            ObjectCategory::Texture => match TextureTarget::from_gl(target) {
                Some(t) => self.set_texture(t, handle),
                None => tracing::trace!(gl_target = target, "no texture slot for target"),
            },
            ObjectCategory::VertexArray => self.set_vertex_array(handle),
            ObjectCategory::ShaderProgram => self.set_program(handle),
        }
    }

    /// Records `handle` as bound to `target`.
    pub fn set_buffer(&mut self, target: BufferTarget, handle: ObjectHandle) {
        self.buffers[target.index()] = handle;
    }

    /// Records `handle` as bound to `target` on the active texture unit.
    pub fn set_texture(&mut self, target: TextureTarget, handle: ObjectHandle) {
        let unit = self.active_texture_unit as usize;
        self.textures[unit][target.index()] = handle;
    }

    /// Records `handle` as the bound vertex array.
    pub fn set_vertex_array(&mut self, handle: ObjectHandle) {
        self.vertex_array = handle;
    }

    /// Records `handle` as the program in use.
    pub fn set_program(&mut self, handle: ObjectHandle) {
        self.program = handle;
    }

    /// Records the active texture unit (zero-based, not `TEXTURE0 + n`).
    ///
    /// Units outside `0..MAX_TEXTURE_UNITS` are ignored.
    pub fn set_active_texture_unit(&mut self, unit: u32) {
        if unit < MAX_TEXTURE_UNITS {
            self.active_texture_unit = unit;
        } else {
            tracing::trace!(unit, "texture unit outside tracked range");
        }
    }

    /// Clears the slot holding `handle`, as the driver does when a bound object is deleted.
    ///
    /// Only the slot picked by [`Self::handle_owning_slot`] is cleared. Textures apply that rule
    /// on every texture unit, since the driver unbinds a deleted texture from all units.
    ///
    /// Returns `true` if a slot was cleared.
    pub fn on_delete(&mut self, category: ObjectCategory, handle: ObjectHandle) -> bool {
        if handle.is_none() {
            return false;
        }

        let cleared = match category {
            ObjectCategory::Buffer => match first_buffer_slot(&self.buffers, handle) {
                Some(target) => {
                    self.buffers[target.index()] = ObjectHandle::NONE;
                    true
                },
                None => false,
            },
            ObjectCategory::Texture => {
                let mut cleared = false;
                for slots in &mut self.textures {
                    if let Some(target) = first_texture_slot(slots, handle) {
                        slots[target.index()] = ObjectHandle::NONE;
                        cleared = true;
                    }
                }
                cleared
            },
            ObjectCategory::VertexArray => clear_if_eq(&mut self.vertex_array, handle),
            ObjectCategory::ShaderProgram => clear_if_eq(&mut self.program, handle),
        };

        if cleared {
            tracing::trace!(?category, cleared_handle = handle.raw(), "binding cleared");
        }
        cleared
    }

    /// Returns every slot to "nothing bound" and the active unit to 0.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn first_buffer_slot(
    slots: &[ObjectHandle; BufferTarget::COUNT],
    handle: ObjectHandle,
) -> Option<BufferTarget> {
    BufferTarget::ALL
        .into_iter()
        .find(|t| slots[t.index()] == handle)
}

fn first_texture_slot(slots: &TextureSlots, handle: ObjectHandle) -> Option<TextureTarget> {
    TextureTarget::ALL
        .into_iter()
        .find(|t| slots[t.index()] == handle)
}

fn clear_if_eq(slot: &mut ObjectHandle, handle: ObjectHandle) -> bool {
    if *slot == handle {
        *slot = ObjectHandle::NONE;
        true
    } else {
        false
    }
}
