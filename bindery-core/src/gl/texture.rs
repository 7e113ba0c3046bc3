use crate::{
    Bindery,
    config::GlVersion,
    error::Error,
    gl::{
        GraphicsContext, MAX_TEXTURE_UNITS, ObjectCategory, ObjectHandle, TextureDimensions,
        TextureTarget,
    },
};

/// Id of a texture owned by a [`Bindery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) ObjectHandle);

impl TextureId {
    /// Driver name of the texture.
    #[must_use]
    pub fn handle(self) -> ObjectHandle {
        self.0
    }
}

/// Extent of an immutable texture allocation.
///
/// Unused dimensions are ignored: `height` for 1D targets, `depth` for 1D and 2D targets,
/// `levels` for multisample targets and `samples` for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureStorage {
    /// Width in texels.
    pub width: i32,
    /// Height in texels.
    pub height: i32,
    /// Depth or layer count.
    pub depth: i32,
    /// Mipmap levels to allocate.
    pub levels: i32,
    /// Samples per texel.
    pub samples: i32,
    /// Whether every texel uses the same sample locations.
    pub fixed_sample_locations: bool,
}

impl TextureStorage {
    /// A single-level 2D allocation.
    #[must_use]
    pub const fn new_2d(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            depth: 1,
            levels: 1,
            samples: 0,
            fixed_sample_locations: true,
        }
    }

    /// Allocates `levels` mipmap levels.
    #[must_use]
    pub const fn with_levels(self, levels: i32) -> Self {
        Self { levels, ..self }
    }

    /// Sets the depth, or the layer count for array targets.
    #[must_use]
    pub const fn with_depth(self, depth: i32) -> Self {
        Self { depth, ..self }
    }

    /// Sets the sample count for multisample targets.
    #[must_use]
    pub const fn with_samples(self, samples: i32) -> Self {
        Self { samples, ..self }
    }
}

/// Pixel data for [`Bindery::upload_texture_image`].
#[derive(Debug, Clone, Copy)]
pub struct ImageData<'a> {
    /// Width in pixels.
    pub width: i32,
    /// Ignored for 1D targets.
    pub height: i32,
    /// Components per pixel; only used to validate `pixels` when `data_type` is `UNSIGNED_BYTE`.
    pub channels: u8,
    /// Client pixel format, e.g. `glow::RGBA`.
    pub format: u32,
    /// Client component type, e.g. `glow::UNSIGNED_BYTE`.
    pub data_type: u32,
    /// Pixel bytes, tightly packed rows.
    pub pixels: &'a [u8],
}

/// Bookkeeping for a live texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    /// Driver name of the texture.
    pub handle: ObjectHandle,
    /// Target fixed at creation.
    pub target: TextureTarget,
    /// Sized internal format, e.g. `glow::RGBA8`.
    pub internal_format: u32,
    /// Width of level 0, or 0 before the first upload.
    pub width: i32,
    /// Height of level 0.
    pub height: i32,
    /// Depth of level 0.
    pub depth: i32,
    /// Components per pixel of the last upload.
    pub channels: u8,
    /// Levels allocated by immutable storage, 0 for mutable textures.
    pub levels: i32,
    /// Storage was allocated with `TexStorage*` and cannot be respecified.
    pub immutable: bool,
}

impl Bindery {
    /// Creates a texture for `target` with mutable storage, allocated by the first upload.
    ///
    /// # Errors
    /// Returns [`Error::Version`] if the target needs a newer context, or [`Error::Resource`] if
    /// the driver fails to create the texture.
    pub fn create_texture<G: GraphicsContext>(
        &mut self,
        gl: &G,
        target: TextureTarget,
        internal_format: u32,
    ) -> Result<TextureId, Error> {
        self.version()
            .require(target.min_version(), &format!("{target:?} textures"))?;

        let handle = if self.version().supports_dsa() {
            gl.create_named_texture(target.to_gl())
        } else {
            gl.create_texture()
        }
        .map_err(|e| Error::texture_creation_failed(&e))?;

        tracing::debug!(%handle, ?target, "created texture");
        self.textures.insert(handle, TextureInfo {
            handle,
            target,
            internal_format,
            width: 0,
            height: 0,
            depth: 0,
            channels: 0,
            levels: 0,
            immutable: false,
        });
        Ok(TextureId(handle))
    }

    /// Creates a texture and allocates immutable storage for it.
    ///
    /// # Errors
    /// Requires OpenGL 4.2. Buffer and 2D multisample array targets have no immutable storage
    /// path and are rejected before anything is created.
    pub fn create_texture_immutable<G: GraphicsContext>(
        &mut self,
        gl: &G,
        target: TextureTarget,
        internal_format: u32,
        storage: TextureStorage,
    ) -> Result<TextureId, Error> {
        self.version()
            .require(GlVersion::V4_2, "immutable texture storage")?;

        let dimensions = target.dimensions();
        if matches!(dimensions, TextureDimensions::Buffer | TextureDimensions::ThreeMultisample) {
            return Err(Error::unsupported_texture_operation(
                "Immutable storage",
                target.to_gl(),
            ));
        }

        let id = self.create_texture(gl, target, internal_format)?;
        let handle = id.0;
        let TextureStorage { width, height, depth, levels, samples, fixed_sample_locations } =
            storage;
        let gl_target = target.to_gl();

        // no DSA entry point for 1D or multisample storage, those bind and restore
        let dsa_storage = !matches!(
            dimensions,
            TextureDimensions::One | TextureDimensions::TwoMultisample
        );
        if self.version().supports_dsa() && dsa_storage {
            match dimensions {
                TextureDimensions::Two => {
                    gl.texture_storage_2d(handle, levels, internal_format, width, height);
                },
                _ => gl.texture_storage_3d(handle, levels, internal_format, width, height, depth),
            }
        } else {
            let previous = self.bind_texture_for_edit(gl, target, handle);
            match dimensions {
                TextureDimensions::One => {
                    gl.tex_storage_1d(gl_target, levels, internal_format, width);
                },
                TextureDimensions::Two => {
                    gl.tex_storage_2d(gl_target, levels, internal_format, width, height);
                },
                TextureDimensions::TwoMultisample => gl.tex_storage_2d_multisample(
                    gl_target,
                    samples,
                    internal_format,
                    width,
                    height,
                    fixed_sample_locations,
                ),
                _ => gl.tex_storage_3d(gl_target, levels, internal_format, width, height, depth),
            }
            self.bind_texture_handle(gl, target, previous);
        }

        if let Some(info) = self.textures.get_mut(&handle) {
            let (height, depth) = match dimensions {
                TextureDimensions::One => (1, 1),
                TextureDimensions::Two | TextureDimensions::TwoMultisample => (height, 1),
                _ => (height, depth),
            };
            info.width = width;
            info.height = height;
            info.depth = depth;
            info.levels = levels;
            info.immutable = true;
        }
        Ok(id)
    }

    /// Bookkeeping for a live texture, `None` once deleted.
    #[must_use]
    pub fn texture(&self, id: TextureId) -> Option<&TextureInfo> {
        self.textures.get(&id.0)
    }

    /// Uploads level 0 of the texture and regenerates its mipmaps.
    ///
    /// Mutable textures are (re)specified with `TexImage*`; immutable ones are overwritten
    /// with `TexSubImage*`. The texture is bound to the active unit for the upload and the
    /// previous binding is restored afterwards.
    ///
    /// # Errors
    /// Only 1D and 2D targets can be uploaded (immutable 1D storage excepted), and rectangle
    /// textures get no mipmaps. Returns [`Error::Resource`] if `pixels` is too short for the
    /// given dimensions.
    pub fn upload_texture_image<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: TextureId,
        image: &ImageData<'_>,
    ) -> Result<(), Error> {
        let info = self
            .textures
            .get(&id.0)
            .ok_or(Error::unknown_object("texture", id.0))?;
        let (handle, target, internal_format, immutable) =
            (info.handle, info.target, info.internal_format, info.immutable);
        let gl_target = target.to_gl();

        let dimensions = target.dimensions();
        let supported = match dimensions {
            TextureDimensions::One => !immutable,
            TextureDimensions::Two => target != TextureTarget::CubeMap,
            _ => false,
        };
        if !supported {
            return Err(Error::unsupported_texture_operation("Image upload", gl_target));
        }

        let height = if dimensions == TextureDimensions::One { 1 } else { image.height };
        if image.data_type == glow::UNSIGNED_BYTE {
            let expected = (image.width.max(0) as usize)
                .checked_mul(height.max(0) as usize)
                .and_then(|n| n.checked_mul(usize::from(image.channels)));
            match expected {
                Some(expected) if image.pixels.len() >= expected => {},
                Some(expected) => {
                    return Err(Error::invalid_image_data(expected, image.pixels.len()));
                },
                None => {
                    return Err(Error::image_size_overflow(image.width, height, image.channels));
                },
            }
        }

        let previous = self.bind_texture_for_edit(gl, target, handle);

        if immutable {
            gl.tex_sub_image_2d(
                gl_target,
                image.width,
                height,
                image.format,
                image.data_type,
                image.pixels,
            );
        } else if dimensions == TextureDimensions::One {
            gl.tex_image_1d(
                gl_target,
                internal_format as i32,
                image.width,
                image.format,
                image.data_type,
                image.pixels,
            );
        } else {
            gl.tex_image_2d(
                gl_target,
                internal_format as i32,
                image.width,
                height,
                image.format,
                image.data_type,
                image.pixels,
            );
        }

        if target != TextureTarget::Rectangle {
            if self.version().supports_dsa() {
                gl.generate_texture_mipmap(handle);
            } else {
                gl.generate_mipmap(gl_target);
            }
        }

        self.bind_texture_handle(gl, target, previous);

        if let Some(info) = self.textures.get_mut(&handle) {
            info.width = image.width;
            info.height = height;
            info.depth = 1;
            info.channels = image.channels;
        }
        Ok(())
    }

    /// Sets an integer texture parameter, e.g. `TEXTURE_MIN_FILTER`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] for a deleted texture.
    pub fn set_texture_parameter_i32<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: TextureId,
        parameter: u32,
        value: i32,
    ) -> Result<(), Error> {
        let target = self.texture_target(id)?;

        if self.version().supports_dsa() {
            gl.texture_parameter_i32(id.0, parameter, value);
        } else {
            let previous = self.bind_texture_for_edit(gl, target, id.0);
            gl.tex_parameter_i32(target.to_gl(), parameter, value);
            self.bind_texture_handle(gl, target, previous);
        }
        Ok(())
    }

    /// Sets a float texture parameter, e.g. `TEXTURE_MAX_ANISOTROPY`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] for a deleted texture.
    pub fn set_texture_parameter_f32<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: TextureId,
        parameter: u32,
        value: f32,
    ) -> Result<(), Error> {
        let target = self.texture_target(id)?;

        let previous = self.bind_texture_for_edit(gl, target, id.0);
        gl.tex_parameter_f32(target.to_gl(), parameter, value);
        self.bind_texture_handle(gl, target, previous);
        Ok(())
    }

    /// Reads an integer texture parameter.
    ///
    /// Queries always go through a temporary binding on the active unit, since `glow` exposes
    /// no `glGetTextureParameter*` entry points.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] for a deleted texture.
    pub fn texture_parameter_i32<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: TextureId,
        parameter: u32,
    ) -> Result<i32, Error> {
        self.query_texture_parameter(gl, id, |target| gl.get_tex_parameter_i32(target, parameter))
    }

    /// Reads a float texture parameter, e.g. `TEXTURE_MIN_LOD`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] for a deleted texture.
    pub fn texture_parameter_f32<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: TextureId,
        parameter: u32,
    ) -> Result<f32, Error> {
        self.query_texture_parameter(gl, id, |target| gl.get_tex_parameter_f32(target, parameter))
    }

    fn query_texture_parameter<G: GraphicsContext, T>(
        &mut self,
        gl: &G,
        id: TextureId,
        query: impl FnOnce(u32) -> T,
    ) -> Result<T, Error> {
        let target = self.texture_target(id)?;

        let previous = self.bind_texture_for_edit(gl, target, id.0);
        let value = query(target.to_gl());
        self.bind_texture_handle(gl, target, previous);
        Ok(value)
    }

    /// Binds the texture to its target on texture unit `unit`, which becomes the active unit.
    ///
    /// Issues no driver calls if `unit` is already active and has the texture bound.
    ///
    /// # Errors
    /// Returns [`Error::Resource`] if `unit` is not below [`MAX_TEXTURE_UNITS`].
    pub fn bind_texture<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: TextureId,
        unit: u32,
    ) -> Result<(), Error> {
        let target = self.texture_target(id)?;
        self.select_texture_unit(gl, unit)?;
        self.bind_texture_handle(gl, target, id.0);
        Ok(())
    }

    /// Unbinds whatever texture is bound to `target` on texture unit `unit`.
    ///
    /// # Errors
    /// Returns [`Error::Resource`] if `unit` is not below [`MAX_TEXTURE_UNITS`].
    pub fn unbind_texture<G: GraphicsContext>(
        &mut self,
        gl: &G,
        target: TextureTarget,
        unit: u32,
    ) -> Result<(), Error> {
        self.select_texture_unit(gl, unit)?;
        self.bind_texture_handle(gl, target, ObjectHandle::NONE);
        Ok(())
    }

    /// Deletes the texture, clearing its cached binding before the driver call.
    ///
    /// # Errors
    /// Returns [`Error::UnknownObject`] if the texture was already deleted.
    pub fn delete_texture<G: GraphicsContext>(
        &mut self,
        gl: &G,
        id: TextureId,
    ) -> Result<(), Error> {
        if !self.textures.contains_key(&id.0) {
            return Err(Error::unknown_object("texture", id.0));
        }
        self.release_texture(gl, id.0);
        Ok(())
    }

    pub(crate) fn release_texture<G: GraphicsContext>(&mut self, gl: &G, handle: ObjectHandle) {
        self.cache.on_delete(ObjectCategory::Texture, handle);
        gl.delete_texture(handle);
        self.textures.remove(&handle);
        tracing::debug!(%handle, "deleted texture");
    }

    fn texture_target(&self, id: TextureId) -> Result<TextureTarget, Error> {
        self.textures
            .get(&id.0)
            .map(|info| info.target)
            .ok_or(Error::unknown_object("texture", id.0))
    }

    fn select_texture_unit<G: GraphicsContext>(&mut self, gl: &G, unit: u32) -> Result<(), Error> {
        if unit >= MAX_TEXTURE_UNITS {
            return Err(Error::texture_unit_out_of_range(unit, MAX_TEXTURE_UNITS - 1));
        }
        if self.cache.active_texture_unit() != unit {
            gl.active_texture(glow::TEXTURE0 + unit);
            self.cache.set_active_texture_unit(unit);
        }
        Ok(())
    }

    /// Binds `handle` on the active unit for an edit; returns what to restore afterwards.
    fn bind_texture_for_edit<G: GraphicsContext>(
        &mut self,
        gl: &G,
        target: TextureTarget,
        handle: ObjectHandle,
    ) -> ObjectHandle {
        let previous = self.cache.texture_at(target);
        self.bind_texture_handle(gl, target, handle);
        previous
    }

    fn bind_texture_handle<G: GraphicsContext>(
        &mut self,
        gl: &G,
        target: TextureTarget,
        handle: ObjectHandle,
    ) {
        if self.cache.texture_at(target) == handle {
            return;
        }

        gl.bind_texture(target.to_gl(), handle);
        self.cache.set_texture(target, handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BinderyConfig,
        gl::recording::{Call, RecordingContext},
    };

    fn bindery(version: GlVersion) -> Bindery {
        Bindery::new(BinderyConfig::default().with_version(version))
    }

    fn rgba(width: i32, height: i32, pixels: &[u8]) -> ImageData<'_> {
        ImageData {
            width,
            height,
            channels: 4,
            format: glow::RGBA,
            data_type: glow::UNSIGNED_BYTE,
            pixels,
        }
    }

    #[test]
    fn test_bind_selects_unit_then_binds() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        let tex = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        gl.clear_calls();

        bindery.bind_texture(&gl, tex, 3).unwrap();
        bindery.bind_texture(&gl, tex, 3).unwrap();

        assert_eq!(gl.calls(), vec![
            Call::ActiveTexture(glow::TEXTURE3),
            Call::BindTexture(glow::TEXTURE_2D, tex.handle()),
        ]);
        assert_eq!(bindery.cache().texture_at_unit(3, TextureTarget::Texture2D), tex.handle());
        assert_eq!(
            bindery.cache().texture_at_unit(0, TextureTarget::Texture2D),
            ObjectHandle::NONE
        );
    }

    #[test]
    fn test_same_texture_on_two_units() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        let tex = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();

        bindery.bind_texture(&gl, tex, 0).unwrap();
        bindery.bind_texture(&gl, tex, 1).unwrap();
        gl.clear_calls();
        bindery.bind_texture(&gl, tex, 0).unwrap();

        // unit 0 still holds it, only the unit switch is needed
        assert_eq!(gl.calls(), vec![Call::ActiveTexture(glow::TEXTURE0)]);
    }

    #[test]
    fn test_unit_out_of_range() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        let tex = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();

        let err = bindery.bind_texture(&gl, tex, MAX_TEXTURE_UNITS);
        assert!(matches!(err, Err(Error::Resource(_))));
    }

    #[test]
    fn test_upload_restores_previous_binding() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        let bound = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        let other = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        bindery.bind_texture(&gl, bound, 0).unwrap();
        gl.clear_calls();

        bindery
            .upload_texture_image(&gl, other, &rgba(2, 2, &[0; 16]))
            .unwrap();

        assert_eq!(gl.calls(), vec![
            Call::BindTexture(glow::TEXTURE_2D, other.handle()),
            Call::TexImage { target: glow::TEXTURE_2D, width: 2, height: 2 },
            Call::GenerateMipmap(glow::TEXTURE_2D),
            Call::BindTexture(glow::TEXTURE_2D, bound.handle()),
        ]);
        let info = bindery.texture(other).unwrap();
        assert_eq!((info.width, info.height, info.channels), (2, 2, 4));
    }

    #[test]
    fn test_upload_rejects_short_pixel_data() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        let tex = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        gl.clear_calls();

        let err = bindery.upload_texture_image(&gl, tex, &rgba(4, 4, &[0; 15]));

        assert!(matches!(err, Err(Error::Resource(_))));
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn test_upload_rejects_unaddressable_dimensions() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        let tex = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        gl.clear_calls();

        let image = ImageData {
            channels: 255,
            ..rgba(i32::MAX, i32::MAX, &[0; 4])
        };
        let err = bindery.upload_texture_image(&gl, tex, &image);

        assert!(matches!(err, Err(Error::Resource(_))));
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn test_upload_unsupported_for_3d() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        let tex = bindery
            .create_texture(&gl, TextureTarget::Texture3D, glow::RGBA8)
            .unwrap();

        let err = bindery.upload_texture_image(&gl, tex, &rgba(1, 1, &[0; 4]));
        assert!(matches!(err, Err(Error::Resource(_))));
    }

    #[test]
    fn test_immutable_requires_4_2() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V4_0);

        let err = bindery.create_texture_immutable(
            &gl,
            TextureTarget::Texture2D,
            glow::RGBA8,
            TextureStorage::new_2d(4, 4),
        );

        assert!(matches!(err, Err(Error::Version(_))));
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn test_immutable_storage_without_dsa() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V4_4);

        let tex = bindery
            .create_texture_immutable(
                &gl,
                TextureTarget::Texture2DArray,
                glow::RGBA8,
                TextureStorage::new_2d(8, 8).with_depth(3).with_levels(2),
            )
            .unwrap();

        assert_eq!(gl.calls(), vec![
            Call::CreateTexture,
            Call::BindTexture(glow::TEXTURE_2D_ARRAY, tex.handle()),
            Call::TexStorage {
                target: glow::TEXTURE_2D_ARRAY,
                levels: 2,
                width: 8,
                height: 8,
                depth: 3,
            },
            Call::BindTexture(glow::TEXTURE_2D_ARRAY, ObjectHandle::NONE),
        ]);
        let info = bindery.texture(tex).unwrap();
        assert!(info.immutable);
        assert_eq!((info.width, info.height, info.depth, info.levels), (8, 8, 3, 2));
    }

    #[test]
    fn test_immutable_storage_with_dsa_leaves_bindings_alone() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V4_6);

        let tex = bindery
            .create_texture_immutable(
                &gl,
                TextureTarget::Texture2D,
                glow::RGBA8,
                TextureStorage::new_2d(16, 16),
            )
            .unwrap();

        assert_eq!(gl.calls(), vec![
            Call::CreateNamedTexture(glow::TEXTURE_2D),
            Call::TextureStorage {
                texture: tex.handle(),
                levels: 1,
                width: 16,
                height: 16,
                depth: 1,
            },
        ]);
    }

    #[test]
    fn test_1d_storage_binds_even_with_dsa() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V4_6);

        let tex = bindery
            .create_texture_immutable(
                &gl,
                TextureTarget::Texture1D,
                glow::RGBA8,
                TextureStorage::new_2d(64, 1).with_levels(3),
            )
            .unwrap();

        assert_eq!(gl.calls(), vec![
            Call::CreateNamedTexture(glow::TEXTURE_1D),
            Call::BindTexture(glow::TEXTURE_1D, tex.handle()),
            Call::TexStorage {
                target: glow::TEXTURE_1D,
                levels: 3,
                width: 64,
                height: 1,
                depth: 1,
            },
            Call::BindTexture(glow::TEXTURE_1D, ObjectHandle::NONE),
        ]);
        let info = bindery.texture(tex).unwrap();
        assert_eq!((info.width, info.height, info.depth, info.levels), (64, 1, 1, 3));
    }

    #[test]
    fn test_multisample_storage_binds_even_with_dsa() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V4_6);

        bindery
            .create_texture_immutable(
                &gl,
                TextureTarget::Texture2DMultisample,
                glow::RGBA8,
                TextureStorage::new_2d(16, 16).with_samples(4),
            )
            .unwrap();

        assert!(gl.calls().contains(&Call::TexStorageMultisample {
            target: glow::TEXTURE_2D_MULTISAMPLE,
            samples: 4,
        }));
    }

    #[test]
    fn test_immutable_rejects_multisample_array() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V4_6);

        let err = bindery.create_texture_immutable(
            &gl,
            TextureTarget::Texture2DMultisampleArray,
            glow::RGBA8,
            TextureStorage::new_2d(16, 16).with_samples(4),
        );

        assert!(matches!(err, Err(Error::Resource(_))));
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn test_immutable_upload_uses_sub_image() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V4_6);
        let tex = bindery
            .create_texture_immutable(
                &gl,
                TextureTarget::Texture2D,
                glow::RGBA8,
                TextureStorage::new_2d(1, 1),
            )
            .unwrap();
        gl.clear_calls();

        bindery
            .upload_texture_image(&gl, tex, &rgba(1, 1, &[255; 4]))
            .unwrap();

        assert_eq!(gl.calls(), vec![
            Call::BindTexture(glow::TEXTURE_2D, tex.handle()),
            Call::TexSubImage { target: glow::TEXTURE_2D, width: 1, height: 1 },
            Call::GenerateTextureMipmap(tex.handle()),
            Call::BindTexture(glow::TEXTURE_2D, ObjectHandle::NONE),
        ]);
    }

    #[test]
    fn test_parameters_use_dsa_when_available() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V4_5);
        let tex = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        gl.clear_calls();

        bindery
            .set_texture_parameter_i32(&gl, tex, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32)
            .unwrap();

        assert_eq!(gl.calls(), vec![Call::TextureParameterI32 {
            texture: tex.handle(),
            parameter: glow::TEXTURE_MIN_FILTER,
            value: glow::NEAREST as i32,
        }]);
    }

    #[test]
    fn test_parameter_query_binds_temporarily() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        let tex = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        gl.set_tex_parameter(glow::LINEAR as i32);
        gl.clear_calls();

        let value = bindery
            .texture_parameter_i32(&gl, tex, glow::TEXTURE_MAG_FILTER)
            .unwrap();

        assert_eq!(value, glow::LINEAR as i32);
        assert_eq!(gl.calls().len(), 3);
        assert_eq!(bindery.cache().texture_at(TextureTarget::Texture2D), ObjectHandle::NONE);
    }

    #[test]
    fn test_float_parameter_query_restores_binding() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V4_6);
        let bound = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        let queried = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        bindery.bind_texture(&gl, bound, 0).unwrap();
        gl.set_tex_parameter(4);
        gl.clear_calls();

        let value = bindery
            .texture_parameter_f32(&gl, queried, glow::TEXTURE_MAX_LOD)
            .unwrap();

        assert_eq!(value, 4.0);
        assert_eq!(gl.calls(), vec![
            Call::BindTexture(glow::TEXTURE_2D, queried.handle()),
            Call::GetTexParameter { target: glow::TEXTURE_2D, parameter: glow::TEXTURE_MAX_LOD },
            Call::BindTexture(glow::TEXTURE_2D, bound.handle()),
        ]);
        assert_eq!(bindery.cache().texture_at(TextureTarget::Texture2D), bound.handle());
    }

    #[test]
    fn test_cache_is_cleared_before_driver_delete() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        let tex = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        bindery.bind_texture(&gl, tex, 2).unwrap();
        gl.clear_calls();

        gl.with_binding_events(|| bindery.delete_texture(&gl, tex))
            .unwrap();

        assert_eq!(gl.calls(), vec![
            Call::BindingCleared(tex.handle()),
            Call::DeleteTexture(tex.handle()),
        ]);
    }

    #[test]
    fn test_delete_clears_binding_on_every_unit() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        let tex = bindery
            .create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8)
            .unwrap();
        bindery.bind_texture(&gl, tex, 0).unwrap();
        bindery.bind_texture(&gl, tex, 5).unwrap();
        gl.clear_calls();

        bindery.delete_texture(&gl, tex).unwrap();

        assert_eq!(gl.calls(), vec![Call::DeleteTexture(tex.handle())]);
        for unit in [0, 5] {
            assert_eq!(
                bindery.cache().texture_at_unit(unit, TextureTarget::Texture2D),
                ObjectHandle::NONE
            );
        }
        assert!(bindery.texture(tex).is_none());
    }

    #[test]
    fn test_creation_failure() {
        let gl = RecordingContext::new();
        let mut bindery = bindery(GlVersion::V3_3);
        gl.fail_creation();

        let err = bindery.create_texture(&gl, TextureTarget::Texture2D, glow::RGBA8);
        assert!(matches!(err, Err(Error::Resource(_))));
    }
}
