//! A [`GraphicsContext`] that records calls instead of talking to a driver.

use std::{
    cell::Cell,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::gl::{GraphicsContext, ObjectHandle, UniformLocation, UniformValue};

/// One recorded driver call. Payloads are summarized to what tests assert on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateBuffer,
    CreateNamedBuffer,
    BindBuffer(u32, ObjectHandle),
    DeleteBuffer(ObjectHandle),
    BufferData { target: u32, len: usize },
    BufferSubData { target: u32, len: usize },
    NamedBufferData { buffer: ObjectHandle, len: usize },
    NamedBufferSubData { buffer: ObjectHandle, len: usize },

    CreateTexture,
    CreateNamedTexture(u32),
    ActiveTexture(u32),
    BindTexture(u32, ObjectHandle),
    DeleteTexture(ObjectHandle),
    TexStorage { target: u32, levels: i32, width: i32, height: i32, depth: i32 },
    TexStorageMultisample { target: u32, samples: i32 },
    TextureStorage { texture: ObjectHandle, levels: i32, width: i32, height: i32, depth: i32 },
    TexImage { target: u32, width: i32, height: i32 },
    TexSubImage { target: u32, width: i32, height: i32 },
    TexParameterI32 { target: u32, parameter: u32, value: i32 },
    TexParameterF32 { target: u32, parameter: u32 },
    TextureParameterI32 { texture: ObjectHandle, parameter: u32, value: i32 },
    GetTexParameter { target: u32, parameter: u32 },
    GenerateMipmap(u32),
    GenerateTextureMipmap(ObjectHandle),

    CreateVertexArray,
    BindVertexArray(ObjectHandle),
    DeleteVertexArray(ObjectHandle),
    EnableVertexAttribArray(u32),
    VertexAttribPointer { index: u32, size: i32, stride: i32, offset: i32 },

    CreateProgram,
    UseProgram(ObjectHandle),
    DeleteProgram(ObjectHandle),
    CreateShader(u32),
    ShaderSource(ObjectHandle),
    CompileShader(ObjectHandle),
    AttachShader(ObjectHandle, ObjectHandle),
    DetachShader(ObjectHandle, ObjectHandle),
    DeleteShader(ObjectHandle),
    LinkProgram(ObjectHandle),
    GetUniformLocation(String),
    Uniform(UniformLocation, UniformValue),

    /// Not a driver call: the binding cache dropped `handle` from a slot.
    BindingCleared(ObjectHandle),
}

/// Hands out increasing object names and remembers every call.
#[derive(Debug, Default)]
pub(crate) struct RecordingContext {
    calls: Arc<Mutex<Vec<Call>>>,
    last_name: Cell<u32>,
    fail_creation: Cell<bool>,
    fail_compile: Cell<bool>,
    fail_link: Cell<bool>,
    tex_parameter: Cell<i32>,
}

impl RecordingContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub(crate) fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Runs `f` with binding cache clears logged as [`Call::BindingCleared`], in order with
    /// the driver calls.
    pub(crate) fn with_binding_events<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber =
            tracing_subscriber::registry().with(BindingEvents(Arc::clone(&self.calls)));
        tracing::subscriber::with_default(subscriber, f)
    }

    /// Makes every subsequent create call fail.
    pub(crate) fn fail_creation(&self) {
        self.fail_creation.set(true);
    }

    pub(crate) fn fail_compile(&self) {
        self.fail_compile.set(true);
    }

    pub(crate) fn fail_link(&self) {
        self.fail_link.set(true);
    }

    /// Value reported by `get_tex_parameter_i32`, and converted by `get_tex_parameter_f32`.
    pub(crate) fn set_tex_parameter(&self, value: i32) {
        self.tex_parameter.set(value);
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    fn create(&self, call: Call) -> Result<ObjectHandle, String> {
        self.record(call);
        if self.fail_creation.get() {
            return Err("out of memory".to_string());
        }
        self.last_name.set(self.last_name.get() + 1);
        Ok(ObjectHandle::new(self.last_name.get()))
    }
}

impl GraphicsContext for RecordingContext {
    fn create_buffer(&self) -> Result<ObjectHandle, String> {
        self.create(Call::CreateBuffer)
    }

    fn create_named_buffer(&self) -> Result<ObjectHandle, String> {
        self.create(Call::CreateNamedBuffer)
    }

    fn bind_buffer(&self, target: u32, buffer: ObjectHandle) {
        self.record(Call::BindBuffer(target, buffer));
    }

    fn delete_buffer(&self, buffer: ObjectHandle) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn buffer_data(&self, target: u32, data: &[u8], _usage: u32) {
        self.record(Call::BufferData { target, len: data.len() });
    }

    fn buffer_sub_data(&self, target: u32, _offset: i32, data: &[u8]) {
        self.record(Call::BufferSubData { target, len: data.len() });
    }

    fn named_buffer_data(&self, buffer: ObjectHandle, data: &[u8], _usage: u32) {
        self.record(Call::NamedBufferData { buffer, len: data.len() });
    }

    fn named_buffer_sub_data(&self, buffer: ObjectHandle, _offset: i32, data: &[u8]) {
        self.record(Call::NamedBufferSubData { buffer, len: data.len() });
    }

    fn create_texture(&self) -> Result<ObjectHandle, String> {
        self.create(Call::CreateTexture)
    }

    fn create_named_texture(&self, target: u32) -> Result<ObjectHandle, String> {
        self.create(Call::CreateNamedTexture(target))
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: u32, texture: ObjectHandle) {
        self.record(Call::BindTexture(target, texture));
    }

    fn delete_texture(&self, texture: ObjectHandle) {
        self.record(Call::DeleteTexture(texture));
    }

    fn tex_storage_1d(&self, target: u32, levels: i32, _internal_format: u32, width: i32) {
        self.record(Call::TexStorage { target, levels, width, height: 1, depth: 1 });
    }

    fn tex_storage_2d(
        &self,
        target: u32,
        levels: i32,
        _internal_format: u32,
        width: i32,
        height: i32,
    ) {
        self.record(Call::TexStorage { target, levels, width, height, depth: 1 });
    }

    fn tex_storage_3d(
        &self,
        target: u32,
        levels: i32,
        _internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
    ) {
        self.record(Call::TexStorage { target, levels, width, height, depth });
    }

    fn tex_storage_2d_multisample(
        &self,
        target: u32,
        samples: i32,
        _internal_format: u32,
        _width: i32,
        _height: i32,
        _fixed_sample_locations: bool,
    ) {
        self.record(Call::TexStorageMultisample { target, samples });
    }

    fn texture_storage_2d(
        &self,
        texture: ObjectHandle,
        levels: i32,
        _internal_format: u32,
        width: i32,
        height: i32,
    ) {
        self.record(Call::TextureStorage { texture, levels, width, height, depth: 1 });
    }

    fn texture_storage_3d(
        &self,
        texture: ObjectHandle,
        levels: i32,
        _internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
    ) {
        self.record(Call::TextureStorage { texture, levels, width, height, depth });
    }

    fn tex_image_1d(
        &self,
        target: u32,
        _internal_format: i32,
        width: i32,
        _format: u32,
        _ty: u32,
        _pixels: &[u8],
    ) {
        self.record(Call::TexImage { target, width, height: 1 });
    }

    fn tex_image_2d(
        &self,
        target: u32,
        _internal_format: i32,
        width: i32,
        height: i32,
        _format: u32,
        _ty: u32,
        _pixels: &[u8],
    ) {
        self.record(Call::TexImage { target, width, height });
    }

    fn tex_sub_image_2d(
        &self,
        target: u32,
        width: i32,
        height: i32,
        _format: u32,
        _ty: u32,
        _pixels: &[u8],
    ) {
        self.record(Call::TexSubImage { target, width, height });
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        self.record(Call::TexParameterI32 { target, parameter, value });
    }

    fn tex_parameter_f32(&self, target: u32, parameter: u32, _value: f32) {
        self.record(Call::TexParameterF32 { target, parameter });
    }

    fn texture_parameter_i32(&self, texture: ObjectHandle, parameter: u32, value: i32) {
        self.record(Call::TextureParameterI32 { texture, parameter, value });
    }

    fn get_tex_parameter_i32(&self, target: u32, parameter: u32) -> i32 {
        self.record(Call::GetTexParameter { target, parameter });
        self.tex_parameter.get()
    }

    fn get_tex_parameter_f32(&self, target: u32, parameter: u32) -> f32 {
        self.record(Call::GetTexParameter { target, parameter });
        self.tex_parameter.get() as f32
    }

    fn generate_mipmap(&self, target: u32) {
        self.record(Call::GenerateMipmap(target));
    }

    fn generate_texture_mipmap(&self, texture: ObjectHandle) {
        self.record(Call::GenerateTextureMipmap(texture));
    }

    fn create_vertex_array(&self) -> Result<ObjectHandle, String> {
        self.create(Call::CreateVertexArray)
    }

    fn bind_vertex_array(&self, vertex_array: ObjectHandle) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: ObjectHandle) {
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        _data_type: u32,
        _normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(Call::VertexAttribPointer { index, size, stride, offset });
    }

    fn create_program(&self) -> Result<ObjectHandle, String> {
        self.create(Call::CreateProgram)
    }

    fn use_program(&self, program: ObjectHandle) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: ObjectHandle) {
        self.record(Call::DeleteProgram(program));
    }

    fn create_shader(&self, shader_type: u32) -> Result<ObjectHandle, String> {
        self.create(Call::CreateShader(shader_type))
    }

    fn shader_source(&self, shader: ObjectHandle, _source: &str) {
        self.record(Call::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: ObjectHandle) {
        self.record(Call::CompileShader(shader));
    }

    fn get_shader_compile_status(&self, _shader: ObjectHandle) -> bool {
        !self.fail_compile.get()
    }

    fn get_shader_info_log(&self, _shader: ObjectHandle) -> String {
        "0:1(1): error: syntax error".to_string()
    }

    fn attach_shader(&self, program: ObjectHandle, shader: ObjectHandle) {
        self.record(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: ObjectHandle, shader: ObjectHandle) {
        self.record(Call::DetachShader(program, shader));
    }

    fn delete_shader(&self, shader: ObjectHandle) {
        self.record(Call::DeleteShader(shader));
    }

    fn link_program(&self, program: ObjectHandle) {
        self.record(Call::LinkProgram(program));
    }

    fn get_program_link_status(&self, _program: ObjectHandle) -> bool {
        !self.fail_link.get()
    }

    fn get_program_info_log(&self, _program: ObjectHandle) -> String {
        "error: vertex output not read by fragment shader".to_string()
    }

    /// Uniforms named `missing*` don't exist; the rest are numbered by name length.
    fn get_uniform_location(&self, _program: ObjectHandle, name: &str) -> Option<UniformLocation> {
        self.record(Call::GetUniformLocation(name.to_string()));
        (!name.starts_with("missing")).then(|| UniformLocation(name.len() as u32))
    }

    fn uniform(&self, location: UniformLocation, value: &UniformValue) {
        self.record(Call::Uniform(location, value.clone()));
    }
}

fn lock(calls: &Mutex<Vec<Call>>) -> MutexGuard<'_, Vec<Call>> {
    calls.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Picks the `cleared_handle` field off the cache's trace events.
struct BindingEvents(Arc<Mutex<Vec<Call>>>);

impl<S: Subscriber> Layer<S> for BindingEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = ClearedHandle(None);
        event.record(&mut visitor);
        if let Some(handle) = visitor.0 {
            lock(&self.0).push(Call::BindingCleared(handle));
        }
    }
}

struct ClearedHandle(Option<ObjectHandle>);

impl Visit for ClearedHandle {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "cleared_handle" {
            self.0 = u32::try_from(value).ok().map(ObjectHandle::new);
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}
