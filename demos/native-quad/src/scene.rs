use bindery_core::{
    Bindery, BufferId, BufferTarget, GlVersion, ImageData, ProgramId, ShaderStage, TextureId,
    TextureStorage, TextureTarget, UniformValue, VertexArrayId, VertexAttribute, gl::as_bytes,
};
use color_eyre::Report;
use glow::HasContext;

const VERTEX_SHADER: &str = r#"#version 330 core
layout(location = 0) in vec2 a_position;
layout(location = 1) in vec2 a_uv;

uniform float u_angle;

out vec2 v_uv;

void main() {
    float c = cos(u_angle);
    float s = sin(u_angle);
    gl_Position = vec4(mat2(c, s, -s, c) * a_position, 0.0, 1.0);
    v_uv = a_uv;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 v_uv;

uniform sampler2D u_texture;
uniform vec4 u_tint;

out vec4 frag_color;

void main() {
    frag_color = texture(u_texture, v_uv) * u_tint;
}
"#;

/// x, y, u, v
#[rustfmt::skip]
const QUAD_VERTICES: [f32; 16] = [
    -0.5, -0.5, 0.0, 0.0,
     0.5, -0.5, 1.0, 0.0,
     0.5,  0.5, 1.0, 1.0,
    -0.5,  0.5, 0.0, 1.0,
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

const CHECKER_SIZE: i32 = 8;
const LIGHT: [u8; 4] = [0xf8, 0xf8, 0xf2, 0xff];
const DARK: [u8; 4] = [0x62, 0x72, 0xa4, 0xff];

/// A spinning, checkered quad. All objects are owned by the [`Bindery`] and released by
/// [`Bindery::terminate`].
pub struct Scene {
    vertex_array: VertexArrayId,
    texture: TextureId,
    program: ProgramId,
    // kept for the upload on every resize
    vertices: BufferId,
    angle: f32,
}

impl Scene {
    pub fn new(bindery: &mut Bindery, gl: &glow::Context) -> Result<Self, Report> {
        let program = bindery.create_program(gl)?;
        bindery.attach_shader_source(gl, program, ShaderStage::Vertex, VERTEX_SHADER)?;
        bindery.attach_shader_source(gl, program, ShaderStage::Fragment, FRAGMENT_SHADER)?;
        bindery.link_program(gl, program)?;

        let vertices = bindery.create_buffer(gl)?;
        let bytes = unsafe { as_bytes(&QUAD_VERTICES) };
        bindery.set_buffer_data(gl, vertices, bytes, glow::STATIC_DRAW)?;

        let indices = bindery.create_buffer(gl)?;
        bindery.bind_buffer(gl, indices, BufferTarget::ElementArray)?;
        let bytes = unsafe { as_bytes(&QUAD_INDICES) };
        bindery.set_buffer_data(gl, indices, bytes, glow::STATIC_DRAW)?;

        let stride = 4 * size_of::<f32>() as i32;
        let vertex_array = bindery.create_vertex_array(gl)?;
        bindery.specify_vertex_data(
            gl,
            vertex_array,
            vertices,
            &VertexAttribute::float(0, 2).with_layout(stride, 0),
        )?;
        bindery.specify_vertex_data(
            gl,
            vertex_array,
            vertices,
            &VertexAttribute::float(1, 2).with_layout(stride, 2 * size_of::<f32>() as i32),
        )?;
        bindery.set_element_buffer(gl, vertex_array, indices)?;

        let texture = create_checker_texture(bindery, gl)?;

        bindery.set_uniform(gl, program, "u_texture", &UniformValue::I32(0))?;
        let tint = UniformValue::Vec4([1.0, 0.85, 0.6, 1.0]);
        bindery.set_uniform(gl, program, "u_tint", &tint)?;

        tracing::info!(live_objects = bindery.live_objects(), "scene ready");
        Ok(Self { vertex_array, texture, program, vertices, angle: 0.0 })
    }

    /// Squashes the quad so it stays square in a `width` x `height` viewport.
    pub fn fit_aspect(
        &self,
        bindery: &mut Bindery,
        gl: &glow::Context,
        (width, height): (i32, i32),
    ) -> Result<(), Report> {
        let aspect = height.max(1) as f32 / width.max(1) as f32;
        let mut vertices = QUAD_VERTICES;
        for vertex in vertices.chunks_exact_mut(4) {
            vertex[0] *= aspect.min(1.0);
            vertex[1] *= (1.0 / aspect).min(1.0);
        }

        // same size as before, so the store is updated in place
        let bytes = unsafe { as_bytes(&vertices) };
        bindery.set_buffer_data(gl, self.vertices, bytes, glow::STATIC_DRAW)?;
        Ok(())
    }

    pub fn draw(&mut self, bindery: &mut Bindery, gl: &glow::Context) -> Result<(), Report> {
        self.angle = (self.angle + 0.01) % std::f32::consts::TAU;

        bindery.bind_program(gl, self.program)?;
        bindery.bind_vertex_array(gl, self.vertex_array)?;
        bindery.bind_texture(gl, self.texture, 0)?;
        bindery.set_uniform(gl, self.program, "u_angle", &UniformValue::F32(self.angle))?;

        unsafe {
            gl.clear_color(0.16, 0.16, 0.21, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
            gl.draw_elements(glow::TRIANGLES, QUAD_INDICES.len() as i32, glow::UNSIGNED_SHORT, 0);
        }
        Ok(())
    }
}

/// Uses immutable storage where the context has it, otherwise a mutable texture.
fn create_checker_texture(bindery: &mut Bindery, gl: &glow::Context) -> Result<TextureId, Report> {
    let texture = if bindery.version() >= GlVersion::V4_2 {
        bindery.create_texture_immutable(
            gl,
            TextureTarget::Texture2D,
            glow::RGBA8,
            TextureStorage::new_2d(CHECKER_SIZE, CHECKER_SIZE).with_levels(4),
        )?
    } else {
        bindery.create_texture(gl, TextureTarget::Texture2D, glow::RGBA8)?
    };

    let pixels = checker_pixels(CHECKER_SIZE as usize);
    bindery.upload_texture_image(gl, texture, &ImageData {
        width: CHECKER_SIZE,
        height: CHECKER_SIZE,
        channels: 4,
        format: glow::RGBA,
        data_type: glow::UNSIGNED_BYTE,
        pixels: &pixels,
    })?;

    for parameter in [glow::TEXTURE_MIN_FILTER, glow::TEXTURE_MAG_FILTER] {
        bindery.set_texture_parameter_i32(gl, texture, parameter, glow::NEAREST as i32)?;
    }
    bindery.set_texture_parameter_f32(gl, texture, glow::TEXTURE_LOD_BIAS, 0.0)?;

    let filter = bindery.texture_parameter_i32(gl, texture, glow::TEXTURE_MIN_FILTER)?;
    let lod_bias = bindery.texture_parameter_f32(gl, texture, glow::TEXTURE_LOD_BIAS)?;
    tracing::debug!(filter, lod_bias, "checker texture ready");
    Ok(texture)
}

fn checker_pixels(size: usize) -> Vec<u8> {
    (0..size * size)
        .flat_map(|i| {
            let (x, y) = (i % size, i / size);
            if (x + y).is_multiple_of(2) { LIGHT } else { DARK }
        })
        .collect()
}
