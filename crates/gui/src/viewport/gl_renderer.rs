use glow::HasContext;

use ledcube_core::mesh::{MeshBuffers, FLOATS_PER_VERTEX};
use ledcube_core::{FrameMesh, PrimitiveKind};

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [i32; 4],
    /// Projection * view, from the render core
    pub mvp: glam::Mat4,
}

// ── GPU buffers ──────────────────────────────────────────────

/// One batch of cells, re-uploaded whenever a new frame arrives
struct GpuBatch {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    vertex_count: i32,
    index_count: i32,
}

impl GpuBatch {
    fn new(gl: &glow::Context) -> Self {
        unsafe {
            let vao = gl.create_vertex_array().unwrap();
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().unwrap();
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));

            let stride = (FLOATS_PER_VERTEX * 4) as i32;
            // position: location 0
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            // color: location 1
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

            let ibo = gl.create_buffer().unwrap();
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));

            gl.bind_vertex_array(None);

            Self {
                vao,
                vbo,
                ibo,
                vertex_count: 0,
                index_count: 0,
            }
        }
    }

    fn upload(&mut self, gl: &glow::Context, data: &MeshBuffers) {
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck_cast_slice(&data.vertices),
                glow::DYNAMIC_DRAW,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ibo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck_cast_slice(&data.indices),
                glow::DYNAMIC_DRAW,
            );
            gl.bind_vertex_array(None);
        }
        self.vertex_count = data.vertex_count() as i32;
        self.index_count = data.indices.len() as i32;
    }

    unsafe fn draw(&self, gl: &glow::Context, kind: PrimitiveKind) {
        if self.vertex_count == 0 {
            return;
        }
        gl.bind_vertex_array(Some(self.vao));
        match kind {
            PrimitiveKind::Point => gl.draw_arrays(glow::POINTS, 0, self.vertex_count),
            PrimitiveKind::Cube => {
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ibo));
                gl.draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_INT, 0);
            }
        }
        gl.bind_vertex_array(None);
    }

    unsafe fn destroy(&self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
        gl.delete_buffer(self.ibo);
    }
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    program: glow::Program,
    /// Lit cells
    opaque: GpuBatch,
    /// Unlit cells drawn with alpha
    translucent: GpuBatch,
    kind: PrimitiveKind,
    point_size: f32,
    /// Version of the last uploaded frame
    last_version: u64,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Self {
        Self {
            program: compile_program(gl, CELL_VERT, CELL_FRAG),
            opaque: GpuBatch::new(gl),
            translucent: GpuBatch::new(gl),
            kind: PrimitiveKind::Point,
            point_size: 1.0,
            last_version: 0,
        }
    }

    /// Upload a new frame if `version` has not been seen yet
    pub fn sync_mesh(&mut self, gl: &glow::Context, mesh: &FrameMesh, version: u64) {
        if version == self.last_version {
            return;
        }
        self.last_version = version;

        self.opaque.upload(gl, &mesh.opaque);
        self.translucent.upload(gl, &mesh.translucent);
        self.kind = mesh.kind;
        self.point_size = mesh.point_size;
    }

    /// Render the cube
    pub fn paint(&self, gl: &glow::Context, params: &RenderParams) {
        let [x, y, w, h] = params.viewport;

        unsafe {
            gl.viewport(x, y, w, h);
            gl.scissor(x, y, w, h);
            gl.enable(glow::SCISSOR_TEST);

            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.enable(glow::PROGRAM_POINT_SIZE);

            gl.use_program(Some(self.program));
            set_uniform_mat4(gl, self.program, "u_mvp", &params.mvp);
            set_uniform_f32(gl, self.program, "u_point_size", self.point_size);

            // Lit cells write depth; translucent ones are blended over them
            self.opaque.draw(gl, self.kind);
            gl.depth_mask(false);
            self.translucent.draw(gl, self.kind);
            gl.depth_mask(true);

            gl.disable(glow::PROGRAM_POINT_SIZE);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
            self.opaque.destroy(gl);
            self.translucent.destroy(gl);
        }
    }
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> glow::Program {
    unsafe {
        let program = gl.create_program().unwrap();

        let vert = gl.create_shader(glow::VERTEX_SHADER).unwrap();
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            tracing::error!("Vertex shader error: {log}");
        }

        let frag = gl.create_shader(glow::FRAGMENT_SHADER).unwrap();
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            tracing::error!("Fragment shader error: {log}");
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            tracing::error!("Program link error: {log}");
        }

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        program
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const CELL_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;
uniform float u_point_size;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    gl_PointSize = u_point_size;
    v_color = a_color;
}
"#;

const CELL_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;
