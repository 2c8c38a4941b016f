//! GL side of the frame: shader bank compilation, uniform pushes and the full-screen quad.

use anyhow::Context as _;
use glow::HasContext;

use shaderkeys_engine::assets::read_text;
use shaderkeys_engine::config::SketchConfig;
use shaderkeys_engine::frame::{FrameTarget, FULLSCREEN_QUAD};
use shaderkeys_engine::shaders::{ShaderBank, ShaderSlot};

use crate::logi;

/// Attribute slot the vertex shaders read `a_position` from.
pub const POSITION_ATTRIB: u32 = 0;
pub const POSITION_ATTRIB_NAME: &str = "a_position";

/// Compile and link one vertex + fragment pair. Returns the info log on failure.
///
/// # Safety
/// `gl` must be current on this thread.
pub unsafe fn try_compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> anyhow::Result<glow::NativeProgram> {
    let vs = gl.create_shader(glow::VERTEX_SHADER).map_err(|e| anyhow::anyhow!("create vertex shader: {e}"))?;
    gl.shader_source(vs, vert_src);
    gl.compile_shader(vs);
    if !gl.get_shader_compile_status(vs) {
        let log = gl.get_shader_info_log(vs);
        gl.delete_shader(vs);
        return Err(anyhow::anyhow!("Vertex shader compile error:\n{log}"));
    }

    let fs = gl.create_shader(glow::FRAGMENT_SHADER).map_err(|e| anyhow::anyhow!("create fragment shader: {e}"))?;
    gl.shader_source(fs, frag_src);
    gl.compile_shader(fs);
    if !gl.get_shader_compile_status(fs) {
        let log = gl.get_shader_info_log(fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        return Err(anyhow::anyhow!("Fragment shader compile error:\n{log}"));
    }

    let program = gl.create_program().map_err(|e| anyhow::anyhow!("create program: {e}"))?;
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.bind_attrib_location(program, POSITION_ATTRIB, POSITION_ATTRIB_NAME);
    gl.link_program(program);

    let linked = gl.get_program_link_status(program);
    let log = if linked { String::new() } else { gl.get_program_info_log(program) };

    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);
    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if !linked {
        gl.delete_program(program);
        return Err(anyhow::anyhow!("Program link error:\n{log}"));
    }

    Ok(program)
}

/// Read the shared vertex shader and all nine fragment shaders, and compile one program per slot.
///
/// Any failure is fatal: the frame loop assumes every slot holds a linked program.
///
/// # Safety
/// `gl` must be current on this thread.
pub unsafe fn load_shader_bank(gl: &glow::Context, cfg: &SketchConfig) -> anyhow::Result<ShaderBank<glow::NativeProgram>> {
    let vert_src = read_text(&cfg.vertex_path)?;

    let mut programs = Vec::with_capacity(cfg.shader_paths.len());
    for (slot, path) in ShaderSlot::ALL.into_iter().zip(cfg.shader_paths.iter()) {
        let frag_src = read_text(path)?;
        let program = try_compile_program(gl, &vert_src, &frag_src)
            .with_context(|| format!("{slot} ({})", path.display()))?;
        logi!("RENDER", "compiled {slot} <- {}", path.display());
        programs.push(program);
    }

    ShaderBank::from_vec(programs)
        .map_err(|p| anyhow::anyhow!("expected 9 shader programs, compiled {}", p.len()))
}

fn quad_bytes() -> Vec<u8> {
    FULLSCREEN_QUAD
        .iter()
        .flat_map(|v| v.iter().flat_map(|c| c.to_ne_bytes()))
        .collect()
}

/// Owns the GL context and the quad geometry, and implements the frame target on top of glow.
pub struct GlRenderer {
    gl: glow::Context,
    vao: glow::NativeVertexArray,
}

impl GlRenderer {
    pub fn new(gl: glow::Context) -> anyhow::Result<Self> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(|e| anyhow::anyhow!("create_vertex_array: {e}"))?;
            let vbo = gl.create_buffer().map_err(|e| anyhow::anyhow!("create_buffer: {e}"))?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, &quad_bytes(), glow::STATIC_DRAW);
            gl.enable_vertex_attrib_array(POSITION_ATTRIB);
            gl.vertex_attrib_pointer_f32(POSITION_ATTRIB, 2, glow::FLOAT, false, 2 * 4, 0);
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self { gl, vao })
        }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn vao(&self) -> glow::NativeVertexArray {
        self.vao
    }

    /// Reset viewport to the current surface and clear it.
    pub fn begin_frame(&mut self, w: u32, h: u32) {
        unsafe {
            self.gl.viewport(0, 0, w as i32, h as i32);
            self.gl.clear_color(0.0, 0.0, 0.0, 1.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    pub fn end_frame(&mut self) {
        unsafe {
            self.gl.bind_vertex_array(None);
            self.gl.use_program(None);
        }
    }
}

impl FrameTarget for GlRenderer {
    type Program = glow::NativeProgram;

    fn bind(&mut self, program: &glow::NativeProgram) {
        unsafe {
            self.gl.use_program(Some(*program));
        }
    }

    fn set_uniform_f32(&mut self, program: &glow::NativeProgram, name: &str, value: f32) {
        unsafe {
            if let Some(loc) = self.gl.get_uniform_location(*program, name) {
                self.gl.uniform_1_f32(Some(&loc), value);
            }
        }
    }

    fn set_uniform_vec2(&mut self, program: &glow::NativeProgram, name: &str, x: f32, y: f32) {
        unsafe {
            if let Some(loc) = self.gl.get_uniform_location(*program, name) {
                self.gl.uniform_2_f32(Some(&loc), x, y);
            }
        }
    }

    fn draw_fullscreen_quad(&mut self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_arrays(glow::TRIANGLES, 0, FULLSCREEN_QUAD.len() as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_bytes_are_tightly_packed_floats() {
        let bytes = quad_bytes();
        assert_eq!(bytes.len(), FULLSCREEN_QUAD.len() * 2 * 4);
        let first = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(first, -1.0);
    }
}
