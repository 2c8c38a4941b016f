//! Slider overlay
//!
//! The sketch quad covers the whole surface, so the centroid slider is drawn on top of it
//! after the frame: a flat track plus a square knob at the current value. Geometry comes
//! from the engine's `Slider` (logical pixels) and is scaled by the window's scale factor.
//!
//! `Overlay::Hidden` keeps the call sites unconditional when `slider.visible` is false; the
//! slider still exists and keeps its value.

use glow::HasContext;

use shaderkeys_engine::slider::Slider;

use crate::renderer::try_compile_program;

const OVERLAY_VERT: &str = r#"#version 330 core
in vec2 a_position;
uniform vec4 u_rect;      // x, y, w, h in pixels, origin top-left
uniform vec2 u_viewport;  // surface size in pixels
void main() {
    vec2 unit = a_position * 0.5 + 0.5;
    vec2 px = u_rect.xy + unit * u_rect.zw;
    vec2 ndc = px / u_viewport * 2.0 - 1.0;
    gl_Position = vec4(ndc.x, -ndc.y, 0.0, 1.0);
}"#;

const OVERLAY_FRAG: &str = r#"#version 330 core
uniform vec4 u_color;
out vec4 frag_color;
void main() {
    frag_color = u_color;
}"#;

const TRACK_COLOR: [f32; 4] = [0.78, 0.78, 0.78, 1.0];
const FILL_COLOR: [f32; 4] = [0.0, 0.46, 0.9, 1.0];
const KNOB_COLOR: [f32; 4] = [0.97, 0.97, 0.97, 1.0];

/// Track thickness as a share of the slider's hit height.
const TRACK_THICKNESS: f32 = 0.3;

#[derive(Debug)]
pub enum Overlay {
    Slider(SliderOverlay),
    Hidden,
}

impl Overlay {
    pub fn new(gl: &glow::Context, visible: bool) -> anyhow::Result<Self> {
        if !visible {
            return Ok(Overlay::Hidden);
        }
        let program = unsafe { try_compile_program(gl, OVERLAY_VERT, OVERLAY_FRAG)? };
        Ok(Overlay::Slider(SliderOverlay { program }))
    }

    pub fn draw(&self, gl: &glow::Context, vao: glow::NativeVertexArray, slider: &Slider, surface: (u32, u32), scale: f32) {
        match self {
            Overlay::Slider(o) => o.draw(gl, vao, slider, surface, scale),
            Overlay::Hidden => {}
        }
    }
}

/// Pixel rectangles `(x, y, w, h)` for track, filled part and knob.
pub fn slider_rects(slider: &Slider, scale: f32) -> [[f32; 4]; 3] {
    let (x, y, w, h) = slider.rect();
    let (x, y, w, h) = (x * scale, y * scale, w * scale, h * scale);

    let track_h = (h * TRACK_THICKNESS).max(1.0);
    let track_y = y + (h - track_h) * 0.5;
    let knob_x = x + slider.fraction() * w;

    [
        [x, track_y, w, track_h],
        [x, track_y, knob_x - x, track_h],
        [knob_x - h * 0.5, y, h, h],
    ]
}

#[derive(Debug)]
pub struct SliderOverlay {
    program: glow::NativeProgram,
}

impl SliderOverlay {
    fn draw(&self, gl: &glow::Context, vao: glow::NativeVertexArray, slider: &Slider, surface: (u32, u32), scale: f32) {
        let [track, fill, knob] = slider_rects(slider, scale);
        unsafe {
            gl.use_program(Some(self.program));
            gl.bind_vertex_array(Some(vao));

            if let Some(loc) = gl.get_uniform_location(self.program, "u_viewport") {
                gl.uniform_2_f32(Some(&loc), surface.0 as f32, surface.1 as f32);
            }

            for (rect, color) in [(track, TRACK_COLOR), (fill, FILL_COLOR), (knob, KNOB_COLOR)] {
                if let Some(loc) = gl.get_uniform_location(self.program, "u_rect") {
                    gl.uniform_4_f32(Some(&loc), rect[0], rect[1], rect[2], rect[3]);
                }
                if let Some(loc) = gl.get_uniform_location(self.program, "u_color") {
                    gl.uniform_4_f32(Some(&loc), color[0], color[1], color[2], color[3]);
                }
                gl.draw_arrays(glow::TRIANGLES, 0, 6);
            }

            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }
}
