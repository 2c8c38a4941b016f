//! What one frame hands to the GPU, and the seam the renderer implements.

/// Uniform names understood by the sketch shaders.
pub const U_TIME: &str = "u_time";
pub const U_ONSET: &str = "onset";
pub const U_CENTROID: &str = "cent";
pub const U_FLUX: &str = "flux";
pub const U_RESOLUTION: &str = "u_resolution";

/// Two triangles covering normalized device coordinates (-1,-1)..(1,1).
pub const FULLSCREEN_QUAD: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// Scalar inputs sampled for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformState {
    /// Seconds since start.
    pub time: f32,
    pub onset: f32,
    pub centroid: f32,
    pub flux: f32,
}

impl UniformState {
    /// The four scalar uniforms in push order.
    pub fn named(&self) -> [(&'static str, f32); 4] {
        [
            (U_TIME, self.time),
            (U_ONSET, self.onset),
            (U_CENTROID, self.centroid),
            (U_FLUX, self.flux),
        ]
    }
}

/// Drawing backend for the frame callback.
///
/// The GL renderer implements this in the binary; tests implement it with a recorder.
/// Setting a uniform the program does not declare must be a silent no-op.
pub trait FrameTarget {
    type Program;

    /// Make `program` the active program for the following uniform calls and draw.
    fn bind(&mut self, program: &Self::Program);

    fn set_uniform_f32(&mut self, program: &Self::Program, name: &str, value: f32);

    fn set_uniform_vec2(&mut self, program: &Self::Program, name: &str, x: f32, y: f32);

    /// Submit `FULLSCREEN_QUAD` with the bound program.
    fn draw_fullscreen_quad(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_the_whole_viewport() {
        let xs = FULLSCREEN_QUAD.iter().map(|v| v[0]);
        let ys = FULLSCREEN_QUAD.iter().map(|v| v[1]);
        assert_eq!(xs.clone().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(xs.fold(f32::MIN, f32::max), 1.0);
        assert_eq!(ys.clone().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(ys.fold(f32::MIN, f32::max), 1.0);

        // Signed area of both triangles adds up to the 2x2 square.
        let area: f32 = FULLSCREEN_QUAD
            .chunks(3)
            .map(|t| {
                let (a, b, c) = (t[0], t[1], t[2]);
                0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
            })
            .sum();
        assert_eq!(area, 4.0);
    }

    #[test]
    fn named_uniforms_keep_push_order() {
        let u = UniformState { time: 1.5, onset: 0.1, centroid: 100.0, flux: 0.5 };
        let names: Vec<_> = u.named().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["u_time", "onset", "cent", "flux"]);
        assert_eq!(u.named()[2].1, 100.0);
    }
}
