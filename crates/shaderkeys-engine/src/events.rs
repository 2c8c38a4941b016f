use crate::shaders::ShaderSlot;

/// State changes worth telling a human about.
///
/// The controller queues these and the host drains them after each callback. Per-frame
/// values (time, onset, centroid) are deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The active shader changed during an input scan.
    ShaderSelected { from: ShaderSlot, to: ShaderSlot },

    /// The drawing surface was recreated at a new size.
    SurfaceResized { width: u32, height: u32 },

    /// A key press asked the host to go fullscreen.
    FullscreenRequested,

    /// The user let go of the slider.
    SliderReleased { value: f32 },
}
