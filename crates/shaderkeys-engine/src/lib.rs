//! GL-free core of the shaderkeys sketch.
//!
//! Everything that decides *what* to draw lives here: the shader slot table, the
//! level-triggered input snapshot, the centroid slider, the per-frame controller and the
//! `sketch.json` loader. The binary crate owns the window, the GL context and the event
//! loop, and plugs a GL renderer into [`frame::FrameTarget`].

pub mod assets;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod frame;
pub mod input;
pub mod shaders;
pub mod slider;

pub use controller::RenderState;
pub use error::EngineError;
