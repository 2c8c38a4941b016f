//! The render loop controller: one call to [`RenderState::frame`] per display refresh.
//!
//! Frame contract, in order:
//! 1. scan digit keys `1..=9` ascending; every held digit overwrites the selection, so the
//!    highest held digit wins and no held digit leaves it alone
//! 2. add the onset step once if space is held (level-triggered: holding keeps adding)
//! 3. sample time, slider and flux
//! 4. bind the selected program and push `u_time`, `onset`, `cent`, `flux`
//! 5. draw one full-screen quad
//!
//! Resize and key-press notifications arrive between frames and never touch the selection
//! or the parameters.

use std::time::Duration;

use crate::config::{CanvasCfg, OnsetCfg, SketchConfig};
use crate::events::EngineEvent;
use crate::frame::{FrameTarget, UniformState, U_RESOLUTION};
use crate::input::{InputState, KEY_SPACE};
use crate::shaders::{ShaderBank, ShaderSlot};
use crate::slider::Slider;

#[derive(Debug)]
pub struct RenderState<P> {
    bank: ShaderBank<P>,
    current: ShaderSlot,

    onset: f64,
    onset_step: f64,
    flux: f32,
    slider: Slider,

    width: u32,
    height: u32,
    fullscreen: bool,

    events: Vec<EngineEvent>,
}

impl<P> RenderState<P> {
    pub fn new(bank: ShaderBank<P>, slider: Slider, onset: OnsetCfg, flux: f32, canvas: CanvasCfg) -> Self {
        Self {
            bank,
            current: ShaderSlot::S1,
            onset: onset.initial,
            onset_step: onset.step,
            flux,
            slider,
            width: canvas.width.max(1),
            height: canvas.height.max(1),
            fullscreen: false,
            events: Vec::new(),
        }
    }

    pub fn from_config(bank: ShaderBank<P>, cfg: &SketchConfig) -> Self {
        Self::new(bank, Slider::new(&cfg.slider), cfg.onset, cfg.flux, cfg.canvas)
    }

    pub fn current(&self) -> ShaderSlot {
        self.current
    }

    pub fn current_program(&self) -> &P {
        self.bank.get(self.current)
    }

    pub fn bank(&self) -> &ShaderBank<P> {
        &self.bank
    }

    pub fn onset(&self) -> f64 {
        self.onset
    }

    pub fn centroid(&self) -> f32 {
        self.slider.value()
    }

    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Step 1. Returns the selection after the scan.
    pub fn scan_selection(&mut self, input: &impl InputState) -> ShaderSlot {
        let before = self.current;
        for slot in ShaderSlot::ALL {
            if input.is_key_down(slot.key_code()) {
                self.current = slot;
            }
        }
        if self.current != before {
            self.events.push(EngineEvent::ShaderSelected {
                from: before,
                to: self.current,
            });
        }
        self.current
    }

    /// Step 2. Returns the accumulator after the check.
    pub fn accumulate_onset(&mut self, input: &impl InputState) -> f64 {
        if input.is_key_down(KEY_SPACE) {
            self.onset += self.onset_step;
        }
        self.onset
    }

    /// Step 3. `elapsed` is the time since the process (or sketch) started.
    pub fn sample(&self, elapsed: Duration) -> UniformState {
        UniformState {
            time: elapsed.as_secs_f64() as f32,
            onset: self.onset as f32,
            centroid: self.slider.value(),
            flux: self.flux,
        }
    }

    /// Run one whole frame against `target`.
    pub fn frame<T>(&mut self, input: &impl InputState, elapsed: Duration, target: &mut T) -> UniformState
    where
        T: FrameTarget<Program = P>,
    {
        self.scan_selection(input);
        self.accumulate_onset(input);
        let uniforms = self.sample(elapsed);

        let program = self.bank.get(self.current);
        target.bind(program);
        for (name, value) in uniforms.named() {
            target.set_uniform_f32(program, name, value);
        }
        target.set_uniform_vec2(program, U_RESOLUTION, self.width as f32, self.height as f32);

        target.draw_fullscreen_quad();
        uniforms
    }

    /// Record a new surface size. Zero dimensions (minimized windows) clamp to 1.
    /// Returns true when the size actually changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let (w, h) = (width.max(1), height.max(1));
        if (w, h) == (self.width, self.height) {
            return false;
        }
        self.width = w;
        self.height = h;
        self.events.push(EngineEvent::SurfaceResized { width: w, height: h });
        true
    }

    /// Any key press asks for fullscreen. Returns true when the host should switch now;
    /// further presses while already fullscreen are no-ops.
    pub fn on_key_pressed(&mut self) -> bool {
        if self.fullscreen {
            return false;
        }
        self.fullscreen = true;
        self.events.push(EngineEvent::FullscreenRequested);
        true
    }

    /// The window left fullscreen by other means; the next key press requests it again.
    pub fn on_fullscreen_left(&mut self) {
        self.fullscreen = false;
    }

    pub fn slider_pointer_down(&mut self, px: f32, py: f32) -> bool {
        self.slider.pointer_down(px, py)
    }

    pub fn slider_pointer_moved(&mut self, px: f32) -> bool {
        self.slider.pointer_moved(px)
    }

    pub fn slider_pointer_up(&mut self) {
        if self.slider.pointer_up() {
            self.events.push(EngineEvent::SliderReleased {
                value: self.slider.value(),
            });
        }
    }

    /// Take all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SliderCfg;
    use crate::input::HeldKeys;

    fn state() -> RenderState<u8> {
        let bank = ShaderBank::new([1, 2, 3, 4, 5, 6, 7, 8, 9]);
        RenderState::new(
            bank,
            Slider::new(&SliderCfg::default()),
            OnsetCfg::default(),
            0.5,
            CanvasCfg::default(),
        )
    }

    #[test]
    fn starts_on_first_shader_with_initial_onset() {
        let s = state();
        assert_eq!(s.current(), ShaderSlot::S1);
        assert_eq!(*s.current_program(), 1);
        assert_eq!(s.onset(), 0.1);
        assert_eq!(s.centroid(), 100.0);
        assert_eq!(s.canvas_size(), (100, 100));
    }

    #[test]
    fn scan_ignores_unrelated_keys() {
        let mut s = state();
        s.scan_selection(&HeldKeys::from([48, 58, KEY_SPACE]));
        assert_eq!(s.current(), ShaderSlot::S1);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn selection_change_is_reported_once() {
        let mut s = state();
        let keys = HeldKeys::from([ShaderSlot::S4.key_code()]);
        s.scan_selection(&keys);
        s.scan_selection(&keys);
        assert_eq!(
            s.drain_events(),
            vec![EngineEvent::ShaderSelected {
                from: ShaderSlot::S1,
                to: ShaderSlot::S4
            }]
        );
    }

    #[test]
    fn sample_reports_elapsed_seconds() {
        let s = state();
        let u = s.sample(Duration::from_millis(2500));
        assert_eq!(u.time, 2.5);
        assert_eq!(u.flux, 0.5);
        assert_eq!(u.centroid, 100.0);
    }

    #[test]
    fn resize_clamps_and_dedups() {
        let mut s = state();
        assert!(s.resize(800, 600));
        assert!(!s.resize(800, 600));
        assert!(s.resize(0, 0));
        assert_eq!(s.canvas_size(), (1, 1));
        assert_eq!(s.drain_events().len(), 2);
    }

    #[test]
    fn fullscreen_requested_on_first_press_only() {
        let mut s = state();
        assert!(s.on_key_pressed());
        assert!(!s.on_key_pressed());
        assert!(s.is_fullscreen());
        s.on_fullscreen_left();
        assert!(s.on_key_pressed());
        let fs = s
            .drain_events()
            .into_iter()
            .filter(|e| *e == EngineEvent::FullscreenRequested)
            .count();
        assert_eq!(fs, 2);
    }

    #[test]
    fn slider_release_is_reported_with_final_value() {
        let mut s = state();
        assert!(s.slider_pointer_down(10.0, 12.0));
        assert!(s.slider_pointer_moved(90.0));
        s.slider_pointer_up();
        s.slider_pointer_up();
        assert_eq!(s.centroid(), 4000.0);
        assert_eq!(s.drain_events(), vec![EngineEvent::SliderReleased { value: 4000.0 }]);
    }
}
