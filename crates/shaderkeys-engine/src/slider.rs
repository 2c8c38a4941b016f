//! Numeric range control that stands in for the centroid feature.
//!
//! Behaves like an HTML `<input type="range">`: the value is always inside `[min, max]`
//! and snapped to `step` (a step of 0 means continuous). That includes the value passed at
//! construction, so a default outside the bounds is clamped immediately rather than held
//! until the first drag.

use crate::config::SliderCfg;

#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    min: f32,
    max: f32,
    step: f32,
    value: f32,

    // Geometry in logical pixels, origin at the top-left of the window.
    x: f32,
    y: f32,
    width: f32,
    height: f32,

    dragging: bool,
    touched: bool,
}

impl Slider {
    pub fn new(cfg: &SliderCfg) -> Self {
        let mut s = Self {
            min: cfg.min,
            max: cfg.max,
            step: cfg.step.max(0.0),
            value: cfg.min,
            x: cfg.x,
            y: cfg.y,
            width: cfg.width.max(1.0),
            height: cfg.height.max(1.0),
            dragging: false,
            touched: false,
        };
        s.value = s.sanitize(cfg.default);
        s
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Whether the user has dragged or clicked the control since startup.
    pub fn touched(&self) -> bool {
        self.touched
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Programmatic set; clamps and snaps. Returns true when the stored value changed.
    pub fn set_value(&mut self, v: f32) -> bool {
        let next = self.sanitize(v);
        let changed = next != self.value;
        self.value = next;
        changed
    }

    /// Knob position along the track, 0.0 at `min` and 1.0 at `max`.
    pub fn fraction(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.value - self.min) / span).clamp(0.0, 1.0)
    }

    /// `(x, y, width, height)` of the track in logical pixels.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Value that a pointer at horizontal position `px` would select.
    pub fn value_at(&self, px: f32) -> f32 {
        let t = ((px - self.x) / self.width).clamp(0.0, 1.0);
        self.sanitize(self.min + t * (self.max - self.min))
    }

    /// Start a drag if the pointer is over the track. Jumps the value to the pointer like a
    /// native range input does.
    pub fn pointer_down(&mut self, px: f32, py: f32) -> bool {
        if !self.contains(px, py) {
            return false;
        }
        self.dragging = true;
        self.touched = true;
        let v = self.value_at(px);
        self.value = v;
        true
    }

    /// Returns true when a drag is active and the value moved.
    pub fn pointer_moved(&mut self, px: f32) -> bool {
        if !self.dragging {
            return false;
        }
        let v = self.value_at(px);
        let changed = v != self.value;
        self.value = v;
        changed
    }

    /// Ends a drag; returns whether one was active.
    pub fn pointer_up(&mut self) -> bool {
        std::mem::replace(&mut self.dragging, false)
    }

    fn sanitize(&self, v: f32) -> f32 {
        let v = if v.is_nan() { self.min } else { v.clamp(self.min, self.max) };
        if self.step <= 0.0 {
            return v;
        }
        let n = ((v - self.min) / self.step).round();
        let mut snapped = self.min + n * self.step;
        // A step that does not divide the range evenly can round past max.
        if snapped > self.max {
            snapped -= self.step;
        }
        snapped.max(self.min)
    }
}
