//! The [`FlowPosition`] camera: an integer target and a smoothly
//! interpolated current position.
//!
//! Each axis eases toward its target with exponential decay,
//!
//! ```text
//! current += (target - current) * (1 - exp(-rate * dt))
//! ```
//!
//! where `dt` is the elapsed time in seconds. The blend factor stays in
//! `[0, 1)`, so the camera never passes its target, and an axis closer than
//! [`SNAP_DISTANCE`] snaps onto it, so a fixed target is reached after a
//! bounded number of non-zero updates.

use transience_core::Point;

use crate::Logical;

/// Default decay rate, per second. At 60 fps a 20-tile jump settles in
/// roughly 50 frames.
pub const DEFAULT_FOLLOW_RATE: f32 = 10.0;

/// Distance, in tiles, under which an axis snaps onto its target.
pub const SNAP_DISTANCE: f32 = 0.01;

/// Camera position with a target coordinate and a fractional current one.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowPosition {
    target: Point,
    current_x: f32,
    current_y: f32,
    rate: f32,
}

impl Default for FlowPosition {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowPosition {
    /// A settled camera at the origin.
    pub fn new() -> Self {
        Self::with_rate(DEFAULT_FOLLOW_RATE)
    }

    /// A settled camera at the origin easing at `rate` per second.
    /// Non-positive or non-finite rates fall back to the default.
    pub fn with_rate(rate: f32) -> Self {
        let rate = if rate.is_finite() && rate > 0.0 {
            rate
        } else {
            DEFAULT_FOLLOW_RATE
        };
        Self {
            target: Point::ZERO,
            current_x: 0.0,
            current_y: 0.0,
            rate,
        }
    }

    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_target_x(&mut self, x: i32) {
        self.set_target(Point::new(x, self.target.y));
    }

    pub fn set_target_y(&mut self, y: i32) {
        self.set_target(Point::new(self.target.x, y));
    }

    pub fn set_target(&mut self, target: Point) {
        if target != self.target {
            log::debug!("camera retargeted {} -> {}", self.target, target);
        }
        self.target = target;
    }

    #[inline]
    pub fn target(&self) -> Point {
        self.target
    }

    #[inline]
    pub fn target_x(&self) -> i32 {
        self.target.x
    }

    #[inline]
    pub fn target_y(&self) -> i32 {
        self.target.y
    }

    /// Move both the target and the current position to `p` at once.
    pub fn jump_to(&mut self, p: Point) {
        self.target = p;
        self.current_x = p.x as f32;
        self.current_y = p.y as f32;
    }

    /// The interpolated X coordinate used for rendering.
    #[inline]
    pub fn intermediate_x(&self) -> f32 {
        self.current_x
    }

    /// The interpolated Y coordinate used for rendering.
    #[inline]
    pub fn intermediate_y(&self) -> f32 {
        self.current_y
    }

    #[inline]
    pub fn intermediate(&self) -> (f32, f32) {
        (self.current_x, self.current_y)
    }

    /// Whether the current position has reached the target on both axes.
    pub fn is_settled(&self) -> bool {
        self.current_x == self.target.x as f32 && self.current_y == self.target.y as f32
    }

    /// Advance the current position by `elapsed_ms` milliseconds.
    pub fn update(&mut self, elapsed_ms: u32) {
        if elapsed_ms == 0 || self.is_settled() {
            return;
        }
        let dt = elapsed_ms as f32 / 1000.0;
        let factor = 1.0 - (-self.rate * dt).exp();
        self.current_x = approach(self.current_x, self.target.x as f32, factor);
        self.current_y = approach(self.current_y, self.target.y as f32, factor);
    }
}

impl Logical for FlowPosition {
    fn update(&mut self, elapsed_ms: u32) {
        FlowPosition::update(self, elapsed_ms);
    }
}

fn approach(current: f32, target: f32, factor: f32) -> f32 {
    let next = current + (target - current) * factor.clamp(0.0, 1.0);
    if (target - next).abs() < SNAP_DISTANCE {
        target
    } else {
        next
    }
}
