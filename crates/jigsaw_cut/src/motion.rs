//! Smooth movement of a piece towards a target position.
//!
//! Hosts drive a [`PieceMotion`] once per frame. The position follows a critically damped
//! spring and snaps onto the target once it is closer than [`SETTLE_DISTANCE`]. Positions cross
//! the API as [`mint`] vectors so any math library can be used on the host side.
use glam::Vec3;
use mint::Vector3;

/// Distance below which a moving piece snaps onto its target.
pub const SETTLE_DISTANCE: f32 = 0.1;

const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Movement state of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Moving,
    Settled,
}

#[derive(Debug, Clone)]
pub struct PieceMotion {
    start: Vec3,
    position: Vec3,
    target: Vec3,
    velocity: Vec3,
    smooth_time: f32,
    state: MotionState,
}

impl PieceMotion {
    /// Creates a settled piece at its assembled position `start`.
    pub fn new(start: impl Into<Vector3<f32>>) -> Self {
        let start = Vec3::from(start.into());
        Self {
            start,
            position: start,
            target: start,
            velocity: Vec3::ZERO,
            smooth_time: MIN_SMOOTH_TIME,
            state: MotionState::Settled,
        }
    }

    /// Starts moving towards `target`, reaching it in roughly `smooth_time` seconds.
    pub fn move_to(&mut self, target: impl Into<Vector3<f32>>, smooth_time: f32) {
        self.target = Vec3::from(target.into());
        self.smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
        self.state = MotionState::Moving;
    }

    /// Places the piece at `position` without animating.
    pub fn teleport(&mut self, position: impl Into<Vector3<f32>>) {
        self.position = Vec3::from(position.into());
        self.target = self.position;
        self.velocity = Vec3::ZERO;
        self.state = MotionState::Settled;
    }

    /// Advances the motion by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> MotionState {
        if self.state == MotionState::Settled || dt <= 0.0 {
            return self.state;
        }

        self.position = smooth_damp(
            self.position,
            self.target,
            &mut self.velocity,
            self.smooth_time,
            dt,
        );
        if self.position.distance(self.target) < SETTLE_DISTANCE {
            self.position = self.target;
            self.velocity = Vec3::ZERO;
            self.state = MotionState::Settled;
        }
        self.state
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position.into()
    }

    pub fn target(&self) -> Vector3<f32> {
        self.target.into()
    }

    pub fn start(&self) -> Vector3<f32> {
        self.start.into()
    }

    /// `true` once the piece rests at the position it was cut from.
    pub fn is_assembled(&self) -> bool {
        self.state == MotionState::Settled && self.target == self.start
    }
}

// Critically damped spring, integrated with a rational approximation of exp(-omega * dt).
fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // No overshoot past the target.
    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec3::ZERO;
    }
    output
}
