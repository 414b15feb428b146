//! 2D vector helpers on top of `cgmath`.
//!
//! `cgmath::Vector2` is `Copy` and its operators return new values, so adding
//! or scaling never touches an operand that is stored elsewhere.

use crate::error::{SimError, SimResult};
use cgmath::{InnerSpace, Vector2};

pub type Vec2 = Vector2<f64>;

pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vector2 { x, y }
}

pub fn distance(a: Vec2, b: Vec2) -> f64 {
    (b - a).magnitude()
}

/// Unit vector pointing from `from` to `to`.
pub fn unit_towards(from: Vec2, to: Vec2) -> SimResult<Vec2> {
    let delta = to - from;
    let dist = delta.magnitude();
    if dist == 0.0 || !dist.is_finite() {
        return Err(SimError::DegenerateDirection);
    }
    Ok(delta / dist)
}

pub fn is_finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
