//! Overlap detection and the velocity kick applied to touching bodies.
//!
//! The kick is `other.vel * other.mass / self.mass * strength`, added to each
//! body of an overlapping pair. It conserves neither momentum nor energy; it is
//! a game mechanic, not a collision model.

use crate::{
    body::{Body, Frame},
    vector::Vec2,
};
use cgmath::Zero;

#[derive(Debug, Clone, PartialEq)]
pub struct CollisionOutcome {
    pub occurred: bool,
    /// Velocity change per body, indexed like the input.
    pub impulses: Vec<Vec2>,
}

pub fn overlapping(a: &Body, b: &Body) -> bool {
    a.distance_to(b) < a.radius + b.radius
}

/// Impulses for every overlapping pair, computed from the velocities as they
/// were before any of them is applied.
pub fn resolve(bodies: &[Body], strength: f64) -> CollisionOutcome {
    let mut impulses = vec![Vec2::zero(); bodies.len()];
    let mut occurred = false;
    for i in 0..bodies.len() {
        for j in i + 1..bodies.len() {
            let (a, b) = (&bodies[i], &bodies[j]);
            if !overlapping(a, b) {
                continue;
            }
            occurred = true;
            impulses[i] += b.momentum() / a.mass * strength;
            impulses[j] += a.momentum() / b.mass * strength;
        }
    }
    CollisionOutcome { occurred, impulses }
}

impl CollisionOutcome {
    /// Frame with the impulses added to the velocities, or `None` when nothing
    /// collided.
    pub fn apply(&self, frame: &Frame) -> Option<Frame> {
        if !self.occurred {
            return None;
        }
        let bodies = frame
            .iter()
            .zip(&self.impulses)
            .map(|(body, impulse)| Body {
                vel: body.vel + impulse,
                ..*body
            })
            .collect::<Vec<_>>();
        Some(Frame::new(bodies))
    }
}
