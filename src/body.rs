use crate::{
    color::BodyColor,
    error::{SimError, SimResult},
    vector::{self, Vec2},
};
use serde::{Deserialize, Serialize};
use std::{ops::Deref, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f64,
    pub radius: f64,
    pub color: BodyColor,
}

impl Body {
    /// Builds a body, rejecting masses that are not strictly positive and
    /// radii that are negative.
    pub fn new(pos: Vec2, mass: f64, vel: Vec2, radius: f64, color: BodyColor) -> SimResult<Self> {
        let body = Self {
            pos,
            vel,
            mass,
            radius,
            color,
        };
        body.validate()?;
        Ok(body)
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(SimError::InvalidMass(self.mass));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(SimError::InvalidRadius(self.radius));
        }
        if !vector::is_finite(self.pos) || !vector::is_finite(self.vel) {
            return Err(SimError::InvalidState);
        }
        Ok(())
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        vector::distance(self.pos, other.pos)
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }
}

/// Snapshot of every body at one tick.
///
/// The bodies sit behind an `Arc<[Body]>`, so a frame can be handed to the
/// renderer and kept in the lookahead buffer at the same time, and nothing can
/// change it once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    bodies: Arc<[Body]>,
}

impl Frame {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self {
            bodies: bodies.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// New frame with `body` appended.
    pub fn with_body(&self, body: Body) -> Self {
        let mut bodies = self.bodies.to_vec();
        bodies.push(body);
        Self::new(bodies)
    }
}

impl Deref for Frame {
    type Target = [Body];

    fn deref(&self) -> &[Body] {
        &self.bodies
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Body>> for Frame {
    fn from(bodies: Vec<Body>) -> Self {
        Self::new(bodies)
    }
}
