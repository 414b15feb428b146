//! Pairwise gravitational accelerations.
//!
//! The law is `G * m_other / d` along the unit vector towards the other body:
//! inverse distance, not inverse square. Existing trajectories depend on it.

use crate::{body::Body, vector::{self, Vec2}};
use cgmath::Zero;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Acceleration `target` receives from `source`. Coincident bodies give zero.
pub fn acceleration_on(target: &Body, source: &Body, gravity: f64) -> Vec2 {
    match vector::unit_towards(target.pos, source.pos) {
        Ok(direction) => {
            let dist = target.distance_to(source);
            direction * (gravity * source.mass / dist)
        }
        Err(_) => Vec2::zero(),
    }
}

pub fn pair_accelerations(a: &Body, b: &Body, gravity: f64) -> (Vec2, Vec2) {
    (acceleration_on(a, b, gravity), acceleration_on(b, a, gravity))
}

/// Total acceleration on every body, indexed like `bodies`.
///
/// Each body sums its contributions in ascending partner index in both the
/// serial and the parallel path, so the two give bit-identical results.
pub fn compute_accelerations(bodies: &[Body], gravity: f64) -> Vec<Vec2> {
    #[cfg(feature = "parallel")]
    {
        per_body_accelerations(bodies, gravity)
    }
    #[cfg(not(feature = "parallel"))]
    {
        pairwise_accelerations(bodies, gravity)
    }
}

/// Serial pair loop over i < j.
pub fn pairwise_accelerations(bodies: &[Body], gravity: f64) -> Vec<Vec2> {
    let mut accelerations = vec![Vec2::zero(); bodies.len()];
    for i in 0..bodies.len() {
        for j in i + 1..bodies.len() {
            let (a_i, a_j) = pair_accelerations(&bodies[i], &bodies[j], gravity);
            accelerations[i] += a_i;
            accelerations[j] += a_j;
        }
    }
    accelerations
}

/// One rayon task per body, each writing only its own slot.
#[cfg(feature = "parallel")]
pub fn per_body_accelerations(bodies: &[Body], gravity: f64) -> Vec<Vec2> {
    (0..bodies.len())
        .into_par_iter()
        .map(|i| {
            bodies
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold(Vec2::zero(), |acc, (_, other)| {
                    acc + acceleration_on(&bodies[i], other, gravity)
                })
        })
        .collect()
}
