use crate::{
    body::{Body, Frame},
    error::{SimError, SimResult},
    forces::compute_accelerations,
    vector,
};

/// Advances `bodies` by one tick and returns the new state.
///
/// Semi-implicit Euler with a step of exactly one unit: velocity picks up the
/// acceleration first, then position moves by the new velocity. The input is
/// never touched. Fails instead of producing a NaN or infinite body.
pub fn step(bodies: &[Body], gravity: f64) -> SimResult<Vec<Body>> {
    let accelerations = compute_accelerations(bodies, gravity);

    bodies
        .iter()
        .zip(accelerations)
        .enumerate()
        .map(|(index, (body, acceleration))| {
            let vel = body.vel + acceleration;
            let pos = body.pos + vel;
            if !vector::is_finite(vel) || !vector::is_finite(pos) {
                return Err(SimError::NonFinite { body: index });
            }
            Ok(Body { pos, vel, ..*body })
        })
        .collect()
}

pub fn step_frame(frame: &Frame, gravity: f64) -> SimResult<Frame> {
    step(frame.bodies(), gravity).map(Frame::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::BodyColor, vector::{Vec2, vec2}};
    use cgmath::{InnerSpace, Zero};

    fn body(x: f64, y: f64, mass: f64) -> Body {
        Body::new(vec2(x, y), mass, Vec2::zero(), 1.0, BodyColor::White).unwrap()
    }

    #[test]
    fn heavy_and_light_body() {
        let bodies = [body(0.0, 0.0, 100.0), body(100.0, 0.0, 10.0)];
        let next = step(&bodies, 1.0).unwrap();

        assert!((next[1].vel - vec2(-1.0, 0.0)).magnitude() < 1e-12);
        assert!((next[1].pos - vec2(99.0, 0.0)).magnitude() < 1e-12);
        assert!((next[0].vel - vec2(0.1, 0.0)).magnitude() < 1e-12);
        assert!((next[0].pos - vec2(0.1, 0.0)).magnitude() < 1e-12);
    }

    #[test]
    fn symmetric_pair_conserves_momentum() {
        let bodies = [body(0.0, 0.0, 10.0), body(200.0, 0.0, 10.0)];
        let next = step(&bodies, 1.0).unwrap();

        assert!((next[0].vel.magnitude() - 0.05).abs() < 1e-12);
        assert!((next[1].vel.magnitude() - 0.05).abs() < 1e-12);
        assert!(next[0].vel.x > 0.0 && next[1].vel.x < 0.0);
        let dx0 = next[0].pos.x - bodies[0].pos.x;
        let dx1 = next[1].pos.x - bodies[1].pos.x;
        assert!((dx0 + dx1).abs() < 1e-12);
        assert!((next[0].momentum() + next[1].momentum()).magnitude() < 1e-12);
    }

    #[test]
    fn velocity_carries_position_without_gravity() {
        let moving = Body::new(vec2(1.0, 1.0), 1.0, vec2(2.0, -3.0), 1.0, BodyColor::Red).unwrap();
        let next = step(&[moving], 1.0).unwrap();
        assert_eq!(next[0].pos, vec2(3.0, -2.0));
        assert_eq!(next[0].vel, vec2(2.0, -3.0));
        assert_eq!(next[0].color, BodyColor::Red);
        assert_eq!(moving.pos, vec2(1.0, 1.0));
    }

    #[test]
    fn deterministic() {
        let frame = Frame::new(vec![
            body(0.0, 0.0, 4.0),
            body(30.0, 40.0, 9.0),
            body(-20.0, 10.0, 2.5),
        ]);
        let a = step_frame(&frame, 1.0).unwrap();
        let b = step_frame(&frame, 1.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn overflow_is_reported() {
        let bodies = [body(0.0, 0.0, f64::MAX), body(1e-300, 0.0, f64::MAX)];
        assert!(matches!(step(&bodies, 10.0), Err(SimError::NonFinite { .. })));
    }
}
