use crate::{
    body::{Body, Frame},
    collision,
    color::{BodyColor, color_for_index},
    config::{self, SimConfig},
    error::SimResult,
    frames::FrameBuffer,
    vector::{Vec2, vec2},
};
use cgmath::Zero;
use std::num::NonZeroUsize;

/// Tick driver: owns the live frame, the lookahead buffer and the settings
/// that shape future frames.
///
/// Every setter that can change a future trajectory clears the buffer; the
/// next read refills it from the live frame.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    initial: Frame,
    current: Frame,
    buffer: FrameBuffer,
    path_length: usize,
    ticks_per_step: u32,
    counter: u64,
    bodies_created: usize,
    paused: bool,
}

impl Simulation {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.check()?;
        let initial = config.initial_frame()?;
        Ok(Self {
            initial: initial.clone(),
            current: initial,
            buffer: FrameBuffer::new(config.lookahead_depth()),
            path_length: config.path_length(),
            ticks_per_step: config::ticks_per_step(config.speed),
            counter: 0,
            bodies_created: 0,
            paused: false,
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn current(&self) -> &Frame {
        &self.current
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn ticks_per_step(&self) -> u32 {
        self.ticks_per_step
    }

    pub fn path_length(&self) -> usize {
        self.path_length
    }

    pub fn invalidate(&mut self) {
        self.buffer.invalidate();
    }

    fn ensure_filled(&mut self) -> SimResult<()> {
        if self.buffer.is_empty() {
            self.buffer.fill(&self.current, self.config.gravity)?;
        }
        Ok(())
    }

    /// One real tick. A simulation step is taken only on every
    /// `ticks_per_step`-th tick and never while paused.
    ///
    /// Fails only when the live frame has no valid successor. The simulation
    /// then pauses and the live frame stays current.
    pub fn tick(&mut self) -> SimResult<&Frame> {
        let take_step = !self.paused && self.counter % self.ticks_per_step as u64 == 0;
        self.counter = self.counter.wrapping_add(1);
        if take_step {
            if let Err(err) = self.step() {
                self.paused = true;
                return Err(err);
            }
        }
        Ok(&self.current)
    }

    /// Resolves collisions on the live frame, then makes the next buffered
    /// frame current. Nothing changes when there is no valid next frame, so a
    /// retry starts from the same state.
    fn step(&mut self) -> SimResult<()> {
        let kicked = if self.config.collisions {
            collision::resolve(&self.current, self.config.collision_strength).apply(&self.current)
        } else {
            None
        };
        if kicked.is_some() {
            self.buffer.invalidate();
        }
        let start = kicked.as_ref().unwrap_or(&self.current);
        if self.buffer.is_empty() {
            self.buffer.fill(start, self.config.gravity)?;
        }
        self.current = self.buffer.advance(self.config.gravity)?;
        Ok(())
    }

    /// The first `max_count` buffered future frames, oldest first.
    pub fn renderable_frames(
        &mut self,
        max_count: usize,
    ) -> SimResult<impl Iterator<Item = &Frame>> {
        self.ensure_filled()?;
        Ok(self.buffer.iter().take(max_count))
    }

    /// Trail frames to draw: the configured path length, or nothing when paths
    /// are hidden.
    pub fn path_frames(&mut self) -> SimResult<impl Iterator<Item = &Frame>> {
        let count = if self.config.show_paths {
            self.path_length
        } else {
            0
        };
        self.renderable_frames(count)
    }

    pub fn create_body(
        &mut self,
        pos: Vec2,
        mass: f64,
        vel: Vec2,
        radius: f64,
        color: BodyColor,
    ) -> SimResult<&Body> {
        let body = Body::new(pos, mass, vel, radius, color)?;
        self.current = self.current.with_body(body);
        self.invalidate();
        Ok(&self.current[self.current.len() - 1])
    }

    /// Adds a body with the configured defaults and the next palette color.
    pub fn spawn_body(&mut self, pos: Vec2) -> SimResult<&Body> {
        let defaults = self.config.new_body.clone();
        let color = color_for_index(self.bodies_created);
        self.create_body(
            pos,
            defaults.mass,
            vec2(defaults.vel[0], defaults.vel[1]),
            defaults.radius,
            color,
        )?;
        self.bodies_created += 1;
        Ok(&self.current[self.current.len() - 1])
    }

    pub fn set_gravitational_constant(&mut self, gravity: f64) -> SimResult<()> {
        let gravity = config::check_gravity(gravity)?;
        if gravity != self.config.gravity {
            self.config.gravity = gravity;
            self.invalidate();
        }
        Ok(())
    }

    pub fn set_collisions_enabled(&mut self, enabled: bool) {
        if enabled != self.config.collisions {
            self.config.collisions = enabled;
            self.invalidate();
        }
    }

    pub fn set_collision_strength(&mut self, strength: f64) {
        if strength.is_finite() && strength != self.config.collision_strength {
            self.config.collision_strength = strength;
            if self.config.collisions {
                self.invalidate();
            }
        }
    }

    /// Number of buffered frames drawn as a trail. Display only.
    pub fn set_path_length(&mut self, frames: usize) {
        self.path_length = frames.max(1);
    }

    pub fn set_show_paths(&mut self, show: bool) {
        self.config.show_paths = show;
    }

    pub fn set_lookahead_depth(&mut self, depth: NonZeroUsize) {
        if depth != self.buffer.depth() {
            self.buffer.set_depth(depth);
        }
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.config.speed = speed.min(config::MAX_SPEED);
        self.ticks_per_step = config::ticks_per_step(speed);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Back to the starting bodies.
    pub fn reset(&mut self) {
        self.current = self.initial.clone();
        self.counter = 0;
        self.bodies_created = 0;
        self.invalidate();
    }

    /// Mean position of the live bodies.
    pub fn centroid(&self) -> Option<Vec2> {
        if self.current.is_empty() {
            return None;
        }
        let sum = self
            .current
            .iter()
            .fold(Vec2::zero(), |acc, body| acc + body.pos);
        Some(sum / self.current.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::BodyConfig, error::SimError};

    fn config(bodies: Vec<BodyConfig>) -> SimConfig {
        SimConfig {
            collisions: false,
            lookahead_seconds: 0.1,
            fps: 60,
            bodies,
            ..SimConfig::default()
        }
    }

    fn pair() -> Vec<BodyConfig> {
        vec![
            BodyConfig {
                pos: [0.0, 0.0],
                vel: [0.0, 0.0],
                mass: 100.0,
                radius: 1.0,
                color: BodyColor::Green,
            },
            BodyConfig {
                pos: [100.0, 0.0],
                vel: [0.0, 0.0],
                mass: 10.0,
                radius: 1.0,
                color: BodyColor::Blue,
            },
        ]
    }

    #[test]
    fn first_tick_fills_and_steps() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        assert!(sim.buffer().is_empty());
        let frame = sim.tick().unwrap().clone();
        assert_eq!(frame[1].pos, vec2(99.0, 0.0));
        assert_eq!(sim.buffer().len(), 6);
    }

    #[test]
    fn speed_skips_ticks() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        sim.set_speed(8);
        assert_eq!(sim.ticks_per_step(), 3);
        let start = sim.current().clone();
        let first = sim.tick().unwrap().clone();
        assert_ne!(first, start);
        assert_eq!(*sim.tick().unwrap(), first);
        assert_eq!(*sim.tick().unwrap(), first);
        assert_ne!(*sim.tick().unwrap(), first);
    }

    #[test]
    fn pause_holds_frame() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        sim.toggle_pause();
        let start = sim.current().clone();
        for _ in 0..5 {
            assert_eq!(*sim.tick().unwrap(), start);
        }
        sim.toggle_pause();
        assert_ne!(*sim.tick().unwrap(), start);
    }

    #[test]
    fn create_body_invalidates() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        sim.tick().unwrap();
        assert!(!sim.buffer().is_empty());
        sim.create_body(vec2(50.0, 50.0), 5.0, Vec2::zero(), 2.0, BodyColor::Red)
            .unwrap();
        assert!(sim.buffer().is_empty());
        assert_eq!(sim.current().len(), 3);
    }

    #[test]
    fn create_body_rejects_bad_mass() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        sim.tick().unwrap();
        let err = sim
            .create_body(vec2(50.0, 50.0), 0.0, Vec2::zero(), 2.0, BodyColor::Red)
            .unwrap_err();
        assert_eq!(err, SimError::InvalidMass(0.0));
        assert_eq!(sim.current().len(), 2);
        assert!(!sim.buffer().is_empty());
    }

    #[test]
    fn spawned_bodies_cycle_colors() {
        let mut sim = Simulation::new(config(vec![])).unwrap();
        let colors: Vec<_> = (0..9)
            .map(|i| sim.spawn_body(vec2(i as f64 * 100.0, 0.0)).unwrap().color)
            .collect();
        assert_eq!(colors[0], BodyColor::Red);
        assert_eq!(colors[1], BodyColor::Orange);
        assert_eq!(colors[7], BodyColor::Red);
        assert_eq!(colors[8], BodyColor::Orange);
        assert_eq!(sim.current()[0].mass, 10.0);
        assert_eq!(sim.current()[0].radius, 10.0);
    }

    #[test]
    fn gravity_change_invalidates_only_when_changed() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        sim.tick().unwrap();
        sim.set_gravitational_constant(1.0).unwrap();
        assert!(!sim.buffer().is_empty());
        sim.set_gravitational_constant(3.0).unwrap();
        assert!(sim.buffer().is_empty());
        assert_eq!(
            sim.set_gravitational_constant(-1.0),
            Err(SimError::InvalidGravity(-1.0))
        );
        assert_eq!(sim.config().gravity, 3.0);
    }

    #[test]
    fn path_settings_are_cosmetic() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        sim.tick().unwrap();
        sim.set_path_length(3);
        sim.set_show_paths(true);
        assert!(!sim.buffer().is_empty());
        assert_eq!(sim.path_frames().unwrap().count(), 3);
        sim.set_show_paths(false);
        assert_eq!(sim.path_frames().unwrap().count(), 0);
    }

    #[test]
    fn renderable_frames_refill_empty_buffer() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        sim.invalidate();
        assert_eq!(sim.renderable_frames(4).unwrap().count(), 4);
        assert_eq!(sim.renderable_frames(100).unwrap().count(), 6);
    }

    #[test]
    fn reset_restores_initial_bodies() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        let start = sim.current().clone();
        sim.spawn_body(vec2(500.0, 500.0)).unwrap();
        for _ in 0..10 {
            sim.tick().unwrap();
        }
        sim.reset();
        assert_eq!(*sim.current(), start);
        assert!(sim.buffer().is_empty());
    }

    #[test]
    fn centroid_of_live_bodies() {
        let sim = Simulation::new(config(pair())).unwrap();
        assert_eq!(sim.centroid(), Some(vec2(50.0, 0.0)));
        let empty = Simulation::new(config(vec![])).unwrap();
        assert_eq!(empty.centroid(), None);
    }

    #[test]
    fn failed_step_pauses() {
        let mut sim = Simulation::new(config(vec![
            BodyConfig {
                pos: [0.0, 0.0],
                vel: [0.0, 0.0],
                mass: f64::MAX,
                radius: 0.0,
                color: BodyColor::White,
            },
            BodyConfig {
                pos: [1e-300, 0.0],
                vel: [0.0, 0.0],
                mass: f64::MAX,
                radius: 0.0,
                color: BodyColor::White,
            },
        ]))
        .unwrap();
        let start = sim.current().clone();
        sim.set_gravitational_constant(10.0).unwrap();
        assert!(matches!(sim.tick(), Err(SimError::NonFinite { .. })));
        assert!(sim.is_paused());
        assert_eq!(*sim.current(), start);
    }

    #[test]
    fn lookahead_depth_change_refills_at_new_depth() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        sim.tick().unwrap();
        assert_eq!(sim.buffer().len(), 6);
        sim.set_lookahead_depth(NonZeroUsize::new(10).unwrap());
        assert!(sim.buffer().is_empty());
        sim.tick().unwrap();
        assert_eq!(sim.buffer().len(), 10);
    }

    #[test]
    fn same_lookahead_depth_keeps_buffer() {
        let mut sim = Simulation::new(config(pair())).unwrap();
        sim.tick().unwrap();
        let before: Vec<Frame> = sim.buffer().iter().cloned().collect();
        sim.set_lookahead_depth(NonZeroUsize::new(6).unwrap());
        let after: Vec<Frame> = sim.buffer().iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn new_rejects_settings_built_in_code() {
        let bad_fps = SimConfig {
            fps: 0,
            ..config(pair())
        };
        assert_eq!(Simulation::new(bad_fps).unwrap_err(), SimError::InvalidFps);
        let bad_strength = SimConfig {
            collision_strength: f64::INFINITY,
            ..config(pair())
        };
        assert_eq!(
            Simulation::new(bad_strength).unwrap_err(),
            SimError::InvalidCollisionStrength(f64::INFINITY)
        );
    }

    #[test]
    fn valid_frames_before_overflow_still_play() {
        let mut sim = Simulation::new(SimConfig {
            fps: 1,
            lookahead_seconds: 5.0,
            ..config(vec![BodyConfig {
                pos: [0.0, 0.0],
                vel: [1e308, 0.0],
                mass: 1.0,
                radius: 1.0,
                color: BodyColor::White,
            }])
        })
        .unwrap();

        let first = sim.tick().unwrap().clone();
        assert_eq!(first[0].pos, vec2(1e308, 0.0));
        assert!(!sim.is_paused());

        assert_eq!(sim.tick(), Err(SimError::NonFinite { body: 0 }));
        assert!(sim.is_paused());
        assert_eq!(*sim.current(), first);

        sim.set_paused(false);
        assert_eq!(sim.tick(), Err(SimError::NonFinite { body: 0 }));
        assert_eq!(*sim.current(), first);

        sim.reset();
        sim.set_paused(false);
        assert_eq!(sim.tick().unwrap()[0].pos, vec2(1e308, 0.0));
    }

    #[test]
    fn failed_step_does_not_apply_collision_kick() {
        let mut sim = Simulation::new(SimConfig {
            collisions: true,
            ..config(vec![
                BodyConfig {
                    pos: [0.0, 0.0],
                    vel: [1.0, 0.0],
                    mass: f64::MAX,
                    radius: 1.0,
                    color: BodyColor::White,
                },
                BodyConfig {
                    pos: [1e-300, 0.0],
                    vel: [0.0, 0.0],
                    mass: f64::MAX,
                    radius: 1.0,
                    color: BodyColor::White,
                },
            ])
        })
        .unwrap();
        let start = sim.current().clone();
        for _ in 0..3 {
            assert!(matches!(sim.tick(), Err(SimError::NonFinite { .. })));
            assert_eq!(*sim.current(), start);
            sim.set_paused(false);
        }
    }
}
