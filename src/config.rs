//! Simulation settings, loadable from JSON.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```json
//! {
//!   "gravity": 2.0,
//!   "collisions": false,
//!   "bodies": [
//!     { "pos": [0.0, 0.0], "mass": 100.0, "radius": 20.0, "color": "green" },
//!     { "pos": [200.0, 0.0], "vel": [0.0, 1.0], "mass": 10.0, "radius": 10.0, "color": "red" }
//!   ]
//! }
//! ```

use crate::{
    body::{Body, Frame},
    color::BodyColor,
    error::{SimError, SimResult},
    vector::vec2,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{num::NonZeroUsize, path::Path};

pub const MAX_SPEED: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub gravity: f64,
    pub collisions: bool,
    pub collision_strength: f64,
    /// Target ticks per second of the driver.
    pub fps: u32,
    /// How far ahead the buffer simulates, in seconds of playback.
    pub lookahead_seconds: f64,
    /// How much of the buffer is drawn as a trail, in seconds of playback.
    pub path_seconds: f64,
    pub show_paths: bool,
    /// 0..=MAX_SPEED, at MAX_SPEED a step is taken every tick.
    pub speed: u32,
    pub new_body: NewBodyConfig,
    pub bodies: Vec<BodyConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewBodyConfig {
    pub mass: f64,
    pub radius: f64,
    pub vel: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub pos: [f64; 2],
    #[serde(default)]
    pub vel: [f64; 2],
    pub mass: f64,
    pub radius: f64,
    #[serde(default = "default_color")]
    pub color: BodyColor,
}

fn default_color() -> BodyColor {
    BodyColor::White
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            collisions: true,
            collision_strength: 1.0,
            fps: 60,
            lookahead_seconds: 20.0,
            path_seconds: 1.0,
            show_paths: false,
            speed: MAX_SPEED,
            new_body: NewBodyConfig::default(),
            bodies: vec![
                BodyConfig {
                    pos: [640.0, 160.0],
                    vel: [10.0, 0.0],
                    mass: 10.0,
                    radius: 10.0,
                    color: BodyColor::Blue,
                },
                BodyConfig {
                    pos: [640.0, 360.0],
                    vel: [0.0, 0.0],
                    mass: 100.0,
                    radius: 20.0,
                    color: BodyColor::Green,
                },
                BodyConfig {
                    pos: [640.0, 560.0],
                    vel: [-10.0, 0.0],
                    mass: 10.0,
                    radius: 10.0,
                    color: BodyColor::Red,
                },
            ],
        }
    }
}

impl Default for NewBodyConfig {
    fn default() -> Self {
        Self {
            mass: 10.0,
            radius: 10.0,
            vel: [0.0, 0.0],
        }
    }
}

impl BodyConfig {
    pub fn to_body(&self) -> SimResult<Body> {
        Body::new(
            vec2(self.pos[0], self.pos[1]),
            self.mass,
            vec2(self.vel[0], self.vel[1]),
            self.radius,
            self.color,
        )
    }
}

pub fn check_gravity(gravity: f64) -> SimResult<f64> {
    if gravity.is_finite() && gravity >= 0.0 {
        Ok(gravity)
    } else {
        Err(SimError::InvalidGravity(gravity))
    }
}

/// Converts a playback duration into a frame count, never less than one.
pub fn seconds_to_frames(seconds: f64, fps: u32) -> NonZeroUsize {
    let frames = (seconds * fps as f64).round();
    let frames = if frames.is_finite() && frames >= 1.0 {
        frames as usize
    } else {
        1
    };
    NonZeroUsize::new(frames).unwrap_or(NonZeroUsize::MIN)
}

/// Real ticks per applied step for a speed setting.
pub fn ticks_per_step(speed: u32) -> u32 {
    MAX_SPEED - speed.min(MAX_SPEED) + 1
}

impl SimConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: SimConfig = serde_json::from_str(json).context("parsing simulation config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("loading config {}", path.display()))
    }

    /// Checks every setting and body. Bodies are reported with their index.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (i, body) in self.bodies.iter().enumerate() {
            body.to_body().with_context(|| format!("invalid body {i}"))?;
        }
        self.new_body().context("invalid new body defaults")?;
        self.check()?;
        Ok(())
    }

    pub fn check(&self) -> SimResult<()> {
        check_gravity(self.gravity)?;
        if !self.collision_strength.is_finite() {
            return Err(SimError::InvalidCollisionStrength(self.collision_strength));
        }
        if self.fps == 0 {
            return Err(SimError::InvalidFps);
        }
        self.new_body()?;
        for body in &self.bodies {
            body.to_body()?;
        }
        Ok(())
    }

    /// Template for bodies created at runtime, at the origin.
    pub fn new_body(&self) -> SimResult<Body> {
        Body::new(
            vec2(0.0, 0.0),
            self.new_body.mass,
            vec2(self.new_body.vel[0], self.new_body.vel[1]),
            self.new_body.radius,
            BodyColor::White,
        )
    }

    pub fn initial_frame(&self) -> SimResult<Frame> {
        self.bodies
            .iter()
            .map(BodyConfig::to_body)
            .collect::<SimResult<Vec<_>>>()
            .map(Frame::new)
    }

    pub fn lookahead_depth(&self) -> NonZeroUsize {
        seconds_to_frames(self.lookahead_seconds, self.fps)
    }

    pub fn path_length(&self) -> usize {
        seconds_to_frames(self.path_seconds, self.fps).get()
    }
}
