use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimError {
    /// Two positions coincide, so there is no direction between them.
    DegenerateDirection,
    InvalidMass(f64),
    InvalidRadius(f64),
    InvalidGravity(f64),
    InvalidCollisionStrength(f64),
    InvalidFps,
    /// A position or velocity handed in from outside is NaN or infinite.
    InvalidState,
    /// A step produced a NaN or infinite position/velocity for this body index.
    NonFinite { body: usize },
    EmptyFrameBuffer,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::DegenerateDirection => write!(f, "direction between coincident points"),
            SimError::InvalidMass(mass) => write!(f, "invalid mass {mass}, must be finite and > 0"),
            SimError::InvalidRadius(radius) => {
                write!(f, "invalid radius {radius}, must be finite and >= 0")
            }
            SimError::InvalidGravity(g) => {
                write!(f, "invalid gravitational constant {g}, must be finite and >= 0")
            }
            SimError::InvalidCollisionStrength(strength) => {
                write!(f, "invalid collision strength {strength}, must be finite")
            }
            SimError::InvalidFps => write!(f, "fps must be at least 1"),
            SimError::InvalidState => write!(f, "position and velocity must be finite"),
            SimError::NonFinite { body } => {
                write!(f, "body {body} left the finite range during a step")
            }
            SimError::EmptyFrameBuffer => write!(f, "frame buffer is empty"),
        }
    }
}

impl std::error::Error for SimError {}

pub type SimResult<T> = Result<T, SimError>;
