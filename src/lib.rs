pub mod body;
pub mod collision;
pub mod color;
pub mod config;
pub mod error;
pub mod forces;
pub mod frames;
pub mod integrator;
pub mod simulation;
pub mod vector;

pub use body::{Body, Frame};
pub use color::{BodyColor, color_for_index};
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use frames::FrameBuffer;
pub use simulation::Simulation;
