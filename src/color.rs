use cgmath::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    White,
}

/// Colors handed out to bodies created at runtime, in order.
pub const PALETTE: [BodyColor; 7] = [
    BodyColor::Red,
    BodyColor::Orange,
    BodyColor::Yellow,
    BodyColor::Green,
    BodyColor::Blue,
    BodyColor::Purple,
    BodyColor::Pink,
];

pub fn color_for_index(n: usize) -> BodyColor {
    PALETTE[n % PALETTE.len()]
}

impl BodyColor {
    pub fn rgb(self) -> Vector3<f64> {
        let (r, g, b) = match self {
            BodyColor::Red => (255, 0, 0),
            BodyColor::Orange => (255, 165, 0),
            BodyColor::Yellow => (255, 255, 0),
            BodyColor::Green => (0, 255, 0),
            BodyColor::Blue => (0, 0, 255),
            BodyColor::Purple => (160, 32, 240),
            BodyColor::Pink => (255, 192, 203),
            BodyColor::White => (255, 255, 255),
        };
        Vector3 {
            x: r as f64 / 255.0,
            y: g as f64 / 255.0,
            z: b as f64 / 255.0,
        }
    }
}
