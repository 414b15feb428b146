use cgmath::*;

/// Maps simulation coordinates onto the canvas: `center` is the world point
/// shown in the middle, `scale` is pixels per world unit.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub center: Vector2<f64>,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

pub const MAX_SCALE: f64 = 5.0;
const ZOOM_IN: f64 = 1.2;
const ZOOM_OUT: f64 = 0.8;

impl Camera {
    pub fn new(center: Vector2<f64>) -> Camera {
        Self {
            center,
            scale: 1.0,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn screen_to_world(&self, pos: Vector2<f64>) -> Vector2<f64> {
        Vector2 {
            x: (pos.x - self.width * 0.5) / self.scale + self.center.x,
            y: (pos.y - self.height * 0.5) / self.scale + self.center.y,
        }
    }

    pub fn world_to_screen(&self, pos: Vector2<f64>) -> Vector2<f64> {
        Vector2 {
            x: (pos.x - self.center.x) * self.scale + self.width * 0.5,
            y: (pos.y - self.center.y) * self.scale + self.height * 0.5,
        }
    }

    /// Moves the view by a screen-space drag.
    pub fn pan(&mut self, screen_delta: Vector2<f64>) {
        self.center -= screen_delta / self.scale;
    }

    pub fn zoom(&mut self, scroll: f64) {
        if scroll > 0.0 && self.scale < MAX_SCALE {
            self.scale *= ZOOM_IN;
        }
        if scroll < 0.0 {
            self.scale *= ZOOM_OUT;
        }
    }
}
