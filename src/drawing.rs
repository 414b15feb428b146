use crate::camera::Camera;
use cgmath::{Vector2, Vector3};
use eframe::egui;

pub struct Circle {
    pub position: Vector2<f64>,
    pub radius: f32,
    pub color: Vector3<f64>,
    /// Radius is in screen pixels rather than world units.
    pub fixed_size: bool,
}

/// Collects shapes in world coordinates for one frame, then paints them
/// through the camera.
pub struct DrawHandler {
    pub circles: Vec<Circle>,
}

impl DrawHandler {
    pub fn new() -> DrawHandler {
        DrawHandler { circles: vec![] }
    }

    pub fn circle(&mut self, pos: Vector2<f64>, radius: f64, color: Vector3<f64>) {
        self.circles.push(Circle {
            position: pos,
            radius: radius as f32,
            color,
            fixed_size: false,
        });
    }

    pub fn dot(&mut self, pos: Vector2<f64>, color: Vector3<f64>) {
        self.circles.push(Circle {
            position: pos,
            radius: 1.0,
            color,
            fixed_size: true,
        });
    }

    pub fn paint(&self, painter: &egui::Painter, rect: egui::Rect, camera: &Camera) {
        for circle in &self.circles {
            let screen = camera.world_to_screen(circle.position);
            let radius = if circle.fixed_size {
                circle.radius
            } else {
                circle.radius * camera.scale as f32
            };
            painter.circle_filled(
                rect.left_top() + egui::vec2(screen.x as f32, screen.y as f32),
                radius,
                to_color32(circle.color),
            );
        }
    }
}

fn to_color32(color: Vector3<f64>) -> egui::Color32 {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgb(channel(color.x), channel(color.y), channel(color.z))
}

impl Default for DrawHandler {
    fn default() -> Self {
        Self::new()
    }
}
