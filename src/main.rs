use crate::{camera::Camera, drawing::DrawHandler};
use anyhow::Context;
use cgmath::{Vector2, Zero};
use eframe::egui;
use orbit_simulator::{SimConfig, Simulation, config};

mod camera;
mod drawing;

/// Ticks allowed to catch up in a single repaint before the driver gives up
/// and reports lag.
const MAX_TICKS_PER_UPDATE: u32 = 8;

struct App {
    last_time: Option<std::time::Instant>,
    accumulated_time: f64,
    lagging: bool,
    menu_open: bool,
    stats_open: bool,
    sim: Simulation,
    camera: Camera,
    path_seconds: f64,
    last_error: Option<String>,
}

impl App {
    fn new(config: SimConfig) -> anyhow::Result<Self> {
        let path_seconds = config.path_seconds;
        let sim = Simulation::new(config).context("building simulation")?;
        let center = sim.centroid().unwrap_or(Vector2::zero());
        Ok(Self {
            last_time: None,
            accumulated_time: 0.0,
            lagging: false,
            menu_open: true,
            stats_open: false,
            sim,
            camera: Camera::new(center),
            path_seconds,
            last_error: None,
        })
    }

    fn tick_interval(&self) -> f64 {
        1.0 / self.sim.config().fps as f64
    }

    /// Runs as many fixed-rate ticks as the elapsed time calls for.
    fn move_time(&mut self, dt: f64) {
        self.accumulated_time += dt.max(0.0);
        let interval = self.tick_interval();
        let mut ticks = 0;
        self.lagging = false;
        while self.accumulated_time >= interval {
            if ticks == MAX_TICKS_PER_UPDATE {
                self.lagging = true;
                self.accumulated_time = 0.0;
                break;
            }
            if let Err(err) = self.sim.tick() {
                report(&mut self.last_error, format!("simulation paused: {err}"));
                self.accumulated_time = 0.0;
                break;
            }
            self.accumulated_time -= interval;
            ticks += 1;
        }
    }

    fn menu(&mut self, ctx: &egui::Context) {
        let fps = self.sim.config().fps as f64;
        egui::Window::new("Menu")
            .open(&mut self.menu_open)
            .resizable(false)
            .show(ctx, |ui| {
                let mut speed = self.sim.config().speed;
                if ui
                    .add(egui::Slider::new(&mut speed, 0..=config::MAX_SPEED).text("Speed of time"))
                    .changed()
                {
                    self.sim.set_speed(speed);
                }

                let mut gravity = self.sim.config().gravity;
                if ui
                    .add(egui::Slider::new(&mut gravity, 0.0..=10.0).text("Gravitational Constant G"))
                    .changed()
                    && let Err(err) = self.sim.set_gravitational_constant(gravity)
                {
                    report(&mut self.last_error, format!("could not set G: {err}"));
                }

                let mut show_paths = self.sim.config().show_paths;
                if ui.checkbox(&mut show_paths, "Body paths").changed() {
                    self.sim.set_show_paths(show_paths);
                }

                let mut collisions = self.sim.config().collisions;
                if ui.checkbox(&mut collisions, "Collisions").changed() {
                    self.sim.set_collisions_enabled(collisions);
                }

                let mut strength = self.sim.config().collision_strength;
                if ui
                    .add(egui::Slider::new(&mut strength, 0.0..=5.0).text("Collision strength"))
                    .changed()
                {
                    self.sim.set_collision_strength(strength);
                }

                let mut lookahead = self.sim.buffer().depth().get() as f64 / fps;
                if ui
                    .add(
                        egui::Slider::new(&mut lookahead, 1.0..=60.0)
                            .text("Lookahead")
                            .suffix("s"),
                    )
                    .changed()
                {
                    self.sim
                        .set_lookahead_depth(config::seconds_to_frames(lookahead, fps as u32));
                }

                let max_seconds = self.sim.buffer().depth().get() as f64 / fps;
                if ui
                    .add(
                        egui::Slider::new(&mut self.path_seconds, 1.0 / fps..=max_seconds)
                            .text("Path length")
                            .suffix("s"),
                    )
                    .changed()
                {
                    self.sim
                        .set_path_length(config::seconds_to_frames(self.path_seconds, fps as u32).get());
                }

                if ui.button("Center system by position").clicked()
                    && let Some(centroid) = self.sim.centroid()
                {
                    self.camera.center = centroid;
                }

                ui.separator();
                ui.label("Esc: menu   Space: pause   R: reset");
                ui.label("Right click: new body   Drag: move   Scroll: zoom");
            });
    }

    fn stats(&mut self, ctx: &egui::Context, dt: f64) {
        egui::Window::new("Stats")
            .open(&mut self.stats_open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Frame Time: {:.3}ms", 1000.0 * dt));
                ui.label(format!("FPS: {:.3}", 1.0 / dt));
                ui.label(format!("Bodies: {}", self.sim.current().len()));
                ui.label(format!("Buffered Frames: {}", self.sim.buffer().len()));
                if self.sim.is_paused() {
                    ui.label("Paused");
                }
                if self.lagging {
                    ui.label("The simulation is lagging!");
                }
                if let Some(err) = &self.last_error {
                    ui.label(format!("Last error: {err}"));
                }
            });
    }

    fn keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Escape) {
                self.menu_open = !self.menu_open;
            }
            if i.key_pressed(egui::Key::Space) {
                self.sim.toggle_pause();
            }
            if i.key_pressed(egui::Key::R) {
                eprintln!("resetting simulation");
                self.sim.reset();
                self.last_error = None;
            }
            if i.key_pressed(egui::Key::F3) {
                self.stats_open = !self.stats_open;
            }
        });
    }

    fn world_input(&mut self, response: &egui::Response, rect: egui::Rect, ui: &egui::Ui) {
        self.camera.width = rect.width() as f64;
        self.camera.height = rect.height() as f64;

        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.camera.pan(Vector2 {
                x: delta.x as f64,
                y: delta.y as f64,
            });
        }

        if response.hovered() {
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                self.camera.zoom(scroll as f64);
            }
        }

        if response.clicked_by(egui::PointerButton::Secondary)
            && let Some(hover_pos) = response.interact_pointer_pos()
        {
            let mouse_pos = Vector2 {
                x: (hover_pos.x - rect.left_top().x) as f64,
                y: (hover_pos.y - rect.left_top().y) as f64,
            };
            let world_pos = self.camera.screen_to_world(mouse_pos);
            if let Err(err) = self.sim.spawn_body(world_pos) {
                report(&mut self.last_error, format!("could not create body: {err}"));
            }
        }
    }

    fn draw(&mut self, d: &mut DrawHandler) {
        for body in self.sim.current().iter() {
            d.circle(body.pos, body.radius, body.color.rgb());
        }
        match self.sim.path_frames() {
            Ok(frames) => {
                for frame in frames {
                    for body in frame.iter() {
                        d.dot(body.pos, body.color.rgb());
                    }
                }
            }
            Err(err) => {
                report(&mut self.last_error, format!("could not compute paths: {err}"));
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let time = std::time::Instant::now();
        let dt = time - self.last_time.unwrap_or(time);
        self.last_time = Some(time);

        let dt = dt.as_secs_f64();

        self.keyboard(ctx);
        self.menu(ctx);
        self.stats(ctx, dt);

        egui::TopBottomPanel::bottom("Hint").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label("Right click anywhere to create a new body");
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

                self.world_input(&response, rect, ui);
                self.move_time(dt);

                let mut d = DrawHandler::new();
                self.draw(&mut d);
                d.paint(&ui.painter_at(rect), rect, &self.camera);
            });

        ctx.request_repaint();
    }
}

/// Logs `message` to stderr unless it repeats the last one. Returns whether it
/// was logged.
fn report(last_error: &mut Option<String>, message: String) -> bool {
    if last_error.as_deref() == Some(message.as_str()) {
        return false;
    }
    eprintln!("{message}");
    *last_error = Some(message);
    true
}

fn load_config() -> anyhow::Result<SimConfig> {
    match std::env::args().nth(1) {
        Some(path) => SimConfig::load(path),
        None => Ok(SimConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let app = App::new(config)?;
    eframe::run_native(
        "Orbit Simulator",
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([1500.0, 720.0]),
            ..Default::default()
        },
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("running window: {err}"))
}
