// ui.rs - Input handling and drawing for the Life window

use eframe::egui;
use egui::{Align2, Color32, FontId, Rect, Sense, Stroke, Vec2};
use std::time::Instant;
use tracing::warn;

use life_engine::patterns::PATTERNS;

use crate::driver::cell_at;
use crate::LifeApp;

const LINE_COLOR: Color32 = Color32::GRAY;
const LIVE_COLOR: Color32 = Color32::BLACK;
const TEXT_COLOR: Color32 = Color32::RED;

/// Number keys 1-6 stamp the matching entry of `PATTERNS` at the grid centre.
const PATTERN_KEYS: [egui::Key; 6] = [
    egui::Key::Num1,
    egui::Key::Num2,
    egui::Key::Num3,
    egui::Key::Num4,
    egui::Key::Num5,
    egui::Key::Num6,
];

/// Keys and wheel movement seen this frame.
#[derive(Default)]
struct FrameInput {
    toggle_running: bool,
    randomize: bool,
    clear: bool,
    shift: bool,
    pattern: Option<usize>,
    scroll_up: u32,
    scroll_down: u32,
}

impl LifeApp {
    fn read_input(ctx: &egui::Context) -> FrameInput {
        ctx.input(|i| {
            let mut input = FrameInput {
                toggle_running: i.key_pressed(egui::Key::Space),
                randomize: i.key_pressed(egui::Key::R),
                clear: i.key_pressed(egui::Key::C),
                shift: i.modifiers.shift,
                pattern: PATTERN_KEYS.iter().position(|&key| i.key_pressed(key)),
                ..Default::default()
            };
            for event in &i.events {
                if let egui::Event::Scroll(delta) = event {
                    if delta.y > 0.0 {
                        input.scroll_up += 1;
                    } else if delta.y < 0.0 {
                        input.scroll_down += 1;
                    }
                }
            }
            input
        })
    }

    fn apply_input(&mut self, input: FrameInput, now: Instant) {
        if input.toggle_running {
            self.state.toggle_running();
            self.last_step = now;
        }
        if input.randomize {
            self.grid.randomize();
        }
        if input.clear {
            self.grid.clear();
        }
        if let Some(pattern) = input.pattern.and_then(|i| PATTERNS.get(i)) {
            self.stamp_centered(pattern);
        }
        // Shift has no key event of its own; act on the press edge.
        if input.shift && !self.shift_down {
            self.state.toggle_music(now);
        }
        self.shift_down = input.shift;

        for _ in 0..input.scroll_up {
            self.state.speed_up();
        }
        for _ in 0..input.scroll_down {
            self.state.slow_down();
        }
    }

    fn draw_grid(&self, painter: &egui::Painter, area: Rect) {
        let cell = self.cell_size;
        let origin = area.min;

        painter.rect_filled(area, 0.0, Color32::WHITE);

        let line = Stroke::new(1.0, LINE_COLOR);
        for col in 0..=self.grid.cols() {
            let x = origin.x + col as f32 * cell;
            painter.line_segment([egui::pos2(x, area.min.y), egui::pos2(x, area.max.y)], line);
        }
        for row in 0..=self.grid.rows() {
            let y = origin.y + row as f32 * cell;
            painter.line_segment([egui::pos2(area.min.x, y), egui::pos2(area.max.x, y)], line);
        }

        for (row, col) in self.grid.live_cells() {
            let rect = Rect::from_min_size(
                egui::pos2(origin.x + col as f32 * cell, origin.y + row as f32 * cell),
                Vec2::splat(cell - 1.0),
            );
            painter.rect_filled(rect, 0.0, LIVE_COLOR);
        }
    }

    fn draw_overlay(&self, painter: &egui::Painter, area: Rect, now: Instant) {
        let font = FontId::proportional(18.0);
        let music_secs = self.state.music_position(now).as_secs();
        let lines = [
            format!("Speed: {} FPS", self.state.speed()),
            format!(
                "Music: {} ({}:{:02})",
                if self.state.music_playing() { "ON" } else { "OFF" },
                music_secs / 60,
                music_secs % 60
            ),
            format!("Generation: {}", self.grid.generation()),
            format!("Population: {}", self.grid.population()),
        ];
        for (i, text) in lines.into_iter().enumerate() {
            let pos = area.min + Vec2::new(10.0, 10.0 + 20.0 * i as f32);
            painter.text(pos, Align2::LEFT_TOP, text, font.clone(), TEXT_COLOR);
        }
    }
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let input = Self::read_input(ctx);
        self.apply_input(input, now);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let size = Vec2::new(
                    self.grid.cols() as f32 * self.cell_size,
                    self.grid.rows() as f32 * self.cell_size,
                );
                let (response, painter) = ui.allocate_painter(size, Sense::click());
                let area = response.rect;

                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let local = pos - area.min;
                        if let Some((row, col)) = cell_at(local.x, local.y, self.cell_size) {
                            if let Err(err) = self.grid.toggle_cell(row, col) {
                                warn!(%err, "click ignored");
                            }
                        }
                    }
                }

                self.draw_grid(&painter, area);
                self.draw_overlay(&painter, area, now);
            });

        if self.state.due(self.last_step, now) {
            self.grid.step_concurrent(&self.runtime);
            self.last_step = now;
        }

        // Keep ticking while running, and the music clock while it plays
        if self.state.running() {
            ctx.request_repaint_after(self.state.tick_interval());
        } else if self.state.music_playing() {
            ctx.request_repaint_after(std::time::Duration::from_secs(1));
        }
    }
}
