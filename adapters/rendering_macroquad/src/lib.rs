#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Pixel Plane.
//!
//! Sound playback needs macroquad's audio stack, which links against ALSA.
//! The `pixel-plane` binary enables this crate's `audio` feature by default;
//! headless builds opt out with `--no-default-features`, in which case sound
//! cues are only logged.

mod audio;
mod sprites;

use anyhow::{Context, Result};
use glam::Vec2;
use log::info;
use macroquad::input::{is_key_down, is_key_pressed, touches, KeyCode, TouchPhase};
use pixel_plane_core::HeldDirections;
use pixel_plane_rendering::{
    projectile_primitive, star_primitive, FrameInput, Presentation, Primitive, RenderingBackend,
    Scene, TextLabel,
};
use std::{
    collections::VecDeque,
    sync::mpsc,
    time::{Duration, Instant},
};

use self::sprites::{sprite_dest, PlayerTexture};

/// Keys observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardState {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// `W` or `Up`.
    up: bool,
    /// `S` or `Down`.
    down: bool,
    /// `A` or `Left`.
    left: bool,
    /// `D` or `Right`.
    right: bool,
    /// `Space` went down this frame.
    fire_pressed: bool,
}

impl KeyboardState {
    fn poll() -> Self {
        let held = |primary: KeyCode, arrow: KeyCode| is_key_down(primary) || is_key_down(arrow);

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            up: held(KeyCode::W, KeyCode::Up),
            down: held(KeyCode::S, KeyCode::Down),
            left: held(KeyCode::A, KeyCode::Left),
            right: held(KeyCode::D, KeyCode::Right),
            fire_pressed: is_key_pressed(KeyCode::Space),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            match self.frame_times.pop_front() {
                Some(removed) => {
                    self.window_duration = self.window_duration.saturating_sub(removed);
                }
                None => break,
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update: self.update_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            canvas,
            clear_color,
            scene,
            player_sprite,
            soundtrack,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: canvas.x as i32,
            window_height: canvas.y as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;

            let player_texture = match PlayerTexture::new(&player_sprite)
                .context("failed to build the player texture")
            {
                Ok(texture) => texture,
                Err(error) => {
                    let _ = init_sender.send(Err(error));
                    return;
                }
            };

            let mut audio = match audio::open(soundtrack.as_ref())
                .await
                .context("failed to initialise audio")
            {
                Ok(audio) => audio,
                Err(error) => {
                    let _ = init_sender.send(Err(error));
                    return;
                }
            };
            let _ = init_sender.send(Ok(()));
            audio.start_background();

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardState::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let metrics = CanvasMetrics::fit(
                    canvas,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let started_touches: Vec<Vec2> = touches()
                    .into_iter()
                    .filter(|touch| touch.phase == TouchPhase::Started)
                    .map(|touch| Vec2::new(touch.position.x, touch.position.y))
                    .collect();
                let frame_input =
                    gather_frame_input_from_observations(keyboard, &started_touches, &metrics);

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                for cue in scene.sound_cues.drain(..) {
                    audio.play(cue);
                }
                let update_duration = update_start.elapsed();

                let render_start = Instant::now();
                draw_scene(&scene, &metrics, &player_texture);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    update: update_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_update,
                        avg_render,
                    }) = fps_metrics
                    {
                        info!(
                            "FPS: {:.2} (10s avg: {:.2}) | update: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_update.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// Maps the logical canvas onto the window, preserving its aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CanvasMetrics {
    canvas: Vec2,
    scale: f32,
    offset: Vec2,
}

impl CanvasMetrics {
    fn fit(canvas: Vec2, screen_width: f32, screen_height: f32) -> Self {
        let scale = if canvas.x <= f32::EPSILON || canvas.y <= f32::EPSILON {
            1.0
        } else {
            (screen_width / canvas.x).min(screen_height / canvas.y)
        };
        let offset = Vec2::new(
            ((screen_width - canvas.x * scale) * 0.5).max(0.0),
            ((screen_height - canvas.y * scale) * 0.5).max(0.0),
        );
        Self {
            canvas,
            scale,
            offset,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }

    /// Canvas position under a screen point, `None` inside the letterbox bars.
    fn to_canvas(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let position = (screen - self.offset) / self.scale;
        let inside = position.x >= 0.0
            && position.y >= 0.0
            && position.x < self.canvas.x
            && position.y < self.canvas.y;
        inside.then_some(position)
    }
}

fn gather_frame_input_from_observations(
    keyboard: KeyboardState,
    started_touches: &[Vec2],
    metrics: &CanvasMetrics,
) -> FrameInput {
    FrameInput {
        held: HeldDirections {
            up: keyboard.up,
            down: keyboard.down,
            left: keyboard.left,
            right: keyboard.right,
        },
        fire_pressed: keyboard.fire_pressed,
        touches: started_touches
            .iter()
            .filter_map(|touch| metrics.to_canvas(*touch))
            .collect(),
    }
}

fn draw_scene(scene: &Scene, metrics: &CanvasMetrics, player_texture: &PlayerTexture) {
    for star in &scene.stars {
        draw_primitive(star_primitive(*star), metrics);
    }

    let (origin, size) = sprite_dest(&scene.player, player_texture.size(), metrics);
    player_texture.draw(origin, size);

    for projectile in &scene.projectiles {
        draw_primitive(projectile_primitive(*projectile), metrics);
    }

    for enemy in &scene.enemies {
        for primitive in enemy.glyph() {
            draw_primitive(primitive, metrics);
        }
    }

    for label in &scene.labels {
        draw_label(label, metrics);
    }
}

fn draw_primitive(primitive: Primitive, metrics: &CanvasMetrics) {
    match primitive {
        Primitive::FillCircle {
            center,
            radius,
            color,
        } => {
            let center = metrics.to_screen(center);
            macroquad::shapes::draw_circle(
                center.x,
                center.y,
                radius * metrics.scale,
                to_macroquad_color(color),
            );
        }
        Primitive::FillRect {
            origin,
            size,
            color,
        } => {
            let origin = metrics.to_screen(origin);
            let size = size * metrics.scale;
            macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                size.x,
                size.y,
                to_macroquad_color(color),
            );
        }
        Primitive::StrokeLine {
            from,
            to,
            thickness,
            color,
        } => {
            let from = metrics.to_screen(from);
            let to = metrics.to_screen(to);
            macroquad::shapes::draw_line(
                from.x,
                from.y,
                to.x,
                to.y,
                thickness * metrics.scale,
                to_macroquad_color(color),
            );
        }
    }
}

/// Label positions name the top-left corner; macroquad draws from the baseline.
fn draw_label(label: &TextLabel, metrics: &CanvasMetrics) {
    let baseline = metrics.to_screen(label.position + Vec2::new(0.0, label.size));
    let _ = macroquad::text::draw_text(
        &label.text,
        baseline.x,
        baseline.y,
        label.size * metrics.scale,
        to_macroquad_color(label.color),
    );
}

fn to_macroquad_color(color: pixel_plane_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Vec2 {
        Vec2::new(680.0, 480.0)
    }

    #[test]
    fn metrics_letterbox_wide_windows() {
        let metrics = CanvasMetrics::fit(canvas(), 1360.0, 600.0);

        assert_eq!(metrics.scale, 1.25);
        assert_eq!(metrics.offset, Vec2::new(255.0, 0.0));
    }

    #[test]
    fn canvas_mapping_inverts_screen_mapping() {
        let metrics = CanvasMetrics::fit(canvas(), 1360.0, 1200.0);
        let point = Vec2::new(340.0, 120.0);

        assert_eq!(metrics.to_canvas(metrics.to_screen(point)), Some(point));
    }

    #[test]
    fn touches_in_letterbox_bars_are_ignored() {
        let metrics = CanvasMetrics::fit(canvas(), 1360.0, 600.0);
        let keyboard = KeyboardState {
            right: true,
            fire_pressed: true,
            ..KeyboardState::default()
        };

        let input = gather_frame_input_from_observations(
            keyboard,
            &[Vec2::new(100.0, 300.0), Vec2::new(680.0, 300.0)],
            &metrics,
        );

        assert!(input.held.right && !input.held.left);
        assert!(input.fire_pressed);
        assert_eq!(input.touches, vec![Vec2::new(340.0, 240.0)]);
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = FrameBreakdown {
            frame: Duration::from_millis(250),
            update: Duration::from_millis(2),
            render: Duration::from_millis(4),
        };

        for _ in 0..3 {
            assert!(counter.record_frame(frame).is_none());
        }
        let metrics = counter.record_frame(frame).expect("one second elapsed");

        assert_eq!(metrics.per_second, 4.0);
        assert_eq!(metrics.avg_update, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(4));
        assert!(counter.record_frame(frame).is_none());
    }
}
