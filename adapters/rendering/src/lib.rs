#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Pixel Plane adapters.
//!
//! Coordinates in this crate are expressed on the logical 680×480 canvas;
//! backends are responsible for letterboxing the canvas into the window.

pub mod audio;
mod glyph;
mod sprite;

use anyhow::Result as AnyResult;
use glam::Vec2;
use pixel_plane_core::{
    tuning, EnemyView, GamePhase, HeldDirections, PlayerSnapshot, Point2D, ProjectileView,
};
use std::time::Duration;
use thiserror::Error;

pub use self::audio::{SoundCue, Soundtrack};
pub use self::sprite::PixelSprite;

/// Radius of every star in both layers.
pub const STAR_RADIUS: f32 = 2.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha replaced, clamped to 0.0..=1.0.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Channels quantised to bytes in RGBA order.
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantise(self.red),
            quantise(self.green),
            quantise(self.blue),
            quantise(self.alpha),
        ]
    }
}

fn quantise(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Directions currently held down.
    pub held: HeldDirections,
    /// Whether the fire key went down on this frame.
    pub fire_pressed: bool,
    /// Touches that began on this frame, in canvas coordinates.
    pub touches: Vec<Vec2>,
}

/// Vector primitive drawn onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    /// Filled circle.
    FillCircle {
        /// Centre of the circle.
        center: Vec2,
        /// Radius of the circle.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Filled axis-aligned rectangle.
    FillRect {
        /// Top-left corner.
        origin: Vec2,
        /// Width and height.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
    /// Stroked line segment.
    StrokeLine {
        /// Start of the segment.
        from: Vec2,
        /// End of the segment.
        to: Vec2,
        /// Stroke width.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
}

/// Primitive used to draw a projectile centred at `position`.
#[must_use]
pub fn projectile_primitive(position: Vec2) -> Primitive {
    Primitive::FillRect {
        origin: position - Vec2::new(2.0, 10.0),
        size: Vec2::new(6.0, 12.0),
        color: Color::from_rgb_u8(255, 255, 0),
    }
}

/// Primitive used to draw a star at `position`.
#[must_use]
pub fn star_primitive(position: Vec2) -> Primitive {
    Primitive::FillCircle {
        center: position,
        radius: STAR_RADIUS,
        color: Color::WHITE,
    }
}

/// Text drawn on top of the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    /// Text content.
    pub text: String,
    /// Top-left corner of the text block.
    pub position: Vec2,
    /// Font size in canvas pixels.
    pub size: f32,
    /// Text color.
    pub color: Color,
}

impl TextLabel {
    /// Creates a new white label.
    #[must_use]
    pub fn new<T>(text: T, position: Vec2, size: f32) -> Self
    where
        T: Into<String>,
    {
        Self {
            text: text.into(),
            position,
            size,
            color: Color::WHITE,
        }
    }
}

/// Placement of the player's sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Centre of the craft.
    pub position: Vec2,
    /// Scale applied to the pixel sprite.
    pub scale: f32,
    /// Horizontal half-extent of the craft.
    pub half_width: f32,
}

impl PlayerPresentation {
    /// Creates a presentation from a player snapshot.
    #[must_use]
    pub fn from_snapshot(player: &PlayerSnapshot) -> Self {
        Self {
            position: to_vec2(player.position),
            scale: player.scale as f32,
            half_width: player.half_width as f32,
        }
    }

    /// Top-left corner at which the scaled sprite is blitted.
    #[must_use]
    pub fn sprite_origin(&self) -> Vec2 {
        Vec2::new(self.position.x - 3.0 * self.half_width, self.position.y)
    }
}

/// Enemy drawn as a procedural glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Centre of the glyph.
    pub position: Vec2,
    /// Health in the range 0..=100 driving the body color.
    pub health: u8,
    /// Opacity in the range 0.0..=1.0.
    pub fade: f32,
}

/// Read-only world data a scene is refreshed from.
#[derive(Clone, Copy, Debug)]
pub struct WorldFrame<'a> {
    /// Lifecycle phase.
    pub phase: GamePhase,
    /// Player snapshot.
    pub player: &'a PlayerSnapshot,
    /// Enemies in spawn order.
    pub enemies: &'a EnemyView,
    /// Live projectiles.
    pub projectiles: &'a ProjectileView,
    /// Front star layer.
    pub front_stars: &'a [Point2D],
    /// Back star layer.
    pub back_stars: &'a [Point2D],
}

/// Scene description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Lifecycle phase the scene was captured in.
    pub phase: GamePhase,
    /// Stars of both layers.
    pub stars: Vec<Vec2>,
    /// Player placement.
    pub player: PlayerPresentation,
    /// Projectile centres.
    pub projectiles: Vec<Vec2>,
    /// Enemies drawn this frame.
    pub enemies: Vec<EnemyPresentation>,
    /// Score, start and game-over text.
    pub labels: Vec<TextLabel>,
    /// Sound cues raised since the backend last drained them.
    pub sound_cues: Vec<SoundCue>,
}

impl Scene {
    /// Creates an empty scene with the player at `player`.
    #[must_use]
    pub fn new(phase: GamePhase, player: PlayerPresentation) -> Self {
        Self {
            phase,
            stars: Vec::new(),
            player,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            labels: Vec::new(),
            sound_cues: Vec::new(),
        }
    }

    /// Rebuilds every visual element from `frame`, keeping pending sound cues.
    pub fn refresh(&mut self, frame: &WorldFrame<'_>) {
        self.phase = frame.phase;
        self.player = PlayerPresentation::from_snapshot(frame.player);

        self.stars.clear();
        self.stars.extend(
            frame
                .front_stars
                .iter()
                .chain(frame.back_stars)
                .copied()
                .map(to_vec2),
        );

        self.projectiles.clear();
        self.projectiles
            .extend(frame.projectiles.iter().map(|projectile| to_vec2(projectile.position)));

        self.enemies.clear();
        if frame.phase.is_running() {
            self.enemies
                .extend(frame.enemies.iter().map(|enemy| EnemyPresentation {
                    position: to_vec2(enemy.position),
                    health: enemy.health,
                    fade: enemy.fade,
                }));
        }

        self.labels.clear();
        self.labels.push(TextLabel::new(
            format!("Score : {}", frame.player.score),
            Vec2::new(tuning::CANVAS_WIDTH - 100.0, 20.0),
            16.0,
        ));
        let center = Vec2::new(tuning::CANVAS_WIDTH / 2.0, tuning::CANVAS_HEIGHT / 2.0);
        match frame.phase {
            GamePhase::NotStarted => {
                let prompt = "Press SpaceBar to Start!!";
                let offset = prompt.len() as f32 * 5.0;
                self.labels.push(TextLabel::new(
                    prompt,
                    Vec2::new(center.x - offset, center.y),
                    24.0,
                ));
            }
            GamePhase::GameOver => {
                self.labels.push(TextLabel::new(
                    "Press Space to Start!!",
                    center - Vec2::new(0.0, 100.0),
                    24.0,
                ));
                self.labels.push(TextLabel::new(
                    format!("Final Score : {}", frame.player.score),
                    center - Vec2::new(0.0, 70.0),
                    16.0,
                ));
            }
            GamePhase::Running => {}
        }
    }
}

fn to_vec2(point: Point2D) -> Vec2 {
    Vec2::new(point.x, point.y)
}

/// Static configuration handed to a backend when it starts.
#[derive(Clone, Debug)]
pub struct Presentation {
    /// Title used for the window.
    pub window_title: String,
    /// Size of the logical canvas.
    pub canvas: Vec2,
    /// Color used to clear the canvas.
    pub clear_color: Color,
    /// Initial scene.
    pub scene: Scene,
    /// Pixel art used for the player craft.
    pub player_sprite: PixelSprite,
    /// Clips to play, or `None` when audio is muted.
    pub soundtrack: Option<Soundtrack>,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        scene: Scene,
        player_sprite: PixelSprite,
        soundtrack: Option<Soundtrack>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            canvas: Vec2::new(tuning::CANVAS_WIDTH, tuning::CANVAS_HEIGHT),
            clear_color: Color::BLACK,
            scene,
            player_sprite,
            soundtrack,
        }
    }
}

/// Rendering backend capable of presenting Pixel Plane scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered. Sound cues left in the scene are played and drained by the
    /// backend after every update.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// The pixel map has no rows or no columns.
    #[error("sprite pixel map is empty")]
    EmptySprite,
    /// A row of the pixel map differs in width from the first row.
    #[error("sprite row {row} has {found} pixels, expected {expected}")]
    RaggedSprite {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// The pixel map uses a symbol with no palette entry.
    #[error("sprite pixel '{symbol}' at ({column}, {row}) has no palette entry")]
    UnknownPixel {
        /// Offending symbol.
        symbol: char,
        /// Zero-based column.
        column: usize,
        /// Zero-based row.
        row: usize,
    },
}
