//! GPU texture for the player's pixel-art plane.

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, FilterMode, Texture2D},
};
use pixel_plane_rendering::{PixelSprite, PlayerPresentation};

use crate::CanvasMetrics;

/// Uploaded player sprite.
pub(crate) struct PlayerTexture {
    texture: Texture2D,
    size: Vec2,
}

impl PlayerTexture {
    /// Uploads the sprite, keeping hard pixel edges when it is scaled up.
    pub(crate) fn new(sprite: &PixelSprite) -> Result<Self> {
        let width = u16::try_from(sprite.width()).context("sprite is too wide for a texture")?;
        let height = u16::try_from(sprite.height()).context("sprite is too tall for a texture")?;
        let texture = Texture2D::from_rgba8(width, height, &sprite.to_rgba8());
        texture.set_filter(FilterMode::Nearest);

        Ok(Self {
            texture,
            size: Vec2::new(f32::from(width), f32::from(height)),
        })
    }

    /// Unscaled size of the sprite in pixels.
    pub(crate) fn size(&self) -> Vec2 {
        self.size
    }

    pub(crate) fn draw(&self, origin: Vec2, dest_size: Vec2) {
        let params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(dest_size.x, dest_size.y)),
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(self.texture, origin.x, origin.y, WHITE, params);
    }
}

/// Screen-space origin and size of the player sprite.
pub(crate) fn sprite_dest(
    player: &PlayerPresentation,
    sprite_size: Vec2,
    metrics: &CanvasMetrics,
) -> (Vec2, Vec2) {
    let origin = metrics.to_screen(player.sprite_origin());
    let size = sprite_size * player.scale * metrics.scale;
    (origin, size)
}
