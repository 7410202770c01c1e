//! Two-layer scrolling starfield.

use pixel_plane_core::{tuning, Point2D, StarLayer};
use rand::Rng;

#[derive(Debug)]
pub(crate) struct Starfield {
    front: Vec<Point2D>,
    back: Vec<Point2D>,
}

impl Starfield {
    /// Scatters stars over lattice points of both layers.
    pub(crate) fn scatter<R: Rng>(rng: &mut R) -> Self {
        Self {
            front: scatter_layer(rng, tuning::FRONT_STAR_SPACING, tuning::FRONT_STAR_ODDS),
            back: scatter_layer(rng, tuning::BACK_STAR_SPACING, tuning::BACK_STAR_ODDS),
        }
    }

    pub(crate) fn layer(&self, layer: StarLayer) -> &[Point2D] {
        match layer {
            StarLayer::Front => &self.front,
            StarLayer::Back => &self.back,
        }
    }

    pub(crate) fn advance<R: Rng>(&mut self, rng: &mut R) {
        fall(&mut self.front, StarLayer::Front.speed(), rng);
        fall(&mut self.back, StarLayer::Back.speed(), rng);
    }
}

fn scatter_layer<R: Rng>(rng: &mut R, spacing: usize, odds: u32) -> Vec<Point2D> {
    let mut stars = Vec::new();
    for x in (0..=tuning::CANVAS_WIDTH as usize).step_by(spacing) {
        for y in (0..=tuning::CANVAS_HEIGHT as usize).step_by(spacing) {
            if rng.gen_range(0..odds) == 1 {
                stars.push(Point2D::new(x as f32, y as f32));
            }
        }
    }
    stars
}

fn fall<R: Rng>(stars: &mut [Point2D], speed: f32, rng: &mut R) {
    for star in stars {
        star.y += speed;
        if star.y > tuning::CANVAS_HEIGHT {
            star.y = 0.0;
            star.x = rng.gen_range(0..tuning::CANVAS_WIDTH as u32) as f32;
        }
    }
}
