//! Procedural enemy glyph built from circles and lines.

use glam::Vec2;

use crate::{Color, EnemyPresentation, Primitive};

impl EnemyPresentation {
    /// Body color: red at zero health, green at full health, alpha from fade.
    #[must_use]
    pub fn body_color(&self) -> Color {
        let health = (f32::from(self.health) / 100.0).clamp(0.0, 1.0);
        Color::new(1.0 - health, health, 30.0 / 255.0, 1.0).with_alpha(self.fade)
    }

    /// Primitives composing the glyph, in draw order.
    #[must_use]
    pub fn glyph(&self) -> Vec<Primitive> {
        let center = self.position;
        let body = self.body_color();
        let eye = Color::BLACK.with_alpha(self.fade);
        let eye_glow = Color::from_rgb_u8(255, 80, 80).with_alpha(self.fade);
        let antenna = Color::new(
            (body.red - 20.0 / 255.0).max(0.0),
            (body.green - 40.0 / 255.0).max(0.0),
            (body.blue - 10.0 / 255.0).max(0.0),
            body.alpha,
        );

        let mut primitives = vec![
            circle(center, 12.0, body),
            circle(center + Vec2::new(0.0, 5.0), 10.0, body),
            circle(center + Vec2::new(0.0, -8.0), 8.0, body),
        ];

        for side in [-1.0, 1.0] {
            let eye_center = center + Vec2::new(5.0 * side, -2.0);
            primitives.push(circle(eye_center, 3.5, eye));
            primitives.push(circle(eye_center, 1.5, eye_glow));
        }

        for side in [-1.0, 1.0] {
            let tip = center + Vec2::new(6.0 * side, -16.0);
            primitives.push(line(center + Vec2::new(3.0 * side, -14.0), tip, 1.5, antenna));
            primitives.push(circle(tip, 2.0, antenna));
        }

        for side in [-1.0, 1.0] {
            let shoulder = center + Vec2::new(10.0 * side, 2.0);
            let hand = center + Vec2::new(16.0 * side, 8.0);
            primitives.push(line(shoulder, hand, 2.0, body));
            primitives.push(circle(hand, 2.5, body));
        }

        primitives
    }
}

fn circle(center: Vec2, radius: f32, color: Color) -> Primitive {
    Primitive::FillCircle {
        center,
        radius,
        color,
    }
}

fn line(from: Vec2, to: Vec2, thickness: f32, color: Color) -> Primitive {
    Primitive::StrokeLine {
        from,
        to,
        thickness,
        color,
    }
}
