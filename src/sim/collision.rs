//! Collision detection and response
//!
//! Balls and bouncers are circles; the arena is a rectangular edge loop.
//! Detection returns the contact normal and penetration so the caller can
//! separate the bodies and bounce the ball.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at the contact, pointing toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against a static circle
pub fn ball_circle_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    center: Vec2,
    radius: f32,
) -> CollisionResult {
    let offset = ball_pos - center;
    let dist = offset.length();
    let reach = ball_radius + radius;
    if dist >= reach {
        return CollisionResult::miss();
    }
    // Dead-center overlap: push straight up
    let normal = if dist > f32::EPSILON { offset / dist } else { Vec2::Y };
    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Check a ball against the inside of an axis-aligned edge loop
///
/// Returns the deepest wall contact, if any.
pub fn ball_edge_loop_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    min: Vec2,
    max: Vec2,
) -> CollisionResult {
    let candidates = [
        (ball_pos.x - ball_radius - min.x, Vec2::X),
        (max.x - (ball_pos.x + ball_radius), Vec2::NEG_X),
        (ball_pos.y - ball_radius - min.y, Vec2::Y),
        (max.y - (ball_pos.y + ball_radius), Vec2::NEG_Y),
    ];
    candidates
        .into_iter()
        .filter(|(gap, _)| *gap < 0.0)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(gap, normal)| CollisionResult {
            hit: true,
            normal,
            penetration: -gap,
        })
        .unwrap_or_else(CollisionResult::miss)
}

/// Bounce off a surface, scaling the normal component by `restitution`
///
/// A ball already moving away from the surface keeps its velocity.
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let approach = velocity.dot(normal);
    if approach >= 0.0 {
        return velocity;
    }
    velocity - (1.0 + restitution) * approach * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mirror reflection, the lossless case of [`bounce_velocity`]
    fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
        velocity - 2.0 * velocity.dot(normal) * normal
    }

    #[test]
    fn test_circle_collision_touching() {
        let result = ball_circle_collision(Vec2::new(0.0, 40.0), 16.0, Vec2::ZERO, 32.0);
        assert!(result.hit);
        assert!((result.penetration - 8.0).abs() < 1e-5);
        assert!((result.normal - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_circle_collision_miss() {
        let result = ball_circle_collision(Vec2::new(0.0, 48.5), 16.0, Vec2::ZERO, 32.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_collision_concentric() {
        let result = ball_circle_collision(Vec2::ZERO, 16.0, Vec2::ZERO, 32.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert_eq!(result.penetration, 48.0);
    }

    #[test]
    fn test_edge_loop() {
        let min = Vec2::new(-250.0, -600.0);
        let max = Vec2::new(250.0, 600.0);

        let result = ball_edge_loop_collision(Vec2::ZERO, 16.0, min, max);
        assert!(!result.hit);

        let result = ball_edge_loop_collision(Vec2::new(240.0, 0.0), 16.0, min, max);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_X);
        assert!((result.penetration - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_bounce_with_restitution() {
        let v = bounce_velocity(Vec2::new(50.0, -100.0), Vec2::Y, 0.75);
        assert!((v.x - 50.0).abs() < 1e-4);
        assert!((v.y - 75.0).abs() < 1e-4);

        // Separating already: untouched
        let v = bounce_velocity(Vec2::new(0.0, 10.0), Vec2::Y, 0.75);
        assert_eq!(v, Vec2::new(0.0, 10.0));

        // Full restitution matches a mirror reflection
        let v = Vec2::new(30.0, -40.0);
        assert_eq!(bounce_velocity(v, Vec2::Y, 1.0), reflect_velocity(v, Vec2::Y));
    }
}
