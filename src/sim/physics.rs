//! Reference physics
//!
//! Stands in for the engine's rigid-body step: balls fall under gravity,
//! bounce off the edge loop and off static bouncers, and each new
//! ball/bouncer overlap is reported to the contact resolver once.

use glam::Vec2;

use super::collision::{ball_circle_collision, ball_edge_loop_collision, bounce_velocity};
use super::contact::EntityRef;
use super::state::GameState;

/// Extra distance a touching pair may drift apart and still count as touching
const CONTACT_SLOP: f32 = 1.0;
/// Below this speed a ball resting on a bouncer gets nudged off it
const REST_SPEED: f32 = 5.0;
/// Sideways kick for a resting ball (points/s)
const REST_NUDGE: f32 = 40.0;

/// Advance every ball by `dt` and resolve the contacts that began
pub fn step(state: &mut GameState, dt: f32) {
    let gravity = state.gravity;
    let config = &state.config;
    let half = config.half_width();
    let edge_min = Vec2::new(-half, config.min_y() - config.edge_overhang);
    let edge_max = Vec2::new(half, config.max_y() + config.edge_overhang);
    let (bouncer_restitution, wall_restitution) =
        (config.bouncer_restitution, config.wall_restitution);

    // Deferred so the resolver can mutate bouncers after the sweep
    let mut began: Vec<(u32, u32)> = Vec::new();

    for ball in &mut state.balls {
        ball.vel += gravity * dt;
        ball.pos += ball.vel * dt;

        let wall = ball_edge_loop_collision(ball.pos, ball.radius, edge_min, edge_max);
        if wall.hit {
            ball.pos += wall.normal * wall.penetration;
            ball.vel = bounce_velocity(ball.vel, wall.normal, wall_restitution);
        }

        let mut touching = Vec::with_capacity(ball.touching.len());
        for bouncer in &state.bouncers {
            let was_touching = ball.touching.contains(&bouncer.id);
            let hit = ball_circle_collision(ball.pos, ball.radius, bouncer.pos, bouncer.radius);
            if hit.hit {
                ball.pos += hit.normal * hit.penetration;
                ball.vel = bounce_velocity(ball.vel, hit.normal, bouncer_restitution);
                if ball.vel.length() < REST_SPEED {
                    // Balanced on top: tip it toward whichever side it leans
                    let side = if hit.normal.x < 0.0 { -1.0 } else { 1.0 };
                    ball.vel.x += side * REST_NUDGE;
                }
                touching.push(bouncer.id);
                if !was_touching {
                    began.push((ball.id, bouncer.id));
                }
            } else if was_touching
                && ball.pos.distance(bouncer.pos) <= ball.radius + bouncer.radius + CONTACT_SLOP
            {
                touching.push(bouncer.id);
            }
        }
        ball.touching = touching;
    }

    for (ball_id, bouncer_id) in began {
        state.on_contact(EntityRef::ball(ball_id), EntityRef::bouncer(bouncer_id));
    }
}
