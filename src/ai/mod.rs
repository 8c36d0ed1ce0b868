//! Creature controllers.
//!
//! Each creature is a finite state machine layered on a shared movement
//! base: smoothed terrain snapping, rate-capped facing, and generic wander.
//! Controllers mutate only their own state; anything they do to the player
//! (damage, knockback) is returned to the update driver and applied after
//! iteration.

pub mod boss;
pub mod brawler;
pub mod skirmisher;

use glam::Vec3;
use rand::Rng;

use crate::components::Transform;
use crate::constants::*;
use crate::world::WorldContext;

pub use boss::{Boss, BossState};
pub use brawler::{Brawler, BrawlerState};
pub use skirmisher::{Skirmisher, SkirmisherState};

/// Read-only view of the player taken at the start of the tick.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSnapshot {
    pub pos: Vec3,
    pub blocking: bool,
}

/// Damage a controller wants applied to the player this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerHit {
    pub damage: i32,
    pub knockback: Vec3,
}

/// Smoothly snap a grounded creature's height to the terrain.
pub fn snap_to_terrain(tf: &mut Transform, ctx: &impl WorldContext, dt: f32) {
    let ground = ctx.terrain_height_at(tf.pos.x, tf.pos.z);
    let k = (TERRAIN_SNAP_RATE * dt).min(1.0);
    tf.pos.y += (ground - tf.pos.y) * k;
}

/// Turn facing toward a target point, capped at [`TURN_RATE`] radians/s.
/// Returns the remaining absolute yaw error after the turn.
pub fn turn_toward(tf: &mut Transform, target: Vec3, dt: f32) -> f32 {
    let dx = target.x - tf.pos.x;
    let dz = target.z - tf.pos.z;
    if dx * dx + dz * dz < 1e-8 {
        return 0.0;
    }
    let desired = dx.atan2(dz);
    let mut err = desired - tf.yaw;
    // wrap into [-pi, pi]
    while err > std::f32::consts::PI {
        err -= std::f32::consts::TAU;
    }
    while err < -std::f32::consts::PI {
        err += std::f32::consts::TAU;
    }
    let max_turn = TURN_RATE * dt;
    let step = err.clamp(-max_turn, max_turn);
    tf.yaw += step;
    (err - step).abs()
}

/// Move on the XZ plane, resolving overlap with nearby static obstacles by
/// pushing out along the contact normal.
pub fn move_planar(tf: &mut Transform, dir: Vec3, speed: f32, ctx: &impl WorldContext, dt: f32) {
    let planar = Vec3::new(dir.x, 0.0, dir.z);
    let len = planar.length();
    if len < 1e-6 {
        return;
    }
    tf.pos += planar / len * speed * dt;
    for ob in ctx.nearby_obstacles(tf.pos, ob_query_radius(speed, dt)) {
        let mut dx = tf.pos.x - ob.pos.x;
        let mut dz = tf.pos.z - ob.pos.z;
        let d2 = dx * dx + dz * dz;
        if d2 < ob.radius * ob.radius {
            let d = d2.sqrt().max(1e-4);
            dx /= d;
            dz /= d;
            let overlap = ob.radius - d;
            tf.pos.x += dx * overlap;
            tf.pos.z += dz * overlap;
        }
    }
}

fn ob_query_radius(speed: f32, dt: f32) -> f32 {
    (speed * dt).max(1.0) + 2.0
}

/// Generic wander: hold a heading for a while, then re-roll it.
#[derive(Debug, Clone, Copy)]
pub struct WanderState {
    heading: f32,
    reroll_left: f32,
}

impl Default for WanderState {
    fn default() -> Self {
        Self {
            heading: 0.0,
            reroll_left: 0.0,
        }
    }
}

impl WanderState {
    /// Advance the wander heading and move the creature along it.
    /// Returns the speed actually used (for locomotion blending).
    pub fn update(
        &mut self,
        tf: &mut Transform,
        base_speed: f32,
        ctx: &impl WorldContext,
        rng: &mut impl Rng,
        dt: f32,
    ) -> f32 {
        self.reroll_left -= dt;
        if self.reroll_left <= 0.0 {
            self.heading = rng.gen_range(0.0..std::f32::consts::TAU);
            self.reroll_left = WANDER_REROLL_INTERVAL * rng.gen_range(0.6..1.4);
        }
        let speed = base_speed * WANDER_SPEED_FRACTION;
        let target = tf.pos + Vec3::new(self.heading.sin(), 0.0, self.heading.cos()) * 4.0;
        turn_toward(tf, target, dt);
        let forward = tf.forward();
        move_planar(tf, forward, speed, ctx, dt);
        speed
    }
}
