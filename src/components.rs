//! Core components stored on combat actors in the `hecs` world.

use glam::Vec3;

/// World pose: position plus facing yaw (radians, around +Y).
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub pos: Vec3,
    pub yaw: f32,
}

impl Transform {
    pub fn new(pos: Vec3, yaw: f32) -> Self {
        Self { pos, yaw }
    }

    /// Unit forward vector on the XZ plane derived from yaw.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Planar (XZ) distance to another position.
    pub fn planar_distance(&self, other: Vec3) -> f32 {
        let dx = other.x - self.pos.x;
        let dz = other.z - self.pos.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Velocity component - world units per second.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity(pub Vec3);

/// Health component
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn damage(&mut self, amount: i32) {
        self.current = (self.current - amount).max(0);
    }

    pub fn percentage(&self) -> f32 {
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }
}

/// Whether the actor is currently holding a block (reduces melee damage).
#[derive(Debug, Clone, Copy, Default)]
pub struct Blocking(pub bool);

/// Collision radius used by cone tests and swept projectile checks.
#[derive(Debug, Clone, Copy)]
pub struct BodyRadius(pub f32);

/// Player marker component
#[derive(Debug, Clone, Copy)]
pub struct Player;

/// Marks an entity as a living enemy eligible for targeting and XP reward.
#[derive(Debug, Clone, Copy)]
pub struct EnemyTag {
    pub xp_reward: u32,
}

impl EnemyTag {
    pub fn new(xp_reward: u32) -> Self {
        Self { xp_reward }
    }
}

/// Death-fade countdown; the creature despawns when it reaches zero.
#[derive(Debug, Clone, Copy)]
pub struct DeathFade {
    pub remaining: f32,
}

impl DeathFade {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
        }
    }
}
