//! External spatial collaborators.
//!
//! Terrain and obstacle queries are owned by the host world; the combat
//! subsystem only consumes them through this trait, which keeps every
//! controller testable against a flat synthetic world.

use glam::Vec3;

/// A static blocker near a creature, used for movement resolution.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub pos: Vec3,
    pub radius: f32,
}

/// Spatial queries the combat systems need from the host world.
pub trait WorldContext {
    /// Terrain height at a planar position.
    fn terrain_height_at(&self, x: f32, z: f32) -> f32;

    /// Static obstacles within `radius` of `pos`.
    fn nearby_obstacles(&self, pos: Vec3, radius: f32) -> Vec<Obstacle>;
}

/// Flat, empty world used by unit tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatWorld {
    pub height: f32,
}

impl WorldContext for FlatWorld {
    fn terrain_height_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }

    fn nearby_obstacles(&self, _pos: Vec3, _radius: f32) -> Vec<Obstacle> {
        Vec::new()
    }
}
