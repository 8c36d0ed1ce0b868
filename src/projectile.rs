//! Pooled homing projectiles with swept collision.
//!
//! Slots are allocated once at startup and toggled active/inactive; a cast
//! never heap-allocates. Collision uses the segment between the previous and
//! current position so fast projectiles cannot tunnel through a target
//! between ticks.

use std::collections::VecDeque;

use glam::{Quat, Vec3};
use hecs::{Entity, World};

use crate::components::{BodyRadius, EnemyTag, Health, Transform};
use crate::constants::*;
use crate::events::{EventQueue, GameEvent};

/// One pooled projectile slot.
#[derive(Debug, Clone)]
pub struct Projectile {
    active: bool,
    pub pos: Vec3,
    prev: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    lifetime: f32,
    pub damage: i32,
    /// Weak target handle; lost targets fall back to straight flight.
    target: Option<Entity>,
    trail: VecDeque<Vec3>,
}

impl Projectile {
    fn new() -> Self {
        Self {
            active: false,
            pos: Vec3::ZERO,
            prev: Vec3::ZERO,
            velocity: Vec3::ZERO,
            radius: PROJECTILE_RADIUS,
            lifetime: 0.0,
            damage: 0,
            target: None,
            trail: VecDeque::with_capacity(TRAIL_CAPACITY),
        }
    }

    /// Arm a slot for flight.
    pub fn activate(
        &mut self,
        origin: Vec3,
        dir: Vec3,
        speed: f32,
        lifetime: f32,
        damage: i32,
        target: Option<Entity>,
    ) {
        self.active = true;
        self.pos = origin;
        self.prev = origin;
        self.velocity = dir.normalize_or_zero() * speed;
        self.lifetime = lifetime;
        self.damage = damage;
        self.target = target;
        self.trail.clear();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.target = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// Drop the lock (target died or despawned).
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Advance position and lifetime; deactivates on expiry.
    pub fn integrate(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.prev = self.pos;
        self.pos += self.velocity * dt;
        if self.trail.len() == TRAIL_CAPACITY {
            self.trail.pop_front();
        }
        self.trail.push_back(self.pos);
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.deactivate();
        }
    }

    /// Rotate the velocity direction toward `target_pos`, capped at
    /// `homing_rate * dt` radians this tick. Speed is preserved.
    pub fn steer_to_target(&mut self, target_pos: Vec3, homing_rate: f32, dt: f32) {
        let speed = self.velocity.length();
        if speed < 1e-5 {
            return;
        }
        let cur = self.velocity / speed;
        let desired = (target_pos - self.pos).normalize_or_zero();
        if desired == Vec3::ZERO {
            return;
        }
        let dot = cur.dot(desired).clamp(-1.0, 1.0);
        let angle = dot.acos();
        let max_turn = homing_rate * dt;
        if angle <= max_turn {
            self.velocity = desired * speed;
            return;
        }
        let axis = cur.cross(desired);
        let axis = if axis.length_squared() < 1e-10 {
            // directly opposed; pick any perpendicular axis
            cur.any_orthogonal_vector()
        } else {
            axis.normalize()
        };
        let rot = Quat::from_axis_angle(axis, max_turn);
        self.velocity = (rot * cur) * speed;
    }

    /// Swept test against candidate spheres over this tick's segment.
    ///
    /// Returns the hit with the smallest segment parameter. Near-static
    /// motion degenerates to a point-distance test at the current position.
    pub fn check_collision(&self, candidates: &[(Entity, Vec3, f32)]) -> Option<(Entity, f32)> {
        if !self.active {
            return None;
        }
        let seg = self.pos - self.prev;
        let seg_len2 = seg.length_squared();
        let mut best: Option<(Entity, f32)> = None;
        for &(id, center, radius) in candidates {
            let hit_dist = self.radius + radius;
            let t = if seg_len2 < SWEEP_DEGENERATE_EPS {
                0.0
            } else {
                ((center - self.prev).dot(seg) / seg_len2).clamp(0.0, 1.0)
            };
            let closest = self.prev + seg * t;
            if (center - closest).length_squared() > hit_dist * hit_dist {
                continue;
            }
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((id, t));
            }
        }
        best
    }

    /// Recent positions, oldest first, for trail rendering.
    pub fn trail(&self) -> impl Iterator<Item = &Vec3> {
        self.trail.iter()
    }
}

/// Fixed-size projectile pool shared by one attack strategy.
#[derive(Debug)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
}

impl ProjectilePool {
    pub fn new(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| Projectile::new()).collect(),
        }
    }

    /// Borrow a free slot. Exhaustion is the caller's non-fatal no-op.
    pub fn acquire(&mut self) -> Option<&mut Projectile> {
        self.slots.iter_mut().find(|p| !p.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.is_active()).count()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter(|p| p.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.slots.iter_mut().filter(|p| p.is_active())
    }
}

/// Per-tick update for all live projectiles in a pool: steer toward live
/// targets, integrate, then resolve swept hits against living enemies.
pub fn update_pool(
    pool: &mut ProjectilePool,
    world: &mut World,
    events: &mut EventQueue,
    dt: f32,
) {
    puffin::profile_function!();

    // snapshot candidates once per tick; centers at chest height so the
    // homing aim point and the collision sphere agree
    let candidates: Vec<(Entity, Vec3, f32)> = world
        .query::<(&Transform, &Health, &EnemyTag, Option<&BodyRadius>)>()
        .iter()
        .filter(|(_, (_, h, _, _))| !h.is_dead())
        .map(|(id, (tf, _, _, radius))| {
            (id, tf.pos + Vec3::Y * 0.9, radius.map_or(0.5, |r| r.0))
        })
        .collect();

    let mut hits: Vec<(Entity, Vec3, i32)> = Vec::new();
    for projectile in pool.iter_active_mut() {
        if let Some(target) = projectile.target() {
            match candidates.iter().find(|(id, _, _)| *id == target) {
                Some(&(_, center, _)) => {
                    projectile.steer_to_target(center, WAND_HOMING_RATE, dt);
                }
                None => projectile.clear_target(),
            }
        }
        projectile.integrate(dt);
        if !projectile.is_active() {
            continue;
        }
        if let Some((victim, _t)) = projectile.check_collision(&candidates) {
            hits.push((victim, projectile.pos, projectile.damage));
            projectile.deactivate();
        }
    }

    for (victim, position, damage) in hits {
        if let Ok(mut health) = world.get::<&mut Health>(victim) {
            health.damage(damage);
        }
        events.push(GameEvent::ProjectileHit {
            target: victim,
            position,
            damage,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrate_expires_and_returns_to_pool() {
        let mut pool = ProjectilePool::new(2);
        let p = pool.acquire().unwrap();
        p.activate(Vec3::ZERO, Vec3::Z, 10.0, 0.5, 5, None);
        assert_eq!(pool.active_count(), 1);
        for p in pool.iter_active_mut() {
            p.integrate(0.3);
            p.integrate(0.3);
        }
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_homing_turn_capped_per_tick() {
        let mut p = Projectile::new();
        p.activate(Vec3::ZERO, Vec3::Z, 10.0, 5.0, 5, None);
        // target 90 degrees off to the right
        let target = Vec3::new(100.0, 0.0, 0.0);
        let rate = 2.0;
        let dt = 0.016;
        let before = p.velocity.normalize();
        p.steer_to_target(target, rate, dt);
        let after = p.velocity.normalize();
        let turned = before.dot(after).clamp(-1.0, 1.0).acos();
        assert!(turned <= rate * dt + 1e-4);
        assert_relative_eq!(turned, rate * dt, epsilon = 1e-3);
        // speed preserved
        assert_relative_eq!(p.velocity.length(), 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_small_angle_snaps_without_overshoot() {
        let mut p = Projectile::new();
        p.activate(Vec3::ZERO, Vec3::Z, 10.0, 5.0, 5, None);
        // target barely off axis; a full turn step would overshoot
        let target = Vec3::new(0.01, 0.0, 100.0);
        p.steer_to_target(target, 5.0, 0.1);
        let desired = (target - p.pos).normalize();
        assert!(p.velocity.normalize().dot(desired) > 0.99999);
    }

    #[test]
    fn test_swept_collision_catches_tunneling() {
        let mut p = Projectile::new();
        p.activate(Vec3::ZERO, Vec3::Z, 100.0, 5.0, 5, None);
        // one tick carries the projectile straight through the target
        p.integrate(0.1);
        assert!(p.pos.z >= 10.0);
        let mut world = World::new();
        let target = world.spawn(());
        let hit = p.check_collision(&[(target, Vec3::new(0.0, 0.0, 5.0), 0.5)]);
        assert!(hit.is_some());
    }

    #[test]
    fn test_earliest_parameter_wins() {
        let mut p = Projectile::new();
        p.activate(Vec3::ZERO, Vec3::Z, 100.0, 5.0, 5, None);
        p.integrate(0.1);
        let mut world = World::new();
        let near = world.spawn(());
        let far = world.spawn(());
        let hit = p.check_collision(&[
            (far, Vec3::new(0.0, 0.0, 8.0), 0.5),
            (near, Vec3::new(0.0, 0.0, 3.0), 0.5),
        ]);
        assert_eq!(hit.map(|(e, _)| e), Some(near));
    }

    #[test]
    fn test_degenerate_motion_uses_point_test() {
        let mut p = Projectile::new();
        p.activate(Vec3::ZERO, Vec3::Z, 0.0, 5.0, 5, None);
        p.integrate(0.016);
        let mut world = World::new();
        let e = world.spawn(());
        // overlapping the stationary projectile
        let hit = p.check_collision(&[(e, Vec3::new(0.2, 0.0, 0.0), 0.5)]);
        assert!(hit.is_some());
        let miss = p.check_collision(&[(e, Vec3::new(5.0, 0.0, 0.0), 0.5)]);
        assert!(miss.is_none());
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut p = Projectile::new();
        p.activate(Vec3::ZERO, Vec3::Z, 10.0, 100.0, 5, None);
        for _ in 0..TRAIL_CAPACITY * 3 {
            p.integrate(0.016);
        }
        assert_eq!(p.trail().count(), TRAIL_CAPACITY);
    }

    #[test]
    fn test_lost_target_falls_back_to_straight_flight() {
        let mut world = World::new();
        let victim = world.spawn((
            Transform::new(Vec3::new(0.0, 0.0, 50.0), 0.0),
            Health::new(1),
            EnemyTag::new(1),
        ));
        let mut pool = ProjectilePool::new(1);
        let mut events = EventQueue::new();
        pool.acquire().unwrap().activate(
            Vec3::ZERO,
            Vec3::Z,
            10.0,
            10.0,
            5,
            Some(victim),
        );
        world.despawn(victim).unwrap();
        update_pool(&mut pool, &mut world, &mut events, 0.016);
        let p = pool.iter_active().next().unwrap();
        assert!(p.target().is_none());
        // still flying straight down +Z
        assert!(p.velocity.normalize().dot(Vec3::Z) > 0.999);
    }
}
