//! Magic wand: pooled homing projectiles released at the cast fire-frame.
//!
//! The wand owns a fixed-size projectile pool. A cast spawns `multishot`
//! projectiles fanned symmetrically across `spread_deg` around forward,
//! each trying to auto-acquire the best-aligned enemy in its lock cone.

use glam::Vec3;
use hecs::{Entity, World};

use crate::animation::AnimationBlender;
use crate::clips::LoopMode;
use crate::components::Transform;
use crate::config::WeaponConfig;
use crate::constants::*;
use crate::events::EventQueue;
use crate::projectile::{self, ProjectilePool};
use crate::queries;

/// One in-flight cast.
#[derive(Debug)]
struct Cast {
    elapsed: f32,
    duration: f32,
    synced: bool,
    fired: bool,
}

#[derive(Debug)]
pub struct WandAttack {
    config: WeaponConfig,
    pool: ProjectilePool,
    cooldown_left: f32,
    cast: Option<Cast>,
}

impl WandAttack {
    pub fn new(config: WeaponConfig) -> Self {
        Self {
            config,
            pool: ProjectilePool::new(PROJECTILE_POOL_SIZE),
            cooldown_left: 0.0,
            cast: None,
        }
    }

    pub fn pool(&self) -> &ProjectilePool {
        &self.pool
    }

    pub fn is_casting(&self) -> bool {
        self.cast.is_some()
    }

    pub fn attack(&mut self, blender: &mut AnimationBlender) {
        if self.cooldown_left > 0.0 || self.cast.is_some() {
            return;
        }
        self.cooldown_left = self.config.cooldown;
        let synced = blender.play_overlay(&self.config.clip, LoopMode::Once);
        let duration = blender
            .clip_duration(&self.config.clip)
            .unwrap_or(ATTACK_DEFAULT_COOLDOWN);
        self.cast = Some(Cast {
            elapsed: 0.0,
            duration,
            synced,
            fired: false,
        });
    }

    fn progress(&self, blender: &AnimationBlender) -> f32 {
        let Some(cast) = &self.cast else {
            return 0.0;
        };
        if !cast.synced {
            return 1.0;
        }
        if blender.is_overlay_active(&self.config.clip) {
            blender.overlay_elapsed_fraction()
        } else {
            (cast.elapsed / cast.duration).clamp(0.0, 1.0)
        }
    }

    pub fn update(
        &mut self,
        world: &mut World,
        attacker: Entity,
        blender: &AnimationBlender,
        events: &mut EventQueue,
        dt: f32,
    ) {
        self.cooldown_left = (self.cooldown_left - dt).max(0.0);

        if self.cast.is_some() {
            match world.get::<&Transform>(attacker) {
                Ok(tf) => {
                    let pose = *tf;
                    drop(tf);
                    let p = self.progress(blender);
                    let fired = self.cast.as_ref().map_or(true, |c| c.fired);
                    if !fired && p >= self.config.fire_fraction {
                        self.cast.as_mut().unwrap().fired = true;
                        self.spawn_volley(world, pose);
                    }
                    let cast = self.cast.as_mut().unwrap();
                    cast.elapsed += dt;
                    if !cast.synced || cast.elapsed >= cast.duration {
                        self.cast = None;
                    }
                }
                Err(_) => {
                    self.cast = None;
                }
            }
        }

        // projectiles keep flying between casts
        projectile::update_pool(&mut self.pool, world, events, dt);
    }

    /// Muzzle world position from the actor pose and the configured local
    /// offset (right, up, forward).
    fn muzzle(&self, pose: &Transform) -> Vec3 {
        let forward = pose.forward();
        let right = Vec3::new(forward.z, 0.0, -forward.x);
        let [r, u, f] = self.config.muzzle_offset;
        pose.pos + right * r + Vec3::Y * u + forward * f
    }

    fn spawn_volley(&mut self, world: &World, pose: Transform) {
        let origin = self.muzzle(&pose);
        let n = self.config.multishot.max(1);
        let spread = self.config.spread_deg;
        for i in 0..n {
            let offset_deg = if n == 1 {
                0.0
            } else {
                -spread / 2.0 + spread * i as f32 / (n - 1) as f32
            };
            let yaw = pose.yaw + offset_deg.to_radians();
            let dir = Vec3::new(yaw.sin(), 0.0, yaw.cos());
            let target = queries::best_enemy_in_cone(
                world,
                origin,
                dir,
                WAND_LOCK_RANGE,
                (WAND_AIM_CONE_DEG.to_radians()).cos(),
            );
            let Some(slot) = self.pool.acquire() else {
                log::warn!("projectile pool exhausted, dropping shot");
                continue;
            };
            slot.activate(
                origin,
                dir,
                WAND_PROJECTILE_SPEED,
                WAND_PROJECTILE_LIFETIME,
                self.config.damage,
                target,
            );
        }
    }

    pub fn cancel(&mut self, blender: &mut AnimationBlender) {
        self.cast = None;
        blender.stop_overlay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clips::ClipLibrary;
    use crate::components::{EnemyTag, Health};
    use crate::events::GameEvent;
    use approx::assert_relative_eq;

    fn wand(multishot: u32, spread_deg: f32) -> WandAttack {
        WandAttack::new(WeaponConfig {
            multishot,
            spread_deg,
            clip: "Cast".to_string(),
            muzzle_offset: [0.0, 0.0, 0.0],
            ..WeaponConfig::default()
        })
    }

    #[test]
    fn test_multishot_fans_symmetric_yaw_offsets() {
        let mut world = World::new();
        let attacker = world.spawn((Transform::new(Vec3::ZERO, 0.0),));
        let mut blender = AnimationBlender::new(ClipLibrary::new());
        let mut wand = wand(3, 30.0);
        let mut events = EventQueue::new();
        wand.attack(&mut blender);
        wand.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);

        assert_eq!(wand.pool().active_count(), 3);
        let mut yaws: Vec<f32> = wand
            .pool()
            .iter_active()
            .map(|p| p.velocity.x.atan2(p.velocity.z).to_degrees())
            .collect();
        yaws.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(yaws[0], -15.0, epsilon = 1e-3);
        assert_relative_eq!(yaws[1], 0.0, epsilon = 1e-3);
        assert_relative_eq!(yaws[2], 15.0, epsilon = 1e-3);
    }

    #[test]
    fn test_pool_exhaustion_drops_shots_nonfatally() {
        let mut world = World::new();
        let attacker = world.spawn((Transform::new(Vec3::ZERO, 0.0),));
        let mut blender = AnimationBlender::new(ClipLibrary::new());
        // more shots than pool slots
        let mut wand = wand(PROJECTILE_POOL_SIZE as u32 + 8, 90.0);
        let mut events = EventQueue::new();
        wand.attack(&mut blender);
        wand.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);
        assert_eq!(wand.pool().active_count(), PROJECTILE_POOL_SIZE);
    }

    #[test]
    fn test_auto_lock_acquires_aligned_enemy() {
        let mut world = World::new();
        let attacker = world.spawn((Transform::new(Vec3::ZERO, 0.0),));
        let enemy = world.spawn((
            Transform::new(Vec3::new(0.0, 0.0, 20.0), 0.0),
            Health::new(10),
            EnemyTag::new(5),
        ));
        let mut blender = AnimationBlender::new(ClipLibrary::new());
        let mut wand = wand(1, 0.0);
        let mut events = EventQueue::new();
        wand.attack(&mut blender);
        wand.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);
        let locked = wand.pool().iter_active().next().unwrap().target();
        assert_eq!(locked, Some(enemy));
    }

    #[test]
    fn test_projectile_eventually_hits_locked_target() {
        let mut world = World::new();
        let attacker = world.spawn((Transform::new(Vec3::ZERO, 0.0),));
        let enemy = world.spawn((
            Transform::new(Vec3::new(3.0, 0.0, 15.0), 0.0),
            Health::new(10),
            EnemyTag::new(5),
        ));
        let mut blender = AnimationBlender::new(ClipLibrary::new());
        let mut wand = wand(1, 0.0);
        let mut events = EventQueue::new();
        wand.attack(&mut blender);
        for _ in 0..120 {
            wand.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);
        }
        let hit = events
            .drain()
            .any(|e| matches!(e, GameEvent::ProjectileHit { target, .. } if target == enemy));
        assert!(hit);
        assert!(world.get::<&Health>(enemy).unwrap().is_dead());
    }
}
