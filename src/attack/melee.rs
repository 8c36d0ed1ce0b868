//! Melee arc-sweep attacks (sword and bare hand).
//!
//! The swing applies a forward-cone hit test during the active window of
//! the swing clip. The hit-set guarantees at most one hit per target per
//! swing no matter how many ticks observe the window. The hand variant's
//! special attack lands a slam that launches an expanding shockwave ring.

use glam::Vec3;
use hecs::{Entity, World};

use crate::animation::AnimationBlender;
use crate::clips::LoopMode;
use crate::components::{Health, Transform};
use crate::config::WeaponConfig;
use crate::constants::*;
use crate::events::{EventQueue, GameEvent};
use crate::queries;

use super::AttackInstance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeleeKind {
    Sword,
    Hand,
}

/// One in-flight swing.
#[derive(Debug)]
struct Swing {
    elapsed: f32,
    duration: f32,
    /// False when the clip was missing and the effect fires unsynchronized.
    synced: bool,
    hits: AttackInstance,
    /// Hand slam: spawn the shockwave when the hit window opens.
    slam: bool,
}

/// Expanding ring collider spawned by the hand slam.
#[derive(Debug)]
pub struct Shockwave {
    origin: Vec3,
    radius: f32,
    delay_left: f32,
    hits: AttackInstance,
}

impl Shockwave {
    fn new(origin: Vec3) -> Self {
        Self {
            origin,
            radius: 0.0,
            delay_left: SHOCKWAVE_DELAY,
            hits: AttackInstance::new(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Expand the ring and hit anything whose distance to the origin falls
    /// inside the ring band. Returns false once the wave has dissipated.
    fn update(
        &mut self,
        world: &mut World,
        attacker: Entity,
        damage: i32,
        events: &mut EventQueue,
        dt: f32,
    ) -> bool {
        if self.delay_left > 0.0 {
            self.delay_left -= dt;
            return true;
        }
        self.radius += SHOCKWAVE_SPEED * dt;
        let inner = self.radius - SHOCKWAVE_THICKNESS / 2.0;
        let outer = self.radius + SHOCKWAVE_THICKNESS / 2.0;
        let victims: Vec<Entity> = queries::living_enemies(world)
            .into_iter()
            .filter(|(_, pos)| {
                let dx = pos.x - self.origin.x;
                let dz = pos.z - self.origin.z;
                let dist = (dx * dx + dz * dz).sqrt();
                dist >= inner && dist <= outer
            })
            .map(|(id, _)| id)
            .collect();
        for victim in victims {
            if !self.hits.register(victim) {
                continue;
            }
            if let Ok(mut health) = world.get::<&mut Health>(victim) {
                health.damage(damage);
            }
            events.push(GameEvent::ShockwaveHit {
                attacker,
                target: victim,
                damage,
            });
        }
        self.radius < SHOCKWAVE_MAX_RADIUS
    }
}

/// Arc-sweep melee strategy.
#[derive(Debug)]
pub struct MeleeAttack {
    kind: MeleeKind,
    config: WeaponConfig,
    cooldown_left: f32,
    swing: Option<Swing>,
    shockwave: Option<Shockwave>,
}

impl MeleeAttack {
    pub fn new(kind: MeleeKind, config: WeaponConfig) -> Self {
        Self {
            kind,
            config,
            cooldown_left: 0.0,
            swing: None,
            shockwave: None,
        }
    }

    pub fn kind(&self) -> MeleeKind {
        self.kind
    }

    pub fn is_swinging(&self) -> bool {
        self.swing.is_some()
    }

    pub fn shockwave(&self) -> Option<&Shockwave> {
        self.shockwave.as_ref()
    }

    /// Start the default swing if the cooldown allows it.
    pub fn attack(&mut self, blender: &mut AnimationBlender) {
        self.start_swing(blender, false);
    }

    /// Hand: slam that launches a shockwave. Sword: plain swing.
    pub fn special_attack(&mut self, blender: &mut AnimationBlender) {
        self.start_swing(blender, self.kind == MeleeKind::Hand);
    }

    fn start_swing(&mut self, blender: &mut AnimationBlender, slam: bool) {
        if self.cooldown_left > 0.0 || self.swing.is_some() {
            return;
        }
        self.cooldown_left = self.config.cooldown;
        let synced = blender.play_overlay(&self.config.clip, LoopMode::Once);
        if !synced {
            log::debug!("melee clip missing, firing unsynchronized");
        }
        let duration = blender
            .clip_duration(&self.config.clip)
            .unwrap_or(BRAWLER_SWING_FALLBACK);
        self.swing = Some(Swing {
            elapsed: 0.0,
            duration,
            synced,
            hits: AttackInstance::new(),
            slam,
        });
    }

    /// Swing progress in [0, 1]; a missing clip reports 1 immediately.
    fn progress(&self, blender: &AnimationBlender) -> f32 {
        let Some(swing) = &self.swing else {
            return 0.0;
        };
        if !swing.synced {
            return 1.0;
        }
        if blender.is_overlay_active(&self.config.clip) {
            blender.overlay_elapsed_fraction()
        } else {
            (swing.elapsed / swing.duration).clamp(0.0, 1.0)
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

        let pose = match world.get::<&Transform>(attacker) {
            Ok(tf) => *tf,
            Err(_) => {
                // attacker vanished; abort the in-flight effect
                self.swing = None;
                self.shockwave = None;
                return;
            }
        };

        if self.swing.is_some() {
            let synced = self.swing.as_ref().map_or(false, |s| s.synced);
            let p = self.progress(blender);
            let fire = self.config.fire_fraction;
            let in_window = p >= fire && (p <= MELEE_ACTIVE_END_FRACTION || !synced);
            if in_window {
                self.apply_hits(world, attacker, pose, events);
            }
            let overlay_gone = !blender.has_overlay();
            let swing = self.swing.as_mut().unwrap();
            swing.elapsed += dt;
            let done = if swing.synced {
                swing.elapsed >= swing.duration
                    || (p >= MELEE_ACTIVE_END_FRACTION && overlay_gone)
            } else {
                true
            };
            if done {
                self.swing = None;
            }
        }

        if let Some(wave) = &mut self.shockwave {
            if !wave.update(world, attacker, self.config.damage, events, dt) {
                self.shockwave = None;
            }
        }
    }

    fn apply_hits(
        &mut self,
        world: &mut World,
        attacker: Entity,
        pose: Transform,
        events: &mut EventQueue,
    ) {
        let victims = queries::enemies_in_arc(
            world,
            pose.pos,
            pose.forward(),
            self.config.reach,
            self.config.arc_deg,
        );
        let swing = self.swing.as_mut().unwrap();
        let mut slam_origin = None;
        for victim in victims {
            if !swing.hits.register(victim) {
                continue;
            }
            if let Ok(mut health) = world.get::<&mut Health>(victim) {
                health.damage(self.config.damage);
            }
            events.push(GameEvent::AttackHit {
                attacker,
                target: victim,
                damage: self.config.damage,
            });
        }
        if swing.slam {
            swing.slam = false;
            slam_origin = Some(pose.pos);
        }
        if let Some(origin) = slam_origin {
            self.shockwave = Some(Shockwave::new(origin));
        }
    }

    pub fn cancel(&mut self, blender: &mut AnimationBlender) {
        self.swing = None;
        self.shockwave = None;
        blender.stop_overlay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clips::ClipLibrary;
    use crate::components::EnemyTag;

    fn blender_with_clip() -> AnimationBlender {
        let mut clips = ClipLibrary::new();
        clips.insert("Slash", 1.0, LoopMode::Once);
        AnimationBlender::new(clips)
    }

    fn sword_config() -> WeaponConfig {
        WeaponConfig {
            damage: 100,
            reach: 8.0,
            arc_deg: 120.0,
            clip: "Slash".to_string(),
            ..WeaponConfig::default()
        }
    }

    fn spawn_enemy(world: &mut World, pos: Vec3) -> Entity {
        world.spawn((
            Transform::new(pos, 0.0),
            Health::new(10),
            EnemyTag::new(5),
        ))
    }

    fn spawn_attacker(world: &mut World) -> Entity {
        world.spawn((Transform::new(Vec3::ZERO, 0.0),))
    }

    #[test]
    fn test_sword_swing_hits_each_enemy_exactly_once() {
        let mut world = World::new();
        let attacker = spawn_attacker(&mut world);
        // three enemies inside reach 8 and the 120 degree arc (forward is +Z)
        spawn_enemy(&mut world, Vec3::new(0.0, 0.0, 4.0));
        spawn_enemy(&mut world, Vec3::new(2.0, 0.0, 4.0));
        spawn_enemy(&mut world, Vec3::new(-2.0, 0.0, 4.0));

        let mut blender = blender_with_clip();
        let mut melee = MeleeAttack::new(MeleeKind::Sword, sword_config());
        let mut events = EventQueue::new();
        melee.attack(&mut blender);
        assert!(melee.is_swinging());

        // run well past the active window with many small ticks
        for _ in 0..120 {
            melee.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);
            blender.update(1.0 / 60.0);
        }

        let hits: Vec<_> = events
            .drain()
            .filter(|e| matches!(e, GameEvent::AttackHit { .. }))
            .collect();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_enemy_behind_attacker_not_hit() {
        let mut world = World::new();
        let attacker = spawn_attacker(&mut world);
        spawn_enemy(&mut world, Vec3::new(0.0, 0.0, -4.0));

        let mut blender = blender_with_clip();
        let mut melee = MeleeAttack::new(MeleeKind::Sword, sword_config());
        let mut events = EventQueue::new();
        melee.attack(&mut blender);
        for _ in 0..120 {
            melee.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);
            blender.update(1.0 / 60.0);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn test_missing_clip_fires_immediately() {
        let mut world = World::new();
        let attacker = spawn_attacker(&mut world);
        spawn_enemy(&mut world, Vec3::new(0.0, 0.0, 4.0));

        // no clips at all
        let mut blender = AnimationBlender::new(ClipLibrary::new());
        let mut melee = MeleeAttack::new(MeleeKind::Sword, sword_config());
        let mut events = EventQueue::new();
        melee.attack(&mut blender);
        melee.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);
        assert_eq!(events.len(), 1);
        assert!(!melee.is_swinging());
    }

    #[test]
    fn test_cooldown_blocks_second_swing() {
        let mut blender = blender_with_clip();
        let config = WeaponConfig {
            cooldown: 5.0,
            ..sword_config()
        };
        let mut melee = MeleeAttack::new(MeleeKind::Sword, config);
        melee.attack(&mut blender);
        let mut world = World::new();
        let attacker = spawn_attacker(&mut world);
        let mut events = EventQueue::new();
        // swing completes but the cooldown is still running
        for _ in 0..70 {
            melee.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);
            blender.update(1.0 / 60.0);
        }
        assert!(!melee.is_swinging());
        melee.attack(&mut blender);
        assert!(!melee.is_swinging());
    }

    #[test]
    fn test_hand_slam_spawns_shockwave_and_ring_hits_once() {
        let mut world = World::new();
        let attacker = spawn_attacker(&mut world);
        // outside melee reach but inside the shockwave's travel
        let far = spawn_enemy(&mut world, Vec3::new(0.0, 0.0, 10.0));

        let mut blender = AnimationBlender::new(ClipLibrary::new());
        let mut melee = MeleeAttack::new(MeleeKind::Hand, sword_config());
        let mut events = EventQueue::new();
        melee.special_attack(&mut blender);
        for _ in 0..240 {
            melee.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);
        }
        let wave_hits: Vec<_> = events
            .drain()
            .filter(|e| {
                matches!(e, GameEvent::ShockwaveHit { target, .. } if *target == far)
            })
            .collect();
        assert_eq!(wave_hits.len(), 1);
        // wave has dissipated
        assert!(melee.shockwave().is_none());
    }

    #[test]
    fn test_cancel_aborts_swing_and_overlay() {
        let mut blender = blender_with_clip();
        let mut melee = MeleeAttack::new(MeleeKind::Sword, sword_config());
        melee.attack(&mut blender);
        assert!(blender.has_overlay());
        melee.cancel(&mut blender);
        assert!(!melee.is_swinging());
        assert!(!blender.has_overlay());
    }
}
