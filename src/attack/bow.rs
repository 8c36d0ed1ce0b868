//! Ranged bow attack: instant best-aligned pick, no simulated travel.
//!
//! On the draw clip's fire fraction the strategy picks the single best
//! enemy inside a narrow forward cone and applies the effect instantly.

use hecs::{Entity, World};

use crate::animation::AnimationBlender;
use crate::clips::LoopMode;
use crate::components::{Health, Transform};
use crate::config::WeaponConfig;
use crate::constants::*;
use crate::events::{EventQueue, GameEvent};
use crate::queries;

/// One in-flight draw-and-release.
#[derive(Debug)]
struct Shot {
    elapsed: f32,
    duration: f32,
    synced: bool,
    fired: bool,
}

#[derive(Debug)]
pub struct BowAttack {
    config: WeaponConfig,
    cooldown_left: f32,
    shot: Option<Shot>,
}

impl BowAttack {
    pub fn new(config: WeaponConfig) -> Self {
        Self {
            config,
            cooldown_left: 0.0,
            shot: None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.shot.is_some()
    }

    pub fn attack(&mut self, blender: &mut AnimationBlender) {
        if self.cooldown_left > 0.0 || self.shot.is_some() {
            return;
        }
        self.cooldown_left = self.config.cooldown;
        let synced = blender.play_overlay(&self.config.clip, LoopMode::Once);
        let duration = blender
            .clip_duration(&self.config.clip)
            .unwrap_or(ATTACK_DEFAULT_COOLDOWN);
        self.shot = Some(Shot {
            elapsed: 0.0,
            duration,
            synced,
            fired: false,
        });
    }

    fn progress(&self, blender: &AnimationBlender) -> f32 {
        let Some(shot) = &self.shot else {
            return 0.0;
        };
        if !shot.synced {
            return 1.0;
        }
        if blender.is_overlay_active(&self.config.clip) {
            blender.overlay_elapsed_fraction()
        } else {
            (shot.elapsed / shot.duration).clamp(0.0, 1.0)
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
        if self.shot.is_none() {
            return;
        }
        let pose = match world.get::<&Transform>(attacker) {
            Ok(tf) => *tf,
            Err(_) => {
                self.shot = None;
                return;
            }
        };

        let p = self.progress(blender);
        let fired = self.shot.as_ref().map_or(true, |s| s.fired);
        if !fired && p >= self.config.fire_fraction {
            self.shot.as_mut().unwrap().fired = true;
            self.release(world, attacker, pose, events);
        }

        let shot = self.shot.as_mut().unwrap();
        shot.elapsed += dt;
        if !shot.synced || shot.elapsed >= shot.duration {
            self.shot = None;
        }
    }

    /// Instant effect on the best-aligned enemy in the narrow cone.
    fn release(
        &mut self,
        world: &mut World,
        attacker: Entity,
        pose: Transform,
        events: &mut EventQueue,
    ) {
        let Some(victim) = queries::best_enemy_in_cone(
            world,
            pose.pos,
            pose.forward(),
            BOW_RANGE,
            BOW_AIM_DOT_MIN,
        ) else {
            return;
        };
        let damage = match world.get::<&mut Health>(victim) {
            Ok(mut health) => {
                let dealt = health.current;
                health.current = 0;
                dealt
            }
            Err(_) => return,
        };
        events.push(GameEvent::AttackHit {
            attacker,
            target: victim,
            damage,
        });
    }

    pub fn cancel(&mut self, blender: &mut AnimationBlender) {
        self.shot = None;
        blender.stop_overlay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clips::ClipLibrary;
    use crate::components::EnemyTag;
    use glam::Vec3;

    fn spawn_enemy(world: &mut World, pos: Vec3) -> Entity {
        world.spawn((
            Transform::new(pos, 0.0),
            Health::new(30),
            EnemyTag::new(5),
        ))
    }

    fn bow() -> BowAttack {
        BowAttack::new(WeaponConfig {
            clip: "Draw".to_string(),
            ..WeaponConfig::default()
        })
    }

    #[test]
    fn test_picks_most_aligned_enemy_and_kills_instantly() {
        let mut world = World::new();
        let attacker = world.spawn((Transform::new(Vec3::ZERO, 0.0),));
        // slightly off axis, closer
        let off = 10f32.to_radians();
        spawn_enemy(&mut world, Vec3::new(off.sin(), 0.0, off.cos()) * 5.0);
        // dead ahead, further
        let aligned = spawn_enemy(&mut world, Vec3::new(0.0, 0.0, 30.0));

        let mut blender = AnimationBlender::new(ClipLibrary::new());
        let mut bow = bow();
        let mut events = EventQueue::new();
        bow.attack(&mut blender);
        bow.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);

        let hit = events.drain().next().unwrap();
        match hit {
            GameEvent::AttackHit { target, .. } => assert_eq!(target, aligned),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(world.get::<&Health>(aligned).unwrap().is_dead());
    }

    #[test]
    fn test_no_candidate_outside_cone() {
        let mut world = World::new();
        let attacker = world.spawn((Transform::new(Vec3::ZERO, 0.0),));
        // 30 degrees off axis fails the 0.95 dot cone
        let off = 30f32.to_radians();
        spawn_enemy(&mut world, Vec3::new(off.sin(), 0.0, off.cos()) * 5.0);

        let mut blender = AnimationBlender::new(ClipLibrary::new());
        let mut bow = bow();
        let mut events = EventQueue::new();
        bow.attack(&mut blender);
        bow.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_fires_once_per_activation() {
        let mut world = World::new();
        let attacker = world.spawn((Transform::new(Vec3::ZERO, 0.0),));
        spawn_enemy(&mut world, Vec3::new(0.0, 0.0, 10.0));
        spawn_enemy(&mut world, Vec3::new(0.0, 0.0, 12.0));

        let mut clips = ClipLibrary::new();
        clips.insert("Draw", 1.0, LoopMode::Once);
        let mut blender = AnimationBlender::new(clips);
        let mut bow = bow();
        let mut events = EventQueue::new();
        bow.attack(&mut blender);
        for _ in 0..120 {
            bow.update(&mut world, attacker, &blender, &mut events, 1.0 / 60.0);
            blender.update(1.0 / 60.0);
        }
        // only the single best target dies, once
        assert_eq!(events.len(), 1);
    }
}
